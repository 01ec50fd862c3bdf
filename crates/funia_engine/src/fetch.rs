use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, Url};

use funia_logging::funia_debug;

use crate::config::ServiceSettings;
use crate::{FailureKind, FetchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub final_url: String,
    pub content_type: Option<String>,
}

/// Pair of HTTP clients sharing timeouts and user agent.
///
/// `following` is used for every GET. `direct` never follows redirects and
/// exists for the effect upload, whose 302 must be inspected by hand.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    following: reqwest::Client,
    direct: reqwest::Client,
}

impl ReqwestFetcher {
    pub fn new(settings: &ServiceSettings) -> Result<Self, FetchError> {
        let following = build_client(
            settings,
            reqwest::redirect::Policy::limited(settings.redirect_limit),
        )?;
        let direct = build_client(settings, reqwest::redirect::Policy::none())?;
        Ok(Self { following, direct })
    }

    pub(crate) fn direct(&self) -> &reqwest::Client {
        &self.direct
    }

    /// GET `url` and return the response once its status is known to be a success.
    /// The body is left unread.
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let parsed = parse_http_url(url)?;
        funia_debug!("GET {}", parsed);
        let response = self
            .following
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }
        Ok(response)
    }

    /// GET `url` and buffer the whole body, failing once it exceeds `max_bytes`.
    pub async fn fetch(&self, url: &str, max_bytes: u64) -> Result<FetchOutput, FetchError> {
        let response = self.get(url).await?;

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        funia_debug!("Fetched {} bytes from {}", bytes.len(), final_url);

        Ok(FetchOutput {
            bytes,
            final_url,
            content_type,
        })
    }
}

fn build_client(
    settings: &ServiceSettings,
    policy: reqwest::redirect::Policy,
) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.clone())
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(policy)
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

pub(crate) fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim())
        .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::new(
            FailureKind::InvalidUrl,
            format!("unsupported scheme {other}"),
        )),
    }
}

fn too_large(max_bytes: u64, actual: u64) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_schemes_are_accepted() {
        assert!(parse_http_url("https://m.photofunia.com/x").is_ok());
        assert!(parse_http_url("  http://localhost:8080/a.jpg ").is_ok());

        let err = parse_http_url("ftp://example.com/a.jpg").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
        let err = parse_http_url("not a url").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidUrl);
    }
}
