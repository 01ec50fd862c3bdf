use bytes::Bytes;
use reqwest::header::{LOCATION, ORIGIN, REFERER};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use url::Url;

use funia_logging::{funia_debug, funia_warn};

use crate::config::ServiceSettings;
use crate::fetch::{map_reqwest_error, parse_http_url, ReqwestFetcher};
use crate::{EffectError, FailureKind, FetchError};

const UPLOAD_FIELD: &str = "image";
const UPLOAD_FILENAME: &str = "upload.jpg";
const UPLOAD_MIME: &str = "image/jpeg";

fn upload_form(image: Bytes) -> Result<Form, FetchError> {
    let len = image.len() as u64;
    let part = Part::stream_with_length(image, len)
        .file_name(UPLOAD_FILENAME)
        .mime_str(UPLOAD_MIME)
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
    Ok(Form::new()
        .part(UPLOAD_FIELD, part)
        .text("server", "1"))
}

/// Upload `image` for the effect `key` and return the absolute result page URL.
///
/// The service answers a successful upload with `302 Found`; anything else
/// is rejected without following it.
pub(crate) async fn upload_image(
    fetcher: &ReqwestFetcher,
    settings: &ServiceSettings,
    key: &str,
    image: Bytes,
) -> Result<Url, EffectError> {
    let base = parse_http_url(settings.base_url_trimmed())?;
    let upload_url = settings.upload_url(key);
    funia_debug!("Uploading {} bytes to {}", image.len(), upload_url);

    let response = fetcher
        .direct()
        .post(&upload_url)
        .header(ORIGIN, settings.base_url_trimmed())
        .header(REFERER, settings.referer())
        .multipart(upload_form(image)?)
        .send()
        .await
        .map_err(map_reqwest_error)?;

    let status = response.status();
    if status != StatusCode::FOUND {
        funia_warn!("Upload to {} answered {} instead of 302", upload_url, status);
        return Err(EffectError::UnexpectedResponse {
            status: status.as_u16(),
        });
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(EffectError::MissingRedirect)?;

    let result_url = base
        .join(location)
        .map_err(|_| EffectError::MissingRedirect)?;
    funia_debug!("Upload redirected to {}", result_url);
    Ok(result_url)
}
