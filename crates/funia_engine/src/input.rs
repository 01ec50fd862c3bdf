use bytes::Bytes;

use funia_logging::funia_debug;

use crate::fetch::ReqwestFetcher;
use crate::EffectError;

/// Source image for an effect: raw bytes or a URL to fetch them from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Bytes(Bytes),
    Url(String),
}

impl From<Bytes> for ImageInput {
    fn from(bytes: Bytes) -> Self {
        ImageInput::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        ImageInput::Bytes(Bytes::from(bytes))
    }
}

impl From<&[u8]> for ImageInput {
    fn from(bytes: &[u8]) -> Self {
        ImageInput::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<&str> for ImageInput {
    fn from(url: &str) -> Self {
        ImageInput::Url(url.to_string())
    }
}

impl From<String> for ImageInput {
    fn from(url: String) -> Self {
        ImageInput::Url(url)
    }
}

impl From<url::Url> for ImageInput {
    fn from(url: url::Url) -> Self {
        ImageInput::Url(url.into())
    }
}

/// Resolve an input to image bytes.
///
/// Bytes pass through untouched. URLs are fetched on every call; one that
/// does not parse fails as a fetch with [`crate::FailureKind::InvalidUrl`].
pub(crate) async fn acquire_image(
    fetcher: &ReqwestFetcher,
    input: ImageInput,
    max_bytes: u64,
) -> Result<Bytes, EffectError> {
    match input {
        ImageInput::Bytes(bytes) => Ok(bytes),
        ImageInput::Url(url) => {
            let output = fetcher.fetch(&url, max_bytes).await?;
            funia_debug!("Acquired {} image bytes from {}", output.bytes.len(), url);
            Ok(Bytes::from(output.bytes))
        }
    }
}
