use std::fmt;

use crate::persist::PersistError;

/// One downloadable rendition listed on a result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLink {
    pub size_label: String,
    pub url: String,
}

impl ResultLink {
    pub fn new(size_label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            size_label: size_label.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure of an apply or download call.
///
/// An unknown effect name and a link list without a regular-size entry are
/// not errors; those calls succeed with an empty result.
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("unexpected response status {status} from effect upload (expected 302)")]
    UnexpectedResponse { status: u16 },
    #[error("effect upload redirect carried no usable Location header")]
    MissingRedirect,
    #[error("write failed: {0}")]
    Write(#[from] PersistError),
}
