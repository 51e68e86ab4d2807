use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme '{0}': URL must start with http:// or https://")]
    UnsupportedScheme(String),

    #[error("Failed to fetch URL: {0}")]
    FetchFailed(#[from] FetchCause),

    #[error("Unexpected status code: {code}")]
    UnexpectedStatus { code: u16 },

    #[error("Parse error: {0}")]
    ParseFailure(String),
}

/// Underlying reason a fetch never produced a usable response.
#[derive(Error, Debug)]
pub enum FetchCause {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        ScanError::FetchFailed(FetchCause::Http(err))
    }
}

impl ScanError {
    /// True when the input itself was rejected before any network traffic.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidUrl(_) | ScanError::UnsupportedScheme(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
