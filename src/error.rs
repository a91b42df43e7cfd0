use thiserror::Error;

/// Process exit code for every failure.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing required Twitter Ads API credential: environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidConfig { name: &'static str, reason: String },

    #[error("{0}")]
    Usage(String),

    #[error("Twitter Ads API error: {0}")]
    Api(String),

    #[error("Parameter '{0}' is not a string, number or boolean and cannot go in a query")]
    UnsignableParameter(String),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
