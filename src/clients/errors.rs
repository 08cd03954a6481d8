use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog service unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("Catalog service returned status {0}")]
    UpstreamStatus(u16),

    #[error("Catalog response malformed: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::MalformedResponse(err.to_string())
        } else if let Some(status) = err.status() {
            Error::UpstreamStatus(status.as_u16())
        } else {
            Error::UpstreamUnavailable(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}
