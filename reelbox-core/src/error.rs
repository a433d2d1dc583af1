use std::{error, fmt, io};

#[derive(Debug)]
pub enum Error {
    UnexpectedResponse,
    InvalidUrl(String),
    /// Non-success status with a body that is not JSON.
    HttpStatus(u16),
    HttpError(Box<dyn error::Error + Send + Sync>),
    JsonError(Box<dyn error::Error + Send + Sync>),
    IoError(io::Error),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedResponse => write!(f, "Unknown server response"),
            Self::InvalidUrl(url) => write!(f, "Invalid URL: {url}"),
            Self::HttpStatus(code) => write!(f, "http status: {code}"),
            Self::HttpError(err) | Self::JsonError(err) => err.fmt(f),
            Self::IoError(err) => err.fmt(f),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(Box::new(err))
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Error {
        Error::HttpError(Box::new(err))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::InvalidUrl(err.to_string())
    }
}
