use std::{error, fmt, io};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    WebApiError(String),
    ConfigError(String),
    /// The event loop a command was sent to is no longer running.
    Disconnected,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::WebApiError(err) => f.write_str(err),
            Self::ConfigError(err) => write!(f, "Invalid configuration: {err}"),
            Self::Disconnected => f.write_str("Event loop has shut down"),
        }
    }
}

impl From<reelbox_core::error::Error> for Error {
    fn from(err: reelbox_core::error::Error) -> Self {
        Self::WebApiError(err.to_string())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}
