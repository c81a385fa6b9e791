use std::fmt::{self, Display, Formatter};

#[derive(Debug)]
pub enum Error {
    // The login request could not be completed.
    Auth(reqwest::Error),
    // A page fetch failed at the transport level or returned a non-success status.
    Network(reqwest::Error),
    Url(url::ParseError),
    // The extraction schema is invalid or a page does not have the shape it requires.
    Schema(String),
    Storage(std::io::Error),
    Json(serde_json::Error),
    Notify(teloxide::RequestError),
}

impl Error {
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Network(e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::Url(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<teloxide::RequestError> for Error {
    fn from(e: teloxide::RequestError) -> Self {
        Error::Notify(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Auth(e) => write!(f, "Login failed: {e}"),
            Error::Network(e) => write!(f, "Request error: {e}"),
            Error::Url(e) => write!(f, "Invalid course link: {e}"),
            Error::Schema(msg) => write!(f, "Unexpected page structure: {msg}"),
            Error::Storage(e) => write!(f, "Snapshot storage error: {e}"),
            Error::Json(e) => write!(f, "Json error: {e}"),
            Error::Notify(e) => write!(f, "Notification error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Auth(e) | Error::Network(e) => Some(e),
            Error::Url(e) => Some(e),
            Error::Schema(_) => None,
            Error::Storage(e) => Some(e),
            Error::Json(e) => Some(e),
            Error::Notify(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
