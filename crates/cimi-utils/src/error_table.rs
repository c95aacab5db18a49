//! API error responses
//!
//! Fixed table of the error kinds the adapter reports to its clients, with the HTTP status and
//! body used for each.
use std::fmt::Formatter;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AccessDenied,
    BadRequest,
    MalformedBody,
    NotFound,
    NotImplemented,
    TestRequest,
    Conflict,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 7] = [
        ErrorKind::AccessDenied,
        ErrorKind::BadRequest,
        ErrorKind::MalformedBody,
        ErrorKind::NotFound,
        ErrorKind::NotImplemented,
        ErrorKind::TestRequest,
        ErrorKind::Conflict,
    ];

    pub fn status(self) -> u16 {
        match self {
            ErrorKind::AccessDenied => 403,
            ErrorKind::BadRequest | ErrorKind::MalformedBody => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::NotImplemented => 501,
            ErrorKind::TestRequest => 200,
            ErrorKind::Conflict => 409,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::AccessDenied => "Access denied",
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::MalformedBody => "Request body can not be parsed, malformed request body",
            ErrorKind::NotFound => "Resource was not found",
            ErrorKind::NotImplemented => "Not implemented",
            ErrorKind::TestRequest => "Test request",
            ErrorKind::Conflict => "The requested name already exists as a different type",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::AccessDenied => "AccessDenied",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::MalformedBody => "MalformedBody",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::NotImplemented => "NotImplemented",
            ErrorKind::TestRequest => "TestRequest",
            ErrorKind::Conflict => "Conflict",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown error kind {0:?}")]
pub struct UnknownErrorKind(pub String);

/// Status and body sent back to the client
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: &'static str,
}

impl From<ErrorKind> for ErrorResponse {
    fn from(kind: ErrorKind) -> Self {
        Self {
            status: kind.status(),
            body: kind.message(),
        }
    }
}
