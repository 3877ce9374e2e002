use std::time::Duration;

use http::StatusCode;

use super::BoxError;
use super::helpers::{BadScheme, OperationCanceled, TimedOut};
use super::types::{Error, Kind};
use crate::connect::RaceError;
use crate::dns::ResolveError;

/// Creates an `Error` for a builder error.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a URL whose scheme is neither `http` nor `https`.
pub fn url_bad_scheme(url: url::Url) -> Error {
    Error::new(Kind::Builder).with(BadScheme).with_url(url)
}

/// Creates an `Error` for a failed name resolution.
pub fn resolve(e: ResolveError) -> Error {
    Error::new(Kind::Resolve).with(e)
}

/// Creates an `Error` for an exhausted connection race.
pub fn race(e: RaceError) -> Error {
    Error::new(Kind::Race).with(e)
}

/// Creates an `Error` for an elapsed overall deadline.
pub fn timeout(after: Duration) -> Error {
    Error::new(Kind::Timeout).with(TimedOut(after))
}

/// Creates an `Error` for a non-success response status.
pub fn status_code(url: url::Url, status: StatusCode) -> Error {
    Error::new(Kind::Status(status)).with_url(url)
}

/// Creates an `Error` for a failure after the connection was established.
pub fn transport<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Transport).with(e.into())
}

/// Creates an `Error` for a caller cancellation.
pub fn canceled() -> Error {
    Error::new(Kind::Canceled).with(OperationCanceled)
}
