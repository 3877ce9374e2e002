use std::error::Error as StdError;
use std::io;

use http::StatusCode;

use super::helpers::TimedOut;
use super::types::{Error, Kind};
use crate::connect::RaceError;

impl Error {
    /// Returns true if the error came from building the request or client.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.kind(), Kind::Builder)
    }

    /// Returns true if the hostname could not be resolved.
    #[must_use]
    pub fn is_resolve(&self) -> bool {
        matches!(self.kind(), Kind::Resolve)
    }

    /// Returns true if every connection attempt failed.
    #[must_use]
    pub fn is_race(&self) -> bool {
        matches!(self.kind(), Kind::Race)
    }

    /// Returns true if the overall deadline elapsed.
    ///
    /// Per-attempt connect timeouts are not reported here; they live inside
    /// the [`RaceError`] of a [`Kind::Race`] error.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        if matches!(self.kind(), Kind::Timeout) {
            return true;
        }

        let mut source = self.source();
        while let Some(err) = source {
            if err.is::<TimedOut>() {
                return true;
            }
            source = err.source();
        }

        false
    }

    /// Returns true if the response carried a non-success status.
    #[must_use]
    pub fn is_status(&self) -> bool {
        matches!(self.kind(), Kind::Status(_))
    }

    /// Returns true if the failure happened after the connection was established.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.kind(), Kind::Transport)
    }

    /// Returns true if the caller cancelled the operation.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self.kind(), Kind::Canceled)
    }

    /// Returns true if the underlying cause is an I/O error of the given kind.
    #[must_use]
    pub fn is_io_kind(&self, kind: io::ErrorKind) -> bool {
        let mut source = self.source();
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if io.kind() == kind {
                    return true;
                }
            }
            source = err.source();
        }
        false
    }

    /// Returns the status code, if the error was generated from a response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.kind() {
            Kind::Status(code) => Some(code),
            _ => None,
        }
    }

    /// Returns the per-address failures when every connection attempt failed.
    #[must_use]
    pub fn race_error(&self) -> Option<&RaceError> {
        self.source()?.downcast_ref::<RaceError>()
    }

    /// Human-readable description for presentation.
    ///
    /// Returns `None` for cancellations, which must never be shown as a
    /// failure. Status errors render as the bare status code.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self.kind() {
            Kind::Canceled => None,
            Kind::Status(code) => Some(code.as_u16().to_string()),
            _ => {
                let mut message = self.to_string();
                let mut source = self.source();
                while let Some(err) = source {
                    message.push_str(": ");
                    message.push_str(&err.to_string());
                    source = err.source();
                }
                Some(message)
            }
        }
    }
}
