//! Module for responses returned from the catalog API.

use displaydoc::Display;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// The envelope returned by every mutating endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl Outcome {
    /// Turns a `success: false` envelope into an [`Error::Rejected`].
    pub fn into_result(self) -> Result<(), Error> {
        if self.success {
            Ok(())
        } else {
            Err(Error::Rejected {
                message: self.error,
            })
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// An error returned from the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// The server rejected the request: {message:?}
    Rejected { message: Option<String> },
    /// The server responded with status {status}
    Status {
        status: StatusCode,
        message: Option<String>,
    },
}

impl Error {
    /// Returns the message supplied by the server.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } | Self::Status { message, .. } => message.as_deref(),
        }
    }

    /// Returns the HTTP status for errors that were signalled through the status line.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { .. } => None,
            Self::Status { status, .. } => Some(*status),
        }
    }
}
