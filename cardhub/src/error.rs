use crate::{card::CardId, response};
use thiserror::Error as ThisError;

/// Error that can occur while interacting with the catalog API.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Failed to send request.
    #[error("failed to send request")]
    Request(#[from] reqwest::Error),
    /// Failed to build the endpoint URL.
    #[error("failed to build endpoint URL")]
    Url(#[from] url::ParseError),
    /// Server returned an error.
    #[error("server returned an error")]
    Response(#[from] response::Error),
    /// The request was rejected before it was sent.
    #[error("invalid request")]
    Validation(#[from] ValidationError),
    /// The card is not part of the tree returned by the server.
    #[error("card {0} not found")]
    NotFound(CardId),
}

impl Error {
    /// Returns the message the server attached to a failed response, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Response(e) => e.message(),
            _ => None,
        }
    }
}

/// Error for requests that are rejected locally, without a network round trip.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ValidationError {
    #[error("Please enter a card name")]
    EmptyName,
    #[error("Please select a video file")]
    MissingVideoFile,
    #[error("Video file size must be less than 10GB")]
    VideoTooLarge,
    #[error("Please enter a comment")]
    EmptyComment,
}
