#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

use serde::Serialize;
use url::Url;

pub use client::Client;
pub use error::{Error, ValidationError};

mod client;
mod error;
mod util;

pub mod card;
pub mod path;
pub mod response;
pub mod search;
pub mod video;

/// Type alias for `Result<T, Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Struct for specifying the URLs of API endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Urls {
    /// The origin the catalog is served from, e.g. `https://catalog.example.org/`.
    pub base: Url,
}

impl Urls {
    /// Creates a new [`Urls`] type for a server running at the given origin.
    ///
    /// | Endpoint     | URL                    |
    /// |--------------|------------------------|
    /// | cards        | *\<url\>*/api/cards    |
    /// | search       | *\<url\>*/api/search   |
    /// | videos       | *\<url\>*/api/videos   |
    /// | login        | *\<url\>*/login        |
    /// | logout       | *\<url\>*/logout       |
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Parses the origin and creates a new [`Urls`] type.
    pub fn parse(base: &str) -> std::result::Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(base)?))
    }

    pub(crate) fn endpoint(&self, path: &str) -> std::result::Result<Url, url::ParseError> {
        self.base.join(path)
    }

    /// Returns the absolute URL of the detail view of a card (*\<url\>*/card/{id}).
    pub fn card_view(&self, id: card::CardId) -> Result<Url, url::ParseError> {
        self.base.join(&id.view_path())
    }
}

/// A request that can be sent with a [`Client`].
pub trait Request<'request, 'client> {
    type Output;
    fn send(&'request self, client: &'client Client) -> Self::Output;
}

/// Data used for performing logins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LoginData {
    pub username: String,
    pub password: String,
}

impl LoginData {
    /// Creates a new [`LoginData`].
    pub fn new<U, P>(username: U, password: P) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_view_is_joined_to_the_origin() {
        let urls = Urls::parse("https://catalog.example.org/").unwrap();
        assert_eq!(
            urls.card_view(card::CardId(7)).unwrap().as_str(),
            "https://catalog.example.org/card/7"
        );
    }
}
