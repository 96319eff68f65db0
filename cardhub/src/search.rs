//! Module for the free-text card search.

use crate::card::{non_blank, CardId, CardType};
use crate::path::CardPath;
use crate::util::deserialize_optional;
use serde::{Deserialize, Serialize};

pub use request::*;

mod request;

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: CardId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub ty: CardType,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub subtitle: String,
    #[serde(default)]
    pub path: CardPath,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub link: String,
}

impl SearchResult {
    /// Returns the link of the result if one is assigned.
    pub fn link(&self) -> Option<&str> {
        non_blank(&self.link)
    }

    /// Returns whether the result is a file that cannot be opened.
    pub fn is_file_without_link(&self) -> bool {
        self.ty == CardType::File && self.link().is_none()
    }
}

/// The ranked results of a search.
///
/// For queries shorter than two characters the server only answers `{"results": []}`, so all
/// fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct SearchResults {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub query: String,
    #[serde(default)]
    pub count: usize,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
