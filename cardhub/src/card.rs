//! Module for card resources.
//!
//! Cards form a rooted forest: folders (`type = card`) hold an ordered list of children, files
//! (`type = file`) are always leaves. The client never mutates a tree locally, every change goes
//! through a request and the tree is fetched again afterwards.

use crate::util::deserialize_optional;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub use request::*;

mod request;

/// The identifier of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl CardId {
    /// Returns the path of the detail view of this card, e.g. `/card/3`.
    pub fn view_path(self) -> String {
        format!("/card/{}", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CardId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for CardId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// The type of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    /// A folder that can contain other cards.
    Card,
    /// A leaf pointing to an external link.
    File,
}

impl Default for CardType {
    fn default() -> Self {
        Self::Card
    }
}

impl CardType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::File => "file",
        }
    }

    /// Returns whether cards of this type may have children.
    pub fn is_container(self) -> bool {
        self == Self::Card
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown card type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown card type `{0}`")]
pub struct ParseCardTypeError(pub String);

impl FromStr for CardType {
    type Err = ParseCardTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "file" => Ok(Self::File),
            other => Err(ParseCardTypeError(other.to_owned())),
        }
    }
}

/// A card resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Card {
    pub id: CardId,
    #[serde(rename = "type", default)]
    pub ty: CardType,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub link: String,
    #[serde(default)]
    pub parent_id: Option<CardId>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub children: Vec<Card>,
}

impl Card {
    /// Returns the link of the card if one is assigned.
    ///
    /// Blank links count as unassigned.
    pub fn link(&self) -> Option<&str> {
        non_blank(&self.link)
    }

    pub fn is_file(&self) -> bool {
        self.ty == CardType::File
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// The complete card tree as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct CardTree {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub cards: Vec<Card>,
}

impl CardTree {
    /// Searches the tree depth-first for the card with the given id.
    pub fn find_by_id(&self, id: CardId) -> Option<&Card> {
        find_by_id(&self.cards, id)
    }

    /// Returns an iterator over all cards in depth-first pre-order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![self.cards.iter()],
        }
    }

    /// Returns the total number of cards in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<'a> IntoIterator for &'a CardTree {
    type Item = &'a Card;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Searches a list of cards and their descendants for the card with the given id.
///
/// Ids are unique across the whole tree, so the first match is the only one.
pub fn find_by_id(cards: &[Card], id: CardId) -> Option<&Card> {
    for card in cards {
        if card.id == id {
            return Some(card);
        }
        if let Some(found) = find_by_id(&card.children, id) {
            return Some(found);
        }
    }
    None
}

/// Depth-first iterator over a [`CardTree`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    stack: Vec<std::slice::Iter<'a, Card>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Card;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(card) => {
                    self.stack.push(card.children.iter());
                    return Some(card);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
