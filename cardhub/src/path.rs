//! Module for hierarchical card paths.
//!
//! The server describes the position of a card as the names of its ancestors and the card
//! itself joined with `/`, e.g. `Soil/Samples/Results`.

use serde::{Deserialize, Serialize};
use std::{fmt, iter::FusedIterator};

const SEPARATOR: char = '/';

#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: std::str::Split<'a, char>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a> FusedIterator for Iter<'a> {}

/// The path of a card inside the tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CardPath {
    inner: String,
}

impl AsRef<str> for CardPath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<String> for CardPath {
    fn from(value: String) -> Self {
        Self { inner: value }
    }
}

impl From<&str> for CardPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CardPath> for String {
    fn from(value: CardPath) -> Self {
        value.inner
    }
}

impl fmt::Display for CardPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

impl<'a> IntoIterator for &'a CardPath {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl CardPath {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self { inner: s.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the path of the parent folder, or `None` for root level cards.
    pub fn parent(&self) -> Option<&str> {
        self.inner.rsplit_once(SEPARATOR).map(|v| v.0)
    }

    /// Returns the name of the card the path points to.
    pub fn name(&self) -> &str {
        match self.inner.rsplit_once(SEPARATOR) {
            Some((_, name)) => name,
            None => &self.inner,
        }
    }

    /// Returns the nesting depth; root level cards have depth 1.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    pub fn push<S: AsRef<str>>(&mut self, name: S) {
        if !self.inner.is_empty() {
            self.inner.push(SEPARATOR);
        }
        self.inner.push_str(name.as_ref());
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.inner.split(SEPARATOR),
        }
    }

    pub fn into_string(self) -> String {
        self.inner
    }
}
