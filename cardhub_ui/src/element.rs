//! Card elements as exposed by the server-rendered markup.

use cardhub::card::{Card, CardId, CardType, ParseCardTypeError};
use cardhub::search::SearchResult;
use thiserror::Error;

/// Error that can occur while reading a card element from its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error("missing attribute `{0}`")]
    Missing(&'static str),
    #[error("invalid value `{value}` for attribute `{attribute}`")]
    Invalid {
        attribute: &'static str,
        value: String,
    },
    #[error(transparent)]
    Type(#[from] ParseCardTypeError),
}

/// The data an interactive card element carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardElement {
    pub id: CardId,
    pub ty: CardType,
    /// The assigned link. `None` if the attribute is absent or blank.
    pub link: Option<String>,
    pub parent_id: Option<CardId>,
    pub has_children: bool,
    /// The display name, if the element shows one.
    pub name: Option<String>,
}

impl CardElement {
    /// Reads an element from its `data-*` attributes.
    ///
    /// Recognised attributes are `data-id`, `data-type`, `data-link`, `data-parent-id`,
    /// `data-has-children` and `data-name`. Unknown attributes are ignored.
    pub fn from_attributes<'a, I>(attributes: I) -> Result<Self, ElementError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut id = None;
        let mut ty = CardType::Card;
        let mut link = None;
        let mut parent_id = None;
        let mut has_children = false;
        let mut name = None;
        for (attribute, value) in attributes {
            match attribute {
                "data-id" => id = Some(parse_id("data-id", value)?),
                "data-type" => ty = value.trim().parse()?,
                "data-link" => link = non_blank(value),
                "data-parent-id" => {
                    // Root cards render an empty or `None` parent.
                    parent_id = match value.trim() {
                        "" | "None" | "null" => None,
                        value => Some(parse_id("data-parent-id", value)?),
                    }
                }
                "data-has-children" => has_children = value.trim() == "true",
                "data-name" => name = non_blank(value),
                _ => {}
            }
        }
        Ok(Self {
            id: id.ok_or(ElementError::Missing("data-id"))?,
            ty,
            link,
            parent_id,
            has_children,
            name,
        })
    }

    /// Returns the name used in user facing messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(match self.ty {
            CardType::File => "This file",
            CardType::Card => "Item",
        })
    }

    /// Returns what activating the element does.
    ///
    /// Files open their link, or report that none is assigned; folders navigate to their
    /// detail view.
    pub fn activation(&self) -> Activation {
        match self.ty {
            CardType::File => match &self.link {
                Some(link) => Activation::OpenLink(link.clone()),
                None => Activation::FileLinkError {
                    name: self.display_name().to_owned(),
                },
            },
            CardType::Card => Activation::Navigate(self.id.view_path()),
        }
    }
}

impl From<&Card> for CardElement {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            ty: card.ty,
            link: card.link().map(str::to_owned),
            parent_id: card.parent_id,
            has_children: card.has_children(),
            name: non_blank(&card.name),
        }
    }
}

impl From<&SearchResult> for CardElement {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id,
            ty: result.ty,
            link: result.link().map(str::to_owned),
            parent_id: None,
            has_children: false,
            name: non_blank(&result.name),
        }
    }
}

/// The outcome of activating a card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Activation {
    /// Navigate to a path of the catalog.
    Navigate(String),
    /// Open an external link in a new browsing context.
    OpenLink(String),
    /// The file has no link; show the file-link error surface naming it.
    FileLinkError { name: String },
}

fn parse_id(attribute: &'static str, value: &str) -> Result<CardId, ElementError> {
    value.parse().map_err(|_| ElementError::Invalid {
        attribute,
        value: value.to_owned(),
    })
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
