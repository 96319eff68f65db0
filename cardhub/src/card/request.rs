use crate::card::{find_by_id, Card, CardId, CardTree, CardType};
use crate::{util::ResponseExt, Client, Error, Request, ValidationError};
use derive_setters::Setters;
use futures_core::future::BoxFuture;
use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use typed_builder::TypedBuilder;

/// A [`Request`] for retrieving the complete card tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GetTree;

impl<'request, 'client: 'request> Request<'request, 'client> for GetTree {
    type Output = BoxFuture<'request, crate::Result<CardTree>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            client
                .request(Method::GET, "api/cards")?
                .send()
                .await?
                .parse()
                .await
        })
    }
}

/// A [`Request`] for retrieving a single card.
///
/// The server has no endpoint for single cards, so the whole tree is fetched and searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TypedBuilder)]
pub struct Get {
    pub id: CardId,
}

impl<'request, 'client: 'request> Request<'request, 'client> for Get {
    type Output = BoxFuture<'request, crate::Result<Card>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            let tree = client.send(&GetTree).await?;
            find_by_id(&tree.cards, self.id)
                .cloned()
                .ok_or(Error::NotFound(self.id))
        })
    }
}

/// A [`Request`] for creating a card or a file.
///
/// A blank name is replaced by a default depending on the kind of card that is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TypedBuilder)]
pub struct Create {
    #[builder(default, setter(into))]
    pub name: String,
    #[builder(default)]
    pub ty: CardType,
    #[builder(default, setter(into))]
    pub subtitle: String,
    #[builder(default, setter(into))]
    pub link: String,
    #[builder(default, setter(strip_option))]
    pub parent_id: Option<CardId>,
}

impl Create {
    /// A request creating an empty folder below `parent_id`.
    pub fn folder(parent_id: Option<CardId>) -> Self {
        Self {
            name: String::new(),
            ty: CardType::Card,
            subtitle: String::new(),
            link: String::new(),
            parent_id,
        }
    }

    /// A request creating a file without a link below `parent_id`.
    pub fn file(parent_id: Option<CardId>) -> Self {
        Self {
            ty: CardType::File,
            ..Self::folder(parent_id)
        }
    }

    /// Returns the name that is sent to the server.
    pub fn effective_name(&self) -> &str {
        let name = self.name.trim();
        if !name.is_empty() {
            return &self.name;
        }
        match (self.ty, self.parent_id) {
            (CardType::File, _) => "New File",
            (CardType::Card, Some(_)) => "New Sub-Folder",
            (CardType::Card, None) => "New Folder",
        }
    }
}

#[derive(Serialize)]
struct CreateBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    ty: CardType,
    subtitle: &'a str,
    link: &'a str,
    parent_id: Option<CardId>,
}

impl<'request, 'client: 'request> Request<'request, 'client> for Create {
    type Output = BoxFuture<'request, crate::Result<()>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            let body = CreateBody {
                name: self.effective_name(),
                ty: self.ty,
                subtitle: &self.subtitle,
                link: &self.link,
                parent_id: self.parent_id,
            };
            client
                .request(Method::POST, "api/cards")?
                .json(&body)
                .send()
                .await?
                .parse_outcome()
                .await
        })
    }
}

/// A [`Request`] for modifying a card in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TypedBuilder, Setters)]
#[setters(into, prefix = "with_")]
pub struct Modify {
    #[setters(skip)]
    pub id: CardId,
    #[builder(setter(into))]
    pub name: String,
    #[builder(default, setter(into))]
    pub subtitle: String,
    #[builder(default, setter(into))]
    pub link: String,
}

impl Modify {
    /// Starts a modification with the current values of `card`.
    pub fn inherit(card: &Card) -> Self {
        Self {
            id: card.id,
            name: card.name.clone(),
            subtitle: card.subtitle.clone(),
            link: card.link.clone(),
        }
    }

    /// Checks the request without sending it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }
}

impl<'request, 'client: 'request> Request<'request, 'client> for Modify {
    type Output = BoxFuture<'request, crate::Result<()>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            self.validate()?;
            client
                .request(Method::PUT, "api/cards")?
                .json(&json!({
                    "id": self.id,
                    "name": self.name,
                    "subtitle": self.subtitle,
                    "link": self.link,
                }))
                .send()
                .await?
                .parse_outcome()
                .await
        })
    }
}

/// A [`Request`] for deleting a card.
///
/// The server removes all descendants of the card as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TypedBuilder)]
pub struct Delete {
    pub id: CardId,
}

impl<'request, 'client: 'request> Request<'request, 'client> for Delete {
    type Output = BoxFuture<'request, crate::Result<()>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            client
                .request(Method::DELETE, "api/cards")?
                .query(&[("id", self.id)])
                .send()
                .await?
                .parse_outcome()
                .await
        })
    }
}
