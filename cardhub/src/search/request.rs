use crate::search::SearchResults;
use crate::{util::ResponseExt, Client, Request};
use futures_core::future::BoxFuture;
use reqwest::Method;
use typed_builder::TypedBuilder;

/// A [`Request`] for searching cards by name and subtitle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TypedBuilder)]
pub struct Search {
    #[builder(setter(into))]
    pub query: String,
}

impl Search {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
        }
    }
}

impl<'request, 'client: 'request> Request<'request, 'client> for Search {
    type Output = BoxFuture<'request, crate::Result<SearchResults>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            client
                .request(Method::GET, "api/search")?
                .query(&[("q", &self.query)])
                .send()
                .await?
                .parse()
                .await
        })
    }
}
