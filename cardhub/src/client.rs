use crate::util::ResponseExt;
use crate::{LoginData, Request, Result, Urls};
use reqwest::{Method, RequestBuilder};

/// A client used for interacting with the catalog API.
///
/// The session established by [`Client::login`] lives in the cookie store of the client, so
/// clones of a logged in client share the session.
///
/// # Example
///
/// ```ignore
/// use cardhub::{card, Client, LoginData, Urls};
///
/// let client = Client::new(Urls::parse("http://localhost:5000/")?)?;
/// client.login(&LoginData::new("admin", "secret")).await?;
/// let tree = client.send(&card::GetTree).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    urls: Urls,
}

impl Client {
    /// Creates a new [`Client`] with its own cookie store.
    pub fn new(urls: Urls) -> Result<Self> {
        let client = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_http_client(client, urls))
    }

    /// Creates a new [`Client`] from an already configured [`reqwest::Client`].
    pub fn with_http_client(client: reqwest::Client, urls: Urls) -> Self {
        Self { client, urls }
    }

    /// Returns the URLs of the API endpoints.
    pub fn urls(&self) -> &Urls {
        &self.urls
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.urls.endpoint(path)?;
        tracing::debug!(%method, %url, "sending request");
        Ok(self.client.request(method, url))
    }

    /// Authenticates against the server. On success the session cookie is stored in the client.
    pub async fn login(&self, data: &LoginData) -> Result<()> {
        self.request(Method::POST, "login")?
            .json(data)
            .send()
            .await?
            .parse_outcome()
            .await
    }

    /// Ends the session. The server answers with a redirect which is followed.
    pub async fn logout(&self) -> Result<()> {
        let response = self.request(Method::GET, "logout")?.send().await?;
        response.error_for_status()?;
        Ok(())
    }

    pub fn send<'request, 'client, R>(&'client self, request: &'request R) -> R::Output
    where
        R: Request<'request, 'client>,
    {
        request.send(self)
    }
}
