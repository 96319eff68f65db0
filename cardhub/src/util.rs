use crate::response::{self, ErrorBody, Outcome};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

pub fn deserialize_optional<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let value: Option<T> = Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[async_trait]
pub trait ResponseExt {
    async fn parse<T: DeserializeOwned>(self) -> crate::Result<T>;
    async fn parse_outcome(self) -> crate::Result<()>;
}

#[async_trait]
impl ResponseExt for reqwest::Response {
    async fn parse<T: DeserializeOwned>(self) -> crate::Result<T> {
        if self.status().is_success() {
            Ok(self.json().await?)
        } else {
            Err(status_error(self).await.into())
        }
    }

    async fn parse_outcome(self) -> crate::Result<()> {
        if self.status().is_success() {
            let outcome = self.json::<Outcome>().await?;
            Ok(outcome.into_result()?)
        } else {
            Err(status_error(self).await.into())
        }
    }
}

async fn status_error(response: reqwest::Response) -> response::Error {
    let status = response.status();
    // Error pages are not always JSON, so a body that fails to decode only loses the message.
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => None,
    };
    let message = match status {
        StatusCode::PAYLOAD_TOO_LARGE => {
            Some("File too large: Maximum size is 10GB".to_owned())
        }
        _ => message,
    };
    tracing::warn!(%status, ?message, "server returned an error status");
    response::Error::Status { status, message }
}
