use crate::response::{self, Outcome};
use crate::video::{Comment, Reaction, ReactionCounts, Video, VideoId, VideoList, ViewCount};
use crate::{util::ResponseExt, Client, Error, Request, ValidationError};
use futures_core::future::BoxFuture;
use reqwest::{multipart, Method};
use serde::Deserialize;
use serde_json::json;
use typed_builder::TypedBuilder;

/// The largest video the server accepts.
pub const MAX_VIDEO_SIZE: u64 = 10 * 1024 * 1024 * 1024;

fn missing(field: &str) -> Error {
    response::Error::Rejected {
        message: Some(format!("response is missing `{}`", field)),
    }
    .into()
}

/// A [`Request`] for retrieving all videos.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GetAll;

impl<'request, 'client: 'request> Request<'request, 'client> for GetAll {
    type Output = BoxFuture<'request, crate::Result<Vec<Video>>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            let list = client
                .request(Method::GET, "api/videos")?
                .send()
                .await?
                .parse::<VideoList>()
                .await?;
            Ok(list.videos)
        })
    }
}

/// A [`Request`] for uploading a video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TypedBuilder)]
pub struct Upload {
    #[builder(default = "Untitled Video".to_owned(), setter(into))]
    pub title: String,
    #[builder(default, setter(into))]
    pub description: String,
    #[builder(setter(into))]
    pub file_name: String,
    pub data: Vec<u8>,
}

impl Upload {
    /// Checks the request without sending it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_video_file(&self.file_name, self.data.len() as u64)
    }
}

/// Checks a selected video file before it is uploaded.
pub fn validate_video_file(file_name: &str, size: u64) -> Result<(), ValidationError> {
    if file_name.trim().is_empty() || size == 0 {
        return Err(ValidationError::MissingVideoFile);
    }
    if size > MAX_VIDEO_SIZE {
        return Err(ValidationError::VideoTooLarge);
    }
    Ok(())
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(flatten)]
    outcome: Outcome,
    #[serde(default)]
    video: Option<Video>,
}

impl<'request, 'client: 'request> Request<'request, 'client> for Upload {
    type Output = BoxFuture<'request, crate::Result<Video>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            self.validate()?;
            let part = multipart::Part::bytes(self.data.clone()).file_name(self.file_name.clone());
            let form = multipart::Form::new()
                .text("title", self.title.clone())
                .text("description", self.description.clone())
                .part("video", part);
            let response = client
                .request(Method::POST, "api/videos")?
                .multipart(form)
                .send()
                .await?
                .parse::<UploadResponse>()
                .await?;
            response.outcome.into_result()?;
            response.video.ok_or_else(|| missing("video"))
        })
    }
}

/// A [`Request`] for deleting a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TypedBuilder)]
pub struct Delete {
    pub id: VideoId,
}

impl<'request, 'client: 'request> Request<'request, 'client> for Delete {
    type Output = BoxFuture<'request, crate::Result<()>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            client
                .request(Method::DELETE, "api/videos")?
                .query(&[("id", self.id)])
                .send()
                .await?
                .parse_outcome()
                .await
        })
    }
}

#[derive(Deserialize)]
struct ViewResponse {
    #[serde(flatten)]
    outcome: Outcome,
    #[serde(default)]
    views: u64,
}

/// A [`Request`] for recording a view of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TypedBuilder)]
pub struct View {
    pub id: VideoId,
}

impl<'request, 'client: 'request> Request<'request, 'client> for View {
    type Output = BoxFuture<'request, crate::Result<ViewCount>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            let response = client
                .request(Method::POST, &format!("api/videos/{}/view", self.id))?
                .send()
                .await?
                .parse::<ViewResponse>()
                .await?;
            response.outcome.into_result()?;
            Ok(ViewCount {
                views: response.views,
            })
        })
    }
}

#[derive(Deserialize)]
struct ReactResponse {
    #[serde(flatten)]
    outcome: Outcome,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    dislikes: u64,
}

/// A [`Request`] for liking or disliking a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TypedBuilder)]
pub struct React {
    pub id: VideoId,
    pub reaction: Reaction,
}

impl<'request, 'client: 'request> Request<'request, 'client> for React {
    type Output = BoxFuture<'request, crate::Result<ReactionCounts>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            let response = client
                .request(Method::POST, &format!("api/videos/{}/react", self.id))?
                .json(&json!({ "reaction": self.reaction }))
                .send()
                .await?
                .parse::<ReactResponse>()
                .await?;
            response.outcome.into_result()?;
            Ok(ReactionCounts {
                likes: response.likes,
                dislikes: response.dislikes,
            })
        })
    }
}

#[derive(Deserialize)]
struct CommentResponse {
    #[serde(flatten)]
    outcome: Outcome,
    #[serde(default)]
    comment: Option<Comment>,
}

/// A [`Request`] for commenting on a video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, TypedBuilder)]
pub struct AddComment {
    pub id: VideoId,
    #[builder(default, setter(into))]
    pub author: String,
    #[builder(setter(into))]
    pub text: String,
}

impl AddComment {
    /// Checks the request without sending it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        Ok(())
    }

    /// Returns the author that is sent to the server.
    pub fn effective_author(&self) -> &str {
        match self.author.trim() {
            "" => "Anonymous",
            author => author,
        }
    }
}

impl<'request, 'client: 'request> Request<'request, 'client> for AddComment {
    type Output = BoxFuture<'request, crate::Result<Comment>>;
    fn send(&'request self, client: &'client Client) -> Self::Output {
        Box::pin(async move {
            self.validate()?;
            let response = client
                .request(Method::POST, &format!("api/videos/{}/comment", self.id))?
                .json(&json!({
                    "author": self.effective_author(),
                    "comment": self.text.trim(),
                }))
                .send()
                .await?
                .parse::<CommentResponse>()
                .await?;
            response.outcome.into_result()?;
            response.comment.ok_or_else(|| missing("comment"))
        })
    }
}
