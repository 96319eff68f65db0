//! The video gallery.

use crate::backend::Backend;
use crate::modal::Confirmation;
use cardhub::video::{self, Reaction, ReactionCounts, Video, VideoId};
use cardhub::{Error, Result};
use url::Url;

/// Controller of the video gallery page and its player modal.
#[derive(Debug)]
pub struct Gallery<B> {
    backend: B,
    origin: Url,
    videos: Vec<Video>,
    current: Option<VideoId>,
}

impl<B: Backend> Gallery<B> {
    /// Creates a gallery for the site served at `origin`.
    pub fn new(backend: B, origin: Url) -> Self {
        Self {
            backend,
            origin,
            videos: Vec::new(),
            current: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetches the list of videos.
    pub async fn load(&mut self) -> Result<()> {
        self.videos = self.backend.videos().await?;
        tracing::debug!(count = self.videos.len(), "videos loaded");
        Ok(())
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn video(&self, id: VideoId) -> Option<&Video> {
        self.videos.iter().find(|video| video.id == id)
    }

    fn video_mut(&mut self, id: VideoId) -> Option<&mut Video> {
        self.videos.iter_mut().find(|video| video.id == id)
    }

    /// Returns the video shown in the player.
    pub fn current(&self) -> Option<&Video> {
        self.current.and_then(|id| self.video(id))
    }

    /// Shows a video in the player and records a view.
    ///
    /// The list is refreshed first so the player shows current counters and comments.
    pub async fn open(&mut self, id: VideoId) -> Result<()> {
        self.load().await?;
        if self.video(id).is_none() {
            return Err(Error::Response(cardhub::response::Error::Rejected {
                message: Some("Video not found".to_owned()),
            }));
        }
        self.current = Some(id);
        match self.backend.view_video(id).await {
            Ok(count) => {
                if let Some(video) = self.video_mut(id) {
                    video.views = count.views;
                }
            }
            Err(e) => tracing::warn!(error = %e, %id, "failed to record view"),
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub async fn react(&mut self, id: VideoId, reaction: Reaction) -> Result<ReactionCounts> {
        let counts = self.backend.react_to_video(id, reaction).await?;
        if let Some(video) = self.video_mut(id) {
            video.likes = counts.likes;
            video.dislikes = counts.dislikes;
        }
        Ok(counts)
    }

    /// Comments on the current video and refreshes its comments.
    ///
    /// Does nothing if no video is shown.
    pub async fn comment(&mut self, author: &str, text: &str) -> Result<()> {
        let id = match self.current {
            Some(id) => id,
            None => return Ok(()),
        };
        let request = video::AddComment::builder()
            .id(id)
            .author(author.trim())
            .text(text.trim())
            .build();
        request.validate()?;
        self.backend.comment_on_video(request).await?;
        self.load().await
    }

    /// The prompt shown before a video is deleted.
    pub fn delete_confirmation(&self, id: VideoId) -> Confirmation<VideoId> {
        Confirmation {
            title: "Delete Confirmation".to_owned(),
            message: "Are you sure you want to delete this video? This action cannot be undone."
                .to_owned(),
            confirm_label: "Delete".to_owned(),
            cancel_label: "Cancel".to_owned(),
            action: id,
        }
    }

    /// Deletes a video after the prompt was confirmed.
    pub async fn delete(&mut self, id: VideoId) -> Result<()> {
        self.backend.delete_video(id).await?;
        self.videos.retain(|video| video.id != id);
        if self.current == Some(id) {
            self.current = None;
        }
        Ok(())
    }

    /// Validates and uploads a video, then adds it to the list.
    pub async fn upload(&mut self, request: video::Upload) -> Result<&Video> {
        request.validate()?;
        let video = self.backend.upload_video(request).await?;
        tracing::info!(id = %video.id, title = %video.title, "video uploaded");
        self.videos.insert(0, video);
        Ok(&self.videos[0])
    }

    /// Returns the link that shares a video, e.g. `https://example.org/videos#video-3`.
    pub fn share_url(&self, id: VideoId) -> Result<Url> {
        let mut url = self.origin.join("/videos")?;
        url.set_fragment(Some(&format!("video-{}", id)));
        Ok(url)
    }
}
