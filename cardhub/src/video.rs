//! Module for video gallery resources.
//!
//! Videos are unrelated to the card tree. They carry their own counters and an ordered list of
//! comments, and are changed through dedicated endpoints.

use crate::util::deserialize_optional;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use request::*;

mod request;

/// The identifier of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VideoId(pub i64);

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A video resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub description: String,
    pub filename: String,
    pub upload_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub comments: Vec<Comment>,
}

impl Video {
    /// Returns the path the video file is served from.
    pub fn source_path(&self) -> String {
        format!("/static/uploads/videos/{}", self.filename)
    }
}

/// A comment on a video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Comment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub author: String,
    pub text: String,
    pub timestamp: Option<NaiveDateTime>,
}

impl Comment {
    /// Returns the author, or `Anonymous` if the comment has none.
    pub fn author(&self) -> &str {
        if self.author.trim().is_empty() {
            "Anonymous"
        } else {
            &self.author
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub(crate) struct VideoList {
    #[serde(default, deserialize_with = "deserialize_optional")]
    pub videos: Vec<Video>,
}

/// A reaction to a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

/// The reaction counters of a video after a reaction was recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReactionCounts {
    pub likes: u64,
    pub dislikes: u64,
}

/// The view counter of a video after a view was recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ViewCount {
    pub views: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_timestamps() {
        let list: VideoList = serde_json::from_str(
            r#"{"videos": [{
                "id": 1, "title": "Field day", "description": "", "filename": "ab12.mp4",
                "upload_date": "2024-03-01T10:15:30.123456", "views": 3, "likes": 1, "dislikes": 0,
                "comments": [{"id": 1, "author": "", "text": "Nice", "timestamp": "2024-03-02T08:00:00"}]
            }]}"#,
        )
        .unwrap();
        let video = &list.videos[0];
        assert!(video.upload_date.is_some());
        assert_eq!(video.source_path(), "/static/uploads/videos/ab12.mp4");
        assert_eq!(video.comments[0].author(), "Anonymous");
    }
}
