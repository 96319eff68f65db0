//! The seam between the interactive components and the catalog API.

use async_trait::async_trait;
use cardhub::card::{self, CardId, CardTree};
use cardhub::search::{Search, SearchResults};
use cardhub::video::{self, Comment, Reaction, ReactionCounts, Video, VideoId, ViewCount};
use cardhub::{Client, LoginData, Result};

/// Trait for the server side of the page.
///
/// Implemented by [`cardhub::Client`]; tests substitute a recording fake.
#[async_trait(?Send)]
pub trait Backend {
    async fn card_tree(&self) -> Result<CardTree>;
    async fn create_card(&self, request: card::Create) -> Result<()>;
    async fn modify_card(&self, request: card::Modify) -> Result<()>;
    async fn delete_card(&self, id: CardId) -> Result<()>;
    async fn search(&self, query: String) -> Result<SearchResults>;
    async fn login(&self, data: LoginData) -> Result<()>;

    async fn videos(&self) -> Result<Vec<Video>>;
    async fn upload_video(&self, request: video::Upload) -> Result<Video>;
    async fn delete_video(&self, id: VideoId) -> Result<()>;
    async fn view_video(&self, id: VideoId) -> Result<ViewCount>;
    async fn react_to_video(&self, id: VideoId, reaction: Reaction) -> Result<ReactionCounts>;
    async fn comment_on_video(&self, request: video::AddComment) -> Result<Comment>;
}

#[async_trait(?Send)]
impl Backend for Client {
    async fn card_tree(&self) -> Result<CardTree> {
        self.send(&card::GetTree).await
    }

    async fn create_card(&self, request: card::Create) -> Result<()> {
        self.send(&request).await
    }

    async fn modify_card(&self, request: card::Modify) -> Result<()> {
        self.send(&request).await
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        self.send(&card::Delete { id }).await
    }

    async fn search(&self, query: String) -> Result<SearchResults> {
        self.send(&Search::new(query)).await
    }

    async fn login(&self, data: LoginData) -> Result<()> {
        Client::login(self, &data).await
    }

    async fn videos(&self) -> Result<Vec<Video>> {
        self.send(&video::GetAll).await
    }

    async fn upload_video(&self, request: video::Upload) -> Result<Video> {
        self.send(&request).await
    }

    async fn delete_video(&self, id: VideoId) -> Result<()> {
        self.send(&video::Delete { id }).await
    }

    async fn view_video(&self, id: VideoId) -> Result<ViewCount> {
        self.send(&video::View { id }).await
    }

    async fn react_to_video(&self, id: VideoId, reaction: Reaction) -> Result<ReactionCounts> {
        self.send(&video::React { id, reaction }).await
    }

    async fn comment_on_video(&self, request: video::AddComment) -> Result<Comment> {
        self.send(&request).await
    }
}
