#![allow(dead_code)]

use async_trait::async_trait;
use cardhub::card::{self, Card, CardId, CardTree, CardType};
use cardhub::path::CardPath;
use cardhub::response;
use cardhub::search::{SearchResult, SearchResults};
use cardhub::video::{self, Comment, Reaction, ReactionCounts, Video, VideoId, ViewCount};
use cardhub::{Error, LoginData, Result};
use cardhub_ui::backend::Backend;
use cardhub_ui::element::CardElement;
use cardhub_ui::host::{Effect, Host};
use cardhub_ui::interaction::{Gesture, Key};
use cardhub_ui::page::{Page, UiEvent};
use cardhub_ui::ClientConfig;
use std::cell::RefCell;
use std::time::Duration;

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// A call received by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CardTree,
    Create(card::Create),
    Modify(card::Modify),
    Delete(CardId),
    Search(String),
    Login(LoginData),
    Videos,
    Upload(String),
    DeleteVideo(VideoId),
    View(VideoId),
    React(VideoId, Reaction),
    Comment(video::AddComment),
}

/// An in-memory backend that records every call.
pub struct FakeBackend {
    calls: RefCell<Vec<Call>>,
    tree: CardTree,
    videos: RefCell<Vec<Video>>,
    rejection: RefCell<Option<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            tree: default_tree(),
            videos: RefCell::new(default_videos()),
            rejection: RefCell::new(None),
        }
    }
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Makes every mutation fail with `message`, like a `{success: false}` reply.
    pub fn reject_with(&self, message: &str) {
        *self.rejection.borrow_mut() = Some(message.to_owned());
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn outcome(&self) -> Result<()> {
        match self.rejection.borrow().as_ref() {
            Some(message) => Err(Error::Response(response::Error::Rejected {
                message: Some(message.clone()),
            })),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn card_tree(&self) -> Result<CardTree> {
        self.record(Call::CardTree);
        Ok(self.tree.clone())
    }

    async fn create_card(&self, request: card::Create) -> Result<()> {
        self.record(Call::Create(request));
        self.outcome()
    }

    async fn modify_card(&self, request: card::Modify) -> Result<()> {
        self.record(Call::Modify(request));
        self.outcome()
    }

    async fn delete_card(&self, id: CardId) -> Result<()> {
        self.record(Call::Delete(id));
        self.outcome()
    }

    async fn search(&self, query: String) -> Result<SearchResults> {
        self.record(Call::Search(query.clone()));
        let needle = query.to_lowercase();
        let mut results = Vec::new();
        collect_matches(&self.tree.cards, &CardPath::default(), &needle, &mut results);
        Ok(SearchResults {
            query,
            count: results.len(),
            results,
        })
    }

    async fn login(&self, data: LoginData) -> Result<()> {
        let valid = data.username == "admin" && data.password == "secret";
        self.record(Call::Login(data));
        if valid {
            Ok(())
        } else {
            Err(Error::Response(response::Error::Rejected {
                message: Some("Invalid credentials".to_owned()),
            }))
        }
    }

    async fn videos(&self) -> Result<Vec<Video>> {
        self.record(Call::Videos);
        Ok(self.videos.borrow().clone())
    }

    async fn upload_video(&self, request: video::Upload) -> Result<Video> {
        self.record(Call::Upload(request.title.clone()));
        let mut videos = self.videos.borrow_mut();
        let video = Video {
            id: VideoId(videos.len() as i64 + 1),
            title: request.title,
            description: request.description,
            filename: format!("upload_{}", request.file_name),
            upload_date: None,
            views: 0,
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
        };
        videos.push(video.clone());
        Ok(video)
    }

    async fn delete_video(&self, id: VideoId) -> Result<()> {
        self.record(Call::DeleteVideo(id));
        self.videos.borrow_mut().retain(|video| video.id != id);
        Ok(())
    }

    async fn view_video(&self, id: VideoId) -> Result<ViewCount> {
        self.record(Call::View(id));
        let mut videos = self.videos.borrow_mut();
        let video = find_video(&mut videos, id)?;
        video.views += 1;
        Ok(ViewCount { views: video.views })
    }

    async fn react_to_video(&self, id: VideoId, reaction: Reaction) -> Result<ReactionCounts> {
        self.record(Call::React(id, reaction));
        let mut videos = self.videos.borrow_mut();
        let video = find_video(&mut videos, id)?;
        match reaction {
            Reaction::Like => video.likes += 1,
            Reaction::Dislike => video.dislikes += 1,
        }
        Ok(ReactionCounts {
            likes: video.likes,
            dislikes: video.dislikes,
        })
    }

    async fn comment_on_video(&self, request: video::AddComment) -> Result<Comment> {
        self.record(Call::Comment(request.clone()));
        let mut videos = self.videos.borrow_mut();
        let video = find_video(&mut videos, request.id)?;
        let comment = Comment {
            id: Some(video.comments.len() as i64 + 1),
            author: request.effective_author().to_owned(),
            text: request.text.clone(),
            timestamp: None,
        };
        video.comments.push(comment.clone());
        Ok(comment)
    }
}

fn find_video(videos: &mut [Video], id: VideoId) -> Result<&mut Video> {
    videos
        .iter_mut()
        .find(|video| video.id == id)
        .ok_or_else(|| {
            Error::Response(response::Error::Rejected {
                message: Some("Video not found".to_owned()),
            })
        })
}

fn collect_matches(cards: &[Card], parent: &CardPath, needle: &str, out: &mut Vec<SearchResult>) {
    for card in cards {
        let mut path = parent.clone();
        path.push(&card.name);
        if card.name.to_lowercase().contains(needle) || card.subtitle.to_lowercase().contains(needle)
        {
            out.push(SearchResult {
                id: card.id,
                name: card.name.clone(),
                ty: card.ty,
                subtitle: card.subtitle.clone(),
                path: path.clone(),
                link: card.link.clone(),
            });
        }
        collect_matches(&card.children, &path, needle, out);
    }
}

fn node(id: i64, ty: CardType, name: &str, link: &str, parent: Option<i64>, children: Vec<Card>) -> Card {
    Card {
        id: CardId(id),
        ty,
        name: name.to_owned(),
        subtitle: String::new(),
        link: link.to_owned(),
        parent_id: parent.map(CardId),
        children,
    }
}

/// `Soil Analysis (1) > [Lab Manual (2, file), Samples (3) > [Soil results (4, file, no link)]]`,
/// `Water (5)`.
pub fn default_tree() -> CardTree {
    CardTree {
        cards: vec![
            node(
                1,
                CardType::Card,
                "Soil Analysis",
                "",
                None,
                vec![
                    node(
                        2,
                        CardType::File,
                        "Lab Manual",
                        "https://example.org/manual.pdf",
                        Some(1),
                        Vec::new(),
                    ),
                    node(
                        3,
                        CardType::Card,
                        "Samples",
                        "",
                        Some(1),
                        vec![node(4, CardType::File, "Soil results", "", Some(3), Vec::new())],
                    ),
                ],
            ),
            node(5, CardType::Card, "Water", "", None, Vec::new()),
        ],
    }
}

pub fn default_videos() -> Vec<Video> {
    vec![Video {
        id: VideoId(1),
        title: "Field day".to_owned(),
        description: "Sampling at the river".to_owned(),
        filename: "field_day.mp4".to_owned(),
        upload_date: None,
        views: 3,
        likes: 1,
        dislikes: 0,
        comments: Vec::new(),
    }]
}

/// A host that records effects.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub admin: bool,
    pub effects: Vec<Effect>,
}

impl Host for RecordingHost {
    fn is_admin(&self) -> bool {
        self.admin
    }

    fn perform(&mut self, effect: Effect) {
        self.effects.push(effect);
    }
}

pub type TestPage = Page<FakeBackend, RecordingHost>;

pub fn page(admin: bool) -> TestPage {
    let host = RecordingHost {
        admin,
        effects: Vec::new(),
    };
    Page::new(FakeBackend::default(), host, &ClientConfig::default())
}

/// The element of the card with `id` in [`default_tree`].
pub fn element(id: i64) -> CardElement {
    let tree = default_tree();
    let card = tree.find_by_id(CardId(id)).expect("card in default tree");
    CardElement::from(card)
}

pub fn click(element: &CardElement) -> UiEvent {
    UiEvent::Card {
        element: element.clone(),
        gesture: Gesture::Click { on_menu: false },
    }
}

pub fn key(element: &CardElement, key: &str) -> UiEvent {
    UiEvent::Card {
        element: element.clone(),
        gesture: Gesture::Key(Key::from_dom(key)),
    }
}

pub fn context_menu(element: &CardElement) -> UiEvent {
    UiEvent::Card {
        element: element.clone(),
        gesture: Gesture::ContextMenu,
    }
}
