#![allow(dead_code)] // https://github.com/rust-lang/rust/issues/46379

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cardhub::{Client, LoginData, Urls};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
const SESSION_COOKIE: &str = "session=admin";

/// A request received by the stub server.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Value,
}

#[derive(Debug, Default)]
pub struct StubState {
    pub cards: Value,
    pub videos: Value,
    pub requests: Vec<Recorded>,
}

pub type Shared = Arc<Mutex<StubState>>;

/// An in-process stand-in for the catalog backend.
pub struct Stub {
    pub state: Shared,
    pub urls: Urls,
}

impl Stub {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(StubState {
            cards: default_cards(),
            videos: default_videos(),
            requests: Vec::new(),
        }));
        let app = Router::new()
            .route("/", get(|| async { "home" }))
            .route("/login", post(login))
            .route("/logout", get(logout))
            .route(
                "/api/cards",
                get(get_cards)
                    .post(create_card)
                    .put(modify_card)
                    .delete(delete_card),
            )
            .route("/api/search", get(search))
            .route(
                "/api/videos",
                get(get_videos).post(upload_video).delete(delete_video),
            )
            .route("/api/videos/:id/view", post(view_video))
            .route("/api/videos/:id/react", post(react_video))
            .route("/api/videos/:id/comment", post(comment_video))
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let urls = Urls::parse(&format!("http://{}/", addr)).unwrap();
        Self { state, urls }
    }

    pub fn client(&self) -> Client {
        Client::new(self.urls.clone()).unwrap()
    }

    pub async fn login(&self) -> Client {
        let client = self.client();
        client
            .login(&LoginData::new(USERNAME, PASSWORD))
            .await
            .unwrap();
        client
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|v| v.method == method && v.path == path)
            .collect()
    }
}

pub fn default_cards() -> Value {
    json!({"cards": [
        {"id": 1, "type": "card", "name": "Soil Analysis", "subtitle": "Field methods", "link": "",
         "parent_id": null, "children": [
            {"id": 2, "type": "file", "name": "Lab Manual", "subtitle": "", "link": "https://example.org/manual.pdf",
             "parent_id": 1, "children": []},
            {"id": 3, "type": "card", "name": "Samples", "subtitle": "", "link": "", "parent_id": 1, "children": [
                {"id": 4, "type": "file", "name": "Soil results", "subtitle": "", "link": "", "parent_id": 3, "children": []}
            ]}
        ]},
        {"id": 5, "type": "card", "name": "Water", "subtitle": "", "link": "", "parent_id": null, "children": []}
    ]})
}

pub fn default_videos() -> Value {
    json!({"videos": [
        {"id": 1, "title": "Field day", "description": "Sampling", "filename": "field.mp4",
         "upload_date": "2024-03-01T10:15:30.123456", "views": 0, "likes": 0, "dislikes": 0, "comments": []}
    ]})
}

fn record(state: &Shared, method: Method, path: &str, query: &HashMap<String, String>, body: Value) {
    state.lock().unwrap().requests.push(Recorded {
        method,
        path: path.to_owned(),
        query: query.clone(),
        body,
    });
}

fn is_admin(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "Unauthorized"}))).into_response()
}

fn card_not_found() -> Response {
    Json(json!({"success": false, "error": "Card not found"})).into_response()
}

fn find_mut(cards: &mut Value, id: i64) -> Option<&mut Value> {
    for card in cards.as_array_mut()? {
        if card["id"] == id {
            return Some(card);
        }
        if let Some(found) = find_mut(&mut card["children"], id) {
            return Some(found);
        }
    }
    None
}

fn remove(cards: &mut Value, id: i64) -> bool {
    let list = match cards.as_array_mut() {
        Some(v) => v,
        None => return false,
    };
    let before = list.len();
    list.retain(|v| v["id"] != id);
    if list.len() != before {
        return true;
    }
    list.iter_mut().any(|v| remove(&mut v["children"], id))
}

fn max_id(cards: &Value) -> i64 {
    cards
        .as_array()
        .map(|list| {
            list.iter()
                .map(|v| v["id"].as_i64().unwrap_or(0).max(max_id(&v["children"])))
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0)
}

fn index(cards: &Value, path: &str, out: &mut Vec<Value>) {
    for card in cards.as_array().into_iter().flatten() {
        let name = card["name"].as_str().unwrap_or_default();
        let card_path = if path.is_empty() {
            name.to_owned()
        } else {
            format!("{}/{}", path, name)
        };
        out.push(json!({
            "id": card["id"],
            "name": card["name"],
            "type": card["type"],
            "subtitle": card["subtitle"],
            "path": card_path,
            "link": card["link"],
        }));
        index(&card["children"], &card_path, out);
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    record(&state, Method::POST, "/login", &HashMap::new(), body.clone());
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        (
            [(header::SET_COOKIE, format!("{}; Path=/", SESSION_COOKIE))],
            Json(json!({"success": true})),
        )
            .into_response()
    } else {
        Json(json!({"success": false, "error": "Invalid credentials"})).into_response()
    }
}

async fn logout(State(state): State<Shared>) -> Response {
    record(&state, Method::GET, "/logout", &HashMap::new(), Value::Null);
    (
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0")],
        Redirect::to("/"),
    )
        .into_response()
}

async fn get_cards(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, Method::GET, "/api/cards", &HashMap::new(), Value::Null);
    if !is_admin(&headers) {
        return unauthorized();
    }
    Json(state.lock().unwrap().cards.clone()).into_response()
}

async fn create_card(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, Method::POST, "/api/cards", &HashMap::new(), body.clone());
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut guard = state.lock().unwrap();
    let id = max_id(&guard.cards["cards"]) + 1;
    let card = json!({
        "id": id,
        "name": body["name"],
        "subtitle": body["subtitle"],
        "link": body["link"],
        "type": body["type"],
        "parent_id": body["parent_id"],
        "children": [],
    });
    match body["parent_id"].as_i64() {
        Some(parent_id) => match find_mut(&mut guard.cards["cards"], parent_id) {
            Some(parent) => parent["children"].as_array_mut().unwrap().push(card.clone()),
            None => return Json(json!({"success": false, "error": "Parent not found"})).into_response(),
        },
        None => guard.cards["cards"].as_array_mut().unwrap().push(card.clone()),
    }
    Json(json!({"success": true, "card": card})).into_response()
}

async fn modify_card(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, Method::PUT, "/api/cards", &HashMap::new(), body.clone());
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut guard = state.lock().unwrap();
    let id = body["id"].as_i64().unwrap_or_default();
    match find_mut(&mut guard.cards["cards"], id) {
        Some(card) => {
            for field in ["name", "subtitle", "link"] {
                if !body[field].is_null() {
                    card[field] = body[field].clone();
                }
            }
            Json(json!({"success": true})).into_response()
        }
        None => card_not_found(),
    }
}

async fn delete_card(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, Method::DELETE, "/api/cards", &query, Value::Null);
    if !is_admin(&headers) {
        return unauthorized();
    }
    let id = query
        .get("id")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or_default();
    let mut guard = state.lock().unwrap();
    if remove(&mut guard.cards["cards"], id) {
        Json(json!({"success": true})).into_response()
    } else {
        card_not_found()
    }
}

async fn search(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, Method::GET, "/api/search", &query, Value::Null);
    let q = query.get("q").map(|v| v.trim().to_owned()).unwrap_or_default();
    if q.chars().count() < 2 {
        return Json(json!({"results": []})).into_response();
    }
    let needle = q.to_lowercase();
    let mut all = Vec::new();
    index(&state.lock().unwrap().cards["cards"], "", &mut all);
    let results = all
        .into_iter()
        .filter(|v| {
            let content = format!(
                "{} {}",
                v["name"].as_str().unwrap_or_default(),
                v["subtitle"].as_str().unwrap_or_default()
            );
            content.to_lowercase().contains(&needle)
        })
        .collect::<Vec<_>>();
    Json(json!({"query": q, "count": results.len(), "results": results})).into_response()
}

async fn get_videos(State(state): State<Shared>) -> Response {
    record(&state, Method::GET, "/api/videos", &HashMap::new(), Value::Null);
    Json(state.lock().unwrap().videos.clone()).into_response()
}

async fn upload_video(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut fields = HashMap::new();
    let mut size = 0;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        if name == "video" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            size = field.bytes().await.map(|v| v.len()).unwrap_or_default();
            fields.insert(name, file_name);
        } else {
            fields.insert(name, field.text().await.unwrap_or_default());
        }
    }
    let body = json!({ "fields": fields, "size": size });
    record(&state, Method::POST, "/api/videos", &HashMap::new(), body);
    let mut guard = state.lock().unwrap();
    let videos = guard.videos["videos"].as_array_mut().unwrap();
    let video = json!({
        "id": videos.len() + 1,
        "title": fields.get("title").cloned().unwrap_or_else(|| "Untitled Video".to_owned()),
        "description": fields.get("description").cloned().unwrap_or_default(),
        "filename": fields.get("video").cloned().unwrap_or_default(),
        "upload_date": "2024-03-05T09:00:00",
        "views": 0, "likes": 0, "dislikes": 0, "comments": [],
    });
    videos.push(video.clone());
    Json(json!({"success": true, "video": video})).into_response()
}

async fn delete_video(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&state, Method::DELETE, "/api/videos", &query, Value::Null);
    if !is_admin(&headers) {
        return unauthorized();
    }
    let id = query
        .get("id")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or_default();
    let mut guard = state.lock().unwrap();
    let videos = guard.videos["videos"].as_array_mut().unwrap();
    let before = videos.len();
    videos.retain(|v| v["id"] != id);
    if videos.len() == before {
        return Json(json!({"success": false, "error": "Video not found"})).into_response();
    }
    Json(json!({"success": true})).into_response()
}

fn with_video<F>(state: &Shared, id: i64, f: F) -> Response
where
    F: FnOnce(&mut Value) -> Value,
{
    let mut guard = state.lock().unwrap();
    let video = guard.videos["videos"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|v| v["id"] == id);
    match video {
        Some(video) => Json(f(video)).into_response(),
        None => Json(json!({"success": false, "error": "Video not found"})).into_response(),
    }
}

fn increment(video: &mut Value, field: &str) -> u64 {
    let value = video[field].as_u64().unwrap_or_default() + 1;
    video[field] = json!(value);
    value
}

async fn view_video(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let path = format!("/api/videos/{}/view", id);
    record(&state, Method::POST, &path, &HashMap::new(), Value::Null);
    with_video(&state, id, |video| {
        let views = increment(video, "views");
        json!({"success": true, "views": views})
    })
}

async fn react_video(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/api/videos/{}/react", id);
    record(&state, Method::POST, &path, &HashMap::new(), body.clone());
    with_video(&state, id, |video| {
        match body["reaction"].as_str() {
            Some("like") => {
                increment(video, "likes");
            }
            Some("dislike") => {
                increment(video, "dislikes");
            }
            _ => {}
        }
        json!({"success": true, "likes": video["likes"], "dislikes": video["dislikes"]})
    })
}

async fn comment_video(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/api/videos/{}/comment", id);
    record(&state, Method::POST, &path, &HashMap::new(), body.clone());
    let text = body["comment"].as_str().unwrap_or_default().trim().to_owned();
    if text.is_empty() {
        return Json(json!({"success": false, "error": "Comment cannot be empty"})).into_response();
    }
    with_video(&state, id, |video| {
        let comments = video["comments"].as_array_mut().unwrap();
        let comment = json!({
            "id": comments.len() + 1,
            "author": body["author"],
            "text": text,
            "timestamp": "2024-03-05T09:30:00",
        });
        comments.push(comment.clone());
        json!({"success": true, "comment": comment})
    })
}
