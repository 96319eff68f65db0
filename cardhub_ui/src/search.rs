//! The debounced free-text search field and its result panel.

use crate::element::{Activation, CardElement};
use cardhub::card::CardType;
use cardhub::search::{SearchResult, SearchResults};
use std::fmt::Write as _;
use std::time::Duration;
use tokio::time::Instant;

/// A search the controller wants sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    /// Responses are only applied if they carry the latest generation.
    pub generation: u64,
    pub query: String,
}

/// What the result panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Cleared,
    Results(SearchResults),
    Error,
}

/// State of the search field, its debounce timer and the result panel.
#[derive(Debug)]
pub struct SearchController {
    debounce: Duration,
    min_query_len: usize,
    input: String,
    query: String,
    deadline: Option<Instant>,
    generation: u64,
    visible: bool,
    content: PanelContent,
}

impl SearchController {
    pub fn new(debounce: Duration, min_query_len: usize) -> Self {
        Self {
            debounce,
            min_query_len,
            input: String::new(),
            query: String::new(),
            deadline: None,
            generation: 0,
            visible: false,
            content: PanelContent::Cleared,
        }
    }

    /// Records the new field value and restarts the debounce timer.
    pub fn on_input(&mut self, value: &str, now: Instant) {
        self.input = value.to_owned();
        self.query = value.trim().to_owned();
        self.deadline = Some(now + self.debounce);
    }

    /// Searches immediately with the current field value.
    pub fn on_enter(&mut self) -> Option<SearchRequest> {
        self.deadline = None;
        self.query = self.input.trim().to_owned();
        self.perform()
    }

    /// Fires the debounce timer if it is due.
    pub fn tick(&mut self, now: Instant) -> Option<SearchRequest> {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                self.perform()
            }
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns whether a search is scheduled but not yet sent.
    pub fn is_debouncing(&self) -> bool {
        self.deadline.is_some()
    }

    fn perform(&mut self) -> Option<SearchRequest> {
        // Any in-flight search is stale from here on, even if nothing new is sent.
        self.generation += 1;
        if self.query.chars().count() < self.min_query_len {
            tracing::trace!(query = %self.query, "query too short");
            self.content = PanelContent::Cleared;
            self.hide();
            return None;
        }
        tracing::debug!(query = %self.query, generation = self.generation, "searching");
        Some(SearchRequest {
            generation: self.generation,
            query: self.query.clone(),
        })
    }

    /// Applies a response. Returns `false` if a newer search superseded it.
    pub fn on_results(&mut self, generation: u64, results: SearchResults) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "dropping stale results");
            return false;
        }
        self.content = PanelContent::Results(results);
        self.visible = true;
        true
    }

    /// Shows the error panel. Returns `false` if a newer search superseded the failed one.
    pub fn on_error(&mut self, generation: u64, error: &cardhub::Error) -> bool {
        if generation != self.generation {
            return false;
        }
        tracing::warn!(error = %error, "search failed");
        self.content = PanelContent::Error;
        self.visible = true;
        true
    }

    pub fn on_focus(&mut self) {
        if self.query.chars().count() >= self.min_query_len {
            self.visible = true;
        }
    }

    /// Hides the panel together with its overlay.
    pub fn hide(&mut self) {
        self.visible = false;
        if self.input.trim().is_empty() {
            self.input.clear();
        }
    }

    /// Hides the panel, clears the field and returns the activation of the chosen result.
    pub fn select(&mut self, index: usize) -> Option<Activation> {
        let activation = match &self.content {
            PanelContent::Results(results) => {
                CardElement::from(results.results.get(index)?).activation()
            }
            _ => return None,
        };
        self.hide();
        self.input.clear();
        self.query.clear();
        Some(activation)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns whether the result panel and the overlay are shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn content(&self) -> &PanelContent {
        &self.content
    }

    /// Renders the inner HTML of the result panel.
    pub fn render(&self) -> String {
        match &self.content {
            PanelContent::Cleared => String::new(),
            PanelContent::Error => empty_state(
                "fa-exclamation-triangle",
                "Search Error",
                "Unable to perform search. Please try again.",
            ),
            PanelContent::Results(results) => render_results(results),
        }
    }
}

/// A piece of text that either matched the query or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment<'a> {
    Text(&'a str),
    Highlight(&'a str),
}

/// Splits `text` into fragments, marking every case-insensitive occurrence of `query`.
pub fn highlight<'a>(text: &'a str, query: &str) -> Vec<Fragment<'a>> {
    if query.is_empty() {
        return vec![Fragment::Text(text)];
    }
    let mut fragments = Vec::new();
    let mut plain_start = 0;
    let mut position = 0;
    while position < text.len() {
        if let Some(len) = match_len(&text[position..], query) {
            if plain_start < position {
                fragments.push(Fragment::Text(&text[plain_start..position]));
            }
            fragments.push(Fragment::Highlight(&text[position..position + len]));
            position += len;
            plain_start = position;
        } else {
            position += text[position..].chars().next().map_or(1, char::len_utf8);
        }
    }
    if plain_start < text.len() {
        fragments.push(Fragment::Text(&text[plain_start..]));
    }
    fragments
}

/// Renders `text` as HTML with every occurrence of `query` wrapped in a highlight span.
pub fn highlight_text(text: &str, query: &str) -> String {
    let mut html = String::with_capacity(text.len());
    for fragment in highlight(text, query) {
        match fragment {
            Fragment::Text(text) => html.push_str(&escape(text)),
            Fragment::Highlight(text) => {
                let _ = write!(html, r#"<span class="highlight">{}</span>"#, escape(text));
            }
        }
    }
    html
}

/// Returns the header line of a non-empty result panel.
pub fn results_header(results: &SearchResults) -> String {
    format!(
        r#"Found {} result{} for "{}""#,
        results.count,
        if results.count == 1 { "" } else { "s" },
        results.query
    )
}

// Byte length of the prefix of `haystack` matching `needle` case-insensitively.
fn match_len(haystack: &str, needle: &str) -> Option<usize> {
    let mut haystack_chars = haystack.char_indices();
    for expected in needle.chars() {
        let (_, actual) = haystack_chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(haystack_chars.next().map_or(haystack.len(), |(index, _)| index))
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn empty_state(icon: &str, title: &str, hint: &str) -> String {
    format!(
        r#"<div class="search-empty"><i class="fas {}"></i><h3>{}</h3><p>{}</p></div>"#,
        icon, title, hint
    )
}

fn render_results(results: &SearchResults) -> String {
    if results.is_empty() {
        return empty_state(
            "fa-search",
            "No results found",
            "Try different keywords or check your spelling",
        );
    }
    let mut html = format!(
        r#"<div class="search-stats">{}</div>"#,
        escape(&results_header(results))
    );
    for (index, result) in results.results.iter().enumerate() {
        render_result(&mut html, index, result, &results.query);
    }
    html
}

fn render_result(html: &mut String, index: usize, result: &SearchResult, query: &str) {
    let (icon, class) = match result.ty {
        CardType::File => ("fa-file", " file-search-result"),
        CardType::Card => ("fa-folder", ""),
    };
    let _ = write!(
        html,
        r#"<div class="search-result-item{}" data-index="{}"><div class="search-result-icon"><i class="fas {}"></i></div><div class="search-result-content"><h4>{}</h4>"#,
        class,
        index,
        icon,
        highlight_text(&result.name, query)
    );
    if !result.subtitle.is_empty() {
        let _ = write!(html, "<p>{}</p>", highlight_text(&result.subtitle, query));
    }
    let _ = write!(
        html,
        r#"<div class="search-result-path">{}</div>"#,
        escape(result.path.as_str())
    );
    if result.is_file_without_link() {
        html.push_str(
            r#"<div class="search-result-warning"><i class="fas fa-exclamation-circle"></i> No link assigned</div>"#,
        );
    }
    html.push_str("</div></div>");
}
