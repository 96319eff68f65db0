//! Turns raw pointer and keyboard gestures on card elements into intents.
//!
//! Each card has at most one pending single-click deadline. A second click before the
//! deadline cancels it and activates the card, a keyboard activation cancels it as well, so
//! exactly one of {single click, double click, keyboard activation} wins per gesture. Expired
//! single clicks do nothing.

use crate::element::Activation;
use cardhub::card::CardId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// A key as reported by the DOM `KeyboardEvent.key` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other,
}

impl Key {
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            _ => Self::Other,
        }
    }

    /// Returns whether the key activates a focused card.
    pub fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// A raw gesture on a card element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// A primary click. `on_menu` is set when the click landed on the nested menu control.
    Click { on_menu: bool },
    /// A secondary click. The native context menu is always suppressed by the host.
    ContextMenu,
    /// A key press while the element has focus.
    Key(Key),
}

/// What activated a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    DoubleClick,
    Keyboard,
}

/// The interpretation of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// A first click; the outcome depends on whether a second click follows.
    Pending,
    Activate(Source),
    /// Open the settings of the card (administrators only).
    OpenSettings,
    /// Nothing happens.
    Ignored,
}

/// The click/double-click/keyboard state machine for all card elements of a page.
#[derive(Debug)]
pub struct Disambiguator {
    window: Duration,
    pending: HashMap<CardId, Instant>,
    deferred: Vec<(Instant, Activation)>,
}

impl Disambiguator {
    /// Creates a disambiguator that pairs clicks arriving within `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
            deferred: Vec::new(),
        }
    }

    pub fn on_gesture(
        &mut self,
        id: CardId,
        gesture: Gesture,
        is_admin: bool,
        now: Instant,
    ) -> Intent {
        match gesture {
            Gesture::Click { on_menu: true } => Intent::Ignored,
            Gesture::Click { on_menu: false } => match self.pending.remove(&id) {
                Some(deadline) if now < deadline => {
                    tracing::trace!(%id, "double click");
                    Intent::Activate(Source::DoubleClick)
                }
                _ => {
                    self.pending.insert(id, now + self.window);
                    Intent::Pending
                }
            },
            Gesture::ContextMenu if is_admin => Intent::OpenSettings,
            Gesture::ContextMenu => Intent::Ignored,
            Gesture::Key(key) if key.activates() => {
                self.pending.remove(&id);
                Intent::Activate(Source::Keyboard)
            }
            Gesture::Key(_) => Intent::Ignored,
        }
    }

    /// Returns whether a single click on `id` is waiting for its pair.
    pub fn is_pending(&self, id: CardId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Schedules an activation to be released by [`tick`](Self::tick) at `at`.
    pub fn defer(&mut self, activation: Activation, at: Instant) {
        self.deferred.push((at, activation));
    }

    /// Expires single clicks and releases due activations, in the order they were deferred.
    pub fn tick(&mut self, now: Instant) -> Vec<Activation> {
        self.pending.retain(|id, deadline| {
            let keep = now < *deadline;
            if !keep {
                tracing::trace!(%id, "single click ignored");
            }
            keep
        });
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.deferred.len() {
            if self.deferred[index].0 <= now {
                due.push(self.deferred.remove(index).1);
            } else {
                index += 1;
            }
        }
        due
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .values()
            .copied()
            .chain(self.deferred.iter().map(|(at, _)| *at))
            .min()
    }
}
