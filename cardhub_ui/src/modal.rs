//! Modal dialogs.
//!
//! Every modal goes through `Hidden -> Opening -> Visible -> Closing -> Hidden`. The value a
//! modal was opened for (its context) is stored on open and dropped when the closing
//! transition completes, so a modal that is reopened while closing keeps the new context.

use crate::config::TimingConfig;
use crate::element::CardElement;
use cardhub::card::{Card, CardId, CardType};
use std::time::Duration;
use tokio::time::Instant;

/// The lifecycle phase of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Hidden,
    Opening { visible_at: Instant },
    Visible,
    Closing { hidden_at: Instant },
}

/// A modal holding a context value of type `C` while it is shown.
#[derive(Debug)]
pub struct Modal<C> {
    open_delay: Duration,
    close_delay: Duration,
    phase: Phase,
    context: Option<C>,
}

impl<C> Modal<C> {
    pub fn new(open_delay: Duration, close_delay: Duration) -> Self {
        Self {
            open_delay,
            close_delay,
            phase: Phase::Hidden,
            context: None,
        }
    }

    /// Shows the modal for `context`, replacing any previous context.
    pub fn open(&mut self, context: C, now: Instant) {
        self.context = Some(context);
        self.phase = Phase::Opening {
            visible_at: now + self.open_delay,
        };
    }

    /// Starts the closing transition. Returns `false` if the modal is not open.
    pub fn close(&mut self, now: Instant) -> bool {
        match self.phase {
            Phase::Opening { .. } | Phase::Visible => {
                self.phase = Phase::Closing {
                    hidden_at: now + self.close_delay,
                };
                true
            }
            Phase::Hidden | Phase::Closing { .. } => false,
        }
    }

    /// Removes the modal without a transition and returns its context.
    pub fn dismiss(&mut self) -> Option<C> {
        self.phase = Phase::Hidden;
        self.context.take()
    }

    /// Advances the transitions. Returns the context once the modal is fully hidden.
    pub fn tick(&mut self, now: Instant) -> Option<C> {
        match self.phase {
            Phase::Opening { visible_at } if visible_at <= now => {
                self.phase = Phase::Visible;
                None
            }
            Phase::Closing { hidden_at } if hidden_at <= now => self.dismiss(),
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Opening { visible_at } => Some(visible_at),
            Phase::Closing { hidden_at } => Some(hidden_at),
            Phase::Hidden | Phase::Visible => None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns whether the modal is opening or visible.
    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Opening { .. } | Phase::Visible)
    }

    /// Returns the context of an open modal.
    pub fn context(&self) -> Option<&C> {
        if self.is_open() {
            self.context.as_ref()
        } else {
            None
        }
    }

    pub fn context_mut(&mut self) -> Option<&mut C> {
        if self.is_open() {
            self.context.as_mut()
        } else {
            None
        }
    }
}

/// The login form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// The editable fields of the settings modal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SettingsForm {
    pub name: String,
    pub subtitle: String,
    pub link: String,
}

impl From<&Card> for SettingsForm {
    fn from(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            subtitle: card.subtitle.clone(),
            link: card.link.clone(),
        }
    }
}

/// The card the settings modal was opened for, and its form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsContext {
    pub id: CardId,
    pub ty: CardType,
    pub parent_id: Option<CardId>,
    pub form: SettingsForm,
    /// Set once the current values were fetched from the server.
    pub loaded: bool,
}

impl SettingsContext {
    pub fn new(element: &CardElement) -> Self {
        Self {
            id: element.id,
            ty: element.ty,
            parent_id: element.parent_id,
            form: SettingsForm::default(),
            loaded: false,
        }
    }

    /// "Card Settings" or "File Settings".
    pub fn title(&self) -> &'static str {
        match self.ty {
            CardType::Card => "Card Settings",
            CardType::File => "File Settings",
        }
    }

    /// Files cannot hold sub-cards.
    pub fn shows_add_sub_card(&self) -> bool {
        self.ty.is_container()
    }
}

/// The action chooser for a card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionChoice {
    pub element: CardElement,
}

impl ActionChoice {
    pub fn title(&self) -> String {
        format!(r#"Choose Action for "{}""#, self.element.display_name())
    }

    /// Label of the navigation button; folders only.
    pub fn view_contents_label(&self) -> Option<&'static str> {
        match (self.element.ty, self.element.has_children) {
            (CardType::File, _) => None,
            (CardType::Card, true) => Some("View Contents"),
            (CardType::Card, false) => Some("Open Folder (Empty)"),
        }
    }

    pub fn shows_proceed_to_link(&self) -> bool {
        self.element.link.is_some()
    }
}

/// Where a new card or file is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CreateOptions {
    pub parent_id: Option<CardId>,
}

/// A yes/no prompt that carries the action to run on confirm.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Confirmation<A> {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub action: A,
}

/// Explains that a file cannot be opened because it has no link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileLinkError {
    pub name: String,
}

impl FileLinkError {
    pub const TITLE: &'static str = "File Not Accessible";
    pub const HEADING: &'static str = "No Link Assigned";
    pub const HINT: &'static str = "Please contact an administrator to assign a link to this file.";

    pub fn message(&self) -> String {
        format!(r#"The file "{}" doesn't have an assigned link."#, self.name)
    }
}

/// Identifies one of the modals of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    Login,
    Settings,
    ActionChoice,
    CreateOptions,
    Confirmation,
    FileLinkError,
}

impl ModalKind {
    pub const ALL: [ModalKind; 6] = [
        ModalKind::Login,
        ModalKind::Settings,
        ModalKind::ActionChoice,
        ModalKind::CreateOptions,
        ModalKind::Confirmation,
        ModalKind::FileLinkError,
    ];
}

/// All modals of a page. `A` is the action type of the confirmation modal.
///
/// The confirmation and file-link error modals are removed without a transition, the others
/// fade out.
#[derive(Debug)]
pub struct ModalSurface<A> {
    pub login: Modal<LoginForm>,
    pub settings: Modal<SettingsContext>,
    pub action_choice: Modal<ActionChoice>,
    pub create_options: Modal<CreateOptions>,
    pub confirmation: Modal<Confirmation<A>>,
    pub file_link_error: Modal<FileLinkError>,
}

impl<A> ModalSurface<A> {
    pub fn new(timing: &TimingConfig) -> Self {
        let (open, close) = (timing.modal_open(), timing.modal_close());
        Self {
            login: Modal::new(open, close),
            settings: Modal::new(open, close),
            action_choice: Modal::new(open, close),
            create_options: Modal::new(open, close),
            confirmation: Modal::new(open, close),
            file_link_error: Modal::new(open, close),
        }
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        match kind {
            ModalKind::Login => self.login.is_open(),
            ModalKind::Settings => self.settings.is_open(),
            ModalKind::ActionChoice => self.action_choice.is_open(),
            ModalKind::CreateOptions => self.create_options.is_open(),
            ModalKind::Confirmation => self.confirmation.is_open(),
            ModalKind::FileLinkError => self.file_link_error.is_open(),
        }
    }

    /// Returns the open modals.
    pub fn open_kinds(&self) -> Vec<ModalKind> {
        ModalKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.is_open(*kind))
            .collect()
    }

    /// Closes one modal. Returns `false` if it was not open.
    pub fn close(&mut self, kind: ModalKind, now: Instant) -> bool {
        let closed = match kind {
            ModalKind::Login => self.login.close(now),
            ModalKind::Settings => self.settings.close(now),
            ModalKind::ActionChoice => self.action_choice.close(now),
            ModalKind::CreateOptions => self.create_options.close(now),
            ModalKind::Confirmation => {
                let open = self.confirmation.is_open();
                self.confirmation.dismiss();
                open
            }
            ModalKind::FileLinkError => {
                let open = self.file_link_error.is_open();
                self.file_link_error.dismiss();
                open
            }
        };
        if closed {
            tracing::trace!(?kind, "modal closed");
        }
        closed
    }

    /// A click on the dimmed area around the content of `kind`.
    pub fn backdrop_click(&mut self, kind: ModalKind, now: Instant) -> bool {
        self.close(kind, now)
    }

    /// Closes every open modal. Returns how many were closed.
    pub fn escape(&mut self, now: Instant) -> usize {
        ModalKind::ALL
            .iter()
            .filter(|kind| self.close(**kind, now))
            .count()
    }

    /// Confirms the open confirmation modal and returns its action.
    pub fn confirm(&mut self) -> Option<A> {
        if !self.confirmation.is_open() {
            return None;
        }
        self.confirmation.dismiss().map(|confirmation| confirmation.action)
    }

    /// Cancels the confirmation modal. The action is dropped.
    pub fn cancel(&mut self) -> bool {
        let open = self.confirmation.is_open();
        self.confirmation.dismiss();
        open
    }

    pub fn tick(&mut self, now: Instant) {
        self.login.tick(now);
        self.settings.tick(now);
        self.action_choice.tick(now);
        self.create_options.tick(now);
        self.confirmation.tick(now);
        self.file_link_error.tick(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.login.next_deadline(),
            self.settings.next_deadline(),
            self.action_choice.next_deadline(),
            self.create_options.next_deadline(),
            self.confirmation.next_deadline(),
            self.file_link_error.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}
