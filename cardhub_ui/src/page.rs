//! The page controller.
//!
//! A [`Page`] owns the interactive components of a catalog page, turns [`UiEvent`]s into
//! backend calls and host effects, and applies the results of those calls when they complete.
//! Everything runs on one thread; backend calls are kept in a set of local futures and polled
//! by [`Page::run`] next to the UI events and the component timers.

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::element::{Activation, CardElement};
use crate::host::{Effect, Host};
use crate::interaction::{Disambiguator, Gesture, Intent, Key, Source};
use crate::modal::{
    ActionChoice, Confirmation, CreateOptions, FileLinkError, LoginForm, ModalKind, ModalSurface,
    SettingsContext, SettingsForm,
};
use crate::notification::{failure_message, Notifier, Severity};
use crate::search::{SearchController, SearchRequest};
use cardhub::card::{self, CardId, CardTree, CardType};
use cardhub::search::SearchResults;
use cardhub::LoginData;
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

/// An event raised by the user on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A gesture on a card element.
    Card {
        element: CardElement,
        gesture: Gesture,
    },
    /// A key pressed anywhere on the page.
    Keydown(Key),
    SearchInput(String),
    SearchKey(Key),
    SearchFocus,
    SearchOverlayClick,
    /// A click on the result with the given index.
    SearchSelect(usize),
    /// A click on the dimmed area around a modal.
    BackdropClick(ModalKind),
    /// The close button of a modal.
    CloseModal(ModalKind),
    ShowLogin,
    SubmitLogin,
    EditLogin(LoginForm),
    Logout,
    ShowCreateOptions {
        parent_id: Option<CardId>,
    },
    /// The "add folder" button.
    AddFolder {
        parent_id: Option<CardId>,
    },
    /// The "add file" option of the create options modal.
    AddFileFromOptions,
    /// Create a card with a name chosen by the user.
    CreateCard {
        name: String,
        ty: CardType,
        parent_id: Option<CardId>,
    },
    EditSettings(SettingsForm),
    SaveSettings,
    DeleteCard,
    AddSubCard,
    AddFile,
    ShowActions(CardElement),
    ViewContents,
    ProceedToLink,
    Confirm,
    Cancel,
    DismissNotification,
}

/// The card mutations the page issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    AddCard,
    AddSubCard,
    AddFile,
    Update,
    Delete,
}

impl MutationKind {
    /// Returns the prefix of the notification shown when the mutation fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Self::AddCard => "Error adding card",
            Self::AddSubCard => "Error adding sub-card",
            Self::AddFile => "Error adding file",
            Self::Update => "Error updating card",
            Self::Delete => "Error deleting card",
        }
    }
}

/// The result of a backend call.
#[derive(Debug)]
pub enum Completion {
    Mutation {
        kind: MutationKind,
        result: cardhub::Result<()>,
    },
    SettingsLoaded {
        id: CardId,
        result: cardhub::Result<CardTree>,
    },
    Search {
        generation: u64,
        result: cardhub::Result<SearchResults>,
    },
    Login(cardhub::Result<()>),
}

/// The action behind a confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmAction {
    DeleteCard(CardId),
    Logout,
}

/// Path the browser is sent to after a confirmed logout.
pub const LOGOUT_PATH: &str = "/logout";

/// The interactive part of a catalog page.
pub struct Page<B, H> {
    backend: Rc<B>,
    host: H,
    config: ClientConfig,
    interaction: Disambiguator,
    search: SearchController,
    modals: ModalSurface<ConfirmAction>,
    notifier: Notifier,
    in_flight: FuturesUnordered<LocalBoxFuture<'static, Completion>>,
}

impl<B, H> Page<B, H>
where
    B: Backend + 'static,
    H: Host,
{
    pub fn new(backend: B, host: H, config: &ClientConfig) -> Self {
        let timing = &config.timing;
        Self {
            backend: Rc::new(backend),
            host,
            config: config.clone(),
            interaction: Disambiguator::new(timing.double_click()),
            search: SearchController::new(timing.search_debounce(), config.search.min_query_len),
            modals: ModalSurface::new(timing),
            notifier: Notifier::new(timing.notification(), timing.notification_fade()),
            in_flight: FuturesUnordered::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn modals(&self) -> &ModalSurface<ConfirmAction> {
        &self.modals
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Returns the number of backend calls that have not completed yet.
    pub fn pending_calls(&self) -> usize {
        self.in_flight.len()
    }

    /// Dispatches a UI event.
    pub fn handle(&mut self, event: UiEvent, now: Instant) {
        tracing::trace!(?event, "ui event");
        match event {
            UiEvent::Card { element, gesture } => self.on_card_gesture(&element, gesture, now),
            UiEvent::Keydown(Key::Escape) => {
                let closed = self.modals.escape(now);
                tracing::trace!(closed, "escape");
                self.search.hide();
            }
            UiEvent::Keydown(_) => {}
            UiEvent::SearchInput(value) => self.search.on_input(&value, now),
            UiEvent::SearchKey(Key::Enter) => {
                if let Some(request) = self.search.on_enter() {
                    self.spawn_search(request);
                }
            }
            UiEvent::SearchKey(_) => {}
            UiEvent::SearchFocus => self.search.on_focus(),
            UiEvent::SearchOverlayClick => self.search.hide(),
            UiEvent::SearchSelect(index) => {
                if let Some(activation) = self.search.select(index) {
                    self.apply(activation, now);
                }
            }
            UiEvent::BackdropClick(kind) => {
                self.modals.backdrop_click(kind, now);
            }
            UiEvent::CloseModal(kind) => {
                self.modals.close(kind, now);
            }
            UiEvent::ShowLogin => self.modals.login.open(LoginForm::default(), now),
            UiEvent::EditLogin(form) => {
                if let Some(current) = self.modals.login.context_mut() {
                    *current = form;
                }
            }
            UiEvent::SubmitLogin => self.submit_login(),
            UiEvent::Logout => self.modals.confirmation.open(
                Confirmation {
                    title: "Logout Confirmation".to_owned(),
                    message: "Are you sure you want to logout?".to_owned(),
                    confirm_label: "Logout".to_owned(),
                    cancel_label: "Cancel".to_owned(),
                    action: ConfirmAction::Logout,
                },
                now,
            ),
            UiEvent::ShowCreateOptions { parent_id } => {
                self.modals.create_options.open(CreateOptions { parent_id }, now)
            }
            UiEvent::AddFolder { parent_id } => {
                let request = card::Create {
                    name: "New Folder".to_owned(),
                    ..card::Create::folder(parent_id)
                };
                self.spawn_create(MutationKind::AddCard, request);
            }
            UiEvent::AddFileFromOptions => {
                let parent_id = self
                    .modals
                    .create_options
                    .context()
                    .and_then(|options| options.parent_id);
                self.spawn_create(MutationKind::AddFile, new_file(parent_id));
            }
            UiEvent::CreateCard {
                name,
                ty,
                parent_id,
            } => self.create_named(name, ty, parent_id, now),
            UiEvent::EditSettings(form) => {
                if let Some(settings) = self.modals.settings.context_mut() {
                    settings.form = form;
                }
            }
            UiEvent::SaveSettings => self.save_settings(now),
            UiEvent::DeleteCard => {
                if let Some(id) = self.modals.settings.context().map(|settings| settings.id) {
                    self.modals.confirmation.open(delete_confirmation(id), now);
                }
            }
            UiEvent::AddSubCard => {
                let parent = match self.modals.settings.context() {
                    Some(settings) if settings.shows_add_sub_card() => settings.id,
                    _ => return,
                };
                let request = card::Create {
                    name: "New Sub-Folder".to_owned(),
                    ..card::Create::folder(Some(parent))
                };
                self.spawn_create(MutationKind::AddSubCard, request);
            }
            UiEvent::AddFile => {
                // Files are leaves, so a file added from a file's settings becomes its sibling.
                let parent_id = match self.modals.settings.context() {
                    Some(settings) if settings.ty == CardType::File => settings.parent_id,
                    Some(settings) => Some(settings.id),
                    None => return,
                };
                self.spawn_create(MutationKind::AddFile, new_file(parent_id));
            }
            UiEvent::ShowActions(element) => {
                self.modals.action_choice.open(ActionChoice { element }, now)
            }
            UiEvent::ViewContents => {
                if let Some(choice) = self.modals.action_choice.context() {
                    let path = choice.element.id.view_path();
                    self.host.perform(Effect::Navigate(path));
                }
            }
            UiEvent::ProceedToLink => self.proceed_to_link(now),
            UiEvent::Confirm => {
                if let Some(action) = self.modals.confirm() {
                    self.run_confirmed(action);
                }
            }
            UiEvent::Cancel => {
                self.modals.cancel();
            }
            UiEvent::DismissNotification => self.notifier.dismiss(),
        }
    }

    /// Fires all timers that are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for activation in self.interaction.tick(now) {
            self.apply(activation, now);
        }
        if let Some(request) = self.search.tick(now) {
            self.spawn_search(request);
        }
        self.modals.tick(now);
        self.notifier.tick(now);
    }

    /// Returns the earliest instant at which [`tick`](Self::tick) has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.interaction.next_deadline(),
            self.search.next_deadline(),
            self.modals.next_deadline(),
            self.notifier.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Applies the result of a backend call.
    pub fn complete(&mut self, completion: Completion, now: Instant) {
        match completion {
            Completion::Mutation { kind, result } => match result {
                Ok(()) => {
                    tracing::info!(?kind, "card mutation succeeded");
                    if kind == MutationKind::Update {
                        self.modals.close(ModalKind::Settings, now);
                    }
                    self.host.perform(Effect::Reload);
                }
                Err(e) => {
                    let message = failure_message(kind.failure_prefix(), &e);
                    self.notifier.notify(message, Severity::Error, now);
                }
            },
            Completion::SettingsLoaded { id, result } => {
                let settings = match self.modals.settings.context_mut() {
                    Some(settings) if settings.id == id => settings,
                    _ => {
                        tracing::debug!(%id, "settings closed before card data arrived");
                        return;
                    }
                };
                match result {
                    Ok(tree) => {
                        if let Some(card) = tree.find_by_id(id) {
                            settings.form = SettingsForm::from(card);
                            settings.loaded = true;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, %id, "failed to load card data");
                        self.notifier
                            .notify("Error loading card data", Severity::Error, now);
                    }
                }
            }
            Completion::Search { generation, result } => match result {
                Ok(results) => {
                    self.search.on_results(generation, results);
                }
                Err(e) => {
                    self.search.on_error(generation, &e);
                }
            },
            Completion::Login(result) => match result {
                Ok(()) => self.host.perform(Effect::Reload),
                Err(e) => {
                    let message = failure_message("Login failed", &e);
                    self.notifier.notify(message, Severity::Error, now);
                }
            },
        }
    }

    /// Waits for every backend call in flight and applies the results at `now`.
    pub async fn settle(&mut self, now: Instant) {
        while let Some(completion) = self.in_flight.next().await {
            self.complete(completion, now);
        }
    }

    /// Runs the page until the event channel is closed.
    pub async fn run(&mut self, mut events: UnboundedReceiver<UiEvent>) {
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event, Instant::now()),
                    None => break,
                },
                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(completion, Instant::now());
                }
                _ = sleep_until(deadline) => self.tick(Instant::now()),
            }
        }
        tracing::debug!(pending = self.in_flight.len(), "event channel closed");
    }

    fn on_card_gesture(&mut self, element: &CardElement, gesture: Gesture, now: Instant) {
        let is_admin = self.host.is_admin();
        match self.interaction.on_gesture(element.id, gesture, is_admin, now) {
            Intent::Activate(source) => self.activate(element, source, now),
            Intent::OpenSettings => {
                self.host.perform(Effect::Press {
                    id: element.id,
                    duration: self.config.timing.context_feedback(),
                });
                self.open_settings(element, now);
            }
            Intent::Pending | Intent::Ignored => {}
        }
    }

    fn activate(&mut self, element: &CardElement, source: Source, now: Instant) {
        let activation = element.activation();
        match (source, &activation) {
            (Source::DoubleClick, Activation::Navigate(_) | Activation::OpenLink(_)) => {
                let duration = self.config.timing.press_feedback();
                self.host.perform(Effect::Press {
                    id: element.id,
                    duration,
                });
                self.interaction.defer(activation, now + duration);
            }
            _ => self.apply(activation, now),
        }
    }

    fn apply(&mut self, activation: Activation, now: Instant) {
        match activation {
            Activation::Navigate(path) => self.host.perform(Effect::Navigate(path)),
            Activation::OpenLink(link) => self.host.perform(Effect::OpenInNewContext(link)),
            Activation::FileLinkError { name } => {
                self.modals.file_link_error.open(FileLinkError { name }, now)
            }
        }
    }

    fn open_settings(&mut self, element: &CardElement, now: Instant) {
        let id = element.id;
        self.modals.settings.open(SettingsContext::new(element), now);
        let backend = Rc::clone(&self.backend);
        self.in_flight.push(Box::pin(async move {
            let result = backend.card_tree().await;
            Completion::SettingsLoaded { id, result }
        }));
    }

    fn save_settings(&mut self, now: Instant) {
        let request = match self.modals.settings.context() {
            Some(settings) => card::Modify {
                id: settings.id,
                name: settings.form.name.clone(),
                subtitle: settings.form.subtitle.clone(),
                link: settings.form.link.clone(),
            },
            None => return,
        };
        if let Err(e) = request.validate() {
            self.notifier.notify(e.to_string(), Severity::Warning, now);
            return;
        }
        let backend = Rc::clone(&self.backend);
        self.in_flight.push(Box::pin(async move {
            let result = backend.modify_card(request).await;
            Completion::Mutation {
                kind: MutationKind::Update,
                result,
            }
        }));
    }

    fn create_named(&mut self, name: String, ty: CardType, parent_id: Option<CardId>, now: Instant) {
        if name.trim().is_empty() {
            let message = cardhub::ValidationError::EmptyName.to_string();
            self.notifier.notify(message, Severity::Warning, now);
            return;
        }
        let kind = match ty {
            CardType::Card => MutationKind::AddCard,
            CardType::File => MutationKind::AddFile,
        };
        let request = card::Create {
            name,
            ty,
            subtitle: String::new(),
            link: String::new(),
            parent_id,
        };
        self.spawn_create(kind, request);
    }

    fn spawn_create(&mut self, kind: MutationKind, request: card::Create) {
        tracing::debug!(?kind, name = request.effective_name(), parent = ?request.parent_id, "creating card");
        let backend = Rc::clone(&self.backend);
        self.in_flight.push(Box::pin(async move {
            let result = backend.create_card(request).await;
            Completion::Mutation { kind, result }
        }));
    }

    fn spawn_search(&mut self, request: SearchRequest) {
        let backend = Rc::clone(&self.backend);
        self.in_flight.push(Box::pin(async move {
            let result = backend.search(request.query).await;
            Completion::Search {
                generation: request.generation,
                result,
            }
        }));
    }

    fn submit_login(&mut self) {
        let form = match self.modals.login.context() {
            Some(form) => form.clone(),
            None => return,
        };
        let backend = Rc::clone(&self.backend);
        self.in_flight.push(Box::pin(async move {
            let result = backend
                .login(LoginData::new(form.username, form.password))
                .await;
            Completion::Login(result)
        }));
    }

    fn proceed_to_link(&mut self, now: Instant) {
        let link = match self.modals.action_choice.context() {
            Some(choice) => choice.element.link.clone(),
            None => return,
        };
        match link {
            Some(link) => {
                self.host.perform(Effect::OpenInNewContext(link));
                self.modals.close(ModalKind::ActionChoice, now);
            }
            None => self
                .notifier
                .notify("No link assigned to this item.", Severity::Error, now),
        }
    }

    fn run_confirmed(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::DeleteCard(id) => {
                tracing::debug!(%id, "deleting card");
                let backend = Rc::clone(&self.backend);
                self.in_flight.push(Box::pin(async move {
                    let result = backend.delete_card(id).await;
                    Completion::Mutation {
                        kind: MutationKind::Delete,
                        result,
                    }
                }));
            }
            ConfirmAction::Logout => self.host.perform(Effect::Navigate(LOGOUT_PATH.to_owned())),
        }
    }
}

fn new_file(parent_id: Option<CardId>) -> card::Create {
    card::Create {
        name: "New File".to_owned(),
        ..card::Create::file(parent_id)
    }
}

fn delete_confirmation(id: CardId) -> Confirmation<ConfirmAction> {
    Confirmation {
        title: "Delete Confirmation".to_owned(),
        message: "Are you sure you want to delete this item? This action cannot be undone."
            .to_owned(),
        confirm_label: "Delete".to_owned(),
        cancel_label: "Cancel".to_owned(),
        action: ConfirmAction::DeleteCard(id),
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
