//! Console: the orchestrator between operator input and the control plane
//!
//! The console owns all client-side state: the router, the view currently on
//! screen, the code overlay, a parked confirmation, and the notices waiting to
//! be shown. Remote work never runs on the caller's stack. Loads and actions
//! are spawned onto the runtime and report back as [`ConsoleEvent`]s through
//! an unbounded channel; the front-end feeds each one to [`Console::apply`].
//! State therefore only changes on the event loop.

use crate::actions::{
    self, Action, ActionContext, ActionError, ActionOutcome, Gate, PendingConfirmation,
};
use crate::api::session::{self, Credentials};
use crate::api::{ApiClient, ApiError};
use crate::overlay::CodeOverlay;
use crate::router::{LoadTicket, NavEvent, Route, Router};
use crate::views::{self, BuildOptions, ViewModel};
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// What the main area shows
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// A load for this route is in flight
    Loading(Route),
    Ready(ViewModel),
    /// The load failed; `r` re-enters the route
    Failed { route: Route, message: String },
    /// Session lost or never established; nothing is rendered
    SignedOut,
}

/// Completions delivered by spawned tasks
#[derive(Debug)]
pub enum ConsoleEvent {
    Loaded {
        ticket: LoadTicket,
        result: Result<ViewModel, ApiError>,
    },
    ActionFinished {
        action: &'static str,
        result: Result<ActionOutcome, ActionError>,
    },
    LoginFinished(Result<(), ApiError>),
    LoggedOut(Result<(), ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message for the operator (shown as a toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleOptions {
    pub build: BuildOptions,
    pub download_dir: PathBuf,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            download_dir: std::env::temp_dir(),
        }
    }
}

pub struct Console {
    client: ApiClient,
    options: ConsoleOptions,
    router: Router,
    view: ViewState,
    overlay: CodeOverlay,
    pending: Option<PendingConfirmation>,
    notices: VecDeque<Notice>,
    clipboard: Option<String>,
    login_error: Option<String>,
    node_selection: usize,
    /// Subscription URL from the last rotation; the listener only ever
    /// reports a placeholder
    rotated_subscription: Option<String>,
    in_flight: usize,
    tx: mpsc::UnboundedSender<ConsoleEvent>,
}

impl Console {
    pub fn new(
        client: ApiClient,
        options: ConsoleOptions,
    ) -> (Self, mpsc::UnboundedReceiver<ConsoleEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let console = Self {
            client,
            options,
            router: Router::new(),
            view: ViewState::Loading(Route::default()),
            overlay: CodeOverlay::new(),
            pending: None,
            notices: VecDeque::new(),
            clipboard: None,
            login_error: None,
            node_selection: 0,
            rotated_subscription: None,
            in_flight: 0,
            tx,
        };
        (console, rx)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn route(&self) -> Route {
        self.router.current()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable access for local edits (row selection, settings form)
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn overlay(&self) -> &CodeOverlay {
        &self.overlay
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn is_signed_out(&self) -> bool {
        self.view == ViewState::SignedOut
    }

    /// Error from the last login attempt
    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    /// Spawned tasks that have not reported back yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn server_url(&self) -> String {
        self.client.absolute_url("/")
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Text an action wants on the clipboard
    pub fn take_clipboard(&mut self) -> Option<String> {
        self.clipboard.take()
    }

    /// Queue a notice raised by the front-end (clipboard failures and such)
    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            text: text.into(),
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Location fragment changed
    pub fn navigate(&mut self, fragment: &str) {
        self.dispatch(NavEvent::Navigate(fragment.to_string()));
    }

    pub fn go_to(&mut self, route: Route) {
        self.dispatch(NavEvent::to(route));
    }

    /// Reload the current route from the server
    pub fn reenter(&mut self) {
        self.dispatch(NavEvent::Reenter);
    }

    fn dispatch(&mut self, event: NavEvent) {
        self.node_selection = match (&event, &self.view) {
            (NavEvent::Reenter, ViewState::Ready(ViewModel::Nodes(view))) => view.selected,
            _ => 0,
        };
        let ticket = self.router.dispatch(&event);
        self.view = ViewState::Loading(ticket.route);

        let client = self.client.clone();
        let options = self.options.build;
        self.spawn(async move {
            let result = views::build(ticket.route, &client, options).await;
            ConsoleEvent::Loaded { ticket, result }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Submit an operator action
    ///
    /// Destructive actions are parked until [`Console::resolve`]. A second
    /// destructive request replaces an unanswered one.
    pub fn request(&mut self, action: Action) -> Gate {
        if let Some(prompt) = action.confirmation() {
            tracing::debug!("{} awaiting confirmation", action.name());
            self.pending = Some(PendingConfirmation { prompt, action });
            return Gate::AwaitingConsent(prompt);
        }
        self.start(action)
    }

    /// Answer the parked confirmation; declining is a silent no-op
    pub fn resolve(&mut self, consent: bool) -> Gate {
        match self.pending.take() {
            Some(pending) if consent => self.start(pending.action),
            Some(pending) => {
                tracing::debug!("{} declined", pending.action.name());
                Gate::Ignored
            }
            None => Gate::Ignored,
        }
    }

    /// Open the code overlay for a node
    pub fn open_code(&mut self, id: &str) -> Gate {
        self.overlay.open(id);
        let gate = self.start(Action::OpenCode { id: id.to_string() });
        if matches!(gate, Gate::Rejected(_)) {
            self.overlay.close();
        }
        gate
    }

    pub fn close_overlay(&mut self) {
        self.overlay.close();
    }

    fn start(&mut self, action: Action) -> Gate {
        if action.is_noop() {
            return Gate::Ignored;
        }
        let name = action.name();
        let validated = match action.validate() {
            Ok(validated) => validated,
            Err(err) => {
                tracing::warn!("{} rejected: {}", name, err);
                self.notices.push_back(Notice::error(err.to_string()));
                return Gate::Rejected(err);
            }
        };

        let client = self.client.clone();
        let context = ActionContext {
            download_dir: self.options.download_dir.clone(),
        };
        self.spawn(async move {
            let result = actions::execute(&client, validated, &context).await;
            ConsoleEvent::ActionFinished {
                action: name,
                result,
            }
        });
        Gate::Dispatched
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    pub fn login(&mut self, credentials: Credentials) {
        self.login_error = None;
        let client = self.client.clone();
        self.spawn(async move {
            ConsoleEvent::LoginFinished(session::login(&client, &credentials).await)
        });
    }

    pub fn logout(&mut self) {
        let client = self.client.clone();
        self.spawn(async move { ConsoleEvent::LoggedOut(session::logout(&client).await) });
    }

    fn sign_out(&mut self) {
        self.router.invalidate();
        self.view = ViewState::SignedOut;
        self.overlay.close();
        self.pending = None;
        self.rotated_subscription = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Completions
    // ─────────────────────────────────────────────────────────────────────────

    fn spawn<F>(&mut self, task: F)
    where
        F: std::future::Future<Output = ConsoleEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            // Receiver gone means the console is shutting down
            let _ = tx.send(event);
        });
    }

    /// Fold a completion into the console state
    pub fn apply(&mut self, event: ConsoleEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match event {
            ConsoleEvent::Loaded { ticket, result } => self.apply_load(ticket, result),
            ConsoleEvent::ActionFinished { action, result } => self.apply_action(action, result),
            ConsoleEvent::LoginFinished(result) => match result {
                Ok(()) => {
                    tracing::info!("Signed in");
                    self.login_error = None;
                    self.notices.push_back(Notice::info("Signed in."));
                    self.reenter();
                }
                Err(err) => {
                    tracing::warn!("Sign-in failed: {}", err);
                    self.login_error = Some(err.to_string());
                }
            },
            ConsoleEvent::LoggedOut(result) => {
                if let Err(err) = result {
                    tracing::warn!("Sign-out request failed: {}", err);
                }
                self.sign_out();
                self.notices.push_back(Notice::info("Signed out."));
            }
        }
    }

    fn apply_load(&mut self, ticket: LoadTicket, result: Result<ViewModel, ApiError>) {
        if !self.router.accepts(&ticket) {
            tracing::debug!(
                "Dropping stale {} load (generation {})",
                ticket.route.fragment(),
                ticket.generation
            );
            return;
        }

        self.view = match result {
            Ok(model) => ViewState::Ready(self.carry_selection(model)),
            Err(ApiError::AuthenticationRequired) => {
                self.sign_out();
                return;
            }
            Err(err) => {
                tracing::warn!("Loading {} failed: {}", ticket.route.fragment(), err);
                ViewState::Failed {
                    route: ticket.route,
                    message: err.to_string(),
                }
            }
        };
    }

    /// Keep the highlighted node row and the rotated subscription URL across
    /// a reload
    fn carry_selection(&self, model: ViewModel) -> ViewModel {
        match model {
            ViewModel::Nodes(mut fresh) => {
                fresh.selected = self.node_selection.min(fresh.rows.len().saturating_sub(1));
                if let Some(url) = &self.rotated_subscription {
                    if fresh.subscription_is_placeholder() {
                        fresh.subscription_url = url.clone();
                    }
                }
                ViewModel::Nodes(fresh)
            }
            other => other,
        }
    }

    fn apply_action(&mut self, action: &'static str, result: Result<ActionOutcome, ActionError>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) if err.is_auth() => {
                tracing::warn!("{} needs a new session", action);
                self.sign_out();
                return;
            }
            Err(err) => {
                tracing::warn!("{} failed: {}", action, err);
                if action == "open-code" {
                    self.overlay.close();
                }
                self.notices.push_back(Notice::error(err.to_string()));
                return;
            }
        };

        if let Some(text) = outcome.clipboard {
            self.clipboard = Some(text);
        }
        if let Some(content) = outcome.overlay {
            self.overlay.show(content);
        }
        if let Some(url) = outcome.subscription_url {
            self.rotated_subscription = Some(url);
        }
        if let Some(message) = outcome.message {
            self.notices.push_back(Notice::info(message));
        }
        if let Some(path) = outcome.saved {
            self.notices
                .push_back(Notice::info(format!("Saved {}", path.display())));
        }
        if outcome.reload && !self.is_signed_out() {
            self.reenter();
        }
    }
}
