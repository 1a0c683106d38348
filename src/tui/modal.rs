// Modal system for TUI overlays
//
// Self-contained dialogs that handle their own input and return actions.
// App holds Option<Modal>; input routing acts on the returned ModalAction.
// The code overlay is not a modal: it belongs to the console and is drawn
// from its state.

use crate::api::session::Credentials;
use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    Close,
    /// Answer to a confirmation
    Answer(bool),
    /// Prompt submitted with this value
    Submit(PromptKind, String),
    /// Login form submitted
    Login(Credentials),
}

/// What a text prompt is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NodeName,
    AdminPassword,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::NodeName => " Add node ",
            PromptKind::AdminPassword => " Change admin password ",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::NodeName => "Node name?",
            PromptKind::AdminPassword => "New admin password (min 12 chars recommended):",
        }
    }

    pub fn masked(&self) -> bool {
        matches!(self, PromptKind::AdminPassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
    Totp,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Totp,
            LoginField::Totp => LoginField::Username,
        }
    }

    fn prev(self) -> Self {
        match self {
            LoginField::Username => LoginField::Totp,
            LoginField::Password => LoginField::Username,
            LoginField::Totp => LoginField::Password,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub totp: String,
    pub focus: LoginField,
}

impl LoginForm {
    pub fn new(username: &str) -> Self {
        let focus = if username.is_empty() {
            LoginField::Username
        } else {
            LoginField::Password
        };
        Self {
            username: username.to_string(),
            focus,
            ..Default::default()
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
            LoginField::Totp => &mut self.totp,
        }
    }

    fn credentials(&self) -> Credentials {
        let totp = self.totp.trim();
        Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            totp: (!totp.is_empty()).then(|| totp.to_string()),
        }
    }
}

/// Available modal types
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    /// Yes/no question for the console's parked action
    Confirm(&'static str),
    /// Single-line text input
    Prompt { kind: PromptKind, input: String },
    /// Sign-in form; stays open until the console reports success
    Login(LoginForm),
    /// A value the clipboard refused, shown for manual copying
    Reveal { what: String, value: String },
}

impl Modal {
    pub fn help() -> Self {
        Modal::Help
    }

    pub fn confirm(prompt: &'static str) -> Self {
        Modal::Confirm(prompt)
    }

    pub fn prompt(kind: PromptKind, initial: &str) -> Self {
        Modal::Prompt {
            kind,
            input: initial.to_string(),
        }
    }

    pub fn login(username: &str) -> Self {
        Modal::Login(LoginForm::new(username))
    }

    pub fn reveal(what: &str, value: &str) -> Self {
        Modal::Reveal {
            what: what.to_string(),
            value: value.to_string(),
        }
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Modal::Login(_))
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::Reveal { .. } => ModalAction::Close,
            Modal::Confirm(_) => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    ModalAction::Answer(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Char('q') => {
                    ModalAction::Answer(false)
                }
                _ => ModalAction::None,
            },
            Modal::Prompt { kind, input } => match key {
                // Cancelling submits nothing; an empty value is the caller's no-op
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Enter => ModalAction::Submit(*kind, std::mem::take(input)),
                KeyCode::Backspace => {
                    input.pop();
                    ModalAction::None
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
            Modal::Login(form) => match key {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Tab | KeyCode::Down => {
                    form.focus = form.focus.next();
                    ModalAction::None
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.focus = form.focus.prev();
                    ModalAction::None
                }
                KeyCode::Enter => {
                    if form.username.trim().is_empty() {
                        form.focus = LoginField::Username;
                        ModalAction::None
                    } else if form.password.is_empty() {
                        form.focus = LoginField::Password;
                        ModalAction::None
                    } else {
                        ModalAction::Login(form.credentials())
                    }
                }
                KeyCode::Backspace => {
                    form.field_mut().pop();
                    ModalAction::None
                }
                KeyCode::Char(c) => {
                    form.field_mut().push(c);
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
        }
    }
}
