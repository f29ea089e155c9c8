//! The invoking party, as the engine sees it.
//!
//! The host owns identity and permissions. The engine only needs to ask
//! whether a permission is held, what kind of sender it is talking to, and to
//! deliver a message back.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

/// What kind of party issued a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderKind {
    /// The host's own console.
    Console,
    /// An interactive user.
    Player,
}

/// Who may invoke a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Everyone,
    Console,
    Player,
}

impl Audience {
    /// Parses the value of a `users` directive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "everyone" => Some(Audience::Everyone),
            "console" => Some(Audience::Console),
            "player" => Some(Audience::Player),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Audience::Everyone => "everyone",
            Audience::Console => "console",
            Audience::Player => "player",
        }
    }

    /// Returns true if a sender of `kind` belongs to this audience.
    pub fn permits(self, kind: SenderKind) -> bool {
        match self {
            Audience::Everyone => true,
            Audience::Console => kind == SenderKind::Console,
            Audience::Player => kind == SenderKind::Player,
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The environment's view of whoever issued a command.
pub trait Sender {
    /// Returns true if the sender holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;

    fn kind(&self) -> SenderKind;

    /// Delivers a message to the sender.
    fn send(&self, message: &str);

    fn is_console(&self) -> bool {
        self.kind() == SenderKind::Console
    }

    fn is_player(&self) -> bool {
        self.kind() == SenderKind::Player
    }
}

/// A sender that keeps every message it receives.
///
/// Permissions are answered from an explicit grant list; granting `*` grants
/// everything.
///
/// ```rust
/// use cmdtree::{RecordingSender, Sender};
///
/// let sender = RecordingSender::player().grant("kit.use");
/// assert!(sender.has_permission("kit.use"));
/// assert!(!sender.has_permission("kit.admin"));
///
/// sender.send("hello");
/// assert_eq!(sender.messages(), vec!["hello".to_string()]);
/// ```
#[derive(Debug)]
pub struct RecordingSender {
    kind: SenderKind,
    granted: HashSet<String>,
    messages: RefCell<Vec<String>>,
}

impl RecordingSender {
    pub fn new(kind: SenderKind) -> Self {
        Self {
            kind,
            granted: HashSet::new(),
            messages: RefCell::new(Vec::new()),
        }
    }

    pub fn console() -> Self {
        Self::new(SenderKind::Console)
    }

    pub fn player() -> Self {
        Self::new(SenderKind::Player)
    }

    /// Grants a permission. `*` grants every permission.
    pub fn grant(mut self, permission: impl Into<String>) -> Self {
        self.granted.insert(permission.into());
        self
    }

    /// Returns a copy of the messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Returns the messages received so far and forgets them.
    pub fn take_messages(&self) -> Vec<String> {
        self.messages.take()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Sender for RecordingSender {
    fn has_permission(&self, permission: &str) -> bool {
        self.granted.contains("*") || self.granted.contains(permission)
    }

    fn kind(&self) -> SenderKind {
        self.kind
    }

    fn send(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
