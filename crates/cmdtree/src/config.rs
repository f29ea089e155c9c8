//! User-facing text sent by the dispatcher.
//!
//! Every field has a default, so a host can override a subset from a config
//! file:
//!
//! ```rust
//! use cmdtree::Messages;
//!
//! let messages: Messages = serde_yaml::from_str("console_only: Console only.").unwrap();
//! assert_eq!(messages.console_only, "Console only.");
//! assert_eq!(messages.help_header, Messages::default().help_header);
//! ```

use serde::{Deserialize, Serialize};

/// Messages the dispatcher sends to senders.
///
/// `{permission}` and `{name}` are replaced where noted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Sent when a permission check fails. Supports `{permission}`.
    pub no_permission: String,
    pub console_only: String,
    pub player_only: String,
    /// Sent when a handler could not be run or failed.
    pub execution_failed: String,
    /// First line of help output. Supports `{name}`.
    pub help_header: String,
    /// Help text of a `hidesub` node that has none of its own.
    pub hidden_subcommands: String,
    /// Description registered for a command without help text.
    pub no_help: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_permission: "You do not have permission to execute that command. (Node: {permission})"
                .into(),
            console_only: "This command can only be executed by console!".into(),
            player_only: "This command can only be executed by a player!".into(),
            execution_failed: "An error occurred in executing this command, please check console."
                .into(),
            help_header: "--[ Help for {name} ]--".into(),
            hidden_subcommands: "Subcommands hidden".into(),
            no_help: "No help provided".into(),
        }
    }
}

impl Messages {
    pub(crate) fn no_permission(&self, permission: &str) -> String {
        self.no_permission.replace("{permission}", permission)
    }

    pub(crate) fn help_header(&self, name: &str) -> String {
        self.help_header.replace("{name}", name)
    }
}
