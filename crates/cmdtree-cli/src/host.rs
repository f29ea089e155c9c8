//! The terminal as a command host.

use anyhow::{bail, Context, Result};
use cmdtree::{
    CommandTable, CommandTree, FnHandler, HandlerRegistry, Messages, Sender, SenderKind,
    TypeProvider, Value,
};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// A sender that prints what it is sent.
#[derive(Debug)]
pub struct TerminalSender {
    kind: SenderKind,
    granted: HashSet<String>,
}

impl TerminalSender {
    pub fn new(console: bool, grants: &[String]) -> Self {
        Self {
            kind: if console {
                SenderKind::Console
            } else {
                SenderKind::Player
            },
            granted: grants.iter().cloned().collect(),
        }
    }
}

impl Sender for TerminalSender {
    fn has_permission(&self, permission: &str) -> bool {
        self.granted.contains("*") || self.granted.contains(permission)
    }

    fn kind(&self) -> SenderKind {
        self.kind
    }

    fn send(&self, message: &str) {
        println!("{message}");
    }
}

/// A fixed set of accepted words for a custom argument type, given as
/// `name=a,b,c`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
    pub name: String,
    pub values: Vec<String>,
}

impl FromStr for Choices {
    type Err = anyhow::Error;

    fn from_str(spec: &str) -> Result<Self> {
        let Some((name, values)) = spec.split_once('=') else {
            bail!("expected name=value,value,... but got '{spec}'");
        };
        let values: Vec<String> = values
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        if name.is_empty() || values.is_empty() {
            bail!("choices '{spec}' need a name and at least one value");
        }
        Ok(Self {
            name: name.to_string(),
            values,
        })
    }
}

impl Choices {
    /// A provider accepting any of the values, ignoring case.
    pub fn provider(&self) -> TypeProvider {
        let accepted = self.values.clone();
        let offered = self.values.clone();
        TypeProvider::new(self.name.clone(), move |input: &str| {
            accepted
                .iter()
                .find(|value| value.eq_ignore_ascii_case(input))
                .cloned()
        })
        .with_completions(move |_| offered.clone())
    }
}

/// Handlers that answer every hook in `tree` by echoing the hook and its
/// converted arguments back to the sender.
pub fn echo_handlers(tree: &CommandTree) -> Result<HandlerRegistry> {
    let mut handlers = HandlerRegistry::new();
    for hook in tree.hook_names() {
        let name = hook.to_string();
        handlers.insert(
            hook,
            FnHandler::new(move |sender: &dyn Sender, args: &[Value]| {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                sender.send(&format!("{name}({})", args.join(", ")));
            }),
        )?;
    }
    Ok(handlers)
}

/// Settings for [`load`].
#[derive(Debug, Default)]
pub struct LoadOptions<'a> {
    pub prefix: &'a str,
    pub messages: Option<&'a Path>,
    pub choices: &'a [Choices],
}

/// Loads a definition file and registers every command in a fresh table.
pub fn load(path: &Path, options: &LoadOptions<'_>) -> Result<(CommandTree, CommandTable)> {
    let mut tree = cmdtree::load_file(path)
        .with_context(|| format!("failed to load commands from {}", path.display()))?;

    if let Some(messages_path) = options.messages {
        let text = fs::read_to_string(messages_path)
            .with_context(|| format!("failed to read {}", messages_path.display()))?;
        let messages: Messages = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid messages file {}", messages_path.display()))?;
        tree.set_messages(messages);
        debug!(path = %messages_path.display(), "loaded messages");
    }

    for root in tree.roots().to_vec() {
        for choices in options.choices {
            tree.register_provider(root, choices.provider())?;
        }
    }

    let handlers = echo_handlers(&tree)?;
    let mut table = CommandTable::new();
    tree.register_all(options.prefix, &handlers, &mut table)?;
    info!(
        commands = tree.roots().len(),
        hooks = handlers.len(),
        "command definitions ready"
    );
    Ok((tree, table))
}
