//! Handing commands to a host command table.
//!
//! Registration binds a root's hooks against a [`HandlerRegistry`] and then
//! offers each of the root's aliases to a [`CommandMap`], both plain and
//! qualified with a prefix (`label` and `prefix:label`). Hosts implement
//! [`CommandMap`] over their own command table; [`CommandTable`] is an
//! in-memory one that also splits raw command lines.

use crate::error::TreeError;
use crate::handler::HandlerRegistry;
use crate::sender::Sender;
use crate::tree::{CommandTree, NodeId};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A host's table of top-level command labels.
pub trait CommandMap {
    /// Registers `root` under `label` and `prefix:label`.
    ///
    /// The qualified form always registers. Returns false when the plain
    /// label was already taken, in which case the earlier entry stays.
    fn register(&mut self, prefix: &str, label: &str, description: &str, root: NodeId) -> bool;
}

impl CommandTree {
    /// Binds the handlers of `root`'s subtree and registers each of its
    /// aliases with `map`.
    pub fn register(
        &mut self,
        root: NodeId,
        prefix: &str,
        handlers: &HandlerRegistry,
        map: &mut dyn CommandMap,
    ) -> Result<(), TreeError> {
        self.bind_handlers(root, handlers)?;
        let node = self.get(root);
        let description = node
            .help_text()
            .unwrap_or(&self.messages().no_help)
            .to_string();
        for alias in node.aliases() {
            if !map.register(prefix, alias, &description, root) {
                debug!(label = %alias, prefix, "label already taken, registered with prefix only");
            }
        }
        info!(command = node.primary_name(), prefix, "registered command");
        Ok(())
    }

    /// Registers every root in definition order.
    pub fn register_all(
        &mut self,
        prefix: &str,
        handlers: &HandlerRegistry,
        map: &mut dyn CommandMap,
    ) -> Result<(), TreeError> {
        for root in self.roots().to_vec() {
            self.register(root, prefix, handlers, map)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    root: NodeId,
    description: String,
}

/// An in-memory [`CommandMap`]. Labels are matched without regard to case.
///
/// ```rust
/// use cmdtree::{CommandTable, HandlerRegistry, RecordingSender};
///
/// let mut tree = cmdtree::parse("ping,p {\n    help Pong\n}\n")?;
/// let mut table = CommandTable::new();
/// tree.register_all("demo", &HandlerRegistry::new(), &mut table)?;
///
/// assert_eq!(table.labels().collect::<Vec<_>>(), ["demo:p", "demo:ping", "p", "ping"]);
/// assert_eq!(table.description("PING"), Some("Pong"));
///
/// let sender = RecordingSender::player();
/// assert!(table.dispatch_line(&tree, &sender, "/ping"));
/// assert_eq!(sender.messages(), ["--[ Help for ping ]--\nping: Pong"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: BTreeMap<String, Entry>,
}

impl CommandMap for CommandTable {
    fn register(&mut self, prefix: &str, label: &str, description: &str, root: NodeId) -> bool {
        let label = label.to_lowercase();
        let entry = Entry {
            root,
            description: description.to_string(),
        };
        self.entries
            .insert(format!("{}:{label}", prefix.to_lowercase()), entry.clone());
        if self.entries.contains_key(&label) {
            return false;
        }
        self.entries.insert(label, entry);
        true
    }
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root registered under `label`.
    pub fn resolve(&self, label: &str) -> Option<NodeId> {
        self.entries.get(&label.to_lowercase()).map(|entry| entry.root)
    }

    pub fn description(&self, label: &str) -> Option<&str> {
        self.entries
            .get(&label.to_lowercase())
            .map(|entry| entry.description.as_str())
    }

    /// All registered labels, sorted.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Runs `args` against the command registered under `label`.
    ///
    /// Returns false for an unknown label.
    pub fn dispatch<S: AsRef<str>>(
        &self,
        tree: &CommandTree,
        sender: &dyn Sender,
        label: &str,
        args: &[S],
    ) -> bool {
        match self.resolve(label) {
            Some(root) => tree.execute(root, sender, args),
            None => false,
        }
    }

    /// Splits `line` on spaces and dispatches it. A leading `/` is ignored.
    pub fn dispatch_line(&self, tree: &CommandTree, sender: &dyn Sender, line: &str) -> bool {
        let mut words = split_line(line);
        while words.last().is_some_and(|word| word.is_empty()) {
            words.pop();
        }
        match words.split_first() {
            Some((label, args)) => self.dispatch(tree, sender, label, args),
            None => false,
        }
    }

    pub fn complete<S: AsRef<str>>(
        &self,
        tree: &CommandTree,
        sender: &dyn Sender,
        label: &str,
        args: &[S],
    ) -> Option<Vec<String>> {
        tree.complete(self.resolve(label)?, sender, args)
    }

    /// Completes the last word of `line`.
    ///
    /// A line without a space completes the label itself; a trailing space
    /// asks for every candidate of the next word.
    pub fn complete_line(
        &self,
        tree: &CommandTree,
        sender: &dyn Sender,
        line: &str,
    ) -> Option<Vec<String>> {
        let words = split_line(line);
        match words.split_first() {
            Some((label, args)) if !args.is_empty() => self.complete(tree, sender, label, args),
            Some((label, _)) => {
                let partial = label.to_lowercase();
                let labels: Vec<String> = self
                    .labels()
                    .filter(|candidate| candidate.starts_with(&partial))
                    .map(str::to_string)
                    .collect();
                (!labels.is_empty()).then_some(labels)
            }
            None => None,
        }
    }
}

fn split_line(line: &str) -> Vec<&str> {
    let line = line.strip_prefix('/').unwrap_or(line);
    if line.is_empty() {
        return Vec::new();
    }
    line.split(' ').collect()
}
