//! The command tree: an arena of nodes addressed by [`NodeId`].
//!
//! A tree holds a forest of root commands. Nodes are only ever appended, so
//! ids stay valid for the life of the tree. Mutations (adding children,
//! installing providers, binding handlers) take `&mut self` and therefore
//! cannot overlap with dispatch or completion, which take `&self`.

use crate::argument::Argument;
use crate::config::Messages;
use crate::error::TreeError;
use crate::handler::{Binding, HandlerRegistry};
use crate::provider::{ProviderRegistry, TypeProvider};
use crate::sender::{Audience, Sender};
use crate::value::{describe_kinds, describe_slots, ValueKind};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The alias that marks an anonymous passthrough node.
pub const ANONYMOUS: &str = "_";

/// Index of a node within its [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One command or subcommand.
///
/// Built by the parser, or by hand for commands added at runtime:
///
/// ```rust
/// use cmdtree::{Argument, Audience, CommandNode, CommandTree};
///
/// let mut tree = CommandTree::new();
/// let root = tree.add_root(CommandNode::new(["kit"]).help("Kit commands"));
/// let claim = tree
///     .add_child(
///         root,
///         CommandNode::new(["claim", "c"])
///             .argument(Argument::new("string", "name"))
///             .audience(Audience::Player)
///             .hook("claimKit"),
///     )
///     .unwrap();
/// assert_eq!(tree.node(claim).unwrap().parent(), Some(root));
/// ```
#[derive(Debug, Clone)]
pub struct CommandNode {
    pub(crate) aliases: Vec<String>,
    pub(crate) permission: Option<String>,
    pub(crate) audience: Audience,
    pub(crate) help: Option<String>,
    pub(crate) hide_sub: bool,
    pub(crate) hook: Option<String>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) providers: ProviderRegistry,
    pub(crate) binding: Binding,
    pub(crate) line: Option<usize>,
}

impl CommandNode {
    /// Creates a node. The first alias is the primary name; `_` makes the
    /// node an anonymous passthrough.
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            permission: None,
            audience: Audience::Everyone,
            help: None,
            hide_sub: false,
            hook: None,
            arguments: Vec::new(),
            children: Vec::new(),
            parent: None,
            providers: ProviderRegistry::new(),
            binding: Binding::Unbound,
            line: None,
        }
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn audience(mut self, audience: Audience) -> Self {
        self.audience = audience;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Keeps this node's children out of help listings that reach it
    /// from above.
    pub fn hide_sub(mut self) -> Self {
        self.hide_sub = true;
        self
    }

    /// Names the handler this node binds to at registration.
    pub fn hook(mut self, hook: impl Into<String>) -> Self {
        self.hook = Some(hook.into());
        self
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn primary_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(ANONYMOUS)
    }

    pub fn has_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }

    /// Returns true for anonymous passthrough nodes, which are tried with the
    /// full token list instead of being selected by a token.
    pub fn is_anonymous(&self) -> bool {
        self.has_alias(ANONYMOUS)
    }

    pub fn required_permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn users(&self) -> Audience {
        self.audience
    }

    /// The help text as declared, without the `hidesub` default.
    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn hides_subcommands(&self) -> bool {
        self.hide_sub
    }

    pub fn hook_name(&self) -> Option<&str> {
        self.hook.as_deref()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    /// Returns true once a handler has been bound successfully.
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    /// The 1-based source line of the node's header, for parsed nodes.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub(crate) fn effective_help<'a>(&'a self, messages: &'a Messages) -> Option<&'a str> {
        match &self.help {
            Some(help) => Some(help),
            None if self.hide_sub => Some(&messages.hidden_subcommands),
            None => None,
        }
    }
}

/// A forest of commands.
#[derive(Debug, Default)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
    roots: Vec<NodeId>,
    messages: Messages,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// The top-level commands, in definition order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.0]
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    /// Number of nodes across all roots.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finds the first root with `alias`.
    pub fn find_root(&self, alias: &str) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.get(id).has_alias(alias))
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn set_messages(&mut self, messages: Messages) {
        self.messages = messages;
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn add_root(&mut self, node: CommandNode) -> NodeId {
        self.insert(node, None)
    }

    /// Appends a child to `parent`.
    ///
    /// The child does not inherit providers already registered above it.
    pub fn add_child(&mut self, parent: NodeId, node: CommandNode) -> Result<NodeId, TreeError> {
        self.check(parent)?;
        Ok(self.insert(node, Some(parent)))
    }

    pub(crate) fn insert(&mut self, mut node: CommandNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// `id` followed by all nodes below it, depth first in child order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.get(current).children.iter().rev().copied());
        }
        out
    }

    /// The name a node is shown under. Anonymous nodes borrow the name of
    /// their parent.
    pub fn display_name(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        match node.parent {
            Some(parent) if node.is_anonymous() => self.display_name(parent),
            _ => Some(node.primary_name()),
        }
    }

    /// Every hook name used in the tree, sorted and deduplicated.
    pub fn hook_names(&self) -> Vec<&str> {
        let mut hooks: Vec<&str> = self.nodes.iter().filter_map(CommandNode::hook_name).collect();
        hooks.sort_unstable();
        hooks.dedup();
        hooks
    }

    /// Installs `provider` on `id` and every node currently below it.
    pub fn register_provider(&mut self, id: NodeId, provider: TypeProvider) -> Result<(), TreeError> {
        self.check(id)?;
        info!(provider = provider.name(), command = self.get(id).primary_name(), "registering type provider");
        let provider = Arc::new(provider);
        for node in self.descendants(id) {
            self.nodes[node.0].providers.insert(Arc::clone(&provider));
        }
        Ok(())
    }

    /// Resolves the hook of `id` and every node below it against `handlers`.
    ///
    /// A hook without a handler leaves its node unbound. A typed handler whose
    /// parameters disagree with the node's arguments is recorded as a
    /// mismatch and reported when the node is invoked.
    pub fn bind_handlers(&mut self, id: NodeId, handlers: &HandlerRegistry) -> Result<(), TreeError> {
        self.check(id)?;
        for current in self.descendants(id) {
            let binding = self.resolve_binding(current, handlers);
            self.nodes[current.0].binding = binding;
        }
        Ok(())
    }

    fn resolve_binding(&self, id: NodeId, handlers: &HandlerRegistry) -> Binding {
        let node = self.get(id);
        let Some(hook) = node.hook.as_deref() else {
            return Binding::Unbound;
        };
        let Some(handler) = handlers.get(hook) else {
            debug!(hook, command = node.primary_name(), "no handler for hook");
            return Binding::Unbound;
        };
        let Some(found) = handler.signature() else {
            return Binding::Bound(Arc::clone(handler));
        };
        let expected: Vec<Option<ValueKind>> = node
            .arguments
            .iter()
            .map(|argument| argument.value_kind(&node.providers))
            .collect();
        let compatible = expected.len() == found.len()
            && expected
                .iter()
                .zip(&found)
                .all(|(expected, found)| expected.map_or(true, |kind| kind == *found));
        if compatible {
            return Binding::Bound(Arc::clone(handler));
        }
        warn!(
            hook,
            expected = %describe_slots(&expected),
            found = %describe_kinds(&found),
            "handler parameters do not match command arguments"
        );
        Binding::Mismatch { expected, found }
    }

    /// Returns the message that refuses `sender` access to `node`, if any.
    pub(crate) fn denial(&self, node: &CommandNode, sender: &dyn Sender) -> Option<String> {
        if let Some(permission) = &node.permission {
            if !sender.has_permission(permission) {
                return Some(self.messages.no_permission(permission));
            }
        }
        if node.audience.permits(sender.kind()) {
            None
        } else if node.audience == Audience::Console {
            Some(self.messages.console_only.clone())
        } else {
            Some(self.messages.player_only.clone())
        }
    }
}
