//! Routing a token sequence to a handler.
//!
//! Dispatch starts at a root and walks down:
//!
//! 1. A sender refused by the node's permission or audience is told so, and
//!    the walk ends.
//! 2. If the node has a handler and the tokens convert to its arguments, the
//!    handler runs.
//! 3. With no tokens left, the node's help is shown.
//! 4. Otherwise children are tried in order: a child named by the first
//!    token gets the rest, an anonymous child gets all of them. The first
//!    child that handles the tokens ends the walk.
//! 5. An anonymous node that got this far reports the tokens as unhandled so
//!    its parent can try the next sibling; any other node shows its help.
//!
//! Handler failures never escape. They are logged, the sender gets a generic
//! message, and the tokens count as handled.

use crate::argument::convert_arguments;
use crate::handler::{Binding, SignatureMismatch};
use crate::sender::Sender;
use crate::tree::{CommandTree, NodeId};
use crate::value::{describe_kinds, describe_slots, Value};
use tracing::{debug, error, warn};

impl CommandTree {
    /// Runs `tokens` against the command rooted at `root`.
    ///
    /// Returns true when the tokens were handled, which includes denials,
    /// help output and failed handlers. Returns false only for an unknown
    /// `root`, or when an anonymous root matched nothing.
    pub fn execute<S: AsRef<str>>(&self, root: NodeId, sender: &dyn Sender, tokens: &[S]) -> bool {
        if self.node(root).is_none() {
            warn!(node = %root, "execute called with unknown node");
            return false;
        }
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.execute_node(root, sender, &tokens)
    }

    fn execute_node(&self, id: NodeId, sender: &dyn Sender, tokens: &[&str]) -> bool {
        let node = self.get(id);
        if let Some(message) = self.denial(node, sender) {
            debug!(command = node.primary_name(), "sender refused");
            sender.send(&message);
            return true;
        }

        if !matches!(node.binding, Binding::Unbound) {
            if let Some(values) = convert_arguments(&node.arguments, tokens, &node.providers) {
                self.invoke(id, sender, &values);
                return true;
            }
        }

        if tokens.is_empty() {
            self.send_help(id, sender);
            return true;
        }

        for &child_id in &node.children {
            let child = self.get(child_id);
            let handled = if child.is_anonymous() {
                self.execute_node(child_id, sender, tokens)
            } else if child.has_alias(tokens[0]) {
                self.execute_node(child_id, sender, &tokens[1..])
            } else {
                continue;
            };
            if handled {
                return true;
            }
        }

        if node.is_anonymous() {
            return false;
        }
        debug!(command = node.primary_name(), ?tokens, "no route, showing help");
        self.send_help(id, sender);
        true
    }

    fn invoke(&self, id: NodeId, sender: &dyn Sender, values: &[Value]) {
        let node = self.get(id);
        let hook = node.hook.as_deref().unwrap_or_default();
        match &node.binding {
            Binding::Bound(handler) => match handler.handle(sender, values) {
                Ok(()) => debug!(hook, "command handled"),
                Err(err) => {
                    if let Some(mismatch) = err.downcast_ref::<SignatureMismatch>() {
                        error!(
                            hook,
                            expected = %describe_kinds(&mismatch.expected),
                            found = %describe_kinds(&mismatch.found),
                            "could not invoke handler, invalid arguments"
                        );
                    } else {
                        error!(hook, error = %format!("{err:#}"), "handler failed");
                    }
                    sender.send(&self.messages().execution_failed);
                }
            },
            Binding::Mismatch { expected, found } => {
                error!(
                    hook,
                    expected = %describe_slots(expected),
                    found = %describe_kinds(found),
                    "could not invoke handler, invalid arguments"
                );
                sender.send(&self.messages().execution_failed);
            }
            Binding::Unbound => {}
        }
    }
}
