//! Help rendering.
//!
//! Help for a node is a header followed by one line per visible command in
//! its subtree:
//!
//! ```text
//! --[ Help for kit ]--
//! kit: Kit commands
//! kit|kits claim <string:name>: Claim a kit
//! ```
//!
//! A line is shown only when the command has help text and the sender may
//! use it. Aliases of every ancestor make up the path, joined with `|`. An
//! anonymous command is listed by its arguments under its parent's path.
//! A `hidesub` command keeps its subtree out of help rendered from above it,
//! but its own help always lists everything.

use crate::sender::Sender;
use crate::tree::{CommandNode, CommandTree, NodeId};

impl CommandTree {
    /// Renders the help for `id` as `sender` would see it.
    pub fn help(&self, id: NodeId, sender: &dyn Sender) -> Option<String> {
        let name = self.display_name(id)?;
        let mut message = self.messages().help_header(name);
        let lines = self.help_lines(id, sender);
        if !lines.is_empty() {
            message.push('\n');
            message.push_str(&lines.join("\n"));
        }
        Some(message)
    }

    /// The help lines for `id`, without the header.
    pub fn help_lines(&self, id: NodeId, sender: &dyn Sender) -> Vec<String> {
        let mut lines = Vec::new();
        if self.node(id).is_some() {
            self.collect_help(id, sender, "", true, &mut lines);
        }
        lines
    }

    pub(crate) fn send_help(&self, id: NodeId, sender: &dyn Sender) {
        if let Some(message) = self.help(id, sender) {
            sender.send(&message);
        }
    }

    fn collect_help(
        &self,
        id: NodeId,
        sender: &dyn Sender,
        prefix: &str,
        top: bool,
        out: &mut Vec<String>,
    ) {
        let node = self.get(id);
        if let Some(help) = node.effective_help(self.messages()) {
            if !(top && node.hide_sub) && self.denial(node, sender).is_none() {
                let usage = if node.is_anonymous() {
                    format!("{prefix}{}", self.argument_list(node))
                } else {
                    format!("{prefix}{}", self.full_name(node))
                };
                out.push(format!("{}: {help}", usage.trim()));
            }
        }
        if node.hide_sub && !top {
            return;
        }

        let child_prefix = if node.is_anonymous() {
            prefix.to_string()
        } else {
            format!("{prefix}{} ", node.aliases.join("|"))
        };
        for &child in &node.children {
            self.collect_help(child, sender, &child_prefix, false, out);
        }
    }

    fn argument_list(&self, node: &CommandNode) -> String {
        node.arguments
            .iter()
            .map(|argument| argument.display(&node.providers))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn full_name(&self, node: &CommandNode) -> String {
        let arguments = self.argument_list(node);
        if arguments.is_empty() {
            node.primary_name().to_string()
        } else {
            format!("{} {arguments}", node.primary_name())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::sender::RecordingSender;

    const WARP: &str = "
warp,w {
    help Warp commands
    set string:name {
        help Set a warp
        permission warp.set
    }
    admin {
        hidesub
        purge {
            help Remove every warp
        }
    }
    silent {
        hook silent
    }
}
";

    #[test]
    fn test_help_paths_and_permissions() {
        let tree = parse(WARP).unwrap();
        let root = tree.roots()[0];
        let sender = RecordingSender::player().grant("warp.set");
        assert_eq!(
            tree.help(root, &sender).unwrap(),
            "--[ Help for warp ]--\n\
             warp: Warp commands\n\
             warp|w set <string:name>: Set a warp\n\
             warp|w admin: Subcommands hidden"
        );

        let without = RecordingSender::player();
        assert_eq!(
            tree.help_lines(root, &without),
            vec!["warp: Warp commands", "warp|w admin: Subcommands hidden"]
        );
    }

    #[test]
    fn test_hidden_node_lists_own_subtree() {
        let tree = parse(WARP).unwrap();
        let root = tree.node(tree.roots()[0]).unwrap();
        let admin = root.children()[1];
        assert_eq!(
            tree.help_lines(admin, &RecordingSender::console()),
            vec!["admin purge: Remove every warp"]
        );
    }

    #[test]
    fn test_anonymous_child_uses_parent_name() {
        let tree = parse(
            "
give {
    help Give items
    _ string:item int:amount {
        help Give a stack
        extra {
            help Extra options
        }
    }
}
",
        )
        .unwrap();
        let root = tree.roots()[0];
        let anon = tree.node(root).unwrap().children()[0];
        let sender = RecordingSender::player();
        assert_eq!(
            tree.help_lines(root, &sender),
            vec![
                "give: Give items",
                "give <string:item> <int:amount>: Give a stack",
                "give extra: Extra options",
            ]
        );
        assert!(tree.help(anon, &sender).unwrap().starts_with("--[ Help for give ]--"));
    }

    #[test]
    fn test_help_without_lines_is_header_only() {
        let tree = parse("bare {\n}\n").unwrap();
        assert_eq!(
            tree.help(tree.roots()[0], &RecordingSender::console()).unwrap(),
            "--[ Help for bare ]--"
        );
    }
}
