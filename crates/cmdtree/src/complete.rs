//! Tab completion.
//!
//! Completion walks the same path dispatch would and answers with the valid
//! values for the last, partially typed token. Every candidate starts with
//! that partial token, ignoring case.

use crate::argument::ArgumentKind;
use crate::sender::Sender;
use crate::tree::{CommandTree, NodeId};
use tracing::debug;

impl CommandTree {
    /// Returns the completions for the last of `tokens`, or `None` when the
    /// sender may not use the command or no node along the path has any.
    ///
    /// `tokens` holds everything typed after the command label; an empty
    /// last token asks for every candidate at that position.
    ///
    /// ```rust
    /// use cmdtree::RecordingSender;
    ///
    /// let tree = cmdtree::parse("
    /// warp {
    ///     set string:name {
    ///     }
    ///     delete,del string:name {
    ///     }
    /// }
    /// ")?;
    /// let root = tree.roots()[0];
    /// let sender = RecordingSender::player();
    /// assert_eq!(tree.complete(root, &sender, &[""]), Some(vec!["set".into(), "delete".into()]));
    /// assert_eq!(tree.complete(root, &sender, &["DE"]), Some(vec!["delete".into()]));
    /// assert_eq!(tree.complete(root, &sender, &["x"]), None);
    /// # Ok::<(), cmdtree::ParseError>(())
    /// ```
    pub fn complete<S: AsRef<str>>(
        &self,
        root: NodeId,
        sender: &dyn Sender,
        tokens: &[S],
    ) -> Option<Vec<String>> {
        self.node(root)?;
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        self.complete_node(root, sender, &tokens)
    }

    fn complete_node(&self, id: NodeId, sender: &dyn Sender, tokens: &[&str]) -> Option<Vec<String>> {
        let (&last, _) = tokens.split_last()?;
        let node = self.get(id);
        if self.denial(node, sender).is_some() {
            return None;
        }
        let partial = last.trim().to_lowercase();
        let mut candidates: Vec<String> = Vec::new();

        if let Some(argument) = node.arguments.get(tokens.len() - 1) {
            if matches!(argument.kind(), ArgumentKind::Custom(_)) {
                if let Some(provider) = argument.provider(&node.providers) {
                    candidates.extend(provider.complete(&partial, sender));
                }
            }
        }

        if tokens.len() == 1 {
            for &child_id in &node.children {
                let child = self.get(child_id);
                if child.is_anonymous() {
                    continue;
                }
                candidates.push(child.primary_name().to_string());
                // Aliases are offered only when the primary name is not
                // already a longer match.
                let primary = child.primary_name().to_lowercase();
                let primary_covers = primary.starts_with(&partial) && primary != partial;
                if !last.is_empty() && !primary_covers {
                    candidates.extend(
                        child
                            .aliases
                            .iter()
                            .filter(|alias| alias.to_lowercase().starts_with(&partial))
                            .cloned(),
                    );
                }
            }
            if !node.is_anonymous() && node.has_alias(&partial) {
                candidates.extend(node.aliases.iter().cloned());
            }
        }

        candidates.retain(|candidate| candidate.to_lowercase().starts_with(&partial));
        let mut seen = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !seen.contains(&candidate) {
                seen.push(candidate);
            }
        }
        if !seen.is_empty() {
            return Some(seen);
        }

        // An anonymous child stands in for this node, so descending into it
        // offers nothing and ends the search.
        let first = tokens[0].trim().to_lowercase();
        for &child_id in &node.children {
            let child = self.get(child_id);
            if child.is_anonymous() {
                debug!(command = node.primary_name(), "anonymous child ends completion");
                return None;
            }
            if child.has_alias(&first) {
                debug!(command = child.primary_name(), "completing below child");
                return self.complete_node(child_id, sender, &tokens[1..]);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::provider::TypeProvider;
    use crate::sender::RecordingSender;

    const HOME: &str = "
home,h {
    set,save,s string:name {
    }
    teleport,tp home:target {
        permission home.tp
    }
    list {
    }
}
";

    fn homes() -> TypeProvider {
        TypeProvider::new("home", |s: &str| Some(s.to_string()))
            .with_completions(|_| vec!["Base".into(), "bunker".into(), "mine".into()])
    }

    #[test]
    fn test_empty_partial_lists_primary_names() {
        let tree = parse(HOME).unwrap();
        let root = tree.roots()[0];
        assert_eq!(
            tree.complete(root, &RecordingSender::player(), &[""]).unwrap(),
            vec!["set", "teleport", "list"]
        );
    }

    #[test]
    fn test_aliases_only_when_primary_does_not_cover() {
        let tree = parse(HOME).unwrap();
        let root = tree.roots()[0];
        let sender = RecordingSender::player();
        assert_eq!(tree.complete(root, &sender, &["s"]).unwrap(), vec!["set"]);
        assert_eq!(tree.complete(root, &sender, &["sa"]).unwrap(), vec!["save"]);
        assert_eq!(tree.complete(root, &sender, &["T"]).unwrap(), vec!["teleport"]);
        assert_eq!(tree.complete(root, &sender, &["tp"]).unwrap(), vec!["tp"]);
    }

    #[test]
    fn test_provider_candidates_below_child() {
        let mut tree = parse(HOME).unwrap();
        let root = tree.roots()[0];
        tree.register_provider(root, homes()).unwrap();
        let sender = RecordingSender::player().grant("home.tp");
        assert_eq!(
            tree.complete(root, &sender, &["tp", "b"]).unwrap(),
            vec!["Base", "bunker"]
        );
        assert_eq!(tree.complete(root, &sender, &["tp", "x"]), None);
    }

    #[test]
    fn test_denied_child_completes_nothing() {
        let mut tree = parse(HOME).unwrap();
        let root = tree.roots()[0];
        tree.register_provider(root, homes()).unwrap();
        assert_eq!(
            tree.complete(root, &RecordingSender::player(), &["tp", ""]),
            None
        );
    }

    #[test]
    fn test_own_aliases_when_partial_names_node() {
        let tree = parse(HOME).unwrap();
        let root = tree.roots()[0];
        assert_eq!(
            tree.complete(root, &RecordingSender::player(), &["h"]).unwrap(),
            vec!["home", "h"]
        );
    }

    #[test]
    fn test_anonymous_child_ends_descent() {
        let mut tree = parse(
            "
home {
    list {
    }
    _ home:target {
    }
    set string:name {
    }
}
",
        )
        .unwrap();
        let root = tree.roots()[0];
        tree.register_provider(root, homes()).unwrap();
        let sender = RecordingSender::player();
        assert_eq!(tree.complete(root, &sender, &[""]).unwrap(), vec!["list", "set"]);
        assert_eq!(tree.complete(root, &sender, &["bu"]), None);
        assert_eq!(tree.complete(root, &sender, &["set", ""]), None);
    }

    #[test]
    fn test_empty_tokens() {
        let tree = parse(HOME).unwrap();
        let none: [&str; 0] = [];
        assert_eq!(tree.complete(tree.roots()[0], &RecordingSender::player(), &none), None);
    }
}
