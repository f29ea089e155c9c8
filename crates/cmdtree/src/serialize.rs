//! Tree inspection and serialization.
//!
//! [`NodeShape`] is a plain snapshot of a command subtree that can be emitted
//! as JSON or YAML. [`CommandTree::to_dsl`] writes a subtree back in the
//! definition format, which parses to the same shape.

use crate::sender::Audience;
use crate::tree::{CommandTree, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use thiserror::Error;

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The declared structure of a command and its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeShape {
    pub aliases: Vec<String>,
    /// Arguments as written, `type:name`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(default)]
    pub audience: Audience,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hide_sub: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeShape>,
}

impl CommandTree {
    /// Snapshots the subtree at `id`.
    pub fn shape(&self, id: NodeId) -> Option<NodeShape> {
        let node = self.node(id)?;
        Some(NodeShape {
            aliases: node.aliases().to_vec(),
            arguments: node.arguments().iter().map(|a| a.token()).collect(),
            hook: node.hook_name().map(str::to_string),
            permission: node.required_permission().map(str::to_string),
            audience: node.users(),
            help: node.help_text().map(str::to_string),
            hide_sub: node.hides_subcommands(),
            children: node
                .children()
                .iter()
                .filter_map(|&child| self.shape(child))
                .collect(),
        })
    }

    /// Snapshots every root.
    pub fn shapes(&self) -> Vec<NodeShape> {
        self.roots().iter().filter_map(|&id| self.shape(id)).collect()
    }

    /// Writes the subtree at `id` in the definition format.
    pub fn to_dsl(&self, id: NodeId) -> Option<String> {
        let shape = self.shape(id)?;
        let mut out = String::new();
        write_block(&mut out, &shape, 0);
        Some(out)
    }

    /// Writes every root in the definition format.
    pub fn forest_to_dsl(&self) -> String {
        let mut out = String::new();
        for shape in self.shapes() {
            write_block(&mut out, &shape, 0);
        }
        out
    }
}

fn write_block(out: &mut String, shape: &NodeShape, depth: usize) {
    let indent = "    ".repeat(depth);
    let inner = "    ".repeat(depth + 1);

    let mut header = shape.aliases.join(",");
    for argument in &shape.arguments {
        header.push(' ');
        header.push_str(argument);
    }
    let _ = writeln!(out, "{indent}{header} {{");
    if let Some(hook) = &shape.hook {
        let _ = writeln!(out, "{inner}hook {hook}");
    }
    if let Some(permission) = &shape.permission {
        let _ = writeln!(out, "{inner}permission {permission}");
    }
    if shape.audience != Audience::Everyone {
        let _ = writeln!(out, "{inner}users {}", shape.audience);
    }
    if let Some(help) = &shape.help {
        let _ = writeln!(out, "{inner}help {help}");
    }
    if shape.hide_sub {
        let _ = writeln!(out, "{inner}hidesub");
    }
    for child in &shape.children {
        write_block(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}}}");
}

/// Serializes data to JSON format.
pub fn to_json<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Serializes data to YAML format.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    const SOURCE: &str = "\
mail,m {
    help Mail commands
    send player:to multistring:message {
        hook send
        permission mail.send
        users player
        help Send a message
    }
    admin {
        hidesub
        purge *int:days {
            hook purge
        }
    }
}
";

    #[test]
    fn test_shape() {
        let tree = parse(SOURCE).unwrap();
        let shape = tree.shape(tree.roots()[0]).unwrap();
        assert_eq!(shape.aliases, vec!["mail", "m"]);
        assert_eq!(shape.children.len(), 2);
        let send = &shape.children[0];
        assert_eq!(send.arguments, vec!["player:to", "multistring:message"]);
        assert_eq!(send.audience, Audience::Player);
        assert_eq!(shape.children[1].children[0].arguments, vec!["*int:days"]);
    }

    #[test]
    fn test_to_dsl_reproduces_source() {
        let tree = parse(SOURCE).unwrap();
        assert_eq!(tree.to_dsl(tree.roots()[0]).unwrap(), SOURCE);
        assert_eq!(tree.forest_to_dsl(), SOURCE);
    }

    #[test]
    fn test_json_and_yaml() {
        let tree = parse(SOURCE).unwrap();
        let shapes = tree.shapes();

        let json = to_json(&shapes).unwrap();
        let back: Vec<NodeShape> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shapes);
        assert!(json.contains("\"audience\": \"player\""));

        let yaml = to_yaml(&shapes).unwrap();
        let back: Vec<NodeShape> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, shapes);
    }
}
