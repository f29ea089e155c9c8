//! The command definition format.
//!
//! Definitions are line oriented. A line ending in `{` opens a command, a
//! line holding only `}` closes it, and directive lines in between describe
//! it:
//!
//! ```text
//! give,g item:_ {
//!     hook giveHook
//!     permission items.give
//!     users player
//!     help Give yourself an item
//!     int:amount {
//!         hook giveAmountHook
//!     }
//! }
//! ```
//!
//! The header is `aliases arguments... {` where aliases are comma separated
//! and each argument is `type:name`. A `{` line inside a command opens a
//! child. Lines that are neither headers, closers nor known directives are
//! ignored, as are lines between top-level commands.
//!
//! A command that is still open at the end of the input is dropped together
//! with everything after it.

use crate::argument::Argument;
use crate::error::ParseError;
use crate::sender::Audience;
use crate::tree::{CommandNode, CommandTree, NodeId};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// A parsed command before it is placed in a tree.
struct Block {
    node: CommandNode,
    children: Vec<Block>,
    /// Index of the closing line.
    end: usize,
}

/// Parses every top-level command in `source`.
///
/// ```rust
/// let tree = cmdtree::parse("
/// ping {
///     hook ping
/// }
/// pong {
/// }
/// ")?;
/// assert_eq!(tree.roots().len(), 2);
/// # Ok::<(), cmdtree::ParseError>(())
/// ```
pub fn parse(source: &str) -> Result<CommandTree, ParseError> {
    let mut tree = CommandTree::new();
    tree.load_str(source)?;
    Ok(tree)
}

/// Parses only the first top-level command in `source`.
pub fn parse_single(source: &str) -> Result<CommandTree, ParseError> {
    let lines: Vec<&str> = source.lines().collect();
    let mut tree = CommandTree::new();
    if let Some(block) = next_block(&lines, 0)? {
        attach(&mut tree, block, None);
    }
    Ok(tree)
}

/// Reads `reader` to the end and parses every command in it.
pub fn from_reader(mut reader: impl Read) -> Result<CommandTree, ParseError> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse(&source)
}

/// Parses every command in the file at `path`.
pub fn load_file(path: impl AsRef<Path>) -> Result<CommandTree, ParseError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading command definitions");
    parse(&fs::read_to_string(path)?)
}

impl CommandTree {
    /// Parses `source` and adds its commands as new roots.
    ///
    /// Nothing is added when the source has an error.
    pub fn load_str(&mut self, source: &str) -> Result<Vec<NodeId>, ParseError> {
        let lines: Vec<&str> = source.lines().collect();
        let mut blocks = Vec::new();
        let mut from = 0;
        while let Some(block) = next_block(&lines, from)? {
            from = block.end + 1;
            blocks.push(block);
        }
        Ok(blocks
            .into_iter()
            .map(|block| attach(self, block, None))
            .collect())
    }
}

impl FromStr for CommandTree {
    type Err = ParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        parse(source)
    }
}

fn attach(tree: &mut CommandTree, block: Block, parent: Option<NodeId>) -> NodeId {
    let id = tree.insert(block.node, parent);
    for child in block.children {
        attach(tree, child, Some(id));
    }
    id
}

/// Finds the next header at or after `from` and parses its block.
fn next_block(lines: &[&str], from: usize) -> Result<Option<Block>, ParseError> {
    let header = (from..lines.len()).find(|&index| lines[index].trim().ends_with('{'));
    match header {
        Some(start) => parse_block(lines, start),
        None => Ok(None),
    }
}

fn parse_block(lines: &[&str], start: usize) -> Result<Option<Block>, ParseError> {
    let mut node = parse_header(lines[start].trim(), start + 1)?;
    info!(command = node.primary_name(), line = start + 1, "loading command");

    let mut children = Vec::new();
    let mut index = start + 1;
    while let Some(raw) = lines.get(index) {
        let line = raw.trim();
        if line.ends_with('{') {
            let Some(child) = parse_block(lines, index)? else {
                return Ok(None);
            };
            index = child.end + 1;
            children.push(child);
            continue;
        }
        if line == "}" {
            return Ok(Some(Block {
                node,
                children,
                end: index,
            }));
        }
        apply_directive(&mut node, line, index + 1)?;
        index += 1;
    }

    warn!(
        command = node.primary_name(),
        line = start + 1,
        "command block is never closed, ignoring it and the rest of the input"
    );
    Ok(None)
}

fn parse_header(line: &str, number: usize) -> Result<CommandNode, ParseError> {
    let body = line.strip_suffix('{').unwrap_or(line);
    let mut tokens = body.split_whitespace();
    let aliases = tokens
        .next()
        .ok_or(ParseError::MissingAliases { line: number })?;
    if aliases.split(',').any(str::is_empty) {
        return Err(ParseError::EmptyAlias {
            line: number,
            aliases: aliases.to_string(),
        });
    }

    let mut node = CommandNode::new(aliases.split(','));
    node.line = Some(number);
    for token in tokens {
        let argument = Argument::parse(token).ok_or_else(|| ParseError::MalformedArgument {
            line: number,
            token: token.to_string(),
        })?;
        if node.arguments.last().is_some_and(Argument::is_multistring) {
            return Err(ParseError::MultistringNotLast { line: number });
        }
        node.arguments.push(argument);
    }
    Ok(node)
}

fn apply_directive(node: &mut CommandNode, line: &str, number: usize) -> Result<(), ParseError> {
    if let Some(hook) = line.strip_prefix("hook ") {
        node.hook = Some(hook.trim().to_string());
    } else if let Some(permission) = line.strip_prefix("permission ") {
        node.permission = Some(permission.trim().to_string());
    } else if let Some(users) = line.strip_prefix("users ") {
        let users = users.trim();
        node.audience = Audience::parse(users).ok_or_else(|| ParseError::InvalidAudience {
            line: number,
            value: users.to_string(),
        })?;
    } else if let Some(help) = line.strip_prefix("help ") {
        node.help = Some(help.trim().to_string());
    } else if line.starts_with("hidesub") {
        node.hide_sub = true;
    }
    Ok(())
}
