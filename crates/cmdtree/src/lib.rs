//! Declarative command trees.
//!
//! `cmdtree` reads a small brace-block format describing a hierarchy of
//! commands, builds it into a [`CommandTree`], and then routes command lines
//! through that tree to handler functions. The same tree answers tab
//! completion queries and renders help.
//!
//! # Features
//!
//! - **Definition format**: aliases, typed arguments, permissions, audience
//!   restriction, help text and nested subcommands ([`parse`], [`load_file`])
//! - **Typed arguments**: `string`, `int`, `double`, `multistring` and custom
//!   types backed by a [`TypeProvider`]
//! - **Dispatch with backtracking**: literal subcommands, anonymous `_`
//!   passthrough children, help fallback ([`CommandTree::execute`])
//! - **Completion**: subcommand names, aliases and provider candidates
//!   ([`CommandTree::complete`])
//! - **Explicit handler registry**: hooks are bound by name, typed handlers
//!   are checked against the declared arguments ([`HandlerRegistry`], [`typed`])
//!
//! # Example
//!
//! ```rust
//! use cmdtree::{typed, CommandTable, HandlerRegistry, RecordingSender, Sender, TypeProvider};
//!
//! let mut tree = cmdtree::parse("
//! give,g item:_ {
//!     hook give
//!     _ int:amount {
//!         hook giveAmount
//!     }
//! }
//! ")?;
//! let give = tree.roots()[0];
//! tree.register_provider(give, TypeProvider::new("item", |s: &str| {
//!     ["stone", "diamond"].contains(&s).then(|| s.to_string())
//! }))?;
//!
//! let handlers = HandlerRegistry::new()
//!     .hook("give", typed(|sender: &dyn Sender, (cmdtree::Custom(item),): (cmdtree::Custom<String>,)| {
//!         sender.send(&format!("one {item}"));
//!     }))?
//!     .hook("giveAmount", typed(|sender: &dyn Sender, (n,): (i64,)| {
//!         sender.send(&format!("{n} of them"));
//!     }))?;
//!
//! let mut table = CommandTable::new();
//! tree.register(give, "demo", &handlers, &mut table)?;
//!
//! let sender = RecordingSender::player();
//! table.dispatch_line(&tree, &sender, "/give diamond");
//! table.dispatch_line(&tree, &sender, "/g 5");
//! assert_eq!(sender.messages(), ["one diamond", "5 of them"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
mod argument;
mod complete;
mod config;
mod dispatch;
mod error;
mod handler;
mod help;
mod parser;
mod provider;
mod register;
mod sender;
mod serialize;
mod tree;
mod value;

// Re-export core types
pub use argument::{Argument, ArgumentKind};
pub use config::Messages;
pub use error::{ParseError, RegistryError, TreeError};
pub use handler::{
    typed, FnHandler, Handler, HandlerRegistry, HandlerResult, IntoHandlerResult,
    SignatureMismatch, TypedHandler,
};
pub use parser::{from_reader, load_file, parse, parse_single};
pub use provider::{ProviderRegistry, TypeProvider};
pub use register::{CommandMap, CommandTable};
pub use sender::{Audience, RecordingSender, Sender, SenderKind};
pub use serialize::{to_json, to_yaml, NodeShape, SerializeError};
pub use tree::{CommandNode, CommandTree, NodeId, ANONYMOUS};
pub use value::{Custom, CustomKind, CustomValue, FromArgs, FromValue, Value, ValueKind};
