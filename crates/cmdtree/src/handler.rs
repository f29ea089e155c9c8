//! Command handler types.
//!
//! A node names its handler with a `hook` directive. Handlers live in a
//! [`HandlerRegistry`] that is matched against those names when a command is
//! registered; hook names are exact and case-sensitive.
//!
//! # Core Types
//!
//! - [`Handler`]: Trait for command handlers
//! - [`FnHandler`]: Wraps a closure over the raw converted [`Value`]s
//! - [`TypedHandler`]: Wraps a closure over a typed parameter tuple, built
//!   with [`typed`]; its parameter kinds are checked at registration
//! - [`HandlerResult`]: The result type for handlers
//!
//! # Example
//!
//! ```rust
//! use cmdtree::{typed, FnHandler, HandlerRegistry, Sender, Value};
//!
//! let handlers = HandlerRegistry::new()
//!     .hook("ping", FnHandler::new(|sender: &dyn Sender, _args: &[Value]| {
//!         sender.send("pong");
//!     }))?
//!     .hook("give", typed(|sender: &dyn Sender, (item, amount): (String, i64)| {
//!         sender.send(&format!("gave {amount} {item}"));
//!         Ok::<_, anyhow::Error>(())
//!     }))?;
//! assert_eq!(handlers.len(), 2);
//! # Ok::<(), cmdtree::RegistryError>(())
//! ```

use crate::error::RegistryError;
use crate::sender::Sender;
use crate::value::{describe_kinds, describe_slots, FromArgs, Value, ValueKind};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

/// The result type for command handlers.
///
/// Enables use of the `?` operator for error propagation.
pub type HandlerResult = Result<(), anyhow::Error>;

/// Trait for types that can be converted into a [`HandlerResult`].
///
/// This lets handler closures return either nothing or a `Result<(), E>`.
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(())
    }
}

impl<E> IntoHandlerResult for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map_err(Into::into)
    }
}

/// Raised when a handler is offered arguments it cannot take.
#[derive(Debug, Clone, Error)]
#[error("handler takes ({}) but was given ({})", describe_kinds(.found), describe_kinds(.expected))]
pub struct SignatureMismatch {
    /// The kinds the command definition supplies.
    pub expected: Vec<ValueKind>,
    /// The kinds the handler declares.
    pub found: Vec<ValueKind>,
}

/// Trait for command handlers.
///
/// Handlers are shared between every node that names them and may be reached
/// from any thread the host dispatches on.
pub trait Handler: Send + Sync {
    /// Runs the command with its converted arguments, in declaration order.
    fn handle(&self, sender: &dyn Sender, args: &[Value]) -> HandlerResult;

    /// The argument kinds this handler takes, if it declares them.
    ///
    /// Declared kinds are compared with the node's arguments when the
    /// command is registered.
    fn signature(&self) -> Option<Vec<ValueKind>> {
        None
    }
}

/// A handler wrapping a closure over the raw argument slice.
///
/// The closure can return `()` or any `Result<(), E>` with
/// `E: Into<anyhow::Error>`.
pub struct FnHandler<F, R = HandlerResult> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnHandler<F, R>
where
    F: Fn(&dyn Sender, &[Value]) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, R> Handler for FnHandler<F, R>
where
    F: Fn(&dyn Sender, &[Value]) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    fn handle(&self, sender: &dyn Sender, args: &[Value]) -> HandlerResult {
        (self.f)(sender, args).into_handler_result()
    }
}

/// A handler wrapping a closure over a typed parameter tuple.
pub struct TypedHandler<A, F, R = HandlerResult> {
    f: F,
    _phantom: PhantomData<fn(A) -> R>,
}

/// Builds a [`TypedHandler`].
///
/// The parameter tuple decides the handler's signature: `(String, i64)`
/// matches `string:item int:amount`, [`Custom<T>`](crate::Custom) matches a
/// provider producing `T`.
pub fn typed<A, F, R>(f: F) -> TypedHandler<A, F, R>
where
    A: FromArgs,
    F: Fn(&dyn Sender, A) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    TypedHandler {
        f,
        _phantom: PhantomData,
    }
}

impl<A, F, R> Handler for TypedHandler<A, F, R>
where
    A: FromArgs,
    F: Fn(&dyn Sender, A) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    fn handle(&self, sender: &dyn Sender, args: &[Value]) -> HandlerResult {
        let params = A::from_args(args).ok_or_else(|| SignatureMismatch {
            expected: args.iter().map(Value::kind).collect(),
            found: A::kinds(),
        })?;
        (self.f)(sender, params).into_handler_result()
    }

    fn signature(&self) -> Option<Vec<ValueKind>> {
        Some(A::kinds())
    }
}

/// Handlers keyed by hook name.
///
/// A hook name can be taken only once per registry.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler for `hook`.
    pub fn insert<H>(&mut self, hook: impl Into<String>, handler: H) -> Result<(), RegistryError>
    where
        H: Handler + 'static,
    {
        let hook = hook.into();
        if self.handlers.contains_key(&hook) {
            return Err(RegistryError::DuplicateHook(hook));
        }
        self.handlers.insert(hook, Arc::new(handler));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn hook<H>(mut self, hook: impl Into<String>, handler: H) -> Result<Self, RegistryError>
    where
        H: Handler + 'static,
    {
        self.insert(hook, handler)?;
        Ok(self)
    }

    pub fn get(&self, hook: &str) -> Option<&Arc<dyn Handler>> {
        self.handlers.get(hook)
    }

    pub fn contains(&self, hook: &str) -> bool {
        self.handlers.contains_key(hook)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooks: Vec<_> = self.handlers.keys().collect();
        hooks.sort();
        f.debug_struct("HandlerRegistry")
            .field("hooks", &hooks)
            .finish()
    }
}

/// The handler state of a node after registration.
#[derive(Clone, Default)]
pub(crate) enum Binding {
    #[default]
    Unbound,
    Bound(Arc<dyn Handler>),
    /// A handler was found but declares parameters the node cannot supply.
    Mismatch {
        expected: Vec<Option<ValueKind>>,
        found: Vec<ValueKind>,
    },
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Unbound => f.write_str("Unbound"),
            Binding::Bound(_) => f.write_str("Bound"),
            Binding::Mismatch { expected, found } => f
                .debug_struct("Mismatch")
                .field("expected", &describe_slots(expected))
                .field("found", &describe_kinds(found))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::RecordingSender;
    use crate::value::{Custom, CustomKind, CustomValue};

    #[test]
    fn test_fn_handler_unit_return() {
        let handler = FnHandler::new(|sender: &dyn Sender, args: &[Value]| {
            sender.send(&format!("{} args", args.len()));
        });
        let sender = RecordingSender::player();
        assert!(handler.handle(&sender, &[Value::Int(1)]).is_ok());
        assert_eq!(sender.messages(), vec!["1 args"]);
        assert!(handler.signature().is_none());
    }

    #[test]
    fn test_fn_handler_with_custom_error_type() {
        #[derive(Debug)]
        struct CustomError(String);

        impl std::fmt::Display for CustomError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "CustomError: {}", self.0)
            }
        }

        impl std::error::Error for CustomError {}

        let handler = FnHandler::new(|_sender: &dyn Sender, _args: &[Value]| {
            Err::<(), _>(CustomError("oops".to_string()))
        });

        let result = handler.handle(&RecordingSender::console(), &[]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("CustomError: oops"));
    }

    #[test]
    fn test_typed_handler_signature() {
        let handler = typed(|_sender: &dyn Sender, (_item, _amount): (String, i64)| {});
        assert_eq!(
            handler.signature(),
            Some(vec![ValueKind::String, ValueKind::Int])
        );
    }

    #[test]
    fn test_typed_handler_receives_params() {
        let handler = typed(|sender: &dyn Sender, (item, amount): (String, i64)| {
            sender.send(&format!("{amount}x{item}"));
        });
        let sender = RecordingSender::player();
        handler
            .handle(&sender, &[Value::String("stone".into()), Value::Int(3)])
            .unwrap();
        assert_eq!(sender.messages(), vec!["3xstone"]);
    }

    #[test]
    fn test_typed_handler_reports_mismatch() {
        let handler = typed(|_sender: &dyn Sender, (_amount,): (i64,)| {});
        let err = handler
            .handle(&RecordingSender::player(), &[Value::String("five".into())])
            .unwrap_err();
        let mismatch = err.downcast_ref::<SignatureMismatch>().unwrap();
        assert_eq!(mismatch.expected, vec![ValueKind::String]);
        assert_eq!(mismatch.found, vec![ValueKind::Int]);
        assert_eq!(err.to_string(), "handler takes (i64) but was given (String)");
    }

    #[test]
    fn test_typed_handler_custom_param() {
        #[derive(Debug, Clone, PartialEq)]
        struct Warp(u8);

        let handler = typed(|sender: &dyn Sender, (Custom(warp),): (Custom<Warp>,)| {
            sender.send(&format!("warp {}", warp.0));
        });
        assert_eq!(
            handler.signature(),
            Some(vec![ValueKind::Custom(CustomKind::of::<Warp>())])
        );
        let sender = RecordingSender::player();
        handler
            .handle(&sender, &[Value::Custom(CustomValue::new(Warp(7)))])
            .unwrap();
        assert_eq!(sender.messages(), vec!["warp 7"]);
    }

    #[test]
    fn test_registry_rejects_duplicate_hook() {
        let noop = |_sender: &dyn Sender, _args: &[Value]| {};
        let mut registry = HandlerRegistry::new();
        registry.insert("a", FnHandler::new(noop)).unwrap();
        let err = registry.insert("a", FnHandler::new(noop)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateHook(ref hook) if hook == "a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_lookup_is_case_sensitive() {
        let registry = HandlerRegistry::new()
            .hook(
                "giveHook",
                FnHandler::new(|_sender: &dyn Sender, _args: &[Value]| {}),
            )
            .unwrap();
        assert!(registry.contains("giveHook"));
        assert!(!registry.contains("givehook"));
        assert!(registry.get("GiveHook").is_none());
    }
}
