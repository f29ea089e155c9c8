//! Type providers: named converters for custom argument types.
//!
//! An argument whose type is not one of the built-in `string`, `int`,
//! `double` or `multistring` names a provider. Providers are installed on a
//! node with [`CommandTree::register_provider`](crate::CommandTree::register_provider),
//! which hands the same provider to every node below it that exists at that
//! moment. Nodes added afterwards do not see it.

use crate::sender::Sender;
use crate::value::{CustomKind, CustomValue, ValueKind};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ConvertFn = dyn Fn(&str) -> Option<CustomValue> + Send + Sync;
type CompleteFn = dyn Fn(&dyn Sender) -> Vec<String> + Send + Sync;

/// A named string-to-value converter with optional completions.
///
/// ```rust
/// use cmdtree::{RecordingSender, TypeProvider};
///
/// let colors = TypeProvider::new("color", |s: &str| {
///     ["red", "green"].contains(&s).then(|| s.to_string())
/// })
/// .with_completions(|_sender| vec!["red".into(), "green".into()]);
///
/// assert!(colors.convert("red").is_some());
/// assert!(colors.convert("blue").is_none());
/// assert_eq!(colors.complete("G", &RecordingSender::player()), vec!["green"]);
/// ```
#[derive(Clone)]
pub struct TypeProvider {
    name: String,
    kind: CustomKind,
    convert: Arc<ConvertFn>,
    complete: Option<Arc<CompleteFn>>,
}

impl TypeProvider {
    /// Creates a provider. `convert` returns `None` when the input is not a
    /// valid value, which makes the surrounding invocation fall back to help
    /// or further routing.
    pub fn new<T, F>(name: impl Into<String>, convert: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind: CustomKind::of::<T>(),
            convert: Arc::new(move |input| convert(input).map(CustomValue::new)),
            complete: None,
        }
    }

    /// Adds a completion source. Candidates that do not match the partial
    /// input are dropped automatically.
    pub fn with_completions<F>(mut self, complete: F) -> Self
    where
        F: Fn(&dyn Sender) -> Vec<String> + Send + Sync + 'static,
    {
        self.complete = Some(Arc::new(complete));
        self
    }

    /// The name arguments use to refer to this provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of value this provider produces.
    pub fn value_kind(&self) -> ValueKind {
        ValueKind::Custom(self.kind)
    }

    pub fn convert(&self, input: &str) -> Option<CustomValue> {
        (self.convert)(input)
    }

    /// Returns the candidates for `sender` that start with `partial`,
    /// ignoring case.
    pub fn complete(&self, partial: &str, sender: &dyn Sender) -> Vec<String> {
        let Some(complete) = &self.complete else {
            return Vec::new();
        };
        let partial = partial.trim().to_lowercase();
        complete(sender)
            .into_iter()
            .filter(|candidate| candidate.to_lowercase().starts_with(&partial))
            .collect()
    }
}

impl fmt::Debug for TypeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeProvider")
            .field("name", &self.name)
            .field("kind", &self.kind.name())
            .field("completes", &self.complete.is_some())
            .finish()
    }
}

/// The providers visible from one node, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<TypeProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a provider, replacing one with the same name.
    pub fn insert(&mut self, provider: Arc<TypeProvider>) -> Option<Arc<TypeProvider>> {
        self.providers.insert(provider.name().to_string(), provider)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeProvider>> {
        self.providers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
