//! Argument descriptors and token conversion.

use crate::provider::{ProviderRegistry, TypeProvider};
use crate::value::{Value, ValueKind};
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// The conversion an argument applies to its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    String,
    Int,
    Double,
    /// Takes every remaining token, joined with single spaces.
    MultiString,
    /// Delegates to the type provider with this name.
    Custom(String),
}

impl ArgumentKind {
    /// Resolves the type part of a `type:name` token.
    ///
    /// Built-in names match case-insensitively; `*` markers are ignored.
    pub fn resolve(raw_type: &str) -> Self {
        let stripped = raw_type.trim_matches('*');
        match stripped.to_ascii_lowercase().as_str() {
            "string" => ArgumentKind::String,
            "int" => ArgumentKind::Int,
            "double" => ArgumentKind::Double,
            "multistring" => ArgumentKind::MultiString,
            _ => ArgumentKind::Custom(stripped.to_string()),
        }
    }
}

/// One positional parameter of a node.
#[derive(Debug, Clone)]
pub struct Argument {
    raw_type: String,
    name: String,
    kind: ArgumentKind,
    provider: OnceLock<Arc<TypeProvider>>,
}

impl Argument {
    pub fn new(raw_type: impl Into<String>, name: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        Self {
            kind: ArgumentKind::resolve(&raw_type),
            raw_type,
            name: name.into(),
            provider: OnceLock::new(),
        }
    }

    /// Parses a `type:name` token. Both parts must be non-empty.
    pub fn parse(token: &str) -> Option<Self> {
        let (raw_type, name) = token.split_once(':')?;
        if raw_type.trim_matches('*').is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(raw_type, name))
    }

    pub fn kind(&self) -> &ArgumentKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type exactly as written, including any `*` marker.
    pub fn raw_type(&self) -> &str {
        &self.raw_type
    }

    pub fn is_multistring(&self) -> bool {
        self.kind == ArgumentKind::MultiString
    }

    /// The argument as it appears in a header line.
    pub fn token(&self) -> String {
        format!("{}:{}", self.raw_type, self.name)
    }

    /// Looks up the provider of a custom argument.
    ///
    /// The first successful lookup is cached on the argument.
    pub(crate) fn provider<'a>(
        &'a self,
        registry: &ProviderRegistry,
    ) -> Option<&'a Arc<TypeProvider>> {
        let ArgumentKind::Custom(name) = &self.kind else {
            return None;
        };
        if let Some(provider) = self.provider.get() {
            return Some(provider);
        }
        let found = Arc::clone(registry.get(name)?);
        Some(self.provider.get_or_init(|| found))
    }

    /// The kind of value conversion produces, if it can be known yet.
    pub(crate) fn value_kind(&self, registry: &ProviderRegistry) -> Option<ValueKind> {
        match &self.kind {
            ArgumentKind::String | ArgumentKind::MultiString => Some(ValueKind::String),
            ArgumentKind::Int => Some(ValueKind::Int),
            ArgumentKind::Double => Some(ValueKind::Double),
            ArgumentKind::Custom(_) => self.provider(registry).map(|p| p.value_kind()),
        }
    }

    /// Renders the argument for help output: `<int:amount>`, `<int>` when
    /// the name is `_`, `<amount>` when the type carries a leading `*`.
    pub(crate) fn display(&self, registry: &ProviderRegistry) -> String {
        if self.raw_type.starts_with('*') {
            return format!("<{}>", self.name);
        }
        let type_name = match &self.kind {
            ArgumentKind::Custom(name) => self
                .provider(registry)
                .map(|p| p.name().to_lowercase())
                .unwrap_or_else(|| name.to_lowercase()),
            _ => self.raw_type.trim_matches('*').to_lowercase(),
        };
        if self.name == "_" {
            format!("<{type_name}>")
        } else {
            format!("<{type_name}:{}>", self.name)
        }
    }

    fn convert(&self, token: &str, registry: &ProviderRegistry) -> Option<Value> {
        match &self.kind {
            ArgumentKind::String | ArgumentKind::MultiString => Some(Value::String(token.into())),
            ArgumentKind::Int => token.parse().ok().map(Value::Int),
            // `f64` parsing also takes words like `nan` and `inf`, which would
            // shadow subcommands with those names.
            ArgumentKind::Double => token
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::Double),
            ArgumentKind::Custom(name) => match self.provider(registry) {
                Some(provider) => provider.convert(token).map(Value::Custom),
                None => {
                    warn!(provider = %name, "no type provider registered for argument");
                    None
                }
            },
        }
    }
}

/// Converts `tokens` against `arguments`, all or nothing.
///
/// The token count must equal the argument count, unless the last argument
/// is a multistring, in which case it may be exceeded and the surplus is
/// joined into that argument.
pub(crate) fn convert_arguments(
    arguments: &[Argument],
    tokens: &[&str],
    registry: &ProviderRegistry,
) -> Option<Vec<Value>> {
    let trailing_multistring = arguments.last().is_some_and(Argument::is_multistring);
    if tokens.len() != arguments.len() && !(trailing_multistring && tokens.len() > arguments.len())
    {
        return None;
    }
    let mut values = Vec::with_capacity(arguments.len());
    for (index, argument) in arguments.iter().enumerate() {
        if argument.is_multistring() {
            values.push(Value::String(tokens[index..].join(" ").trim().to_string()));
            break;
        }
        values.push(argument.convert(tokens[index], registry)?);
    }
    Some(values)
}
