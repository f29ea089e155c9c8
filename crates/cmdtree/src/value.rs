//! Typed argument values.
//!
//! Conversion turns each raw token into a [`Value`]. Handlers either take the
//! values as a slice or declare a tuple of Rust types through [`FromArgs`],
//! which also gives the engine a signature to check at registration.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A value produced by a type provider.
///
/// The payload is shared, so cloning a `CustomValue` is cheap.
#[derive(Clone)]
pub struct CustomValue {
    kind: CustomKind,
    value: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    /// Wraps a provider result.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            kind: CustomKind::of::<T>(),
            value: Arc::new(value),
        }
    }

    /// Returns the payload if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Returns the Rust type name of the payload.
    pub fn type_name(&self) -> &'static str {
        self.kind.name
    }

    /// Returns the kind of the payload.
    pub fn kind(&self) -> CustomKind {
        self.kind
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type", &self.kind.name)
            .finish_non_exhaustive()
    }
}

/// A converted argument.
#[derive(Debug, Clone)]
pub enum Value {
    /// `string` and `multistring` arguments.
    String(String),
    /// `int` arguments.
    Int(i64),
    /// `double` arguments.
    Double(f64),
    /// Arguments converted by a type provider.
    Custom(CustomValue),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::String(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Int,
            Value::Double(_) => ValueKind::Double,
            Value::Custom(custom) => ValueKind::Custom(custom.kind()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the payload of a custom value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.downcast_ref(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::Custom(custom) => write!(f, "<{}>", custom.type_name()),
        }
    }
}

/// Identity of a provider's output type.
///
/// Two kinds are equal when they name the same Rust type.
#[derive(Debug, Clone, Copy)]
pub struct CustomKind {
    id: TypeId,
    name: &'static str,
}

impl CustomKind {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CustomKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomKind {}

/// The type of a value, used for signature checks and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Int,
    Double,
    Custom(CustomKind),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => f.write_str("String"),
            ValueKind::Int => f.write_str("i64"),
            ValueKind::Double => f.write_str("f64"),
            ValueKind::Custom(kind) => f.write_str(kind.name()),
        }
    }
}

/// Formats a list of kinds as `String, i64`.
pub(crate) fn describe_kinds(kinds: &[ValueKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Formats declared argument kinds, with `?` for slots whose kind is not
/// known yet.
pub(crate) fn describe_slots(slots: &[Option<ValueKind>]) -> String {
    slots
        .iter()
        .map(|slot| slot.map_or_else(|| "?".to_string(), |kind| kind.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A Rust type that can be taken out of one converted argument.
pub trait FromValue: Sized {
    /// The kind of value this type is taken from.
    fn kind() -> ValueKind;

    /// Extracts the value, or `None` if it has a different kind.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for String {
    fn kind() -> ValueKind {
        ValueKind::String
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromValue for i64 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl FromValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::Double
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_double()
    }
}

/// Marks a handler parameter that comes from a type provider.
///
/// ```rust
/// use cmdtree::{Custom, FromValue, Value, CustomValue};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Item(String);
///
/// let value = Value::Custom(CustomValue::new(Item("diamond".into())));
/// let Custom(item) = Custom::<Item>::from_value(&value).unwrap();
/// assert_eq!(item, Item("diamond".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Custom<T>(pub T);

impl<T: Any + Clone + Send + Sync> FromValue for Custom<T> {
    fn kind() -> ValueKind {
        ValueKind::Custom(CustomKind::of::<T>())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.downcast_ref::<T>().cloned().map(Custom)
    }
}

/// A parameter list that can be built from all converted arguments.
///
/// Implemented for `()` and tuples of up to six [`FromValue`] types.
pub trait FromArgs: Sized {
    /// The kinds of the parameters, in order.
    fn kinds() -> Vec<ValueKind>;

    /// Builds the parameters, or `None` on an arity or kind mismatch.
    fn from_args(args: &[Value]) -> Option<Self>;
}

impl FromArgs for () {
    fn kinds() -> Vec<ValueKind> {
        Vec::new()
    }

    fn from_args(args: &[Value]) -> Option<Self> {
        args.is_empty().then_some(())
    }
}

macro_rules! impl_from_args {
    ($len:expr; $($ty:ident => $idx:tt),+) => {
        impl<$($ty: FromValue),+> FromArgs for ($($ty,)+) {
            fn kinds() -> Vec<ValueKind> {
                vec![$($ty::kind()),+]
            }

            fn from_args(args: &[Value]) -> Option<Self> {
                if args.len() != $len {
                    return None;
                }
                Some(($($ty::from_value(&args[$idx])?,)+))
            }
        }
    };
}

impl_from_args!(1; A => 0);
impl_from_args!(2; A => 0, B => 1);
impl_from_args!(3; A => 0, B => 1, C => 2);
impl_from_args!(4; A => 0, B => 1, C => 2, D => 3);
impl_from_args!(5; A => 0, B => 1, C => 2, D => 3, E => 4);
impl_from_args!(6; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::String("a".into()).kind(), ValueKind::String);
        assert_eq!(Value::Int(1).kind(), ValueKind::Int);
        assert_eq!(Value::Double(1.5).kind(), ValueKind::Double);
        assert_eq!(
            Value::Custom(CustomValue::new(Item("x"))).kind(),
            ValueKind::Custom(CustomKind::of::<Item>())
        );
    }

    #[test]
    fn test_custom_kind_equality_by_type() {
        assert_eq!(CustomKind::of::<Item>(), CustomKind::of::<Item>());
        assert_ne!(CustomKind::of::<Item>(), CustomKind::of::<String>());
    }

    #[test]
    fn test_from_args_tuple() {
        let args = vec![Value::String("diamond".into()), Value::Int(5)];
        let (item, amount) = <(String, i64)>::from_args(&args).unwrap();
        assert_eq!(item, "diamond");
        assert_eq!(amount, 5);
    }

    #[test]
    fn test_from_args_rejects_wrong_arity_and_kind() {
        let args = vec![Value::String("diamond".into())];
        assert!(<(String, i64)>::from_args(&args).is_none());
        assert!(<(i64,)>::from_args(&args).is_none());
        assert!(<()>::from_args(&args).is_none());
        assert!(<()>::from_args(&[]).is_some());
    }

    #[test]
    fn test_custom_from_value() {
        let value = Value::Custom(CustomValue::new(Item("stone")));
        assert_eq!(
            Custom::<Item>::from_value(&value),
            Some(Custom(Item("stone")))
        );
        assert_eq!(Custom::<String>::from_value(&value), None);
    }

    #[test]
    fn test_describe_kinds() {
        let kinds = <(String, i64, f64)>::kinds();
        assert_eq!(describe_kinds(&kinds), "String, i64, f64");
        assert_eq!(
            describe_slots(&[None, Some(ValueKind::Double)]),
            "?, f64"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(-1).to_string(), "-1");
        assert_eq!(Value::Double(2.5).to_string(), "2.5");
        assert_eq!(Value::String("hi there".into()).to_string(), "hi there");
    }
}
