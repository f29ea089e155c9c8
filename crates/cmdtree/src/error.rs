//! Error types for loading, registering and editing command trees.

use crate::tree::NodeId;
use thiserror::Error;

/// Errors that can occur while reading a command definition.
///
/// Line numbers are 1-based and point at the offending line of the source.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A block header has nothing before its opening brace.
    #[error("line {line}: command header has no aliases")]
    MissingAliases { line: usize },

    /// The alias list contains an empty entry (`give,,g`).
    #[error("line {line}: empty alias in '{aliases}'")]
    EmptyAlias { line: usize, aliases: String },

    /// An argument token is not of the form `type:name`.
    #[error("line {line}: malformed argument '{token}', expected type:name")]
    MalformedArgument { line: usize, token: String },

    /// A multistring argument is followed by further arguments.
    #[error("line {line}: only the last argument may be a multistring")]
    MultistringNotLast { line: usize },

    /// The `users` directive names an unknown audience.
    #[error("line {line}: unknown audience '{value}', expected everyone, console or player")]
    InvalidAudience { line: usize, value: String },

    /// The source could not be read.
    #[error("failed to read command definitions: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// Returns the source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MissingAliases { line }
            | ParseError::EmptyAlias { line, .. }
            | ParseError::MalformedArgument { line, .. }
            | ParseError::MultistringNotLast { line }
            | ParseError::InvalidAudience { line, .. } => Some(*line),
            ParseError::Io(_) => None,
        }
    }
}

/// Errors raised while building a handler registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A second handler was offered for a hook that is already taken.
    #[error("hook '{0}' already has a handler")]
    DuplicateHook(String),
}

/// Errors raised by operations that address a node of a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The id does not belong to this tree.
    #[error("no command node with id {0}")]
    UnknownNode(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_line() {
        let err = ParseError::MalformedArgument {
            line: 4,
            token: "int".into(),
        };
        assert_eq!(err.line(), Some(4));
        assert_eq!(
            err.to_string(),
            "line 4: malformed argument 'int', expected type:name"
        );
    }

    #[test]
    fn test_io_error_has_no_line() {
        let err = ParseError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        assert_eq!(err.line(), None);
        assert!(err.to_string().contains("missing"));
    }
}
