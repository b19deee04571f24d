//! Error types for TOON decoding

use thiserror::Error;

/// Errors that can occur while decoding TOON text
///
/// Every variant carries the 1-based line number where decoding stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Indentation, row counts or nesting do not form a valid document
    #[error("Malformed structure at line {line}: {message}")]
    MalformedStructure {
        /// Line where the problem was detected
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// A token is not valid in its position
    #[error("Unexpected token at line {line}: {message}")]
    UnexpectedToken {
        /// Line where the token appeared
        line: usize,
        /// Description of the token problem
        message: String,
    },

    /// A quoted string contains an invalid escape sequence
    #[error("Invalid escape at line {line}: {message}")]
    Escape {
        /// Line containing the escape
        line: usize,
        /// Description of the escape problem
        message: String,
    },
}

impl DecodeError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        DecodeError::MalformedStructure {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn unexpected(line: usize, message: impl Into<String>) -> Self {
        DecodeError::UnexpectedToken {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn escape(line: usize, message: impl Into<String>) -> Self {
        DecodeError::Escape {
            line,
            message: message.into(),
        }
    }

    /// Short machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::MalformedStructure { .. } => "malformed_structure",
            DecodeError::UnexpectedToken { .. } => "unexpected_token",
            DecodeError::Escape { .. } => "escape_error",
        }
    }

    /// Line where decoding stopped
    pub fn line(&self) -> usize {
        match self {
            DecodeError::MalformedStructure { line, .. }
            | DecodeError::UnexpectedToken { line, .. }
            | DecodeError::Escape { line, .. } => *line,
        }
    }
}
