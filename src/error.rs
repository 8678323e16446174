//! Error types for sqlweave.

use thiserror::Error;

use crate::render::Capability;

/// The main error type for building, rendering and serializing statements.
#[derive(Debug, Error)]
pub enum WeaveError {
    /// Invalid AST composition (OR on a group-by set, alias on a predicate, ...).
    #[error("Construction error in {clause}: {message}")]
    Construction {
        clause: &'static str,
        message: String,
    },

    /// The active dialect cannot express the requested construct.
    #[error("Capability error: dialect '{dialect}' does not support {capability} ({context})")]
    Capability {
        dialect: &'static str,
        capability: Capability,
        context: String,
    },

    /// A renderer invariant was violated.
    #[error("Render error in {clause} for dialect '{dialect}': {message}")]
    Render {
        dialect: &'static str,
        clause: &'static str,
        message: String,
    },

    /// Malformed or unrecognized document element.
    #[error("Serialization error at <{element}>: {message}")]
    Serialization { element: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON text layer of the document codec.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WeaveError {
    /// Create a construction error for the given clause kind.
    pub fn construction(clause: &'static str, message: impl Into<String>) -> Self {
        Self::Construction {
            clause,
            message: message.into(),
        }
    }

    /// Create a capability error.
    pub fn capability(
        dialect: &'static str,
        capability: Capability,
        context: impl Into<String>,
    ) -> Self {
        Self::Capability {
            dialect,
            capability,
            context: context.into(),
        }
    }

    /// Create a render error.
    pub fn render(dialect: &'static str, clause: &'static str, message: impl Into<String>) -> Self {
        Self::Render {
            dialect,
            clause,
            message: message.into(),
        }
    }

    /// Create a serialization error for the given element name.
    pub fn serialization(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            element: element.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for sqlweave operations.
pub type WeaveResult<T> = Result<T, WeaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeaveError::construction("group-by", "OR requires a boolean section");
        assert_eq!(
            err.to_string(),
            "Construction error in group-by: OR requires a boolean section"
        );

        let err = WeaveError::capability("ansi", Capability::RowLimitCount, "TOP 10 on select");
        assert_eq!(
            err.to_string(),
            "Capability error: dialect 'ansi' does not support row-limit-count (TOP 10 on select)"
        );
    }
}
