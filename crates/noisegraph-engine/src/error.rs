//! Error types for noise construction and evaluation.

use thiserror::Error;

/// Errors raised by the noise engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoiseError {
    /// A node was constructed with invalid parameters or wiring.
    #[error("configuration error{}: {message}", node_suffix(.node))]
    Configuration {
        /// Id of the offending graph node, when known.
        node: Option<String>,
        /// Description of the problem.
        message: String,
    },

    /// A query carried the wrong number of coordinates.
    #[error("dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch {
        /// Coordinates the node expects.
        expected: usize,
        /// Coordinates the query supplied.
        actual: usize,
    },
}

impl NoiseError {
    /// Creates a configuration error not tied to a graph node.
    pub fn config(message: impl Into<String>) -> Self {
        NoiseError::Configuration {
            node: None,
            message: message.into(),
        }
    }

    /// Creates a configuration error for a named graph node.
    pub fn node_config(node: impl Into<String>, message: impl Into<String>) -> Self {
        NoiseError::Configuration {
            node: Some(node.into()),
            message: message.into(),
        }
    }

    /// Attaches a node id to a configuration error that has none.
    pub fn in_node(self, id: &str) -> Self {
        match self {
            NoiseError::Configuration { node: None, message } => NoiseError::Configuration {
                node: Some(id.to_string()),
                message,
            },
            other => other,
        }
    }
}

fn node_suffix(node: &Option<String>) -> String {
    match node {
        Some(id) => format!(" in node '{}'", id),
        None => String::new(),
    }
}

/// Result type for noise operations.
pub type NoiseResult<T> = Result<T, NoiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = NoiseError::config("octaves must be >= 1");
        assert_eq!(err.to_string(), "configuration error: octaves must be >= 1");

        let err = err.in_node("fbm");
        assert_eq!(
            err.to_string(),
            "configuration error in node 'fbm': octaves must be >= 1"
        );
    }

    #[test]
    fn test_in_node_keeps_existing_node() {
        let err = NoiseError::node_config("inner", "bad").in_node("outer");
        assert_eq!(
            err,
            NoiseError::Configuration {
                node: Some("inner".to_string()),
                message: "bad".to_string(),
            }
        );
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = NoiseError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: expected 3 coordinates, got 2"
        );
    }
}
