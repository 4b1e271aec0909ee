//! JSON output types for machine-readable CLI output.
//!
//! Every command's `--json` mode prints one [`CommandOutput`] document with a
//! command-specific `result` payload.

use serde::{Deserialize, Serialize};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable. Graph validation errors pass their own `E0xx`
/// codes through unchanged.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// JSON parse error
    pub const JSON_PARSE: &str = "CLI_002";
    /// Graph failed to compile (cycle, dimension conflict, parameter domain)
    pub const COMPILE: &str = "CLI_003";
    /// Invalid command-line argument
    pub const INVALID_ARGUMENT: &str = "CLI_004";
    /// Evaluation failed
    pub const EVALUATE: &str = "CLI_005";
    /// Reseeding failed
    pub const RESEED: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "E004")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line number (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Column number (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
            file: None,
            line: None,
            col: None,
        }
    }

    /// Sets the JSON path for this error.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the line and column for this error.
    pub fn with_location(mut self, line: usize, col: usize) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonWarning {
    /// Creates a new warning with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Sets the JSON path for this warning.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// JSON output shared by every command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandOutput<T> {
    /// Whether the command succeeded
    pub success: bool,
    /// Errors encountered
    pub errors: Vec<JsonError>,
    /// Non-fatal warnings
    pub warnings: Vec<JsonWarning>,
    /// Command-specific payload (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T: Serialize> CommandOutput<T> {
    /// Creates a successful output.
    pub fn success(result: T, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed output.
    pub fn failure(errors: Vec<JsonError>, warnings: Vec<JsonWarning>) -> Self {
        Self {
            success: false,
            errors,
            warnings,
            result: None,
        }
    }

    /// Prints the output as pretty JSON to stdout.
    pub fn print(&self) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// Summary of a loaded graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphSummary {
    /// Graph name
    pub name: String,
    /// Graph version string
    pub version: String,
    /// Graph seed
    pub seed: u64,
    /// Root dimensionality
    pub dimension: u8,
    /// Root node id
    pub root: String,
    /// Number of nodes in the document
    pub node_count: usize,
    /// Canonical BLAKE3 hash of the graph
    pub fingerprint: String,
    /// BLAKE3 hash of the source file
    pub source_hash: String,
}

/// Converts an input error to a JsonError.
pub fn input_error_to_json(err: &InputError, file: &str) -> JsonError {
    match err {
        InputError::FileRead { .. } => {
            JsonError::new(error_codes::FILE_READ, err.to_string()).with_file(file)
        }
        InputError::JsonParse { line, column, .. } => {
            JsonError::new(error_codes::JSON_PARSE, err.to_string())
                .with_file(file)
                .with_location(*line, *column)
        }
    }
}

/// Converts a ValidationError to a JsonError.
pub fn validation_error_to_json(err: &noisegraph_spec::ValidationError) -> JsonError {
    let mut error = JsonError::new(err.code.to_string(), &err.message);
    if let Some(ref path) = err.path {
        error = error.with_path(path);
    }
    error
}

/// Converts a ValidationWarning to a JsonWarning.
pub fn validation_warning_to_json(warn: &noisegraph_spec::ValidationWarning) -> JsonWarning {
    let mut warning = JsonWarning::new(warn.code.to_string(), &warn.message);
    if let Some(ref path) = warn.path {
        warning = warning.with_path(path);
    }
    warning
}

/// Converts an engine error to a JsonError, pointing at the failing node.
pub fn noise_error_to_json(code: &str, err: &noisegraph_engine::NoiseError) -> JsonError {
    let error = JsonError::new(code, err.to_string());
    match err {
        noisegraph_engine::NoiseError::Configuration {
            node: Some(node), ..
        } => error.with_path(format!("nodes[id={}]", node)),
        _ => error,
    }
}
