//! Graph file loading.

use std::path::{Path, PathBuf};

use noisegraph_spec::GraphSpec;

/// A parsed graph file.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed graph document.
    pub graph: GraphSpec,
    /// BLAKE3 hash of the raw file contents.
    pub source_hash: String,
}

/// Errors that can occur while loading a graph file.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File is not a valid graph document.
    JsonParse {
        message: String,
        line: usize,
        column: usize,
    },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read '{}': {}", path.display(), source)
            }
            InputError::JsonParse { message, .. } => write!(f, "JSON parse error: {}", message),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::JsonParse { .. } => None,
        }
    }
}

/// Loads a graph document from a JSON file.
pub fn load_graph(path: &Path) -> Result<LoadResult, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let graph = GraphSpec::from_json(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
        line: e.line(),
        column: e.column(),
    })?;

    Ok(LoadResult { graph, source_hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_missing_file() {
        let err = load_graph(Path::new("/nonexistent/graph.json")).unwrap_err();
        assert!(matches!(err, InputError::FileRead { .. }));
        assert!(err.to_string().contains("graph.json"));
    }

    #[test]
    fn test_load_reports_parse_location() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\n  \"spec_version\": 1,\n  \"name\": }}").unwrap();
        match load_graph(file.path()).unwrap_err() {
            InputError::JsonParse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {}", other),
        }
    }

    #[test]
    fn test_load_hashes_contents() {
        let json = r#"{ "spec_version": 1, "name": "g", "seed": 1, "dimension": 1,
                        "root": "p", "nodes": [ { "id": "p", "type": "perlin" } ] }"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let loaded = load_graph(file.path()).unwrap();
        assert_eq!(loaded.graph.name, "g");
        assert_eq!(
            loaded.source_hash,
            blake3::hash(json.as_bytes()).to_hex().to_string()
        );
    }
}
