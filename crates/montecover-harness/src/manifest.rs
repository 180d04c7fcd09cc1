use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use thiserror::Error;

// ---------------------------------------------------------------------------
// HarnessError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to open manifest {path}: {source}")]
    InputNotFound {
        path: String,
        source: std::io::Error,
    },

    #[error("no instances found in manifest: {0}")]
    EmptyManifest(String),
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

/// One dataset entry: the input graph and its ground-truth companion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Read a manifest: every `{"input": "...", "output": "..."}` pair in the
/// file, in order. Like the graph loader this is regex-tolerant, not a
/// strict JSON parse.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<Instance>, HarnessError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| HarnessError::InputNotFound {
        path: path.display().to_string(),
        source,
    })?;

    let re = Regex::new(
        r#"\{\s*"input"\s*:\s*"([^"]+)"\s*,\s*"output"\s*:\s*"([^"]+)"\s*\}"#,
    )
    .expect("static regex");

    let instances: Vec<Instance> = re
        .captures_iter(&text)
        .map(|cap| Instance {
            input: PathBuf::from(&cap[1]),
            output: PathBuf::from(&cap[2]),
        })
        .collect();

    if instances.is_empty() {
        return Err(HarnessError::EmptyManifest(path.display().to_string()));
    }
    Ok(instances)
}

/// Reference cover size from a ground-truth file: the first
/// `"size": k` occurrence. `None` when the file is unreadable or carries
/// no size — the report writes −1 in that case.
pub fn load_truth_size(path: impl AsRef<Path>) -> Option<usize> {
    let text = fs::read_to_string(path.as_ref()).ok()?;
    let re = Regex::new(r#""size"\s*:\s*(\d+)"#).expect("static regex");
    re.captures(&text).and_then(|cap| cap[1].parse().ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parses_instance_pairs_in_order() {
        let f = write_file(
            r#"[
  {"input": "data/exact/inputs/graph_0000.json", "output": "data/exact/outputs/graph_0000.json"},
  {"input": "data/exact/inputs/graph_0001.json", "output": "data/exact/outputs/graph_0001.json"}
]"#,
        );
        let items = load_manifest(f.path()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].input,
            PathBuf::from("data/exact/inputs/graph_0000.json")
        );
        assert_eq!(
            items[1].output,
            PathBuf::from("data/exact/outputs/graph_0001.json")
        );
    }

    #[test]
    fn whitespace_variations_are_tolerated() {
        let f = write_file("{ \"input\" : \"a.json\" , \"output\" : \"b.json\" }");
        let items = load_manifest(f.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].input, PathBuf::from("a.json"));
    }

    #[test]
    fn empty_manifest_is_an_error() {
        let f = write_file("[]");
        assert!(matches!(
            load_manifest(f.path()),
            Err(HarnessError::EmptyManifest(_))
        ));
    }

    #[test]
    fn missing_manifest_is_an_error() {
        assert!(matches!(
            load_manifest("/nonexistent/manifest.json"),
            Err(HarnessError::InputNotFound { .. })
        ));
    }

    #[test]
    fn truth_size_reads_the_size_field() {
        let f = write_file(r#"{"size": 17, "vertices": [0, 3, 5]}"#);
        assert_eq!(load_truth_size(f.path()), Some(17));
    }

    #[test]
    fn truth_size_absent_or_unreadable_is_none() {
        let f = write_file(r#"{"vertices": []}"#);
        assert_eq!(load_truth_size(f.path()), None);
        assert_eq!(load_truth_size("/nonexistent/truth.json"), None);
    }
}
