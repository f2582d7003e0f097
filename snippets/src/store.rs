//! JSON snippet store shared by the extractor and the injector.
//!
//! The store is a flat object mapping snippet names to code, pretty-printed
//! with keys in sorted order so regenerating it yields readable diffs.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Snippet name -> dedented code.
pub type SnippetMap = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Snippets file not found: {0}")]
    NotFound(String),

    #[error("Invalid JSON in snippets file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Write `snippets` to `path`, creating parent directories as needed.
pub fn save(path: &Path, snippets: &SnippetMap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(snippets).context("failed to serialize snippets")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

pub fn load(path: &Path) -> Result<SnippetMap, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
        _ => LoadError::Io {
            path: path.display().to_string(),
            source,
        },
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_creates_parent_and_sorts_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("generated/snippets.json");
        let mut snippets = SnippetMap::new();
        snippets.insert("zeta".into(), "z();".into());
        snippets.insert("alpha".into(), "a();\n  b();".into());

        save(&path, &snippets).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.find("\"alpha\"").unwrap() < text.find("\"zeta\"").unwrap());
        assert_eq!(load(&path).unwrap(), snippets);
    }

    #[test]
    fn save_keeps_non_ascii_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snippets.json");
        let mut snippets = SnippetMap::new();
        snippets.insert("greeting".into(), "// héllo".into());

        save(&path, &snippets).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("héllo"));
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path).unwrap_err(), LoadError::InvalidJson(_)));
    }
}
