//! The agent's own dependency manifest (`package.json`)
//!
//! The document is kept as an ordered JSON object so that every field the
//! merge does not touch is written back exactly as it was read, in the same
//! key order.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::{Result, manifest};

const DEPENDENCIES: &str = "dependencies";

/// A loaded manifest, mutated in memory until [`Manifest::write`]
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl Manifest {
    /// Read and validate the manifest at `path`.
    ///
    /// Fails when the file is missing, is not a JSON object, or has a
    /// `dependencies` field that is not an object. A missing `dependencies`
    /// is treated as empty.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| manifest::read_failed(path, e))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| manifest::invalid(path, e))?;

        let Value::Object(document) = value else {
            return Err(manifest::invalid(path, "top level is not an object"));
        };

        match document.get(DEPENDENCIES) {
            None | Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(manifest::invalid(
                    path,
                    "'dependencies' is not an object",
                ));
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    /// Version range declared for `name`
    pub fn dependency(&self, name: &str) -> Option<&str> {
        self.document
            .get(DEPENDENCIES)
            .and_then(|deps| deps.get(name))
            .and_then(Value::as_str)
    }

    /// Declared dependencies in file order
    #[cfg(test)]
    pub fn dependencies(&self) -> Vec<(&str, &str)> {
        self.document
            .get(DEPENDENCIES)
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .filter_map(|(name, range)| Some((name.as_str(), range.as_str()?)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set `dependencies[name] = range`, replacing any earlier entry.
    ///
    /// A replaced entry keeps its position; a new one is appended.
    pub fn set_dependency(&mut self, name: &str, range: String) {
        let deps = self
            .document
            .entry(DEPENDENCIES)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(deps) = deps {
            deps.insert(name.to_string(), Value::String(range));
        }
    }

    /// Pretty-printed document with a trailing newline
    pub fn render(&self) -> Result<String> {
        let mut content = serde_json::to_string_pretty(&self.document)
            .map_err(|e| manifest::write_failed(&self.path, e))?;
        content.push('\n');
        Ok(content)
    }

    /// Replace the file on disk in one step.
    ///
    /// The document goes to a temporary file next to the target, which is then
    /// renamed over it, so readers see either the old or the new manifest.
    pub fn write(&self) -> Result<()> {
        let content = self.render()?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut temp =
            NamedTempFile::new_in(dir).map_err(|e| manifest::write_failed(&self.path, e))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| manifest::write_failed(&self.path, e))?;
        temp.persist(&self.path)
            .map_err(|e| manifest::write_failed(&self.path, e.error))?;

        tracing::info!(path = %self.path.display(), "manifest written");
        Ok(())
    }
}
