//! Node store backed by a JSON file.
//!
//! The file holds a single array of node records. Writes go to a sibling
//! temporary file which is then renamed over the original, so a reader
//! sees either the old list or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::chain::{NewNode, Node};
use crate::error::{ChainError, Result};

use super::{merge_batch, next_id, NodeStore};

/// Node store kept in a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Use the file at `path`. It need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Node>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ChainError::StoreRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut rows: Vec<Node> =
            serde_json::from_str(&content).map_err(|e| ChainError::StoreFormat {
                path: self.path.clone(),
                source: e,
            })?;
        rows.sort_by_key(|n| n.id);
        Ok(rows)
    }

    fn write(&self, rows: &[Node]) -> Result<()> {
        let json = serde_json::to_string_pretty(rows).map_err(|e| ChainError::StoreFormat {
            path: self.path.clone(),
            source: e,
        })?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        let write_err = |source| ChainError::StoreWrite {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            write_err(e)
        })
    }
}

impl NodeStore for JsonFileStore {
    fn list_nodes(&self) -> Result<Vec<Node>> {
        self.read()
    }

    fn upsert(&mut self, nodes: &[Node]) -> Result<()> {
        let rows = self.read()?;
        let merged = merge_batch(&rows, nodes)?;
        self.write(&merged)?;
        tracing::debug!(path = %self.path.display(), rows = nodes.len(), "store file updated");
        Ok(())
    }

    fn insert(&mut self, node: NewNode) -> Result<Node> {
        let rows = self.read()?;
        let node = node.into_node(next_id(&rows, 0)?);
        let merged = merge_batch(&rows, std::slice::from_ref(&node))?;
        self.write(&merged)?;
        Ok(node)
    }
}
