//! Local tool library catalog backed by a directory of `*.json` exports.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::contract::Catalog;
use crate::error::PublishError;

pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn library_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> PublishError {
        PublishError::Catalog {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Catalog for DirectoryCatalog {
    fn list_names(&self) -> Result<Vec<String>, PublishError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| self.io_error(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| self.io_error(&self.dir, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        info!(dir = %self.dir.display(), count = names.len(), "Listed tool libraries");
        Ok(names)
    }

    fn serialize(&self, name: &str) -> Result<String, PublishError> {
        let path = self.library_path(name);
        if name.contains(['/', '\\']) || !path.is_file() {
            return Err(PublishError::UnknownResource {
                name: name.to_string(),
                location: self.dir.display().to_string(),
            });
        }
        let content = fs::read_to_string(&path).map_err(|e| self.io_error(&path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "Read tool library");
        Ok(content)
    }
}
