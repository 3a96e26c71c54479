//! HTML page store.
//!
//! Pages are plain HTML files read once at startup from a directory (every
//! `*.html` file, keyed by file name) and served verbatim. Nothing is bound
//! into them at render time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

/// Page served by `GET /home`.
pub const INDEX: &str = "index.html";
/// Page served by `GET /CreateMachine`.
pub const CREATE_MACHINE: &str = "CreateMachine.html";
/// Page served by `PUT /UpdateMachine`.
pub const UPDATE_MACHINE: &str = "UpdateMachine.html";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read template {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no templates matched {0}/*.html")]
    Empty(PathBuf),

    #[error("html/template: {0:?} is undefined")]
    Undefined(String),
}

/// Immutable set of loaded pages, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    pages: Arc<HashMap<String, String>>,
}

impl Templates {
    /// Load every `*.html` file in `dir`.
    ///
    /// # Errors
    /// Fails if the directory or a file cannot be read, or if no page matched.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| TemplateError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut pages = HashMap::new();
        for entry in entries {
            let path = entry
                .map_err(|source| TemplateError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();

            let is_html = path.extension().is_some_and(|ext| ext == "html");
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_html || !path.is_file() {
                continue;
            }

            let body = fs::read_to_string(&path).map_err(|source| TemplateError::ReadFile {
                path: path.clone(),
                source,
            })?;
            debug!("Loaded template {}", name);
            pages.insert(name.to_string(), body);
        }

        if pages.is_empty() {
            return Err(TemplateError::Empty(dir.to_path_buf()));
        }

        info!("Loaded {} templates from {}", pages.len(), dir.display());
        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Build a store from in-memory pages.
    pub fn from_pages<I, K, V>(pages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pages: Arc::new(
                pages
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Render the named page.
    pub fn render(&self, name: &str) -> Result<String, TemplateError> {
        self.pages
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::Undefined(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
