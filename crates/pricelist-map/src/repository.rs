//! Template repository for persisting and reusing supplier mappings.
//!
//! # Storage Format
//!
//! [`JsonTemplateStore`] keeps every template in a single JSON file holding
//! an object keyed by template name:
//!
//! ```json
//! {
//!   "sysco": {
//!     "sourceFormat": "row_typed",
//!     "columnMapping": { "identifier": "SUPC", "name": "Desc" },
//!     "priceField": "Case $",
//!     "defaults": { "location": "Dry Storage" }
//!   }
//! }
//! ```
//!
//! The file is rewritten atomically on every save. A missing file is an
//! empty store.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use pricelist_model::MappingTemplate;
use thiserror::Error;

/// Current UTC time in RFC 3339 format, as stored in `savedAt`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Template store error.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template with this name.
    #[error("template not found: {0}")]
    NotFound(String),

    /// Template names must not be blank.
    #[error("invalid template name: '{0}'")]
    InvalidName(String),

    /// File I/O error.
    #[error("failed to {operation} template file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file is not valid JSON.
    #[error("failed to parse template file: {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to complete template save")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TemplateError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(name) => format!("No saved template is named '{name}'."),
            Self::InvalidName(_) => "Template names cannot be empty.".to_string(),
            Self::Io {
                operation, path, ..
            } => format!("Could not {} the template file at {}", operation, path.display()),
            Self::Json { path, .. } => format!(
                "The template file at {} is not valid JSON. It may have been edited by hand.",
                path.display()
            ),
            Self::AtomicWriteFailed { target_path, .. } => format!(
                "Could not save the template file to {}. Please check disk space and permissions.",
                target_path.display()
            ),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::NotFound(_) => Some("Run `pricelist templates list` to see saved names.".into()),
            Self::InvalidName(_) => Some("Pass a non-empty name, e.g. the supplier name.".into()),
            Self::Json { .. } => {
                Some("Fix the JSON by hand or move the file aside to start a new store.".into())
            }
            Self::Io { .. } | Self::AtomicWriteFailed { .. } => None,
        }
    }
}

/// Persistence for named mapping templates.
pub trait TemplateStore {
    /// Persist a template, overwriting any template with the same name.
    fn save(&mut self, template: &MappingTemplate) -> Result<(), TemplateError>;

    /// Load a template by name.
    fn load(&self, name: &str) -> Result<MappingTemplate, TemplateError>;

    /// All template names, sorted.
    fn list(&self) -> Result<Vec<String>, TemplateError>;
}

fn validate_name(name: &str) -> Result<&str, TemplateError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(TemplateError::InvalidName(name.to_string()))
    } else {
        Ok(trimmed)
    }
}

/// Templates kept in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    templates: BTreeMap<String, MappingTemplate>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn save(&mut self, template: &MappingTemplate) -> Result<(), TemplateError> {
        let name = validate_name(&template.name)?.to_string();
        let mut stored = template.clone();
        stored.name.clone_from(&name);
        self.templates.insert(name, stored);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<MappingTemplate, TemplateError> {
        let name = validate_name(name)?;
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, TemplateError> {
        Ok(self.templates.keys().cloned().collect())
    }
}

/// Templates stored in one JSON file keyed by name.
#[derive(Debug, Clone)]
pub struct JsonTemplateStore {
    path: PathBuf,
}

impl JsonTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, MappingTemplate>, TemplateError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(TemplateError::Io {
                    operation: "read",
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let mut templates: BTreeMap<String, MappingTemplate> = serde_json::from_str(&contents)
            .map_err(|source| TemplateError::Json {
                path: self.path.clone(),
                source,
            })?;
        for (name, template) in &mut templates {
            template.name.clone_from(name);
        }
        Ok(templates)
    }

    fn write_all(&self, templates: &BTreeMap<String, MappingTemplate>) -> Result<(), TemplateError> {
        let json = serde_json::to_vec_pretty(templates).map_err(|source| TemplateError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| TemplateError::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = File::create(&temp_path).map_err(|source| TemplateError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(&json).map_err(|source| TemplateError::Io {
            operation: "write",
            path: temp_path.clone(),
            source,
        })?;
        file.sync_all().map_err(|source| TemplateError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|source| TemplateError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: self.path.clone(),
            source,
        })
    }
}

impl TemplateStore for JsonTemplateStore {
    fn save(&mut self, template: &MappingTemplate) -> Result<(), TemplateError> {
        let name = validate_name(&template.name)?.to_string();
        let mut templates = self.read_all()?;
        let mut stored = template.clone();
        stored.name.clone_from(&name);
        templates.insert(name.clone(), stored);
        self.write_all(&templates)?;
        tracing::info!(template = %name, path = %self.path.display(), "Saved template");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<MappingTemplate, TemplateError> {
        let name = validate_name(name)?;
        self.read_all()?
            .remove(name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, TemplateError> {
        Ok(self.read_all()?.into_keys().collect())
    }
}
