//! Version catalog: the fixed, ordered set of playable game builds.
//!
//! The catalog is built once at startup and never mutated. Every other part
//! of the controller refers to versions by id and resolves them here.

use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};
use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog construction and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Version id not present in the catalog
    #[error("Version not found: {0}")]
    NotFound(String),

    /// Catalog has no entries
    #[error("Catalog must contain at least one version")]
    Empty,

    /// Two entries share an id
    #[error("Duplicate version id: {0}")]
    DuplicateId(String),

    /// Resource locator is not an absolute http(s) URL
    #[error("Invalid resource URL for version {id}: {url}")]
    InvalidUrl { id: String, url: String },

    /// Catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not valid JSON
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A selectable build of the embedded game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Unique token, e.g. `1.8.8`
    pub id: String,

    /// Display label shown in the version picker
    pub label: String,

    /// Absolute locator of the embeddable game instance
    pub resource_url: String,
}

impl Version {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        resource_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            resource_url: resource_url.into(),
        }
    }
}

/// Ordered, non-empty, immutable list of versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCatalog {
    versions: Vec<Version>,
}

impl VersionCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and relative URLs
    pub fn new(versions: Vec<Version>) -> CatalogResult<Self> {
        if versions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(versions.len());
        for version in &versions {
            if !seen.insert(version.id.as_str()) {
                return Err(CatalogError::DuplicateId(version.id.clone()));
            }
            if !is_absolute_url(&version.resource_url) {
                return Err(CatalogError::InvalidUrl {
                    id: version.id.clone(),
                    url: version.resource_url.clone(),
                });
            }
        }

        Ok(Self { versions })
    }

    /// Parse a catalog from a JSON array of versions
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let versions: Vec<Version> = serde_json::from_str(json)?;
        Self::new(versions)
    }

    /// Load a catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// All versions in display order
    pub fn list(&self) -> &[Version] {
        &self.versions
    }

    /// Look up a version by id
    pub fn resolve(&self, id: &str) -> CatalogResult<&Version> {
        self.versions
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.versions.iter().any(|v| v.id == id)
    }

    /// First entry; the initial selection of every new session
    pub fn default_version(&self) -> &Version {
        // Non-empty by construction.
        &self.versions[0]
    }
}

impl Default for VersionCatalog {
    fn default() -> Self {
        let versions = ["1.12.2", "1.8.8", "1.5.2"]
            .into_iter()
            .map(|id| {
                Version::new(
                    id,
                    format!("Version {id}"),
                    format!("https://eaglercraft.com/mc/{id}/"),
                )
            })
            .collect();
        Self { versions }
    }
}

fn is_absolute_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(rest) => rest.split('/').next().is_some_and(|host| !host.is_empty()),
        None => false,
    }
}
