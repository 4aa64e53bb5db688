//! Desired-state document types and loading.
//!
//! The document is parsed once at startup and never mutated. Top-level keys
//! name entity-kind sections (`artifactory`, `license`, `users`, `groups`,
//! `repositories`, `permissions`); each section maps operation names to their
//! arguments. Payloads are treated as opaque JSON and routed untouched - the
//! server is responsible for validating them.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// The declarative input describing what operations to perform against which
/// identifiers, plus optional connection settings and run policy flags.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    pub artifactory: Option<InstanceSection>,
    pub license: Option<LicenseSection>,
    pub users: Option<EntitySection>,
    pub groups: Option<EntitySection>,
    pub repositories: Option<EntitySection>,
    pub permissions: Option<EntitySection>,

    /// Allow creates to overwrite existing same-identifier entities.
    pub destructive: Option<bool>,
    /// When true, unconditionally disables destructive mode.
    pub safe: Option<bool>,
    /// Public context path appended when expanding a bare hostname.
    #[serde(rename = "serverPublicContextPath")]
    pub server_public_context_path: Option<String>,
}

impl Document {
    /// Load and parse a desired-state document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }
}

/// The `artifactory` section: connection settings plus instance-level reads.
#[derive(Debug, Default, Deserialize)]
pub struct InstanceSection {
    /// Full base URL of the target instance.
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
    /// Bare hostname, expanded with the default scheme and context path.
    pub hostname: Option<String>,
    /// Alias accepted for either of the above.
    #[serde(rename = "targetServer")]
    pub target_server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,

    /// Fetch the health status (ping) when true.
    pub health: Option<bool>,
    /// Fetch instance information when true.
    pub information: Option<bool>,
    /// Fetch the instance configuration when true.
    pub configuration: Option<bool>,
}

impl InstanceSection {
    /// First server value present, in `baseURL` > `hostname` > `targetServer`
    /// order.
    #[must_use]
    pub fn server(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .or(self.hostname.as_deref())
            .or(self.target_server.as_deref())
    }

    /// Whether any instance-level read was requested.
    #[must_use]
    pub fn has_reads(&self) -> bool {
        self.health.is_some() || self.information.is_some() || self.configuration.is_some()
    }
}

/// The `license` section.
#[derive(Debug, Default, Deserialize)]
pub struct LicenseSection {
    /// Fetch current license details when true.
    pub information: Option<bool>,
    /// Install a license key.
    pub install: Option<LicenseInstall>,
}

/// Arguments for a license installation.
///
/// When both are present the file wins; the inline value is the fallback.
#[derive(Debug, Deserialize)]
pub struct LicenseInstall {
    #[serde(rename = "licenseFile")]
    pub license_file: Option<PathBuf>,
    pub license: Option<Value>,
}

/// A desired-state section for one entity kind (users, groups, repositories,
/// permission targets): operation name to operation arguments.
///
/// Absent keys mean the operation is skipped for the run - that is not an
/// error. `create`/`update` maps keep their declaration order (the crate is
/// built with `serde_json/preserve_order`).
#[derive(Debug, Default, Deserialize)]
pub struct EntitySection {
    pub list: Option<ListSpec>,
    pub detail: Option<Vec<String>>,
    pub delete: Option<Vec<String>>,
    pub create: Option<serde_json::Map<String, Value>>,
    pub update: Option<serde_json::Map<String, Value>>,
    #[serde(rename = "createFromFile")]
    pub create_from_file: Option<Vec<PathBuf>>,
    #[serde(rename = "updateFromFile")]
    pub update_from_file: Option<Vec<PathBuf>>,
}

/// Arguments to a `list` operation: any non-sequence value lists everything,
/// a sequence lists once per filter value. Only repositories honor filters
/// (type names); other kinds list everything regardless.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListSpec {
    Filters(Vec<String>),
    All(Value),
}

/// An opaque payload routed to the server without local validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A structured JSON value from an inline `create`/`update` map.
    Structured(Value),
    /// Raw file contents from a `*FromFile` operation.
    Raw(String),
}

impl Payload {
    /// Render the payload for transcript display.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Structured(value) => value.to_string(),
            Self::Raw(text) => text.clone(),
        }
    }
}

/// Derive an identifier from a payload file: base name minus extension
/// (`conf/foo.json` becomes `foo`).
#[must_use]
pub fn identifier_from_path(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
}
