//! Configuration schema.
//!
//! All types derive serde traits and default every field, so a minimal
//! file only lists its contexts.

use crate::path::DEFAULT_MAX_PATH_LEN;
use crate::shared::DEFAULT_STALE_AFTER;

use serde::{Deserialize, Serialize};

/// Root of a context tree configuration file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TreeConfig {
    /// URIs and locations longer than this are rejected.
    pub max_path_len: usize,

    /// Age after which a lazily materialized node must be re-verified.
    pub stale_after_secs: u64,

    /// What to do with a second context for the same pattern.
    pub on_conflict: ConflictPolicy,

    /// Filesystem prefix the location index is rooted at.
    pub root_location: Option<String>,

    /// Settings of the fallback root context.
    pub root: Option<SettingsConfig>,

    #[serde(rename = "context")]
    pub contexts: Vec<ContextConfig>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_path_len: DEFAULT_MAX_PATH_LEN,
            stale_after_secs: DEFAULT_STALE_AFTER.as_secs(),
            on_conflict: ConflictPolicy::default(),
            root_location: None,
            root: None,
            contexts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Abort the build.
    Reject,
    /// Keep the context registered first and log the duplicate.
    KeepFirst,
}

impl Default for ConflictPolicy {
    fn default() -> Self {
        Self::Reject
    }
}

/// One `[[context]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContextConfig {
    pub uri: String,

    #[serde(default)]
    pub regex: bool,

    #[serde(default)]
    pub location: Option<String>,

    /// Pattern of the context to inherit from instead of the trie ancestor.
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(flatten)]
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SettingsConfig {
    pub doc_root: Option<String>,
    pub handler: Option<String>,
    pub access: Option<AccessConfig>,
    pub rewrite: Option<RewriteConfig>,
    pub auto_index: Option<bool>,
    pub index_files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub enabled: bool,
    pub rules: Vec<String>,
}
