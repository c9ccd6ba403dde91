//! Loading configuration from disk and turning it into a tree.

use super::schema::{ConflictPolicy, ContextConfig, TreeConfig};
use super::settings::ContextSettings;
use crate::context::Context;
use crate::error::TreeError;
use crate::shared::SharedContextTree;
use crate::tree::ContextTree;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Reads and parses a TOML configuration file.
pub fn load_config(path: &Path) -> Result<TreeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    TreeConfig::from_toml_str(&content)
}

impl TreeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    /// Builds the tree and resolves inheritance.
    ///
    /// Any error aborts the whole build; a partially built tree is never
    /// returned.
    pub fn build_tree(&self) -> Result<ContextTree<ContextSettings>, ConfigError> {
        let mut tree = ContextTree::with_max_path_len(self.max_path_len);

        if let Some(root) = &self.root {
            tree.set_root_context(Context::literal("/", root.clone().into()));
        }
        if let Some(location) = &self.root_location {
            tree.set_root_location(location)?;
        }

        for entry in &self.contexts {
            match tree.insert(entry.to_context()?) {
                Ok(()) => {}
                Err(e) if e.is_conflict() && self.on_conflict == ConflictPolicy::KeepFirst => {
                    warn!(uri = %entry.uri, "duplicate context ignored, keeping the first one");
                }
                Err(e) => return Err(e.into()),
            }
        }

        tree.resolve_inheritance()?;
        debug!(contexts = tree.len(), "context tree built");
        Ok(tree)
    }

    /// Builds a tree and wraps it for sharing with the configured staleness
    /// tolerance.
    pub fn build_shared(&self) -> Result<SharedContextTree<ContextSettings>, ConfigError> {
        let tree = self.build_tree()?;
        Ok(SharedContextTree::with_stale_after(tree, self.stale_after()))
    }
}

impl ContextConfig {
    pub fn to_context(&self) -> Result<Context<ContextSettings>, TreeError> {
        let settings: ContextSettings = self.settings.clone().into();
        let mut context = if self.regex {
            Context::regex(&self.uri, settings)?
        } else {
            Context::literal(&self.uri, settings)
        };
        if let Some(location) = &self.location {
            context = context.with_location(location);
        }
        if let Some(parent) = &self.parent {
            context.set_parent(parent);
        }
        Ok(context)
    }
}
