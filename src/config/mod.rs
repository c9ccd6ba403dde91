//! Configuration for building a context tree.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → TreeConfig::build_tree (insert, conflict policy, inheritance)
//!     → ContextTree<ContextSettings>
//!     → SharedContextTree::reload (published only if the build succeeded)
//! ```

mod loader;
mod schema;
mod settings;

pub use self::loader::{load_config, ConfigError};
pub use self::schema::{
    AccessConfig, ConflictPolicy, ContextConfig, RewriteConfig, SettingsConfig, TreeConfig,
};
pub use self::settings::{AccessRules, ContextSettings, RewriteRules};
