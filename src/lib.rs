//! URI to configuration-context dispatch.
//!
//! A [`ContextTree`] maps request URIs to the most specific configured
//! [`Context`]: literal prefixes through a segment trie, regular expressions
//! through an ordered side registry, filesystem locations through a second
//! trie used by rewrite rules. Settings flow from ancestors to descendants
//! once, through [`ContextTree::resolve_inheritance`].
//!
//! ```
//! use context_tree::{Context, ContextTree};
//!
//! let mut tree: ContextTree<&str> = ContextTree::new();
//! tree.set_root_context(Context::literal("/", "root"));
//! tree.insert(Context::literal("/images", "images")).unwrap();
//! tree.insert(Context::literal("/images/icons", "icons")).unwrap();
//!
//! let ctx = tree.best_match("/images/icons/x.png").unwrap().unwrap();
//! assert_eq!(*ctx.payload(), "icons");
//! let ctx = tree.best_match("/other").unwrap().unwrap();
//! assert_eq!(*ctx.payload(), "root");
//! ```

#![forbid(unsafe_code)]

mod context;
mod error;
mod path;
mod shared;
mod strmap;
mod tree;

pub mod config;

#[cfg(feature = "http-tree")]
mod http_tree;

pub use crate::context::{Context, Inherit, Pattern, Setting, Specificity};
pub use crate::error::TreeError;
pub use crate::path::{PathError, DEFAULT_MAX_PATH_LEN};
pub use crate::shared::{SharedContextTree, DEFAULT_STALE_AFTER};
pub use crate::tree::{ContextTree, IndexMatch, TrieNode};

#[cfg(feature = "http-tree")]
pub use crate::http_tree::{Request, Uri};
