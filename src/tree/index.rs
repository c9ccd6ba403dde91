use super::node::TrieNode;
use super::ContextTree;

use crate::context::Context;
use crate::path::{self, SLASH};

use std::borrow::Cow;
use std::sync::Arc;

/// Result of [`ContextTree::match_indexes`].
#[derive(Debug)]
pub struct IndexMatch<'a, P> {
    /// The matched index name. Borrowed when it points into the tree's own
    /// storage, owned when it was built from the candidate list.
    pub name: Cow<'a, str>,
    /// The index's own context on a trie hit, the directory's context on a
    /// filesystem hit.
    pub context: Option<&'a Arc<Context<P>>>,
}

impl<P> ContextTree<P> {
    /// First index file of `indexes` that exists under `dir`.
    ///
    /// A candidate matches when a context is configured for it below `dir`
    /// (candidates starting with `/` are looked up from the tree root), or
    /// when `exists` confirms it on the filesystem. Candidates that are not
    /// valid paths are skipped without asking `exists`.
    pub fn match_indexes<'a, I, F>(
        &'a self,
        indexes: I,
        dir: &'a TrieNode<P>,
        mut exists: F,
    ) -> Option<IndexMatch<'a, P>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        F: FnMut(&str) -> bool,
    {
        for index in indexes {
            let index = index.as_ref();
            let parts = match path::split(index, self.max_path_len) {
                Ok(parts) if !parts.is_empty() => parts,
                _ => continue,
            };

            let absolute = index.starts_with(SLASH);
            let start = if absolute { self.root_node() } else { dir };
            if let Some(node) = start.descend(parts.iter().copied()) {
                if let Some(context) = node.context() {
                    let name = if absolute || parts.len() > 1 {
                        Cow::Owned(index.to_owned())
                    } else {
                        Cow::Borrowed(node.key())
                    };
                    return Some(IndexMatch {
                        name,
                        context: Some(context),
                    });
                }
            }

            if exists(index) {
                return Some(IndexMatch {
                    name: Cow::Owned(index.to_owned()),
                    context: dir.context(),
                });
            }
        }
        None
    }

    /// Context configured for the single index `index` right below `dir`.
    pub fn match_index<'a>(
        &'a self,
        dir: &'a TrieNode<P>,
        index: &str,
    ) -> Option<&'a Arc<Context<P>>> {
        self.match_indexes(Some(index), dir, |_| false)?.context
    }
}
