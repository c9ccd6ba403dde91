mod core;
mod index;
mod inherit;
mod lazy;
mod node;
mod registry;

pub use self::index::IndexMatch;
pub use self::node::TrieNode;

use self::registry::RegexRegistry;
use crate::context::Context;
use crate::path::DEFAULT_MAX_PATH_LEN;

use std::sync::Arc;

/// URI to context dispatch structure.
///
/// Literal contexts live in a segment trie and are found by longest prefix.
/// Regex contexts live in an ordered side registry. A second trie, rooted at
/// the location root, maps filesystem locations back to contexts for the
/// rewrite engine.
///
/// Build it single-threaded, call [`resolve_inheritance`](Self::resolve_inheritance)
/// once, then share it read-only (see [`SharedContextTree`](crate::SharedContextTree)).
pub struct ContextTree<P> {
    root: Arc<TrieNode<P>>,
    regexes: RegexRegistry<P>,
    root_context: Option<Arc<Context<P>>>,
    locations: Arc<TrieNode<P>>,
    root_location: Option<Box<str>>,
    max_path_len: usize,
    literal_count: usize,
}

impl<P> Clone for ContextTree<P> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            regexes: self.regexes.clone(),
            root_context: self.root_context.clone(),
            locations: Arc::clone(&self.locations),
            root_location: self.root_location.clone(),
            max_path_len: self.max_path_len,
            literal_count: self.literal_count,
        }
    }
}

impl<P> Default for ContextTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ContextTree<P> {
    pub fn new() -> Self {
        Self::with_max_path_len(DEFAULT_MAX_PATH_LEN)
    }

    /// URIs and locations longer than `max_path_len` bytes are rejected.
    pub fn with_max_path_len(max_path_len: usize) -> Self {
        Self {
            root: Arc::new(TrieNode::new("")),
            regexes: RegexRegistry::new(),
            root_context: None,
            locations: Arc::new(TrieNode::new("")),
            root_location: None,
            max_path_len,
            literal_count: 0,
        }
    }

    pub fn max_path_len(&self) -> usize {
        self.max_path_len
    }

    /// The node matching `/`.
    pub fn root_node(&self) -> &TrieNode<P> {
        &self.root
    }

    /// Fallback returned by [`best_match`](Self::best_match) when nothing
    /// more specific exists.
    pub fn root_context(&self) -> Option<&Arc<Context<P>>> {
        self.root_context.as_ref()
    }

    pub fn set_root_context(&mut self, context: Context<P>) {
        self.root_context = Some(Arc::new(context));
    }

    pub fn root_location(&self) -> Option<&str> {
        self.root_location.as_deref()
    }

    /// Number of registered literal and regex contexts, the fallback root
    /// context excluded.
    pub fn len(&self) -> usize {
        self.literal_count + self.regexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Literal contexts in trie order followed by regex contexts in
    /// registration order.
    pub fn contexts(&self) -> impl Iterator<Item = &Arc<Context<P>>> {
        Contexts {
            stack: vec![&*self.root],
        }
        .chain(self.regexes.iter())
    }

    /// Resolves the parent link of `context` to the context it names.
    pub fn parent_of(&self, context: &Context<P>) -> Option<&Arc<Context<P>>> {
        let parent = context.parent()?;
        let other = |c: &&Arc<Context<P>>| !std::ptr::eq(&***c, context);
        self.lookup(parent, false)
            .filter(other)
            .or_else(|| self.lookup(parent, true).filter(other))
            .or_else(|| {
                self.root_context
                    .as_ref()
                    .filter(|c| c.uri_pattern() == parent)
                    .filter(other)
            })
    }
}

struct Contexts<'a, P> {
    stack: Vec<&'a TrieNode<P>>,
}

impl<'a, P> Iterator for Contexts<'a, P> {
    type Item = &'a Arc<Context<P>>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.children().rev());
            if let Some(context) = node.context() {
                return Some(context);
            }
        }
        None
    }
}
