use crate::context::Context;
use crate::error::TreeError;
use crate::strmap::StrMap;

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// One path segment on the way from the root to a URI prefix.
///
/// Children sit behind `Arc` so a copy-on-write update only duplicates the
/// nodes on the path it touches.
pub struct TrieNode<P> {
    key: Box<str>,
    children: StrMap<Arc<TrieNode<P>>>,
    context: Option<Arc<Context<P>>>,
    last_check: Option<SystemTime>,
}

impl<P> Clone for TrieNode<P> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            children: self.children.clone(),
            context: self.context.clone(),
            last_check: self.last_check,
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for TrieNode<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieNode")
            .field("key", &self.key)
            .field("context", &self.context)
            .field("last_check", &self.last_check)
            .field("children", &self.children)
            .finish()
    }
}

impl<P> TrieNode<P> {
    pub(crate) fn new(key: &str) -> Self {
        Self {
            key: key.into(),
            children: StrMap::new(),
            context: None,
            last_check: None,
        }
    }

    /// Segment key, without separators. Empty for a root node.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn context(&self) -> Option<&Arc<Context<P>>> {
        self.context.as_ref()
    }

    pub fn child(&self, key: &str) -> Option<&TrieNode<P>> {
        self.children.find(key).map(|c| &**c)
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = &TrieNode<P>> {
        self.children.values().map(|c| &**c)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// When the filesystem state behind a lazily created node was last
    /// verified. `None` for nodes that came from configuration.
    pub fn last_check(&self) -> Option<SystemTime> {
        self.last_check
    }

    /// Whether a lazily created node is older than `tolerance` at `now`.
    ///
    /// Configured nodes are never stale. A clock that went backwards counts
    /// as fresh.
    pub fn is_stale(&self, now: SystemTime, tolerance: Duration) -> bool {
        match self.last_check {
            None => false,
            Some(at) => match now.duration_since(at) {
                Ok(age) => age > tolerance,
                Err(_) => false,
            },
        }
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.context.is_none() && self.children.is_empty()
    }

    pub(crate) fn context_slot(&mut self) -> &mut Option<Arc<Context<P>>> {
        &mut self.context
    }

    pub(crate) fn set_last_check(&mut self, at: Option<SystemTime>) {
        self.last_check = at;
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = &mut Arc<TrieNode<P>>> {
        self.children.values_mut()
    }

    /// Walks down `parts` without creating anything.
    pub(crate) fn descend<'a, I>(&self, parts: I) -> Option<&TrieNode<P>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut node = self;
        for part in parts {
            node = node.child(part)?;
        }
        Some(node)
    }

    /// Walks down `parts`, creating the missing nodes on the way.
    pub(crate) fn descend_or_create(&mut self, parts: &[&str]) -> Result<&mut Self, TreeError> {
        let mut node = self;
        for &part in parts {
            let child = node
                .children
                .try_find_mut_with(part, || Arc::new(TrieNode::new(part)))
                .map_err(|_| TreeError::AllocationFailure { what: "trie node" })?;
            node = Arc::make_mut(child);
        }
        Ok(node)
    }

    /// Detaches the context at `parts` and prunes every node left without a
    /// context or children on the way back up. The receiver itself is never
    /// pruned.
    pub(crate) fn detach(&mut self, parts: &[&str]) -> Option<Arc<Context<P>>> {
        match parts.split_first() {
            None => {
                self.last_check = None;
                self.context.take()
            }
            Some((&first, rest)) => {
                let child = self.children.find_mut(first)?;
                let removed = Arc::make_mut(child).detach(rest)?;
                if child.is_dead() {
                    self.children.remove(first);
                }
                Some(removed)
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.children.clear();
        self.context = None;
        self.last_check = None;
    }
}
