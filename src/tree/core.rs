use super::node::TrieNode;
use super::ContextTree;

use crate::context::{Context, Specificity};
use crate::error::TreeError;
use crate::path::{self, PathError, Segments, SLASH};

use std::sync::Arc;

use tracing::{debug, trace};

impl<P> ContextTree<P> {
    /// Registers a context.
    ///
    /// Literal patterns go into the trie, regex patterns into the regex
    /// registry only. A second context for the same pattern is a
    /// [`TreeError::Conflict`]; whether that is fatal is up to the caller.
    /// A rejected context leaves the tree as it was.
    pub fn insert(&mut self, context: Context<P>) -> Result<(), TreeError> {
        if let Some(location) = context.location() {
            path::split(location, self.max_path_len)?;
        }

        if context.is_regex() {
            debug!(pattern = context.uri_pattern(), "registering regex context");
            let context = self.regexes.insert(context)?;
            if let Err(e) = self.index_location(&context) {
                self.regexes.pop();
                return Err(e);
            }
            return Ok(());
        }

        let context = Arc::new(context);
        let parts = path::split_absolute(context.uri_pattern(), self.max_path_len)?;
        if let Some(node) = self.root.descend(parts.iter().copied()) {
            if node.context().is_some() {
                return Err(TreeError::conflict(context.uri_pattern()));
            }
        }

        let node = Arc::make_mut(&mut self.root).descend_or_create(&parts)?;
        *node.context_slot() = Some(Arc::clone(&context));
        if let Err(e) = self.index_location(&context) {
            Arc::make_mut(&mut self.root).detach(&parts);
            return Err(e);
        }
        self.literal_count += 1;
        debug!(uri = context.uri_pattern(), depth = parts.len(), "context inserted");
        Ok(())
    }

    /// Exact node for `prefix`, whether or not it carries a context.
    pub fn find_node(&self, prefix: &str) -> Option<&TrieNode<P>> {
        let parts = path::split_absolute(prefix, self.max_path_len).ok()?;
        self.root.descend(parts.iter().copied())
    }

    /// Most specific context for a request URI.
    ///
    /// The trie is walked segment by segment and the deepest node carrying a
    /// context is the literal candidate. Candidates are ranked by
    /// [`Specificity`]: unless the literal one sits exactly on the URI, the
    /// first matching regex context wins over it. Regexes see the URI in
    /// the same normalized form the trie walked. Without any match the root
    /// context is returned.
    ///
    /// `Ok(None)` means no match and no fallback.
    pub fn best_match(&self, uri: &str) -> Result<Option<&Arc<Context<P>>>, PathError> {
        let parts = path::split_absolute(uri, self.max_path_len)?;
        let (best, depth) = longest_prefix(&self.root, &parts);

        let literal = best.map(|_| Specificity::of_prefix(depth, parts.len()));
        if literal.map_or(true, |s| s < Specificity::Pattern) {
            let normalized = path::normalize(uri, &parts);
            if let Some(context) = self.regexes.first_match(&normalized) {
                trace!(uri, pattern = context.uri_pattern(), "regex match");
                return Ok(Some(context));
            }
        }

        Ok(best.or(self.root_context.as_ref()))
    }

    /// Context governing a filesystem location, for the rewrite engine.
    ///
    /// Only the location index is searched: no regex contexts and no root
    /// fallback. Locations outside the location root never match.
    pub fn match_location(&self, location: &str) -> Option<&Arc<Context<P>>> {
        let rest = self.strip_root_location(location)?;
        let parts = path::split(rest, self.max_path_len).ok()?;
        longest_prefix(&self.locations, &parts).0
    }

    /// Exact lookup by configured pattern.
    ///
    /// With `regex` set only the regex registry is searched, by pattern
    /// source; otherwise only the context sitting exactly on the trie node
    /// for `pattern` is returned.
    pub fn lookup(&self, pattern: &str, regex: bool) -> Option<&Arc<Context<P>>> {
        if regex {
            self.regexes.find_by_pattern(pattern)
        } else {
            self.find_node(pattern)?.context()
        }
    }

    /// Detaches the context registered exactly at `uri` and hands it back.
    ///
    /// Nodes left with neither a context nor children are pruned up to the
    /// first node that still carries something.
    pub fn remove(&mut self, uri: &str) -> Option<Arc<Context<P>>> {
        let parts = path::split_absolute(uri, self.max_path_len).ok()?;
        self.root.descend(parts.iter().copied())?.context()?;

        let removed = Arc::make_mut(&mut self.root).detach(&parts)?;
        self.literal_count -= 1;
        self.unindex_location(&removed);
        debug!(uri, "context removed");
        Some(removed)
    }

    /// Sets the filesystem prefix the location index is rooted at.
    ///
    /// Can only be done once per tree. On failure the tree is left without a
    /// location root and the call can be retried.
    pub fn set_root_location(&mut self, location: &str) -> Result<(), TreeError> {
        if let Some(current) = &self.root_location {
            return Err(TreeError::RootLocationAlreadySet {
                current: current.clone(),
            });
        }
        path::split(location, self.max_path_len)?;

        let previous = std::mem::replace(&mut self.locations, Arc::new(TrieNode::new("")));
        self.root_location = Some(location.into());
        if let Err(e) = self.reindex_locations() {
            self.root_location = None;
            self.locations = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Rebuilds the location index from every registered context.
    pub(crate) fn reindex_locations(&mut self) -> Result<(), TreeError> {
        Arc::make_mut(&mut self.locations).clear();
        let contexts: Vec<Arc<Context<P>>> = self.contexts().cloned().collect();
        for context in &contexts {
            self.index_location(context)?;
        }
        Ok(())
    }

    pub(crate) fn drop_location_index(&mut self) {
        self.locations = Arc::new(TrieNode::new(""));
    }

    fn index_location(&mut self, context: &Arc<Context<P>>) -> Result<(), TreeError> {
        let location = match context.location() {
            Some(l) => l,
            None => return Ok(()),
        };
        let rest = match self.strip_root_location(location) {
            Some(rest) => rest,
            None => {
                if self.root_location.is_some() {
                    debug!(location, "location outside of the location root, not indexed");
                }
                return Ok(());
            }
        };
        let parts = path::split(rest, self.max_path_len)?;
        let node = Arc::make_mut(&mut self.locations).descend_or_create(&parts)?;
        let slot = node.context_slot();
        if slot.is_none() {
            *slot = Some(Arc::clone(context));
        } else {
            debug!(location, "location already indexed, first context kept");
        }
        Ok(())
    }

    fn unindex_location(&mut self, context: &Arc<Context<P>>) {
        let rest = match context.location().and_then(|l| self.strip_root_location(l)) {
            Some(rest) => rest,
            None => return,
        };
        let parts: Segments<'_> = match path::split(rest, self.max_path_len) {
            Ok(parts) => parts,
            Err(_) => return,
        };
        let indexed = self
            .locations
            .descend(parts.iter().copied())
            .and_then(|n| n.context())
            .map_or(false, |c| Arc::ptr_eq(c, context));
        if indexed {
            Arc::make_mut(&mut self.locations).detach(&parts);
        }
    }

    fn strip_root_location<'a>(&self, location: &'a str) -> Option<&'a str> {
        let root = self.root_location.as_deref()?;
        let rest = location.strip_prefix(root)?;
        if root.ends_with(SLASH) || rest.is_empty() || rest.starts_with(SLASH) {
            Some(rest)
        } else {
            None
        }
    }
}

/// Deepest context along `parts`, with the depth it was found at.
pub(super) fn longest_prefix<'t, P>(
    root: &'t TrieNode<P>,
    parts: &[&str],
) -> (Option<&'t Arc<Context<P>>>, usize) {
    let mut node = root;
    let mut best = node.context();
    let mut depth = 0;
    for (i, part) in parts.iter().enumerate() {
        node = match node.child(part) {
            Some(child) => child,
            None => break,
        };
        if let Some(context) = node.context() {
            best = Some(context);
            depth = i + 1;
        }
    }
    (best, depth)
}
