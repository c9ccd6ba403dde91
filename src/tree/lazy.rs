use super::core::longest_prefix;
use super::ContextTree;

use crate::context::{Context, Inherit};
use crate::error::TreeError;
use crate::path;

use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

impl<P: Inherit> ContextTree<P> {
    /// Creates a context for a path discovered at request time, such as an
    /// auto-index or CGI directory, or returns the one already there.
    ///
    /// The new node is stamped with `checked_at`, the moment the caller last
    /// verified the filesystem state behind it. The tree does no I/O itself.
    /// The new context inherits from the nearest context above it. `/`
    /// resolves to the fallback root context when one is set.
    pub fn materialize(
        &mut self,
        path: &str,
        checked_at: SystemTime,
    ) -> Result<Arc<Context<P>>, TreeError>
    where
        P: Default,
    {
        self.materialize_with(path, checked_at, P::default)
    }

    /// Like [`materialize`](Self::materialize), building the payload with
    /// `make` when a context has to be created.
    pub fn materialize_with<F>(
        &mut self,
        path: &str,
        checked_at: SystemTime,
        make: F,
    ) -> Result<Arc<Context<P>>, TreeError>
    where
        F: FnOnce() -> P,
    {
        let parts = path::split_absolute(path, self.max_path_len)?;
        if parts.is_empty() {
            if let Some(root) = &self.root_context {
                return Ok(Arc::clone(root));
            }
        }
        let (nearest, depth) = longest_prefix(&self.root, &parts);
        if let Some(existing) = nearest.filter(|_| depth == parts.len()) {
            return Ok(Arc::clone(existing));
        }
        let parent = nearest.or(self.root_context.as_ref()).cloned();

        let mut context = Context::literal(path, make());
        if let Some(parent) = &parent {
            context.set_implied_parent(parent.uri_pattern());
            context.payload_mut().inherit_from(parent.payload());
        }
        let context = Arc::new(context);

        let node = Arc::make_mut(&mut self.root).descend_or_create(&parts)?;
        *node.context_slot() = Some(Arc::clone(&context));
        node.set_last_check(Some(checked_at));
        self.literal_count += 1;

        debug!(path, parent = parent.as_ref().map(|p| p.uri_pattern()), "context materialized");
        Ok(context)
    }
}

impl<P> ContextTree<P> {
    /// Moves the staleness stamp of a materialized node to `checked_at`.
    ///
    /// Returns `false` if `path` has no materialized node; configured nodes
    /// carry no stamp and are left alone.
    pub fn refresh(&mut self, path: &str, checked_at: SystemTime) -> bool {
        let parts = match path::split_absolute(path, self.max_path_len) {
            Ok(parts) => parts,
            Err(_) => return false,
        };
        match self.root.descend(parts.iter().copied()) {
            Some(node) if node.last_check().is_some() => {}
            _ => return false,
        }
        match Arc::make_mut(&mut self.root).descend_or_create(&parts) {
            Ok(node) => {
                node.set_last_check(Some(checked_at));
                true
            }
            Err(_) => false,
        }
    }
}
