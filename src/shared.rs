use crate::context::{Context, Inherit};
use crate::error::TreeError;
use crate::tree::ContextTree;

use std::io;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use arc_swap::{ArcSwap, Guard};
use tracing::{debug, info, warn};

/// Default staleness tolerance for lazily materialized nodes.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(10);

/// A published [`ContextTree`] shared by request workers.
///
/// Readers load the current snapshot without locking. Writers never touch a
/// published tree: they copy it (only the touched trie path is duplicated),
/// change the copy and swap it in, so a reader never sees a half-built node.
pub struct SharedContextTree<P> {
    current: ArcSwap<ContextTree<P>>,
    stale_after: Duration,
}

impl<P> SharedContextTree<P> {
    pub fn new(tree: ContextTree<P>) -> Self {
        Self::with_stale_after(tree, DEFAULT_STALE_AFTER)
    }

    pub fn with_stale_after(tree: ContextTree<P>, stale_after: Duration) -> Self {
        Self {
            current: ArcSwap::from_pointee(tree),
            stale_after,
        }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    /// Cheap, short-lived view of the current tree for one request.
    pub fn load(&self) -> Guard<Arc<ContextTree<P>>> {
        self.current.load()
    }

    /// Owned handle on the current tree.
    pub fn snapshot(&self) -> Arc<ContextTree<P>> {
        self.current.load_full()
    }

    /// Replaces the published tree.
    pub fn publish(&self, tree: ContextTree<P>) {
        self.current.store(Arc::new(tree));
        info!("context tree published");
    }

    /// Builds a new generation and publishes it only if the build succeeds.
    ///
    /// On failure the previous tree keeps serving and the error is returned.
    pub fn reload<F, E>(&self, build: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<ContextTree<P>, E>,
        E: std::fmt::Display,
    {
        match build() {
            Ok(tree) => {
                let contexts = tree.len();
                self.current.store(Arc::new(tree));
                info!(contexts, "context tree reloaded");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "context tree reload failed, keeping the current tree");
                Err(e)
            }
        }
    }

    /// Applies `f` to a private copy of the current tree and swaps the copy
    /// in. Retries from the newer tree if another writer won the race.
    fn update<T, F>(&self, mut f: F) -> Result<T, TreeError>
    where
        F: FnMut(&mut ContextTree<P>) -> Result<T, TreeError>,
    {
        loop {
            let current = self.current.load_full();
            let mut next = ContextTree::clone(&current);
            let out = f(&mut next)?;
            let prev = self.current.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&prev, &current) {
                return Ok(out);
            }
            debug!("concurrent tree update, retrying");
        }
    }

    /// Copy-on-write [`ContextTree::refresh`].
    pub fn refresh(&self, path: &str, checked_at: SystemTime) -> bool {
        if self.current.load().find_node(path).and_then(|n| n.last_check()).is_none() {
            return false;
        }
        self.update(|tree| Ok(tree.refresh(path, checked_at)))
            .unwrap_or(false)
    }

    /// Copy-on-write [`ContextTree::remove`].
    pub fn remove(&self, path: &str) -> Option<Arc<Context<P>>> {
        self.current.load().lookup(path, false)?;
        self.update(|tree| Ok(tree.remove(path))).ok().flatten()
    }
}

impl<P: Inherit> SharedContextTree<P> {
    /// Copy-on-write [`ContextTree::materialize`].
    ///
    /// Returns the existing context without any copy when the path is
    /// already there.
    pub fn materialize(
        &self,
        path: &str,
        checked_at: SystemTime,
    ) -> Result<Arc<Context<P>>, TreeError>
    where
        P: Default,
    {
        if let Some(existing) = self.current.load().lookup(path, false) {
            return Ok(Arc::clone(existing));
        }
        self.update(|tree| tree.materialize(path, checked_at))
    }

    /// Context at `path`, re-verified through `verify` when its node is a
    /// materialized one older than the staleness tolerance.
    ///
    /// `Ok(true)` from `verify` refreshes the stamp, `Ok(false)` discards the
    /// node. A failing check is logged and treated as no match; the I/O error
    /// is not propagated.
    pub fn revalidate<F>(&self, path: &str, now: SystemTime, verify: F) -> Option<Arc<Context<P>>>
    where
        F: FnOnce(&str) -> io::Result<bool>,
    {
        let (context, stale) = {
            let tree = self.current.load();
            let node = tree.find_node(path)?;
            (
                Arc::clone(node.context()?),
                node.is_stale(now, self.stale_after),
            )
        };
        if !stale {
            return Some(context);
        }

        match verify(path) {
            Ok(true) => {
                self.refresh(path, now);
                Some(context)
            }
            Ok(false) => {
                debug!(path, "materialized path is gone, discarding");
                self.remove(path);
                None
            }
            Err(e) => {
                warn!(path, error = %e, "revalidation failed, treating as no match");
                None
            }
        }
    }
}
