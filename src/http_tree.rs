use crate::context::Context;
use crate::path::PathError;
use crate::shared::SharedContextTree;
use crate::tree::ContextTree;

use std::sync::Arc;

pub use http::{Request, Uri};

impl<P> ContextTree<P> {
    /// [`best_match`](Self::best_match) on the path of `uri`.
    ///
    /// The query string never takes part in matching.
    pub fn best_match_uri(&self, uri: &Uri) -> Result<Option<&Arc<Context<P>>>, PathError> {
        self.best_match(uri.path())
    }

    pub fn best_match_request<B>(
        &self,
        req: &Request<B>,
    ) -> Result<Option<&Arc<Context<P>>>, PathError> {
        self.best_match_uri(req.uri())
    }
}

impl<P> SharedContextTree<P> {
    /// Resolves `req` against the current tree and returns an owned handle,
    /// so the caller can keep it past the next reload.
    pub fn route<B>(&self, req: &Request<B>) -> Result<Option<Arc<Context<P>>>, PathError> {
        let tree = self.load();
        Ok(tree.best_match_request(req)?.cloned())
    }
}
