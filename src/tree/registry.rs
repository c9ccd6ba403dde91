use crate::context::Context;
use crate::error::TreeError;

use std::sync::Arc;

/// Regex contexts in registration order.
///
/// Scanned linearly on every lookup that the trie can not settle exactly,
/// so it is expected to stay short.
pub(crate) struct RegexRegistry<P> {
    entries: Vec<Arc<Context<P>>>,
}

impl<P> Clone for RegexRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<P> RegexRegistry<P> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn insert(&mut self, context: Context<P>) -> Result<Arc<Context<P>>, TreeError> {
        if self.find_by_pattern(context.uri_pattern()).is_some() {
            return Err(TreeError::conflict(context.uri_pattern()));
        }
        self.entries
            .try_reserve(1)
            .map_err(|_| TreeError::AllocationFailure {
                what: "regex registry slot",
            })?;
        let context = Arc::new(context);
        self.entries.push(Arc::clone(&context));
        Ok(context)
    }

    pub(crate) fn pop(&mut self) -> Option<Arc<Context<P>>> {
        self.entries.pop()
    }

    /// First registered context whose expression matches `uri`.
    pub(crate) fn first_match(&self, uri: &str) -> Option<&Arc<Context<P>>> {
        self.entries
            .iter()
            .find(|c| c.pattern().attempt(uri).is_some())
    }

    pub(crate) fn find_by_pattern(&self, pattern: &str) -> Option<&Arc<Context<P>>> {
        self.entries.iter().find(|c| c.uri_pattern() == pattern)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Arc<Context<P>>> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Arc<Context<P>>> {
        self.entries.iter_mut()
    }
}
