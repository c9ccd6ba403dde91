use super::node::TrieNode;
use super::ContextTree;

use crate::context::{Context, Inherit};
use crate::error::TreeError;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

type ExplicitParents<P> = HashMap<Box<str>, Arc<Context<P>>>;

impl<P: Inherit + Clone> ContextTree<P> {
    /// Fills every context's unset settings from its parent.
    ///
    /// The parent of a literal context is the nearest trie ancestor carrying
    /// a context, or the root context. Regex contexts inherit from the root
    /// context. A parent pinned with [`Context::set_parent`] overrides both.
    ///
    /// Run once after the last insert and before the tree is shared; it
    /// needs exclusive access and must not race with lookups.
    pub fn resolve_inheritance(&mut self) -> Result<(), TreeError> {
        // the location index holds second references to contexts, which
        // would make every copy-on-write below clone
        self.drop_location_index();

        let max_passes = self.len() + 2;
        let mut passes = 0;
        loop {
            passes += 1;
            let explicit = self.explicit_parents();
            let root_context = self.root_context.clone();

            let mut changed =
                inherit_node(Arc::make_mut(&mut self.root), root_context.as_ref(), &explicit);
            for context in self.regexes.iter_mut() {
                changed |= inherit_context(context, root_context.as_ref(), &explicit);
            }

            // pinned parents may be resolved later in the walk than their
            // children, another pass picks up what they gained
            if !changed {
                break;
            }
            if passes >= max_passes {
                warn!(passes, "inheritance did not settle, parent links may form a cycle");
                break;
            }
        }
        debug!(passes, contexts = self.len(), "inheritance resolved");

        self.reindex_locations()
    }

    fn explicit_parents(&self) -> ExplicitParents<P> {
        let mut parents = ExplicitParents::new();
        for context in self.contexts() {
            let name = match context.parent() {
                Some(name) if context.has_explicit_parent() => name,
                _ => continue,
            };
            if parents.contains_key(name) {
                continue;
            }
            match self.parent_of(context) {
                Some(parent) => {
                    parents.insert(name.into(), Arc::clone(parent));
                }
                None => warn!(
                    pattern = context.uri_pattern(),
                    parent = name,
                    "pinned parent context does not exist"
                ),
            }
        }
        parents
    }
}

fn inherit_node<P: Inherit + Clone>(
    node: &mut TrieNode<P>,
    parent: Option<&Arc<Context<P>>>,
    explicit: &ExplicitParents<P>,
) -> bool {
    let mut changed = false;
    if let Some(context) = node.context_slot() {
        changed |= inherit_context(context, parent, explicit);
    }

    let own = node.context().cloned();
    let next = own.as_ref().or(parent);
    for child in node.children_mut() {
        changed |= inherit_node(Arc::make_mut(child), next, explicit);
    }
    changed
}

fn inherit_context<P: Inherit + Clone>(
    context: &mut Arc<Context<P>>,
    implied: Option<&Arc<Context<P>>>,
    explicit: &ExplicitParents<P>,
) -> bool {
    let source = if context.has_explicit_parent() {
        context.parent().and_then(|name| explicit.get(name))
    } else {
        implied
    };
    let source = match source {
        Some(source) if !Arc::ptr_eq(source, context) => source,
        _ => return false,
    };

    let context = Arc::make_mut(context);
    context.set_implied_parent(source.uri_pattern());
    context.payload_mut().inherit_from(source.payload())
}
