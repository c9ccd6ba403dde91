mod pattern;
mod setting;

pub use self::pattern::{Pattern, Specificity};
pub use self::setting::{Inherit, Setting};

use crate::error::TreeError;

/// A configuration bundle bound to a URI pattern.
///
/// The tree only looks at the pattern, the optional filesystem location and
/// the parent link. The payload is opaque to it apart from [`Inherit`].
#[derive(Debug, Clone)]
pub struct Context<P> {
    pattern: Pattern,
    location: Option<Box<str>>,
    parent: Option<Box<str>>,
    explicit_parent: bool,
    payload: P,
}

impl<P> Context<P> {
    pub fn literal(uri: &str, payload: P) -> Self {
        Self::new(Pattern::literal(uri), payload)
    }

    pub fn regex(pattern: &str, payload: P) -> Result<Self, TreeError> {
        Ok(Self::new(Pattern::regex(pattern)?, payload))
    }

    pub fn new(pattern: Pattern, payload: P) -> Self {
        Self {
            pattern,
            location: None,
            parent: None,
            explicit_parent: false,
            payload,
        }
    }

    /// Binds the context to a filesystem location as well, which makes it
    /// visible to [`ContextTree::match_location`](crate::ContextTree::match_location).
    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn uri_pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_regex(&self) -> bool {
        self.pattern.is_regex()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Pattern of the context this one inherits from.
    ///
    /// Resolve it to a context with [`ContextTree::parent_of`](crate::ContextTree::parent_of).
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Pins the parent, overriding the one implied by the trie position.
    pub fn set_parent(&mut self, pattern: &str) {
        self.parent = Some(pattern.into());
        self.explicit_parent = true;
    }

    pub fn has_explicit_parent(&self) -> bool {
        self.explicit_parent
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    pub(crate) fn set_implied_parent(&mut self, pattern: &str) {
        if !self.explicit_parent && self.parent.as_deref() != Some(pattern) {
            self.parent = Some(pattern.into());
        }
    }
}
