use crate::error::TreeError;
use crate::path;

use regex::Regex;

/// How a context binds to URIs.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches the URI segment-wise as a path prefix.
    Literal { prefix: Box<str> },
    /// Matches any URI the expression finds a match in.
    Regex { regex: Regex },
}

/// How closely a pattern fits a URI.
///
/// Ordering is the routing tie-break: a literal context sitting exactly on
/// the URI beats everything, a regex match beats any literal prefix, and a
/// deeper prefix beats a shallower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    Prefix(usize),
    Pattern,
    Exact,
}

impl Specificity {
    /// Fit of a literal prefix `depth` segments deep against a URI of
    /// `segments` segments.
    pub fn of_prefix(depth: usize, segments: usize) -> Self {
        if depth == segments {
            Self::Exact
        } else {
            Self::Prefix(depth)
        }
    }
}

impl Pattern {
    pub fn literal(prefix: &str) -> Self {
        Self::Literal {
            prefix: prefix.into(),
        }
    }

    pub fn regex(pattern: &str) -> Result<Self, TreeError> {
        match Regex::new(pattern) {
            Ok(regex) => Ok(Self::Regex { regex }),
            Err(source) => Err(TreeError::InvalidRegex {
                pattern: pattern.into(),
                source,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal { prefix } => prefix,
            Self::Regex { regex } => regex.as_str(),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Self::Regex { .. })
    }

    /// Tries the pattern against `uri`.
    pub fn attempt(&self, uri: &str) -> Option<Specificity> {
        match self {
            Self::Literal { prefix } => {
                let mut rest = path::segments(uri);
                let mut depth = 0;
                for seg in path::segments(prefix) {
                    match rest.next() {
                        Some(s) if s == seg => depth += 1,
                        _ => return None,
                    }
                }
                Some(Specificity::of_prefix(depth, depth + rest.count()))
            }
            Self::Regex { regex } => {
                if regex.is_match(uri) {
                    Some(Specificity::Pattern)
                } else {
                    None
                }
            }
        }
    }
}
