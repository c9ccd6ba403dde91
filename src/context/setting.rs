use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

/// Payloads that can take unset values from an ancestor.
pub trait Inherit {
    /// Fills every unset field of `self` from `parent`.
    ///
    /// Returns `true` when at least one field changed.
    fn inherit_from(&mut self, parent: &Self) -> bool;
}

impl Inherit for () {
    fn inherit_from(&mut self, _: &Self) -> bool {
        false
    }
}

/// One inheritable configuration value.
///
/// An explicit value lives in a shared cell. Inheriting links the child to
/// the ancestor's cell instead of copying it, so a later [`Setting::store`]
/// on the ancestor is seen by every descendant that inherited it.
pub struct Setting<T> {
    cell: Option<Arc<ArcSwap<T>>>,
    inherited: bool,
}

impl<T> Setting<T> {
    pub fn unset() -> Self {
        Self {
            cell: None,
            inherited: false,
        }
    }

    pub fn new(value: T) -> Self {
        Self {
            cell: Some(Arc::new(ArcSwap::from_pointee(value))),
            inherited: false,
        }
    }

    pub fn is_set(&self) -> bool {
        self.cell.is_some()
    }

    pub fn is_explicit(&self) -> bool {
        self.cell.is_some() && !self.inherited
    }

    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.as_ref().map(|c| c.load_full())
    }

    /// Replaces the value of an explicit setting in place.
    ///
    /// Returns `false` and does nothing for unset or inherited settings; those
    /// do not own the cell they read from.
    pub fn store(&self, value: T) -> bool {
        match &self.cell {
            Some(cell) if !self.inherited => {
                cell.store(Arc::new(value));
                true
            }
            _ => false,
        }
    }

    /// Gives this setting its own value, dropping any inherited link.
    pub fn set(&mut self, value: T) {
        *self = Self::new(value);
    }

    /// Links to `parent`'s cell when this setting is unset.
    pub fn inherit_from(&mut self, parent: &Setting<T>) -> bool {
        match (&self.cell, &parent.cell) {
            (None, Some(cell)) => {
                self.cell = Some(Arc::clone(cell));
                self.inherited = true;
                true
            }
            _ => false,
        }
    }

    /// Whether both settings read from the same cell.
    pub fn shares_cell(&self, other: &Setting<T>) -> bool {
        match (&self.cell, &other.cell) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Self::unset()
    }
}

impl<T> Clone for Setting<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            inherited: self.inherited,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            None => f.write_str("Unset"),
            Some(v) if self.inherited => f.debug_tuple("Inherited").field(&v).finish(),
            Some(v) => f.debug_tuple("Explicit").field(&v).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Setting;

    #[test]
    fn inherit_links_instead_of_copying() {
        let parent = Setting::new(String::from("/srv/www"));
        let mut child: Setting<String> = Setting::unset();

        assert!(child.inherit_from(&parent));
        assert!(child.is_inherited());
        assert!(child.shares_cell(&parent));

        assert!(parent.store(String::from("/srv/other")));
        assert_eq!(child.get().as_deref().map(String::as_str), Some("/srv/other"));

        // the child does not own the cell
        assert!(!child.store(String::from("/tmp")));
        assert!(!child.inherit_from(&Setting::new(String::from("/x"))));
    }

    #[test]
    fn explicit_value_wins() {
        let parent = Setting::new(1u32);
        let mut child = Setting::new(2u32);
        assert!(!child.inherit_from(&parent));
        assert_eq!(child.get().map(|v| *v), Some(2));
        child.set(3);
        assert!(child.is_explicit());
    }
}
