use std::collections::TryReserveError;

/// A small ordered map from path segments to values.
///
/// Keys are kept sorted; lookups are a binary search.
#[derive(Debug, Clone)]
pub struct StrMap<T> {
    keys: Vec<Box<str>>,
    values: Vec<T>,
}

impl<T> Default for StrMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> StrMap<T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        let i = self.find_index(key).ok()?;
        self.values.get(i)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut T> {
        let i = self.find_index(key).ok()?;
        self.values.get_mut(i)
    }

    /// Returns the value under `key`, inserting `f()` first if it is missing.
    ///
    /// Fails without touching the map when the storage can not grow.
    pub fn try_find_mut_with(
        &mut self,
        key: &str,
        f: impl FnOnce() -> T,
    ) -> Result<&mut T, TryReserveError> {
        let i = match self.find_index(key) {
            Ok(i) => i,
            Err(i) => {
                self.keys.try_reserve(1)?;
                self.values.try_reserve(1)?;
                self.keys.insert(i, key.into());
                self.values.insert(i, f());
                i
            }
        };
        Ok(&mut self.values[i])
    }

    pub fn remove(&mut self, key: &str) -> Option<T> {
        let i = self.find_index(key).ok()?;
        self.keys.remove(i);
        Some(self.values.remove(i))
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &T)> {
        self.keys.iter().map(|k| &**k).zip(self.values.iter())
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.values.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    fn find_index(&self, key: &str) -> Result<usize, usize> {
        self.keys.binary_search_by(|k| (**k).cmp(key))
    }
}

#[cfg(test)]
mod tests {
    use super::StrMap;

    #[test]
    fn keeps_keys_sorted() {
        let mut map: StrMap<u32> = StrMap::new();
        for (i, k) in ["js", "css", "images", "api"].iter().enumerate() {
            *map.try_find_mut_with(k, || 0).unwrap() = i as u32;
        }
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["api", "css", "images", "js"]);
        assert_eq!(map.find("images"), Some(&2));
        assert_eq!(map.find("img"), None);
    }

    #[test]
    fn insert_is_idempotent_and_remove_shrinks() {
        let mut map: StrMap<u32> = StrMap::new();
        *map.try_find_mut_with("a", || 1).unwrap() += 1;
        *map.try_find_mut_with("a", || 100).unwrap() += 1;
        assert_eq!(map.len(), 1);
        assert_eq!(map.find("a"), Some(&3));
        assert_eq!(map.remove("a"), Some(3));
        assert_eq!(map.remove("a"), None);
        assert!(map.is_empty());
    }
}
