use core::fmt::Debug;

use crate::hash::FixedHashState;
use crate::hash::hashbrown::HashMap;
use crate::hash::hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// IdMap

/// A specialized map container with a stable `u32` identifier as the fixed key type.
///
/// Identifiers are assigned by a schema rather than by the compiler, so unlike
/// `TypeId` they are not pre-hashed and go through [`FixedHashState`].
///
/// The container's interface is fully abstracted, exposing no [`HashMap`]
/// specific APIs. This allows for potential future changes to the underlying
/// implementation without breaking external code.
pub struct IdMap<V>(HashMap<u32, V, FixedHashState>);

impl<V> IdMap<V> {
    /// Creates an empty `IdMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pm_utils::IdMap;
    /// let map = IdMap::<&str>::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self(HashMap::with_hasher(FixedHashState))
    }

    /// Inserts `v` under `id` unless the key is already present.
    ///
    /// - Returns `Ok` with the inserted value if the key was vacant.
    /// - Returns `Err` with the existing value otherwise, leaving the map
    ///   unchanged and dropping `v`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pm_utils::IdMap;
    /// let mut map = IdMap::new();
    /// assert!(map.try_insert(7, "first").is_ok());
    /// assert_eq!(map.try_insert(7, "second"), Err(&"first"));
    /// assert_eq!(map.get(7), Some(&"first"));
    /// ```
    #[inline]
    pub fn try_insert(&mut self, id: u32, v: V) -> Result<&mut V, &V> {
        match self.0.entry(id) {
            Entry::Vacant(entry) => Ok(entry.insert(v)),
            Entry::Occupied(entry) => Err(entry.into_mut()),
        }
    }

    /// Returns a reference to the value corresponding to the id.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&V> {
        self.0.get(&id)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        self.0.contains_key(&id)
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }
}

impl<V> Default for IdMap<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for IdMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::IdMap;

    #[test]
    fn try_insert_keeps_existing() {
        let mut map = IdMap::new();
        *map.try_insert(3, 10).unwrap() += 1;
        assert_eq!(map.try_insert(3, 100), Err(&11));
        assert!(map.try_insert(4, 40).is_ok());
        assert!(map.contains(3));
        assert!(!map.contains(5));
        assert_eq!(map.len(), 2);
        assert_eq!(map.values().copied().sum::<i32>(), 51);
    }

    #[test]
    fn is_sync_send() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<IdMap<fn() -> u8>>();
        is_sync::<IdMap<fn() -> u8>>();
    }
}
