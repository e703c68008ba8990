use std::fmt;

/// An arena slot. `prev` points toward the head (newer), `next` toward the tail (older).
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    pub(crate) visited: bool,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
            visited: false,
        }
    }
}

/// A read-only view of a cached entry, including its `visited` bit.
///
/// Returned by [`SieveCache::insert`](crate::SieveCache::insert) and
/// [`SieveCache::get_node`](crate::SieveCache::get_node). Holding one borrows the cache.
pub struct NodeRef<'a, K, V> {
    node: &'a Node<K, V>,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) fn new(node: &'a Node<K, V>) -> Self {
        Self { node }
    }

    /// The key of this entry.
    #[inline]
    pub fn key(&self) -> &'a K {
        &self.node.key
    }

    /// The value of this entry.
    #[inline]
    pub fn value(&self) -> &'a V {
        &self.node.value
    }

    /// Return `true` if the entry was read or updated since the eviction hand last passed it.
    #[inline]
    pub fn is_visited(&self) -> bool {
        self.node.visited
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.node.key)
            .field("value", &self.node.value)
            .field("visited", &self.node.visited)
            .finish()
    }
}
