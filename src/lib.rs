#![doc = include_str!("../README.md")]

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::trace;

mod error;
mod iter;
mod node;

pub use error::Error;
pub use iter::Iter;
pub use node::NodeRef;

use node::Node;

/// A cache based on the SIEVE eviction algorithm.
///
/// Entries live in a dense arena and are chained from the newest insertion (head) to the
/// oldest (tail) through arena indices. Reads only flip a `visited` bit; the chain is never
/// reordered. When the cache is full, a single hand walks from the tail toward the head,
/// clearing `visited` bits until it finds an unvisited entry to evict, and stays where it
/// stopped for the next eviction.
pub struct SieveCache<K: Eq + Hash + Clone, V> {
    map: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    hand: Option<usize>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> SieveCache<K, V> {
    /// Create a new cache with the given capacity.
    pub fn new(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self {
            map: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            hand: None,
            capacity,
        })
    }

    /// Return the capacity of the cache.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the number of cached values.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` when no values are currently cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return `true` if there is a value in the cache mapped to by `key`.
    ///
    /// This does not count as an access.
    #[inline]
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        Q: Hash + Eq,
        K: Borrow<Q>,
    {
        self.map.contains_key(key)
    }

    /// Get an immutable reference to the value in the cache mapped to by `key`.
    ///
    /// If no value exists for `key`, this returns `None`. A hit marks the entry as visited,
    /// which protects it from the next pass of the eviction hand.
    pub fn get<Q: ?Sized>(&mut self, key: &Q) -> Option<&V>
    where
        Q: Hash + Eq,
        K: Borrow<Q>,
    {
        let idx = *self.map.get(key)?;
        let node = &mut self.nodes[idx];
        node.visited = true;
        Some(&node.value)
    }

    /// Get a mutable reference to the value in the cache mapped to by `key`.
    ///
    /// If no value exists for `key`, this returns `None`. Like [`get`](Self::get), a hit
    /// marks the entry as visited.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Eq,
        K: Borrow<Q>,
    {
        let idx = *self.map.get(key)?;
        let node = &mut self.nodes[idx];
        node.visited = true;
        Some(&mut node.value)
    }

    /// Look up the entry mapped to by `key` without marking it as visited.
    pub fn get_node<Q: ?Sized>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        Q: Hash + Eq,
        K: Borrow<Q>,
    {
        let idx = *self.map.get(key)?;
        Some(NodeRef::new(&self.nodes[idx]))
    }

    /// Map `key` to `value` in the cache, possibly evicting an old entry.
    ///
    /// If `key` is already cached, its value is replaced and the entry is marked as visited;
    /// its position in the chain does not change. Otherwise, when the cache is full, one
    /// entry is evicted first, and the new entry is added unvisited at the head.
    ///
    /// Returns a view of the stored entry.
    pub fn insert(&mut self, key: K, value: V) -> NodeRef<'_, K, V> {
        let idx = match self.map.get(&key).copied() {
            Some(idx) => {
                let node = &mut self.nodes[idx];
                node.value = value;
                node.visited = true;
                idx
            }
            None => {
                if self.nodes.len() >= self.capacity {
                    self.evict();
                }
                debug_assert!(self.nodes.len() < self.capacity);
                let idx = self.push_front(Node::new(key.clone(), value));
                self.map.insert(key, idx);
                idx
            }
        };
        NodeRef::new(&self.nodes[idx])
    }

    /// Remove the cache entry mapped to by `key`.
    ///
    /// This method returns the value removed from the cache. If `key` did not map to any value,
    /// then this returns `None`.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash,
    {
        let idx = *self.map.get(key)?;
        Some(self.remove_at(idx).value)
    }

    /// Remove every entry. The next eviction starts from the tail again.
    pub fn clear(&mut self) {
        let removed = self.nodes.len();
        self.map.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.hand = None;
        trace!(removed, "cleared cache");
    }

    /// Keep only the entries for which `f` returns `true`.
    ///
    /// Entries are visited from newest to oldest and their `visited` bits are left untouched.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let doomed: Vec<K> = self
            .iter()
            .filter(|&(key, value)| !f(key, value))
            .map(|(key, _)| key.clone())
            .collect();
        for key in doomed {
            self.remove(&key);
        }
    }

    /// Iterate over `(key, value)` pairs from the newest insertion to the oldest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.head, self.tail)
    }

    /// Iterate over the keys, newest insertion first.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Iterate over the values, newest insertion first.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Snapshot of all entries, newest insertion first.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn push_front(&mut self, mut node: Node<K, V>) -> usize {
        let idx = self.nodes.len();
        node.prev = None;
        node.next = self.head;
        if let Some(head) = self.head {
            self.nodes[head].prev = Some(idx);
        }
        self.nodes.push(node);
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = self.head;
        }
        idx
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }
    }

    /// Point everything that referred to slot `from` at slot `to` after a `swap_remove`.
    fn relocate(&mut self, from: usize, to: usize) {
        let (prev, next) = (self.nodes[to].prev, self.nodes[to].next);
        match prev {
            Some(prev) => self.nodes[prev].next = Some(to),
            None => self.head = Some(to),
        }
        match next {
            Some(next) => self.nodes[next].prev = Some(to),
            None => self.tail = Some(to),
        }
        if self.hand == Some(from) {
            self.hand = Some(to);
        }
        if let Some(slot) = self.map.get_mut(&self.nodes[to].key) {
            *slot = to;
        }
    }

    /// Drop the node in slot `idx` from the chain, the index and the arena.
    fn remove_at(&mut self, idx: usize) -> Node<K, V> {
        if self.hand == Some(idx) {
            self.hand = self.nodes[idx].prev;
        }
        self.unlink(idx);
        let last = self.nodes.len() - 1;
        let node = self.nodes.swap_remove(idx);
        if idx != last {
            self.relocate(last, idx);
        }
        self.map.remove(&node.key);
        node
    }

    fn evict(&mut self) -> Option<V> {
        let mut cursor = self.hand.or(self.tail);
        let mut scanned = 0usize;
        while let Some(idx) = cursor {
            let node = &mut self.nodes[idx];
            if !node.visited {
                break;
            }
            node.visited = false;
            scanned += 1;
            let prev = node.prev;
            cursor = prev.or(self.tail);
        }
        let victim = cursor?;
        self.hand = self.nodes[victim].prev;
        let node = self.remove_at(victim);
        trace!(
            scanned,
            len = self.nodes.len(),
            capacity = self.capacity,
            "evicted entry"
        );
        Some(node.value)
    }
}

impl<'a, K: Eq + Hash + Clone, V> IntoIterator for &'a SieveCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Eq + Hash + Clone + fmt::Debug, V: fmt::Debug> fmt::Debug for SieveCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
