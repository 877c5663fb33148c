use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// End-of-list marker for slab links.
const NULL_INDEX: usize = usize::MAX;

struct Node<K, V> {
    key: K,
    value: V,
    prev: usize,
    next: usize,
}

/// Hash map with O(1) recency tracking.
///
/// Entries live in a slab and are threaded on an index-linked doubly-linked list running from
/// least to most recently used. Freed slots are recycled through a freelist.
pub(crate) struct LruMap<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
    head: usize,
    tail: usize,
}

impl<K, V> Default for LruMap<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> LruMap<K, V>
where
    K: Hash + Eq + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: NULL_INDEX,
            tail: NULL_INDEX,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Look up `key` and mark it most recently used.
    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.detach(idx);
        self.push_back(idx);
        self.node(idx).map(|n| &n.value)
    }

    /// Look up `key` without touching recency.
    #[cfg(test)]
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;
        self.node(idx).map(|n| &n.value)
    }

    /// Insert or replace `key` as the most recently used entry, returning the replaced value.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&idx) = self.index.get(&key) {
            self.detach(idx);
            self.push_back(idx);
            return self
                .node_mut(idx)
                .map(|n| std::mem::replace(&mut n.value, value));
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: NULL_INDEX,
            next: NULL_INDEX,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.index.insert(key, idx);
        self.push_back(idx);
        None
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.release(idx).map(|(_, v)| v)
    }

    /// Remove and return the least recently used entry.
    pub(crate) fn pop_lru(&mut self) -> Option<(K, V)> {
        if self.head == NULL_INDEX {
            return None;
        }
        let idx = self.head;
        let out = self.release(idx)?;
        self.index.remove(&out.0);
        Some(out)
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = NULL_INDEX;
        self.tail = NULL_INDEX;
    }

    /// Entries from least to most recently used.
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            cursor: self.head,
        }
    }

    fn node(&self, idx: usize) -> Option<&Node<K, V>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K, V>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    fn release(&mut self, idx: usize) -> Option<(K, V)> {
        self.detach(idx);
        let node = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        Some((node.key, node.value))
    }

    fn detach(&mut self, idx: usize) {
        let Some((prev, next)) = self.node(idx).map(|n| (n.prev, n.next)) else {
            return;
        };
        match self.node_mut(prev) {
            Some(p) => p.next = next,
            None => self.head = next,
        }
        match self.node_mut(next) {
            Some(n) => n.prev = prev,
            None => self.tail = prev,
        }
        if let Some(node) = self.node_mut(idx) {
            node.prev = NULL_INDEX;
            node.next = NULL_INDEX;
        }
    }

    fn push_back(&mut self, idx: usize) {
        let tail = self.tail;
        if let Some(node) = self.node_mut(idx) {
            node.prev = tail;
            node.next = NULL_INDEX;
        }
        match self.node_mut(tail) {
            Some(t) => t.next = idx,
            None => self.head = idx,
        }
        self.tail = idx;
    }
}

pub(crate) struct Iter<'a, K, V> {
    map: &'a LruMap<K, V>,
    cursor: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Hash + Eq + Clone,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.map.node(self.cursor)?;
        self.cursor = node.next;
        Some((&node.key, &node.value))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/lru.rs"]
mod tests;
