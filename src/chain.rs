//! Singly-linked collision list used by each bucket of the chained map.

use std::iter::FusedIterator;

/// A node of a [`Chain`]
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    /// The key stored in the node
    pub(crate) key: String,
    /// The value associated with the key
    pub(crate) value: V,
    /// The rest of the list
    next: Option<Box<Self>>,
}

/// A singly-linked list of key-value nodes without duplicate keys
#[derive(Debug, Clone)]
pub(crate) struct Chain<V> {
    /// First node of the list
    head: Option<Box<Node<V>>>,
    /// Number of nodes
    len: usize,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self { head: None, len: 0 }
    }
}

impl<V> Chain<V> {
    /// Number of nodes in the list
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Pushes a node at the front. The caller makes sure `key` is not in the list yet.
    pub(crate) fn insert(&mut self, key: String, value: V) {
        let next = self.head.take();
        self.head = Some(Box::new(Node { key, value, next }));
        self.len = self.len.saturating_add(1);
    }

    /// The node holding `key`
    pub(crate) fn find(&self, key: &str) -> Option<&Node<V>> {
        self.iter().find(|node| node.key == key)
    }

    /// Mutable access to the node holding `key`
    pub(crate) fn find_mut(&mut self, key: &str) -> Option<&mut Node<V>> {
        let mut link = self.head.as_deref_mut();
        while let Some(node) = link {
            if node.key == key {
                return Some(node);
            }
            link = node.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the node holding `key` and returns its value
    pub(crate) fn remove(&mut self, key: &str) -> Option<V> {
        let mut link = &mut self.head;
        while link.as_ref().is_some_and(|node| node.key != key) {
            link = &mut link.as_mut()?.next;
        }

        let Node { value, next, .. } = *link.take()?;
        *link = next;
        self.len = self.len.saturating_sub(1);
        Some(value)
    }

    /// Iterates over the nodes from the front
    pub(crate) fn iter(&self) -> ChainIter<'_, V> {
        ChainIter { next: self.head.as_deref() }
    }

    /// Consumes the list, yielding its pairs in list order
    pub(crate) fn into_pairs(self) -> IntoPairs<V> {
        IntoPairs { chain: self }
    }
}

/// Borrowing iterator over the nodes of a [`Chain`]
#[derive(Debug, Clone)]
pub(crate) struct ChainIter<'a, V> {
    /// Node returned by the next call
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = &'a Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some(node)
    }
}

impl<V> FusedIterator for ChainIter<'_, V> {}

/// Owning iterator over the pairs of a [`Chain`]
#[derive(Debug)]
pub(crate) struct IntoPairs<V> {
    /// Remaining nodes
    chain: Chain<V>,
}

impl<V> Iterator for IntoPairs<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        let Node { key, value, next } = *self.chain.head.take()?;
        self.chain.head = next;
        self.chain.len = self.chain.len.saturating_sub(1);
        Some((key, value))
    }
}

// Iterative teardown; the derived drop would recurse once per node.
impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}
