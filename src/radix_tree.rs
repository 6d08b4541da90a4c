//! Compressed trie over byte string keys
//!
//! Single-child chains are merged into one node holding a byte string,
//! and split back apart when an insertion diverges partway through.
//! Stored keys carry a trailing NUL so that an entry `"ab"` remains
//! distinguishable from a node passed through while looking up `"abc"`.

use std::cmp::Ordering;

/// Result of looking up a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// The key is an entry in the tree
    Match(&'a T),
    /// The key is not an entry but is a prefix of one, which makes it a
    /// useful autocomplete stem
    Prefix,
    /// The key is not in the tree
    Miss,
}

impl<T> Lookup<'_, T> {
    /// Whether the key was found as an entry
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, Lookup::Match(_))
    }

    /// Whether the key is a strict prefix of an entry
    #[must_use]
    pub fn is_prefix(&self) -> bool {
        matches!(self, Lookup::Prefix)
    }
}

struct Node<T> {
    /// Key fragment held by this node, NUL-terminated for entry nodes
    key: Vec<u8>,
    /// Value stored when this node terminates an entry
    data: Option<T>,
    /// Next node at this level
    sibling: Option<Box<Node<T>>>,
    /// First node of the level below; `None` marks a leaf
    child: Option<Box<Node<T>>>,
}

/// A radix tree mapping byte string keys to values
pub struct RadixTree<T> {
    root: Option<Box<Node<T>>>,
    entries: usize,
}

impl<T> Default for RadixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the shared prefix of two byte strings
fn common_prefix(s: &[u8], key: &[u8]) -> usize {
    s.iter().zip(key).take_while(|(a, b)| a == b).count()
}

/// A lookup key with the trailing NUL appended.
///
/// # Panics
///
/// Panics if the key contains an interior NUL byte.
fn terminated(key: &[u8]) -> Vec<u8> {
    assert!(
        !key.contains(&0),
        "radix tree keys cannot contain NUL bytes"
    );

    let mut query = Vec::with_capacity(key.len() + 1);
    query.extend_from_slice(key);
    query.push(0);
    query
}

impl<T> RadixTree<T> {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: None,
            entries: 0,
        }
    }

    /// Number of entries (keys, not nodes) stored
    #[must_use]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Check if the tree holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Look up `key`, reporting a match, a miss, or a miss that is a
    /// strict prefix of some entry
    #[must_use]
    pub fn find(&self, key: &[u8]) -> Lookup<'_, T> {
        let query = terminated(key);
        let mut s: &[u8] = &query;
        let mut node = self.root.as_deref();

        while let Some(n) = node {
            let prefix_len = common_prefix(s, &n.key);

            if prefix_len == 0 {
                node = n.sibling.as_deref();
            } else if prefix_len == s.len() {
                return match n.data.as_ref() {
                    Some(data) => Lookup::Match(data),
                    None => Lookup::Miss,
                };
            } else if prefix_len == n.key.len() {
                s = &s[prefix_len..];
                node = n.child.as_deref();
            } else {
                // Query diverged inside this node's key. If only the
                // terminating NUL is missing the query names a prefix of
                // this entry.
                if prefix_len == s.len() - 1 {
                    return Lookup::Prefix;
                }
                return Lookup::Miss;
            }
        }

        // Ran out of nodes. A fully consumed query stopped at an interior
        // node boundary, which is a prefix as well.
        if s.len() == 1 {
            Lookup::Prefix
        } else {
            Lookup::Miss
        }
    }

    /// Insert `key` with `value`. Returns `true` for a new entry, or
    /// `false` when the key already existed and only its value was
    /// updated.
    pub fn insert(&mut self, key: &[u8], value: T) -> bool {
        let query = terminated(key);
        let inserted = Self::insert_link(&mut self.root, &query, value);

        if inserted {
            self.entries += 1;
        }

        inserted
    }

    fn insert_link(link: &mut Option<Box<Node<T>>>, s: &[u8], value: T) -> bool {
        match link {
            None => {
                *link = Some(Box::new(Node {
                    key: s.to_vec(),
                    data: Some(value),
                    sibling: None,
                    child: None,
                }));
                true
            }
            Some(node) => {
                let prefix_len = common_prefix(s, &node.key);

                match prefix_len.cmp(&s.len()) {
                    Ordering::Equal => {
                        // Entry already exists, update its value
                        node.data = Some(value);
                        false
                    }
                    Ordering::Less if prefix_len == 0 => {
                        Self::insert_link(&mut node.sibling, s, value)
                    }
                    _ => {
                        if prefix_len < node.key.len() {
                            Self::split(node, prefix_len);
                        }
                        Self::insert_link(&mut node.child, &s[prefix_len..], value)
                    }
                }
            }
        }
    }

    /// Split a node whose key is only partially shared with a new entry:
    /// the tail of the key moves into a single child
    fn split(node: &mut Node<T>, prefix_len: usize) {
        let suffix = node.key.split_off(prefix_len);

        let split_node = Box::new(Node {
            key: suffix,
            data: node.data.take(),
            sibling: None,
            child: node.child.take(),
        });

        node.child = Some(split_node);
    }

    /// Delete `key`, returning `true` if an entry was removed
    pub fn delete(&mut self, key: &[u8]) -> bool {
        let query = terminated(key);
        let deleted = Self::delete_link(&mut self.root, &query);

        if deleted {
            self.entries -= 1;
        }

        deleted
    }

    fn delete_link(link: &mut Option<Box<Node<T>>>, s: &[u8]) -> bool {
        let prefix_len = match link {
            None => return false,
            Some(node) => common_prefix(s, &node.key),
        };

        if prefix_len == s.len() {
            // Unlink this node, keeping its siblings in the chain
            let node = link.take().expect("link checked above");
            *link = node.sibling;
            return true;
        }

        let node = link.as_deref_mut().expect("link checked above");

        if prefix_len == 0 {
            Self::delete_link(&mut node.sibling, s)
        } else if prefix_len == node.key.len() {
            let deleted = Self::delete_link(&mut node.child, &s[prefix_len..]);

            if deleted && matches!(&node.child, Some(child) if child.sibling.is_none()) {
                Self::join(node);
            }

            deleted
        } else {
            false
        }
    }

    /// Merge a parent with its sole remaining child, keeping the tree
    /// compressed
    fn join(parent: &mut Node<T>) {
        let child = parent.child.take().expect("join requires a child");

        parent.key.extend_from_slice(&child.key);
        parent.data = child.data;
        parent.child = child.child;
    }
}

#[cfg(test)]
#[path = "radix_tree_tests.rs"]
mod tests;
