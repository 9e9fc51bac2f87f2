//! Mutable ordered map based on an AVL tree.
//!
//! This module provides [`AvlMap`], an ordered map that keeps the heights
//! of every node's two subtrees within one of each other.
//!
//! # Overview
//!
//! - O(log N) get / insert / remove
//! - O(log N) first / last entry
//! - O(N) in-order export
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use avlmap::AvlMap;
//!
//! let mut map = AvlMap::new();
//! map.insert(3, "three").insert(1, "one").insert(2, "two");
//!
//! // Entries are always exported in sorted order
//! assert_eq!(map.to_vec(), vec![(1, "one"), (2, "two"), (3, "three")]);
//! ```
//!
//! # Internal Structure
//!
//! The tree maintains the following invariants:
//! 1. Every key in a left subtree is less than its parent's key
//! 2. Every key in a right subtree is greater than its parent's key
//! 3. Every node caches `1 + max(height(left), height(right))`
//! 4. Subtree heights of every node differ by at most one
//!
//! These invariants bound the tree height by about 1.44 log2(N).

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ops::Index;

use super::dump::TreeDump;
use super::node::{Link, Node, Side, Trail, rebalance, rebalance_along, value_along};

// =============================================================================
// AvlMap Definition
// =============================================================================

/// A mutable ordered map based on an AVL tree.
///
/// Keys must implement `Ord`. Each key appears at most once; inserting an
/// existing key overwrites its value in place. Entries are exported in
/// ascending key order by [`to_vec`](Self::to_vec).
///
/// Cloning an `AvlMap` copies every node, so a clone and its source never
/// observe each other's mutations.
///
/// # Time Complexity
///
/// | Operation        | Complexity |
/// |------------------|------------|
/// | `new`            | O(1)       |
/// | `get` / `search` | O(log N)   |
/// | `insert`         | O(log N)   |
/// | `remove`         | O(log N)   |
/// | `to_vec`         | O(N)       |
/// | `clone`          | O(N)       |
/// | `len`            | O(1)       |
/// | `is_empty`       | O(1)       |
///
/// # Examples
///
/// ```rust
/// use avlmap::AvlMap;
///
/// let mut map = AvlMap::new();
/// map.insert(10, "ten").insert(20, "twenty");
///
/// let mut found = "";
/// assert!(map.search(&10, &mut found));
/// assert_eq!(found, "ten");
/// assert!(!map.search(&99, &mut found));
/// ```
#[derive(Clone)]
pub struct AvlMap<K, V> {
    /// Root node of the tree
    pub(super) root: Link<K, V>,
    /// Number of entries
    pub(super) length: usize,
}

static_assertions::assert_impl_all!(AvlMap<i32, String>: Send, Sync, Clone, Default);
static_assertions::assert_not_impl_any!(AvlMap<std::rc::Rc<i32>, i32>: Send, Sync);

impl<K, V> AvlMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map: AvlMap<i32, String> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// Always equal to `self.to_vec().len()`.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map: AvlMap<u32, ()> = (0..1000).map(|key| (key, ())).collect();
    /// assert!(map.height() <= 15);
    /// ```
    #[must_use]
    pub fn height(&self) -> u32 {
        super::node::height(self.root.as_deref())
    }

    /// Removes every entry. Calling it on an empty map does nothing.
    pub fn clear(&mut self) {
        self.root = None;
        self.length = 0;
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map = AvlMap::from([(3, "three"), (1, "one"), (2, "two")]);
    /// assert_eq!(map.first_key_value(), Some((&1, &"one")));
    /// ```
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Some((&current.key, &current.value))
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map = AvlMap::from([(3, "three"), (1, "one"), (2, "two")]);
    /// assert_eq!(map.last_key_value(), Some((&3, &"three")));
    /// ```
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut current = self.root.as_deref()?;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        Some((&current.key, &current.value))
    }

    /// Returns a diagnostic rendering of the tree shape.
    ///
    /// The right subtree is printed first, then the node as `key : value`
    /// indented four spaces per level, then the left subtree, so the output
    /// reads as the tree rotated a quarter turn counter-clockwise. The
    /// format is meant for humans and may change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map = AvlMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// assert_eq!(map.dump().to_string(), "    3 : c\n2 : b\n    1 : a\n");
    /// ```
    #[must_use]
    pub fn dump(&self) -> TreeDump<'_, K, V> {
        TreeDump::new(self.root.as_deref())
    }

    /// Collects borrowed entries in sorted order (in-order traversal).
    fn collect_entries_in_order<'a>(node: Option<&'a Node<K, V>>, entries: &mut Vec<(&'a K, &'a V)>) {
        if let Some(node_ref) = node {
            Self::collect_entries_in_order(node_ref.left.as_deref(), entries);
            entries.push((&node_ref.key, &node_ref.value));
            Self::collect_entries_in_order(node_ref.right.as_deref(), entries);
        }
    }

    /// Borrowed entries in ascending key order.
    fn entries(&self) -> Vec<(&K, &V)> {
        let mut entries = Vec::with_capacity(self.length);
        Self::collect_entries_in_order(self.root.as_deref(), &mut entries);
        entries
    }

    /// Exports every entry in ascending key order.
    ///
    /// The map is left untouched.
    ///
    /// # Complexity
    ///
    /// O(N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(3, 3).insert(2, 2).insert(1, 1);
    /// assert_eq!(map.to_vec(), vec![(1, 1), (2, 2), (3, 3)]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.entries()
            .into_iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Finds the node holding `key` by iterative descent.
    fn find_node<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Looks up `key` and, when present, copies its value into `out`.
    ///
    /// Returns whether the key was found. On a miss `out` is left as it was.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let map = AvlMap::from([(1, 100)]);
    /// let mut value = 0;
    /// assert!(map.search(&1, &mut value));
    /// assert_eq!(value, 100);
    ///
    /// value = -1;
    /// assert!(!map.search(&2, &mut value));
    /// assert_eq!(value, -1);
    /// ```
    pub fn search<Q>(&self, key: &Q, out: &mut V) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
        V: Clone,
    {
        match self.find_node(key) {
            Some(node) => {
                out.clone_from(&node.value);
                true
            }
            None => false,
        }
    }

    /// Inserts a key-value pair, returning the map for chaining.
    ///
    /// If the map already contains the key, its value is overwritten and the
    /// length is unchanged; duplicates are never created. Use
    /// [`put`](Self::put) to get the displaced value back.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 100).insert(1, 200);
    /// assert_eq!(map[&1], 200);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> &mut Self {
        self.put(key, value);
        self
    }

    /// Inserts a key-value pair, returning the previous value for the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.put("a", 1), None);
    /// assert_eq!(map.put("a", 2), Some(1));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (new_root, replaced) = Self::insert_into_node(self.root.take(), key, value);
        self.root = Some(new_root);
        if replaced.is_none() {
            self.length += 1;
        }
        replaced
    }

    /// Recursive helper for insert.
    /// Returns (`new_subtree`, `replaced_value`).
    fn insert_into_node(node: Link<K, V>, key: K, value: V) -> (Box<Node<K, V>>, Option<V>) {
        let Some(mut node) = node else {
            return (Box::new(Node::leaf(key, value)), None);
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (new_left, replaced) = Self::insert_into_node(node.left.take(), key, value);
                node.left = Some(new_left);
                (rebalance(node), replaced)
            }
            Ordering::Greater => {
                let (new_right, replaced) = Self::insert_into_node(node.right.take(), key, value);
                node.right = Some(new_right);
                (rebalance(node), replaced)
            }
            Ordering::Equal => {
                // Key exists, update value; shape is unchanged
                let previous = mem::replace(&mut node.value, value);
                (node, Some(previous))
            }
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// Assigning through the returned reference therefore both creates and
    /// updates entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut counts: AvlMap<&str, u32> = AvlMap::new();
    /// *counts.get_or_insert_default("apple") += 1;
    /// *counts.get_or_insert_default("apple") += 1;
    /// assert_eq!(counts.get("apple"), Some(&2));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns a mutable reference to the value for `key`, inserting the
    /// result of `make` first if the key is absent.
    ///
    /// `make` is called only on a miss. The tree is searched once; the
    /// returned reference is found by replaying the route to the entry,
    /// adjusted for any rotation the insertion caused.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut map = AvlMap::from([(1, vec!["a"])]);
    /// map.get_or_insert_with(1, Vec::new).push("b");
    /// map.get_or_insert_with(2, Vec::new).push("c");
    /// assert_eq!(map.get(&1), Some(&vec!["a", "b"]));
    /// assert_eq!(map.get(&2), Some(&vec!["c"]));
    /// ```
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let mut trail = Trail::default();
        let (new_root, inserted) = Self::entry_in_node(self.root.take(), key, make, &mut trail);
        if inserted {
            self.length += 1;
        }
        let root: &mut Node<K, V> = self.root.insert(new_root);
        let value = value_along(root, &mut trail);
        debug_assert!(trail.is_empty(), "route to the entry ran off the tree");
        value
    }

    /// Recursive helper for `get_or_insert_with`.
    /// Returns (`new_subtree`, `inserted`); `trail` leads from the returned
    /// subtree root to the entry for `key`.
    fn entry_in_node<F>(
        node: Link<K, V>,
        key: K,
        make: F,
        trail: &mut Trail,
    ) -> (Box<Node<K, V>>, bool)
    where
        F: FnOnce() -> V,
    {
        let Some(mut node) = node else {
            return (Box::new(Node::leaf(key, make())), true);
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (new_left, inserted) = Self::entry_in_node(node.left.take(), key, make, trail);
                node.left = Some(new_left);
                trail.push_front(Side::Left);
                (rebalance_along(node, trail), inserted)
            }
            Ordering::Greater => {
                let (new_right, inserted) = Self::entry_in_node(node.right.take(), key, make, trail);
                node.right = Some(new_right);
                trail.push_front(Side::Right);
                (rebalance_along(node, trail), inserted)
            }
            Ordering::Equal => (node, false),
        }
    }

    /// Removes a key from the map, returning the map for chaining.
    ///
    /// Removing a key that is not present (including from an empty map)
    /// does nothing.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avlmap::AvlMap;
    ///
    /// let mut map = AvlMap::from([(10, ()), (5, ()), (15, ()), (2, ())]);
    /// map.remove(&2).remove(&10).remove(&42);
    /// assert_eq!(map.to_vec(), vec![(5, ()), (15, ())]);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> &mut Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key);
        self
    }

    /// Removes a key from the map, returning the stored key and value if
    /// the key was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (new_root, removed) = Self::remove_from_node(self.root.take(), key);
        self.root = new_root;
        if removed.is_some() {
            self.length -= 1;
        }
        removed
    }

    /// Recursive helper for remove.
    fn remove_from_node<Q>(node: Link<K, V>, key: &Q) -> (Link<K, V>, Option<(K, V)>)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(mut node) = node else {
            return (None, None);
        };
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let (new_left, removed) = Self::remove_from_node(node.left.take(), key);
                node.left = new_left;
                (Some(rebalance(node)), removed)
            }
            Ordering::Greater => {
                let (new_right, removed) = Self::remove_from_node(node.right.take(), key);
                node.right = new_right;
                (Some(rebalance(node)), removed)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => {
                    let Node { key, value, .. } = *node;
                    (None, Some((key, value)))
                }
                (Some(child), None) | (None, Some(child)) => {
                    let Node { key, value, .. } = *node;
                    (Some(child), Some((key, value)))
                }
                (Some(left), Some(right)) => {
                    // Overwrite this node with its in-order successor
                    let (new_right, successor) = Self::detach_min(right);
                    let Node {
                        key: successor_key,
                        value: successor_value,
                        ..
                    } = *successor;
                    let key = mem::replace(&mut node.key, successor_key);
                    let value = mem::replace(&mut node.value, successor_value);
                    node.left = Some(left);
                    node.right = new_right;
                    (Some(rebalance(node)), Some((key, value)))
                }
            },
        }
    }

    /// Unlinks the minimum node of a subtree.
    /// Returns (`remaining_subtree`, `minimum_node`).
    fn detach_min(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (rest, node)
            }
            Some(left) => {
                let (new_left, minimum) = Self::detach_min(left);
                node.left = new_left;
                (Some(rebalance(node)), minimum)
            }
        }
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for AvlMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for AvlMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Read-only indexing by key.
///
/// # Panics
///
/// Panics if the key is not present. Use [`AvlMap::get`] to handle absence.
impl<K, Q, V> Index<&Q> for AvlMap<K, V>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for AvlMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.entries() == other.entries()
    }
}

impl<K: Eq, V: Eq> Eq for AvlMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for AvlMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for AvlMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self.entries() {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================
