//! Top-K selection by value.

use std::cmp::Ordering;

use tracing::trace;

use crate::tree::AvlMap;

/// Returns the `count` entries with the largest values, largest first.
///
/// Entries with equal values keep ascending key order. A value that is not
/// comparable with itself (such as `NaN`) ranks after every comparable value,
/// and such values tie with each other. Asking for more entries than the map
/// holds returns all of them; `count == 0` returns nothing. The map is not
/// modified.
///
/// # Complexity
///
/// O(N log N)
///
/// # Examples
///
/// ```rust
/// use avlmap::{AvlMap, top_k};
///
/// let map = AvlMap::from([("a", 10), ("b", 30), ("c", 20), ("d", 5)]);
/// assert_eq!(top_k(&map, 2), vec![("b", 30), ("c", 20)]);
/// ```
#[must_use]
pub fn top_k<K, V>(map: &AvlMap<K, V>, count: usize) -> Vec<(K, V)>
where
    K: Clone,
    V: Clone + PartialOrd,
{
    top_k_by(map, count, rank_partial)
}

/// Total order over a `PartialOrd` type: values comparable with themselves
/// order as usual, the rest sort below all of them and tie among themselves.
///
/// The comparable values must be totally ordered among each other, which
/// holds for floats once `NaN` is set aside.
fn rank_partial<V: PartialOrd>(left: &V, right: &V) -> Ordering {
    let is_ordered = |value: &V| value.partial_cmp(value).is_some();
    match (is_ordered(left), is_ordered(right)) {
        (true, true) => left.partial_cmp(right).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => Ordering::Equal,
    }
}

/// Like [`top_k`], but ranks values with `compare`.
///
/// A value for which `compare` returns [`Ordering::Greater`] is ranked
/// before the other. The sort is stable, so ties keep ascending key order.
///
/// # Examples
///
/// ```rust
/// use avlmap::{AvlMap, top_k_by};
///
/// let map = AvlMap::from([(1, "kiwi"), (2, "fig"), (3, "banana")]);
/// // Shortest word first
/// let shortest = top_k_by(&map, 1, |left, right| right.len().cmp(&left.len()));
/// assert_eq!(shortest, vec![(2, "fig")]);
/// ```
#[must_use]
pub fn top_k_by<K, V, F>(map: &AvlMap<K, V>, count: usize, mut compare: F) -> Vec<(K, V)>
where
    K: Clone,
    V: Clone,
    F: FnMut(&V, &V) -> Ordering,
{
    let mut entries = map.to_vec();
    entries.sort_by(|(_, left), (_, right)| compare(right, left));
    entries.truncate(count);
    trace!(requested = count, selected = entries.len(), "selected top entries");
    entries
}
