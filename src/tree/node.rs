//! Tree nodes and the rotation/rebalance engine.
//!
//! Every function here takes a subtree by value and hands back the new
//! subtree root, so callers simply reassign the link they recursed into.
//! Heights are cached on each node and refreshed bottom-up: a rotation
//! recomputes the demoted node before the promoted one.

use tracing::trace;

/// An owned, possibly empty subtree.
pub(super) type Link<K, V> = Option<Box<Node<K, V>>>;

/// Internal node structure for the AVL tree.
///
/// Cloning a node clones its whole subtree, key and value first, then the
/// left and right children, along with the cached height.
#[derive(Clone)]
pub(super) struct Node<K, V> {
    pub(super) key: K,
    pub(super) value: V,
    pub(super) left: Link<K, V>,
    pub(super) right: Link<K, V>,
    pub(super) height: u32,
}

impl<K, V> Node<K, V> {
    /// Creates a node with no children.
    pub(super) const fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Recomputes the cached height from the children.
    pub(super) fn update_height(&mut self) {
        self.height = 1 + height(self.left.as_deref()).max(height(self.right.as_deref()));
    }

    /// `height(left) - height(right)`.
    pub(super) fn balance_factor(&self) -> i64 {
        i64::from(height(self.left.as_deref())) - i64::from(height(self.right.as_deref()))
    }

    /// Checks the balance and height-cache invariants of this node only.
    fn is_locally_balanced(&self) -> bool {
        let expected = 1 + height(self.left.as_deref()).max(height(self.right.as_deref()));
        self.height == expected && self.balance_factor().abs() <= 1
    }
}

/// Height of an optional subtree; 0 when empty.
pub(super) fn height<K, V>(node: Option<&Node<K, V>>) -> u32 {
    node.map_or(0, |node| node.height)
}

/// Rotates the subtree to the right around `node`.
///
/// The left child is promoted; its former right subtree becomes the left
/// subtree of `node`. Returns `node` untouched when it has no left child.
pub(super) fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// Rotates the subtree to the left around `node`.
///
/// Mirror of [`rotate_right`].
pub(super) fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// The rotation a node needs to restore balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotation {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl Rotation {
    const fn name(self) -> &'static str {
        match self {
            Self::LeftLeft => "ll",
            Self::LeftRight => "lr",
            Self::RightRight => "rr",
            Self::RightLeft => "rl",
        }
    }
}

impl<K, V> Node<K, V> {
    /// Classifies the imbalance at this node. The height must be current.
    fn required_rotation(&self) -> Option<Rotation> {
        let balance = self.balance_factor();
        if balance > 1 {
            let inner_heavy = self.left.as_ref().is_some_and(|left| left.balance_factor() < 0);
            Some(if inner_heavy { Rotation::LeftRight } else { Rotation::LeftLeft })
        } else if balance < -1 {
            let inner_heavy = self
                .right
                .as_ref()
                .is_some_and(|right| right.balance_factor() > 0);
            Some(if inner_heavy { Rotation::RightLeft } else { Rotation::RightRight })
        } else {
            None
        }
    }
}

/// Restores the balance invariant at `node` after a single insertion or
/// removal somewhere beneath it.
///
/// Both children must already be balanced subtrees. Handles the four
/// classic cases:
/// 1. Left-Left: one right rotation
/// 2. Right-Right: one left rotation
/// 3. Left-Right: left rotation of the left child, then right rotation
/// 4. Right-Left: right rotation of the right child, then left rotation
pub(super) fn rebalance<K, V>(node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    rebalance_reporting(node).0
}

/// [`rebalance`], keeping `trail` pointed at the same node it pointed at
/// before any rotation.
pub(super) fn rebalance_along<K, V>(
    node: Box<Node<K, V>>,
    trail: &mut Trail,
) -> Box<Node<K, V>> {
    let (node, rotation) = rebalance_reporting(node);
    match rotation {
        None => {}
        Some(Rotation::LeftLeft) => trail.promote(Side::Left),
        Some(Rotation::RightRight) => trail.promote(Side::Right),
        Some(Rotation::LeftRight) => {
            trail.promote_within(Side::Left, Side::Right);
            trail.promote(Side::Left);
        }
        Some(Rotation::RightLeft) => {
            trail.promote_within(Side::Right, Side::Left);
            trail.promote(Side::Right);
        }
    }
    node
}

fn rebalance_reporting<K, V>(mut node: Box<Node<K, V>>) -> (Box<Node<K, V>>, Option<Rotation>) {
    node.update_height();
    let Some(rotation) = node.required_rotation() else {
        return (node, None);
    };
    let balance = node.balance_factor();
    trace!(case = rotation.name(), "rebalancing");

    let rebalanced = match rotation {
        Rotation::LeftLeft => rotate_right(node),
        Rotation::LeftRight => {
            node.left = node.left.take().map(rotate_left);
            rotate_right(node)
        }
        Rotation::RightRight => rotate_left(node),
        Rotation::RightLeft => {
            node.right = node.right.take().map(rotate_right);
            rotate_left(node)
        }
    };

    debug_assert!(
        rebalanced.is_locally_balanced(),
        "rotation left a node with balance factor {} (was {balance})",
        rebalanced.balance_factor()
    );
    (rebalanced, Some(rotation))
}

// =============================================================================
// Trails
// =============================================================================

/// Child direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Side {
    Left,
    Right,
}

impl Side {
    const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Route from a subtree root down to one of its nodes.
///
/// Steps are stored deepest first, so the step taken from the root is the
/// last element.
#[derive(Debug, Default)]
pub(super) struct Trail {
    steps: Vec<Side>,
}

impl Trail {
    /// Extends the route upward: the new root reaches the old one via `side`.
    pub(super) fn push_front(&mut self, side: Side) {
        self.steps.push(side);
    }

    fn pop_front(&mut self) -> Option<Side> {
        self.steps.pop()
    }

    pub(super) const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Rewrites the route for a rotation that promotes the child on
    /// `pivot` into the root position.
    ///
    /// For a right rotation (`pivot == Left`) the subtree `N(P(a, b), c)`
    /// becomes `P(a, N(b, c))`.
    fn promote(&mut self, pivot: Side) {
        let other = pivot.opposite();
        match self.pop_front() {
            None => self.push_front(other),
            Some(step) if step == pivot => match self.pop_front() {
                None => {}
                Some(next) if next == pivot => self.push_front(pivot),
                Some(_) => {
                    self.push_front(pivot);
                    self.push_front(other);
                }
            },
            Some(_) => {
                self.push_front(other);
                self.push_front(other);
            }
        }
    }

    /// Applies [`promote`](Self::promote) to the child on `side`, if the
    /// route goes through it.
    fn promote_within(&mut self, side: Side, pivot: Side) {
        if self.steps.last() == Some(&side) {
            self.pop_front();
            self.promote(pivot);
            self.push_front(side);
        }
    }
}

/// Follows `trail` from `node` and returns the value where it ends.
///
/// Stops at the last node reached if the route runs off the tree; routes
/// produced alongside [`rebalance_along`] never do.
pub(super) fn value_along<'a, K, V>(node: &'a mut Node<K, V>, trail: &mut Trail) -> &'a mut V {
    let child = match trail.pop_front() {
        Some(Side::Left) => node.left.as_deref_mut(),
        Some(Side::Right) => node.right.as_deref_mut(),
        None => None,
    };
    match child {
        Some(child) => value_along(child, trail),
        None => &mut node.value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn chain_left() -> Box<Node<i32, ()>> {
        // 3 -> 2 -> 1 down the left spine
        let mut one = Box::new(Node::leaf(1, ()));
        one.update_height();
        let mut two = Box::new(Node::leaf(2, ()));
        two.left = Some(one);
        two.update_height();
        let mut three = Box::new(Node::leaf(3, ()));
        three.left = Some(two);
        three.update_height();
        three
    }

    fn in_order(node: Option<&Node<i32, ()>>, keys: &mut Vec<i32>) {
        if let Some(node) = node {
            in_order(node.left.as_deref(), keys);
            keys.push(node.key);
            in_order(node.right.as_deref(), keys);
        }
    }

    #[rstest]
    fn test_height_of_empty_subtree_is_zero() {
        assert_eq!(height::<i32, ()>(None), 0);
    }

    #[rstest]
    fn test_leaf_has_height_one() {
        let leaf = Node::leaf(7, "seven");
        assert_eq!(leaf.height, 1);
        assert_eq!(leaf.balance_factor(), 0);
    }

    #[rstest]
    fn test_rotate_right_promotes_left_child() {
        let root = rotate_right(chain_left());

        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.left.as_ref().map(|node| node.key), Some(1));
        assert_eq!(root.right.as_ref().map(|node| node.key), Some(3));
        assert_eq!(root.right.as_ref().map(|node| node.height), Some(1));
    }

    #[rstest]
    fn test_rotate_left_is_inverse_of_rotate_right() {
        let rotated = rotate_left(rotate_right(chain_left()));
        assert_eq!(rotated.key, 3);
        assert_eq!(rotated.left.as_ref().map(|node| node.key), Some(2));
    }

    #[rstest]
    fn test_rotate_without_pivot_is_identity() {
        let leaf = Box::new(Node::leaf(5, ()));
        let leaf = rotate_right(leaf);
        let leaf = rotate_left(leaf);
        assert_eq!(leaf.key, 5);
        assert_eq!(leaf.height, 1);
    }

    #[rstest]
    fn test_rebalance_left_left() {
        let root = rebalance(chain_left());
        let mut keys = Vec::new();
        in_order(Some(&root), &mut keys);

        assert_eq!(root.key, 2);
        assert_eq!(keys, vec![1, 2, 3]);
        assert!(root.is_locally_balanced());
    }

    #[rstest]
    fn test_rebalance_left_right() {
        // 30 with left child 10 whose right child is 20
        let mut ten = Box::new(Node::leaf(10, ()));
        ten.right = Some(Box::new(Node::leaf(20, ())));
        ten.update_height();
        let mut thirty = Box::new(Node::leaf(30, ()));
        thirty.left = Some(ten);

        let root = rebalance(thirty);
        assert_eq!(root.key, 20);
        assert_eq!(root.left.as_ref().map(|node| node.key), Some(10));
        assert_eq!(root.right.as_ref().map(|node| node.key), Some(30));
        assert_eq!(root.height, 2);
    }

    #[rstest]
    fn test_rebalance_right_left() {
        // 10 with right child 30 whose left child is 20
        let mut thirty = Box::new(Node::leaf(30, ()));
        thirty.left = Some(Box::new(Node::leaf(20, ())));
        thirty.update_height();
        let mut ten = Box::new(Node::leaf(10, ()));
        ten.right = Some(thirty);

        let root = rebalance(ten);
        assert_eq!(root.key, 20);
        assert_eq!(root.left.as_ref().map(|node| node.key), Some(10));
        assert_eq!(root.right.as_ref().map(|node| node.key), Some(30));
    }

    #[rstest]
    fn test_rebalance_leaves_balanced_node_alone() {
        let mut two = Box::new(Node::leaf(2, ()));
        two.left = Some(Box::new(Node::leaf(1, ())));
        two.right = Some(Box::new(Node::leaf(3, ())));
        two.height = 99;

        let root = rebalance(two);
        assert_eq!(root.key, 2);
        assert_eq!(root.height, 2);
    }

    // =========================================================================
    // Trail Tests
    // =========================================================================

    /// Builds a subtree from `(key, left, right)` shapes; values equal keys.
    fn shaped(key: i32, left: Link<i32, i32>, right: Link<i32, i32>) -> Box<Node<i32, i32>> {
        let mut node = Box::new(Node::leaf(key, key));
        node.left = left;
        node.right = right;
        node.update_height();
        node
    }

    fn leaf(key: i32) -> Link<i32, i32> {
        Some(Box::new(Node::leaf(key, key)))
    }

    fn trail_from_root(steps: &[Side]) -> Trail {
        let mut trail = Trail::default();
        for &side in steps.iter().rev() {
            trail.push_front(side);
        }
        trail
    }

    #[rstest]
    // 30(20(10)) rotates right around 30
    #[case::left_left_target_leaf(30, Some((20, Some(10), None)), None, &[Side::Left, Side::Left], 10)]
    #[case::left_left_target_root(30, Some((20, Some(10), None)), None, &[], 30)]
    #[case::left_left_target_pivot(30, Some((20, Some(10), None)), None, &[Side::Left], 20)]
    // 30(10(_, 20)) needs a double rotation that promotes 20
    #[case::left_right_target_promoted(30, Some((10, None, Some(20))), None, &[Side::Left, Side::Right], 20)]
    #[case::left_right_target_root(30, Some((10, None, Some(20))), None, &[], 30)]
    #[case::left_right_target_child(30, Some((10, None, Some(20))), None, &[Side::Left], 10)]
    // 10(_, 30(20)) mirrors it
    #[case::right_left_target_promoted(10, None, Some((30, Some(20), None)), &[Side::Right, Side::Left], 20)]
    #[case::right_right_target_leaf(10, None, Some((20, None, Some(30))), &[Side::Right, Side::Right], 30)]
    fn test_trail_survives_rebalance(
        #[case] root: i32,
        #[case] left: Option<(i32, Option<i32>, Option<i32>)>,
        #[case] right: Option<(i32, Option<i32>, Option<i32>)>,
        #[case] steps: &[Side],
        #[case] expected: i32,
    ) {
        let child = |shape: Option<(i32, Option<i32>, Option<i32>)>| {
            shape.map(|(key, left, right)| {
                shaped(key, left.and_then(leaf), right.and_then(leaf))
            })
        };
        let mut node = Box::new(Node::leaf(root, root));
        node.left = child(left);
        node.right = child(right);

        let mut trail = trail_from_root(steps);
        let mut rebalanced = rebalance_along(node, &mut trail);

        assert!(rebalanced.is_locally_balanced());
        assert_eq!(*value_along(&mut *rebalanced, &mut trail), expected);
        assert!(trail.is_empty());
    }

    #[rstest]
    fn test_trail_below_rotation_is_rewritten() {
        // 40(20(5(3, 10), 30), 50) is left-left heavy at 40
        let five = shaped(5, leaf(3), leaf(10));
        let twenty = shaped(20, Some(five), leaf(30));
        let forty = shaped(40, Some(twenty), leaf(50));

        // 30 sits at left, right and moves under the demoted 40
        let mut trail = trail_from_root(&[Side::Left, Side::Right]);
        let mut rebalanced = rebalance_along(forty, &mut trail);

        assert_eq!(rebalanced.key, 20);
        assert_eq!(*value_along(&mut *rebalanced, &mut trail), 30);
        assert_eq!(
            rebalanced.right.as_ref().and_then(|node| node.left.as_ref()).map(|node| node.key),
            Some(30)
        );
    }

    #[rstest]
    fn test_value_along_empty_trail_is_root() {
        let mut root = shaped(2, leaf(1), leaf(3));
        let mut trail = Trail::default();
        *value_along(&mut *root, &mut trail) += 40;
        assert_eq!(root.value, 42);
    }
}
