//! Indented, sideways rendering of the tree for debugging.

use std::fmt;

use super::node::Node;

/// Width of one indentation level.
const INDENT: usize = 4;

/// Diagnostic view of an [`AvlMap`](super::AvlMap)'s shape.
///
/// Created by [`AvlMap::dump`](super::AvlMap::dump). Its `Display` output
/// lists the right subtree, then the node, then the left subtree, each line
/// indented by the node's depth.
pub struct TreeDump<'a, K, V> {
    root: Option<&'a Node<K, V>>,
}

impl<'a, K, V> TreeDump<'a, K, V> {
    pub(super) const fn new(root: Option<&'a Node<K, V>>) -> Self {
        Self { root }
    }
}

fn write_subtree<K: fmt::Display, V: fmt::Display>(
    formatter: &mut fmt::Formatter<'_>,
    node: Option<&Node<K, V>>,
    depth: usize,
) -> fmt::Result {
    let Some(node) = node else {
        return Ok(());
    };
    write_subtree(formatter, node.right.as_deref(), depth + 1)?;
    writeln!(
        formatter,
        "{:indent$}{} : {}",
        "",
        node.key,
        node.value,
        indent = depth * INDENT
    )?;
    write_subtree(formatter, node.left.as_deref(), depth + 1)
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TreeDump<'_, K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_subtree(formatter, self.root, 0)
    }
}
