use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::errors::TreeResult;
use crate::record::{NodeId, Record};

/// Tree node in the arena-based hierarchy structure.
///
/// Links are arena indices, never owning handles: the tree owns every
/// node exactly once, `parent` and `children` are back-references into
/// that same storage.
#[derive(Debug)]
pub struct Node {
    /// Flat record this node was built from
    pub data: Record,
    /// Index of the parent node, None for roots (and for nodes kept
    /// despite a dangling parent reference)
    pub parent: Option<Index>,
    /// Indices of child nodes, in input order
    pub children: Vec<Index>,
}

/// Arena-based tree built from flat records.
///
/// Owns all nodes; the edge structure is immutable after construction.
/// Build one with [`Tree::from_records`] or a configured
/// [`TreeBuilder`](crate::builder::TreeBuilder). The structure is a
/// forest: record sets may contain several roots.
#[derive(Debug, Default)]
pub struct Tree {
    /// Arena storage for all nodes
    arena: Arena<Node>,
    /// Node indices in insertion order
    order: Vec<Index>,
    /// Root indices in insertion order
    roots: Vec<Index>,
    /// Lookup from record id to arena index
    index_by_id: HashMap<NodeId, Index>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree with the default (strict) builder.
    pub fn from_records(records: Vec<Record>) -> TreeResult<Self> {
        crate::builder::TreeBuilder::new().build(records)
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: Record) -> Index {
        let id = data.id;
        let idx = self.arena.insert(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.order.push(idx);
        self.index_by_id.insert(id, idx);
        idx
    }

    /// Wire a parent/child edge. Caller guarantees `child != parent`.
    pub(crate) fn link(&mut self, child: Index, parent: Index) {
        if let (Some(c), Some(p)) = self.arena.get2_mut(child, parent) {
            c.parent = Some(parent);
            p.children.push(child);
        }
    }

    pub(crate) fn mark_root(&mut self, idx: Index) {
        self.roots.push(idx);
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&Node> {
        self.arena.get(idx)
    }

    /// Arena index for a record id, O(1).
    pub fn find(&self, id: NodeId) -> Option<Index> {
        self.index_by_id.get(&id).copied()
    }

    /// First node (in insertion order) whose record matches the predicate.
    pub fn find_by<F>(&self, mut f: F) -> Option<Index>
    where
        F: FnMut(&Record) -> bool,
    {
        self.order
            .iter()
            .copied()
            .find(|&idx| self.arena.get(idx).is_some_and(|n| f(&n.data)))
    }

    /// Root indices, in input order.
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// All nodes in insertion order.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter {
            tree: self,
            pos: 0,
        }
    }

    /// Direct children of a node, in input order.
    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent chain of a node, root first, excluding the node itself.
    ///
    /// The length equals the node's depth below its root.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut chain = Vec::new();
        let mut cur = self.arena.get(idx).and_then(|n| n.parent);
        while let Some(i) = cur {
            chain.push(i);
            cur = self.arena.get(i).and_then(|n| n.parent);
        }
        chain.reverse();
        chain
    }

    /// Top-most ancestor of a node.
    ///
    /// Defined as the first element of [`ancestors`](Self::ancestors),
    /// so a node that is itself a root reports `None`, not itself.
    pub fn root_of(&self, idx: Index) -> Option<Index> {
        self.ancestors(idx).first().copied()
    }

    /// All nodes reachable via `children`, excluding the start.
    ///
    /// Depth-first, but callers must treat the order as unspecified; the
    /// set is complete, each node appears exactly once, and the iterator
    /// is restartable (a fresh call yields the same set).
    #[instrument(level = "trace", skip(self))]
    pub fn descendants(&self, idx: Index) -> Descendants<'_> {
        Descendants::new(self, idx)
    }

    /// Subtree of `start`, leaves first, the start itself last.
    #[instrument(level = "trace", skip(self))]
    pub fn postorder(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }

    /// Height of the forest: longest root-to-leaf chain, in nodes.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&r| self.subtree_depth(r))
            .max()
            .unwrap_or(0)
    }

    /// Height of the subtree rooted at `idx`, in nodes.
    pub fn subtree_depth(&self, idx: Index) -> usize {
        match self.arena.get(idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.subtree_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Collects all leaf nodes (nodes with no children), forest-wide.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        let mut leaves = Vec::new();
        for &root in &self.roots {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, idx: Index, leaves: &mut Vec<Index>) {
        if let Some(node) = self.arena.get(idx) {
            if node.children.is_empty() {
                leaves.push(idx);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// One leaf-to-root path per leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self) -> Vec<Vec<Index>> {
        self.leaf_nodes()
            .into_iter()
            .map(|leaf| {
                let mut branch = self.ancestors(leaf);
                branch.push(leaf);
                branch.reverse();
                branch
            })
            .collect()
    }

    /// Nodes whose record names a parent that was never linked.
    ///
    /// Empty for strictly built trees; under
    /// [`DanglingPolicy::TreatAsRoot`](crate::builder::DanglingPolicy)
    /// this surfaces the kept inconsistencies.
    pub fn dangling(&self) -> Vec<Index> {
        self.order
            .iter()
            .copied()
            .filter(|&idx| {
                self.arena
                    .get(idx)
                    .is_some_and(|n| n.data.parent_id.is_some() && n.parent.is_none())
            })
            .collect()
    }
}

pub struct NodeIter<'a> {
    tree: &'a Tree,
    pos: usize,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = (Index, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.tree.order.len() {
            let idx = self.tree.order[self.pos];
            self.pos += 1;
            if let Some(node) = self.tree.arena.get(idx) {
                return Some((idx, node));
            }
        }
        None
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<Index>,
}

impl<'a> Descendants<'a> {
    fn new(tree: &'a Tree, start: Index) -> Self {
        // Seed with the start's children in reverse for left-to-right
        // traversal; the start itself is excluded.
        let mut stack = Vec::new();
        for &child in tree.children(start).iter().rev() {
            stack.push(child);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (Index, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a Tree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a Tree, start: Index) -> Self {
        Self {
            tree,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn tiny_tree() -> Tree {
        // root
        // ├── child1
        // │   └── grandchild1
        // └── child2
        let mut tree = Tree::new();
        let root = tree.insert_node(Record::new(1, "root", None));
        let child1 = tree.insert_node(Record::new(2, "child1", Some(1)));
        let child2 = tree.insert_node(Record::new(3, "child2", Some(1)));
        let grandchild1 = tree.insert_node(Record::new(4, "grandchild1", Some(2)));
        tree.mark_root(root);
        tree.link(child1, root);
        tree.link(child2, root);
        tree.link(grandchild1, child1);
        tree
    }

    #[test]
    fn test_insertion_order_iteration() {
        let tree = tiny_tree();
        let ids: Vec<_> = tree.iter().map(|(_, n)| n.data.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_link_populates_both_directions() {
        let tree = tiny_tree();
        let root = tree.find(1).unwrap();
        let child1 = tree.find(2).unwrap();
        assert_eq!(tree.children(root), &[child1, tree.find(3).unwrap()]);
        assert_eq!(tree.get_node(child1).unwrap().parent, Some(root));
    }

    #[test]
    fn test_descendants_excludes_start() {
        let tree = tiny_tree();
        let root = tree.find(1).unwrap();
        let ids: Vec<_> = tree.descendants(root).map(|(_, n)| n.data.id).collect();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn test_postorder_visits_leaves_first() {
        let tree = tiny_tree();
        let root = tree.find(1).unwrap();
        let ids: Vec<_> = tree.postorder(root).map(|(_, n)| n.data.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_depth_counts_nodes_on_longest_chain() {
        let tree = tiny_tree();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.subtree_depth(tree.find(2).unwrap()), 2);
    }
}
