use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::arena::Tree;

pub trait TreeNodeConvert {
    fn to_tree_string(&self, root: Index) -> TermTree<String>;
}

impl TreeNodeConvert for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: Index) -> TermTree<String> {
        let label = self
            .get_node(root)
            .map(|n| n.data.title.clone())
            .unwrap_or_else(|| "Empty tree".to_string());
        let mut tree = TermTree::new(label);
        build_tree_representation(self, root, &mut tree);
        tree
    }
}

/// Recursively append the children of `node_idx` to `parent_tree`.
pub fn build_tree_representation(tree: &Tree, node_idx: Index, parent_tree: &mut TermTree<String>) {
    if let Some(node) = tree.get_node(node_idx) {
        for &child_idx in &node.children {
            if let Some(child) = tree.get_node(child_idx) {
                let mut child_tree = TermTree::new(child.data.title.clone());
                build_tree_representation(tree, child_idx, &mut child_tree);
                parent_tree.push(child_tree);
            }
        }
    }
}

/// Single-line lineage label, node first: `"leaf <- parent <- root"`.
pub fn breadcrumb(tree: &Tree, idx: Index) -> String {
    std::iter::once(idx)
        .chain(tree.ancestors(idx).into_iter().rev())
        .filter_map(|i| tree.get_node(i))
        .map(|n| n.data.title.as_str())
        .join(" <- ")
}
