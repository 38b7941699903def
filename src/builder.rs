//! Tree builder: flat records in, validated arena tree out.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::arena::Tree;
use crate::errors::{TreeError, TreeResult};
use crate::record::{NodeId, Record};

/// What to do with a record whose `parent_id` matches no known id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingPolicy {
    /// Fail the build with [`TreeError::DanglingParent`].
    #[default]
    Reject,
    /// Keep the node as an extra root. Its `parent_id` stays in the
    /// record and [`Tree::dangling`] reports it.
    TreatAsRoot,
}

/// Constructs hierarchical trees from flat record sets.
///
/// Construction is two-pass: every record becomes a node first (input
/// order preserved), then parent/child edges are resolved through the id
/// lookup. All validation happens here; the resulting [`Tree`] is
/// immutable and its queries cannot fail.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    dangling_policy: DanglingPolicy,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dangling_policy(mut self, policy: DanglingPolicy) -> Self {
        self.dangling_policy = policy;
        self
    }

    /// Build a tree from records, in input order.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DuplicateId`] when two records share an id
    /// - [`TreeError::DanglingParent`] when a `parent_id` matches no
    ///   record (under [`DanglingPolicy::Reject`])
    /// - [`TreeError::CycleDetected`] when a record is its own ancestor
    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn build(&self, records: Vec<Record>) -> TreeResult<Tree> {
        let mut tree = Tree::new();

        // First pass: create all nodes, edges stay empty
        let mut pending: Vec<(Index, NodeId, Option<NodeId>)> = Vec::with_capacity(records.len());
        for record in records {
            let (id, parent_id) = (record.id, record.parent_id);
            if tree.find(id).is_some() {
                return Err(TreeError::DuplicateId(id));
            }
            pending.push((tree.insert_node(record), id, parent_id));
        }

        // Second pass: resolve parent links through the id lookup
        for (idx, id, parent_id) in pending {
            match parent_id {
                None => tree.mark_root(idx),
                Some(pid) if pid == id => return Err(TreeError::CycleDetected(id)),
                Some(pid) => match tree.find(pid) {
                    Some(parent_idx) => tree.link(idx, parent_idx),
                    None => match self.dangling_policy {
                        DanglingPolicy::Reject => {
                            return Err(TreeError::DanglingParent {
                                child: id,
                                parent: pid,
                            })
                        }
                        DanglingPolicy::TreatAsRoot => tree.mark_root(idx),
                    },
                },
            }
        }

        ensure_acyclic(&tree)?;

        debug!(nodes = tree.len(), roots = tree.roots().len(), "tree built");
        Ok(tree)
    }
}

/// Walk every parent chain with a visited set; mutual cycles survive the
/// per-record checks above because each link is individually valid.
fn ensure_acyclic(tree: &Tree) -> TreeResult<()> {
    let mut seen: HashSet<Index> = HashSet::new();
    for (idx, node) in tree.iter() {
        seen.clear();
        seen.insert(idx);
        let mut cur = node.parent;
        while let Some(i) = cur {
            if !seen.insert(i) {
                return Err(TreeError::CycleDetected(node.data.id));
            }
            cur = tree.get_node(i).and_then(|n| n.parent);
        }
    }
    Ok(())
}
