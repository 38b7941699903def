use thiserror::Error;

use crate::record::NodeId;

/// Errors reported while building a tree from flat records.
///
/// Queries on a constructed [`Tree`](crate::arena::Tree) cannot fail:
/// construction validates everything up front.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("dangling parent reference: node {child} points to missing parent {parent}")]
    DanglingParent { child: NodeId, parent: NodeId },

    #[error("cycle detected in parent chain of node: {0}")]
    CycleDetected(NodeId),
}

pub type TreeResult<T> = Result<T, TreeError>;
