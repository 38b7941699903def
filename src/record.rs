//! Flat input records: one per node, parent links by id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique node identifier within a record set.
pub type NodeId = u64;

/// Flat description of a single node.
///
/// A record set is an ordered sequence of these; `parent_id` refers to
/// another record's `id`, or is `None` for a root. Missing `parent_id`
/// fields deserialize as `None`, so roots need no explicit null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: NodeId,
    pub title: String,
    pub parent_id: Option<NodeId>,
}

impl Record {
    pub fn new(id: NodeId, title: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id,
            title: title.into(),
            parent_id,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
