//! Arena-based category trees built from flat records.
//!
//! A record set is an ordered sequence of `{id, title, parent_id}`
//! entries; [`TreeBuilder`] turns it into an immutable [`Tree`] whose
//! parent/children edges are arena indices, never owning handles.
//! Construction validates duplicate ids, dangling parent references and
//! parent-chain cycles up front, so every query on a built tree is
//! infallible.

pub mod arena;
pub mod builder;
pub mod errors;
pub mod record;
pub mod tree_traits;
pub mod util;

pub use arena::{Descendants, Node, NodeIter, PostOrderIterator, Tree};
pub use builder::{DanglingPolicy, TreeBuilder};
pub use errors::{TreeError, TreeResult};
pub use generational_arena::Index;
pub use record::{NodeId, Record};
