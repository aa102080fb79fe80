//! Arena-indexed stylesheet AST
//!
//! Nodes live in a single [`Ast`] arena and refer to each other through
//! small copyable [`NodeId`] handles. A node id doubles as the node's
//! stable identity for the whole cleaning run: ids are assigned
//! monotonically at allocation and never reused, so they can key external
//! bookkeeping maps without touching the nodes themselves.
//!
//! Every node owns at most one child list (its "container"); container
//! identity is therefore the owning node's id.

mod types;

pub use types::{Ast, Kind, Node, NodeKind};

use serde::{Deserialize, Serialize};

/// Handle to a node inside an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Get the raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
