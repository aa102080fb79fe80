//! Run-scoped bookkeeping: deletion flags, the removal registry, and the
//! deferred compaction pass.
//!
//! Nodes are only marked during the walk; containers are spliced in one
//! final pass so sibling indices stay stable while merge logic runs.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::ast::{Ast, NodeId};

use super::Cleaner;

/// Per-run mutable state, reset at the start of every cleaning run.
#[derive(Debug, Default)]
pub(crate) struct RunState {
    /// Nodes determined redundant; never visited or matched again.
    deleted: FxHashSet<NodeId>,
    /// Container owner -> node ids pending removal from that container.
    flagged: FxHashMap<NodeId, FxHashSet<NodeId>>,
    /// Containers whose declaration values were already devendorized.
    flattened: FxHashSet<NodeId>,
    /// Per container: keyframes name -> unprefixed base block found there.
    base_keyframes: FxHashMap<NodeId, FxHashMap<String, NodeId>>,
}

impl RunState {
    pub(crate) fn reset(&mut self) {
        self.deleted.clear();
        self.flagged.clear();
        self.flattened.clear();
        self.base_keyframes.clear();
    }

    pub(crate) fn is_deleted(&self, id: NodeId) -> bool {
        self.deleted.contains(&id)
    }

    /// Mark `node` deleted and record it against `container`. A node is
    /// registered in at most one container: the one it sat in when first
    /// flagged.
    pub(crate) fn flag(&mut self, node: NodeId, container: NodeId) {
        if !self.deleted.insert(node) {
            return;
        }
        self.flagged.entry(container).or_default().insert(node);
    }

    /// Mark a container as flattened; returns false when it already was.
    pub(crate) fn mark_flattened(&mut self, container: NodeId) -> bool {
        self.flattened.insert(container)
    }

    pub(crate) fn cached_base_keyframes(&self, container: NodeId, name: &str) -> Option<NodeId> {
        self.base_keyframes.get(&container)?.get(name).copied()
    }

    pub(crate) fn cache_base_keyframes(&mut self, container: NodeId, name: &str, base: NodeId) {
        self.base_keyframes
            .entry(container)
            .or_default()
            .insert(name.to_string(), base);
    }

    pub(crate) fn take_flagged(&mut self) -> FxHashMap<NodeId, FxHashSet<NodeId>> {
        std::mem::take(&mut self.flagged)
    }
}

impl Cleaner {
    pub(crate) fn flag_for_removal(&mut self, node: NodeId, container: NodeId) {
        trace!(
            node = node.index(),
            container = container.index(),
            "flagged for removal"
        );
        self.state.flag(node, container);
    }

    /// Physically remove every flagged node from its recorded container.
    /// Containers are scanned end to start so removals do not shift the
    /// indices still to be visited.
    pub(crate) fn remove_flagged(&mut self, ast: &mut Ast) {
        let flagged = self.state.take_flagged();
        let containers = flagged.len();
        let mut removed = 0usize;
        for (owner, pending) in flagged {
            let Some(children) = ast.children_mut(owner) else {
                continue;
            };
            let mut i = children.len();
            while i > 0 {
                i -= 1;
                if pending.contains(&children[i]) {
                    children.remove(i);
                    removed += 1;
                }
            }
        }
        debug!(containers, removed, "compacted flagged containers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> NodeId {
        NodeId(raw)
    }

    #[test]
    fn test_flag_is_idempotent_and_sticks_to_first_container() {
        let mut state = RunState::default();
        state.flag(id(5), id(1));
        state.flag(id(5), id(2)); // already deleted: ignored

        assert!(state.is_deleted(id(5)));
        let flagged = state.take_flagged();
        assert_eq!(flagged.len(), 1);
        assert!(flagged[&id(1)].contains(&id(5)));
    }

    #[test]
    fn test_mark_flattened_once() {
        let mut state = RunState::default();
        assert!(state.mark_flattened(id(3)));
        assert!(!state.mark_flattened(id(3)));
        state.reset();
        assert!(state.mark_flattened(id(3)));
    }

    #[test]
    fn test_base_keyframes_cache() {
        let mut state = RunState::default();
        assert!(state.cached_base_keyframes(id(1), "spin").is_none());
        state.cache_base_keyframes(id(1), "spin", id(9));
        assert_eq!(state.cached_base_keyframes(id(1), "spin"), Some(id(9)));
        assert!(state.cached_base_keyframes(id(2), "spin").is_none());
    }
}
