//! Keyframe merge engine: folds a vendor-prefixed `@keyframes` block into
//! the unprefixed base block of the same name, frame by frame.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::ast::{Ast, NodeId, NodeKind};

use super::Cleaner;

impl Cleaner {
    pub(crate) fn process_keyframes(
        &mut self,
        ast: &mut Ast,
        id: NodeId,
        container: Option<NodeId>,
    ) {
        let (name, vendor) = match &ast.node(id).kind {
            NodeKind::Keyframes { name, vendor, .. } => (name.clone(), vendor.clone()),
            _ => return,
        };
        if vendor.is_none() {
            self.process_children(ast, id);
            return;
        }
        let Some(owner) = container else { return };

        match self.base_keyframes_for_name(ast, owner, &name) {
            None => {
                // no unprefixed sibling: this block becomes the base
                debug!(name = %name, "promoting vendor keyframes to base");
                if let NodeKind::Keyframes { vendor, .. } = &mut ast.node_mut(id).kind {
                    *vendor = None;
                }
                self.process_children(ast, id);
            }
            Some(base) => {
                debug!(name = %name, "merging vendor keyframes into base");
                self.flag_for_removal(id, owner);
                let frames: Vec<NodeId> = ast.children(id).map(<[_]>::to_vec).unwrap_or_default();
                for frame in frames {
                    if !matches!(ast.node(frame).kind, NodeKind::Keyframe { .. }) {
                        continue;
                    }
                    match self.find_matching_keyframe(ast, base, frame) {
                        Some(dst) => self.merge_frame_declarations(ast, frame, dst),
                        None => {
                            // no overlapping group in the base: relocate
                            // the whole frame and walk it there
                            ast.push_child(base, frame);
                            self.process_node(ast, frame, Some(base));
                        }
                    }
                }
            }
        }
    }

    fn merge_frame_declarations(&mut self, ast: &mut Ast, frame: NodeId, dst: NodeId) {
        let decls: Vec<NodeId> = ast.children(frame).map(<[_]>::to_vec).unwrap_or_default();
        for decl in decls {
            if ast.declaration(decl).is_none() {
                continue;
            }
            if !self.merge_declaration_into(ast, decl, dst, false) {
                self.flag_for_removal(decl, frame);
            }
        }
    }

    /// The unprefixed `@keyframes` block named `name` in `owner`'s
    /// container, memoized per container per name.
    fn base_keyframes_for_name(&mut self, ast: &Ast, owner: NodeId, name: &str) -> Option<NodeId> {
        if let Some(hit) = self.state.cached_base_keyframes(owner, name) {
            return Some(hit);
        }
        for &id in ast.children(owner)? {
            if let NodeKind::Keyframes {
                name: candidate,
                vendor: None,
                ..
            } = &ast.node(id).kind
            {
                if candidate == name {
                    self.state.cache_base_keyframes(owner, name, id);
                    return Some(id);
                }
            }
        }
        None
    }

    /// First frame in `base` whose normalized selector set contains every
    /// normalized selector of `frame`.
    fn find_matching_keyframe(&self, ast: &Ast, base: NodeId, frame: NodeId) -> Option<NodeId> {
        let to_match = match &ast.node(frame).kind {
            NodeKind::Keyframe { selectors, .. } => normalize_frame_selectors(selectors),
            _ => return None,
        };
        for &candidate in ast.children(base)? {
            let got = match &ast.node(candidate).kind {
                NodeKind::Keyframe { selectors, .. } => normalize_frame_selectors(selectors),
                _ => continue,
            };
            if to_match.iter().all(|s| got.contains(s)) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Selector set for matching only: duplicates dropped, `from` and `to`
/// mapped to their percentage forms. Never used for rewriting.
fn normalize_frame_selectors(selectors: &[String]) -> FxHashSet<String> {
    selectors
        .iter()
        .map(|s| match s.trim() {
            "from" => "0%".to_string(),
            "to" => "100%".to_string(),
            other => other.to_string(),
        })
        .collect()
}
