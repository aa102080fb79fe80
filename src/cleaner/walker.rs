//! Node dispatch: one closed match over node kinds, with unknown kinds
//! falling through to a skip arm.

use crate::ast::{Ast, Kind, NodeId, NodeKind};
use crate::vendor::devendorize;

use super::Cleaner;

impl Cleaner {
    /// Dispatch a single node. Deleted nodes are skipped entirely: never
    /// recursed into, never re-merged.
    pub(crate) fn process_node(&mut self, ast: &mut Ast, id: NodeId, container: Option<NodeId>) {
        if self.state.is_deleted(id) {
            return;
        }
        match ast.node(id).kind.kind() {
            Kind::Stylesheet | Kind::Media => self.process_children(ast, id),
            Kind::Rule | Kind::Keyframe => {
                self.flatten_declaration_values(ast, id);
                self.process_children(ast, id);
            }
            Kind::Keyframes => self.process_keyframes(ast, id, container),
            Kind::Declaration => {
                if let Some(owner) = container {
                    self.process_declaration(ast, id, owner);
                }
            }
            // comments, carried-through at-rules, future kinds
            _ => {}
        }
    }

    /// Visit `owner`'s container by index. Nodes are only flagged during
    /// the walk, never spliced, so the container length is stable here.
    pub(crate) fn process_children(&mut self, ast: &mut Ast, owner: NodeId) {
        let mut i = 0;
        loop {
            let child = match ast.children(owner).and_then(|c| c.get(i)) {
                Some(&child) => child,
                None => break,
            };
            self.process_node(ast, child, Some(owner));
            i += 1;
        }
    }

    /// Devendorize a declaration's property. When the unprefixed form is
    /// already declared by a live sibling, that sibling governs and this
    /// declaration is flagged instead.
    fn process_declaration(&mut self, ast: &mut Ast, id: NodeId, owner: NodeId) {
        let property = match ast.declaration(id) {
            Some((property, _)) => property.to_string(),
            None => return,
        };
        let base = devendorize(&property);
        if base == property.as_str() {
            return;
        }
        if self
            .find_declaration_by_property(ast, owner, &base, None)
            .is_some()
        {
            self.flag_for_removal(id, owner);
        } else if let NodeKind::Declaration { property, .. } = &mut ast.node_mut(id).kind {
            *property = base.into_owned();
        }
    }
}
