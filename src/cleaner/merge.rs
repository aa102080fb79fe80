//! Declaration merge engine: container value flattening, override-aware
//! property lookup, and the move/drop decision for a declaration entering
//! a new sibling set.

use crate::ast::{Ast, NodeId, NodeKind};
use crate::compare::values_equivalent;
use crate::vendor::devendorize;

use super::Cleaner;

impl Cleaner {
    /// First live declaration in `owner`'s container with `property`.
    /// Earliest match governs, per source-order override semantics;
    /// deleted nodes and non-declarations are invisible.
    pub(crate) fn find_declaration_by_property(
        &self,
        ast: &Ast,
        owner: NodeId,
        property: &str,
        exclude: Option<NodeId>,
    ) -> Option<NodeId> {
        for &id in ast.children(owner)? {
            if Some(id) == exclude || self.state.is_deleted(id) {
                continue;
            }
            if let Some((p, _)) = ast.declaration(id) {
                if p == property {
                    return Some(id);
                }
            }
        }
        None
    }

    /// Devendorize every declaration value in `owner`'s container, in
    /// place. Runs at most once per container per run. A declaration whose
    /// devendorized value duplicates a live sibling of the same property
    /// is flagged instead of rewritten.
    pub(crate) fn flatten_declaration_values(&mut self, ast: &mut Ast, owner: NodeId) {
        if !self.state.mark_flattened(owner) {
            return;
        }
        let ids: Vec<NodeId> = match ast.children(owner) {
            Some(children) => children.to_vec(),
            None => return,
        };
        for &id in ids.iter().rev() {
            if self.state.is_deleted(id) {
                continue;
            }
            let (property, value) = match ast.declaration(id) {
                Some((p, v)) => (p.to_string(), v.to_string()),
                None => continue,
            };
            let devendored = devendorize(&value);
            if devendored == value {
                continue;
            }
            let duplicate = self
                .find_declaration_by_property(ast, owner, &property, Some(id))
                .is_some_and(|other| match ast.declaration(other) {
                    Some((_, other_value)) => values_equivalent(&devendored, other_value),
                    None => false,
                });
            if duplicate {
                self.flag_for_removal(id, owner);
            } else if let NodeKind::Declaration { value, .. } = &mut ast.node_mut(id).kind {
                *value = devendored.into_owned();
            }
        }
    }

    /// Decide whether `decl` moves into `dst_owner`'s declaration set.
    ///
    /// Non-append mode moves only when no live declaration with the
    /// unprefixed property exists in the destination. Append mode also
    /// moves when one exists but with a non-equivalent value. On a move
    /// the property and value are rewritten to their unprefixed forms and
    /// the node is appended (parent updated); returns whether it moved.
    /// The value rewrite cannot be left to the destination's flattening
    /// pass, which has usually already run by the time a merge happens.
    ///
    /// Every current caller passes `append = false`; the append path is
    /// kept for contextual-append refinement.
    pub(crate) fn merge_declaration_into(
        &mut self,
        ast: &mut Ast,
        decl: NodeId,
        dst_owner: NodeId,
        append: bool,
    ) -> bool {
        self.flatten_declaration_values(ast, dst_owner);

        let (name, value) = match ast.declaration(decl) {
            Some((p, v)) => (p.to_string(), v.to_string()),
            None => return false,
        };
        let base = devendorize(&name).into_owned();

        let moved = if append {
            let redundant = [name.as_str(), base.as_str()].iter().any(|lookup| {
                self.find_declaration_by_property(ast, dst_owner, lookup, None)
                    .is_some_and(|existing| match ast.declaration(existing) {
                        Some((_, existing_value)) => values_equivalent(existing_value, &value),
                        None => false,
                    })
            });
            !redundant
        } else {
            self.find_declaration_by_property(ast, dst_owner, &base, None)
                .is_none()
        };

        if moved {
            let devendored_value = devendorize(&value).into_owned();
            if let NodeKind::Declaration { property, value } = &mut ast.node_mut(decl).kind {
                *property = base;
                *value = devendored_value;
            }
            ast.push_child(dst_owner, decl);
        }
        moved
    }
}
