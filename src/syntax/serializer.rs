//! Pretty-printing serializer (2-space indent, one declaration per line,
//! blocks separated by a blank line).

use crate::ast::{Ast, NodeId, NodeKind};

/// Serialize an AST back to stylesheet text.
pub fn stringify(ast: &Ast) -> String {
    match &ast.node(ast.root()).kind {
        NodeKind::Stylesheet { rules } => emit_blocks(ast, rules, 0),
        _ => String::new(),
    }
}

fn emit_blocks(ast: &Ast, ids: &[NodeId], depth: usize) -> String {
    let blocks: Vec<String> = ids
        .iter()
        .map(|&id| emit_node(ast, id, depth))
        .filter(|text| !text.is_empty())
        .collect();
    blocks.join("\n\n")
}

fn emit_node(ast: &Ast, id: NodeId, depth: usize) -> String {
    let pad = "  ".repeat(depth);
    match &ast.node(id).kind {
        NodeKind::Stylesheet { .. } => String::new(),
        NodeKind::Rule {
            selectors,
            declarations,
        } => emit_braced(&pad, &selectors.join(", "), &emit_declarations(ast, declarations, depth + 1)),
        NodeKind::Media { query, rules } => emit_braced(
            &pad,
            &format!("@media {query}"),
            &emit_blocks(ast, rules, depth + 1),
        ),
        NodeKind::Keyframes {
            name,
            vendor,
            frames,
        } => emit_braced(
            &pad,
            &format!("@{}keyframes {name}", vendor.as_deref().unwrap_or("")),
            &emit_blocks(ast, frames, depth + 1),
        ),
        NodeKind::Keyframe {
            selectors,
            declarations,
        } => emit_braced(&pad, &selectors.join(", "), &emit_declarations(ast, declarations, depth + 1)),
        NodeKind::Declaration { property, value } => format!("{pad}{property}: {value};"),
        NodeKind::Comment { text } => format!("{pad}/*{text}*/"),
        NodeKind::AtRule { name, params } => {
            if params.is_empty() {
                format!("{pad}@{name};")
            } else {
                format!("{pad}@{name} {params};")
            }
        }
    }
}

fn emit_braced(pad: &str, head: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{pad}{head} {{}}")
    } else {
        format!("{pad}{head} {{\n{body}\n{pad}}}")
    }
}

fn emit_declarations(ast: &Ast, ids: &[NodeId], depth: usize) -> String {
    let pad = "  ".repeat(depth);
    let lines: Vec<String> = ids
        .iter()
        .filter_map(|&id| match &ast.node(id).kind {
            NodeKind::Declaration { property, value } => {
                Some(format!("{pad}{property}: {value};"))
            }
            NodeKind::Comment { text } => Some(format!("{pad}/*{text}*/")),
            _ => None,
        })
        .collect();
    lines.join("\n")
}
