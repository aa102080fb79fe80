use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::NodeId;

/// One stylesheet node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// What the node is and its kind-specific payload.
    pub kind: NodeKind,
    /// The node owning the container this node sits in.
    pub parent: Option<NodeId>,
}

/// Kind tag plus payload for every supported node.
///
/// The serialized shape (a `type` tag plus the fields below) is the
/// contract with external tooling that consumes the tree as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Stylesheet {
        rules: Vec<NodeId>,
    },
    Rule {
        selectors: Vec<String>,
        declarations: Vec<NodeId>,
    },
    Media {
        query: String,
        rules: Vec<NodeId>,
    },
    Keyframes {
        name: String,
        /// Dashed vendor marker (`-webkit-`) when parsed from a prefixed
        /// at-rule such as `@-webkit-keyframes`.
        vendor: Option<String>,
        frames: Vec<NodeId>,
    },
    /// One selector group inside a keyframes block, e.g. `0%, 50% { ... }`.
    Keyframe {
        selectors: SmallVec<[String; 2]>,
        declarations: Vec<NodeId>,
    },
    Declaration {
        property: String,
        value: String,
    },
    Comment {
        text: String,
    },
    /// A statement at-rule carried through untouched (`@import`, ...).
    AtRule {
        name: String,
        params: String,
    },
}

/// Discriminant-only view of [`NodeKind`], used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Stylesheet,
    Rule,
    Media,
    Keyframes,
    Keyframe,
    Declaration,
    Comment,
    AtRule,
}

impl NodeKind {
    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::Stylesheet { .. } => Kind::Stylesheet,
            NodeKind::Rule { .. } => Kind::Rule,
            NodeKind::Media { .. } => Kind::Media,
            NodeKind::Keyframes { .. } => Kind::Keyframes,
            NodeKind::Keyframe { .. } => Kind::Keyframe,
            NodeKind::Declaration { .. } => Kind::Declaration,
            NodeKind::Comment { .. } => Kind::Comment,
            NodeKind::AtRule { .. } => Kind::AtRule,
        }
    }
}

/// Arena holding every node of one parsed stylesheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    /// Create an arena holding an empty stylesheet root.
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Stylesheet { rules: Vec::new() },
            parent: None,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The stylesheet root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, including ones no longer reachable
    /// from the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a node, assigning it the next monotonic id.
    pub fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, parent });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// The child container owned by `owner`, if its kind has one.
    pub fn children(&self, owner: NodeId) -> Option<&[NodeId]> {
        match &self.node(owner).kind {
            NodeKind::Stylesheet { rules } | NodeKind::Media { rules, .. } => Some(rules),
            NodeKind::Rule { declarations, .. } | NodeKind::Keyframe { declarations, .. } => {
                Some(declarations)
            }
            NodeKind::Keyframes { frames, .. } => Some(frames),
            _ => None,
        }
    }

    /// Mutable access to the child container owned by `owner`.
    pub fn children_mut(&mut self, owner: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.node_mut(owner).kind {
            NodeKind::Stylesheet { rules } | NodeKind::Media { rules, .. } => Some(rules),
            NodeKind::Rule { declarations, .. } | NodeKind::Keyframe { declarations, .. } => {
                Some(declarations)
            }
            NodeKind::Keyframes { frames, .. } => Some(frames),
            _ => None,
        }
    }

    /// Append `child` to `owner`'s container and update its parent link.
    /// No-op when `owner` has no container.
    pub fn push_child(&mut self, owner: NodeId, child: NodeId) {
        let pushed = match self.children_mut(owner) {
            Some(children) => {
                children.push(child);
                true
            }
            None => false,
        };
        if pushed {
            self.nodes[child.index()].parent = Some(owner);
        }
    }

    /// Property and value of a declaration node.
    pub fn declaration(&self, id: NodeId) -> Option<(&str, &str)> {
        match &self.node(id).kind {
            NodeKind::Declaration { property, value } => Some((property, value)),
            _ => None,
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}
