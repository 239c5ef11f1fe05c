//! Arena render tree shared by the integration tests

#![allow(dead_code)]

use quire_style::{ComponentContext, ComponentState, StyleTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Default)]
struct Node {
    parent: Option<NodeId>,
    styled: bool,
    element: Option<String>,
    id: Option<String>,
    class: Option<String>,
    state: ComponentState,
    document: bool,
}

/// Minimal component tree: styled nodes carry attributes, layout-only nodes do not
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only the document root
    pub fn new() -> (Self, NodeId) {
        let mut tree = Self::default();
        let root = tree.push(Node {
            styled: true,
            element: Some("document".into()),
            document: true,
            ..Node::default()
        });
        (tree, root)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn add(&mut self, parent: NodeId, element: &str) -> NodeId {
        self.push(Node {
            parent: Some(parent),
            styled: true,
            element: Some(element.into()),
            ..Node::default()
        })
    }

    pub fn add_classed(&mut self, parent: NodeId, element: &str, class: &str) -> NodeId {
        let node = self.add(parent, element);
        self.nodes[node.0].class = Some(class.into());
        node
    }

    /// A node the style system steps over
    pub fn add_unstyled(&mut self, parent: NodeId) -> NodeId {
        self.push(Node {
            parent: Some(parent),
            ..Node::default()
        })
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        self.nodes[node.0].id = Some(id.into());
    }

    pub fn set_state(&mut self, node: NodeId, state: ComponentState) {
        self.nodes[node.0].state = state;
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}

impl StyleTree for Tree {
    type NodeId = NodeId;

    fn component(&self, node: NodeId) -> Option<ComponentContext<'_>> {
        let node = self.nodes.get(node.0)?;
        if !node.styled {
            return None;
        }
        Some(ComponentContext {
            id: node.id.as_deref(),
            element: node.element.as_deref(),
            style_class: node.class.as_deref(),
            state: node.state,
            is_document: node.document,
        })
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }
}
