//! Scene hierarchy stored as an arena of nodes addressed by index.

use std::collections::HashMap;

use crate::math::mat4::Mat4;

/// Index of a node inside a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the imported scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Bind-pose transform relative to the parent.
    pub transform: Mat4,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Fixed scene hierarchy. Nodes are only ever appended, so every
/// [`NodeId`] handed out stays valid.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl NodeTree {
    /// Creates a tree holding only its root node.
    pub fn new(root_name: impl Into<String>, root_transform: Mat4) -> Self {
        let mut tree = Self::default();
        tree.push(root_name.into(), root_transform, None);
        tree
    }

    fn push(&mut self, name: String, transform: Mat4, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        // First node with a given name wins lookups, like a scene search would.
        self.by_name.entry(name.clone()).or_insert(id);
        self.nodes.push(Node {
            name,
            transform,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Appends a child under `parent`.
    ///
    /// Returns `None` if `parent` does not belong to this tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Mat4,
    ) -> Option<NodeId> {
        if parent.0 >= self.nodes.len() {
            return None;
        }
        let id = self.push(name.into(), transform, Some(parent));
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// The root node, or `None` for an empty (default) tree.
    pub fn root(&self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeId(0))
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Composed bind-pose transform from the root down to `id`.
    pub fn global_bind_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.get(id)?;
        let mut global = node.transform;
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            global = node.transform * global;
        }
        Some(global)
    }
}
