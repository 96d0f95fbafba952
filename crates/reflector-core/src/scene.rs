//! Scene graph access and scoped visibility overrides.

use std::ops::Deref;

use glam::Mat4;

/// Handle to a node in a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// The scene operations a reflector needs.
pub trait SceneGraph {
    /// Visits every node in scene order.
    fn for_each_node(&self, f: &mut dyn FnMut(NodeId));

    /// Returns the node's own visibility flag, or `None` if it does not exist.
    fn is_visible(&self, node: NodeId) -> Option<bool>;

    /// Sets the node's visibility flag, returning the previous value.
    fn set_visible(&mut self, node: NodeId, visible: bool) -> Option<bool>;

    /// Returns the node's world matrix.
    fn world_matrix(&self, node: NodeId) -> Option<Mat4>;

    /// Finds the first node with the given name.
    fn find_by_name(&self, name: &str) -> Option<NodeId>;
}

/// Hides a set of nodes for as long as it is alive.
///
/// Previous visibility is restored on drop, in reverse order, including
/// during unwinding.
pub struct HiddenNodes<'a, S: SceneGraph> {
    scene: &'a mut S,
    saved: Vec<(NodeId, bool)>,
}

impl<'a, S: SceneGraph> HiddenNodes<'a, S> {
    /// Hides `nodes`. Unknown nodes are skipped.
    pub fn new(scene: &'a mut S, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let mut saved = Vec::new();
        for node in nodes {
            if saved.iter().any(|(id, _)| *id == node) {
                continue;
            }
            if let Some(previous) = scene.set_visible(node, false) {
                saved.push((node, previous));
            }
        }
        Self { scene, saved }
    }

    /// Number of nodes this guard hid.
    pub fn len(&self) -> usize {
        self.saved.len()
    }

    /// Returns whether the guard hid nothing.
    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

impl<S: SceneGraph> Deref for HiddenNodes<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.scene
    }
}

impl<S: SceneGraph> Drop for HiddenNodes<'_, S> {
    fn drop(&mut self) {
        for (node, visible) in self.saved.drain(..).rev() {
            self.scene.set_visible(node, visible);
        }
    }
}

/// A node of [`SimpleScene`].
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Node name.
    pub name: String,
    /// Parent node, `None` for roots.
    pub parent: Option<NodeId>,
    /// Transform relative to the parent.
    pub local: Mat4,
    /// Own visibility flag.
    pub visible: bool,
}

/// A flat, insertion-ordered scene graph.
///
/// Parents must be added before their children.
#[derive(Debug, Clone, Default)]
pub struct SimpleScene {
    nodes: Vec<SceneNode>,
}

impl SimpleScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not refer to an existing node, or if the
    /// scene already holds `u32::MAX` nodes.
    pub fn add_node(&mut self, name: impl Into<String>, parent: Option<NodeId>, local: Mat4) -> NodeId {
        if let Some(parent) = parent {
            assert!(self.node(parent).is_some(), "parent {parent:?} does not exist");
        }
        let id = NodeId(u32::try_from(self.nodes.len()).expect("too many scene nodes"));
        self.nodes.push(SceneNode {
            name: name.into(),
            parent,
            local,
            visible: true,
        });
        id
    }

    /// Removes `id` if it is the most recently added node.
    ///
    /// Undoes an [`add_node`](Self::add_node) whose follow-up setup failed;
    /// other nodes cannot be removed without renumbering their ids.
    pub fn remove_last(&mut self, id: NodeId) -> Option<SceneNode> {
        if self.nodes.len().checked_sub(1) != Some(id.0 as usize) {
            return None;
        }
        self.nodes.pop()
    }

    /// Returns a node.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Returns a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Replaces a node's local transform.
    pub fn set_local_transform(&mut self, id: NodeId, local: Mat4) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.local = local;
                true
            }
            None => false,
        }
    }

    /// Returns whether a node and all its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.node(id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Returns the ids of all effectively visible nodes, in scene order.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter_map(|i| u32::try_from(i).ok().map(NodeId))
            .filter(|id| self.is_effectively_visible(*id))
            .collect()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SceneGraph for SimpleScene {
    fn for_each_node(&self, f: &mut dyn FnMut(NodeId)) {
        for i in 0..self.nodes.len() {
            if let Ok(i) = u32::try_from(i) {
                f(NodeId(i));
            }
        }
    }

    fn is_visible(&self, node: NodeId) -> Option<bool> {
        self.node(node).map(|n| n.visible)
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) -> Option<bool> {
        self.node_mut(node)
            .map(|n| std::mem::replace(&mut n.visible, visible))
    }

    fn world_matrix(&self, node: NodeId) -> Option<Mat4> {
        let mut node_ref = self.node(node)?;
        let mut world = node_ref.local;
        while let Some(parent) = node_ref.parent {
            node_ref = self.node(parent)?;
            world = node_ref.local * world;
        }
        Some(world)
    }

    fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(NodeId)
    }
}
