//! The scene graph owner.
//!
//! `Scenegraph` holds every node in an arena, the root handle, and the name
//! registries used by external collaborators (animation, rasterizer meshes,
//! texture loading).

use std::collections::HashMap;

use arbor_math::Mat4;
use thiserror::Error;

use crate::light::Light;
use crate::material::Material;
use crate::node::{NodeId, NodeKind, Primitive, SceneNode};

/// Errors that can occur while building or editing a scene graph.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("No node named '{0}'")]
    NodeNotFound(String),

    #[error("Invalid node handle {0}")]
    InvalidHandle(usize),

    #[error("Transform node '{0}' already has a child")]
    TransformOccupied(String),

    #[error("Node '{0}' already has a parent")]
    AlreadyParented(String),

    #[error("Attaching '{child}' under '{parent}' would create a cycle")]
    Cycle { parent: String, child: String },

    #[error("Node '{0}' cannot have children")]
    NotAContainer(String),

    #[error("Node '{0}' is not a transform node")]
    NotATransform(String),

    #[error("Scene graph has no root")]
    NoRoot,
}

/// Result type for scene graph operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// A scene graph: node arena, root and name registries.
#[derive(Debug, Clone, Default)]
pub struct Scenegraph {
    nodes: Vec<SceneNode>,
    root: Option<NodeId>,

    /// Node lookup by name (last write wins)
    node_registry: HashMap<String, NodeId>,

    /// Mesh name to source path, kept for rasterizer back ends
    mesh_registry: HashMap<String, String>,

    /// Texture name to image path
    texture_registry: HashMap<String, String>,
}

impl Scenegraph {
    /// Create an empty scene graph.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(previous) = self.node_registry.insert(node.name.clone(), id) {
            log::debug!(
                "Node name '{}' re-registered (was #{}, now #{})",
                node.name,
                previous.0,
                id.0
            );
        }
        self.nodes.push(node);
        id
    }

    /// Add a detached group node.
    pub fn add_group(&mut self, name: impl Into<String>) -> NodeId {
        self.insert(SceneNode::new(name, NodeKind::Group { children: Vec::new() }))
    }

    /// Add a detached transform node with an identity animation transform.
    pub fn add_transform(&mut self, name: impl Into<String>, transform: Mat4) -> NodeId {
        self.insert(SceneNode::new(
            name,
            NodeKind::Transform {
                transform,
                animation_transform: Mat4::IDENTITY,
                child: None,
            },
        ))
    }

    /// Add a detached leaf node.
    pub fn add_leaf(
        &mut self,
        name: impl Into<String>,
        primitive: Primitive,
        material: Material,
        texture: impl Into<String>,
    ) -> NodeId {
        let name = name.into();
        if let Primitive::Unsupported(tag) = &primitive {
            log::warn!("Leaf '{}' uses unsupported mesh '{}'; it will never be hit", name, tag);
        }
        self.insert(SceneNode::new(
            name,
            NodeKind::Leaf {
                primitive,
                material,
                texture: texture.into(),
            },
        ))
    }

    fn check(&self, id: NodeId) -> SceneResult<&SceneNode> {
        self.nodes.get(id.0).ok_or(SceneError::InvalidHandle(id.0))
    }

    /// Attach `child` under `parent`.
    ///
    /// Rejects a second child on a transform, children on leaves, nodes that
    /// are already attached somewhere, and links that would close a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let parent_name = self.check(parent)?.name.clone();
        let child_node = self.check(child)?;

        if child_node.parent.is_some() || self.root == Some(child) {
            return Err(SceneError::AlreadyParented(child_node.name.clone()));
        }

        // Walking up from the parent must never reach the child
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(SceneError::Cycle {
                    parent: parent_name,
                    child: child_node.name.clone(),
                });
            }
            cursor = self.nodes[id.0].parent;
        }

        match &mut self.nodes[parent.0].kind {
            NodeKind::Group { children } => children.push(child),
            NodeKind::Transform { child: slot, .. } => {
                if slot.is_some() {
                    return Err(SceneError::TransformOccupied(parent_name));
                }
                *slot = Some(child);
            }
            NodeKind::Leaf { .. } => return Err(SceneError::NotAContainer(parent_name)),
        }

        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Make `id` the root of the tree. The root must not be attached below
    /// another node.
    pub fn set_root(&mut self, id: NodeId) -> SceneResult<()> {
        let node = self.check(id)?;
        if node.parent.is_some() {
            return Err(SceneError::AlreadyParented(node.name.clone()));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Root handle, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Attach a light to a node. It is declared in that node's frame.
    pub fn add_light(&mut self, id: NodeId, light: Light) -> SceneResult<()> {
        self.check(id)?;
        self.nodes[id.0].lights.push(light);
        Ok(())
    }

    /// Get a node by handle.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.node_registry.get(name).copied()
    }

    /// Replace the animation transform of the transform node registered as `name`.
    pub fn set_animation_transform(&mut self, name: &str, matrix: Mat4) -> SceneResult<()> {
        let id = self
            .find(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))?;

        match &mut self.nodes[id.0].kind {
            NodeKind::Transform {
                animation_transform,
                ..
            } => {
                *animation_transform = matrix;
                Ok(())
            }
            _ => Err(SceneError::NotATransform(name.to_string())),
        }
    }

    /// Register a mesh source for rasterizer back ends.
    pub fn register_mesh(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.mesh_registry.insert(name.into(), path.into());
    }

    /// Source path of a registered mesh.
    pub fn mesh_path(&self, name: &str) -> Option<&str> {
        self.mesh_registry.get(name).map(String::as_str)
    }

    /// Register an image file for a texture name.
    pub fn register_texture(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.texture_registry.insert(name.into(), path.into());
    }

    /// All registered (texture name, path) pairs.
    pub fn texture_paths(&self) -> impl Iterator<Item = (&str, &str)> {
        self.texture_registry
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_str()))
    }

    /// Texture names referenced by leaves reachable from the root.
    pub fn leaf_textures(&self) -> Vec<&str> {
        self.reachable()
            .into_iter()
            .filter_map(|id| match &self.nodes[id.0].kind {
                NodeKind::Leaf { texture, .. } => Some(texture.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Handles of every node reachable from the root, in depth-first order.
    pub fn reachable(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children().iter().rev());
        }
        out
    }

    /// Total number of nodes in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves reachable from the root.
    pub fn leaf_count(&self) -> usize {
        self.reachable()
            .into_iter()
            .filter(|id| self.nodes[id.0].is_leaf())
            .count()
    }

    /// Number of lights declared on nodes reachable from the root. Lights on
    /// a childless transform are not counted, since they never shine.
    pub fn light_count(&self) -> usize {
        self.reachable()
            .into_iter()
            .map(|id| &self.nodes[id.0])
            .filter(|node| !matches!(node.kind, NodeKind::Transform { child: None, .. }))
            .map(|node| node.lights.len())
            .sum()
    }
}
