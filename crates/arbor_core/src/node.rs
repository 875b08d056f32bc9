//! Scene-graph node types.
//!
//! Nodes live in an arena owned by [`Scenegraph`](crate::Scenegraph) and refer
//! to each other through [`NodeId`]s. The set of node kinds is closed:
//! groups fan out, transforms change frame for a single child, leaves carry
//! geometry.

use arbor_math::Mat4;

use crate::light::Light;
use crate::material::Material;

/// Handle to a node inside its owning scenegraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Implicit primitive tested by a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Unit sphere centered at the origin
    Sphere,
    /// Axis-aligned unit cube spanning [-0.5, 0.5] on each axis
    Box,
    /// Any other mesh tag. Never hit by rays.
    Unsupported(String),
}

impl Primitive {
    /// Map a mesh tag to a primitive.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "sphere" => Primitive::Sphere,
            "box" => Primitive::Box,
            other => Primitive::Unsupported(other.to_string()),
        }
    }

    /// The mesh tag this primitive was created from.
    pub fn tag(&self) -> &str {
        match self {
            Primitive::Sphere => "sphere",
            Primitive::Box => "box",
            Primitive::Unsupported(tag) => tag,
        }
    }
}

/// What a node does during traversal.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Ordered children, no transform of its own.
    Group { children: Vec<NodeId> },

    /// A change of frame applied to at most one child.
    Transform {
        transform: Mat4,
        animation_transform: Mat4,
        child: Option<NodeId>,
    },

    /// Geometry with its material and texture binding.
    Leaf {
        primitive: Primitive,
        material: Material,
        texture: String,
    },
}

/// A node in the scene graph.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub lights: Vec<Light>,
    pub kind: NodeKind,
}

impl SceneNode {
    pub(crate) fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            parent: None,
            lights: Vec::new(),
            kind,
        }
    }

    /// Children reached from this node, in traversal order.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::Transform { child, .. } => child.as_slice(),
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// Frame change applied on descent: `animation_transform * transform`
    /// for transform nodes, identity otherwise.
    pub fn local_transform(&self) -> Mat4 {
        match &self.kind {
            NodeKind::Transform {
                transform,
                animation_transform,
                ..
            } => *animation_transform * *transform,
            _ => Mat4::IDENTITY,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_math::Vec3;

    #[test]
    fn test_primitive_tags() {
        assert_eq!(Primitive::from_tag("sphere"), Primitive::Sphere);
        assert_eq!(Primitive::from_tag("box"), Primitive::Box);
        assert_eq!(
            Primitive::from_tag("teapot"),
            Primitive::Unsupported("teapot".to_string())
        );
        assert_eq!(Primitive::from_tag("teapot").tag(), "teapot");
    }

    #[test]
    fn test_local_transform_order() {
        // animation applies after the static transform
        let node = SceneNode::new(
            "xform",
            NodeKind::Transform {
                transform: Mat4::from_scale(Vec3::splat(2.0)),
                animation_transform: Mat4::from_translation(Vec3::X),
                child: None,
            },
        );

        let p = node.local_transform().transform_point3(Vec3::X);
        assert_eq!(p, Vec3::new(3.0, 0.0, 0.0));
        assert!(node.children().is_empty());
    }
}
