//! Scene-graph walks for hit testing and light gathering.
//!
//! Both walks thread the accumulated transform down the tree by value, so
//! every call sees exactly the frame of the node it is visiting and no stack
//! has to be kept balanced.

use arbor_core::{Light, NodeId, NodeKind, Scenegraph};
use arbor_math::{Mat4, Ray};

use crate::hit::HitRecord;
use crate::intersect::intersect_leaf;

/// Scene-level queries used by the renderer.
pub trait Traceable {
    /// Closest hit of `ray` against the whole tree, with the root placed in
    /// the frame `frame` maps into.
    fn intersect(&self, ray: &Ray, frame: Mat4) -> HitRecord<'_>;

    /// Every light in the tree, expressed in the frame `frame` maps into.
    fn lights(&self, frame: Mat4) -> Vec<Light>;
}

impl Traceable for Scenegraph {
    fn intersect(&self, ray: &Ray, frame: Mat4) -> HitRecord<'_> {
        match self.root() {
            Some(root) => intersect_node(self, root, ray, frame),
            None => HitRecord::miss(),
        }
    }

    fn lights(&self, frame: Mat4) -> Vec<Light> {
        let mut lights = Vec::new();
        if let Some(root) = self.root() {
            collect_lights(self, root, frame, &mut lights);
        }
        lights
    }
}

/// Closest hit in the subtree rooted at `id`.
pub fn intersect_node<'a>(
    scene: &'a Scenegraph,
    id: NodeId,
    ray: &Ray,
    frame: Mat4,
) -> HitRecord<'a> {
    let Some(node) = scene.node(id) else {
        return HitRecord::miss();
    };

    match &node.kind {
        NodeKind::Group { children } => children
            .iter()
            .map(|&child| intersect_node(scene, child, ray, frame))
            .fold(HitRecord::miss(), HitRecord::closer),

        NodeKind::Transform { child, .. } => match child {
            Some(child) => intersect_node(scene, *child, ray, frame * node.local_transform()),
            None => HitRecord::miss(),
        },

        NodeKind::Leaf {
            primitive,
            material,
            texture,
        } => intersect_leaf(primitive, material, texture, ray, &frame),
    }
}

/// Append every light in the subtree rooted at `id` to `out`.
///
/// Lights on a transform node live inside that transform's frame. A transform
/// without a child contributes nothing, its own lights included.
pub fn collect_lights(scene: &Scenegraph, id: NodeId, frame: Mat4, out: &mut Vec<Light>) {
    let Some(node) = scene.node(id) else {
        return;
    };
    if let NodeKind::Transform { child: None, .. } = &node.kind {
        return;
    }

    let frame = frame * node.local_transform();
    out.extend(node.lights.iter().map(|light| light.transformed(&frame)));

    for &child in node.children() {
        collect_lights(scene, child, frame, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::{Material, Primitive};
    use arbor_math::{Vec3, Vec4};

    /// Root group with one translated unit sphere per entry in `offsets`.
    fn spheres_along_z(offsets: &[f32]) -> Scenegraph {
        let mut scene = Scenegraph::new();
        let root = scene.add_group("root");
        for (i, z) in offsets.iter().enumerate() {
            let xform = scene.add_transform(
                format!("xform-{i}"),
                Mat4::from_translation(Vec3::new(0.0, 0.0, *z)),
            );
            let leaf = scene.add_leaf(
                format!("sphere-{i}"),
                Primitive::Sphere,
                Material::matte(Vec3::splat(i as f32 / 10.0)),
                "white",
            );
            scene.add_child(root, xform).unwrap();
            scene.add_child(xform, leaf).unwrap();
        }
        scene.set_root(root).unwrap();
        scene
    }

    fn forward() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_closest_hit_regardless_of_order() {
        let near_first = spheres_along_z(&[-5.0, -10.0]);
        let far_first = spheres_along_z(&[-10.0, -5.0]);

        let a = near_first.intersect(&forward(), Mat4::IDENTITY);
        let b = far_first.intersect(&forward(), Mat4::IDENTITY);

        assert!((a.time - 4.0).abs() < 1e-5);
        assert!((b.time - 4.0).abs() < 1e-5);
        // The nearer sphere's material travels with the hit
        assert_eq!(a.material.unwrap().diffuse, Vec3::ZERO);
        assert_eq!(b.material.unwrap().diffuse, Vec3::splat(0.1));
    }

    #[test]
    fn test_tree_hit_is_minimum_of_leaf_hits() {
        let offsets = [-12.0, -3.0, -7.5, -20.0];
        let scene = spheres_along_z(&offsets);
        let ray = forward();

        let leaf_min = offsets
            .iter()
            .map(|z| {
                let m = Material::default();
                let frame = Mat4::from_translation(Vec3::new(0.0, 0.0, *z));
                intersect_leaf(&Primitive::Sphere, &m, "white", &ray, &frame).time
            })
            .fold(f32::INFINITY, f32::min);

        let tree = scene.intersect(&ray, Mat4::IDENTITY);
        assert_eq!(tree.time, leaf_min);
    }

    #[test]
    fn test_view_frame_applies_to_whole_tree() {
        let scene = spheres_along_z(&[0.0]);
        // Camera at z=10 looking at the origin
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);

        let hit = scene.intersect(&forward(), view);
        assert!((hit.time - 9.0).abs() < 1e-4);
        assert!((hit.point - Vec4::new(0.0, 0.0, -9.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_animation_transform_composes_after_static() {
        let mut scene = spheres_along_z(&[-10.0]);
        scene
            .set_animation_transform("xform-0", Mat4::from_translation(Vec3::new(0.0, 0.0, 4.0)))
            .unwrap();

        let hit = scene.intersect(&forward(), Mat4::IDENTITY);
        assert!((hit.time - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_subtrees_miss() {
        let mut scene = Scenegraph::new();
        let root = scene.add_group("root");
        let empty_group = scene.add_group("empty");
        let childless = scene.add_transform("childless", Mat4::IDENTITY);
        scene.add_child(root, empty_group).unwrap();
        scene.add_child(root, childless).unwrap();
        scene.set_root(root).unwrap();

        assert!(!scene.intersect(&forward(), Mat4::IDENTITY).is_hit());
        assert!(scene.lights(Mat4::IDENTITY).is_empty());
        assert!(!Scenegraph::new().intersect(&forward(), Mat4::IDENTITY).is_hit());
    }

    #[test]
    fn test_lights_follow_translation() {
        let mut scene = Scenegraph::new();
        let root = scene.add_group("root");
        let xform = scene.add_transform("shift", Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)));
        let leaf = scene.add_leaf("ball", Primitive::Sphere, Material::default(), "white");
        scene.add_child(root, xform).unwrap();
        scene.add_child(xform, leaf).unwrap();
        scene.set_root(root).unwrap();

        let at = Vec3::new(1.0, 2.0, 3.0);
        scene.add_light(root, Light::point(at)).unwrap();
        scene.add_light(xform, Light::point(at)).unwrap();
        scene.add_light(leaf, Light::point(at)).unwrap();

        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let lights = scene.lights(view);

        assert_eq!(lights.len(), 3);
        let offset = Vec4::new(10.0, 0.0, 0.0, 0.0);
        assert!((lights[1].position - lights[0].position - offset).length() < 1e-4);
        assert!((lights[2].position - lights[0].position - offset).length() < 1e-4);
        // Root light seen from the camera frame
        assert!((lights[0].position - Vec4::new(1.0, 2.0, -7.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_childless_transform_has_no_lights() {
        let mut scene = Scenegraph::new();
        let root = scene.add_group("root");
        let rig = scene.add_transform("rig", Mat4::from_translation(Vec3::Y));
        scene.add_child(root, rig).unwrap();
        scene.set_root(root).unwrap();
        scene.add_light(rig, Light::point(Vec3::ZERO)).unwrap();

        assert!(scene.lights(Mat4::IDENTITY).is_empty());

        // Giving the transform a child brings its light back
        let holder = scene.add_group("holder");
        scene.add_child(rig, holder).unwrap();
        let lights = scene.lights(Mat4::IDENTITY);
        assert_eq!(lights.len(), 1);
        assert!((lights[0].position - Vec4::new(0.0, 1.0, 0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_light_spot_direction_rotates_with_node() {
        let mut scene = Scenegraph::new();
        let xform = scene.add_transform(
            "turn",
            Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2),
        );
        let holder = scene.add_group("holder");
        scene.add_child(xform, holder).unwrap();
        scene.set_root(xform).unwrap();
        scene
            .add_light(xform, Light::point(Vec3::ZERO).with_spot(Vec3::X, 20.0))
            .unwrap();

        let lights = scene.lights(Mat4::IDENTITY);
        assert!((lights[0].spot_direction - Vec4::new(0.0, 1.0, 0.0, 0.0)).length() < 1e-5);
    }
}
