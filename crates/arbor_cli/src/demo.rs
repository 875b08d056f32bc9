//! Built-in demo scene.

use arbor_core::{Light, Material, NodeId, Primitive, SceneResult, Scenegraph, Texture, TextureTable};
use arbor_math::{Mat4, Vec3};

/// Name of the procedural floor texture.
pub const CHECKER: &str = "checker";

/// Two spheres and a tilted box on a checkered floor, lit by a key light and
/// a spot light hanging above the scene.
pub fn build_scene() -> SceneResult<Scenegraph> {
    let mut scene = Scenegraph::new();
    let root = scene.add_group("root");

    add_shape(
        &mut scene,
        root,
        "floor",
        Primitive::Box,
        Material::matte(Vec3::splat(0.9)),
        CHECKER,
        Mat4::from_translation(Vec3::new(0.0, -1.1, 0.0))
            * Mat4::from_scale(Vec3::new(12.0, 0.2, 12.0)),
    )?;

    add_shape(
        &mut scene,
        root,
        "red-ball",
        Primitive::Sphere,
        Material::phong(
            Vec3::new(0.2, 0.02, 0.02),
            Vec3::new(0.8, 0.1, 0.1),
            Vec3::splat(0.6),
            32.0,
        ),
        "white",
        Mat4::from_translation(Vec3::new(-1.5, 0.0, 0.0)),
    )?;

    add_shape(
        &mut scene,
        root,
        "blue-ball",
        Primitive::Sphere,
        Material::phong(
            Vec3::new(0.02, 0.05, 0.2),
            Vec3::new(0.1, 0.3, 0.9),
            Vec3::ONE,
            96.0,
        ),
        "white",
        Mat4::from_translation(Vec3::new(1.5, -0.25, 0.5)) * Mat4::from_scale(Vec3::splat(0.75)),
    )?;

    add_shape(
        &mut scene,
        root,
        "crate",
        Primitive::Box,
        Material::matte(Vec3::new(0.7, 0.55, 0.3)),
        "white",
        Mat4::from_translation(Vec3::new(0.0, -0.4, -2.0))
            * Mat4::from_rotation_y(35f32.to_radians())
            * Mat4::from_scale(Vec3::splat(1.2)),
    )?;

    scene.add_light(
        root,
        Light::point(Vec3::new(6.0, 8.0, 6.0)).with_colors(
            Vec3::splat(0.15),
            Vec3::splat(0.8),
            Vec3::splat(0.8),
        ),
    )?;

    // Spot light rides on its own transform, pointing straight down. A
    // transform only contributes lights when it has a child.
    let rig = scene.add_transform("spot-rig", Mat4::from_translation(Vec3::new(0.0, 6.0, 0.0)));
    let mount = scene.add_group("spot-mount");
    scene.add_child(root, rig)?;
    scene.add_child(rig, mount)?;
    scene.add_light(
        rig,
        Light::point(Vec3::ZERO)
            .with_colors(Vec3::splat(0.05), Vec3::new(1.0, 0.9, 0.7), Vec3::ONE)
            .with_spot(Vec3::NEG_Y, 25.0),
    )?;

    scene.set_root(root)?;
    Ok(scene)
}

/// Procedural textures used by [`build_scene`].
pub fn textures() -> TextureTable {
    let mut table = TextureTable::new();
    table.insert(
        CHECKER,
        Texture::checker(8, Vec3::ONE, Vec3::splat(0.25)),
    );
    table
}

fn add_shape(
    scene: &mut Scenegraph,
    parent: NodeId,
    name: &str,
    primitive: Primitive,
    material: Material,
    texture: &str,
    transform: Mat4,
) -> SceneResult<NodeId> {
    let xform = scene.add_transform(format!("{name}-xform"), transform);
    let leaf = scene.add_leaf(name, primitive, material, texture);
    scene.add_child(parent, xform)?;
    scene.add_child(xform, leaf)?;
    Ok(leaf)
}
