//! Direct Phong shading with hard shadows.

use arbor_core::{Light, Material, Scenegraph, TextureTable, WHITE_TEXTURE};
use arbor_math::{Mat4, Ray, Vec3, Vec4};
use rand::{Rng, RngCore};

use crate::hit::HitRecord;
use crate::renderer::RenderConfig;
use crate::traversal::Traceable;

/// Compute the color of a hit point.
///
/// Each light contributes ambient, diffuse and specular terms, unless the
/// point lies outside its spot cone or a shadow ray towards it is blocked, in
/// which case it contributes nothing at all. The sum is clamped to [0, 1] and
/// then modulated by the leaf's texture.
pub fn shade(
    scene: &Scenegraph,
    frame: Mat4,
    hit: &HitRecord,
    lights: &[Light],
    textures: &TextureTable,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec4 {
    let Some(material) = hit.material else {
        return config.background;
    };

    let surface = Surface {
        point: hit.point.truncate(),
        normal: hit.normal.truncate(),
        // Eye is at the origin of the shading frame
        view: (-hit.point.truncate()).normalize_or_zero(),
        material,
    };

    let mut color = Vec3::ZERO;
    for light in lights {
        color += light_contribution(scene, frame, &surface, light, config, rng);
    }
    let mut color = color.clamp(Vec3::ZERO, Vec3::ONE);

    if hit.texture_name != WHITE_TEXTURE {
        if let Some(sampler) = textures.get(hit.texture_name) {
            color *= sampler.sample(hit.texcoord.x, hit.texcoord.y).truncate();
        }
    }

    color.extend(1.0)
}

/// Geometry and material of the point being shaded.
struct Surface<'a> {
    point: Vec3,
    normal: Vec3,
    view: Vec3,
    material: &'a Material,
}

fn light_contribution(
    scene: &Scenegraph,
    frame: Mat4,
    surface: &Surface,
    light: &Light,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec3 {
    let to_light = if light.is_directional() {
        -light.position.truncate()
    } else {
        light.position.truncate() - surface.point
    };
    let l = to_light.normalize_or_zero();
    if l == Vec3::ZERO {
        return Vec3::ZERO;
    }

    let spot = light.spot_direction.truncate();
    if spot.length_squared() > 0.0 && (-l).dot(spot.normalize()) <= light.spot_cos_cutoff() {
        return Vec3::ZERO;
    }

    if in_shadow(scene, frame, surface, l, config, rng) {
        return Vec3::ZERO;
    }

    let m = surface.material;
    let n_dot_l = surface.normal.dot(l);

    let ambient = m.ambient * light.ambient;
    let diffuse = m.diffuse * light.diffuse * n_dot_l.max(0.0);
    let specular = if n_dot_l > 0.0 {
        let r = reflect(-l, surface.normal);
        m.specular * light.specular * r.dot(surface.view).max(0.0).powf(m.shininess)
    } else {
        Vec3::ZERO
    };

    ambient + diffuse + specular
}

/// Cast a shadow ray towards the light. Anything the ray hits blocks it,
/// including geometry beyond a point light.
fn in_shadow(
    scene: &Scenegraph,
    frame: Mat4,
    surface: &Surface,
    l: Vec3,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> bool {
    let mut origin = surface.point + surface.normal * config.shadow_bias;
    if config.shadow_jitter > 0.0 {
        let j = config.shadow_jitter;
        origin += Vec3::new(
            rng.gen_range(-j..j),
            rng.gen_range(-j..j),
            rng.gen_range(-j..j),
        );
    }

    scene.intersect(&Ray::new(origin, l), frame).is_hit()
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
