//! Ray intersection against the implicit leaf primitives.
//!
//! Rays arrive in the frame of the caller (usually view space) together with
//! the accumulated leaf-to-frame transform. The test itself runs in object
//! space, where the sphere is the unit sphere and the box is the unit cube,
//! and the result is mapped back so hit points from different leaves can be
//! compared directly.

use std::f32::consts::PI;

use arbor_core::{Material, Primitive};
use arbor_math::{Mat4, Mat4Ext, Ray, Vec2, Vec3};

use crate::hit::HitRecord;

/// Direction components smaller than this are treated as parallel to a slab.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Tolerance when deciding which box face a hit point lies on.
const FACE_EPSILON: f32 = 1e-4;

/// Hit data in object space, before it is mapped back to the caller's frame.
struct LocalHit {
    time: f32,
    normal: Vec3,
    texcoord: Vec2,
}

/// Intersect `ray` (expressed in the frame `leaf_to_frame` maps into) with a
/// leaf primitive.
///
/// Returns the miss sentinel for unsupported primitives, degenerate rays and
/// geometric misses.
pub fn intersect_leaf<'a>(
    primitive: &Primitive,
    material: &'a Material,
    texture: &'a str,
    ray: &Ray,
    leaf_to_frame: &Mat4,
) -> HitRecord<'a> {
    let frame_to_leaf = leaf_to_frame.inverse();
    let local_ray = ray.transformed(&frame_to_leaf);

    let local = match primitive {
        Primitive::Sphere => intersect_sphere(&local_ray),
        Primitive::Box => intersect_box(&local_ray),
        Primitive::Unsupported(_) => None,
    };

    let Some(local) = local else {
        return HitRecord::miss();
    };

    let normal_correction = frame_to_leaf.transpose();
    let normal = normal_correction
        .transform_vector4(local.normal.extend(0.0))
        .truncate()
        .normalize_or_zero();

    HitRecord {
        time: local.time,
        // Evaluated on the incoming ray, not the object-space one
        point: ray.at(local.time),
        normal: normal.extend(0.0),
        material: Some(material),
        texture_name: texture,
        texcoord: local.texcoord,
    }
}

/// Unit sphere centered at the origin.
fn intersect_sphere(ray: &Ray) -> Option<LocalHit> {
    let start = ray.start.truncate();
    let dir = ray.direction.truncate();

    let a = dir.length_squared();
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * start.dot(dir);
    let c = start.length_squared() - 1.0;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let t1 = (-b - sqrtd) / (2.0 * a);
    let t2 = (-b + sqrtd) / (2.0 * a);

    let time = match (t1 >= 0.0, t2 >= 0.0) {
        (true, true) => t1.min(t2),
        (true, false) => t1,
        (false, true) => t2,
        (false, false) => return None,
    };

    let point = start + time * dir;
    Some(LocalHit {
        time,
        normal: point,
        texcoord: sphere_uv(point),
    })
}

/// Spherical mapping of a point on the unit sphere.
fn sphere_uv(p: Vec3) -> Vec2 {
    let u = 0.5 + p.z.atan2(p.x) / (2.0 * PI);
    let v = 0.5 - p.y.clamp(-1.0, 1.0).asin() / PI;
    Vec2::new(u, v)
}

/// Axis-aligned unit cube spanning [-0.5, 0.5] on every axis.
fn intersect_box(ray: &Ray) -> Option<LocalHit> {
    let start = ray.start.truncate();
    let dir = ray.direction.truncate();

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let s = start[axis];
        let d = dir[axis];

        if d.abs() < PARALLEL_EPSILON {
            // Parallel to this slab: either always inside it or never
            if !(-0.5..=0.5).contains(&s) {
                return None;
            }
            continue;
        }

        let t1 = (-0.5 - s) / d;
        let t2 = (0.5 - s) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }

    // Starting inside the box hits the exit face
    let time = if t_near > 0.0 { t_near } else { t_far };
    if !time.is_finite() {
        return None;
    }

    let point = start + time * dir;
    let (normal, texcoord) = box_face(point);
    Some(LocalHit {
        time,
        normal,
        texcoord,
    })
}

/// Face normal and planar texture coordinates for a point on the unit cube.
///
/// Faces are tested X first, then Y, then Z.
fn box_face(p: Vec3) -> (Vec3, Vec2) {
    let on_face = |c: f32| (c.abs() - 0.5).abs() < FACE_EPSILON;

    let axis = if on_face(p.x) {
        0
    } else if on_face(p.y) {
        1
    } else if on_face(p.z) {
        2
    } else {
        // Rounding pushed the point off every face; use the dominant axis
        let a = p.abs();
        if a.x >= a.y && a.x >= a.z {
            0
        } else if a.y >= a.z {
            1
        } else {
            2
        }
    };

    let mut normal = Vec3::ZERO;
    normal[axis] = p[axis].signum();

    let (u, v) = match axis {
        0 => (p.z, p.y),
        1 => (p.x, p.z),
        _ => (p.x, p.y),
    };
    let texcoord = Vec2::new(u + 0.5, v + 0.5).clamp(Vec2::ZERO, Vec2::ONE);

    (normal, texcoord)
}
