//! Parametric closed shapes.
//!
//! Each shape defines a closed volume in 3D space that can contain a
//! gradient-index medium. Shapes answer two queries: containment of a point,
//! and a bounded ray cast that reports the first crossing of the surface
//! *from outside* — the same convention as a scene collider, which never
//! reports hits for rays originating inside the volume.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A closed volume that can delimit a medium.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Cuboid(Cuboid),
    Sphere(Sphere),
}

/// An axis-aligned cuboid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cuboid {
    /// Centre position.
    pub centre: [f64; 3],
    /// Half-extents along x, y, z.
    pub half_extents: [f64; 3],
}

/// A sphere defined by its centre and radius.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sphere {
    /// Centre position.
    pub centre: [f64; 3],
    /// Radius.
    pub radius: f64,
}

impl Shape {
    /// Centre of the shape, also the local origin of any field it contains.
    pub fn centre(&self) -> Vector3<f64> {
        let c = match self {
            Shape::Cuboid(c) => c.centre,
            Shape::Sphere(s) => s.centre,
        };
        Vector3::new(c[0], c[1], c[2])
    }

    /// Check whether a point lies inside this shape (surface inclusive).
    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let p = point - self.centre();
        match self {
            Shape::Cuboid(c) => {
                p.x.abs() <= c.half_extents[0]
                    && p.y.abs() <= c.half_extents[1]
                    && p.z.abs() <= c.half_extents[2]
            }
            Shape::Sphere(s) => p.norm_squared() <= s.radius * s.radius,
        }
    }

    /// Cast a ray against the shape's surface, limited to length `max_len`.
    ///
    /// Returns the distance to the first crossing and the outward-facing
    /// surface normal there. Only crossings from outside count: a ray whose
    /// origin lies inside (or on) the volume reports no hit.
    pub fn cast(&self, origin: &Vector3<f64>, direction: &Vector3<f64>, max_len: f64) -> Option<(f64, Vector3<f64>)> {
        match self {
            Shape::Cuboid(c) => cast_cuboid(c, &(origin - self.centre()), direction, max_len),
            Shape::Sphere(s) => cast_sphere(s, &(origin - self.centre()), direction, max_len),
        }
    }
}

/// Slab intersection for an origin-centred cuboid.
fn cast_cuboid(
    cuboid: &Cuboid,
    origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    max_len: f64,
) -> Option<(f64, Vector3<f64>)> {
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let mut entry_normal = Vector3::zeros();

    for axis in 0..3 {
        let h = cuboid.half_extents[axis];
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < 1e-12 {
            // Travelling parallel to this slab: outside it means no hit.
            if o.abs() > h {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (-h - o) * inv;
        let mut t1 = (h - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        if t0 > t_enter {
            t_enter = t0;
            let mut n = Vector3::zeros();
            n[axis] = -d.signum();
            entry_normal = n;
        }
        t_exit = t_exit.min(t1);
    }

    if t_enter > t_exit || t_enter <= 0.0 || t_enter > max_len {
        return None;
    }
    Some((t_enter, entry_normal))
}

/// Quadratic intersection for an origin-centred sphere.
fn cast_sphere(
    sphere: &Sphere,
    origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    max_len: f64,
) -> Option<(f64, Vector3<f64>)> {
    let c = origin.norm_squared() - sphere.radius * sphere.radius;
    if c <= 0.0 {
        // Origin inside or on the surface.
        return None;
    }
    let b = origin.dot(direction);
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t <= 0.0 || t > max_len {
        return None;
    }
    let normal = (origin + direction * t) / sphere.radius;
    Some((t, normal))
}
