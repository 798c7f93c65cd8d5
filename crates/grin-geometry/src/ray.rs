//! Ray and surface-hit value types shared across the framework.
//!
//! These are the records exchanged with the host scene: a traveling ray, and
//! the point/normal/identity triple produced when a spatial query strikes a
//! surface.

use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector3;

/// Opaque identity of a boundary surface.
///
/// A scene may contain many surfaces; hits carry the identity of the surface
/// that produced them so a medium can filter out collisions against unrelated
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

impl SurfaceId {
    /// Allocate a fresh, process-unique surface identity.
    pub fn fresh() -> Self {
        Self(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A ray: an origin and a traveling-direction unit vector.
///
/// Directions are unit-length by convention; constructors normalise, but the
/// fields are public and not defensively re-normalised on use.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray, normalising the direction.
    pub fn new(origin: Vector3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// The point a distance `t` along the ray from its origin.
    pub fn point_at(&self, t: f64) -> Vector3<f64> {
        self.origin + self.direction * t
    }
}

/// A collision record produced by a boundary or scene query.
#[derive(Debug, Clone)]
pub struct SurfaceHit {
    /// Point of contact.
    pub point: Vector3<f64>,
    /// Outward-facing surface normal at the point of contact.
    pub normal: Vector3<f64>,
    /// Identity of the surface that was struck.
    pub surface: SurfaceId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalises_direction() {
        let r = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 3.0));
        assert!((r.direction.norm() - 1.0).abs() < 1e-12);
        let p = r.point_at(2.5);
        assert!((p.z - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_surface_ids_are_unique() {
        let a = SurfaceId::fresh();
        let b = SurfaceId::fresh();
        assert_ne!(a, b);
    }
}
