//! Boundary surfaces: the geometric side of a medium.
//!
//! A [`BoundarySurface`] wraps one closed [`Shape`] and answers the three
//! questions the tracer needs: does a scene collision belong to *this*
//! medium, does a short forward step leave the volume, and (for hosts without
//! their own spatial index) where does an outside ray first enter it.

use nalgebra::Vector3;
use thiserror::Error;

use crate::ray::{Ray, SurfaceHit, SurfaceId};
use crate::shapes::Shape;

/// Errors from boundary-surface construction.
#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("Shape dimension '{name}' must be positive and finite, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

/// The containing shape of a single medium, with its scene identity.
#[derive(Debug, Clone)]
pub struct BoundarySurface {
    shape: Shape,
    id: SurfaceId,
}

impl BoundarySurface {
    /// Wrap a shape as a medium boundary, validating its dimensions.
    pub fn new(shape: Shape) -> Result<Self, BoundaryError> {
        match &shape {
            Shape::Cuboid(c) => {
                for (name, &value) in ["half_extent_x", "half_extent_y", "half_extent_z"]
                    .iter()
                    .zip(c.half_extents.iter())
                {
                    if !(value.is_finite() && value > 0.0) {
                        return Err(BoundaryError::InvalidDimension { name, value });
                    }
                }
            }
            Shape::Sphere(s) => {
                if !(s.radius.is_finite() && s.radius > 0.0) {
                    return Err(BoundaryError::InvalidDimension {
                        name: "radius",
                        value: s.radius,
                    });
                }
            }
        }
        Ok(Self {
            shape,
            id: SurfaceId::fresh(),
        })
    }

    /// This surface's scene identity.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// The wrapped shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Centre of the containing shape (the local origin of the medium's field).
    pub fn centre(&self) -> Vector3<f64> {
        self.shape.centre()
    }

    /// True iff `hit` is a collision against this medium's own shape.
    ///
    /// A scene may contain many surfaces; not every collision handed to the
    /// tracer means light is entering this particular medium.
    pub fn test_enter(&self, _ray: &Ray, hit: &SurfaceHit) -> bool {
        hit.surface == self.id
    }

    /// Test whether advancing `ray` forward by `step` leaves the shape.
    ///
    /// Probes with a ray cast from the advanced point back toward the current
    /// origin, bounded to `step`. The cast only reports crossings from
    /// outside, so a hit means the step straddles the surface. The probe
    /// approaches the boundary from the opposite sense of true travel, so the
    /// raw hit normal is flipped before it is returned: an exit hit carries
    /// the normal under the medium-exit convention, where a refracted
    /// direction with negative dot product against it has genuinely left the
    /// volume.
    pub fn test_exit(&self, ray: &Ray, step: f64) -> Option<SurfaceHit> {
        let probe_origin = ray.point_at(step);
        let probe_dir = -ray.direction;
        let (t, normal) = self.shape.cast(&probe_origin, &probe_dir, step)?;
        Some(SurfaceHit {
            point: probe_origin + probe_dir * t,
            normal: -normal,
            surface: self.id,
        })
    }

    /// Scene-side entry query: where does an outside ray first strike the
    /// shape, within `max_len`?
    ///
    /// Hosts with their own spatial index produce entry hits themselves; this
    /// is for standalone use.
    pub fn cast_entry(&self, ray: &Ray, max_len: f64) -> Option<SurfaceHit> {
        let (t, normal) = self.shape.cast(&ray.origin, &ray.direction, max_len)?;
        Some(SurfaceHit {
            point: ray.point_at(t),
            normal,
            surface: self.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Cuboid;
    use approx::assert_relative_eq;

    fn unit_boundary() -> BoundarySurface {
        BoundarySurface::new(Shape::Cuboid(Cuboid {
            centre: [0.0, 0.0, 0.0],
            half_extents: [1.0, 1.0, 1.0],
        }))
        .unwrap()
    }

    #[test]
    fn test_rejects_non_positive_extent() {
        let result = BoundarySurface::new(Shape::Cuboid(Cuboid {
            centre: [0.0, 0.0, 0.0],
            half_extents: [1.0, 0.0, 1.0],
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_enter_filters_foreign_surfaces() {
        let boundary = unit_boundary();
        let ray = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        let own = boundary.cast_entry(&ray, 10.0).unwrap();
        assert!(boundary.test_enter(&ray, &own));

        let foreign = SurfaceHit {
            surface: SurfaceId::fresh(),
            ..own
        };
        assert!(!boundary.test_enter(&ray, &foreign));
    }

    #[test]
    fn test_exit_none_while_inside() {
        let boundary = unit_boundary();
        let ray = Ray::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0));
        // A 0.1 step from the centre stays well inside the unit cuboid.
        assert!(boundary.test_exit(&ray, 0.1).is_none());
    }

    #[test]
    fn test_exit_reports_flipped_outward_normal() {
        let boundary = unit_boundary();
        // 0.05 from the +z face, stepping 0.1 crosses it.
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.95), Vector3::new(0.0, 0.0, 1.0));
        let hit = boundary.test_exit(&ray, 0.1).expect("step must exit");
        assert_relative_eq!(hit.point.z, 1.0, epsilon = 1e-12);
        // The +z face's raw outward normal is +z; the probe's flip hands the
        // tracer the opposite sense.
        assert_relative_eq!(hit.normal.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_entry_cast_bounded() {
        let boundary = unit_boundary();
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(boundary.cast_entry(&ray, 3.0).is_none());
        let hit = boundary.cast_entry(&ray, 10.0).unwrap();
        assert_relative_eq!(hit.point.z, -1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.normal.z, -1.0, epsilon = 1e-12);
    }
}
