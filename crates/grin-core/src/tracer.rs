//! Step-wise ray marching through a gradient-index medium.
//!
//! [`interact`] turns one entry event into an ordered trace of ray segments:
//! an entry refraction, a bounded interior march with a continuous bending
//! approximation, and exit (or internal-reflection) handling at each
//! boundary crossing.
//!
//! The interior bending is a first-order integration of the ray equation:
//! at each step the field is sampled a half-step to either side of the local
//! gradient direction, and the pair of values is fed to the two-media
//! refraction law as a finite-difference stand-in for the continuous index
//! change. The step size trades path fidelity against segment count.

use nalgebra::Vector3;

use grin_geometry::{BoundarySurface, Ray, SurfaceHit};

use crate::field::GradientField;
use crate::refraction::refract;

/// Hard cap on interior iterations. Guarantees termination regardless of
/// field/geometry pathology; a capped trace is a valid, truncated result.
pub const MAX_INTERIOR_SEGMENTS: usize = 100;

/// Gradient directions with squared magnitude below this are treated as "no
/// local gradient" and the step proceeds unbent.
pub const GRADIENT_CUTOFF_SQ: f64 = 0.05;

/// The ordered segment sequence produced by one [`interact`] call.
///
/// Segment 0 is the entry-refracted ray at the entry point; each subsequent
/// interior segment's origin is the prior origin advanced one step along the
/// prior direction. Length is between 2 and [`MAX_INTERIOR_SEGMENTS`]` + 1`
/// segments.
#[derive(Debug, Clone)]
pub struct Trace {
    segments: Vec<Ray>,
    exited: bool,
}

impl Trace {
    /// The ordered ray segments.
    pub fn segments(&self) -> &[Ray] {
        &self.segments
    }

    /// The final segment. A trace is never empty.
    pub fn last(&self) -> &Ray {
        self.segments.last().expect("trace has at least two segments")
    }

    /// True if the trace ended with a confirmed exit refraction; false if it
    /// was truncated at the segment cap.
    pub fn exited(&self) -> bool {
        self.exited
    }

    /// The connected point sequence for rendering: every segment origin,
    /// plus a final endpoint projected `tail_length` along the last
    /// segment's direction.
    pub fn polyline(&self, tail_length: f64) -> Vec<Vector3<f64>> {
        let mut points: Vec<Vector3<f64>> = self.segments.iter().map(|s| s.origin).collect();
        points.push(self.last().point_at(tail_length));
        points
    }
}

/// Propagate a ray through a medium, from one entry event to exit (or cap).
///
/// # Arguments
/// * `boundary` - The medium's containing shape.
/// * `field` - The medium's index distribution; one consistent field object
///   is sampled for the whole trace.
/// * `incident` - The incoming ray that produced the entry event.
/// * `entry` - The entry collision against `boundary`.
/// * `outside_index` - Refractive index of the surrounding space.
/// * `step` - Interior marching step size.
pub fn interact(
    boundary: &BoundarySurface,
    field: &GradientField,
    incident: &Ray,
    entry: &SurfaceHit,
    outside_index: f64,
    step: f64,
) -> Trace {
    let centre = boundary.centre();

    // Entry refraction at the boundary: outside index against the local
    // field value at the entry point.
    let n_entry = field.sample_value(&(entry.point - centre));
    let mut segments = vec![Ray {
        origin: entry.point,
        direction: refract(&incident.direction, &entry.normal, outside_index, n_entry),
    }];
    let mut exited = false;

    for _ in 0..MAX_INTERIOR_SEGMENTS {
        let last = segments.last().expect("entry segment is always present");

        if let Some(hit) = boundary.test_exit(last, step) {
            // Candidate exit: refract from the local field value back to the
            // outside index.
            let n_inside = field.sample_value(&(hit.point - centre));
            let direction = refract(&last.direction, &hit.normal, n_inside, outside_index);
            let leaving = direction.dot(&hit.normal) < 0.0;
            segments.push(Ray {
                origin: hit.point,
                direction,
            });
            if leaving {
                exited = true;
                break;
            }
            // Total internal reflection turned the ray back inward; keep
            // marching from the reflected segment.
        } else {
            let advanced = Ray {
                origin: last.point_at(step),
                direction: last.direction,
            };
            segments.push(bend_step(field, &centre, advanced, step));
        }
    }

    if !exited {
        log::debug!(
            "trace truncated at segment cap ({} interior segments) without a confirmed exit",
            MAX_INTERIOR_SEGMENTS
        );
    }

    Trace { segments, exited }
}

/// Apply the continuous bending approximation to one advanced interior ray.
///
/// Samples the field a half-step to either side of the local gradient
/// direction and refracts across that straddle. Uniform fields and
/// sub-cutoff gradients leave the direction unchanged.
fn bend_step(field: &GradientField, centre: &Vector3<f64>, ray: Ray, step: f64) -> Ray {
    if field.is_uniform() {
        return ray;
    }

    let local = ray.origin - centre;
    let mut gradient = field.gradient_direction(&local);
    if gradient.norm_squared() < GRADIENT_CUTOFF_SQ {
        return ray;
    }

    // The gradient, like a surface normal, must oppose the direction of
    // travel.
    if gradient.dot(&ray.direction) > 0.0 {
        gradient = -gradient;
    }

    let n1 = field.sample_value(&(local + gradient * (step / 2.0)));
    let n2 = field.sample_value(&(local - gradient * (step / 2.0)));

    Ray {
        origin: ray.origin,
        direction: refract(&ray.direction, &gradient, n1, n2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grin_geometry::{Cuboid, Shape};
    use nalgebra::Vector3;

    fn slab() -> BoundarySurface {
        BoundarySurface::new(Shape::Cuboid(Cuboid {
            centre: [0.0, 0.0, 0.0],
            half_extents: [1.0, 1.0, 1.0],
        }))
        .unwrap()
    }

    #[test]
    fn test_polyline_appends_projected_tail() {
        let boundary = slab();
        let field = GradientField::uniform(2.0).unwrap();
        let incident = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        let entry = boundary.cast_entry(&incident, 10.0).unwrap();
        let trace = interact(&boundary, &field, &incident, &entry, 1.0, 0.1);

        let points = trace.polyline(10.0);
        assert_eq!(points.len(), trace.segments().len() + 1);
        let tail = points[points.len() - 1] - trace.last().origin;
        assert!((tail.norm() - 10.0).abs() < 1e-9);
    }
}
