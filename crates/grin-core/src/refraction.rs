//! Snell's-law refraction as a direction law.
//!
//! Rather than the usual vector decomposition, the direction is built by
//! rotating the (canonicalised) surface normal about the incidence plane's
//! axis by the refracted angle:
//!
//! $$ \sin\theta_2 = \frac{n_1}{n_2} \sin\theta_1 $$
//!
//! When no real refraction angle exists ($\sin\theta_2 > 1$) the ray
//! undergoes total internal reflection and the incident angle is mirrored
//! about the normal instead.

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Axis magnitudes below this are treated as a degenerate incidence plane
/// (incident direction parallel to the normal).
const AXIS_EPSILON: f64 = 1e-12;

/// Compute the travel direction after a refraction event.
///
/// # Arguments
/// * `incident` - Incoming travel direction (unit length).
/// * `normal` - Surface normal at the event; either orientation is accepted,
///   it is canonicalised to oppose the direction of travel.
/// * `n1` - Refractive index on the incident side.
/// * `n2` - Refractive index on the far side.
///
/// # Returns
/// The refracted direction, or the reflected direction under total internal
/// reflection. Unit length in either case.
pub fn refract(incident: &Vector3<f64>, normal: &Vector3<f64>, n1: f64, n2: f64) -> Vector3<f64> {
    // Same index on both sides: nothing to refract.
    if n1 == n2 {
        return *incident;
    }

    // Canonicalise: the normal must make more than 90° with the incident
    // direction.
    let normal = if incident.dot(normal) > 0.0 {
        -normal
    } else {
        *normal
    };

    let cross = normal.cross(&-incident);
    let sin_theta1 = cross.norm();
    let sin_theta2 = (n1 / n2) * sin_theta1;

    // Parallel incidence: the rotation axis vanishes and both angles are
    // zero, so the ray continues straight through.
    let Some(axis) = Unit::try_new(cross, AXIS_EPSILON) else {
        return *incident;
    };

    if sin_theta2 > 1.0 {
        // Total internal reflection: mirror the incident angle about the
        // normal.
        let rotation = UnitQuaternion::from_axis_angle(&axis, -sin_theta1.asin());
        (rotation * normal).normalize()
    } else {
        let rotation = UnitQuaternion::from_axis_angle(&axis, sin_theta2.asin());
        (rotation * -normal).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matched_indices_pass_through() {
        let incident = Vector3::new(0.6, 0.0, 0.8);
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let out = refract(&incident, &normal, 1.5, 1.5);
        assert_eq!(out, incident);
    }

    #[test]
    fn test_result_is_unit_length() {
        let angles = [5.0_f64, 20.0, 40.0, 60.0, 80.0];
        for deg in angles {
            let theta = deg.to_radians();
            let incident = Vector3::new(theta.sin(), 0.0, -theta.cos());
            let normal = Vector3::new(0.0, 0.0, 1.0);
            for (n1, n2) in [(1.0, 1.5), (1.5, 1.0), (2.0, 1.3)] {
                let out = refract(&incident, &normal, n1, n2);
                assert_relative_eq!(out.norm(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_snell_angle() {
        // 30° incidence, n1=1 -> n2=1.5: sin(theta2) = 0.5/1.5.
        let theta1 = 30.0_f64.to_radians();
        let incident = Vector3::new(theta1.sin(), 0.0, -theta1.cos());
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let out = refract(&incident, &normal, 1.0, 1.5);

        let expected_sin = 0.5 / 1.5;
        // Angle between the refracted direction and the inward normal.
        let cos_theta2 = out.dot(&-normal);
        let sin_theta2 = (1.0 - cos_theta2 * cos_theta2).sqrt();
        assert_relative_eq!(sin_theta2, expected_sin, epsilon = 1e-9);
        // Refraction stays in the incidence plane and bends toward the
        // normal.
        assert_relative_eq!(out.y, 0.0, epsilon = 1e-12);
        assert!(out.x > 0.0 && out.z < 0.0);
    }

    #[test]
    fn test_total_internal_reflection_obeys_reflection_law() {
        // 60° incidence from glass (1.5) toward air (1.0):
        // sin(theta2) = 1.5 * sin(60°) = 1.299 > 1, so TIR must trigger.
        let theta1 = 60.0_f64.to_radians();
        let incident = Vector3::new(theta1.sin(), 0.0, -theta1.cos());
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let out = refract(&incident, &normal, 1.5, 1.0);

        // Law of reflection: r = d - 2 (d·n) n.
        let expected = incident - normal * (2.0 * incident.dot(&normal));
        assert_relative_eq!(out.x, expected.x, epsilon = 1e-9);
        assert_relative_eq!(out.y, expected.y, epsilon = 1e-9);
        assert_relative_eq!(out.z, expected.z, epsilon = 1e-9);
    }

    #[test]
    fn test_normal_orientation_is_canonicalised() {
        // Flipping the supplied normal must not change the result.
        let theta1 = 30.0_f64.to_radians();
        let incident = Vector3::new(theta1.sin(), 0.0, -theta1.cos());
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let a = refract(&incident, &normal, 1.0, 1.5);
        let b = refract(&incident, &(-normal), 1.0, 1.5);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }

    #[test]
    fn test_normal_incidence_degenerates_to_straight_through() {
        let incident = Vector3::new(0.0, 0.0, -1.0);
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let out = refract(&incident, &normal, 1.0, 1.5);
        assert_eq!(out, incident);
    }
}
