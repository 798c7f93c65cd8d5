//! Gradient-index distribution variants.
//!
//! A [`GradientField`] answers two local questions at a position expressed
//! relative to the medium's centre: the scalar refractive index there, and
//! the direction of steepest index change (the zero vector where the index
//! is locally constant). Five parametric profiles are built in; the
//! [`GradientField::custom`] escape hatch accepts an injected value/gradient
//! function pair.
//!
//! All interpolation is *unclamped*: positions past a profile's nominal
//! radius extrapolate index values outside the configured `[min, max]`
//! range. This mirrors the physical setups the profiles were fitted to and
//! is relied upon by the tracer.

use std::fmt;
use std::sync::Arc;

use nalgebra::{Unit, Vector3};
use thiserror::Error;

/// Errors from gradient-field construction.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Refractive index '{name}' must be positive and finite, got {value}")]
    InvalidIndex { name: &'static str, value: f64 },

    #[error("Profile radius must be positive and finite, got {value}")]
    InvalidRadius { value: f64 },

    #[error("Axial profile requires a non-zero gradient axis")]
    ZeroAxis,
}

/// Signature of an injected index-value sampler.
pub type ValueFn = dyn Fn(&Vector3<f64>) -> f64 + Send + Sync;
/// Signature of an injected gradient-direction sampler.
pub type GradientFn = dyn Fn(&Vector3<f64>) -> Vector3<f64> + Send + Sync;

/// A gradient-index distribution over a medium's interior.
///
/// Positions handed to the sampling methods are relative to the medium's
/// centre.
#[derive(Clone)]
pub enum GradientField {
    /// Constant index everywhere; interior refraction is skipped entirely.
    Uniform { index: f64 },
    /// Index falls off linearly with distance from a central axis.
    Axial {
        min: f64,
        max: f64,
        radius: f64,
        axis: Unit<Vector3<f64>>,
    },
    /// Constant `inner` index inside `radius`, 1 outside, with a hard step.
    SphericalStep { inner: f64, radius: f64 },
    /// Index falls off linearly with distance from the centre.
    SphericalLinear { min: f64, max: f64, radius: f64 },
    /// Index falls off quadratically from `max` at the centre to `min` at
    /// `radius`, constant beyond.
    SphericalQuadratic { min: f64, max: f64, radius: f64 },
    /// Injected value/gradient function pair.
    Custom {
        value: Arc<ValueFn>,
        gradient: Arc<GradientFn>,
    },
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn check_index(name: &'static str, value: f64) -> Result<(), FieldError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FieldError::InvalidIndex { name, value })
    }
}

fn check_radius(value: f64) -> Result<(), FieldError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FieldError::InvalidRadius { value })
    }
}

impl GradientField {
    /// Constant-index medium.
    pub fn uniform(index: f64) -> Result<Self, FieldError> {
        check_index("index", index)?;
        Ok(Self::Uniform { index })
    }

    /// Axial profile: index `max` on the axis, `min` at distance `radius`
    /// from it.
    pub fn axial(min: f64, max: f64, radius: f64, axis: Vector3<f64>) -> Result<Self, FieldError> {
        check_index("min", min)?;
        check_index("max", max)?;
        check_radius(radius)?;
        let axis = Unit::try_new(axis, 1e-12).ok_or(FieldError::ZeroAxis)?;
        Ok(Self::Axial {
            min,
            max,
            radius,
            axis,
        })
    }

    /// Hard spherical step: `inner` inside `radius`, 1 outside.
    pub fn spherical_step(inner: f64, radius: f64) -> Result<Self, FieldError> {
        check_index("inner", inner)?;
        check_radius(radius)?;
        Ok(Self::SphericalStep { inner, radius })
    }

    /// Radial profile: index `max` at the centre, `min` at `radius`.
    pub fn spherical_linear(min: f64, max: f64, radius: f64) -> Result<Self, FieldError> {
        check_index("min", min)?;
        check_index("max", max)?;
        check_radius(radius)?;
        Ok(Self::SphericalLinear { min, max, radius })
    }

    /// Quadratic radial profile: `max` at the centre falling to `min` at
    /// `radius`, constant beyond.
    pub fn spherical_quadratic(min: f64, max: f64, radius: f64) -> Result<Self, FieldError> {
        check_index("min", min)?;
        check_index("max", max)?;
        check_radius(radius)?;
        Ok(Self::SphericalQuadratic { min, max, radius })
    }

    /// Injected distribution.
    ///
    /// `value` must return a finite, strictly positive index — this cannot
    /// be validated up front, so it is asserted at the point of use.
    /// `gradient` should return the zero vector or a unit-length direction;
    /// any vector with squared magnitude below the tracer's cutoff is
    /// treated as "no local gradient".
    pub fn custom(value: Arc<ValueFn>, gradient: Arc<GradientFn>) -> Self {
        Self::Custom { value, gradient }
    }

    /// True only for the [`GradientField::Uniform`] variant, letting the
    /// tracer skip interior refraction entirely.
    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform { .. })
    }

    /// Local refractive index at `pos` (relative to the medium's centre).
    pub fn sample_value(&self, pos: &Vector3<f64>) -> f64 {
        match self {
            Self::Uniform { index } => *index,
            Self::Axial {
                min,
                max,
                radius,
                axis,
            } => {
                let off_axis = pos - axis.as_ref() * pos.dot(axis);
                lerp(*max, *min, off_axis.norm() / radius)
            }
            Self::SphericalStep { inner, radius } => {
                if pos.norm() < *radius {
                    *inner
                } else {
                    1.0
                }
            }
            Self::SphericalLinear { min, max, radius } => lerp(*max, *min, pos.norm() / radius),
            Self::SphericalQuadratic { min, max, radius } => {
                let t = (pos.norm() / radius).clamp(0.0, 1.0) - 1.0;
                lerp(*min, *max, t * t)
            }
            Self::Custom { value, .. } => {
                let n = value(pos);
                assert!(
                    n.is_finite() && n > 0.0,
                    "custom distribution returned invalid refractive index {n} at {pos:?}"
                );
                n
            }
        }
    }

    /// Direction of steepest index change at `pos`, or the zero vector where
    /// the index is locally constant.
    pub fn gradient_direction(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        match self {
            Self::Uniform { .. } => Vector3::zeros(),
            Self::Axial { axis, .. } => {
                let off_axis = pos - axis.as_ref() * pos.dot(axis);
                normalize_or_zero(off_axis)
            }
            Self::SphericalStep { radius, .. } => {
                if pos.norm() > *radius {
                    Vector3::zeros()
                } else {
                    normalize_or_zero(*pos)
                }
            }
            Self::SphericalLinear { .. } | Self::SphericalQuadratic { .. } => {
                normalize_or_zero(*pos)
            }
            Self::Custom { gradient, .. } => gradient(pos),
        }
    }
}

fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    Unit::try_new(v, 1e-12)
        .map(Unit::into_inner)
        .unwrap_or_else(Vector3::zeros)
}

impl fmt::Debug for GradientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform { index } => f.debug_struct("Uniform").field("index", index).finish(),
            Self::Axial {
                min,
                max,
                radius,
                axis,
            } => f
                .debug_struct("Axial")
                .field("min", min)
                .field("max", max)
                .field("radius", radius)
                .field("axis", axis)
                .finish(),
            Self::SphericalStep { inner, radius } => f
                .debug_struct("SphericalStep")
                .field("inner", inner)
                .field("radius", radius)
                .finish(),
            Self::SphericalLinear { min, max, radius } => f
                .debug_struct("SphericalLinear")
                .field("min", min)
                .field("max", max)
                .field("radius", radius)
                .finish(),
            Self::SphericalQuadratic { min, max, radius } => f
                .debug_struct("SphericalQuadratic")
                .field("min", min)
                .field("max", max)
                .field("radius", radius)
                .finish(),
            Self::Custom { .. } => f.write_str("Custom { .. }"),
        }
    }
}
