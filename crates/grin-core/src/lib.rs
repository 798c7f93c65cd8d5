//! # GRIN Core
//!
//! The ray-propagation core of the GRIN framework. This crate simulates
//! light travelling through gradient-index media: volumes whose refractive
//! index varies continuously with position, bending rays along curved paths
//! rather than only at discrete surfaces.
//!
//! ## Architecture
//!
//! A medium is the composition of two independent capability sets: an index
//! distribution ([`field::GradientField`] — local index value and
//! steepest-change direction) and a containing shape
//! ([`grin_geometry::BoundarySurface`] — entry filtering and exit probing).
//! They are joined only inside [`medium::LensMedium`]. The tracer
//! ([`tracer::interact`]) marches a refracted ray through the volume in
//! fixed steps, applying Snell's law ([`refraction::refract`]) at the
//! boundary and a finite-difference bending approximation inside.
//!
//! ## Modules
//!
//! - [`refraction`] — Snell's-law / total-internal-reflection direction law.
//! - [`field`] — Gradient-index distribution variants.
//! - [`medium`] — Medium composition and the runtime variant registry.
//! - [`tracer`] — Step-wise interior marching and trace assembly.

pub mod field;
pub mod medium;
pub mod refraction;
pub mod tracer;

pub use field::{FieldError, GradientField};
pub use medium::{FieldRegistry, LensMedium};
pub use tracer::{interact, Trace};
