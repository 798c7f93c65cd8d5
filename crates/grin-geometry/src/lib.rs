//! # GRIN Geometry
//!
//! Geometry handling for the GRIN ray-propagation framework. This crate
//! provides:
//!
//! - **Ray types** ([`ray`]) — Rays, surface-hit records, and surface
//!   identities shared with the host scene.
//! - **Parametric shapes** ([`shapes`]) — Closed volumes (cuboids, spheres)
//!   with containment and bounded ray-cast queries.
//! - **Boundary surfaces** ([`boundary`]) — Entry filtering and exit probing
//!   for a medium's containing shape.

pub mod boundary;
pub mod ray;
pub mod shapes;

pub use boundary::{BoundaryError, BoundarySurface};
pub use ray::{Ray, SurfaceHit, SurfaceId};
pub use shapes::{Cuboid, Shape, Sphere};
