//! Medium composition and the runtime variant registry.
//!
//! A [`LensMedium`] joins one boundary surface with one gradient field. The
//! field is held behind an atomically replaceable, read-mostly handle so a
//! host can switch distribution variants at runtime: a trace clones the
//! handle once up front and samples one consistent field object throughout,
//! even if a replacement lands mid-trace.

use std::sync::{Arc, PoisonError, RwLock};

use grin_geometry::{BoundarySurface, Ray, SurfaceHit};

use crate::field::GradientField;
use crate::tracer::{self, Trace};

/// A single optical object: a containing shape plus an index distribution.
#[derive(Debug)]
pub struct LensMedium {
    boundary: BoundarySurface,
    field: RwLock<Arc<GradientField>>,
}

impl LensMedium {
    /// Compose a boundary and a field into a medium.
    pub fn new(boundary: BoundarySurface, field: GradientField) -> Self {
        Self {
            boundary,
            field: RwLock::new(Arc::new(field)),
        }
    }

    /// The medium's containing shape.
    pub fn boundary(&self) -> &BoundarySurface {
        &self.boundary
    }

    /// Snapshot the current field handle.
    ///
    /// The returned `Arc` stays valid for the caller's whole computation
    /// regardless of concurrent [`set_field`](Self::set_field) calls.
    pub fn field(&self) -> Arc<GradientField> {
        // The lock only ever guards an Arc swap, so a poisoned lock still
        // holds a consistent value.
        self.field
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the field wholesale. In-flight traces keep their snapshot.
    pub fn set_field(&self, field: Arc<GradientField>) {
        *self.field.write().unwrap_or_else(PoisonError::into_inner) = field;
    }

    /// True iff `hit` is a collision against this medium's own shape.
    pub fn test_enter(&self, ray: &Ray, hit: &SurfaceHit) -> bool {
        self.boundary.test_enter(ray, hit)
    }

    /// Trace a ray through this medium from an entry event.
    ///
    /// Snapshots the field once; see [`tracer::interact`] for the marching
    /// contract.
    pub fn interact(
        &self,
        incident: &Ray,
        entry: &SurfaceHit,
        outside_index: f64,
        step: f64,
    ) -> Trace {
        let field = self.field();
        tracer::interact(&self.boundary, &field, incident, entry, outside_index, step)
    }
}

/// An ordered, index-addressed registry of named field variants.
///
/// Hosts drive runtime variant switching through this: selecting an index
/// replaces the medium's field handle atomically. The registry is never
/// empty, and an out-of-range index falls back to entry 0 (the uniform
/// profile), matching the behavior hosts already rely on.
#[derive(Debug)]
pub struct FieldRegistry {
    entries: Vec<(String, Arc<GradientField>)>,
}

impl FieldRegistry {
    /// The built-in variant set, in its fixed order: `uniform`, `axial`,
    /// `spherical-step`, `spherical-linear`, `spherical-quadratic`.
    pub fn builtin() -> Self {
        let x_axis = nalgebra::Vector3::new(1.0, 0.0, 0.0);
        let entries = vec![
            ("uniform", GradientField::uniform(2.0)),
            ("axial", GradientField::axial(1.0, 2.0, 1.5, x_axis)),
            ("spherical-step", GradientField::spherical_step(2.0, 1.5)),
            ("spherical-linear", GradientField::spherical_linear(1.0, 2.0, 1.5)),
            (
                "spherical-quadratic",
                GradientField::spherical_quadratic(1.0, 2.0, 1.5),
            ),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(name, field)| {
                    let field = field.expect("builtin field parameters are valid");
                    (name.to_string(), Arc::new(field))
                })
                .collect(),
        }
    }

    /// Append a named variant (e.g. a custom distribution) to the registry.
    pub fn register(&mut self, name: impl Into<String>, field: GradientField) {
        self.entries.push((name.into(), Arc::new(field)));
    }

    /// Variant names, in registry order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The field registered at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Arc<GradientField>> {
        self.entries.get(index).map(|(_, field)| field)
    }

    /// Look up a variant by name.
    pub fn by_name(&self, name: &str) -> Option<&Arc<GradientField>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    /// Install the variant at `index` into `medium`, replacing its field
    /// handle atomically. Out-of-range indices fall back to entry 0.
    /// Returns the name of the variant installed.
    pub fn select(&self, index: usize, medium: &LensMedium) -> &str {
        let (name, field) = self.entries.get(index).unwrap_or(&self.entries[0]);
        medium.set_field(field.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grin_geometry::{Cuboid, Shape};
    use nalgebra::Vector3;

    fn medium() -> LensMedium {
        let boundary = BoundarySurface::new(Shape::Cuboid(Cuboid {
            centre: [0.0, 0.0, 0.0],
            half_extents: [1.0, 1.0, 1.0],
        }))
        .unwrap();
        LensMedium::new(boundary, GradientField::uniform(2.0).unwrap())
    }

    #[test]
    fn test_builtin_registry_order() {
        let registry = FieldRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            [
                "uniform",
                "axial",
                "spherical-step",
                "spherical-linear",
                "spherical-quadratic"
            ]
        );
    }

    #[test]
    fn test_select_replaces_field_handle() {
        let medium = medium();
        let registry = FieldRegistry::builtin();

        let before = medium.field();
        assert!(before.is_uniform());

        let name = registry.select(3, &medium);
        assert_eq!(name, "spherical-linear");
        assert!(!medium.field().is_uniform());

        // The earlier snapshot is untouched by the swap.
        assert!(before.is_uniform());
    }

    #[test]
    fn test_select_out_of_range_falls_back_to_uniform() {
        let medium = medium();
        let registry = FieldRegistry::builtin();
        registry.select(3, &medium);
        let name = registry.select(99, &medium);
        assert_eq!(name, "uniform");
        assert!(medium.field().is_uniform());
    }

    #[test]
    fn test_medium_interact_uses_current_field() {
        let medium = medium();
        let incident = Ray::new(Vector3::new(0.0, 0.0, -3.0), Vector3::new(0.0, 0.0, 1.0));
        let entry = medium.boundary().cast_entry(&incident, 10.0).unwrap();
        assert!(medium.test_enter(&incident, &entry));

        let trace = medium.interact(&incident, &entry, 1.0, 0.1);
        assert!(trace.exited());
        assert!(trace.segments().len() >= 2);
    }
}
