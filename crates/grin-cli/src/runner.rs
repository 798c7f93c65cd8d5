//! Trace runner: ties together geometry, fields, and the tracer.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::Vector3;

use grin_core::field::GradientField;
use grin_core::medium::LensMedium;
use grin_geometry::{BoundarySurface, Ray};

use crate::config::{FieldConfig, JobConfig};

/// Results from a trace run.
pub struct TraceOutput {
    /// The connected polyline, including the host-side origin and the
    /// projected tail point.
    pub points: Vec<Vector3<f64>>,
    /// Number of trace segments inside the medium (0 if the ray missed).
    pub segments: usize,
    /// Whether the trace confirmed an exit (true for a miss as well).
    pub exited: bool,
}

/// Build a gradient field from its configuration.
pub fn build_field(config: &FieldConfig) -> Result<GradientField> {
    let field = match *config {
        FieldConfig::Uniform { index } => GradientField::uniform(index),
        FieldConfig::Axial {
            min,
            max,
            radius,
            axis,
        } => GradientField::axial(min, max, radius, Vector3::new(axis[0], axis[1], axis[2])),
        FieldConfig::SphericalStep { inner, radius } => GradientField::spherical_step(inner, radius),
        FieldConfig::SphericalLinear { min, max, radius } => {
            GradientField::spherical_linear(min, max, radius)
        }
        FieldConfig::SphericalQuadratic { min, max, radius } => {
            GradientField::spherical_quadratic(min, max, radius)
        }
    };
    field.context("Invalid field configuration")
}

/// Build a medium from its configuration.
pub fn build_medium(config: &JobConfig) -> Result<LensMedium> {
    let boundary =
        BoundarySurface::new(config.medium.shape.clone()).context("Invalid shape configuration")?;
    let field = build_field(&config.medium.field)?;
    Ok(LensMedium::new(boundary, field))
}

/// Run a full trace from a parsed job configuration.
pub fn run_trace(job: &JobConfig) -> Result<TraceOutput> {
    let medium = build_medium(job)?;

    let origin = Vector3::from(job.ray.origin);
    let direction = Vector3::from(job.ray.direction);
    anyhow::ensure!(
        direction.norm() > 0.0,
        "Ray direction must be a non-zero vector"
    );
    let incident = Ray::new(origin, direction);

    // The host-side collision query: where does the free ray first strike
    // the medium?
    let Some(entry) = medium.boundary().cast_entry(&incident, job.ray.length) else {
        // Hits nothing: the rendered line is just the free flight.
        log::debug!("incident ray misses the medium");
        return Ok(TraceOutput {
            points: vec![incident.origin, incident.point_at(job.ray.length)],
            segments: 0,
            exited: true,
        });
    };

    let trace = medium.interact(&incident, &entry, job.ray.outside_index, job.ray.step);
    log::debug!(
        "trace produced {} segments (exited: {})",
        trace.segments().len(),
        trace.exited()
    );

    let mut points = vec![incident.origin];
    points.extend(trace.polyline(job.ray.length));
    Ok(TraceOutput {
        points,
        segments: trace.segments().len(),
        exited: trace.exited(),
    })
}

/// Write the polyline as CSV (one `x,y,z` row per point).
pub fn write_polyline_csv(output: &TraceOutput, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "x,y,z")?;
    for p in &output.points {
        writeln!(file, "{},{},{}", p.x, p.y, p.z)?;
    }
    Ok(())
}

/// Write the polyline and trace metadata as JSON.
pub fn write_polyline_json(output: &TraceOutput, path: &Path) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonTrace {
        exited: bool,
        segments: usize,
        points: Vec<[f64; 3]>,
    }

    let doc = JsonTrace {
        exited: output.exited,
        segments: output.segments,
        points: output.points.iter().map(|p| [p.x, p.y, p.z]).collect(),
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, &doc)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    fn job_from(text: &str) -> JobConfig {
        toml::from_str(text).unwrap()
    }

    const SLAB_JOB: &str = r#"
        [medium.shape]
        type = "Cuboid"
        centre = [0.0, 0.0, 0.0]
        half_extents = [1.0, 1.0, 1.0]

        [medium.field]
        variant = "uniform"
        index = 2.0

        [ray]
        origin = [0.0, 0.0, -3.0]
        direction = [0.0, 0.0, 1.0]
    "#;

    #[test]
    fn test_run_trace_through_slab() {
        let job = job_from(SLAB_JOB);
        let output = run_trace(&job).unwrap();
        assert!(output.exited);
        assert!(output.segments >= 2);
        // Host origin + segment origins + projected tail.
        assert_eq!(output.points.len(), output.segments + 2);
    }

    #[test]
    fn test_run_trace_miss_is_free_flight() {
        let mut job = job_from(SLAB_JOB);
        job.ray.origin = [5.0, 5.0, -3.0];
        let output = run_trace(&job).unwrap();
        assert_eq!(output.segments, 0);
        assert_eq!(output.points.len(), 2);
    }

    #[test]
    fn test_bad_field_parameters_fail_construction() {
        let mut job = job_from(SLAB_JOB);
        job.medium.field = crate::config::FieldConfig::Uniform { index: -1.0 };
        assert!(run_trace(&job).is_err());
    }

    #[test]
    fn test_load_config_rejects_missing_file() {
        assert!(load_config(Path::new("does-not-exist.toml")).is_err());
    }
}
