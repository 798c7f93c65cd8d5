//! TOML configuration deserialisation for trace jobs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub medium: MediumConfig,
    pub ray: RayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The medium: a containing shape plus a field variant.
#[derive(Debug, Deserialize)]
pub struct MediumConfig {
    /// Shape specification, tagged by `type` ("Cuboid" or "Sphere").
    pub shape: grin_geometry::Shape,
    /// Field specification, tagged by `variant`.
    pub field: FieldConfig,
}

/// A built-in field variant and its parameters.
///
/// The custom-distribution escape hatch holds closures and is only reachable
/// through the library API, not from configuration.
#[derive(Debug, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum FieldConfig {
    Uniform {
        index: f64,
    },
    Axial {
        min: f64,
        max: f64,
        radius: f64,
        axis: [f64; 3],
    },
    SphericalStep {
        inner: f64,
        radius: f64,
    },
    SphericalLinear {
        min: f64,
        max: f64,
        radius: f64,
    },
    SphericalQuadratic {
        min: f64,
        max: f64,
        radius: f64,
    },
}

/// The incident ray and trace parameters.
#[derive(Debug, Deserialize)]
pub struct RayConfig {
    pub origin: [f64; 3],
    pub direction: [f64; 3],
    /// Refractive index of the surrounding space.
    #[serde(default = "default_outside_index")]
    pub outside_index: f64,
    /// Interior marching step size.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Free-flight length: the entry search bound and the rendered tail
    /// beyond the last segment.
    #[serde(default = "default_length")]
    pub length: f64,
}

fn default_outside_index() -> f64 {
    1.0
}
fn default_step() -> f64 {
    0.1
}
fn default_length() -> f64 {
    10.0
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: String,
    #[serde(default = "default_true")]
    pub save_csv: bool,
    #[serde(default)]
    pub save_json: bool,
}

fn default_output_dir() -> String {
    "output".into()
}
fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

/// Load and parse a job configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<JobConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
    let config: JobConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let text = r#"
            [medium.shape]
            type = "Cuboid"
            centre = [0.0, 0.0, 0.0]
            half_extents = [1.0, 1.0, 1.0]

            [medium.field]
            variant = "spherical-linear"
            min = 1.0
            max = 2.0
            radius = 1.5

            [ray]
            origin = [0.0, 0.0, -3.0]
            direction = [0.0, 0.0, 1.0]
        "#;
        let config: JobConfig = toml::from_str(text).unwrap();
        assert!(matches!(
            config.medium.field,
            FieldConfig::SphericalLinear { .. }
        ));
        assert_eq!(config.ray.outside_index, 1.0);
        assert_eq!(config.ray.step, 0.1);
        assert_eq!(config.ray.length, 10.0);
        assert!(config.output.save_csv);
    }
}
