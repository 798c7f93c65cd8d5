//! GRIN command-line interface.
//!
//! Trace rays through gradient-index media from TOML job files:
//! ```sh
//! grin-cli run job.toml
//! grin-cli validate job.toml
//! grin-cli fields
//! ```

mod config;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use grin_core::FieldRegistry;

#[derive(Parser)]
#[command(name = "grin-cli")]
#[command(about = "GRIN: Gradient-Index Ray Propagation Framework")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace a ray from a TOML job file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a job file without tracing.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the built-in field variant registry.
    Fields,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            let job = config::load_config(&config)?;
            println!("Job: {}", config.display());

            let result = runner::run_trace(&job)?;
            println!(
                "Trace: {} segments, {} polyline points ({})",
                result.segments,
                result.points.len(),
                if result.exited {
                    "exited"
                } else {
                    "truncated at cap"
                }
            );

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));
            std::fs::create_dir_all(&out_dir)?;

            if job.output.save_csv {
                let csv_path = out_dir.join("trace.csv");
                runner::write_polyline_csv(&result, &csv_path)?;
                println!("Wrote {}", csv_path.display());
            }
            if job.output.save_json {
                let json_path = out_dir.join("trace.json");
                runner::write_polyline_json(&result, &json_path)?;
                println!("Wrote {}", json_path.display());
            }
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            // Construct everything so parameter errors surface here, not
            // mid-run.
            let _medium = runner::build_medium(&job)?;
            println!("Configuration is valid: {}", config.display());
            Ok(())
        }
        Commands::Fields => {
            println!("Built-in field variants (selectable by index):");
            println!();
            let registry = FieldRegistry::builtin();
            for (index, name) in registry.names().enumerate() {
                println!("  [{index}] {name}");
            }
            println!();
            println!("Custom value/gradient distributions are registered via the library API.");
            Ok(())
        }
    }
}
