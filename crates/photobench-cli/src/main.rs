//! Photobench command-line interface.
//!
//! Propagate a laser through a bench described in TOML:
//! ```sh
//! photobench run bench.toml
//! photobench validate bench.toml
//! photobench profile bench.toml --z 0.1
//! photobench components
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photobench")]
#[command(about = "Photobench: Gaussian beam propagation through optical benches")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate a bench and report every stage.
    Run {
        /// Path to the bench description.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a bench description without propagating it.
    Validate {
        /// Path to the bench description.
        config: PathBuf,
    },
    /// Sample the transverse intensity profile of the final stage.
    Profile {
        /// Path to the bench description.
        config: PathBuf,
        /// Axial distance from the waist (m).
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        z: f64,
        /// Largest radial offset to sample (m). Defaults to twice the spot radius.
        #[arg(long)]
        r_max: Option<f64>,
        /// Number of radial samples.
        #[arg(long, default_value_t = 50)]
        samples: usize,
    },
    /// List the component kinds a bench file may use.
    Components,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Photobench");
            println!("==========");
            let bench = config::load_config(&config)?;
            println!("Configuration: {}", config.display());
            println!();

            let result = runner::run_bench(&bench)?;
            runner::print_report(&result);

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&bench.output.directory));

            if bench.output.save_csv {
                runner::write_stages_csv(&result, &out_dir.join("stages.csv"), &bench)?;
            }
            if bench.output.save_json {
                runner::write_stages_json(&result, &out_dir.join("stages.json"))?;
            }

            println!("Propagation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let bench = config::load_config(&config)?;
            let built = bench.build_bench()?;
            println!(
                "Configuration is valid: {} ({} stages)",
                config.display(),
                built.len()
            );
            Ok(())
        }
        Commands::Profile {
            config,
            z,
            r_max,
            samples,
        } => {
            let bench = config::load_config(&config)?;
            let result = runner::run_bench(&bench)?;
            runner::print_profile(&result, z, r_max, samples)
        }
        Commands::Components => {
            println!("Available component kinds:");
            println!();
            for (kind, description) in config::COMPONENT_KINDS {
                println!("  {:<22} {}", kind, description);
            }
            Ok(())
        }
    }
}
