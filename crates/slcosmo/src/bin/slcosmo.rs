//! slcosmo CLI - infer H0 from strong-lens time-delay sample files.
//!
//! # Usage
//!
//! ```bash
//! # Write 40 mock lenses to ./mock/
//! slcosmo mock --lenses 40 --samples 100 --out mock
//!
//! # Infer H0 from a set of TDC2 sample files
//! slcosmo infer mock/*.txt --prior-samples 2000
//!
//! # Generate and analyze in one go, JSON output
//! slcosmo demo --lenses 40 --json
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use slcosmo::{generate_mock_lenses, mock_rng, output, write_tdc2_file, Config, InferenceResult, MockConfig, SLCosmo};

#[derive(Parser)]
#[command(name = "slcosmo")]
#[command(version)]
#[command(about = "Infer the Hubble constant from strong-lens time delays")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer H0 from TDC2 time-delay sample files
    Infer {
        /// TDC2 sample files, one per lens
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        inference: InferenceArgs,
    },

    /// Write mock TDC2 sample files with a known true H0
    Mock {
        #[command(flatten)]
        mock: MockArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// RNG seed
        #[arg(long, default_value_t = slcosmo::constants::DEFAULT_SEED)]
        seed: u64,
    },

    /// Generate mock lenses and infer H0 from them
    Demo {
        #[command(flatten)]
        mock: MockArgs,

        #[command(flatten)]
        inference: InferenceArgs,
    },
}

#[derive(Args)]
struct InferenceArgs {
    /// Prior mean of H0 (km/s/Mpc)
    #[arg(long, default_value_t = slcosmo::constants::DEFAULT_H0_PRIOR_MEAN)]
    prior_mean: f64,

    /// Prior width of H0 (km/s/Mpc)
    #[arg(long, default_value_t = slcosmo::constants::DEFAULT_H0_PRIOR_WIDTH)]
    prior_width: f64,

    /// Number of prior samples (must exceed 20)
    #[arg(long, default_value_t = slcosmo::constants::DEFAULT_PRIOR_SAMPLES)]
    prior_samples: usize,

    /// RNG seed for the prior draw
    #[arg(long, default_value_t = slcosmo::constants::DEFAULT_SEED)]
    seed: u64,

    /// Evaluate on a single thread
    #[arg(long)]
    serial: bool,

    /// Print the result as JSON instead of a report
    #[arg(long)]
    json: bool,
}

impl InferenceArgs {
    fn config(&self) -> Config {
        Config {
            h0_prior_mean: self.prior_mean,
            h0_prior_width: self.prior_width,
            num_prior_samples: self.prior_samples,
            seed: self.seed,
            parallel: !self.serial,
            ..Config::default()
        }
    }
}

#[derive(Args)]
struct MockArgs {
    /// Number of lenses
    #[arg(short, long, default_value = "10")]
    lenses: usize,

    /// Posterior time-delay samples per lens
    #[arg(short, long, default_value = "100")]
    samples: usize,

    /// Fermat potential error, percent
    #[arg(long, default_value = "4.0")]
    dfp_err: f64,

    /// Time-delay posterior width, days
    #[arg(long, default_value = "2.0")]
    dt_sigma: f64,
}

impl MockArgs {
    fn config(&self) -> MockConfig {
        MockConfig {
            percentage_dfp_err: self.dfp_err,
            dt_sigma: self.dt_sigma,
            ..MockConfig::new(self.lenses, self.samples)
        }
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn report(result: &InferenceResult, json: bool) -> Result<()> {
    if json {
        println!("{}", output::to_json_pretty(result)?);
    } else {
        println!("{}", output::format_result(result));
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Infer { files, inference } => {
            let config = inference.config();
            config.validate().context("Invalid inference settings")?;
            let result = SLCosmo::with_config(config)
                .load_lenses(&files[..])
                .context("Failed to load lens data")?
                .infer()
                .context("Inference failed")?;
            report(&result, inference.json)?;
        }

        Commands::Mock { mock, out, seed } => {
            fs::create_dir_all(&out)
                .with_context(|| format!("Failed to create {}", out.display()))?;
            let data = generate_mock_lenses(&mock.config(), &mut mock_rng(seed))?;
            for (k, lens) in data.lenses.iter().enumerate() {
                let path = out.join(format!("mock_time_delays_{}.txt", k));
                write_tdc2_file(lens, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            info!(
                "Wrote {} mock lenses (true H0 = {}) to {}",
                data.lenses.len(),
                data.true_h0,
                out.display()
            );
        }

        Commands::Demo { mock, inference } => {
            let config = inference.config();
            config.validate().context("Invalid inference settings")?;
            let result = SLCosmo::with_config(config)
                .with_mock_data(&mock.config())?
                .infer()
                .context("Inference failed")?;
            report(&result, inference.json)?;
        }
    }

    Ok(())
}
