//! Cost Estimator
//!
//! Prices infrastructure requirements described in JSON, compares alternative
//! configurations, and inspects the pricing data behind the numbers.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_estimation::PricingFilter;
use eyre::Result;
use std::path::PathBuf;
use tracing::info;

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "cost-estimator")]
#[command(about = "Estimate and compare cloud infrastructure costs")]
struct Cli {
    /// JSON snapshot of pricing records (overrides PRICING_FILE)
    #[arg(long, global = true)]
    pricing_file: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when the command finishes
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate monthly and annual cost for a set of requirements
    Calculate {
        /// Input file with `requirements`, optional `region` and `duration` (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Region to price in
        #[arg(short, long)]
        region: Option<String>,

        /// Estimation duration in months
        #[arg(short, long)]
        duration: Option<u32>,
    },

    /// Compare two or more configurations
    Compare {
        /// Input file with `configurations` and optional `region` (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Region to price in
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Show built-in default prices and recommendation rules
    Defaults,

    /// List pricing records from the pricing file
    Pricing {
        #[arg(short, long)]
        service: Option<String>,

        #[arg(short, long)]
        type_key: Option<String>,

        #[arg(short, long)]
        region: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();

    let config = Config::load(cli.pricing_file.clone())?;
    init_tracing(&config.environment);

    observability::init_metrics();

    let service = commands::build_service(&config.estimator).await?;

    let output = match cli.command {
        Commands::Calculate {
            input,
            region,
            duration,
        } => {
            let body = commands::read_input(&input)?;
            commands::calculate(&service, &config.estimator, &body, region, duration).await?
        }

        Commands::Compare { input, region } => {
            let body = commands::read_input(&input)?;
            commands::compare(&service, &config.estimator, &body, region).await?
        }

        Commands::Defaults => commands::defaults()?,

        Commands::Pricing {
            service: service_name,
            type_key,
            region,
        } => {
            let filter = PricingFilter {
                service: service_name,
                type_key,
                region,
            };
            commands::pricing(&service, filter).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    info!("Command completed");

    if cli.print_metrics {
        eprintln!("{}", observability::render_metrics());
    }

    Ok(())
}
