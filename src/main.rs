use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_price_estimator::config::Config;
use home_price_estimator::estimator::Estimator;
use home_price_estimator::models::*;
use home_price_estimator::regressor::{LoadedModel, ModelArtifact};
use home_price_estimator::shell::FormSession;

#[derive(Parser)]
#[command(name = "hpest")]
#[command(about = "Estimate a home's sale price with a pre-trained regression model")]
struct Cli {
    /// Model artifact to load (overrides HOME_PRICE_MODEL and the config file)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Locale for the displayed price, e.g. en-US or de-DE
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the form interactively (default)
    Form,
    /// Estimate one house and print the price
    Estimate(EstimateArgs),
    /// Show the loaded model's metadata and input schema
    Inspect,
}

#[derive(Args)]
struct EstimateArgs {
    #[arg(long, default_value = "1")]
    bedrooms: Bedrooms,

    #[arg(long, default_value = "1")]
    bathrooms: Bathrooms,

    #[arg(long, default_value_t = 0, value_parser = whole_number())]
    square_feet: u64,

    /// Parking spaces: none or 0-5
    #[arg(long, default_value = "none")]
    parking_spaces: SpaceCount,

    /// Garage spaces: none or 0-5
    #[arg(long, default_value = "none")]
    garage_spaces: SpaceCount,

    #[arg(long)]
    corner_lot: bool,

    #[arg(long, default_value_t = 0, value_parser = whole_number())]
    lot_size: u64,

    #[arg(long)]
    waterfront: bool,

    /// Print the record and price as JSON
    #[arg(long)]
    json: bool,
}

fn whole_number() -> clap::builder::RangedU64ValueParser<u64> {
    clap::value_parser!(u64).range(..=MAX_WHOLE_NUMBER)
}

impl EstimateArgs {
    fn record(&self) -> FeatureRecord {
        FeatureRecord {
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            parking_spaces: self.parking_spaces,
            garage_spaces: self.garage_spaces,
            corner_lot: self.corner_lot,
            lot_size: self.lot_size,
            waterfront: self.waterfront,
        }
    }
}

#[derive(Serialize)]
struct EstimateOutput {
    record: FeatureRecord,
    price: PriceEstimate,
    formatted: String,
}

/// Logs go to stderr; stdout belongs to the form and estimates.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "home_price_estimator=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// A model that cannot be loaded is a configuration error, not something
/// to run without: report it and terminate.
fn load_model_or_exit(path: &Path) -> LoadedModel {
    match ModelArtifact::load(path) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("Error initializing model: {}", e);
            eprintln!("fatal: error initializing model: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::load(cli.config.as_deref());
    let model_path = config.model_path(cli.model.as_deref())?;
    let format = config.currency_format(cli.locale.as_deref());

    let model = load_model_or_exit(&model_path);

    match cli.command {
        Some(Commands::Inspect) => {
            let info = model.describe();
            println!("{} v{} ({})", info.name, info.version, info.kind);
            if let Some(description) = &info.description {
                println!("{}", description);
            }
            println!("output: {}", info.output);
            println!("inputs:");
            for input in &info.inputs {
                match &input.categories {
                    Some(categories) => println!(
                        "  {:<16}{} [{}]",
                        input.name,
                        input.kind,
                        categories.join(", ")
                    ),
                    None => println!("  {:<16}{}", input.name, input.kind),
                }
            }
        }
        Some(Commands::Estimate(args)) => {
            let estimator = Estimator::new(model);
            let record = args.record();
            let price = estimator
                .estimate(&record)
                .context("Error predicting home price")?;
            let formatted = format.format_price(price);

            if args.json {
                let output = EstimateOutput {
                    record,
                    price,
                    formatted,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", formatted);
            }
        }
        Some(Commands::Form) | None => {
            let estimator = Estimator::new(model);
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();

            tracing::info!("Starting form session with {}", model_path.display());
            let mut session = FormSession::new(&estimator, format)
                .report_prediction_errors(config.report_prediction_errors)
                .with_prompt(interactive);
            session.run(stdin.lock(), io::stdout().lock())?;
        }
    }

    Ok(())
}
