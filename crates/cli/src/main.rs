//! Classification workflow CLI
//!
//! A command-line tool for resetting a classification service, provisioning
//! models, teaching them from example files and requesting predictions.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use commands::{models, predict, run, service, teach};
use std::path::PathBuf;
use teach_lib::{ClassificationClient, Feature, Model, StructuredLogger, TeachMetrics};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Classification workflow CLI
#[derive(Parser)]
#[command(name = "cbox")]
#[command(author, version, about = "CLI for teaching and querying a classification service", long_about = None)]
pub struct Cli {
    /// Service URL (can also be set via CBOX_API_URL env var)
    #[arg(long, env = "CBOX_API_URL")]
    pub api_url: Option<String>,

    /// Config file (defaults to ~/.config/cbox/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Log format written to stderr
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Write Prometheus metrics to this file when the command finishes
    #[arg(long)]
    pub metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show service information
    Info,

    /// Manage models
    #[command(subcommand)]
    Models(ModelsCommands),

    /// Delete every model on the service
    Reset,

    /// Teach a model from a JSON array of examples
    Teach {
        /// Path to the examples file
        examples: PathBuf,

        /// Model to teach (falls back to default_model from the config)
        #[arg(long, short)]
        model: Option<String>,

        /// Keep going when the service rejects an example
        #[arg(long)]
        skip_failed: bool,
    },

    /// Ask a model to classify a feature vector
    Predict {
        /// Model ID
        model_id: String,

        /// Input feature as key:type=value (e.g. user.age:number=56)
        #[arg(long = "feature", short = 'i', required = true)]
        features: Vec<Feature>,

        /// Maximum number of classes to return
        #[arg(long, default_value_t = 2)]
        limit: u32,
    },

    /// Reset the service, create a model, teach it and run a prediction
    Run {
        /// Model ID to create
        #[arg(long, default_value = "sentiment1")]
        model_id: String,

        /// Model name
        #[arg(long, default_value = "sentimentModel")]
        name: String,

        /// Model classes
        #[arg(long = "class", default_values = ["class1", "class2", "class3"])]
        classes: Vec<String>,

        /// Path to the examples file
        #[arg(long, default_value = "examples.json")]
        examples: PathBuf,

        /// Prediction input as key:type=value
        #[arg(
            long = "feature",
            short = 'i',
            default_values = [
                "user.age:number=56",
                "user.interests:list=reading,coding,sailing",
                "user.location:keyword=Aruba",
            ]
        )]
        features: Vec<Feature>,

        /// Maximum number of classes to return
        #[arg(long, default_value_t = 2)]
        limit: u32,

        /// Keep going when the service rejects an example
        #[arg(long)]
        skip_failed: bool,
    },
}

#[derive(Subcommand)]
pub enum ModelsCommands {
    /// List models
    List,

    /// Show a model
    Get {
        /// Model ID
        id: String,
    },

    /// Create a model
    Create {
        /// Model ID (the service assigns one if omitted)
        #[arg(long, default_value = "")]
        id: String,

        /// Model name
        #[arg(long)]
        name: String,

        /// Class the model can predict (repeat for each class)
        #[arg(long = "class", required = true)]
        classes: Vec<String>,
    },

    /// Delete a model
    Delete {
        /// Model ID
        id: String,
    },

    /// Show how many examples and predictions a model has seen
    Stats {
        /// Model ID
        id: String,
    },
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn execute(
    command: Commands,
    client: &ClassificationClient,
    logger: &StructuredLogger,
    settings: &config::Settings,
    format: output::OutputFormat,
) -> Result<()> {
    match command {
        Commands::Info => service::show_info(client, format).await?,
        Commands::Models(models_cmd) => match models_cmd {
            ModelsCommands::List => models::list_models(client, format).await?,
            ModelsCommands::Get { id } => models::get_model(client, &id, format).await?,
            ModelsCommands::Create { id, name, classes } => {
                let spec = Model::new(id, name, classes);
                models::create_model(client, logger, spec, format).await?;
            }
            ModelsCommands::Delete { id } => models::delete_model(client, &id, format).await?,
            ModelsCommands::Stats { id } => models::show_stats(client, &id, format).await?,
        },
        Commands::Reset => service::reset(client, logger, format).await?,
        Commands::Teach {
            examples,
            model,
            skip_failed,
        } => {
            let model_id = settings.model_id(model)?;
            teach::teach(client, logger, &model_id, &examples, skip_failed, format).await?;
        }
        Commands::Predict {
            model_id,
            features,
            limit,
        } => {
            predict::predict(client, &model_id, features, limit, format).await?;
        }
        Commands::Run {
            model_id,
            name,
            classes,
            examples,
            features,
            limit,
            skip_failed,
        } => {
            let params = run::RunParams {
                model: Model::new(model_id, name, classes),
                examples: &examples,
                features,
                limit,
                skip_failed,
            };
            run::run(client, logger, params, format).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let settings = config::Settings::load(cli.config.as_deref())?;
    debug!(?settings, "Configuration loaded");

    // Initialize client
    let client = ClassificationClient::new(settings.client_config(cli.api_url.as_deref()))
        .context("Failed to create service client")?;
    let logger = StructuredLogger::new(client.base_url().as_str());

    let result = execute(cli.command, &client, &logger, &settings, cli.format).await;

    if let Some(path) = &cli.metrics_file {
        let text = TeachMetrics::new()
            .render()
            .context("Failed to render metrics")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
    }

    result
}
