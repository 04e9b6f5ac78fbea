//! Model lifecycle CLI commands

use anyhow::{Context, Result};
use tabled::Tabled;
use teach_lib::{workflow, ClassificationClient, Model, StructuredLogger};

use crate::output::{print_json, print_rows, print_success, OutputFormat};

/// Row for models table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Classes")]
    classes: String,
    #[tabled(rename = "Ngrams")]
    ngrams: String,
    #[tabled(rename = "Skipgrams")]
    skipgrams: String,
}

impl From<&Model> for ModelRow {
    fn from(model: &Model) -> Self {
        let option = |value: Option<u32>| value.map(|v| v.to_string()).unwrap_or_default();
        let options = model.options.clone().unwrap_or_default();
        Self {
            id: model.id.clone(),
            name: model.name.clone(),
            classes: model.classes.join(", "),
            ngrams: option(options.ngrams),
            skipgrams: option(options.skipgrams),
        }
    }
}

/// Row for class stats table
#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "Class")]
    name: String,
    #[tabled(rename = "Examples")]
    examples: u64,
}

/// List all models
pub async fn list_models(client: &ClassificationClient, format: OutputFormat) -> Result<()> {
    let models = client
        .list_models()
        .await
        .context("Failed to list models")?;

    let rows = models.iter().map(ModelRow::from).collect();
    print_rows(rows, &models, "No models found", format)?;

    if let OutputFormat::Table = format {
        if !models.is_empty() {
            println!("\nTotal: {} models", models.len());
        }
    }

    Ok(())
}

/// Show a single model
pub async fn get_model(client: &ClassificationClient, id: &str, format: OutputFormat) -> Result<()> {
    let model = client
        .get_model(id)
        .await
        .with_context(|| format!("Failed to fetch model {}", id))?;

    print_rows(vec![ModelRow::from(&model)], &model, "Model not found", format)
}

/// Create a model and show it as the service stored it
pub async fn create_model(
    client: &ClassificationClient,
    logger: &StructuredLogger,
    spec: Model,
    format: OutputFormat,
) -> Result<()> {
    let model = workflow::provision_model(client, &spec, logger)
        .await
        .with_context(|| format!("Failed to create model {}", spec.name))?;

    match format {
        OutputFormat::Json => print_json(&model)?,
        OutputFormat::Table => {
            print_success(&format!("Model {} created", model.id));
            print_rows(vec![ModelRow::from(&model)], &model, "", format)?;
        }
    }

    Ok(())
}

/// Delete a model
pub async fn delete_model(client: &ClassificationClient, id: &str, format: OutputFormat) -> Result<()> {
    client
        .delete_model(id)
        .await
        .with_context(|| format!("Failed to delete model {}", id))?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "deleted": id }))?,
        OutputFormat::Table => print_success(&format!("Model {} deleted", id)),
    }

    Ok(())
}

/// Show example and prediction counts for a model
pub async fn show_stats(client: &ClassificationClient, id: &str, format: OutputFormat) -> Result<()> {
    let stats = client
        .model_stats(id)
        .await
        .with_context(|| format!("Failed to fetch stats for model {}", id))?;

    match format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Table => {
            println!("Model:       {}", id);
            println!("Examples:    {}", stats.examples);
            println!("Predictions: {}", stats.predictions);
            println!();
            let rows = stats
                .classes
                .iter()
                .map(|c| ClassRow {
                    name: c.name.clone(),
                    examples: c.examples,
                })
                .collect();
            print_rows(rows, &stats, "No examples taught yet", format)?;
        }
    }

    Ok(())
}
