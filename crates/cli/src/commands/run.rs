//! End-to-end workflow: reset, provision, teach, predict

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use teach_lib::{workflow, ClassificationClient, Feature, Model, StructuredLogger};

use crate::output::{print_info, OutputFormat};

use super::{predict, teach};

/// Parameters of a full workflow run
pub struct RunParams<'a> {
    pub model: Model,
    pub examples: &'a Path,
    pub features: Vec<Feature>,
    pub limit: u32,
    pub skip_failed: bool,
}

/// Run every phase in order, stopping at the first one that fails
pub async fn run(
    client: &ClassificationClient,
    logger: &StructuredLogger,
    params: RunParams<'_>,
    format: OutputFormat,
) -> Result<()> {
    let table = matches!(format, OutputFormat::Table);

    if table {
        println!("{}", "Resetting service".bold());
    }
    let deleted = workflow::reset_service(client, logger)
        .await
        .context("Error preparing service")?;
    if table {
        print_info(&format!("{} existing model(s) deleted", deleted));
    }

    if table {
        println!("{}", "Provisioning model".bold());
    }
    let model = workflow::provision_model(client, &params.model, logger)
        .await
        .context("Error initializing model")?;
    if table {
        print_info(&format!(
            "Model {} ({}) with classes {}",
            model.id,
            model.name,
            model.classes.join(", ")
        ));
    }

    if table {
        println!("{}", "Teaching model".bold());
    }
    teach::teach(
        client,
        logger,
        &model.id,
        params.examples,
        params.skip_failed,
        format,
    )
    .await
    .context("Error teaching model")?;

    if table {
        println!("{}", "Predicting".bold());
    }
    predict::predict(client, &model.id, params.features, params.limit, format)
        .await
        .context("Error in prediction")?;

    Ok(())
}
