//! Service-wide CLI commands

use anyhow::{Context, Result};
use colored::Colorize;
use teach_lib::{workflow, ClassificationClient, StructuredLogger};

use crate::output::{color_status, print_json, print_success, OutputFormat};

/// Show service name, version and status
pub async fn show_info(client: &ClassificationClient, format: OutputFormat) -> Result<()> {
    let info = client
        .info()
        .await
        .context("Failed to fetch service info")?;

    match format {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Table => {
            println!("{}", "Classification Service".bold());
            println!("{}", "=".repeat(40));
            println!("URL:      {}", client.base_url().as_str().cyan());
            println!("Name:     {}", info.name);
            println!("Version:  {}", info.version);
            println!("Build:    {}", info.build);
            println!("Status:   {}", color_status(&info.status));
        }
    }

    Ok(())
}

/// Delete every model on the service
pub async fn reset(
    client: &ClassificationClient,
    logger: &StructuredLogger,
    format: OutputFormat,
) -> Result<()> {
    let deleted = workflow::reset_service(client, logger)
        .await
        .context("Failed to reset the service")?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "models_deleted": deleted }))?,
        OutputFormat::Table => {
            print_success(&format!("Service reset, {} model(s) deleted", deleted));
        }
    }

    Ok(())
}
