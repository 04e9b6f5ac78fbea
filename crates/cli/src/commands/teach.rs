//! Teach CLI command

use anyhow::{Context, Result};
use std::path::Path;
use teach_lib::{
    ClassificationClient, StructuredLogger, SubmitPolicy, TeachOptions, TeachPipeline,
    TeachSummary,
};

use crate::output::{print_json, print_success, print_warning, OutputFormat};

/// Teach a model from a JSON array of examples
pub async fn teach(
    client: &ClassificationClient,
    logger: &StructuredLogger,
    model_id: &str,
    examples: &Path,
    skip_failed: bool,
    format: OutputFormat,
) -> Result<TeachSummary> {
    let options = TeachOptions {
        on_submit_error: if skip_failed {
            SubmitPolicy::SkipFailed
        } else {
            SubmitPolicy::Abort
        },
    };

    let summary = TeachPipeline::new(client)
        .with_options(options)
        .with_logger(logger.clone())
        .teach_model(model_id, examples)
        .await
        .with_context(|| {
            format!(
                "Failed to teach model {} from {}",
                model_id,
                examples.display()
            )
        })?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            print_success(&format!(
                "Taught model {} with {} example(s)",
                model_id, summary.submitted
            ));
            if !summary.skipped.is_empty() {
                print_warning(&format!(
                    "Skipped {} example(s) at positions {:?}",
                    summary.skipped.len(),
                    summary.skipped
                ));
            }
        }
    }

    Ok(summary)
}
