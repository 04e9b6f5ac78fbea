//! Prediction CLI command

use anyhow::{Context, Result};
use tabled::Tabled;
use teach_lib::{workflow, ClassificationClient, Feature, PredictResponse};

use crate::output::{color_score, print_rows, OutputFormat};

/// Row for prediction table
#[derive(Tabled)]
struct ClassScoreRow {
    #[tabled(rename = "Rank")]
    rank: usize,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Score")]
    score: String,
}

/// Request a prediction and print the ranked classes
pub async fn predict(
    client: &ClassificationClient,
    model_id: &str,
    features: Vec<Feature>,
    limit: u32,
    format: OutputFormat,
) -> Result<PredictResponse> {
    let response = workflow::predict(client, model_id, features, limit)
        .await
        .with_context(|| format!("Failed to get prediction from model {}", model_id))?;

    let rows = response
        .classes
        .iter()
        .enumerate()
        .map(|(i, c)| ClassScoreRow {
            rank: i + 1,
            class: c.id.clone(),
            score: color_score(c.score),
        })
        .collect();
    print_rows(rows, &response, "No classes predicted", format)?;

    Ok(response)
}
