//! Model lifecycle steps around a teach run

use tracing::debug;

use crate::client::ClassificationClient;
use crate::error::ServiceError;
use crate::models::{Feature, Model, PredictRequest, PredictResponse};
use crate::observability::StructuredLogger;

/// Delete every model on the service; returns how many were removed
pub async fn reset_service(
    client: &ClassificationClient,
    logger: &StructuredLogger,
) -> Result<usize, ServiceError> {
    let models = client.list_models().await?;
    for model in &models {
        debug!(model_id = %model.id, "Deleting model");
        client.delete_model(&model.id).await?;
    }
    logger.log_service_reset(models.len());
    Ok(models.len())
}

/// Create `spec` and read it back under the id the service assigned
pub async fn provision_model(
    client: &ClassificationClient,
    spec: &Model,
    logger: &StructuredLogger,
) -> Result<Model, ServiceError> {
    let created = client.create_model(spec).await?;
    let id = if created.id.is_empty() {
        spec.id.as_str()
    } else {
        created.id.as_str()
    };
    let model = client.get_model(id).await?;
    logger.log_model_provisioned(&model.id, &model.name, model.classes.len());
    Ok(model)
}

/// Ask `model_id` for its top `limit` classes for `inputs`
pub async fn predict(
    client: &ClassificationClient,
    model_id: &str,
    inputs: Vec<Feature>,
    limit: u32,
) -> Result<PredictResponse, ServiceError> {
    let request = PredictRequest { limit, inputs };
    client.predict(model_id, &request).await
}
