//! Single-example submission seam

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::ClassificationClient;
use crate::error::ServiceError;
use crate::models::{Example, ModelId};

/// Sends one labeled example to a model
///
/// Implementations make exactly one remote attempt per call. Retries, if
/// wanted, belong in a wrapper around this trait rather than in the pipeline.
#[async_trait]
pub trait TeachSubmitter: Send + Sync {
    async fn teach(&self, model_id: &ModelId, example: &Example) -> Result<(), ServiceError>;
}

#[async_trait]
impl TeachSubmitter for ClassificationClient {
    async fn teach(&self, model_id: &ModelId, example: &Example) -> Result<(), ServiceError> {
        ClassificationClient::teach(self, model_id.as_str(), example).await
    }
}

#[async_trait]
impl<T: TeachSubmitter + ?Sized> TeachSubmitter for &T {
    async fn teach(&self, model_id: &ModelId, example: &Example) -> Result<(), ServiceError> {
        (**self).teach(model_id, example).await
    }
}

#[async_trait]
impl<T: TeachSubmitter + ?Sized> TeachSubmitter for Arc<T> {
    async fn teach(&self, model_id: &ModelId, example: &Example) -> Result<(), ServiceError> {
        (**self).teach(model_id, example).await
    }
}
