//! Teach library for a remote classification service
//!
//! This crate provides the core functionality for:
//! - Streaming labeled examples out of a JSON array without loading it whole
//! - Submitting each example to the service's teach endpoint in source order
//! - Model lifecycle calls (reset, create, fetch, predict)
//! - Structured logging and Prometheus metrics for teach runs

pub mod client;
pub mod error;
pub mod models;
pub mod observability;
pub mod teach;
pub mod workflow;

pub use client::{ClassificationClient, ClientConfig};
pub use error::{ServiceError, TeachError};
pub use models::*;
pub use observability::{StructuredLogger, TeachMetrics};
pub use teach::{
    ExampleStream, SubmitPolicy, TeachOptions, TeachPipeline, TeachSubmitter, TeachSummary,
};
