//! Teach pipeline
//!
//! This module provides:
//! - A pull-based reader over a JSON array of examples, one element in memory at a time
//! - The submitter seam that sends one example to the service
//! - The pipeline that drives both in source order and stops at the first failure

mod pipeline;
mod reader;
mod submitter;


pub use pipeline::{SubmitPolicy, TeachOptions, TeachPipeline, TeachSummary};
pub use reader::ExampleStream;
pub use submitter::TeachSubmitter;
