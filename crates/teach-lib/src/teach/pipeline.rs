//! Drives the example reader into the submitter

use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::reader::ExampleStream;
use super::submitter::TeachSubmitter;
use crate::error::{Result, TeachError};
use crate::models::ModelId;
use crate::observability::{StructuredLogger, TeachMetrics};

/// What to do when the service does not accept an example
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Stop at the first failed submission and report it
    #[default]
    Abort,
    /// Record the failed position and move on to the next example
    SkipFailed,
}

/// Knobs for a teach run
#[derive(Debug, Clone, Default)]
pub struct TeachOptions {
    /// Reaction to a failed submission, `Abort` unless set
    pub on_submit_error: SubmitPolicy,
}

/// Outcome of a teach run that reached the end of its source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeachSummary {
    /// Examples accepted by the service
    pub submitted: usize,
    /// Positions that failed under `SubmitPolicy::SkipFailed`
    pub skipped: Vec<usize>,
}

/// Teaches a model from a JSON array of examples, one request per element
///
/// Examples are submitted strictly in source order and the next element is
/// not read until the previous submission has finished. Any error ends the
/// run; examples before the reported position stay taught.
pub struct TeachPipeline<S> {
    submitter: S,
    options: TeachOptions,
    metrics: TeachMetrics,
    logger: StructuredLogger,
}

impl<S: TeachSubmitter> TeachPipeline<S> {
    pub fn new(submitter: S) -> Self {
        Self {
            submitter,
            options: TeachOptions::default(),
            metrics: TeachMetrics::new(),
            logger: StructuredLogger::new("classification-service"),
        }
    }

    pub fn with_options(mut self, options: TeachOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Teach `model_id` from the array stored at `source_path`
    pub async fn teach_model(
        &self,
        model_id: &str,
        source_path: impl AsRef<Path>,
    ) -> Result<TeachSummary> {
        let model_id = ModelId::new(model_id)?;
        let path = source_path.as_ref();
        self.logger
            .log_teach_started(model_id.as_str(), &path.display().to_string());

        let result = match open_source(path) {
            Ok(file) => {
                self.drive(&model_id, &path.display().to_string(), file)
                    .await
            }
            Err(e) => Err(e),
        };
        self.report(&model_id, &result);
        result
    }

    /// Teach `model_id` from an already opened byte source
    ///
    /// The reader is owned by the run and dropped before this returns.
    pub async fn teach_from_reader<R: Read>(
        &self,
        model_id: &ModelId,
        reader: R,
    ) -> Result<TeachSummary> {
        self.logger.log_teach_started(model_id.as_str(), "reader");
        let result = self.drive(model_id, "reader", reader).await;
        self.report(model_id, &result);
        result
    }

    async fn drive<R: Read>(
        &self,
        model_id: &ModelId,
        name: &str,
        reader: R,
    ) -> Result<TeachSummary> {
        let mut stream = ExampleStream::open_named(reader, name)?;
        let outcome = self.submit_all(model_id, &mut stream).await;
        // Always close; an earlier error wins over a close error.
        let closed = stream.close();
        let summary = outcome?;
        closed?;
        Ok(summary)
    }

    async fn submit_all<R: Read>(
        &self,
        model_id: &ModelId,
        stream: &mut ExampleStream<R>,
    ) -> Result<TeachSummary> {
        let mut summary = TeachSummary::default();

        for (position, item) in stream.enumerate() {
            let example = match item {
                Ok(example) => example,
                Err(err) => {
                    if let TeachError::Decode { .. } = err {
                        self.metrics.inc_decode_errors();
                    }
                    return Err(err);
                }
            };

            let started = Instant::now();
            match self.submitter.teach(model_id, &example).await {
                Ok(()) => {
                    self.metrics
                        .observe_submitted(started.elapsed().as_secs_f64());
                    summary.submitted += 1;
                    debug!(
                        model_id = %model_id,
                        position = position,
                        class = %example.class,
                        "Example taught"
                    );
                }
                Err(source) => {
                    self.metrics.inc_submission_errors();
                    match self.options.on_submit_error {
                        SubmitPolicy::Abort => {
                            return Err(TeachError::Submission { position, source });
                        }
                        SubmitPolicy::SkipFailed => {
                            self.logger.log_example_skipped(
                                model_id.as_str(),
                                position,
                                &source.to_string(),
                            );
                            self.metrics.inc_skipped();
                            summary.skipped.push(position);
                        }
                    }
                }
            }
        }

        Ok(summary)
    }

    fn report(&self, model_id: &ModelId, result: &Result<TeachSummary>) {
        match result {
            Ok(summary) => self.logger.log_teach_completed(
                model_id.as_str(),
                summary.submitted,
                summary.skipped.len(),
            ),
            Err(err) => {
                self.logger
                    .log_teach_failed(model_id.as_str(), err.position(), &err.to_string())
            }
        }
    }
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| TeachError::SourceUnavailable {
        path: path.display().to_string(),
        source,
    })
}
