use std::sync::Arc;
use std::thread;

use chrono::Utc;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::config::BatchConfig;
use crate::error::{BatchError, WorkerError};
use crate::pipeline::ClassificationPipeline;

use super::job::{classify_item, BatchItem, BatchItemOutcome, BatchReport};
use super::pool::{IndexedItem, WorkerPool};

/// Applies the batch size limit and fans items out to the pipeline.
pub struct BatchOrchestrator {
    pipeline: Arc<ClassificationPipeline>,
    config: BatchConfig,
}

impl BatchOrchestrator {
    pub fn new(pipeline: Arc<ClassificationPipeline>, config: BatchConfig) -> Self {
        Self { pipeline, config }
    }

    pub fn pipeline(&self) -> &ClassificationPipeline {
        &self.pipeline
    }

    /// Limit applied by [`run`](Self::run).
    pub fn max_items(&self) -> usize {
        self.config.max_items
    }

    /// Runs a batch against the configured limit.
    pub fn run(&self, items: Vec<BatchItem>) -> Result<BatchReport, BatchError> {
        self.run_batch(items, self.config.max_items)
    }

    /// Classifies every item, in input order. Oversized batches are rejected
    /// before any item is touched; after that no item can fail the batch.
    pub fn run_batch(
        &self,
        items: Vec<BatchItem>,
        max_items: usize,
    ) -> Result<BatchReport, BatchError> {
        if items.len() > max_items {
            return Err(BatchError::LimitExceeded {
                count: items.len(),
                limit: max_items,
            });
        }

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let _span = info_span!("batch", batch_id = %batch_id, items = items.len()).entered();

        let workers = self.config.worker_count.min(items.len());
        let outcomes = if workers <= 1 {
            self.run_sequential(items)
        } else {
            self.run_parallel(items, workers)
        };

        let report = BatchReport::from_outcomes(batch_id, started_at, outcomes);
        info!(
            total = report.total_processed,
            successful = report.successful,
            failed = report.failed,
            "Batch complete"
        );
        Ok(report)
    }

    fn run_sequential(&self, items: Vec<BatchItem>) -> Vec<BatchItemOutcome> {
        items
            .into_iter()
            .map(|item| classify_item(&self.pipeline, item))
            .collect()
    }

    fn run_parallel(&self, items: Vec<BatchItem>, workers: usize) -> Vec<BatchItemOutcome> {
        let total = items.len();
        let filenames: Vec<String> = items.iter().map(|i| i.filename.clone()).collect();
        let mut slots: Vec<Option<BatchItemOutcome>> = (0..total).map(|_| None).collect();

        let pool = WorkerPool::new(Arc::clone(&self.pipeline), workers);
        let pool_ref = &pool;

        thread::scope(|scope| {
            scope.spawn(move || {
                for (index, item) in items.into_iter().enumerate() {
                    if let Err(e) = pool_ref.submit(IndexedItem { index, item }) {
                        warn!(error = %e, index, "Stopped feeding batch workers");
                        pool_ref.shutdown();
                        break;
                    }
                }
            });

            let mut received = 0;
            while received < total {
                let Some(tagged) = pool_ref.recv_result() else {
                    break;
                };
                if let Some(slot) = slots.get_mut(tagged.index) {
                    *slot = Some(tagged.outcome);
                    received += 1;
                }
            }
        });

        pool.shutdown();
        pool.wait();

        slots
            .into_iter()
            .zip(filenames)
            .map(|(slot, filename)| {
                slot.unwrap_or_else(|| {
                    BatchItemOutcome::failure(filename, WorkerError::ChannelClosed.to_string())
                })
            })
            .collect()
    }
}
