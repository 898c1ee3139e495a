use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};

use crate::error::WorkerError;
use crate::pipeline::ClassificationPipeline;

use super::job::{classify_item, BatchItem, BatchItemOutcome};

/// A batch item tagged with its position in the request.
pub struct IndexedItem {
    pub index: usize,
    pub item: BatchItem,
}

/// An outcome tagged with the position of the item it belongs to.
pub struct IndexedOutcome {
    pub index: usize,
    pub outcome: BatchItemOutcome,
}

/// Fixed set of threads sharing one pipeline.
///
/// Outcomes arrive in completion order; callers reassemble by index.
pub struct WorkerPool {
    job_sender: Sender<IndexedItem>,
    result_receiver: Receiver<IndexedOutcome>,
    workers: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Starts `worker_count` workers (at least one).
    pub fn new(pipeline: Arc<ClassificationPipeline>, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (job_sender, job_receiver) = bounded::<IndexedItem>(worker_count * 2);
        let (result_sender, result_receiver) = bounded::<IndexedOutcome>(worker_count * 2);
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(worker_count);

        for worker_id in 0..worker_count {
            let job_rx = job_receiver.clone();
            let result_tx = result_sender.clone();
            let shutdown_flag = Arc::clone(&shutdown);
            let worker_pipeline = Arc::clone(&pipeline);

            let handle = thread::spawn(move || {
                run_worker(worker_id, job_rx, result_tx, shutdown_flag, worker_pipeline);
            });

            workers.push(handle);
        }

        info!("Started {} batch workers", worker_count);

        Self {
            job_sender,
            result_receiver,
            workers,
            shutdown,
        }
    }

    pub fn submit(&self, job: IndexedItem) -> Result<(), WorkerError> {
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(WorkerError::ChannelClosed);
        }

        self.job_sender
            .send(job)
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// Blocks until the next outcome, `None` once every worker has exited.
    pub fn recv_result(&self) -> Option<IndexedOutcome> {
        self.result_receiver.recv().ok()
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn shutdown(&self) {
        debug!("Shutting down batch worker pool");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn wait(self) {
        // Drop sender to signal workers to exit
        drop(self.job_sender);

        for (i, worker) in self.workers.into_iter().enumerate() {
            if let Err(e) = worker.join() {
                error!("Batch worker {} panicked: {:?}", i, e);
            } else {
                debug!("Batch worker {} finished", i);
            }
        }
    }
}

fn run_worker(
    worker_id: usize,
    job_receiver: Receiver<IndexedItem>,
    result_sender: Sender<IndexedOutcome>,
    shutdown: Arc<AtomicBool>,
    pipeline: Arc<ClassificationPipeline>,
) {
    debug!("Batch worker {} started", worker_id);

    loop {
        if shutdown.load(Ordering::Relaxed) {
            debug!("Batch worker {} received shutdown signal", worker_id);
            break;
        }

        match job_receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(IndexedItem { index, item }) => {
                debug!("Batch worker {} processing item {}", worker_id, index);

                let outcome = classify_item(&pipeline, item);
                if let Err(e) = result_sender.send(IndexedOutcome { index, outcome }) {
                    error!("Batch worker {} failed to send outcome: {}", worker_id, e);
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Batch worker {} job channel disconnected", worker_id);
                break;
            }
        }
    }

    debug!("Batch worker {} stopped", worker_id);
}
