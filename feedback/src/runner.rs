//! # Batch Runner
//!
//! Runs a batch of independent grading jobs with a bounded number of provider calls
//! in flight. Jobs share no mutable state (rubric and submission are immutable, each
//! job produces its own report), so no ordering is guaranteed between jobs during
//! execution; the result vector does preserve input order so callers can match
//! results back to submissions.

use crate::FeedbackJob;
use crate::error::{FeedbackError, FeedbackResult};
use crate::report::FeedbackReportResponse;
use common::config;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// Slot queue bounding how many jobs run at once.
struct Queue {
    max_concurrent: usize,
    running: usize,
    waiting: VecDeque<Arc<Notify>>,
}

impl Queue {
    fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            running: 0,
            waiting: VecDeque::new(),
        }
    }

    /// Called when a job begins: acquire a slot, or get a handle to wait on.
    fn try_acquire_slot(&mut self) -> Option<Arc<Notify>> {
        if self.running < self.max_concurrent {
            self.running += 1;
            None // Run instantly
        } else {
            let notify = Arc::new(Notify::new());
            self.waiting.push_back(notify.clone());
            Some(notify)
        }
    }

    /// Called when a job completes: hand the slot to the next waiter, if any.
    fn release_slot(&mut self) {
        self.running = self.running.saturating_sub(1);

        if let Some(waiting_task) = self.waiting.pop_front() {
            self.running += 1;
            waiting_task.notify_one();
        }
    }
}

/// Executes grading jobs with bounded concurrency.
pub struct BatchRunner {
    queue: Arc<Mutex<Queue>>,
}

impl BatchRunner {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Queue::new(max_concurrent))),
        }
    }

    /// Runs all jobs, at most `max_concurrent` at a time.
    ///
    /// The returned vector is in input order. A panicking job surfaces as a
    /// [`FeedbackError::Provider`] entry rather than poisoning the batch.
    pub async fn run_all(
        &self,
        jobs: Vec<FeedbackJob>,
    ) -> Vec<FeedbackResult<FeedbackReportResponse>> {
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let queue = Arc::clone(&self.queue);
            handles.push(tokio::spawn(async move {
                let maybe_notify = {
                    let mut queue = queue.lock().await;
                    queue.try_acquire_slot()
                };

                // If we got a notify, wait for it outside the mutex
                if let Some(notify) = maybe_notify {
                    notify.notified().await;
                }

                let result = job.run().await;

                {
                    let mut queue = queue.lock().await;
                    queue.release_slot();
                }

                result
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(e) => Err(FeedbackError::Provider(format!("grading task panicked: {e}"))),
            });
        }
        results
    }
}

impl Default for BatchRunner {
    fn default() -> Self {
        Self::new(config::max_concurrent_jobs())
    }
}
