use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::jobs::token::CancelToken;
use crate::image_pipeline::jobs::types::{JobOutcome, RequestId};

/// Runs jobs on the rayon pool with last-writer-wins delivery.
///
/// Submitting a job cancels the token of the previous one and makes its result
/// stale. Stale results are drained and dropped by `poll`/`wait`, never returned.
pub struct JobRunner<T: Send + 'static> {
    sender: mpsc::Sender<JobOutcome<T>>,
    receiver: mpsc::Receiver<JobOutcome<T>>,
    latest: RequestId,
    active: Option<CancelToken>,
    in_flight: usize,
}

impl<T: Send + 'static> Default for JobRunner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> JobRunner<T> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            latest: RequestId::default(),
            active: None,
            in_flight: 0,
        }
    }

    pub fn submit<F>(&mut self, label: impl Into<String>, job: F) -> RequestId
    where
        F: FnOnce(&CancelToken) -> Result<T> + Send + 'static,
    {
        self.cancel_active();
        self.latest = self.latest.next();
        let id = self.latest;
        let label = label.into();
        let token = CancelToken::new();
        self.active = Some(token.clone());
        self.in_flight += 1;

        debug!(%id, label = %label, "Submitting background job");

        let sender = self.sender.clone();
        rayon::spawn(move || {
            let started = Instant::now();
            let result = match panic::catch_unwind(AssertUnwindSafe(|| job(&token))) {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload);
                    warn!(%id, label = %label, "Job panicked: {}", message);
                    Err(PipelineError::JobPanicked(label.clone(), message))
                }
            };
            let _ = sender.send(JobOutcome {
                id,
                label,
                result,
                elapsed: started.elapsed(),
            });
        });

        id
    }

    /// Cancels the active job and makes everything in flight stale.
    pub fn invalidate(&mut self) {
        self.cancel_active();
        self.latest = self.latest.next();
        debug!(latest = %self.latest, "Invalidated in-flight jobs");
    }

    /// Non-blocking. Returns the latest request's outcome if it has arrived.
    pub fn poll(&mut self) -> Option<JobOutcome<T>> {
        let mut current = None;
        while let Ok(outcome) = self.receiver.try_recv() {
            if let Some(outcome) = self.accept(outcome) {
                current = Some(outcome);
            }
        }
        current
    }

    /// Blocks until the latest request's outcome arrives. `None` when nothing
    /// current is in flight.
    pub fn wait(&mut self) -> Option<JobOutcome<T>> {
        while self.in_flight > 0 {
            let Ok(outcome) = self.receiver.recv() else {
                break;
            };
            if let Some(outcome) = self.accept(outcome) {
                return Some(outcome);
            }
        }
        None
    }

    pub fn latest(&self) -> RequestId {
        self.latest
    }

    /// True while the latest request has not been delivered.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn accept(&mut self, outcome: JobOutcome<T>) -> Option<JobOutcome<T>> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if outcome.id != self.latest {
            debug!(
                id = %outcome.id,
                latest = %self.latest,
                label = %outcome.label,
                "Discarding stale job result"
            );
            return None;
        }
        self.active = None;
        debug!(
            id = %outcome.id,
            label = %outcome.label,
            elapsed_ms = outcome.elapsed.as_secs_f64() * 1000.0,
            "Job finished"
        );
        Some(outcome)
    }

    fn cancel_active(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }
}

impl<T: Send + 'static> Drop for JobRunner<T> {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
