//! Background job model and the queue handlers enqueue onto.
//!
//! Handlers never wait for the work itself: they push a [`Job`] onto the
//! bounded channel and respond immediately. [`crate::domain::job_worker`]
//! drains the channel.

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::AppError;

/// A unit of deferred work.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Notification {
        email: String,
        message: String,
    },
    OrderProcessing {
        order_id: String,
        item: String,
        quantity: u32,
    },
    OrderConfirmation {
        order_id: i64,
        email: String,
        total: f64,
    },
    StatusUpdate {
        order_id: i64,
        email: String,
        status: String,
    },
    Audit {
        message: String,
    },
}

impl Job {
    /// Short label used in logs and the task log.
    pub fn kind(&self) -> &'static str {
        match self {
            Job::Notification { .. } => "notification",
            Job::OrderProcessing { .. } => "order_processing",
            Job::OrderConfirmation { .. } => "order_confirmation",
            Job::StatusUpdate { .. } => "status_update",
            Job::Audit { .. } => "audit",
        }
    }
}

/// Cloneable sending half of the job channel.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: mpsc::Sender<Job>,
}

impl JobQueue {
    /// Creates a queue and the receiver the worker consumes.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Job>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Enqueues without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] when the queue is full or the worker is gone.
    pub fn enqueue(&self, job: Job) -> Result<(), AppError> {
        let kind = job.kind();
        self.sender.try_send(job).map_err(|e| {
            let reason = match e {
                TrySendError::Full(_) => "Job queue is full",
                TrySendError::Closed(_) => "Job queue is closed",
            };
            tracing::warn!(kind, reason, "Failed to enqueue job");
            AppError::unavailable(reason, json!({ "job": kind }))
        })?;

        tracing::debug!(kind, "Job enqueued");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Remaining free slots.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }
}
