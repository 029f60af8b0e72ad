//! Bounded, shared log of completed background work.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// Maximum entries retained; the oldest are dropped first.
pub const TASK_LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskLogEntry {
    pub id: u64,
    pub kind: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: VecDeque<TaskLogEntry>,
    next_id: u64,
}

/// Append-only task log shared between the job worker and HTTP handlers.
#[derive(Debug, Default)]
pub struct TaskLog {
    inner: RwLock<Inner>,
}

impl TaskLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, kind: &str, message: impl Into<String>) -> TaskLogEntry {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;

        let entry = TaskLogEntry {
            id: inner.next_id,
            kind: kind.to_string(),
            message: message.into(),
            created_at: Utc::now(),
        };

        if inner.entries.len() == TASK_LOG_CAPACITY {
            inner.entries.pop_front();
        }
        inner.entries.push_back(entry.clone());

        entry
    }

    /// Returns the `limit` most recent entries, oldest first.
    pub async fn recent(&self, limit: usize) -> Vec<TaskLogEntry> {
        let inner = self.inner.read().await;
        let skip = inner.entries.len().saturating_sub(limit);
        inner.entries.iter().skip(skip).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.inner.write().await.entries.clear();
    }
}
