//! Background worker draining the job queue.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::domain::jobs::Job;
use crate::domain::task_log::TaskLog;

/// Processes jobs until every [`crate::domain::jobs::JobQueue`] handle is dropped.
///
/// Each job sleeps for `delay` to stand in for real I/O (sending mail,
/// calling a payment provider) and then records its outcome in `task_log`.
pub async fn run_job_worker(mut rx: mpsc::Receiver<Job>, task_log: Arc<TaskLog>, delay: Duration) {
    tracing::info!("Job worker started");

    while let Some(job) = rx.recv().await {
        let kind = job.kind();

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        for message in describe(&job) {
            task_log.append(kind, message).await;
        }

        metrics::counter!("jobs_processed_total", "kind" => kind).increment(1);
        tracing::info!(kind, "Job processed");
    }

    tracing::info!("Job worker stopped");
}

/// Task log lines written for a job.
fn describe(job: &Job) -> Vec<String> {
    match job {
        Job::Notification { email, message } => {
            vec![format!("Notification sent to {email}: {message}")]
        }
        Job::OrderProcessing {
            order_id,
            item,
            quantity,
        } => vec![
            format!("Order {order_id}: validating {quantity} x {item}"),
            format!("Order {order_id}: payment captured"),
            format!("Order {order_id}: processing completed"),
        ],
        Job::OrderConfirmation {
            order_id,
            email,
            total,
        } => vec![format!(
            "Order confirmation for order #{order_id} sent to {email} (total {total:.2})"
        )],
        Job::StatusUpdate {
            order_id,
            email,
            status,
        } => vec![format!(
            "Status update for order #{order_id} sent to {email}: {status}"
        )],
        Job::Audit { message } => vec![message.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::jobs::JobQueue;

    #[tokio::test]
    async fn test_worker_logs_each_job_and_stops_when_queue_dropped() {
        let (queue, rx) = JobQueue::channel(8);
        let log = Arc::new(TaskLog::new());

        queue
            .enqueue(Job::Notification {
                email: "a@example.com".to_string(),
                message: "hi".to_string(),
            })
            .unwrap();
        queue
            .enqueue(Job::OrderProcessing {
                order_id: "ORD-1".to_string(),
                item: "Book".to_string(),
                quantity: 2,
            })
            .unwrap();
        drop(queue);

        run_job_worker(rx, log.clone(), Duration::ZERO).await;

        let entries = log.recent(10).await;
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].kind, "notification");
        assert!(entries[0].message.contains("a@example.com"));
        assert!(entries[3].message.contains("processing completed"));
    }
}
