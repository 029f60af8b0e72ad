//! Domain layer containing business entities and logic.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`jobs`] - Background job model and queue
//! - [`job_worker`] - Worker draining the job queue
//! - [`task_log`] - Bounded log of completed background work
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits define contracts implemented in
//! [`crate::infrastructure`].

pub mod entities;
pub mod job_worker;
pub mod jobs;
pub mod repositories;
pub mod task_log;
