//! # Task System Core Traits
//!
//! The two traits the worker pool is built around: a [`Task`] is a unit of
//! work processed on a background thread, and the [`TaskResult`] it returns
//! is handled back on the primary thread, where it may enqueue render
//! commands and spawn follow-up tasks.

use crate::terrain::chunk_manager::ChunkManager;
use crate::terrain::render_queue::RenderQueue;

/// A unit of work executed on a worker thread.
///
/// Tasks own all the data they need (shared handles included), so they can
/// be shipped to a worker without borrowing engine state.
pub trait Task: Send {
    /// Performs the work. Runs on a worker thread; must not touch
    /// primary-thread-only resources.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a completed task, handled on the primary thread.
pub trait TaskResult: Send {
    /// Finalizes the task on the primary thread.
    ///
    /// This is where results are allowed to touch primary-thread concerns:
    /// pushing upload/collision commands into `queue` and consulting the
    /// chunk `manager`. Returns any follow-up tasks to schedule.
    fn handle_result(
        self: Box<Self>,
        manager: &ChunkManager,
        queue: &RenderQueue,
    ) -> Vec<Box<dyn Task + Send>>;
}
