//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system,
//! which executes chunk work on worker threads.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed asynchronously
//! - `TaskResult`: Represents the result of a completed task
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the thread driving the manager
//! 5. The result can spawn new tasks
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back
//! - Shared state reached from a task must be synchronized (`Arc<World>`,
//!   `MtResource<Chunk>`)

use crate::engine_state::rendering::meshing::MeshScheduler;

/// A unit of work that can be executed on a worker thread.
///
/// Tasks should own everything they need; they hold `Arc` and `MtResource`
/// handles rather than references.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// Runs on a worker thread, or inline when the manager has no workers.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be handled by the driving thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
///
/// Results are handled one at a time by the thread driving the task manager,
/// which owns the [`MeshScheduler`]; this is where in-flight bookkeeping is
/// updated and follow-up work is decided.
pub trait TaskResult: Send {
    /// Handles the result of a completed task.
    ///
    /// # Arguments
    /// * `scheduler`: In-flight bookkeeping for generation and mesh tasks
    ///
    /// # Returns
    /// New tasks to schedule (can be empty).
    fn handle_result(self: Box<Self>, scheduler: &mut MeshScheduler) -> Vec<Box<dyn Task>>;
}
