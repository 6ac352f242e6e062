//! # Task Management System
//!
//! This module provides a small thread-pool for executing chunk work off the
//! calling thread.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The result of a completed task, which can spawn additional tasks
//! - `TaskChannel`: Communication channel between the driving thread and one worker
//!
//! Each worker is a `std::thread` with a dedicated pair of mpsc channels. Tasks
//! are handed out round-robin with at most [`MAX_TASKS_IN_FLIGHT`] per worker;
//! the rest wait in a FIFO queue. A manager created with zero workers runs every
//! task inline inside `publish_task`, and its results are handled on the next
//! `process_completed_tasks` like any other.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back results
//! 4. Results are handled in `process_completed_tasks()`
//! 5. Results can spawn new tasks
//! 6. The cycle continues until all work is complete
//!
//! ## Example Usage
//! ```
//! use voxel_chunk_manager::engine_state::{
//!     rendering::meshing::MeshScheduler, task_management::TaskManager,
//! };
//!
//! let mut task_manager = TaskManager::new(2);
//! let mut scheduler = MeshScheduler::new();
//!
//! // In the driving loop:
//! task_manager.process_completed_tasks(&mut scheduler);
//! task_manager.process_queued_tasks();
//! assert!(task_manager.is_idle());
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{error, info};
use task::{Task, TaskResult};

use super::rendering::meshing::MeshScheduler;

/// A communication channel between the driving thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `worker`: Handle to the worker thread, joined on drop
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// # Fields
/// - `channels`: Set of active worker channels
/// - `queued_tasks`: Tasks waiting for an available worker
/// - `inline_results`: Results of tasks run inline, waiting to be handled
/// - `current_channel`: Index for round-robin scheduling
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    inline_results: VecDeque<Box<dyn TaskResult + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Kept at 1 so a worker never holds a backlog another idle worker could take.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// A worker whose thread fails to spawn is logged and left out; if none
    /// spawn, tasks run inline.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create; zero runs tasks inline
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            match thread::Builder::new()
                .name(format!("chunk-worker-{}", index))
                .spawn(task_closure)
            {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    worker,
                }),
                Err(err) => error!("Failed to spawn chunk worker {}: {}", index, err),
            }
        }

        info!(
            "Task manager started with {} workers (available parallelism: {:?})",
            channels.len(),
            thread::available_parallelism().ok()
        );

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            inline_results: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of worker threads; zero means tasks run inline.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was sent and the in-flight counter incremented
    /// - `Err(task)` if the worker has disconnected, returning the task for requeueing
    fn try_send_task(&mut self, task: Box<dyn Task>, channel_idx: usize) -> Result<(), Box<dyn Task>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    ///
    /// # Returns
    /// - `Some(usize)` index of a channel below `MAX_TASKS_IN_FLIGHT`
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// The task is sent to an idle worker if there is one and queued otherwise.
    /// Without workers the task is processed right here.
    ///
    /// # Returns
    /// - `true` if the task was started (or run inline)
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task>) -> bool {
        if self.channels.is_empty() {
            self.inline_results.push_back(task.process());
            return true;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers until the queue is empty or every
    /// worker is busy. Tasks leave the queue in FIFO order.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    // Channel is disconnected, put task back and stop processing
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Handles every completed task result and publishes the tasks they spawn.
    ///
    /// # Arguments
    /// * `scheduler` - Bookkeeping passed to each result's `handle_result`
    ///
    /// # Returns
    /// The number of results handled.
    pub fn process_completed_tasks(&mut self, scheduler: &mut MeshScheduler) -> usize {
        let mut results = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }
        results.extend(self.inline_results.drain(..));

        let handled = results.len();
        let mut tasks_to_queue = Vec::new();
        for result in results {
            tasks_to_queue.extend(result.handle_result(scheduler));
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }

        handled
    }

    /// Number of tasks sent to workers whose results have not been handled.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum::<usize>()
            + self.inline_results.len()
    }

    /// Number of tasks waiting for a free worker.
    pub fn queued_task_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Returns `true` when nothing is queued, running or waiting to be handled.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender, worker, ..
            } = channel;
            // Closing the sender ends the worker's receive loop.
            drop(task_sender);
            if worker.join().is_err() {
                error!("A chunk worker panicked");
            }
        }
    }
}
