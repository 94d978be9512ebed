//! # Task Module
//!
//! A small worker-thread pool for CPU-heavy terrain work, chunk generation
//! above all. Each worker owns a dedicated channel pair; tasks are dealt out
//! round-robin and their results drain back to the primary thread, which is
//! the only place allowed to touch render-facing state.
//!
//! ## Lifecycle
//! 1. Tasks are handed to [`TaskManager::publish_task`].
//! 2. A worker picks the task up and runs [`Task::process`].
//! 3. The primary thread calls [`TaskManager::process_completed_tasks`]
//!    every frame, which runs each result's `handle_result`, pushes any
//!    follow-up tasks, and lets results enqueue render commands.
//! 4. [`TaskManager::process_queued_tasks`] re-dispatches work that was
//!    queued while every worker was busy.

pub mod chunk_load_task;
pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::info;

use crate::terrain::chunk_manager::ChunkManager;
use crate::terrain::render_queue::RenderQueue;

pub use task::{Task, TaskResult};

/// Maximum tasks a single worker may have in flight. One keeps per-worker
/// ordering trivial; raising it would pipeline at the cost of smarter
/// dependency tracking.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// A communication channel between the primary thread and one worker.
struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Owns the worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

impl TaskManager {
    /// Spawns `num_workers` worker threads.
    ///
    /// # Panics
    /// Panics if thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::Builder::new()
                .name(format!("terrain-worker-{worker_index}"))
                .spawn(move || {
                    while let Ok(task) = task_rx.recv() {
                        let result = task.process();
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                })
                .expect("failed to spawn terrain worker thread");

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        info!("task manager started with {num_workers} workers");

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to hand `task` to the worker behind `channel_idx`, returning
    /// the task on failure so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(send_error) => Err(send_error.0),
        }
    }

    /// Finds a worker that can accept another task, round-robin from the
    /// last used one.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Schedules `task` for background execution.
    ///
    /// Returns `true` when a worker accepted it immediately, `false` when it
    /// was queued because every worker is busy.
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(()) => {
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

    /// Re-dispatches queued tasks while workers are available. Call once per
    /// frame.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                return;
            };
            let task = self.queued_tasks.pop_front().unwrap();
            if let Err(task) = self.try_send_task(task, channel_idx) {
                // Worker gone; put the task back and stop for this frame.
                self.queued_tasks.push_front(task);
                return;
            }
        }
    }

    /// Drains every completed result and runs its primary-thread handler.
    /// Must be called from the primary thread.
    pub fn process_completed_tasks(&mut self, manager: &ChunkManager, queue: &RenderQueue) {
        let mut follow_up_tasks = Vec::new();
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                follow_up_tasks.extend(result.handle_result(manager, queue));
            }
        }

        for task in follow_up_tasks {
            self.publish_task(task);
        }
    }

    /// Whether any work is still queued or running.
    pub fn has_pending_work(&self) -> bool {
        !self.queued_tasks.is_empty()
            || self
                .channels
                .iter()
                .any(|channel| channel.num_tasks_in_flight > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::EngineConfig;
    use crate::core::MtResource;
    use crate::terrain::render_queue;
    use crate::terrain::test_support::FlatBiome;

    struct CountingTask {
        counter: MtResource<u32>,
        spawn_follow_up: bool,
    }

    struct CountingResult {
        counter: MtResource<u32>,
        spawn_follow_up: bool,
    }

    impl Task for CountingTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            Box::new(CountingResult {
                counter: self.counter.clone(),
                spawn_follow_up: self.spawn_follow_up,
            })
        }
    }

    impl TaskResult for CountingResult {
        fn handle_result(
            self: Box<Self>,
            _manager: &ChunkManager,
            _queue: &RenderQueue,
        ) -> Vec<Box<dyn Task + Send>> {
            *self.counter.get_mut() += 1;
            if self.spawn_follow_up {
                vec![Box::new(CountingTask {
                    counter: self.counter.clone(),
                    spawn_follow_up: false,
                })]
            } else {
                Vec::new()
            }
        }
    }

    fn test_manager() -> ChunkManager {
        ChunkManager::new(&EngineConfig::default(), Arc::new(FlatBiome::new(5)))
    }

    fn pump_until(
        tasks: &mut TaskManager,
        manager: &ChunkManager,
        queue: &RenderQueue,
        counter: &MtResource<u32>,
        expected: u32,
    ) {
        for _ in 0..500 {
            tasks.process_completed_tasks(manager, queue);
            tasks.process_queued_tasks();
            if *counter.get() == expected && !tasks.has_pending_work() {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("tasks did not settle at {expected} results");
    }

    #[test]
    fn overflow_tasks_queue_and_eventually_run() {
        let manager = test_manager();
        let (queue, _receiver) = render_queue::bounded(4);
        let mut tasks = TaskManager::new(2);
        let counter = MtResource::new(0);

        let mut queued = 0;
        for _ in 0..6 {
            let accepted = tasks.publish_task(Box::new(CountingTask {
                counter: counter.clone(),
                spawn_follow_up: false,
            }));
            if !accepted {
                queued += 1;
            }
        }
        // Two workers with one slot each: at least four tasks had to queue.
        assert!(queued >= 4);

        pump_until(&mut tasks, &manager, &queue, &counter, 6);
    }

    #[test]
    fn results_can_spawn_follow_up_tasks() {
        let manager = test_manager();
        let (queue, _receiver) = render_queue::bounded(4);
        let mut tasks = TaskManager::new(1);
        let counter = MtResource::new(0);

        tasks.publish_task(Box::new(CountingTask {
            counter: counter.clone(),
            spawn_follow_up: true,
        }));

        // Original plus its follow-up.
        pump_until(&mut tasks, &manager, &queue, &counter, 2);
    }
}
