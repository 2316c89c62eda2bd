//! Reference host driver for [`HostTask`] implementations.
//!
//! Game engines ship their own task schedulers; [`TaskSet`] is a minimal one
//! with the same contract, used by the demo binary and by tests to drive
//! worker AIs tick by tick.

use tracing::debug;

use crate::HostTask;

/// Handle returned by [`TaskSet::add_task`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(usize);

struct Entry<T> {
    handle: TaskHandle,
    priority: i32,
    task: T,
    running: bool,
}

impl<T: HostTask> Entry<T> {
    fn start(&mut self) {
        debug!(target: "colony_ai::host", task = self.task.name(), "starting task");
        self.running = true;
        self.task.start_executing();
    }

    fn stop(&mut self) {
        debug!(target: "colony_ai::host", task = self.task.name(), "stopping task");
        self.running = false;
        self.task.reset_task();
    }
}

/// Prioritized set of host tasks.
///
/// # Tick Semantics
///
/// Lower priority values win. Each [`TaskSet::tick`]:
///
/// 1. stops running tasks whose `should_continue_executing` is false
/// 2. walks idle tasks in priority order and starts those whose
///    `should_execute` is true, unless a running task of equal or higher
///    priority holds intersecting mutex bits; running lower-priority tasks
///    with intersecting bits are stopped first
/// 3. calls `update_task` on every running task
pub struct TaskSet<T: HostTask = Box<dyn HostTask>> {
    entries: Vec<Entry<T>>,
    next_handle: usize,
}

impl<T: HostTask> TaskSet<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 0,
        }
    }

    /// Adds a task; tasks with equal priority keep insertion order.
    pub fn add_task(&mut self, priority: i32, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        let pos = self.entries.partition_point(|e| e.priority <= priority);
        self.entries.insert(
            pos,
            Entry {
                handle,
                priority,
                task,
                running: false,
            },
        );
        handle
    }

    /// Runs one host tick over all tasks.
    pub fn tick(&mut self) {
        for entry in self.entries.iter_mut().filter(|e| e.running) {
            if !entry.task.should_continue_executing() {
                entry.stop();
            }
        }

        for index in 0..self.entries.len() {
            if self.entries[index].running {
                continue;
            }

            let priority = self.entries[index].priority;
            let bits = self.entries[index].task.mutex_bits();
            let blocked = self.entries.iter().any(|e| {
                e.running && e.priority <= priority && !e.task.mutex_bits().compatible_with(bits)
            });
            if blocked || !self.entries[index].task.should_execute() {
                continue;
            }

            for other in self.entries.iter_mut().filter(|e| {
                e.running && e.priority > priority && !e.task.mutex_bits().compatible_with(bits)
            }) {
                other.stop();
            }
            self.entries[index].start();
        }

        for entry in self.entries.iter_mut().filter(|e| e.running) {
            entry.task.update_task();
        }
    }

    pub fn get(&self, handle: TaskHandle) -> Option<&T> {
        self.entry(handle).map(|e| &e.task)
    }

    pub fn get_mut(&mut self, handle: TaskHandle) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|e| e.handle == handle)
            .map(|e| &mut e.task)
    }

    /// Returns `true` if the task is currently running.
    pub fn is_running(&self, handle: TaskHandle) -> bool {
        self.entry(handle).is_some_and(|e| e.running)
    }

    /// Returns the number of running tasks.
    pub fn running_count(&self) -> usize {
        self.entries.iter().filter(|e| e.running).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, handle: TaskHandle) -> Option<&Entry<T>> {
        self.entries.iter().find(|e| e.handle == handle)
    }
}

impl<T: HostTask> Default for TaskSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MutexBits;

    #[derive(Default)]
    struct CountingTask {
        name: &'static str,
        bits: MutexBits,
        wants: bool,
        started: u32,
        updates: u32,
        resets: u32,
    }

    impl CountingTask {
        fn new(name: &'static str, bits: MutexBits) -> Self {
            Self {
                name,
                bits,
                wants: true,
                ..Self::default()
            }
        }
    }

    impl HostTask for CountingTask {
        fn name(&self) -> &str {
            self.name
        }

        fn mutex_bits(&self) -> MutexBits {
            self.bits
        }

        fn should_execute(&mut self) -> bool {
            self.wants
        }

        fn start_executing(&mut self) {
            self.started += 1;
        }

        fn update_task(&mut self) {
            self.updates += 1;
        }

        fn reset_task(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn compatible_tasks_run_together() {
        let mut tasks = TaskSet::new();
        let a = tasks.add_task(1, CountingTask::new("a", MutexBits::MOVEMENT));
        let b = tasks.add_task(2, CountingTask::new("b", MutexBits::JUMP));

        tasks.tick();
        tasks.tick();

        assert!(tasks.is_running(a));
        assert!(tasks.is_running(b));
        assert_eq!(tasks.get(a).unwrap().started, 1);
        assert_eq!(tasks.get(b).unwrap().updates, 2);
    }

    #[test]
    fn higher_priority_blocks_conflicting_task() {
        let mut tasks = TaskSet::new();
        let low = tasks.add_task(5, CountingTask::new("low", MutexBits::WORKER_AI));
        let high = tasks.add_task(1, CountingTask::new("high", MutexBits::LOOK));

        tasks.tick();
        assert!(tasks.is_running(high));
        assert!(!tasks.is_running(low));
        assert_eq!(tasks.running_count(), 1);
    }

    #[test]
    fn higher_priority_preempts_running_task() {
        let mut tasks = TaskSet::new();
        let low = tasks.add_task(5, CountingTask::new("low", MutexBits::WORKER_AI));
        let high = tasks.add_task(1, CountingTask::new("high", MutexBits::MOVEMENT));
        tasks.get_mut(high).unwrap().wants = false;

        tasks.tick();
        assert!(tasks.is_running(low));

        tasks.get_mut(high).unwrap().wants = true;
        tasks.tick();
        assert!(tasks.is_running(high));
        assert!(!tasks.is_running(low));
        assert_eq!(tasks.get(low).unwrap().resets, 1);
    }

    #[test]
    fn task_stops_when_it_no_longer_wants_to_run() {
        let mut tasks = TaskSet::new();
        let a = tasks.add_task(0, CountingTask::new("a", MutexBits::WORKER_AI));

        tasks.tick();
        tasks.get_mut(a).unwrap().wants = false;
        tasks.tick();

        let task = tasks.get(a).unwrap();
        assert!(!tasks.is_running(a));
        assert_eq!(task.started, 1);
        assert_eq!(task.updates, 1);
        assert_eq!(task.resets, 1);
    }

    #[test]
    fn boxed_tasks_are_supported() {
        let mut tasks: TaskSet = TaskSet::new();
        let a = tasks.add_task(0, Box::new(CountingTask::new("a", MutexBits::JUMP)));
        tasks.tick();
        assert!(tasks.is_running(a));
        assert_eq!(tasks.get(a).unwrap().name(), "a");
    }
}
