//! Bounded partition scheduler
//!
//! A counting semaphore with a fixed number of slots. A job is launched
//! only after it acquires a slot, and the slot is released when the job's
//! guard drops, on success, on error and on panic alike. After dispatching,
//! the scheduler waits until every slot is free again.
//!
//! Once any job fails no further partitions are dispatched. Jobs already
//! running finish on their own; the first error is returned.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread;

use super::errors::{SelectError, SelectResult};

#[derive(Debug)]
struct SlotState {
    available: usize,
    /// High-water mark of slots held at once
    peak_in_use: usize,
}

/// Counting semaphore guarding job launches.
#[derive(Debug)]
struct Slots {
    capacity: usize,
    state: Mutex<SlotState>,
    freed: Condvar,
}

impl Slots {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(SlotState {
                available: capacity,
                peak_in_use: 0,
            }),
            freed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Blocks until a slot is free and takes it.
    fn acquire(&self) -> SlotGuard<'_> {
        let mut state = self.lock();
        while state.available == 0 {
            state = match self.freed.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
        state.available -= 1;
        let in_use = self.capacity - state.available;
        state.peak_in_use = state.peak_in_use.max(in_use);
        SlotGuard { slots: self }
    }

    fn release(&self) {
        let mut state = self.lock();
        state.available += 1;
        self.freed.notify_all();
    }

    /// Blocks until no slot is held.
    fn wait_idle(&self) {
        let mut state = self.lock();
        while state.available < self.capacity {
            state = match self.freed.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }
    }

    fn peak_in_use(&self) -> usize {
        self.lock().peak_in_use
    }
}

/// A held slot; released on drop.
struct SlotGuard<'a> {
    slots: &'a Slots,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slots.release();
    }
}

/// Runs one job per partition with at most `ceiling` in flight.
#[derive(Debug)]
pub struct BoundedScheduler {
    slots: Slots,
}

impl BoundedScheduler {
    /// Creates a scheduler; a ceiling of zero is treated as one.
    pub fn new(ceiling: usize) -> Self {
        Self {
            slots: Slots::new(ceiling.max(1)),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.slots.capacity
    }

    /// Largest number of jobs that ever ran at the same time
    pub fn peak_concurrency(&self) -> usize {
        self.slots.peak_in_use()
    }

    /// Dispatches `job` for every partition and waits for all of them.
    ///
    /// Results are returned in partition order. On failure the first
    /// error observed is returned after in-flight jobs have finished.
    pub fn run<T, F, I>(&self, partitions: I, job: F) -> SelectResult<Vec<T>>
    where
        I: IntoIterator<Item = usize>,
        F: Fn(usize) -> SelectResult<T> + Sync,
        T: Send,
    {
        let results: Mutex<Vec<(usize, T)>> = Mutex::new(Vec::new());
        let failure: Mutex<Option<SelectError>> = Mutex::new(None);
        let job = &job;

        thread::scope(|scope| {
            for partition in partitions {
                let slot = self.slots.acquire();
                if lock_ignoring_poison(&failure).is_some() {
                    break;
                }

                let results = &results;
                let failure = &failure;
                scope.spawn(move || {
                    let _slot = slot;
                    match job(partition) {
                        Ok(value) => lock_ignoring_poison(results).push((partition, value)),
                        Err(err) => {
                            let mut first = lock_ignoring_poison(failure);
                            if first.is_none() {
                                *first = Some(err);
                            }
                        }
                    }
                });
            }

            self.slots.wait_idle();
        });

        if let Some(err) = into_inner_ignoring_poison(failure) {
            return Err(err);
        }

        let mut results = into_inner_ignoring_poison(results);
        results.sort_by_key(|(partition, _)| *partition);
        Ok(results.into_iter().map(|(_, value)| value).collect())
    }
}

fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn into_inner_ignoring_poison<T>(mutex: Mutex<T>) -> T {
    match mutex.into_inner() {
        Ok(value) => value,
        Err(poisoned) => poisoned.into_inner(),
    }
}
