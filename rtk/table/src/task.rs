//! Task table: periodic callbacks indexed by registration order

use heapless::Vec;
use rtk_core::{
    same_task, Countdown, MaskWord, Period, RtkError, RtkResult, SlotMask, TaskId, TaskRef,
};

/// One registered periodic task
#[derive(Debug, Clone, Copy)]
pub struct TaskSlot {
    task: TaskRef,
    countdown: Countdown,
}

impl TaskSlot {
    pub fn task(&self) -> TaskRef {
        self.task
    }

    pub fn period(&self) -> Period {
        self.countdown.period()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    fn matches(&self, task: TaskRef, period: Period) -> bool {
        same_task(self.task, task) && self.countdown.period() == period
    }
}

/// Outcome of a task registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new slot was allocated
    Added(TaskId),
    /// An identical (handle, period) pair was already registered
    Existing(TaskId),
}

impl Registration {
    pub const fn id(self) -> TaskId {
        match self {
            Registration::Added(id) | Registration::Existing(id) => id,
        }
    }
}

/// Fixed-capacity task registry
///
/// Holds at most `N` tasks; `limit` may lower that bound at reset.
pub struct TaskTable<const N: usize> {
    tasks: Vec<TaskSlot, N>,
    limit: usize,
}

impl<const N: usize> TaskTable<N> {
    /// Create a new empty table using the full capacity
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            limit: N,
        }
    }

    /// Drop every task and apply a new registration limit
    pub fn reset(&mut self, limit: usize) {
        self.tasks.clear();
        self.limit = limit.min(N);
    }

    /// Register a task, reusing the slot of an identical (handle, period)
    /// pair. A reused slot keeps its countdown.
    pub fn register(&mut self, task: TaskRef, period: Period) -> RtkResult<Registration> {
        if let Some(slot) = self.tasks.iter().position(|t| t.matches(task, period)) {
            return Ok(Registration::Existing(TaskId::new(slot as u8)));
        }

        if self.tasks.len() >= self.limit {
            return Err(RtkError::CapacityExceeded);
        }

        let slot = self.tasks.len();
        self.tasks
            .push(TaskSlot {
                task,
                countdown: Countdown::new(period),
            })
            .map_err(|_| RtkError::CapacityExceeded)?;
        Ok(Registration::Added(TaskId::new(slot as u8)))
    }

    pub fn get(&self, task: TaskId) -> RtkResult<&TaskSlot> {
        self.tasks.get(task.index()).ok_or(RtkError::InvalidIndex)
    }

    /// Decrement the countdown of a task by one tick
    pub fn tick(&mut self, task: TaskId) -> RtkResult<()> {
        self.slot_mut(task)?.countdown.tick();
        Ok(())
    }

    /// Check if the countdown of a task has run out
    pub fn is_due(&self, task: TaskId) -> RtkResult<bool> {
        Ok(self.get(task)?.countdown.is_due())
    }

    /// Reload the countdown of a task to its full period
    pub fn rearm(&mut self, task: TaskId) -> RtkResult<()> {
        self.slot_mut(task)?.countdown.rearm();
        Ok(())
    }

    /// Advance every task by one tick.
    ///
    /// All countdowns are decremented; tasks in `active` that are due are
    /// rearmed and returned in the ready mask. Inactive countdowns keep
    /// running down.
    pub fn advance<W: MaskWord>(&mut self, active: SlotMask<W>) -> SlotMask<W> {
        let mut ready = SlotMask::EMPTY;
        for (slot, task) in self.tasks.iter_mut().enumerate() {
            task.countdown.tick();
            if active.contains(slot) && task.countdown.is_due() {
                task.countdown.rearm();
                // slot < N <= W::WIDTH
                let _ = ready.insert(slot);
            }
        }
        ready
    }

    /// Handle of a task
    pub fn handle(&self, task: TaskId) -> RtkResult<TaskRef> {
        Ok(self.get(task)?.task)
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registration limit
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskSlot> + '_ {
        self.tasks.iter()
    }

    fn slot_mut(&mut self, task: TaskId) -> RtkResult<&mut TaskSlot> {
        self.tasks.get_mut(task.index()).ok_or(RtkError::InvalidIndex)
    }
}

impl<const N: usize> Default for TaskTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
