//! State table: operating modes with hooks and task activation masks

use heapless::Vec;
use rtk_core::{Hook, MaskWord, RtkError, RtkResult, SlotMask, StateId, TaskId};

/// One registered state
#[derive(Debug, Clone, Copy)]
pub struct StateSlot<W: MaskWord> {
    entry: Hook,
    exit: Hook,
    task_mask: SlotMask<W>,
}

impl<W: MaskWord> StateSlot<W> {
    pub fn entry(&self) -> Hook {
        self.entry
    }

    pub fn exit(&self) -> Hook {
        self.exit
    }

    /// Tasks eligible to run while this state is current
    pub fn task_mask(&self) -> SlotMask<W> {
        self.task_mask
    }
}

/// Fixed-capacity state registry
pub struct StateTable<W: MaskWord, const N: usize> {
    states: Vec<StateSlot<W>, N>,
    limit: usize,
}

impl<W: MaskWord, const N: usize> StateTable<W, N> {
    /// Create a new empty table using the full capacity
    pub const fn new() -> Self {
        Self {
            states: Vec::new(),
            limit: N,
        }
    }

    /// Drop every state and apply a new registration limit
    pub fn reset(&mut self, limit: usize) {
        self.states.clear();
        self.limit = limit.min(N);
    }

    /// Append a state with an empty task mask
    pub fn register(&mut self, entry: Hook, exit: Hook) -> RtkResult<StateId> {
        if self.states.len() >= self.limit {
            return Err(RtkError::CapacityExceeded);
        }

        let slot = self.states.len();
        self.states
            .push(StateSlot {
                entry,
                exit,
                task_mask: SlotMask::EMPTY,
            })
            .map_err(|_| RtkError::CapacityExceeded)?;
        Ok(StateId::new(slot as u8))
    }

    pub fn get(&self, state: StateId) -> RtkResult<&StateSlot<W>> {
        self.states.get(state.index()).ok_or(RtkError::InvalidIndex)
    }

    /// Enable a task in a state's mask; idempotent
    pub fn activate(&mut self, state: StateId, task: TaskId) -> RtkResult<()> {
        let slot = self
            .states
            .get_mut(state.index())
            .ok_or(RtkError::InvalidIndex)?;
        slot.task_mask.insert(task.index())
    }

    /// Check if a task is enabled in a state's mask
    pub fn is_active(&self, state: StateId, task: TaskId) -> RtkResult<bool> {
        Ok(self.get(state)?.task_mask.contains(task.index()))
    }

    pub fn task_mask(&self, state: StateId) -> RtkResult<SlotMask<W>> {
        Ok(self.get(state)?.task_mask)
    }

    /// Check if an id names a registered state
    pub fn contains(&self, state: StateId) -> bool {
        state.index() < self.states.len()
    }

    /// Number of registered states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<W: MaskWord, const N: usize> Default for StateTable<W, N> {
    fn default() -> Self {
        Self::new()
    }
}
