//! Stable slot identifiers for registered tasks and states

use core::fmt;

/// Slot of a registered task in the task table
///
/// Assigned at registration in registration order and stable for the life of
/// the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u8);

impl TaskId {
    /// Create a task id from a raw slot index
    pub const fn new(slot: u8) -> Self {
        TaskId(slot)
    }

    /// Get the raw slot value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Slot as a table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Task({})", self.0);
    }
}

/// Slot of a registered state in the state table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u8);

impl StateId {
    /// The state the kernel starts in
    pub const INITIAL: StateId = StateId(0);

    /// Create a state id from a raw slot index
    pub const fn new(slot: u8) -> Self {
        StateId(slot)
    }

    /// Get the raw slot value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Slot as a table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "State({})", self.0);
    }
}

/// Macro to create compile-time state id constants
#[macro_export]
macro_rules! state_id {
    ($value:literal) => {
        $crate::StateId::new($value)
    };
}
