//! Kernel trace records
//!
//! Every observable kernel step produces a [`TraceRecord`]. The kernel
//! forwards records to the `log` facade and to the optional [`TraceHook`]
//! from the configuration, always outside of critical sections.

use core::fmt;

use crate::{Period, StateId, TaskId};

/// Record: state registered
pub const RTK_STATE_ADDED: u8 = 1;
/// Record: new task slot allocated
pub const RTK_TASK_ADDED: u8 = 2;
/// Record: registration matched an existing task slot
pub const RTK_TASK_REUSED: u8 = 3;
/// Record: task enabled in a state's task mask
pub const RTK_TASK_ACTIVATED: u8 = 4;
/// Record: exit hook of the outgoing state invoked
pub const RTK_STATE_EXIT: u8 = 10;
/// Record: entry hook of the incoming state invoked
pub const RTK_STATE_ENTRY: u8 = 11;
/// Record: current state committed
pub const RTK_STATE_SWITCHED: u8 = 12;
/// Record: task marked pending by a tick
pub const RTK_TASK_READY: u8 = 20;
/// Record: pending task executed by a drain pass
pub const RTK_TASK_RUN: u8 = 21;
/// Record: drain pass found no pending work
pub const RTK_IDLE: u8 = 22;

/// Hook receiving every trace record
pub type TraceHook = fn(&TraceRecord);

/// Observable kernel step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRecord {
    StateAdded { state: StateId },
    TaskAdded { task: TaskId, period: Period },
    TaskReused { task: TaskId, period: Period },
    TaskActivated { state: StateId, task: TaskId },
    StateExit { state: StateId },
    StateEntry { state: StateId },
    StateSwitched { from: StateId, to: StateId },
    TaskReady { task: TaskId },
    TaskRun { task: TaskId },
    Idle,
}

impl TraceRecord {
    /// Stable numeric record id
    pub const fn id(&self) -> u8 {
        match self {
            TraceRecord::StateAdded { .. } => RTK_STATE_ADDED,
            TraceRecord::TaskAdded { .. } => RTK_TASK_ADDED,
            TraceRecord::TaskReused { .. } => RTK_TASK_REUSED,
            TraceRecord::TaskActivated { .. } => RTK_TASK_ACTIVATED,
            TraceRecord::StateExit { .. } => RTK_STATE_EXIT,
            TraceRecord::StateEntry { .. } => RTK_STATE_ENTRY,
            TraceRecord::StateSwitched { .. } => RTK_STATE_SWITCHED,
            TraceRecord::TaskReady { .. } => RTK_TASK_READY,
            TraceRecord::TaskRun { .. } => RTK_TASK_RUN,
            TraceRecord::Idle => RTK_IDLE,
        }
    }

    /// Records from the tick/drain hot path
    pub const fn is_runtime(&self) -> bool {
        matches!(
            self,
            TraceRecord::TaskReady { .. } | TraceRecord::TaskRun { .. } | TraceRecord::Idle
        )
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::StateAdded { state } => write!(f, "state added: {state}"),
            TraceRecord::TaskAdded { task, period } => {
                write!(f, "task added: {task} every {period}")
            }
            TraceRecord::TaskReused { task, period } => {
                write!(f, "task reused: {task} every {period}")
            }
            TraceRecord::TaskActivated { state, task } => {
                write!(f, "task activated: {task} in {state}")
            }
            TraceRecord::StateExit { state } => write!(f, "exit: {state}"),
            TraceRecord::StateEntry { state } => write!(f, "entry: {state}"),
            TraceRecord::StateSwitched { from, to } => write!(f, "switched: {from} -> {to}"),
            TraceRecord::TaskReady { task } => write!(f, "ready: {task}"),
            TraceRecord::TaskRun { task } => write!(f, "run: {task}"),
            TraceRecord::Idle => write!(f, "idle"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TraceRecord {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TraceRecord::StateAdded { state } => defmt::write!(fmt, "StateAdded({})", state),
            TraceRecord::TaskAdded { task, period } => {
                defmt::write!(fmt, "TaskAdded({}, {})", task, period)
            }
            TraceRecord::TaskReused { task, period } => {
                defmt::write!(fmt, "TaskReused({}, {})", task, period)
            }
            TraceRecord::TaskActivated { state, task } => {
                defmt::write!(fmt, "TaskActivated({}, {})", state, task)
            }
            TraceRecord::StateExit { state } => defmt::write!(fmt, "StateExit({})", state),
            TraceRecord::StateEntry { state } => defmt::write!(fmt, "StateEntry({})", state),
            TraceRecord::StateSwitched { from, to } => {
                defmt::write!(fmt, "StateSwitched({}, {})", from, to)
            }
            TraceRecord::TaskReady { task } => defmt::write!(fmt, "TaskReady({})", task),
            TraceRecord::TaskRun { task } => defmt::write!(fmt, "TaskRun({})", task),
            TraceRecord::Idle => defmt::write!(fmt, "Idle"),
        }
    }
}
