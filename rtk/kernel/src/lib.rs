#![no_std]
#![forbid(unsafe_code)]

//! # RTK Kernel
//!
//! Cooperative, interrupt-driven scheduler layered under a finite-state
//! machine. Firmware registers states and attaches periodic tasks to them;
//! a timer interrupt calls [`tick`] at a fixed cadence and the main loop
//! calls [`drain`] to run whatever became ready.
//!
//! ```ignore
//! static BLINK: TaskFn = TaskFn::new(blink_led);
//! task_fn!(SAMPLE, sample_sensors);
//!
//! rtk_kernel::init();
//! let idle = rtk_kernel::add_state(None, None)?;
//! let armed = rtk_kernel::add_state(Some(arm_outputs), Some(disarm_outputs))?;
//! rtk_kernel::schedule_task(idle, &BLINK, 500)?;
//! rtk_kernel::schedule_task(armed, &BLINK, 500)?;
//! rtk_kernel::schedule_task(armed, &SAMPLE, 10)?;
//!
//! // SysTick handler
//! let _ = rtk_kernel::tick();
//!
//! // main loop
//! loop {
//!     rtk_kernel::drain()?;
//! }
//! ```

pub mod kernel;

pub use kernel::{Kernel, Kernel32, Kernel64};
pub use rtk_core::{
    task_fn, KernelConfig, RtkError, RtkResult, SlotMask, StateId, TaskFn, TaskId, TaskRef,
    TraceRecord, MAX_STATES, MAX_TASKS,
};

#[cfg(test)]
mod tests;

/// Kernel type behind the global API
pub type GlobalKernel = Kernel<u32, MAX_TASKS, MAX_STATES>;

/// Global kernel instance
static KERNEL: GlobalKernel = Kernel::new();

/// Get the global kernel
pub fn kernel() -> &'static GlobalKernel {
    &KERNEL
}

/// Reset the global kernel; call once at start-up
pub fn init() {
    kernel().init()
}

/// Register a state with the global kernel
pub fn add_state(entry: Option<fn()>, exit: Option<fn()>) -> RtkResult<StateId> {
    kernel().add_state(entry, exit)
}

/// Schedule a periodic task in a state of the global kernel
pub fn schedule_task(state: StateId, task: TaskRef, period: u16) -> RtkResult<TaskId> {
    kernel().schedule_task(state, task, period)
}

/// Switch the global kernel to another state
pub fn switch_state(state: StateId) -> RtkResult<StateId> {
    kernel().switch_state(state)
}

/// Check the current state of the global kernel
pub fn in_state(state: StateId) -> RtkResult<bool> {
    kernel().in_state(state)
}

/// Timer interrupt entry point
pub fn tick() -> RtkResult<()> {
    kernel().tick()
}

/// Main loop entry point
pub fn drain() -> RtkResult<usize> {
    kernel().drain()
}
