//! Capacity constants and runtime kernel configuration

use crate::{MaskWord, RtkError, RtkResult, TraceHook};

/// Task capacity of the global kernel
pub const MAX_TASKS: usize = 32;

/// State capacity of the global kernel
pub const MAX_STATES: usize = 16;

/// Configuration for an RTK kernel.
///
/// `max_tasks` and `max_states` bound registration; they must fit the
/// kernel's table storage and the width of its slot masks.
#[derive(Debug, Clone, Copy)]
pub struct KernelConfig {
    pub name: &'static str,
    pub max_tasks: usize,
    pub max_states: usize,
    pub idle_callback: Option<fn()>,
    pub trace_hook: Option<TraceHook>,
}

impl KernelConfig {
    /// Configuration using the full given capacities
    pub const fn with_capacity(max_tasks: usize, max_states: usize) -> Self {
        Self {
            name: "RTK",
            max_tasks,
            max_states,
            idle_callback: None,
            trace_hook: None,
        }
    }

    /// Creates a new kernel configuration builder.
    pub fn builder() -> KernelConfigBuilder {
        KernelConfigBuilder::default()
    }

    /// Check the limits against table storage and mask word `W`.
    pub fn validate<W: MaskWord>(
        &self,
        task_storage: usize,
        state_storage: usize,
    ) -> RtkResult<()> {
        if self.max_tasks > task_storage
            || self.max_tasks > W::WIDTH
            || self.max_states > state_storage
        {
            return Err(RtkError::CapacityMismatch);
        }
        // StateId and TaskId are u8 slots
        if self.max_tasks > u8::MAX as usize + 1 || self.max_states > u8::MAX as usize + 1 {
            return Err(RtkError::CapacityMismatch);
        }
        Ok(())
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::with_capacity(MAX_TASKS, MAX_STATES)
    }
}

/// Builder for ergonomic kernel configuration construction.
#[derive(Debug, Clone, Default)]
pub struct KernelConfigBuilder {
    config: KernelConfig,
}

impl KernelConfigBuilder {
    /// Sets the kernel name.
    pub fn name(mut self, name: &'static str) -> Self {
        self.config.name = name;
        self
    }

    /// Sets the maximum number of tasks.
    pub fn max_tasks(mut self, max: usize) -> Self {
        self.config.max_tasks = max;
        self
    }

    /// Sets the maximum number of states.
    pub fn max_states(mut self, max: usize) -> Self {
        self.config.max_states = max;
        self
    }

    /// Sets the callback run when a drain pass finds no pending work.
    pub fn idle_callback(mut self, callback: fn()) -> Self {
        self.config.idle_callback = Some(callback);
        self
    }

    /// Sets the hook receiving trace records.
    pub fn trace_hook(mut self, hook: TraceHook) -> Self {
        self.config.trace_hook = Some(hook);
        self
    }

    /// Builds the kernel configuration.
    pub fn build(self) -> KernelConfig {
        self.config
    }
}
