//! Scheduler kernel: state registration, task scheduling, transitions and the
//! tick/drain protocol.

use core::cell::{Cell, RefCell};

use critical_section::{CriticalSection, Mutex};
use rtk_core::{
    Callback, KernelConfig, MaskWord, Period, RtkError, RtkResult, SlotMask, StateId, TaskId,
    TaskRef, TraceHook, TraceRecord,
};
use rtk_table::{Registration, StateTable, TaskTable};

/// Kernel with 32 task slots over a 32-bit mask and 16 states
pub type Kernel32 = Kernel<u32, 32, 16>;

/// Kernel with 64 task slots over a 64-bit mask and 16 states
pub type Kernel64 = Kernel<u64, 64, 16>;

struct Tables<W: MaskWord, const T: usize, const S: usize> {
    config: KernelConfig,
    tasks: TaskTable<T>,
    states: StateTable<W, S>,
    current: StateId,
    /// Set while the hooks of a switch run
    switching: bool,
}

/// Cooperative scheduler kernel.
///
/// `tick` is the producer and runs from the timer interrupt; `drain` is the
/// consumer and runs from the main loop. Registration, `switch_state` and
/// `in_state` belong to the main-loop context as well.
///
/// `W` backs the task and pending masks, `T` is the task storage and `S` the
/// state storage. `T` may not exceed the width of `W`.
pub struct Kernel<W: MaskWord, const T: usize, const S: usize> {
    tables: Mutex<RefCell<Tables<W, T, S>>>,
    /// Ready tasks not yet drained
    pending: Mutex<Cell<SlotMask<W>>>,
}

impl<W: MaskWord, const T: usize, const S: usize> Kernel<W, T, S> {
    const CAPACITY_FITS: () = assert!(
        T <= W::WIDTH && T <= u8::MAX as usize + 1 && S <= u8::MAX as usize + 1,
        "task storage exceeds the slot mask width"
    );

    /// Create a new kernel with empty tables
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_FITS;
        Self {
            tables: Mutex::new(RefCell::new(Tables {
                config: KernelConfig::with_capacity(T, S),
                tasks: TaskTable::new(),
                states: StateTable::new(),
                current: StateId::INITIAL,
                switching: false,
            })),
            pending: Mutex::new(Cell::new(SlotMask::EMPTY)),
        }
    }

    /// Reset the kernel to empty tables using the full capacity
    pub fn init(&self) {
        self.reset(KernelConfig::with_capacity(T, S));
    }

    /// Reset the kernel to empty tables under `config`
    ///
    /// Nothing changes when the configured limits do not fit the storage or
    /// the mask width.
    pub fn init_with(&self, config: KernelConfig) -> RtkResult<()> {
        config.validate::<W>(T, S)?;
        self.reset(config);
        Ok(())
    }

    fn reset(&self, config: KernelConfig) {
        critical_section::with(|cs| {
            let mut tables = self.tables.borrow_ref_mut(cs);
            tables.tasks.reset(config.max_tasks);
            tables.states.reset(config.max_states);
            tables.current = StateId::INITIAL;
            tables.switching = false;
            tables.config = config;
            self.pending.borrow(cs).set(SlotMask::EMPTY);
        });
        log::debug!(
            "{}: init, {} tasks / {} states",
            config.name,
            config.max_tasks,
            config.max_states
        );
    }

    /// Register a state with optional entry and exit hooks
    pub fn add_state(&self, entry: Option<fn()>, exit: Option<fn()>) -> RtkResult<StateId> {
        let (state, hook) = self.with_tables(|tables| -> RtkResult<_> {
            let state = tables
                .states
                .register(entry.map(Callback::new), exit.map(Callback::new))?;
            Ok((state, tables.config.trace_hook))
        })?;
        emit(hook, TraceRecord::StateAdded { state });
        Ok(state)
    }

    /// Schedule `task` every `period` ticks while `state` is current.
    ///
    /// The same handle with the same period, already registered for another
    /// state, shares its task slot; only the activation in `state` is added.
    /// Handles are compared by address, so distinct statics are distinct
    /// tasks even when they wrap the same function.
    pub fn schedule_task(&self, state: StateId, task: TaskRef, period: u16) -> RtkResult<TaskId> {
        let period = Period::new(period)?;
        let (registration, hook) = self.with_tables(|tables| {
            if !tables.states.contains(state) {
                return Err(RtkError::InvalidIndex);
            }
            let registration = tables.tasks.register(task, period)?;
            tables.states.activate(state, registration.id())?;
            Ok((registration, tables.config.trace_hook))
        })?;

        let task = registration.id();
        match registration {
            Registration::Added(_) => emit(hook, TraceRecord::TaskAdded { task, period }),
            Registration::Existing(_) => emit(hook, TraceRecord::TaskReused { task, period }),
        }
        emit(hook, TraceRecord::TaskActivated { state, task });
        Ok(task)
    }

    /// Make `target` the current state.
    ///
    /// Runs the exit hook of the current state, then the entry hook of
    /// `target`, then commits the switch; `in_state` reports the old state
    /// while the hooks run. Switching to the current state is a no-op.
    /// A switch requested from one of those hooks fails with
    /// `TransitionInProgress` and leaves the outer switch running.
    /// Main-loop context only.
    pub fn switch_state(&self, target: StateId) -> RtkResult<StateId> {
        let step = self.with_tables(|tables| {
            if tables.switching {
                return Err(RtkError::TransitionInProgress);
            }
            if !tables.states.contains(target) {
                return Err(RtkError::InvalidIndex);
            }
            let from = tables.current;
            if from == target {
                return Ok(None);
            }
            let exit = tables.states.get(from)?.exit();
            let entry = tables.states.get(target)?.entry();
            tables.switching = true;
            Ok(Some((from, exit, entry, tables.config.trace_hook)))
        })?;

        let Some((from, exit, entry, hook)) = step else {
            return Ok(target);
        };

        if let Some(exit) = exit {
            exit.invoke();
            emit(hook, TraceRecord::StateExit { state: from });
        }
        if let Some(entry) = entry {
            entry.invoke();
            emit(hook, TraceRecord::StateEntry { state: target });
        }

        self.with_tables(|tables| {
            tables.current = target;
            tables.switching = false;
        });
        emit(hook, TraceRecord::StateSwitched { from, to: target });
        Ok(target)
    }

    /// Check if `state` is the current state
    pub fn in_state(&self, state: StateId) -> RtkResult<bool> {
        self.with_tables(|tables| {
            if !tables.states.contains(state) {
                return Err(RtkError::InvalidIndex);
            }
            Ok(tables.current == state)
        })
    }

    /// The current state
    pub fn current_state(&self) -> RtkResult<StateId> {
        self.with_tables(|tables| {
            if tables.states.is_empty() {
                return Err(RtkError::NotReady);
            }
            Ok(tables.current)
        })
    }

    /// Advance time by one tick. Timer interrupt context.
    ///
    /// Every task counts down; tasks enabled in the current state that are
    /// due get rearmed and marked pending.
    pub fn tick(&self) -> RtkResult<()> {
        let (ready, hook) = critical_section::with(|cs| {
            let mut tables = self.tables.borrow_ref_mut(cs);
            if tables.states.is_empty() {
                return Err(RtkError::NotReady);
            }
            let current = tables.current;
            let active = tables.states.task_mask(current)?;
            let ready = tables.tasks.advance(active);

            let pending = self.pending.borrow(cs);
            pending.set(pending.get().union(ready));
            Ok((ready, tables.config.trace_hook))
        })?;

        for slot in ready {
            emit(hook, TraceRecord::TaskReady { task: TaskId::new(slot as u8) });
        }
        Ok(())
    }

    /// Run every pending task once, in slot order. Main-loop context only.
    ///
    /// Each pending bit is cleared under a critical section before its
    /// callback runs with interrupts enabled, so a tick landing during the
    /// callback marks the task for the next pass. Returns the number of
    /// callbacks executed.
    pub fn drain(&self) -> RtkResult<usize> {
        let (snapshot, hook, idle) = critical_section::with(|cs| {
            let tables = self.tables.borrow_ref(cs);
            if tables.states.is_empty() {
                return Err(RtkError::NotReady);
            }
            Ok((
                self.pending.borrow(cs).get(),
                tables.config.trace_hook,
                tables.config.idle_callback,
            ))
        })?;

        let mut executed = 0;
        for slot in snapshot {
            let task = TaskId::new(slot as u8);
            let due = critical_section::with(|cs| self.take_pending(cs, task));
            if let Some(body) = due {
                body.invoke();
                executed += 1;
                emit(hook, TraceRecord::TaskRun { task });
            }
        }

        if executed == 0 {
            if let Some(idle) = idle {
                idle();
            }
            emit(hook, TraceRecord::Idle);
        }
        Ok(executed)
    }

    /// Test-and-clear the pending bit of `task`, yielding its handle
    fn take_pending(&self, cs: CriticalSection<'_>, task: TaskId) -> Option<TaskRef> {
        let pending = self.pending.borrow(cs);
        let mut mask = pending.get();
        if !mask.remove(task.index()) {
            return None;
        }
        pending.set(mask);
        self.tables.borrow_ref(cs).tasks.handle(task).ok()
    }

    /// Snapshot of the pending mask
    pub fn pending(&self) -> SlotMask<W> {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }

    /// Number of registered tasks
    pub fn task_count(&self) -> usize {
        self.with_tables(|tables| tables.tasks.len())
    }

    /// Number of registered states
    pub fn state_count(&self) -> usize {
        self.with_tables(|tables| tables.states.len())
    }

    pub fn task_period(&self, task: TaskId) -> RtkResult<Period> {
        self.with_tables(|tables| Ok(tables.tasks.get(task)?.period()))
    }

    /// Tasks enabled in `state`
    pub fn task_mask(&self, state: StateId) -> RtkResult<SlotMask<W>> {
        self.with_tables(|tables| tables.states.task_mask(state))
    }

    /// Active configuration
    pub fn config(&self) -> KernelConfig {
        self.with_tables(|tables| tables.config)
    }

    fn with_tables<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Tables<W, T, S>) -> R,
    {
        critical_section::with(|cs| {
            let mut tables = self.tables.borrow_ref_mut(cs);
            f(&mut tables)
        })
    }
}

impl<W: MaskWord, const T: usize, const S: usize> Default for Kernel<W, T, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "defmt")]
impl<W: MaskWord, const T: usize, const S: usize> defmt::Format for Kernel<W, T, S> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Kernel{{tasks: {}, states: {}, pending: {}}}",
            self.task_count(),
            self.state_count(),
            self.pending()
        );
    }
}

/// Forward a record to the log facade and the configured hook
fn emit(hook: Option<TraceHook>, record: TraceRecord) {
    if record.is_runtime() {
        log::trace!("[{}] {}", record.id(), record);
    } else {
        log::debug!("[{}] {}", record.id(), record);
    }
    if let Some(hook) = hook {
        hook(&record);
    }
}
