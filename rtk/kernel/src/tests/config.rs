use core::sync::atomic::{AtomicUsize, Ordering};

use crate::kernel::{Kernel, Kernel32};
use crate::tests::Recorder;
use rtk_core::{KernelConfig, RtkError, TaskFn, TraceRecord};

#[test]
fn config_wider_than_mask_is_rejected() {
    let kernel = Kernel::<u8, 8, 4>::new();
    kernel.add_state(None, None).unwrap();

    let config = KernelConfig::builder().max_tasks(9).max_states(4).build();
    assert_eq!(kernel.init_with(config), Err(RtkError::CapacityMismatch));
    // nothing was reset
    assert_eq!(kernel.state_count(), 1);
}

#[test]
fn config_limits_bound_registration() {
    fn work() {
        static RUNS: AtomicUsize = AtomicUsize::new(0);
        RUNS.fetch_add(1, Ordering::SeqCst);
    }
    static WORK: TaskFn = TaskFn::new(work);

    let kernel = Kernel32::new();
    let config = KernelConfig::builder()
        .name("Limited")
        .max_tasks(2)
        .max_states(1)
        .build();
    kernel.init_with(config).unwrap();
    assert_eq!(kernel.config().name, "Limited");

    let idle = kernel.add_state(None, None).unwrap();
    assert_eq!(kernel.add_state(None, None), Err(RtkError::CapacityExceeded));

    kernel.schedule_task(idle, &WORK, 1).unwrap();
    kernel.schedule_task(idle, &WORK, 2).unwrap();
    assert_eq!(kernel.schedule_task(idle, &WORK, 3), Err(RtkError::CapacityExceeded));

    // plain init restores the full capacity
    kernel.init();
    assert_eq!(kernel.config().max_tasks, 32);
}

#[test]
fn idle_callback_runs_on_empty_drain() {
    static IDLE: AtomicUsize = AtomicUsize::new(0);
    static RUNS: AtomicUsize = AtomicUsize::new(0);
    fn on_idle() {
        IDLE.fetch_add(1, Ordering::SeqCst);
    }
    fn work() {
        RUNS.fetch_add(1, Ordering::SeqCst);
    }
    static WORK: TaskFn = TaskFn::new(work);

    let kernel = Kernel32::new();
    kernel
        .init_with(KernelConfig::builder().idle_callback(on_idle).build())
        .unwrap();
    let idle = kernel.add_state(None, None).unwrap();
    kernel.schedule_task(idle, &WORK, 2).unwrap();

    kernel.tick().unwrap();
    assert_eq!(kernel.drain(), Ok(0));
    assert_eq!(IDLE.load(Ordering::SeqCst), 1);

    kernel.tick().unwrap();
    assert_eq!(kernel.drain(), Ok(1));
    assert_eq!(IDLE.load(Ordering::SeqCst), 1);
}

#[test]
fn trace_hook_sees_kernel_steps() {
    static TRACE: Recorder = Recorder::new();
    fn hook(record: &TraceRecord) {
        TRACE.push(match record {
            TraceRecord::StateAdded { .. } => "state added",
            TraceRecord::TaskAdded { .. } => "task added",
            TraceRecord::TaskReused { .. } => "task reused",
            TraceRecord::TaskActivated { .. } => "task activated",
            TraceRecord::StateExit { .. } => "exit",
            TraceRecord::StateEntry { .. } => "entry",
            TraceRecord::StateSwitched { .. } => "switched",
            TraceRecord::TaskReady { .. } => "ready",
            TraceRecord::TaskRun { .. } => "run",
            TraceRecord::Idle => "idle",
        });
    }
    fn enter() {}
    fn work() {
        static RUNS: AtomicUsize = AtomicUsize::new(0);
        RUNS.fetch_add(1, Ordering::SeqCst);
    }
    static WORK: TaskFn = TaskFn::new(work);

    let kernel = Kernel32::new();
    kernel
        .init_with(KernelConfig::builder().trace_hook(hook).build())
        .unwrap();
    let idle = kernel.add_state(None, None).unwrap();
    let armed = kernel.add_state(Some(enter), None).unwrap();
    kernel.schedule_task(idle, &WORK, 1).unwrap();
    kernel.schedule_task(armed, &WORK, 1).unwrap();
    kernel.tick().unwrap();
    kernel.drain().unwrap();
    kernel.switch_state(armed).unwrap();
    kernel.drain().unwrap();

    assert_eq!(
        TRACE.events().as_slice(),
        &[
            "state added",
            "state added",
            "task added",
            "task activated",
            "task reused",
            "task activated",
            "ready",
            "run",
            "entry",
            "switched",
            "idle",
        ]
    );
}
