use core::sync::atomic::{AtomicUsize, Ordering};

use crate::kernel::Kernel32;
use crate::tests::Recorder;
use rtk_core::{RtkError, StateId};

const A: StateId = StateId::new(0);
const B: StateId = StateId::new(1);

#[test]
fn exit_runs_before_entry_while_still_in_old_state() {
    static KERNEL: Kernel32 = Kernel32::new();
    static LOG: Recorder = Recorder::new();

    fn note_state() {
        if KERNEL.in_state(A) == Ok(true) {
            LOG.push("in A");
        }
        if KERNEL.in_state(B) == Ok(true) {
            LOG.push("in B");
        }
    }
    fn enter_a() {
        LOG.push("enter A");
    }
    fn exit_a() {
        LOG.push("exit A");
        note_state();
    }
    fn enter_b() {
        LOG.push("enter B");
        note_state();
    }
    fn exit_b() {
        LOG.push("exit B");
    }

    KERNEL.init();
    assert_eq!(KERNEL.add_state(Some(enter_a), Some(exit_a)), Ok(A));
    assert_eq!(KERNEL.add_state(Some(enter_b), Some(exit_b)), Ok(B));

    assert_eq!(KERNEL.in_state(A), Ok(true));
    assert_eq!(KERNEL.switch_state(B), Ok(B));
    assert_eq!(KERNEL.in_state(A), Ok(false));
    assert_eq!(KERNEL.in_state(B), Ok(true));

    assert_eq!(
        LOG.events().as_slice(),
        &["exit A", "in A", "enter B", "in A"]
    );
}

#[test]
fn self_transition_is_a_no_op() {
    static HOOKS: AtomicUsize = AtomicUsize::new(0);
    fn enter() {
        HOOKS.fetch_add(1, Ordering::SeqCst);
    }
    fn exit() {
        HOOKS.fetch_add(100, Ordering::SeqCst);
    }

    let kernel = Kernel32::new();
    let idle = kernel.add_state(Some(enter), Some(exit)).unwrap();

    assert_eq!(kernel.switch_state(idle), Ok(idle));
    assert_eq!(HOOKS.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_hooks_are_skipped() {
    static HOOKS: AtomicUsize = AtomicUsize::new(0);
    fn enter() {
        HOOKS.fetch_add(1, Ordering::SeqCst);
    }

    let kernel = Kernel32::new();
    let idle = kernel.add_state(None, None).unwrap();
    let armed = kernel.add_state(Some(enter), None).unwrap();

    kernel.switch_state(armed).unwrap();
    kernel.switch_state(idle).unwrap();
    kernel.switch_state(armed).unwrap();
    assert_eq!(HOOKS.load(Ordering::SeqCst), 2);
    assert_eq!(kernel.current_state(), Ok(armed));
}

#[test]
fn initial_state_entry_hook_does_not_run() {
    static HOOKS: AtomicUsize = AtomicUsize::new(0);
    fn enter() {
        HOOKS.fetch_add(1, Ordering::SeqCst);
    }

    let kernel = Kernel32::new();
    let idle = kernel.add_state(Some(enter), None).unwrap();
    assert_eq!(kernel.current_state(), Ok(idle));
    assert_eq!(HOOKS.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_state_ids_are_rejected() {
    let kernel = Kernel32::new();
    assert_eq!(kernel.switch_state(A), Err(RtkError::InvalidIndex));
    assert_eq!(kernel.in_state(A), Err(RtkError::InvalidIndex));

    kernel.add_state(None, None).unwrap();
    assert_eq!(kernel.switch_state(B), Err(RtkError::InvalidIndex));
    assert_eq!(kernel.in_state(B), Err(RtkError::InvalidIndex));
    assert_eq!(kernel.task_mask(B), Err(RtkError::InvalidIndex));
    assert_eq!(kernel.current_state(), Ok(A));
}

#[test]
fn switch_from_a_hook_is_refused() {
    static KERNEL: Kernel32 = Kernel32::new();
    static NESTED: Recorder = Recorder::new();
    fn leave_a() {
        // the exit hook tries to redirect the switch back to A
        match KERNEL.switch_state(A) {
            Err(RtkError::TransitionInProgress) => NESTED.push("refused"),
            _ => NESTED.push("accepted"),
        }
    }

    KERNEL.init();
    KERNEL.add_state(None, Some(leave_a)).unwrap();
    KERNEL.add_state(None, None).unwrap();

    assert_eq!(KERNEL.switch_state(B), Ok(B));
    assert_eq!(NESTED.events().as_slice(), &["refused"]);
    assert_eq!(KERNEL.current_state(), Ok(B));

    // the guard is released once the switch commits
    assert_eq!(KERNEL.switch_state(A), Ok(A));
    assert_eq!(KERNEL.current_state(), Ok(A));
}
