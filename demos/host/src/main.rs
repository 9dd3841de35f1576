//! Host demo of the RTK kernel.
//!
//! A background thread stands in for the 1 ms timer interrupt and calls
//! `tick`; the main thread is the main loop and calls `drain`. The demo
//! walks IDLE -> ARMED -> FAULT and stops after a fixed number of ticks.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use rtk_core::{state_id, task_fn, KernelConfig, RtkResult, StateId, TraceRecord};

const IDLE: StateId = state_id!(0);
const ARMED: StateId = state_id!(1);
const FAULT: StateId = state_id!(2);

const RUN_TICKS: u32 = 300;

static TICKS: AtomicU32 = AtomicU32::new(0);
static ARM_REQUEST: AtomicBool = AtomicBool::new(false);
static SAMPLES: AtomicU32 = AtomicU32::new(0);

fn heartbeat() {
    println!("[{:>4}] heartbeat", TICKS.load(Ordering::Relaxed));
}

fn sample_sensors() {
    let n = SAMPLES.fetch_add(1, Ordering::Relaxed) + 1;
    if n == 8 {
        println!("[{:>4}] sensor out of range", TICKS.load(Ordering::Relaxed));
        let _ = rtk_kernel::switch_state(FAULT);
    }
}

fn blink_fault() {
    println!("[{:>4}] FAULT", TICKS.load(Ordering::Relaxed));
}

task_fn!(HEARTBEAT, heartbeat);
task_fn!(SAMPLE_SENSORS, sample_sensors);
task_fn!(BLINK_FAULT, blink_fault);

fn arm_outputs() {
    println!("entry: outputs armed");
}

fn disarm_outputs() {
    println!("exit: outputs disarmed");
}

fn trace(record: &TraceRecord) {
    if !record.is_runtime() {
        println!("trace [{:>2}] {}", record.id(), record);
    }
}

fn setup() -> RtkResult<()> {
    let config = KernelConfig::builder().name("demo").trace_hook(trace).build();
    rtk_kernel::kernel().init_with(config)?;

    let idle = rtk_kernel::add_state(None, None)?;
    let armed = rtk_kernel::add_state(Some(arm_outputs), Some(disarm_outputs))?;
    let fault = rtk_kernel::add_state(None, None)?;
    debug_assert_eq!((idle, armed, fault), (IDLE, ARMED, FAULT));

    rtk_kernel::schedule_task(IDLE, &HEARTBEAT, 50)?;
    rtk_kernel::schedule_task(ARMED, &HEARTBEAT, 50)?;
    rtk_kernel::schedule_task(ARMED, &SAMPLE_SENSORS, 10)?;
    rtk_kernel::schedule_task(FAULT, &BLINK_FAULT, 25)?;
    Ok(())
}

fn main() -> RtkResult<()> {
    setup()?;

    let timer = thread::spawn(|| {
        while TICKS.load(Ordering::Relaxed) < RUN_TICKS {
            thread::sleep(Duration::from_millis(1));
            if rtk_kernel::tick().is_err() {
                break;
            }
            let now = TICKS.fetch_add(1, Ordering::Relaxed) + 1;
            if now == 100 {
                ARM_REQUEST.store(true, Ordering::Relaxed);
            }
        }
    });

    let mut armed = false;
    while !timer.is_finished() {
        if ARM_REQUEST.swap(false, Ordering::Relaxed) && !armed {
            rtk_kernel::switch_state(ARMED)?;
            armed = true;
        }
        rtk_kernel::drain()?;
        thread::sleep(Duration::from_micros(200));
    }
    rtk_kernel::drain()?;

    let _ = timer.join();
    println!("in FAULT: {}", rtk_kernel::in_state(FAULT)?);
    Ok(())
}
