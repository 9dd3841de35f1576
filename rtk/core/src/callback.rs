//! Callback handles for tasks and state hooks

use core::fmt;

/// Zero-argument action run on a state transition
#[derive(Clone, Copy)]
pub struct Callback(fn());

impl Callback {
    pub const fn new(f: fn()) -> Self {
        Self(f)
    }

    /// Run the operation
    #[inline]
    pub fn invoke(self) {
        (self.0)()
    }
}

impl From<fn()> for Callback {
    fn from(f: fn()) -> Self {
        Self(f)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Callback {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Callback");
    }
}

/// Optional entry or exit action of a state
pub type Hook = Option<Callback>;

/// Registration handle of a periodic task body
///
/// Declared as a `static`; the handle's address is the task identity, so
/// two handles are the same task only when they are the same static, even
/// if the wrapped functions are folded together by the optimizer.
///
/// ```ignore
/// static BLINK: TaskFn = TaskFn::new(blink_led);
/// kernel.schedule_task(idle, &BLINK, 500)?;
/// ```
pub struct TaskFn(fn());

impl TaskFn {
    pub const fn new(f: fn()) -> Self {
        Self(f)
    }

    /// Run the task body
    #[inline]
    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for TaskFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskFn({:p})", self)
    }
}

/// Task handle as stored by the task table
pub type TaskRef = &'static TaskFn;

/// Check if both handles name the same registered task
pub fn same_task(a: TaskRef, b: TaskRef) -> bool {
    core::ptr::eq(a, b)
}

/// Macro to declare a task handle `static`
#[macro_export]
macro_rules! task_fn {
    ($name:ident, $body:path) => {
        static $name: $crate::TaskFn = $crate::TaskFn::new($body);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static HITS: AtomicUsize = AtomicUsize::new(0);

    #[inline(never)]
    fn led_on() {
        HITS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(never)]
    fn buzzer_on() {
        HITS.fetch_add(1, Ordering::Relaxed);
    }

    static LED: TaskFn = TaskFn::new(led_on);
    static BUZZER: TaskFn = TaskFn::new(buzzer_on);
    task_fn!(LED_AGAIN, led_on);

    #[test]
    fn test_identity_by_handle() {
        assert!(same_task(&LED, &LED));
        // identical bodies, distinct handles
        assert!(!same_task(&LED, &BUZZER));
        // same body, distinct handle
        assert!(!same_task(&LED, &LED_AGAIN));
    }

    #[test]
    fn test_invoke() {
        let before = HITS.load(Ordering::Relaxed);
        BUZZER.invoke();
        Callback::new(led_on).invoke();
        assert_eq!(HITS.load(Ordering::Relaxed), before + 2);
    }
}
