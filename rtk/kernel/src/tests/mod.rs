mod config;
mod transition;

use core::cell::RefCell;
use critical_section::Mutex;
use heapless::Vec;

/// Ordered log of named events shared with `fn()` callbacks
pub(crate) struct Recorder {
    events: Mutex<RefCell<Vec<&'static str, 32>>>,
}

impl Recorder {
    pub(crate) const fn new() -> Self {
        Self {
            events: Mutex::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn push(&self, event: &'static str) {
        critical_section::with(|cs| {
            let _ = self.events.borrow_ref_mut(cs).push(event);
        });
    }

    pub(crate) fn events(&self) -> Vec<&'static str, 32> {
        critical_section::with(|cs| self.events.borrow_ref(cs).clone())
    }
}
