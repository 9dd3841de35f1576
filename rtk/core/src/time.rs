//! Tick periods and task countdowns

use core::fmt;
use core::num::NonZeroU16;

use crate::{RtkError, RtkResult};

/// Positive task period in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(NonZeroU16);

impl Period {
    /// Create a period, rejecting zero
    pub const fn new(ticks: u16) -> RtkResult<Self> {
        match NonZeroU16::new(ticks) {
            Some(ticks) => Ok(Self(ticks)),
            None => Err(RtkError::InvalidPeriod),
        }
    }

    /// Period length in ticks
    pub const fn ticks(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ticks", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Period {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}ticks", self.0.get());
    }
}

/// Live countdown of a periodic task
///
/// Decremented once per tick whether or not the task is active. The counter
/// is allowed to run below zero; it never exceeds the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    period: Period,
    counter: i32,
}

impl Countdown {
    /// Create a countdown armed to a full period
    pub const fn new(period: Period) -> Self {
        Self {
            period,
            counter: period.ticks() as i32,
        }
    }

    pub const fn period(&self) -> Period {
        self.period
    }

    /// Ticks left until due; zero or negative once due
    pub const fn remaining(&self) -> i32 {
        self.counter
    }

    /// Advance by one tick
    pub fn tick(&mut self) {
        self.counter = self.counter.saturating_sub(1);
    }

    /// Check if the countdown has run out
    pub const fn is_due(&self) -> bool {
        self.counter <= 0
    }

    /// Reload to a full period
    pub fn rearm(&mut self) {
        self.counter = self.period.ticks() as i32;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Countdown {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Countdown({}/{})", self.counter, self.period);
    }
}
