#![no_std]
#![forbid(unsafe_code)]

//! # RTK Core
//!
//! Core types shared by the RTK tables and kernel: fixed-width slot masks,
//! slot identifiers, tick countdowns, callback handles, configuration and
//! trace records. Nothing in this crate allocates.

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

pub mod callback;
pub mod config;
pub mod ids;
pub mod mask;
pub mod time;
pub mod trace;

pub use callback::*;
pub use config::*;
pub use ids::*;
pub use mask::*;
pub use time::*;
pub use trace::*;

/// RTK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout RTK
pub type RtkResult<T> = Result<T, RtkError>;

/// Error types for RTK operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtkError {
    /// Registration attempted beyond the fixed table size
    CapacityExceeded,
    /// Id does not correspond to a registered slot
    InvalidIndex,
    /// Runtime operation issued before any state was registered
    NotReady,
    /// Task period of zero ticks
    InvalidPeriod,
    /// Configuration does not fit the table storage or mask width
    CapacityMismatch,
    /// State switch requested from a hook of a switch in progress
    TransitionInProgress,
}

impl fmt::Display for RtkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtkError::CapacityExceeded => write!(f, "Table capacity exceeded"),
            RtkError::InvalidIndex => write!(f, "Invalid slot index"),
            RtkError::NotReady => write!(f, "No state registered"),
            RtkError::InvalidPeriod => write!(f, "Task period must be positive"),
            RtkError::CapacityMismatch => write!(f, "Capacity does not fit storage or mask width"),
            RtkError::TransitionInProgress => write!(f, "State switch already in progress"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RtkError {}

#[cfg(feature = "defmt")]
impl defmt::Format for RtkError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RtkError::CapacityExceeded => defmt::write!(fmt, "CapacityExceeded"),
            RtkError::InvalidIndex => defmt::write!(fmt, "InvalidIndex"),
            RtkError::NotReady => defmt::write!(fmt, "NotReady"),
            RtkError::InvalidPeriod => defmt::write!(fmt, "InvalidPeriod"),
            RtkError::CapacityMismatch => defmt::write!(fmt, "CapacityMismatch"),
            RtkError::TransitionInProgress => defmt::write!(fmt, "TransitionInProgress"),
        }
    }
}
