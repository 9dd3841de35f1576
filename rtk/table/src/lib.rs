#![no_std]
#![forbid(unsafe_code)]

//! # RTK Tables
//!
//! Fixed-capacity registries backing the kernel:
//! - [`TaskTable`]: periodic callbacks with their countdowns
//! - [`StateTable`]: states with entry/exit hooks and task activation masks
//!
//! Both tables are append-only. A slot index handed out at registration stays
//! valid for the lifetime of the table, until it is reset.

pub mod state;
pub mod task;

pub use state::*;
pub use task::*;
