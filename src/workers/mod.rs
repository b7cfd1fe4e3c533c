//! Background workers
//!
//! The poller and the one-off detail and export requests it spawns.

pub mod core;
pub mod poller;
pub mod requests;
pub mod schedule;

pub use poller::{Command, PauseReason, Poller};
