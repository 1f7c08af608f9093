//! Event system for the Voyages pipeline
//!
//! This crate provides the event bus and event types for observing
//! pipeline runs in real time (CLI progress output, tests).

mod bus;
mod types;

pub use bus::EventBus;
pub use types::*;
