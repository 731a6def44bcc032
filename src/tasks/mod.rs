//! Background Tasks Module
//!
//! Long-running tasks spawned alongside the HTTP server.

mod sweep;

pub use sweep::spawn_sweep_task;
