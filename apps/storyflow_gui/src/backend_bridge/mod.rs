//! Bridge between the egui thread and the async I/O worker.

pub mod commands;
pub mod runtime;
