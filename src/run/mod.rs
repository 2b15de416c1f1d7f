//! Driving a run to a terminal status, answering tool calls on the way.

pub mod driver;

pub use driver::{RunDriver, ToolFailurePolicy};
