//! Utility modules: polling budget, timeout.

pub mod poll;
pub mod timeout;
