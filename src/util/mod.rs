//! Utility modules: retry, cache, timeout.

pub mod cache;
pub mod retry;
pub mod timeout;
