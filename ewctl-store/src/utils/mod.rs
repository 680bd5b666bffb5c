//! Utility modules

pub mod log_sanitizer;
pub mod row;
