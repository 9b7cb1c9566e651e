//! Trace export.

pub mod export;
