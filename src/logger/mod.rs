//! Diagnostics: tagged stderr console plus an optional JSONL activity log.

pub mod console;
pub mod jsonl;
