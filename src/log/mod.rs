//! Mission log decoding
//!
//! Turns the raw chronological report into typed `LogEvent`s.

pub mod decoder;
pub mod event;
pub mod fields;

pub use decoder::{decode, decode_line, read_log};
pub use event::{AmmoCount, EventKind, LogEvent, TerminalKind};
