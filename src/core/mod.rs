pub mod config;
pub mod error;
pub mod types;

pub use config::DebriefConfig;
pub use error::{DebriefError, Result};
pub use types::{format_ticks, ObjectId, Position, Tick, TICKS_PER_SECOND};
