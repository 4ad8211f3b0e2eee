//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an object mentioned in the log
///
/// Stable for the duration of one log. `ObjectId::NONE` (-1) is the log's
/// "environment / unknown" value and the default for a missing id field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub i64);

impl ObjectId {
    pub const NONE: ObjectId = ObjectId(-1);

    pub fn is_none(&self) -> bool {
        self.0 < 0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game tick counter (log time unit)
pub type Tick = u64;

/// 50 ticks = 1 second of game time (affected by time compression)
pub const TICKS_PER_SECOND: u64 = 50;

/// Length of one in-game minute in ticks
pub const TICKS_PER_MINUTE: u64 = TICKS_PER_SECOND * 60;

/// Signed difference `later - earlier` in game seconds
pub fn secs_between(earlier: Tick, later: Tick) -> f64 {
    (later as f64 - earlier as f64) / TICKS_PER_SECOND as f64
}

/// Format a tick count as HH:MM:SS of game time
pub fn format_ticks(ticks: Tick) -> String {
    let total = ticks / TICKS_PER_SECOND;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// 3D world position as logged
///
/// The log orders coordinates as (x, altitude, z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Altitude in whole meters, truncated toward zero
    pub fn altitude(&self) -> i32 {
        self.y as i32
    }
}
