//! Mission timeline and summary

pub mod assembler;
pub mod event;
pub mod summary;

pub use assembler::{MissionTimeline, TimelineAssembler};
pub use event::{sort_events, DamageReport, TimelineEvent, TimelineEventKind};
pub use summary::{flight_duration, DebriefSummary, KillCounts, MissionInfo};
