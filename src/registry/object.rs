//! Objects mentioned in the log

use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Tick};
use crate::registry::category::{Classification, ObjectCategory};

/// Crew pseudo-objects that never count as kills
const CREW_MARKERS: [&str; 2] = ["botpilot", "botgunner"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectState {
    Alive,
    Destroyed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameObject {
    pub id: ObjectId,
    pub display_name: String,
    pub raw_type_tag: String,
    pub normalized_type: String,
    pub category: ObjectCategory,
    pub is_static: bool,
    pub country: Option<u32>,
    pub state: ObjectState,
    pub destroyed_at: Option<Tick>,
    pub destruction_altitude: Option<i32>,
}

impl GameObject {
    pub fn new(
        id: ObjectId,
        display_name: impl Into<String>,
        raw_type_tag: impl Into<String>,
        country: Option<u32>,
        classification: Classification,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            raw_type_tag: raw_type_tag.into(),
            normalized_type: classification.normalized_type,
            category: classification.category,
            is_static: classification.is_static,
            country,
            state: ObjectState::Alive,
            destroyed_at: None,
            destruction_altitude: None,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == ObjectState::Destroyed
    }

    pub fn is_excluded(&self) -> bool {
        self.category == ObjectCategory::Excluded
    }

    /// Bot pilots and gunners riding in another object
    pub fn is_crew(&self) -> bool {
        let lower = self.normalized_type.to_lowercase();
        CREW_MARKERS.iter().any(|m| lower.contains(m))
    }
}
