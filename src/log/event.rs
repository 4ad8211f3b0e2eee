//! Typed log records

use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Position, Tick};

/// Bullets and shells carried, as reported on spawn and at mission end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmoCount {
    pub bullets: u32,
    pub shells: u32,
}

impl AmmoCount {
    pub fn total(&self) -> u32 {
        self.bullets + self.shells
    }
}

/// Which ground event terminated the flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalKind {
    Landing,
    Crash,
}

/// One decoded log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub tick: Tick,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    MissionStart {
        game_date: String,
        game_time: String,
        mission_file: String,
    },
    Shot {
        ammo: String,
        attacker: ObjectId,
        /// `ObjectId::NONE` when the shot hit nothing
        target: ObjectId,
    },
    Damage {
        attacker: ObjectId,
        target: ObjectId,
        damage: f64,
        position: Option<Position>,
    },
    Destroy {
        attacker: ObjectId,
        target: ObjectId,
        position: Option<Position>,
    },
    PlayerMissionEnd {
        aircraft: ObjectId,
        pilot: ObjectId,
        ammo: AmmoCount,
    },
    Takeoff {
        pilot: ObjectId,
        position: Option<Position>,
    },
    LandingOrCrash {
        pilot: ObjectId,
        kind: TerminalKind,
        position: Option<Position>,
    },
    AircraftSpawn {
        aircraft: ObjectId,
        pilot: ObjectId,
        name: String,
        type_tag: String,
        country: Option<u32>,
        is_player: bool,
        ammo: AmmoCount,
    },
    ObjectSpawn {
        id: ObjectId,
        name: String,
        type_tag: String,
        country: Option<u32>,
        parent: ObjectId,
    },
    ParachuteSpawn {
        paratrooper: bool,
    },
    PilotSeparation {
        bot: ObjectId,
        parent: ObjectId,
    },
}
