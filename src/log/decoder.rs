//! Event decoder: raw log lines to typed records
//!
//! Decoding is a pure, order-preserving transform. Lines without a valid
//! header or with a marker the engine does not consume are skipped.

use std::path::Path;

use crate::core::error::{DebriefError, Result};
use crate::log::event::{AmmoCount, EventKind, LogEvent, TerminalKind};
use crate::log::fields::{header, Fields};

/// Event-type markers (`AType:<n>`)
pub mod marker {
    pub const MISSION_START: u32 = 0;
    pub const SHOT: u32 = 1;
    pub const DAMAGE: u32 = 2;
    pub const DESTROY: u32 = 3;
    pub const PLAYER_MISSION_END: u32 = 4;
    pub const TAKEOFF: u32 = 5;
    pub const LANDING: u32 = 6;
    pub const CRASH: u32 = 7;
    pub const AIRCRAFT_SPAWN: u32 = 10;
    pub const OBJECT_SPAWN: u32 = 12;
    pub const PARACHUTE_SPAWN: u32 = 13;
    pub const PILOT_SEPARATION: u32 = 18;
}

/// Read a log file fully into memory
pub fn read_log(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|source| DebriefError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Decode every relevant line, keeping log order
pub fn decode<I, S>(lines: I) -> Vec<LogEvent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| decode_line(line.as_ref()))
        .collect()
}

/// Decode a single line
pub fn decode_line(line: &str) -> Option<LogEvent> {
    let line = line.trim();
    let (rest, (tick, atype)) = match header(line) {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::trace!("Skipping line without event header: {:?}", line);
            return None;
        }
    };
    let fields = Fields::parse(rest);

    let kind = match atype {
        marker::MISSION_START => EventKind::MissionStart {
            game_date: fields.text("GDate"),
            game_time: fields.text("GTime"),
            mission_file: fields.text("MFile"),
        },
        marker::SHOT => EventKind::Shot {
            ammo: fields.text("AMMO"),
            attacker: fields.id("AID"),
            target: fields.id("TID"),
        },
        marker::DAMAGE => EventKind::Damage {
            attacker: fields.id("AID"),
            target: fields.id("TID"),
            damage: fields.float("DMG"),
            position: fields.position(),
        },
        marker::DESTROY => EventKind::Destroy {
            attacker: fields.id("AID"),
            target: fields.id("TID"),
            position: fields.position(),
        },
        marker::PLAYER_MISSION_END => EventKind::PlayerMissionEnd {
            aircraft: fields.id("PLID"),
            pilot: fields.id("PID"),
            ammo: ammo(&fields),
        },
        marker::TAKEOFF => EventKind::Takeoff {
            pilot: fields.id("PID"),
            position: fields.position(),
        },
        marker::LANDING | marker::CRASH => EventKind::LandingOrCrash {
            pilot: fields.id("PID"),
            kind: if atype == marker::CRASH {
                TerminalKind::Crash
            } else {
                TerminalKind::Landing
            },
            position: fields.position(),
        },
        marker::AIRCRAFT_SPAWN => EventKind::AircraftSpawn {
            aircraft: fields.id("PLID"),
            pilot: fields.id("PID"),
            name: fields.text("NAME"),
            type_tag: fields.text("TYPE"),
            country: country(&fields),
            is_player: fields.flag("ISPL"),
            ammo: ammo(&fields),
        },
        marker::OBJECT_SPAWN => EventKind::ObjectSpawn {
            id: fields.id("ID"),
            name: fields.text("NAME"),
            type_tag: fields.text("TYPE"),
            country: country(&fields),
            parent: fields.id("PID"),
        },
        marker::PARACHUTE_SPAWN => EventKind::ParachuteSpawn {
            paratrooper: fields.mentions("paratrooper"),
        },
        marker::PILOT_SEPARATION => EventKind::PilotSeparation {
            bot: fields.id("BOTID"),
            parent: fields.id("PARENTID"),
        },
        _ => return None,
    };

    Some(LogEvent { tick, kind })
}

fn ammo(fields: &Fields) -> AmmoCount {
    let count = |key| {
        fields
            .int(key)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    };
    AmmoCount {
        bullets: count("BUL"),
        shells: count("SH"),
    }
}

fn country(fields: &Fields) -> Option<u32> {
    fields.int("COUNTRY").and_then(|v| u32::try_from(v).ok())
}
