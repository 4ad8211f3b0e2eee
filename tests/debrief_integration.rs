//! End-to-end reconstruction tests driven by literal mission log text

use std::path::Path;

use mission_debrief::accuracy::WeaponTable;
use mission_debrief::core::DebriefConfig;
use mission_debrief::outcome::FlightState;
use mission_debrief::registry::CategoryTable;
use mission_debrief::timeline::{KillCounts, TimelineEvent, TimelineEventKind};
use mission_debrief::{Debrief, DebriefEngine};

const SPAWN: &str = "T:100 AType:10 PLID:1 PID:2 BUL:1500 SH:120 BOMB:0 RCT:0 (500.0,100.0,500.0) IDS:00000000-0000 LOGIN:00000000-0001 NAME:Ace TYPE:Yak-1 ser.69 COUNTRY:101 FORM:0 FIELD:0 INAIR:2 PARENT:-1 ISPL:1 ISTSTART:1 PAYLOAD:0 FUEL:1.000 SKIN: WM:1";
const ENEMY: &str = "T:110 AType:12 ID:100 TYPE:Bf 109 F-4 COUNTRY:201 NAME:Fighter PID:-1 POS(900.0,1500.0,900.0)";
const WINGMAN: &str = "T:111 AType:12 ID:30 TYPE:LaGG-3 ser.29 COUNTRY:101 NAME:Wingman PID:-1 POS(800.0,1500.0,800.0)";
const TAKEOFF: &str = "T:1000 AType:5 PID:2 POS(500.0,100.0,500.0)";

fn data_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn engine() -> DebriefEngine {
    let categories = CategoryTable::load(&data_path("object_categories.toml")).unwrap();
    let weapons = WeaponTable::load(&data_path("weapons.toml")).unwrap();
    DebriefEngine::new(DebriefConfig::default(), categories, weapons).unwrap()
}

fn run(lines: &[&str]) -> Debrief {
    engine().reconstruct(lines.iter().copied())
}

fn kills(debrief: &Debrief) -> Vec<&TimelineEvent> {
    debrief
        .timeline
        .events()
        .iter()
        .filter(|e| matches!(e.kind, TimelineEventKind::Kill { .. }))
        .collect()
}

#[test]
fn test_shipped_tables_load() {
    let categories = CategoryTable::load(&data_path("object_categories.toml")).unwrap();
    assert!(!categories.categories.is_empty());
    let weapons = WeaponTable::load(&data_path("weapons.toml")).unwrap();
    assert_eq!(weapons.caliber("SHELL_RUS_20x99_HE"), "20mm");
}

#[test]
fn test_half_share_indirect_not_credited() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        WINGMAN,
        "T:2000 AType:2 DMG:0.500 AID:1 TID:100 POS(900.0,1500.0,900.0)",
        "T:2100 AType:2 DMG:0.500 AID:30 TID:100 POS(900.0,1480.0,900.0)",
        "T:2200 AType:3 AID:-1 TID:100 POS(900.0,1400.0,900.0)",
    ]);
    assert_eq!(debrief.summary.kills.air, 0);
    assert!(kills(&debrief).is_empty());
}

#[test]
fn test_majority_share_indirect_credited_at_last_hit() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        WINGMAN,
        "T:2000 AType:2 DMG:0.800 AID:1 TID:100 POS(900.0,1500.0,900.0)",
        "T:2100 AType:2 DMG:0.200 AID:30 TID:100 POS(900.0,1480.0,900.0)",
        "T:2600 AType:3 AID:-1 TID:100 POS(900.0,1400.0,900.0)",
    ]);
    assert_eq!(debrief.summary.kills.air, 1);
    assert_eq!(debrief.summary.kills.air_flying, 1);
    let kill = kills(&debrief)[0];
    assert_eq!(kill.tick, 2100);
    match &kill.kind {
        TimelineEventKind::Kill {
            target, altitude, ..
        } => {
            assert_eq!(target, "Bf 109 F-4");
            assert_eq!(*altitude, Some(1400));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_environment_damage_not_credited_without_pilot_id() {
    let debrief = run(&[
        "T:100 AType:10 PLID:1 NAME:Ace TYPE:Yak-1 ser.69 COUNTRY:101 ISPL:1",
        ENEMY,
        "T:2000 AType:2 DMG:1.0 AID:-1 TID:100 POS(900.0,1500.0,900.0)",
        "T:2100 AType:3 AID:-1 TID:100 POS(900.0,1400.0,900.0)",
    ]);
    assert!(debrief.summary.player.is_some());
    assert_eq!(debrief.summary.kills.air, 0);
    assert!(kills(&debrief).is_empty());
}

#[test]
fn test_direct_kill_not_reevaluated() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        "T:2000 AType:2 DMG:1.000 AID:1 TID:100 POS(900.0,1500.0,900.0)",
        "T:2500 AType:3 AID:1 TID:100 POS(900.0,1450.0,900.0)",
        "T:2600 AType:3 AID:-1 TID:100 POS(900.0,1300.0,900.0)",
    ]);
    let kills = kills(&debrief);
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].tick, 2500);
    assert_eq!(debrief.summary.kills.air, 1);
}

#[test]
fn test_excluded_objects_never_kills() {
    let debrief = run(&[
        SPAWN,
        "T:120 AType:12 ID:200 TYPE:SC250 bomb COUNTRY:201 NAME:Bomb PID:-1",
        "T:2000 AType:2 DMG:1.000 AID:1 TID:200 POS(900.0,300.0,900.0)",
        "T:2100 AType:3 AID:1 TID:200 POS(900.0,300.0,900.0)",
        "T:2200 AType:3 AID:-1 TID:200 POS(900.0,300.0,900.0)",
    ]);
    assert_eq!(debrief.summary.kills, KillCounts::default());
    assert!(kills(&debrief).is_empty());
}

#[test]
fn test_crew_kills_filtered() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        "T:115 AType:12 ID:101 TYPE:BotPilot COUNTRY:201 NAME:BotPilot PID:100",
        "T:2500 AType:3 AID:1 TID:101 POS(900.0,1450.0,900.0)",
        "T:2500 AType:3 AID:1 TID:100 POS(900.0,1450.0,900.0)",
    ]);
    assert_eq!(kills(&debrief).len(), 1);
    assert_eq!(debrief.summary.kills.air, 1);
    assert_eq!(debrief.summary.kills.ground, 0);
}

#[test]
fn test_parked_aircraft_counted_separately() {
    let debrief = run(&[
        SPAWN,
        "T:120 AType:12 ID:300 TYPE:static_Bf 109 F-4[3456,1] COUNTRY:201 NAME:Parked PID:-1",
        "T:3000 AType:3 AID:1 TID:300 POS(900.0,120.0,900.0)",
    ]);
    assert_eq!(debrief.summary.kills.air, 1);
    assert_eq!(debrief.summary.kills.air_parked, 1);
    assert_eq!(debrief.summary.kills.air_flying, 0);
}

#[test]
fn test_long_separation_then_landing_marker_is_bailout() {
    let debrief = run(&[
        SPAWN,
        TAKEOFF,
        "T:50000 AType:18 BOTID:2 PARENTID:1 POS(700.0,2000.0,700.0)",
        "T:53000 AType:6 PID:2 POS(710.0,150.0,710.0)",
    ]);
    assert_eq!(debrief.summary.outcome, FlightState::BailedOut);
    assert_eq!(debrief.summary.final_state, "Bailed Out");
    let last = debrief.timeline.events().last().unwrap();
    assert!(matches!(last.kind, TimelineEventKind::BailedOut { .. }));
    assert_eq!(last.tick, 53000);
}

#[test]
fn test_short_separation_then_crash_marker_is_crash() {
    let debrief = run(&[
        SPAWN,
        TAKEOFF,
        "T:50000 AType:18 BOTID:2 PARENTID:1 POS(700.0,300.0,700.0)",
        "T:51500 AType:7 PID:2 POS(710.0,150.0,710.0)",
    ]);
    assert_eq!(debrief.summary.outcome, FlightState::Crashed);
    assert_eq!(debrief.summary.flight_duration.as_deref(), Some("00:16:50"));
}

#[test]
fn test_paratrooper_without_ground_event_is_bailout() {
    let debrief = run(&[
        SPAWN,
        TAKEOFF,
        "T:40000 AType:13 AID:500 COUNTRY:101 ENABLED:1 BC(0,0,0) TYPE:Paratrooper",
    ]);
    assert_eq!(debrief.summary.outcome, FlightState::BailedOut);
}

#[test]
fn test_wounded_stays_wounded() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        TAKEOFF,
        "T:5000 AType:2 DMG:0.005 AID:100 TID:2 POS(500.0,1000.0,500.0)",
        "T:5100 AType:2 DMG:0.006 AID:100 TID:2 POS(500.0,1000.0,500.0)",
        "T:5200 AType:2 DMG:0.000 AID:100 TID:2 POS(500.0,1000.0,500.0)",
        "T:90000 AType:6 PID:2 POS(500.0,100.0,500.0)",
    ]);
    assert!(debrief.summary.wounded);
    assert_eq!(debrief.summary.final_state, "Landed (Wounded)");
    assert_eq!(debrief.summary.pilot_damage, 1.1);
    assert_eq!(debrief.summary.aircraft_damage, 0.0);
}

const TOUCHDOWN: u64 = 200_000;

/// Self-sourced hit `secs` before touchdown, 70 s after an air kill
fn landing_log(secs: u64) -> Vec<String> {
    let damage_tick = TOUCHDOWN - secs * 50;
    let kill_tick = damage_tick - 70 * 50;
    vec![
        SPAWN.to_string(),
        ENEMY.to_string(),
        TAKEOFF.to_string(),
        format!("T:{} AType:3 AID:1 TID:100 POS(900.0,800.0,900.0)", kill_tick),
        format!(
            "T:{} AType:2 DMG:0.150 AID:1 TID:1 POS(500.0,220.0,500.0)",
            damage_tick
        ),
        format!("T:{} AType:6 PID:2 POS(500.0,100.0,500.0)", TOUCHDOWN),
    ]
}

#[test]
fn test_landing_damage_reclassified() {
    let debrief = engine().reconstruct(landing_log(45));
    assert!(debrief.summary.hard_landing);
    assert_eq!(debrief.summary.final_state, "Landed (Hard Landing)");

    let events = debrief.timeline.events();
    assert!(events
        .iter()
        .any(|e| matches!(e.kind, TimelineEventKind::LandingDamage(_))));
    assert!(!events
        .iter()
        .any(|e| matches!(e.kind, TimelineEventKind::DamageTaken(_))));
    assert!(events.iter().any(|e| matches!(
        e.kind,
        TimelineEventKind::Landing {
            hard_landing: true,
            ..
        }
    )));
}

#[test]
fn test_damage_outside_landing_window_kept() {
    let debrief = engine().reconstruct(landing_log(65));
    assert!(!debrief.summary.hard_landing);
    assert_eq!(debrief.summary.final_state, "Landed");
    let damage = debrief
        .timeline
        .events()
        .iter()
        .find(|e| matches!(e.kind, TimelineEventKind::DamageTaken(_)))
        .unwrap();
    match &damage.kind {
        TimelineEventKind::DamageTaken(report) => {
            assert_eq!(report.source, "Yak-1 ser.69");
            assert_eq!(report.damage, "15.0% aircraft");
            assert_eq!(report.altitude, Some(220));
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_hits_in_one_minute_merge() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        TAKEOFF,
        "T:6000 AType:2 DMG:0.020 AID:100 TID:1 POS(500.0,1000.0,500.0)",
        "T:6010 AType:2 DMG:0.030 AID:100 TID:1 POS(500.0,1000.0,500.0)",
        "T:6020 AType:2 DMG:0.040 AID:100 TID:2 POS(500.0,1000.0,500.0)",
    ]);
    let damage: Vec<_> = debrief
        .timeline
        .events()
        .iter()
        .filter_map(|e| match &e.kind {
            TimelineEventKind::DamageTaken(report) => Some(report),
            _ => None,
        })
        .collect();
    assert_eq!(damage.len(), 1);
    assert_eq!(damage[0].source, "Bf 109 F-4");
    assert_eq!(damage[0].damage, "5.0% aircraft, 4.0% pilot");
}

#[test]
fn test_mission_end_synthesized() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        TAKEOFF,
        "T:31000 AType:3 AID:1 TID:100 POS(900.0,1400.0,900.0)",
    ]);
    let last = debrief.timeline.events().last().unwrap();
    assert_eq!(last.kind, TimelineEventKind::MissionEnd);
    assert_eq!(last.tick, 31000);
    assert_eq!(debrief.summary.flight_duration.as_deref(), Some("00:10:00"));
    assert_eq!(debrief.summary.final_state, "Alive");
}

#[test]
fn test_malformed_lines_skipped() {
    let debrief = run(&[
        "garbage",
        "T:abc AType:2 DMG:0.5",
        SPAWN,
        "T:500 AType:2 DMG:notanumber AID:100 TID:1",
        "T:600 AType:99 FOO:1",
        "T:700 AType:3 AID:1 TID:999",
        TAKEOFF,
    ]);
    assert!(debrief.summary.player.is_some());
    assert_eq!(debrief.summary.aircraft_damage, 0.0);
    assert!(kills(&debrief).is_empty());
}

#[test]
fn test_firing_accuracy() {
    let debrief = run(&[
        SPAWN,
        ENEMY,
        "T:2000 AType:1 AMMO:BULLET_RUS_762x54_AP AID:1 TID:100",
        "T:2001 AType:1 AMMO:BULLET_RUS_762x54_AP AID:1 TID:100",
        "T:2002 AType:1 AMMO:SHELL_RUS_20x99_HE AID:1 TID:100",
        "T:2003 AType:1 AMMO:explosion AID:1 TID:100",
        "T:2004 AType:1 AMMO:BULLET_GER_13x64_AP AID:100 TID:1",
        "T:9000 AType:4 PLID:1 PID:2 BUL:1380 SH:100 BOMB:0 RCT:0 (500.0,100.0,500.0)",
    ]);
    let accuracy = debrief.accuracy.unwrap();
    assert!(accuracy.ammo_tracked);
    assert_eq!(accuracy.shots, 140);
    assert_eq!(accuracy.hits, 3);
    assert_eq!(accuracy.by_caliber["7.62mm"].hits, 2);
    assert_eq!(accuracy.by_caliber["20mm"].estimated_shots, Some(46));
    assert_eq!(accuracy.by_weapon["ShKAS"].estimated_shots, Some(93));
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let mut lines = landing_log(45);
    lines.push(WINGMAN.to_string());
    lines.push("T:150000 AType:2 DMG:0.300 AID:30 TID:1 POS(500.0,900.0,500.0)".to_string());
    lines.push("T:150100 AType:2 DMG:0.100 AID:100 TID:2 POS(500.0,900.0,500.0)".to_string());

    let engine = engine();
    let first = engine.reconstruct(lines.iter()).to_json().unwrap();
    let second = engine.reconstruct(lines.iter()).to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_resorting_timeline_changes_nothing() {
    let debrief = engine().reconstruct(landing_log(45));
    let mut timeline = debrief.timeline.clone();
    timeline.resort();
    assert_eq!(timeline, debrief.timeline);

    let ticks: Vec<_> = debrief.timeline.events().iter().map(|e| e.tick).collect();
    let mut sorted = ticks.clone();
    sorted.sort();
    assert_eq!(ticks, sorted);
}

#[test]
fn test_json_shape() {
    let debrief = run(&[SPAWN, TAKEOFF, "T:9000 AType:6 PID:2 POS(500.0,100.0,500.0)"]);
    let value: serde_json::Value = serde_json::from_str(&debrief.to_json().unwrap()).unwrap();
    assert_eq!(value["summary"]["final_state"], "Landed");
    assert_eq!(value["summary"]["player"]["pilot_name"], "Ace");
    assert_eq!(value["timeline"][0]["type"], "Takeoff");
    assert_eq!(value["timeline"][0]["time"], "00:00:20");
    assert_eq!(value["timeline"][1]["type"], "Landing");

    let restored: Debrief = serde_json::from_value(value).unwrap();
    assert_eq!(restored.timeline, debrief.timeline);
}
