//! Mission Debrief Runner
//!
//! Reconstructs the flight timeline of each mission log given on the command
//! line and writes it as JSON or as a plain text debrief.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Parser;
use mission_debrief::accuracy::WeaponTable;
use mission_debrief::core::{DebriefConfig, Result};
use mission_debrief::registry::CategoryTable;
use mission_debrief::timeline::TimelineEventKind;
use mission_debrief::{Debrief, DebriefEngine};
use rayon::prelude::*;

/// Mission Debrief - flight timelines from mission logs
#[derive(Parser, Debug)]
#[command(name = "debrief")]
#[command(about = "Reconstruct kills, damage and the flight outcome from mission logs")]
struct Args {
    /// Mission log files, one flight each
    #[arg(required = true)]
    logs: Vec<PathBuf>,

    /// Object category table (TOML)
    #[arg(long, default_value = "data/object_categories.toml")]
    categories: PathBuf,

    /// Projectile to caliber and weapon table (TOML)
    #[arg(long, default_value = "data/weapons.toml")]
    weapons: PathBuf,

    /// Threshold overrides (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write `<log>.events.json` files here instead of printing
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging of the reconstruction passes
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "mission_debrief=debug"
    } else {
        "mission_debrief=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => DebriefConfig::load(path)?,
        None => DebriefConfig::default(),
    };
    let categories = CategoryTable::load(&args.categories).unwrap_or_else(|e| {
        tracing::warn!("Failed to load category table: {}", e);
        tracing::warn!("All objects will be classified as Unknown");
        CategoryTable::default()
    });
    let weapons = WeaponTable::load(&args.weapons).unwrap_or_else(|e| {
        tracing::warn!("Failed to load weapon table: {}", e);
        WeaponTable::default()
    });
    let engine = DebriefEngine::new(config, categories, weapons)?;

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)?;
    }

    // Flights are independent; each reconstruction owns its own state
    let results: Vec<(&PathBuf, Result<Debrief>)> = args
        .logs
        .par_iter()
        .map(|path| (path, engine.from_path(path)))
        .collect();

    let mut failures = 0;
    for (path, result) in results {
        match result.and_then(|debrief| emit(&args, path, &debrief)) {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn emit(args: &Args, path: &Path, debrief: &Debrief) -> Result<()> {
    let (body, extension) = if args.format == "text" {
        let mut text = String::new();
        render_text(&mut text, debrief)?;
        (text, "debrief.txt")
    } else {
        (debrief.to_json()?, "events.json")
    };

    match &args.out_dir {
        Some(dir) => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "mission".to_string());
            let out = dir.join(format!("{}.{}", stem, extension));
            std::fs::write(&out, body)?;
            tracing::info!("Wrote {}", out.display());
        }
        None => println!("{}", body),
    }
    Ok(())
}

fn render_text(out: &mut String, debrief: &Debrief) -> std::fmt::Result {
    let summary = &debrief.summary;

    writeln!(out, "=== Mission Debrief ===")?;
    if let Some(player) = &summary.player {
        writeln!(out, "Pilot: {} ({})", player.pilot_name, player.aircraft_type)?;
    }
    if let Some(mission) = &summary.mission {
        writeln!(
            out,
            "Mission: {} {} {}",
            mission.mission_file, mission.game_date, mission.game_time
        )?;
    }
    writeln!(
        out,
        "Flight time: {}",
        summary.flight_duration.as_deref().unwrap_or("N/A")
    )?;
    writeln!(out, "Outcome: {}", summary.final_state)?;
    writeln!(
        out,
        "Kills: {} air ({} flying, {} parked), {} ground, {} naval",
        summary.kills.air,
        summary.kills.air_flying,
        summary.kills.air_parked,
        summary.kills.ground,
        summary.kills.naval
    )?;
    writeln!(
        out,
        "Damage taken: {:.1}% aircraft, {:.1}% pilot",
        summary.aircraft_damage, summary.pilot_damage
    )?;
    if let Some(accuracy) = &debrief.accuracy {
        match accuracy.accuracy {
            Some(pct) => writeln!(
                out,
                "Gunnery: {} hits / {} shots ({:.1}%)",
                accuracy.hits, accuracy.shots, pct
            )?,
            None => writeln!(out, "Gunnery: {} hits (ammo not tracked)", accuracy.hits)?,
        }
    }

    writeln!(out)?;
    writeln!(out, "--- Timeline ---")?;
    for event in debrief.timeline.events() {
        let line = match &event.kind {
            TimelineEventKind::Takeoff { altitude } => format!("Takeoff{}", alt(*altitude)),
            TimelineEventKind::Kill {
                target,
                category,
                is_static,
                altitude,
            } => format!(
                "Kill: {} ({:?}{}){}",
                target,
                category,
                if *is_static { ", parked" } else { "" },
                alt(*altitude)
            ),
            TimelineEventKind::DamageTaken(report) => {
                format!("Damage from {}: {}{}", report.source, report.damage, alt(report.altitude))
            }
            TimelineEventKind::LandingDamage(report) => {
                format!("Landing damage: {}{}", report.damage, alt(report.altitude))
            }
            TimelineEventKind::Landing {
                altitude,
                hard_landing,
            } => format!(
                "{}{}",
                if *hard_landing { "Hard landing" } else { "Landing" },
                alt(*altitude)
            ),
            TimelineEventKind::Crash { altitude, .. } => format!("Crash{}", alt(*altitude)),
            TimelineEventKind::BailedOut { altitude } => format!("Bailed out{}", alt(*altitude)),
            TimelineEventKind::MissionEnd => "Mission end".to_string(),
        };
        writeln!(out, "[{}] {}", event.time, line)?;
    }
    Ok(())
}

fn alt(altitude: Option<i32>) -> String {
    altitude.map(|a| format!(" at {} m", a)).unwrap_or_default()
}
