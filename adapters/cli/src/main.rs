#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted scenario against the lone soldier.

mod logging;
mod scenario;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use lone_soldier_core::{Clip, ClipSet, Event};
use lone_soldier_system_bootstrap::{Bootstrap, Loadout, Session};
use lone_soldier_system_effects::{ClipLibrary, ExclusiveMixer};
use lone_soldier_system_presentation::{Animator, HealthBar};
use lone_soldier_system_weapon::{Gun, GunSpec};
use lone_soldier_world::query;

use crate::scenario::Scenario;

/// Headless driver for a single controllable unit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML scenario to play; a built-in demo runs when omitted.
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    /// Simulated time advanced per tick, in milliseconds.
    #[arg(long, default_value_t = 50)]
    tick_ms: u64,
    /// Total simulated time, in milliseconds.
    #[arg(long, default_value_t = 12_000)]
    duration_ms: u64,
    /// Seed for random clip selection.
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Print every emitted event as a JSON line.
    #[arg(long)]
    events: bool,
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the lone soldier command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    ensure!(args.tick_ms > 0, "tick length must be positive");

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::parse(scenario::DEMO).context("built-in demo is malformed")?,
    };

    let mut loadout = Loadout::new(scenario.unit_config())
        .with_effects(ExclusiveMixer::new(args.seed))
        .with_weapon(Gun::new(GunSpec::default()))
        .with_health_display(HealthBar::new())
        .with_animator(Animator::new());
    loadout.spawn_position = scenario.spawn_position();
    loadout.clips = clip_library();

    let mut session = Session::try_launch(loadout).context("failed to launch the unit")?;
    println!("{}", Bootstrap.welcome_banner());

    let dt = Duration::from_millis(args.tick_ms);
    let end = Duration::from_millis(args.duration_ms);
    let mut now = Duration::ZERO;
    let mut pending = scenario.steps.iter().peekable();
    let mut log = Vec::new();

    loop {
        while let Some(step) = pending.next_if(|step| step.at() <= now) {
            let command = step.command()?;
            info!("{command:?} at {}ms", step.at_ms);
            log.extend(session.submit(command));
        }
        if now >= end {
            break;
        }

        log.extend(session.tick(dt));
        if let Some(rig) = session.rig_mut() {
            rig.weapon.advance(dt);
            rig.effects.advance(dt);
        }
        now += dt;
    }

    if args.events {
        for event in &log {
            println!("{}", serde_json::to_string(event)?);
        }
    }

    report(&session, &log);
    Ok(())
}

fn report(session: &Session<ExclusiveMixer, Gun, HealthBar, Animator>, log: &[Event]) {
    let (Some(unit), Some(rig)) = (session.unit(), session.rig()) else {
        return;
    };

    let deaths = log.iter().filter(|event| **event == Event::Died).count();
    let health = query::health(unit);
    println!(
        "health {}/{} ({:?}), position {}",
        health.current(),
        health.maximum(),
        query::mode(unit),
        query::position(unit)
    );
    println!(
        "rounds fired {}, in flight {}, deaths {deaths}",
        rig.weapon.rounds_fired(),
        rig.weapon.projectiles().len()
    );
    let recent: Vec<_> = rig.effects.recent().iter().map(|id| id.name()).collect();
    println!(
        "clips played {}, most recent: {}",
        rig.effects.started(),
        recent.join(", ")
    );
}

fn clip_library() -> ClipLibrary {
    let clip = |name: &str, ms: u64| Clip::new(name, Duration::from_millis(ms));
    ClipLibrary {
        movement_start: ClipSet::new(vec![clip("affirmative", 600), clip("on-my-way", 700)]),
        movement_end: ClipSet::new(vec![clip("in-position", 650)]),
        death: ClipSet::new(vec![clip("death-cry-1", 900), clip("death-cry-2", 1_100)]),
        gunshot: Some(clip("rifle-shot", 400)),
    }
}
