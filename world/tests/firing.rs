use std::time::Duration;

use glam::Vec3;
use lone_soldier_core::{Command, Event, Mode, UnitConfig};
use lone_soldier_world::{self as world, query, Unit};

const TICK: Duration = Duration::from_millis(100);

fn send(unit: &mut Unit, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(unit, command, &mut events);
    events
}

fn shots(events: &[Event]) -> Vec<(Vec3, Vec3)> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::ShotFired { muzzle, direction } => Some((*muzzle, *direction)),
            _ => None,
        })
        .collect()
}

#[test]
fn shot_leaves_after_aim_delay_with_negated_planar_direction() {
    let mut unit = Unit::new(UnitConfig::default());
    let events = send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(3.0, 5.0, 4.0),
        },
    );
    assert!(events.contains(&Event::AimStarted {
        direction: Vec3::new(0.6, 0.0, 0.8)
    }));
    assert_eq!(query::mode(&unit), Mode::Aiming);

    for _ in 0..2 {
        assert!(shots(&send(&mut unit, Command::Tick { dt: TICK })).is_empty());
    }

    let fired = shots(&send(&mut unit, Command::Tick { dt: TICK }));
    assert_eq!(fired.len(), 1);
    let (muzzle, direction) = fired[0];
    assert_eq!(muzzle, Vec3::ZERO);
    assert!((direction - Vec3::new(-0.6, 0.0, -0.8)).length() < 1e-6);
    assert_eq!(query::elapsed(&unit), Duration::from_millis(300));

    let mut later = Vec::new();
    for _ in 0..10 {
        later.extend(send(&mut unit, Command::Tick { dt: TICK }));
    }
    assert!(shots(&later).is_empty());
}

#[test]
fn move_order_before_aim_delay_suppresses_shot() {
    let mut unit = Unit::new(UnitConfig::default());
    let mut events = send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(0.0, 0.0, 10.0),
        },
    );
    events.extend(send(&mut unit, Command::Tick { dt: TICK }));
    events.extend(send(
        &mut unit,
        Command::RequestMove {
            point: Vec3::new(4.0, 0.0, 0.0),
        },
    ));
    assert!(!query::snapshot(&unit).shot_pending);

    for _ in 0..10 {
        events.extend(send(&mut unit, Command::Tick { dt: TICK }));
    }

    assert!(shots(&events).is_empty());
}

#[test]
fn death_while_aiming_suppresses_shot() {
    let mut unit = Unit::new(UnitConfig::default());
    let mut events = send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(1.0, 0.0, 0.0),
        },
    );
    events.extend(send(&mut unit, Command::ApplyDamage { amount: 10 }));
    for _ in 0..5 {
        events.extend(send(&mut unit, Command::Tick { dt: TICK }));
    }

    assert!(shots(&events).is_empty());
}

#[test]
fn new_fire_order_supersedes_pending_shot() {
    let mut unit = Unit::new(UnitConfig::default());
    let mut events = send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(1.0, 0.0, 0.0),
        },
    );
    events.extend(send(&mut unit, Command::Tick { dt: TICK }));
    events.extend(send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(-1.0, 0.0, 0.0),
        },
    ));
    for _ in 0..5 {
        events.extend(send(&mut unit, Command::Tick { dt: TICK }));
    }

    let fired = shots(&events);
    assert_eq!(fired.len(), 1);
    assert!((fired[0].1 - Vec3::X).length() < 1e-6);
}

#[test]
fn releasing_fire_keeps_pending_shot() {
    let mut unit = Unit::new(UnitConfig::default());
    let mut events = send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(0.0, 0.0, -2.0),
        },
    );
    events.extend(send(&mut unit, Command::CancelFire));
    assert_eq!(query::mode(&unit), Mode::Idle);

    for _ in 0..3 {
        events.extend(send(&mut unit, Command::Tick { dt: TICK }));
    }

    assert_eq!(shots(&events).len(), 1);
}

#[test]
fn aiming_holds_position_and_turns_toward_aim() {
    let mut unit = Unit::new(UnitConfig {
        max_health: 1_000,
        ..UnitConfig::default()
    });
    let _ = send(
        &mut unit,
        Command::RequestMove {
            point: Vec3::new(0.0, 0.0, 10.0),
        },
    );
    let _ = send(&mut unit, Command::Tick { dt: TICK });
    let held = query::position(&unit);

    let _ = send(
        &mut unit,
        Command::RequestFire {
            point: Vec3::new(-10.0, 0.0, held.z),
        },
    );
    for _ in 0..30 {
        let _ = send(&mut unit, Command::Tick { dt: TICK });
    }

    assert_eq!(query::position(&unit), held);
    assert_eq!(query::snapshot(&unit).target_position, held);
    let heading = query::orientation(&unit) * Vec3::Z;
    assert!((heading - Vec3::NEG_X).length() < 1e-2, "heading {heading}");
}

#[test]
fn fire_at_own_position_uses_current_facing() {
    let mut unit = Unit::new(UnitConfig::default());
    let events = send(&mut unit, Command::RequestFire { point: Vec3::ZERO });
    assert!(events.contains(&Event::AimStarted { direction: Vec3::Z }));
}
