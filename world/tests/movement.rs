use std::time::Duration;

use glam::Vec3;
use lone_soldier_core::{AnimationFlags, Command, EffectCue, Event, Mode, UnitConfig};
use lone_soldier_world::{self as world, query, Unit};

fn order_move(unit: &mut Unit, point: Vec3) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(unit, Command::RequestMove { point }, &mut events);
    events
}

fn tick(unit: &mut Unit, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(unit, Command::Tick { dt }, &mut events);
    events
}

fn running_flag(events: &[Event]) -> Option<bool> {
    events.iter().rev().find_map(|event| match event {
        Event::AnimationUpdated { flags } => Some(flags.running),
        _ => None,
    })
}

fn slow_decay() -> UnitConfig {
    UnitConfig {
        max_health: 1_000,
        ..UnitConfig::default()
    }
}

#[test]
fn reaches_target_after_expected_tick_count() {
    let mut unit = Unit::new(slow_decay());
    let dt = Duration::from_millis(500);
    let target = Vec3::new(10.0, 0.0, 0.0);
    let _ = order_move(&mut unit, target);

    let config = query::config(&unit).clone();
    let distance = 10.0_f32;
    let expected_ticks = (distance / (config.speed * dt.as_secs_f32())).ceil() as usize;

    for index in 1..=expected_ticks {
        let events = tick(&mut unit, dt);
        let remaining = (query::position(&unit) - target).length();
        if index < expected_ticks {
            assert!(remaining > config.stop_distance, "arrived early at tick {index}");
            assert_eq!(running_flag(&events), if index == 1 { Some(true) } else { None });
            assert_eq!(query::mode(&unit), Mode::Moving);
        } else {
            assert!(remaining <= config.stop_distance);
            assert_eq!(running_flag(&events), Some(false));
            assert!(!query::animation_flags(&unit).running);
            assert_eq!(query::mode(&unit), Mode::Idle);
        }
    }
}

#[test]
fn movement_is_planar_and_keeps_height() {
    let mut unit = Unit::spawn_at(slow_decay(), Vec3::new(0.0, 1.5, 0.0), glam::Quat::IDENTITY);
    let _ = order_move(&mut unit, Vec3::new(0.0, -3.0, 2.0));

    for _ in 0..20 {
        let _ = tick(&mut unit, Duration::from_millis(100));
    }

    let position = query::position(&unit);
    assert!((position - Vec3::new(0.0, 1.5, 2.0)).length() < 1e-5);
    assert_eq!(query::mode(&unit), Mode::Idle);
}

#[test]
fn unit_turns_toward_travel_direction() {
    let mut unit = Unit::new(slow_decay());
    let _ = order_move(&mut unit, Vec3::new(20.0, 0.0, 0.0));

    for _ in 0..30 {
        let _ = tick(&mut unit, Duration::from_millis(50));
    }

    let heading = query::orientation(&unit) * Vec3::Z;
    assert!((heading - Vec3::X).length() < 1e-2, "heading {heading}");
}

#[test]
fn move_order_requests_start_cue_and_arrival_requests_end_cue_once() {
    let mut unit = Unit::new(slow_decay());
    let ordered = order_move(&mut unit, Vec3::new(1.0, 0.0, 0.0));
    assert!(ordered.contains(&Event::EffectRequested {
        cue: EffectCue::MovementStart
    }));
    assert!(ordered.contains(&Event::MoveOrdered {
        destination: Vec3::new(1.0, 0.0, 0.0)
    }));
    assert_eq!(query::mode(&unit), Mode::Moving);

    let mut events = Vec::new();
    for _ in 0..20 {
        events.extend(tick(&mut unit, Duration::from_millis(100)));
    }

    let end_cues = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::EffectRequested {
                    cue: EffectCue::MovementEnd
                }
            )
        })
        .count();
    assert_eq!(end_cues, 1);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::Arrived { .. }))
            .count(),
        1
    );
}

#[test]
fn idle_spawn_announces_position_once() {
    let mut unit = Unit::new(slow_decay());
    let mut events = Vec::new();
    for _ in 0..5 {
        events.extend(tick(&mut unit, Duration::from_millis(100)));
    }

    let cues: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::EffectRequested { cue } => Some(*cue),
            _ => None,
        })
        .collect();
    assert_eq!(cues, vec![EffectCue::MovementEnd]);
    assert_eq!(query::mode(&unit), Mode::Idle);
}

#[test]
fn every_new_move_order_replays_start_cue() {
    let mut unit = Unit::new(slow_decay());
    let first = order_move(&mut unit, Vec3::new(5.0, 0.0, 0.0));
    let _ = tick(&mut unit, Duration::from_millis(100));
    let second = order_move(&mut unit, Vec3::new(0.0, 0.0, 5.0));

    for events in [first, second] {
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::EffectRequested { .. }))
                .count(),
            1
        );
    }
}

#[test]
fn move_to_current_location_resolves_on_next_tick() {
    let mut unit = Unit::new(slow_decay());
    let _ = order_move(&mut unit, Vec3::new(0.05, 0.0, 0.0));

    let events = tick(&mut unit, Duration::from_millis(100));

    assert_eq!(query::mode(&unit), Mode::Idle);
    assert!(events.contains(&Event::EffectRequested {
        cue: EffectCue::MovementEnd
    }));
    assert!(events.contains(&Event::AnimationUpdated {
        flags: AnimationFlags::NONE
    }));
}
