#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative state of the Lone Soldier unit.
//!
//! The [`Unit`] owns every piece of behaviour state: pose, intents, health,
//! sound latches and the timers backing its delayed actions. It is only ever
//! mutated through [`apply`], which reports the consequences of each
//! [`Command`] as [`Event`] values for systems to act upon. Read access goes
//! through the [`query`] module.

mod motion;

use std::time::Duration;

use glam::{Quat, Vec3};
use log::{debug, info};
use lone_soldier_core::{AnimationFlags, Command, EffectCue, Event, Health, Mode, UnitConfig};
use lone_soldier_scheduler::{Fired, Scheduler, TimerHandle};

/// Delayed actions the unit arms against its clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnitTimer {
    HealthDecay,
    FireDelay,
    DisableAfterDeath,
}

/// One-shot guards that keep each cue to a single play per episode.
///
/// Every latch starts unfired, so a freshly spawned idle unit announces its
/// position once on the first tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct SoundLatches {
    movement_start: bool,
    movement_end: bool,
    death: bool,
}

impl SoundLatches {
    fn slot(&mut self, cue: EffectCue) -> &mut bool {
        match cue {
            EffectCue::MovementStart => &mut self.movement_start,
            EffectCue::MovementEnd => &mut self.movement_end,
            EffectCue::Death => &mut self.death,
        }
    }

    /// Sets the latch, reporting whether the cue should play.
    fn trigger(&mut self, cue: EffectCue) -> bool {
        let slot = self.slot(cue);
        let fire = !*slot;
        *slot = true;
        fire
    }

    fn rearm(&mut self, cue: EffectCue) {
        *self.slot(cue) = false;
    }
}

/// Represents the authoritative state of the controllable unit.
#[derive(Debug)]
pub struct Unit {
    config: UnitConfig,
    position: Vec3,
    orientation: Quat,
    target_position: Vec3,
    aim_direction: Vec3,
    health: u32,
    mode: Mode,
    enabled: bool,
    latches: SoundLatches,
    clock: Scheduler<UnitTimer>,
    decay_timer: Option<TimerHandle>,
    fire_timer: Option<TimerHandle>,
    disable_timer: Option<TimerHandle>,
    published_flags: Option<AnimationFlags>,
}

impl Unit {
    /// Spawns a unit at the world origin facing +Z.
    #[must_use]
    pub fn new(config: UnitConfig) -> Self {
        Self::spawn_at(config, Vec3::ZERO, Quat::IDENTITY)
    }

    /// Spawns a unit with full health at the provided pose.
    #[must_use]
    pub fn spawn_at(config: UnitConfig, position: Vec3, orientation: Quat) -> Self {
        let mut clock = Scheduler::new();
        let decay_timer =
            Some(clock.arm_recurring(config.decay_interval, UnitTimer::HealthDecay));
        let unit = Self {
            health: config.max_health,
            aim_direction: motion::facing(orientation),
            config,
            position,
            orientation,
            target_position: position,
            mode: Mode::Idle,
            enabled: true,
            latches: SoundLatches::default(),
            clock,
            decay_timer,
            fire_timer: None,
            disable_timer: None,
            published_flags: None,
        };
        info!("unit spawned with {} health", unit.health);
        unit
    }

    fn health_reading(&self) -> Health {
        Health::new(self.health, self.config.max_health)
    }

    fn set_mode(&mut self, to: Mode, out_events: &mut Vec<Event>) {
        let from = self.mode;
        if from == to {
            return;
        }
        self.mode = to;
        out_events.push(Event::ModeChanged { from, to });
    }

    fn request_effect(&mut self, cue: EffectCue, out_events: &mut Vec<Event>) {
        if self.latches.trigger(cue) {
            out_events.push(Event::EffectRequested { cue });
        }
    }

    fn publish_animation(&mut self, force: bool, out_events: &mut Vec<Event>) {
        let flags = self.mode.animation_flags();
        if force || self.published_flags != Some(flags) {
            self.published_flags = Some(flags);
            out_events.push(Event::AnimationUpdated { flags });
        }
    }

    fn cancel_timer(&mut self, timer: UnitTimer) {
        let slot = match timer {
            UnitTimer::HealthDecay => &mut self.decay_timer,
            UnitTimer::FireDelay => &mut self.fire_timer,
            UnitTimer::DisableAfterDeath => &mut self.disable_timer,
        };
        if let Some(handle) = slot.take() {
            if self.clock.cancel(handle) {
                debug!("cancelled pending {timer:?}");
            }
        }
    }

    fn request_move(&mut self, point: Vec3, out_events: &mut Vec<Event>) {
        if self.mode.is_dead() {
            debug!("dead unit ignores move order to {point}");
            return;
        }

        self.target_position = point;
        self.cancel_timer(UnitTimer::FireDelay);
        self.latches.rearm(EffectCue::MovementStart);
        self.latches.rearm(EffectCue::MovementEnd);
        self.request_effect(EffectCue::MovementStart, out_events);
        debug!("moving to {point}");
        out_events.push(Event::MoveOrdered { destination: point });
        self.set_mode(Mode::Moving, out_events);
    }

    fn request_fire(&mut self, point: Vec3, out_events: &mut Vec<Event>) {
        if self.mode.is_dead() {
            debug!("dead unit ignores fire order at {point}");
            return;
        }

        let direction = motion::planar_direction(self.position, point)
            .unwrap_or_else(|| motion::facing(self.orientation));
        self.aim_direction = direction;
        self.target_position = self.position;
        self.cancel_timer(UnitTimer::FireDelay);
        self.fire_timer = Some(
            self.clock
                .arm_once(self.config.aim_delay, UnitTimer::FireDelay),
        );
        debug!("aiming along {direction}");
        out_events.push(Event::AimStarted { direction });
        self.set_mode(Mode::Aiming, out_events);
    }

    fn cancel_fire(&mut self, out_events: &mut Vec<Event>) {
        if self.mode != Mode::Aiming {
            return;
        }
        let next = if motion::planar_distance(self.position, self.target_position)
            > self.config.stop_distance
        {
            Mode::Moving
        } else {
            Mode::Idle
        };
        self.set_mode(next, out_events);
    }

    /// `at` is the instant the damage lands, which may trail the clock reading.
    fn take_damage(&mut self, amount: u32, at: Duration, out_events: &mut Vec<Event>) {
        if self.mode.is_dead() {
            return;
        }

        self.health = self.health.saturating_sub(amount);
        out_events.push(Event::HealthChanged {
            health: self.health_reading(),
        });

        if self.health == 0 {
            self.die(at, out_events);
        }
    }

    fn die(&mut self, at: Duration, out_events: &mut Vec<Event>) {
        if self.mode.is_dead() {
            return;
        }

        self.set_mode(Mode::Dead, out_events);
        self.target_position = self.position;
        self.cancel_timer(UnitTimer::FireDelay);
        self.cancel_timer(UnitTimer::HealthDecay);
        self.request_effect(EffectCue::Death, out_events);
        out_events.push(Event::Died);
        self.publish_animation(true, out_events);
        let disable_at = at.saturating_add(self.config.disable_delay);
        self.disable_timer = Some(self.clock.arm_at(disable_at, UnitTimer::DisableAfterDeath));
        info!("unit has died");
    }

    fn respawn(&mut self, out_events: &mut Vec<Event>) {
        self.cancel_timer(UnitTimer::DisableAfterDeath);
        self.cancel_timer(UnitTimer::FireDelay);
        self.cancel_timer(UnitTimer::HealthDecay);

        self.health = self.config.max_health;
        self.target_position = self.position;
        self.enabled = true;
        self.latches = SoundLatches::default();
        self.set_mode(Mode::Idle, out_events);
        self.publish_animation(true, out_events);
        self.decay_timer = Some(
            self.clock
                .arm_recurring(self.config.decay_interval, UnitTimer::HealthDecay),
        );

        let health = self.health_reading();
        out_events.push(Event::HealthChanged { health });
        out_events.push(Event::Respawned { health });
        info!("unit respawned with {} health", self.health);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if !self.enabled {
            return;
        }

        out_events.push(Event::TimeAdvanced { dt });
        self.clock.advance(dt);
        while let Some(fired) = self.clock.pop_due() {
            self.resolve_timer(fired, out_events);
        }

        if !self.enabled {
            return;
        }

        match self.mode {
            Mode::Dead => {
                self.target_position = self.position;
                self.publish_animation(true, out_events);
            }
            Mode::Aiming => {
                self.target_position = self.position;
                self.turn_toward(self.aim_direction, dt);
                self.publish_animation(false, out_events);
            }
            Mode::Idle | Mode::Moving => {
                self.walk(dt, out_events);
                self.publish_animation(false, out_events);
            }
        }
    }

    fn resolve_timer(&mut self, fired: Fired<UnitTimer>, out_events: &mut Vec<Event>) {
        match fired.key {
            UnitTimer::HealthDecay => {
                self.take_damage(self.config.decay_damage, fired.due, out_events);
            }
            UnitTimer::FireDelay => {
                self.fire_timer = None;
                if self.mode.is_dead() {
                    debug!("shot suppressed, unit died while aiming");
                    return;
                }
                out_events.push(Event::ShotFired {
                    muzzle: self.position,
                    direction: -self.aim_direction,
                });
            }
            UnitTimer::DisableAfterDeath => {
                self.disable_timer = None;
                self.enabled = false;
                info!("unit deactivated at {:?}", fired.due);
                out_events.push(Event::Deactivated);
            }
        }
    }

    fn turn_toward(&mut self, direction: Vec3, dt: Duration) {
        let amount = self.config.rotation_speed * dt.as_secs_f32();
        self.orientation = motion::turn_toward(self.orientation, direction, amount);
    }

    fn walk(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let stop_distance = self.config.stop_distance;
        if let Some(direction) = motion::planar_direction(self.position, self.target_position) {
            if motion::planar_distance(self.position, self.target_position) > stop_distance {
                let step = self.config.speed * dt.as_secs_f32();
                self.position = motion::step_toward(self.position, self.target_position, step);
                self.turn_toward(direction, dt);

                if motion::planar_distance(self.position, self.target_position) > stop_distance {
                    self.set_mode(Mode::Moving, out_events);
                    return;
                }
            }
        }
        self.arrive(out_events);
    }

    fn arrive(&mut self, out_events: &mut Vec<Event>) {
        if self.latches.trigger(EffectCue::MovementEnd) {
            out_events.push(Event::EffectRequested {
                cue: EffectCue::MovementEnd,
            });
            out_events.push(Event::Arrived {
                position: self.position,
            });
        }
        self.latches.rearm(EffectCue::MovementStart);
        self.set_mode(Mode::Idle, out_events);
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::new(UnitConfig::default())
    }
}

/// Applies the provided command to the unit, mutating state deterministically.
pub fn apply(unit: &mut Unit, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => unit.tick(dt, out_events),
        Command::RequestMove { point } => unit.request_move(point, out_events),
        Command::RequestFire { point } => unit.request_fire(point, out_events),
        Command::CancelFire => unit.cancel_fire(out_events),
        Command::ApplyDamage { amount } => {
            let now = unit.clock.now();
            unit.take_damage(amount, now, out_events);
        }
        Command::Respawn => unit.respawn(out_events),
    }
}

/// Query functions that provide read-only access to the unit state.
pub mod query {
    use std::time::Duration;

    use glam::{Quat, Vec3};
    use lone_soldier_core::{AnimationFlags, Health, Mode, UnitConfig};

    use super::Unit;

    /// Reports whether the unit is not in the dead state.
    #[must_use]
    pub fn is_alive(unit: &Unit) -> bool {
        !unit.mode.is_dead()
    }

    /// Remaining health as a fraction in `0.0..=1.0`.
    #[must_use]
    pub fn health_fraction(unit: &Unit) -> f32 {
        unit.health_reading().fraction()
    }

    /// Current and maximum hit points.
    #[must_use]
    pub fn health(unit: &Unit) -> Health {
        unit.health_reading()
    }

    /// Behaviour the unit is executing.
    #[must_use]
    pub fn mode(unit: &Unit) -> Mode {
        unit.mode
    }

    /// Animator flags projected from the current mode.
    #[must_use]
    pub fn animation_flags(unit: &Unit) -> AnimationFlags {
        unit.mode.animation_flags()
    }

    /// Reports whether per-tick evaluation still runs.
    #[must_use]
    pub fn is_enabled(unit: &Unit) -> bool {
        unit.enabled
    }

    /// Total simulated time the unit has observed.
    #[must_use]
    pub fn elapsed(unit: &Unit) -> Duration {
        unit.clock.now()
    }

    /// World position of the unit.
    #[must_use]
    pub fn position(unit: &Unit) -> Vec3 {
        unit.position
    }

    /// Orientation of the unit.
    #[must_use]
    pub fn orientation(unit: &Unit) -> Quat {
        unit.orientation
    }

    /// Configuration the unit was spawned with.
    #[must_use]
    pub fn config(unit: &Unit) -> &UnitConfig {
        &unit.config
    }

    /// Captures an immutable snapshot of the unit.
    #[must_use]
    pub fn snapshot(unit: &Unit) -> UnitSnapshot {
        UnitSnapshot {
            position: unit.position,
            orientation: unit.orientation,
            target_position: unit.target_position,
            aim_direction: unit.aim_direction,
            health: unit.health_reading(),
            mode: unit.mode,
            enabled: unit.enabled,
            shot_pending: unit.fire_timer.is_some(),
            decay_armed: unit.decay_timer.is_some(),
            deactivation_pending: unit.disable_timer.is_some(),
            elapsed: unit.clock.now(),
        }
    }

    /// Immutable representation of the unit's state used for queries.
    #[derive(Clone, Debug, PartialEq)]
    pub struct UnitSnapshot {
        /// World position.
        pub position: Vec3,
        /// Orientation.
        pub orientation: Quat,
        /// Destination of the current movement intent.
        pub target_position: Vec3,
        /// Direction latched by the most recent fire order.
        pub aim_direction: Vec3,
        /// Current and maximum hit points.
        pub health: Health,
        /// Active behaviour.
        pub mode: Mode,
        /// Whether per-tick evaluation still runs.
        pub enabled: bool,
        /// Whether a delayed shot is waiting to leave the weapon.
        pub shot_pending: bool,
        /// Whether health decay is scheduled.
        pub decay_armed: bool,
        /// Whether the post-death deactivation is scheduled.
        pub deactivation_pending: bool,
        /// Total simulated time observed.
        pub elapsed: Duration,
    }
}
