#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that assembles the unit with its collaborators and drives it.
//!
//! A [`Loadout`] names the configuration and the collaborator implementations
//! the unit needs. [`Session::launch`] validates it once: a complete loadout
//! yields a live session that applies commands to the unit and fans the
//! resulting events out to effects, weapon, and presentation systems, while a
//! defective loadout is reported through the log and leaves the session inert.

use std::{fmt, time::Duration};

use glam::{Quat, Vec3};
use log::{error, info};
use lone_soldier_core::{
    AnimationSink, Command, ConfigError, EffectsSink, Event, HealthDisplay, ObjectId,
    SpatialQuery, UnitConfig, Weapon, WELCOME_BANNER,
};
use lone_soldier_system_effects::{ClipLibrary, Effects};
use lone_soldier_system_presentation::Presentation;
use lone_soldier_system_selection::{PointerInput, Selection};
use lone_soldier_system_weapon::Trigger;
use lone_soldier_world::{self as world, query, Unit};
use thiserror::Error;

/// Produces data required to greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }
}

/// Collaborators the unit cannot run without.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Sink receiving sound effect requests.
    Effects,
    /// Weapon spawning projectiles.
    Weapon,
    /// Display presenting remaining health.
    HealthDisplay,
    /// Animator receiving behaviour flags.
    Animator,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Effects => "effects sink",
            Self::Weapon => "weapon",
            Self::HealthDisplay => "health display",
            Self::Animator => "animator",
        };
        formatter.write_str(name)
    }
}

/// Reasons a [`Loadout`] cannot produce a live session.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum BootstrapError {
    /// The unit configuration failed validation.
    #[error("invalid unit configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
    /// A required collaborator reference was not provided.
    #[error("missing required collaborator: {0}")]
    MissingCollaborator(Collaborator),
}

/// Configuration and collaborators required to spawn the unit.
#[derive(Debug)]
pub struct Loadout<E, W, H, A> {
    /// Tuning of the unit.
    pub config: UnitConfig,
    /// World position the unit spawns at.
    pub spawn_position: Vec3,
    /// Scene object that accepts interaction-driven move orders.
    pub ground: ObjectId,
    /// Clips the unit's cues resolve to.
    pub clips: ClipLibrary,
    /// Sink receiving sound effect requests.
    pub effects: Option<E>,
    /// Weapon spawning projectiles.
    pub weapon: Option<W>,
    /// Display presenting remaining health.
    pub health_display: Option<H>,
    /// Animator receiving behaviour flags.
    pub animator: Option<A>,
}

impl<E, W, H, A> Loadout<E, W, H, A> {
    /// Creates a loadout without any collaborators attached.
    #[must_use]
    pub fn new(config: UnitConfig) -> Self {
        Self {
            config,
            spawn_position: Vec3::ZERO,
            ground: ObjectId::new(0),
            clips: ClipLibrary::default(),
            effects: None,
            weapon: None,
            health_display: None,
            animator: None,
        }
    }

    /// Attaches the effects sink.
    #[must_use]
    pub fn with_effects(mut self, effects: E) -> Self {
        self.effects = Some(effects);
        self
    }

    /// Attaches the weapon.
    #[must_use]
    pub fn with_weapon(mut self, weapon: W) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Attaches the health display.
    #[must_use]
    pub fn with_health_display(mut self, health_display: H) -> Self {
        self.health_display = Some(health_display);
        self
    }

    /// Attaches the animator.
    #[must_use]
    pub fn with_animator(mut self, animator: A) -> Self {
        self.animator = Some(animator);
        self
    }
}

/// Collaborators owned by a live session.
#[derive(Debug)]
pub struct Rig<E, W, H, A> {
    /// Sink receiving sound effect requests.
    pub effects: E,
    /// Weapon spawning projectiles.
    pub weapon: W,
    /// Display presenting remaining health.
    pub health_display: H,
    /// Animator receiving behaviour flags.
    pub animator: A,
}

struct Stage<E, W, H, A> {
    unit: Unit,
    rig: Rig<E, W, H, A>,
    effects: Effects,
    trigger: Trigger,
    presentation: Presentation,
    selection: Selection,
}

impl<E, W, H, A> Stage<E, W, H, A>
where
    E: EffectsSink,
    W: Weapon,
    H: HealthDisplay,
    A: AnimationSink,
{
    fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        let start = out_events.len();
        world::apply(&mut self.unit, command, out_events);
        let fresh = &out_events[start..];

        self.effects.handle(fresh, &mut self.rig.effects);
        let _ = self.trigger.handle(fresh, &mut self.rig.weapon);
        self.presentation
            .handle(fresh, &mut self.rig.health_display, &mut self.rig.animator);
    }
}

enum State<E, W, H, A> {
    Active(Box<Stage<E, W, H, A>>),
    Inert(BootstrapError),
}

/// Owned tick driver binding the unit to its collaborators.
pub struct Session<E, W, H, A> {
    state: State<E, W, H, A>,
}

impl<E, W, H, A> Session<E, W, H, A>
where
    E: EffectsSink,
    W: Weapon,
    H: HealthDisplay,
    A: AnimationSink,
{
    /// Validates the loadout and spawns the unit, reporting the first defect found.
    pub fn try_launch(loadout: Loadout<E, W, H, A>) -> Result<Self, BootstrapError> {
        loadout.config.validate()?;
        let effects = loadout
            .effects
            .ok_or(BootstrapError::MissingCollaborator(Collaborator::Effects))?;
        let weapon = loadout
            .weapon
            .ok_or(BootstrapError::MissingCollaborator(Collaborator::Weapon))?;
        let health_display = loadout
            .health_display
            .ok_or(BootstrapError::MissingCollaborator(Collaborator::HealthDisplay))?;
        let animator = loadout
            .animator
            .ok_or(BootstrapError::MissingCollaborator(Collaborator::Animator))?;

        let unit = Unit::spawn_at(loadout.config, loadout.spawn_position, Quat::IDENTITY);
        let mut rig = Rig {
            effects,
            weapon,
            health_display,
            animator,
        };
        rig.health_display.show(query::health(&unit));
        rig.animator.apply(query::animation_flags(&unit));

        Ok(Self {
            state: State::Active(Box::new(Stage {
                unit,
                rig,
                effects: Effects::new(loadout.clips),
                trigger: Trigger,
                presentation: Presentation,
                selection: Selection::new(loadout.ground),
            })),
        })
    }

    /// Spawns the unit, or logs the defect once and returns an inert session.
    #[must_use]
    pub fn launch(loadout: Loadout<E, W, H, A>) -> Self {
        match Self::try_launch(loadout) {
            Ok(session) => {
                info!("session launched");
                session
            }
            Err(error) => {
                error!("unit stays inert: {error}");
                Self {
                    state: State::Inert(error),
                }
            }
        }
    }

    /// Reports whether the session refused to spawn the unit.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        matches!(self.state, State::Inert(_))
    }

    /// Defect that left the session inert, if any.
    #[must_use]
    pub fn error(&self) -> Option<&BootstrapError> {
        match &self.state {
            State::Active(_) => None,
            State::Inert(error) => Some(error),
        }
    }

    /// Unit driven by the session.
    #[must_use]
    pub fn unit(&self) -> Option<&Unit> {
        match &self.state {
            State::Active(stage) => Some(&stage.unit),
            State::Inert(_) => None,
        }
    }

    /// Collaborators owned by the session.
    #[must_use]
    pub fn rig(&self) -> Option<&Rig<E, W, H, A>> {
        match &self.state {
            State::Active(stage) => Some(&stage.rig),
            State::Inert(_) => None,
        }
    }

    /// Mutable access to the collaborators, for adapters that advance them.
    pub fn rig_mut(&mut self) -> Option<&mut Rig<E, W, H, A>> {
        match &mut self.state {
            State::Active(stage) => Some(&mut stage.rig),
            State::Inert(_) => None,
        }
    }

    /// Applies one command and dispatches its events, returning them.
    ///
    /// An inert session absorbs every command and reports no events.
    pub fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        if let State::Active(stage) = &mut self.state {
            stage.apply(command, &mut events);
        }
        events
    }

    /// Advances the unit by one tick of length `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        self.submit(Command::Tick { dt })
    }

    /// Resolves pointer gestures into intents and applies them.
    pub fn pointer(&mut self, input: &PointerInput, spatial: &dyn SpatialQuery) -> Vec<Event> {
        let mut events = Vec::new();
        let State::Active(stage) = &mut self.state else {
            return events;
        };

        let mut commands = Vec::new();
        stage
            .selection
            .handle(input, spatial, query::is_alive(&stage.unit), &mut commands);
        for command in commands {
            stage.apply(command, &mut events);
        }
        events
    }
}
