#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lone Soldier simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative unit, and pure systems. Adapters submit [`Command`] values
//! describing player intents, the unit executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! translate into calls on the collaborator traits declared here
//! ([`EffectsSink`], [`Weapon`], [`HealthDisplay`], [`AnimationSink`]).

mod config;

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use config::{ConfigError, UnitConfig};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Lone Soldier reporting for duty.";

/// Behaviour the unit is currently executing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Standing still at the target position.
    #[default]
    Idle,
    /// Translating toward the target position.
    Moving,
    /// Holding position and facing the latched aim direction.
    Aiming,
    /// Terminal state that absorbs every intent until a respawn.
    Dead,
}

impl Mode {
    /// Reports whether the mode is the terminal dead state.
    #[must_use]
    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Projects the mode onto the animation flags presented to the animator.
    #[must_use]
    pub const fn animation_flags(self) -> AnimationFlags {
        match self {
            Self::Idle => AnimationFlags::NONE,
            Self::Moving => AnimationFlags {
                running: true,
                firing: false,
                dead: false,
            },
            Self::Aiming => AnimationFlags {
                running: false,
                firing: true,
                dead: false,
            },
            Self::Dead => AnimationFlags {
                running: false,
                firing: false,
                dead: true,
            },
        }
    }
}

/// Boolean animator parameters derived from the unit's [`Mode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationFlags {
    /// Whether the run cycle should play.
    pub running: bool,
    /// Whether the firing pose should play.
    pub firing: bool,
    /// Whether the death animation should play.
    pub dead: bool,
}

impl AnimationFlags {
    /// Every flag cleared.
    pub const NONE: Self = Self {
        running: false,
        firing: false,
        dead: false,
    };
}

/// Current and maximum hit points of the unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    maximum: u32,
}

impl Health {
    /// Creates a health reading, clamping `current` into `0..=maximum`.
    #[must_use]
    pub const fn new(current: u32, maximum: u32) -> Self {
        let current = if current > maximum { maximum } else { current };
        Self { current, maximum }
    }

    /// Hit points remaining.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Hit points restored on respawn.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Remaining health as a fraction in `0.0..=1.0`.
    ///
    /// A zero maximum reports an empty bar rather than dividing by zero.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Identifier of a scene object returned by spatial queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates a new object identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Name of an audio clip known to the effects sink.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(String);

impl ClipId {
    /// Creates a clip identifier from its asset name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Asset name of the clip.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Audio clip together with its playback length.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clip {
    /// Asset identifier of the clip.
    pub id: ClipId,
    /// Time the clip takes to play to completion.
    pub length: Duration,
}

impl Clip {
    /// Creates a clip description.
    #[must_use]
    pub fn new(name: impl Into<String>, length: Duration) -> Self {
        Self {
            id: ClipId::new(name),
            length,
        }
    }
}

/// Pool of interchangeable clips from which one is picked at random.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipSet {
    clips: Vec<Clip>,
}

impl ClipSet {
    /// Creates a clip set from the provided clips.
    #[must_use]
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    /// Clips available for selection.
    #[must_use]
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Reports whether the set offers nothing to play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Sound cues the unit requests during its behaviour episodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCue {
    /// Acknowledgement voice line for a new move order.
    MovementStart,
    /// Voice line played once the unit arrives.
    MovementEnd,
    /// Death cry.
    Death,
}

/// Commands that express all permissible unit mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Orders the unit to walk toward a world point.
    RequestMove {
        /// Destination in world space.
        point: Vec3,
    },
    /// Orders the unit to aim at and fire toward a world point.
    RequestFire {
        /// Point the player indicated as the firing target.
        point: Vec3,
    },
    /// Releases the firing stance.
    CancelFire,
    /// Removes hit points from the unit.
    ApplyDamage {
        /// Hit points to subtract.
        amount: u32,
    },
    /// Restores the unit to its spawn-time state at its current location.
    Respawn,
}

/// Events broadcast by the unit after processing commands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the unit switched behaviour.
    ModeChanged {
        /// Mode active before the transition.
        from: Mode,
        /// Mode active after the transition.
        to: Mode,
    },
    /// Confirms that a move order was accepted.
    MoveOrdered {
        /// Destination the unit will walk toward.
        destination: Vec3,
    },
    /// Reports that the unit came within stopping distance of its target.
    Arrived {
        /// Position at which the unit stopped.
        position: Vec3,
    },
    /// Confirms that a fire order was accepted and the aim direction latched.
    AimStarted {
        /// Normalized planar direction toward the firing target.
        direction: Vec3,
    },
    /// Requests that the weapon spawn a projectile.
    ShotFired {
        /// World position the projectile leaves from.
        muzzle: Vec3,
        /// Direction handed to the weapon.
        direction: Vec3,
    },
    /// Publishes a new health reading for displays.
    HealthChanged {
        /// Health after the change.
        health: Health,
    },
    /// Announces the transition into the dead state.
    Died,
    /// Announces that per-tick evaluation has been switched off after death.
    Deactivated,
    /// Confirms that the unit was restored to full health.
    Respawned {
        /// Health after the respawn.
        health: Health,
    },
    /// Requests that a random clip for the cue be played.
    EffectRequested {
        /// Cue identifying the clip set.
        cue: EffectCue,
    },
    /// Publishes the animator flags for this tick.
    AnimationUpdated {
        /// Flags to assert on the animator.
        flags: AnimationFlags,
    },
}

/// Resolves what the player's pointer is indicating in the scene.
pub trait SpatialQuery {
    /// World point of the most recent pointer hit, if any.
    fn latest_hit_point(&self) -> Option<Vec3>;

    /// Scene object under the most recent pointer hit, if any.
    fn latest_hit_object(&self) -> Option<ObjectId>;
}

/// Plays sound effects; implementations keep at most one effect audible.
pub trait EffectsSink {
    /// Plays the provided clip, pre-empting any playing effect.
    fn play(&mut self, clip: &Clip);

    /// Plays one clip picked at random from the set, pre-empting any playing effect.
    fn play_random_of(&mut self, clips: &ClipSet);
}

/// Spawns projectiles.
pub trait Weapon {
    /// Spawns a projectile leaving `muzzle` for the provided direction.
    fn fire(&mut self, muzzle: Vec3, direction: Vec3);
}

/// Presents the unit's remaining health.
pub trait HealthDisplay {
    /// Updates the display with a new health reading.
    fn show(&mut self, health: Health);
}

/// Receives the animator flags derived from the unit's behaviour.
pub trait AnimationSink {
    /// Asserts the provided flags on the animator.
    fn apply(&mut self, flags: AnimationFlags);
}
