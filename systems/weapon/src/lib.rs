#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pulls the trigger for shots released by the unit, plus
//! a headless [`Gun`] that tracks the projectiles it spawns.

use std::time::Duration;

use glam::Vec3;
use log::debug;
use lone_soldier_core::{Event, Weapon};

/// Forwards every `Event::ShotFired` to a [`Weapon`].
#[derive(Debug, Default)]
pub struct Trigger;

impl Trigger {
    /// Fires the weapon once per shot contained in `events`, returning the shot count.
    pub fn handle(&self, events: &[Event], weapon: &mut dyn Weapon) -> usize {
        let mut shots = 0;
        for event in events {
            if let Event::ShotFired { muzzle, direction } = event {
                weapon.fire(*muzzle, *direction);
                shots += 1;
            }
        }
        shots
    }
}

/// Ballistic properties of the projectiles a [`Gun`] spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GunSpec {
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Time after which a projectile is removed regardless of what it hit.
    pub projectile_lifetime: Duration,
}

impl Default for GunSpec {
    fn default() -> Self {
        Self {
            projectile_speed: 20.0,
            projectile_lifetime: Duration::from_secs(3),
        }
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier assigned when the projectile was spawned.
    pub id: ProjectileId,
    /// Current world position.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
    /// Time left before the projectile expires.
    pub remaining: Duration,
}

/// Headless weapon that spawns and expires projectiles.
#[derive(Debug, Default)]
pub struct Gun {
    spec: GunSpec,
    projectiles: Vec<Projectile>,
    next_id: u32,
}

impl Gun {
    /// Creates a gun with the provided ballistics.
    #[must_use]
    pub fn new(spec: GunSpec) -> Self {
        Self {
            spec,
            projectiles: Vec::new(),
            next_id: 0,
        }
    }

    /// Projectiles currently in flight, oldest first.
    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Number of projectiles spawned since the gun was created.
    #[must_use]
    pub fn rounds_fired(&self) -> u32 {
        self.next_id
    }

    /// Moves projectiles along their velocity and removes expired ones.
    pub fn advance(&mut self, dt: Duration) {
        let seconds = dt.as_secs_f32();
        for projectile in &mut self.projectiles {
            projectile.position += projectile.velocity * seconds;
            projectile.remaining = projectile.remaining.saturating_sub(dt);
        }
        self.projectiles
            .retain(|projectile| !projectile.remaining.is_zero());
    }
}

impl Weapon for Gun {
    fn fire(&mut self, muzzle: Vec3, direction: Vec3) {
        let id = ProjectileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let velocity = -direction * self.spec.projectile_speed;
        debug!("projectile {} leaves {muzzle} at {velocity}", id.get());
        self.projectiles.push(Projectile {
            id,
            position: muzzle,
            velocity,
            remaining: self.spec.projectile_lifetime,
        });
    }
}
