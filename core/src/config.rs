use std::time::Duration;

use thiserror::Error;

/// Tuning knobs that shape a unit's movement, health, and timing.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitConfig {
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Planar distance below which the unit counts as arrived.
    pub stop_distance: f32,
    /// Interpolation rate applied to turning, per second.
    pub rotation_speed: f32,
    /// Hit points at spawn and after respawn.
    pub max_health: u32,
    /// Interval between automatic health decay steps.
    pub decay_interval: Duration,
    /// Hit points removed by each decay step.
    pub decay_damage: u32,
    /// Time between a fire order and the shot leaving the weapon.
    pub aim_delay: Duration,
    /// Time the death animation plays before the unit stops ticking.
    pub disable_delay: Duration,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            stop_distance: 0.1,
            rotation_speed: 8.0,
            max_health: 10,
            decay_interval: Duration::from_secs(1),
            decay_damage: 1,
            aim_delay: Duration::from_millis(300),
            disable_delay: Duration::from_millis(500),
        }
    }
}

impl UnitConfig {
    /// Checks that every knob holds a value the unit can simulate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        if self.decay_interval.is_zero() {
            return Err(ConfigError::ZeroDecayInterval);
        }
        if self.decay_damage == 0 {
            return Err(ConfigError::ZeroDecayDamage);
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !self.stop_distance.is_finite() || self.stop_distance < 0.0 {
            return Err(ConfigError::InvalidStopDistance(self.stop_distance));
        }
        if !self.rotation_speed.is_finite() || self.rotation_speed <= 0.0 {
            return Err(ConfigError::InvalidRotationSpeed(self.rotation_speed));
        }
        Ok(())
    }
}

/// Reasons a [`UnitConfig`] is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The unit would spawn already dead.
    #[error("max health must be positive")]
    ZeroMaxHealth,
    /// A zero interval would decay health without bound in a single tick.
    #[error("health decay interval must be greater than zero")]
    ZeroDecayInterval,
    /// Decay that removes nothing would keep the unit alive forever.
    #[error("health decay damage must be positive")]
    ZeroDecayDamage,
    /// Speed must be finite and positive.
    #[error("speed must be finite and positive, got {0}")]
    InvalidSpeed(f32),
    /// Stop distance must be finite and non-negative.
    #[error("stop distance must be finite and non-negative, got {0}")]
    InvalidStopDistance(f32),
    /// Rotation speed must be finite and positive.
    #[error("rotation speed must be finite and positive, got {0}")]
    InvalidRotationSpeed(f32),
}
