use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use glam::Vec3;
use lone_soldier_core::{Command, UnitConfig};
use serde::Deserialize;

/// Scenario played when no file is given on the command line.
pub(crate) const DEMO: &str = r#"
spawn = [0.0, 0.0, 0.0]

[unit]
decay_interval_ms = 1000

[[step]]
at_ms = 0
action = "move"
point = [4.0, 0.0, 3.0]

[[step]]
at_ms = 2500
action = "fire"
point = [0.0, 0.0, -6.0]

[[step]]
at_ms = 2600
action = "cancel"

[[step]]
at_ms = 4000
action = "damage"
amount = 3

[[step]]
at_ms = 9000
action = "respawn"
"#;

/// Scripted run of a single unit.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Spawn position of the unit.
    #[serde(default)]
    pub(crate) spawn: [f32; 3],
    /// Overrides applied on top of the default unit tuning.
    #[serde(default)]
    pub(crate) unit: UnitOverrides,
    /// Orders issued while the scenario runs.
    #[serde(default, rename = "step")]
    pub(crate) steps: Vec<Step>,
}

/// Optional replacements for [`UnitConfig`] fields, durations in milliseconds.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct UnitOverrides {
    speed: Option<f32>,
    stop_distance: Option<f32>,
    rotation_speed: Option<f32>,
    max_health: Option<u32>,
    decay_interval_ms: Option<u64>,
    decay_damage: Option<u32>,
    aim_delay_ms: Option<u64>,
    disable_delay_ms: Option<u64>,
}

impl UnitOverrides {
    fn apply(&self, mut config: UnitConfig) -> UnitConfig {
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(stop_distance) = self.stop_distance {
            config.stop_distance = stop_distance;
        }
        if let Some(rotation_speed) = self.rotation_speed {
            config.rotation_speed = rotation_speed;
        }
        if let Some(max_health) = self.max_health {
            config.max_health = max_health;
        }
        if let Some(ms) = self.decay_interval_ms {
            config.decay_interval = Duration::from_millis(ms);
        }
        if let Some(decay_damage) = self.decay_damage {
            config.decay_damage = decay_damage;
        }
        if let Some(ms) = self.aim_delay_ms {
            config.aim_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.disable_delay_ms {
            config.disable_delay = Duration::from_millis(ms);
        }
        config
    }
}

/// Order kinds a step may issue.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Action {
    Move,
    Fire,
    Cancel,
    Damage,
    Respawn,
}

/// One order issued at a fixed point of scenario time.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Step {
    /// Scenario time at which the order is issued.
    pub(crate) at_ms: u64,
    action: Action,
    point: Option<[f32; 3]>,
    amount: Option<u32>,
}

impl Step {
    /// Scenario time at which the order is issued.
    pub(crate) fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }

    /// Command the step issues.
    pub(crate) fn command(&self) -> Result<Command> {
        let command = match self.action {
            Action::Move => Command::RequestMove {
                point: self.point()?,
            },
            Action::Fire => Command::RequestFire {
                point: self.point()?,
            },
            Action::Cancel => Command::CancelFire,
            Action::Damage => match self.amount {
                Some(amount) => Command::ApplyDamage { amount },
                None => bail!("damage step at {}ms has no amount", self.at_ms),
            },
            Action::Respawn => Command::Respawn,
        };
        Ok(command)
    }

    fn point(&self) -> Result<Vec3> {
        self.point
            .map(Vec3::from_array)
            .with_context(|| format!("{:?} step at {}ms has no point", self.action, self.at_ms))
    }
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Parses scenario text, ordering steps by issue time.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut scenario: Self = toml::from_str(text)?;
        for step in &scenario.steps {
            let _ = step.command()?;
        }
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    /// Default unit tuning with the scenario's overrides applied.
    pub(crate) fn unit_config(&self) -> UnitConfig {
        self.unit.apply(UnitConfig::default())
    }

    /// Spawn position of the unit.
    pub(crate) fn spawn_position(&self) -> Vec3 {
        Vec3::from_array(self.spawn)
    }
}
