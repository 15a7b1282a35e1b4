#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that mirrors unit events onto the health display and animator.

use lone_soldier_core::{AnimationFlags, AnimationSink, Event, Health, HealthDisplay};

/// Routes health readings and animation flags to their sinks.
#[derive(Debug, Default)]
pub struct Presentation;

impl Presentation {
    /// Pushes every health reading and animation assertion in `events` to the sinks.
    pub fn handle(
        &self,
        events: &[Event],
        display: &mut dyn HealthDisplay,
        animator: &mut dyn AnimationSink,
    ) {
        for event in events {
            match event {
                Event::HealthChanged { health } => display.show(*health),
                Event::AnimationUpdated { flags } => animator.apply(*flags),
                _ => {}
            }
        }
    }
}

/// Headless health bar tracking the fill amount it would render.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HealthBar {
    reading: Option<Health>,
}

impl HealthBar {
    /// Creates an empty bar that has not received a reading yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Portion of the bar that is filled, in `0.0..=1.0`.
    #[must_use]
    pub fn fill(&self) -> f32 {
        self.reading.map_or(0.0, |health| health.fraction())
    }

    /// Most recent reading shown on the bar.
    #[must_use]
    pub fn reading(&self) -> Option<Health> {
        self.reading
    }
}

impl HealthDisplay for HealthBar {
    fn show(&mut self, health: Health) {
        self.reading = Some(health);
    }
}

/// Headless animator holding the flags most recently asserted on it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Animator {
    flags: AnimationFlags,
    transitions: usize,
}

impl Animator {
    /// Creates an animator with every flag cleared.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags currently asserted.
    #[must_use]
    pub fn flags(&self) -> AnimationFlags {
        self.flags
    }

    /// Number of assertions that changed at least one flag.
    #[must_use]
    pub fn transitions(&self) -> usize {
        self.transitions
    }
}

impl AnimationSink for Animator {
    fn apply(&mut self, flags: AnimationFlags) {
        if self.flags != flags {
            self.transitions += 1;
            self.flags = flags;
        }
    }
}
