#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sound effect routing for the unit.
//!
//! [`Effects`] turns the unit's cue and shot events into [`EffectsSink`]
//! requests. [`ExclusiveMixer`] is a headless sink that honours the
//! single-concurrent-effect policy: every new request stops whatever is
//! still playing.

use std::{collections::VecDeque, time::Duration};

use log::{debug, warn};
use lone_soldier_core::{Clip, ClipId, ClipSet, EffectCue, EffectsSink, Event};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Clips the unit's cues resolve to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipLibrary {
    /// Acknowledgements played when a move order is accepted.
    pub movement_start: ClipSet,
    /// Voice lines played when the unit arrives.
    pub movement_end: ClipSet,
    /// Death cries.
    pub death: ClipSet,
    /// Report played for every projectile leaving the weapon.
    pub gunshot: Option<Clip>,
}

impl ClipLibrary {
    /// Clip set associated with the cue.
    #[must_use]
    pub fn clips_for(&self, cue: EffectCue) -> &ClipSet {
        match cue {
            EffectCue::MovementStart => &self.movement_start,
            EffectCue::MovementEnd => &self.movement_end,
            EffectCue::Death => &self.death,
        }
    }
}

/// Pure system that forwards sound requests from unit events to a sink.
#[derive(Debug, Default)]
pub struct Effects {
    library: ClipLibrary,
}

impl Effects {
    /// Creates the system around the provided clip library.
    #[must_use]
    pub fn new(library: ClipLibrary) -> Self {
        Self { library }
    }

    /// Issues a sink request for every cue or shot contained in `events`.
    pub fn handle(&self, events: &[Event], sink: &mut dyn EffectsSink) {
        for event in events {
            match event {
                Event::EffectRequested { cue } => {
                    sink.play_random_of(self.library.clips_for(*cue));
                }
                Event::ShotFired { .. } => {
                    if let Some(clip) = &self.library.gunshot {
                        sink.play(clip);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Number of started clips an [`ExclusiveMixer`] remembers.
pub const RECENT_CLIPS: usize = 32;

/// Clip currently audible through an [`ExclusiveMixer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playback {
    /// Clip being played.
    pub clip: ClipId,
    /// Time left before the clip finishes.
    pub remaining: Duration,
}

/// Headless effects sink that keeps at most one clip audible.
#[derive(Debug)]
pub struct ExclusiveMixer {
    rng: ChaCha8Rng,
    active: Option<Playback>,
    recent: VecDeque<ClipId>,
    started: usize,
    preempted: usize,
}

impl ExclusiveMixer {
    /// Creates a mixer whose random clip choices derive from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            active: None,
            recent: VecDeque::with_capacity(RECENT_CLIPS),
            started: 0,
            preempted: 0,
        }
    }

    /// Advances playback, releasing the active clip once it has finished.
    pub fn advance(&mut self, dt: Duration) {
        let finished = match &mut self.active {
            Some(playback) => {
                playback.remaining = playback.remaining.saturating_sub(dt);
                playback.remaining.is_zero()
            }
            None => false,
        };
        if finished {
            self.active = None;
        }
    }

    /// Clip that is currently audible, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Playback> {
        self.active.as_ref()
    }

    /// Most recently started clips, oldest first, at most [`RECENT_CLIPS`] of them.
    #[must_use]
    pub fn recent(&self) -> &VecDeque<ClipId> {
        &self.recent
    }

    /// Number of clips started since the mixer was created.
    #[must_use]
    pub fn started(&self) -> usize {
        self.started
    }

    /// Number of clips cut short by a newer request.
    #[must_use]
    pub fn preempted(&self) -> usize {
        self.preempted
    }
}

impl EffectsSink for ExclusiveMixer {
    fn play(&mut self, clip: &Clip) {
        if let Some(stopped) = self.active.take() {
            self.preempted += 1;
            debug!("stopping {} to play {}", stopped.clip.name(), clip.id.name());
        }
        if self.recent.len() == RECENT_CLIPS {
            let _ = self.recent.pop_front();
        }
        self.recent.push_back(clip.id.clone());
        self.started += 1;
        self.active = Some(Playback {
            clip: clip.id.clone(),
            remaining: clip.length,
        });
    }

    fn play_random_of(&mut self, clips: &ClipSet) {
        if clips.is_empty() {
            warn!("requested a random clip from an empty clip set");
            return;
        }
        let index = self.rng.gen_range(0..clips.clips().len());
        self.play(&clips.clips()[index]);
    }
}
