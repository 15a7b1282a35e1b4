#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns pointer input into unit intents.
//!
//! Where the pointer lands is resolved by a [`SpatialQuery`]; this system only
//! decides which [`Command`] each button gesture maps to.

use glam::Vec3;
use log::debug;
use lone_soldier_core::{Command, ObjectId, SpatialQuery};

/// Pointer gestures detected by an adapter during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerInput {
    /// Secondary button went down: walk to the indicated point.
    pub move_pressed: bool,
    /// Primary button went down: aim and fire at the indicated point.
    pub fire_pressed: bool,
    /// Primary button came up: leave the firing stance.
    pub fire_released: bool,
    /// Interaction with the object under the pointer was requested.
    pub interact: bool,
}

/// Maps pointer gestures onto move, fire, and cancel commands.
#[derive(Clone, Copy, Debug)]
pub struct Selection {
    ground: ObjectId,
}

impl Selection {
    /// Creates a selection system that treats `ground` as walkable terrain.
    #[must_use]
    pub const fn new(ground: ObjectId) -> Self {
        Self { ground }
    }

    /// Emits the commands implied by `input` for a unit whose liveness is `unit_alive`.
    ///
    /// Dead units receive nothing. Gestures without a pointer hit are dropped.
    pub fn handle(
        &self,
        input: &PointerInput,
        spatial: &dyn SpatialQuery,
        unit_alive: bool,
        out: &mut Vec<Command>,
    ) {
        if !unit_alive {
            return;
        }

        if input.move_pressed {
            if let Some(point) = spatial.latest_hit_point() {
                out.push(Command::RequestMove { point });
            }
        }

        if input.fire_pressed {
            if let Some(point) = spatial.latest_hit_point() {
                out.push(Command::RequestFire { point });
            }
        }

        if input.fire_released {
            out.push(Command::CancelFire);
        }

        if input.interact {
            if let Some(point) = self.ground_point(spatial) {
                debug!("ground interaction at {point}");
                out.push(Command::RequestMove { point });
            }
        }
    }

    fn ground_point(&self, spatial: &dyn SpatialQuery) -> Option<Vec3> {
        if spatial.latest_hit_object()? != self.ground {
            return None;
        }
        spatial.latest_hit_point()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: ObjectId = ObjectId::new(1);
    const CRATE: ObjectId = ObjectId::new(2);

    struct FixedHit {
        point: Option<Vec3>,
        object: Option<ObjectId>,
    }

    impl SpatialQuery for FixedHit {
        fn latest_hit_point(&self) -> Option<Vec3> {
            self.point
        }

        fn latest_hit_object(&self) -> Option<ObjectId> {
            self.object
        }
    }

    fn hit(object: ObjectId) -> FixedHit {
        FixedHit {
            point: Some(Vec3::new(2.0, 0.0, 3.0)),
            object: Some(object),
        }
    }

    #[test]
    fn buttons_map_to_intents_in_frame_order() {
        let selection = Selection::new(GROUND);
        let input = PointerInput {
            move_pressed: true,
            fire_pressed: true,
            fire_released: true,
            interact: false,
        };
        let mut out = Vec::new();

        selection.handle(&input, &hit(CRATE), true, &mut out);

        let point = Vec3::new(2.0, 0.0, 3.0);
        assert_eq!(
            out,
            vec![
                Command::RequestMove { point },
                Command::RequestFire { point },
                Command::CancelFire,
            ]
        );
    }

    #[test]
    fn interaction_moves_only_onto_ground() {
        let selection = Selection::new(GROUND);
        let input = PointerInput {
            interact: true,
            ..PointerInput::default()
        };

        let mut on_ground = Vec::new();
        selection.handle(&input, &hit(GROUND), true, &mut on_ground);
        assert_eq!(on_ground.len(), 1);

        let mut on_crate = Vec::new();
        selection.handle(&input, &hit(CRATE), true, &mut on_crate);
        assert!(on_crate.is_empty());
    }

    #[test]
    fn dead_unit_receives_no_orders() {
        let selection = Selection::new(GROUND);
        let input = PointerInput {
            move_pressed: true,
            interact: true,
            ..PointerInput::default()
        };
        let mut out = Vec::new();

        selection.handle(&input, &hit(GROUND), false, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn missed_pointer_drops_gestures() {
        let selection = Selection::new(GROUND);
        let miss = FixedHit {
            point: None,
            object: None,
        };
        let input = PointerInput {
            move_pressed: true,
            fire_pressed: true,
            interact: true,
            ..PointerInput::default()
        };
        let mut out = Vec::new();

        selection.handle(&input, &miss, true, &mut out);

        assert!(out.is_empty());
    }
}
