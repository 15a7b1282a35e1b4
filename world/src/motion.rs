//! Planar kinematics shared by walking and aiming.

use glam::{Quat, Vec3};

/// Projects a vector onto the horizontal plane.
pub(crate) fn planar(vector: Vec3) -> Vec3 {
    Vec3::new(vector.x, 0.0, vector.z)
}

/// Horizontal distance between two points.
pub(crate) fn planar_distance(from: Vec3, to: Vec3) -> f32 {
    planar(to - from).length()
}

/// Normalized horizontal direction from `from` toward `to`, if the points differ.
pub(crate) fn planar_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let offset = planar(to - from);
    let length = offset.length();
    if length <= f32::EPSILON {
        None
    } else {
        Some(offset / length)
    }
}

/// Yaw-only rotation whose forward axis (+Z) points along `direction`.
pub(crate) fn look_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_y(direction.x.atan2(direction.z))
}

/// Horizontal forward axis of an orientation.
pub(crate) fn facing(orientation: Quat) -> Vec3 {
    planar(orientation * Vec3::Z).normalize_or_zero()
}

/// Interpolates `current` toward facing `direction` by `amount` (clamped to `0..=1`).
///
/// A zero direction leaves the orientation untouched.
pub(crate) fn turn_toward(current: Quat, direction: Vec3, amount: f32) -> Quat {
    let direction = planar(direction);
    if direction.length_squared() <= f32::EPSILON {
        return current;
    }
    let goal = look_rotation(direction.normalize());
    current.slerp(goal, amount.clamp(0.0, 1.0)).normalize()
}

/// Moves `position` horizontally toward `target` by at most `max_step`.
///
/// The vertical coordinate of `position` is preserved and the step never
/// overshoots the target.
pub(crate) fn step_toward(position: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let offset = planar(target - position);
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        return Vec3::new(target.x, position.y, target.z);
    }
    position + offset / distance * max_step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planar_direction_discards_height() {
        let direction = planar_direction(Vec3::ZERO, Vec3::new(3.0, 7.0, 4.0)).expect("direction");
        assert!((direction - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
    }

    #[test]
    fn planar_direction_is_absent_for_vertical_offsets() {
        assert!(planar_direction(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)).is_none());
    }

    #[test]
    fn look_rotation_points_forward_axis_along_direction() {
        for direction in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::NEG_Z] {
            let rotated = look_rotation(direction) * Vec3::Z;
            assert!((rotated - direction).length() < 1e-5, "{direction:?}");
        }
    }

    #[test]
    fn step_toward_never_overshoots() {
        let position = Vec3::new(0.0, 1.0, 0.0);
        let target = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(step_toward(position, target, 5.0), Vec3::new(1.0, 1.0, 0.0));
        let partial = step_toward(position, target, 0.25);
        assert!((partial - Vec3::new(0.25, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn full_turn_reaches_goal_and_partial_turn_does_not() {
        let full = turn_toward(Quat::IDENTITY, Vec3::X, 1.0);
        assert!((facing(full) - Vec3::X).length() < 1e-5);

        let partial = turn_toward(Quat::IDENTITY, Vec3::X, 0.5);
        let heading = facing(partial);
        assert!(heading.x > 0.0 && heading.z > 0.0);
    }

    #[test]
    fn zero_direction_keeps_orientation() {
        let current = look_rotation(Vec3::X);
        assert_eq!(turn_toward(current, Vec3::ZERO, 1.0), current);
    }
}
