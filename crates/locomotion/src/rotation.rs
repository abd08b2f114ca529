use std::time::{Duration, Instant};

use glam::{Quat, Vec3};

/// Which entity a turn is applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationTarget {
    /// Third-person orbit yaw, when the camera owns visible rotation.
    CameraYaw { from: f32, to: f32 },
    /// Avatar orientation, when the avatar owns it.
    Avatar { from: Quat, to: Quat },
}

/// Interpolated value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationSample {
    CameraYaw(f32),
    Avatar(Quat),
}

/// A short linear turn from one orientation to another.
///
/// Restarting means building a new tween; there is no queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationTween {
    target: RotationTarget,
    started_at: Instant,
    duration: Duration,
}

impl RotationTween {
    pub fn new(target: RotationTarget, started_at: Instant, duration: Duration) -> Self {
        Self {
            target,
            started_at,
            duration,
        }
    }

    pub fn target(&self) -> RotationTarget {
        self.target
    }

    /// Fraction of the turn completed at `now`, in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn sample(&self, now: Instant) -> RotationSample {
        let t = self.progress(now);
        match self.target {
            RotationTarget::CameraYaw { from, to } => RotationSample::CameraYaw(from + (to - from) * t),
            RotationTarget::Avatar { from, to } => RotationSample::Avatar(from.slerp(to, t)),
        }
    }
}

/// Signed yaw (about +Y) of the shortest horizontal arc from `from` to `to`.
///
/// Only the XZ components count. Returns `None` when either vector has no
/// horizontal extent.
pub fn heading_angle(from: Vec3, to: Vec3) -> Option<f32> {
    let a = Vec3::new(from.x, 0.0, from.z);
    let b = Vec3::new(to.x, 0.0, to.z);
    if a.length_squared() < 1e-8 || b.length_squared() < 1e-8 {
        return None;
    }
    Some((a.z * b.x - a.x * b.z).atan2(a.x * b.x + a.z * b.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn heading_quarter_turns() {
        let left = heading_angle(Vec3::NEG_Z, Vec3::NEG_X).unwrap();
        assert!((left - FRAC_PI_2).abs() < 1e-5);
        let right = heading_angle(Vec3::NEG_Z, Vec3::X).unwrap();
        assert!((right + FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn heading_angle_rotates_from_onto_to() {
        let from = Vec3::new(0.3, 0.0, -1.0).normalize();
        let to = Vec3::new(-2.0, 5.0, 1.0);
        let angle = heading_angle(from, to).unwrap();
        let turned = Quat::from_rotation_y(angle) * from;
        let expected = Vec3::new(to.x, 0.0, to.z).normalize();
        assert!(turned.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn heading_about_face_is_half_turn() {
        let angle = heading_angle(Vec3::NEG_Z, Vec3::Z).unwrap();
        assert!((angle.abs() - PI).abs() < 1e-5);
    }

    #[test]
    fn heading_degenerate() {
        assert!(heading_angle(Vec3::NEG_Z, Vec3::Y).is_none());
        assert!(heading_angle(Vec3::ZERO, Vec3::X).is_none());
    }

    #[test]
    fn camera_tween_interpolates_linearly() {
        let t0 = Instant::now();
        let tween = RotationTween::new(
            RotationTarget::CameraYaw { from: 1.0, to: 2.0 },
            t0,
            Duration::from_millis(200),
        );
        assert_eq!(tween.sample(t0), RotationSample::CameraYaw(1.0));
        match tween.sample(t0 + Duration::from_millis(100)) {
            RotationSample::CameraYaw(y) => assert!((y - 1.5).abs() < 1e-5),
            other => panic!("unexpected sample {other:?}"),
        }
        assert!(!tween.is_finished(t0 + Duration::from_millis(199)));
        assert!(tween.is_finished(t0 + Duration::from_millis(200)));
        assert_eq!(
            tween.sample(t0 + Duration::from_secs(5)),
            RotationSample::CameraYaw(2.0)
        );
    }

    #[test]
    fn avatar_tween_ends_at_target() {
        let t0 = Instant::now();
        let to = Quat::from_rotation_y(FRAC_PI_2);
        let tween = RotationTween::new(
            RotationTarget::Avatar {
                from: Quat::IDENTITY,
                to,
            },
            t0,
            Duration::from_millis(200),
        );
        match tween.sample(t0 + Duration::from_millis(300)) {
            RotationSample::Avatar(q) => assert!(q.abs_diff_eq(to, 1e-5)),
            other => panic!("unexpected sample {other:?}"),
        }
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let t0 = Instant::now();
        let tween = RotationTween::new(
            RotationTarget::CameraYaw { from: 0.0, to: 1.0 },
            t0,
            Duration::ZERO,
        );
        assert!(tween.is_finished(t0));
    }
}
