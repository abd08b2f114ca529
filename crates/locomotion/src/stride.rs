use crate::rig::AvatarRig;

/// Longest observed distance between the two feet, used as step length.
#[derive(Debug, Clone, PartialEq)]
pub struct StrideTracker {
    max_observed: f32,
    left: String,
    right: String,
}

impl StrideTracker {
    /// Tracker over the named effectors, or `None` if the rig lacks either.
    pub fn resolve<A: AvatarRig + ?Sized>(rig: &A, left: &str, right: &str) -> Option<Self> {
        rig.effector_position(left)?;
        rig.effector_position(right)?;
        Some(Self {
            max_observed: 0.0,
            left: left.to_string(),
            right: right.to_string(),
        })
    }

    pub fn max_observed(&self) -> f32 {
        self.max_observed
    }

    /// Measure the current stride. Returns the new maximum if it grew.
    pub fn sample<A: AvatarRig + ?Sized>(&mut self, rig: &A) -> Option<f32> {
        let left = rig.effector_position(&self.left)?;
        let right = rig.effector_position(&self.right)?;
        let length = left.distance(right);
        if length > self.max_observed {
            self.max_observed = length;
            Some(length)
        } else {
            None
        }
    }
}

/// Walk playback rate that makes feet match ground speed.
///
/// One animation cycle is assumed to be one step with each leg, so a cycle
/// covers two strides. Returns `None` for a non-positive stride or duration.
pub fn playback_rate(
    stride_length: f32,
    clip_duration_seconds: f32,
    linear_speed: f32,
    unit_conversion: f32,
) -> Option<f32> {
    if stride_length <= 0.0 || clip_duration_seconds <= 0.0 {
        return None;
    }
    let cycles_per_meter = 1.0 / (2.0 * stride_length);
    let animation_speed = cycles_per_meter / clip_duration_seconds;
    Some(animation_speed * linear_speed * unit_conversion)
}
