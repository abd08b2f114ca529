use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A held movement direction, as reported by the input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Forward,
    Back,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::Left,
        Direction::Right,
        Direction::Forward,
        Direction::Back,
        Direction::Up,
    ];

    /// Avatar-local step vector. Forward is -Z, left is +X.
    ///
    /// `Up` is half length so a held jump key climbs slower than a walk.
    pub fn vector(self) -> Vec3 {
        match self {
            Self::Left => Vec3::X,
            Self::Right => Vec3::NEG_X,
            Self::Forward => Vec3::NEG_Z,
            Self::Back => Vec3::Z,
            Self::Up => Vec3::new(0.0, 0.5, 0.0),
        }
    }

    /// Symbol used on the input adapter boundary.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Forward => "forward",
            Self::Back => "back",
            Self::Up => "up",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Returned when a direction symbol is not one of the known five.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction symbol: {0:?}")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.symbol() == symbol)
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

/// Which camera currently owns the user's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    FirstPerson,
    ThirdPerson,
    /// Headset view. Local changes are not broadcast while it is active.
    Immersive,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstPerson => "first-person",
            Self::ThirdPerson => "third-person",
            Self::Immersive => "immersive",
        })
    }
}

/// Last known pose of the first-person camera.
///
/// `position` is the eye; the avatar's feet sit `eye_height` below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstPersonPose {
    pub position: Vec3,
    /// Rotation about +Y, radians.
    pub yaw: f32,
    pub eye_height: f32,
}

impl FirstPersonPose {
    pub fn feet(&self) -> Vec3 {
        self.position - Vec3::Y * self.eye_height
    }
}

impl Default for FirstPersonPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.8, 0.0),
            yaw: 0.0,
            eye_height: 1.8,
        }
    }
}
