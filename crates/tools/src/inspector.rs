use embody_anim::AnimationCatalog;
use embody_common::Direction;
use embody_locomotion::{AvatarRig, LocomotionController, MovementMode, ViewRig};
use serde::Serialize;

/// Locomotion inspector for developer tooling.
///
/// Provides read-only snapshots of a controller for debugging and the CLI.
pub struct LocomotionInspector;

impl LocomotionInspector {
    /// Snapshot the controller's movement and playback state.
    pub fn summary<A: AvatarRig, V: ViewRig>(controller: &LocomotionController<A, V>) -> LocomotionSummary {
        let p = controller.avatar().position();
        LocomotionSummary {
            mode: controller.mode(),
            position: [p.x, p.y, p.z],
            directions: controller.state().active_directions().collect(),
            target: controller.state().target().map(|t| [t.x, t.y, t.z]),
            clip: controller.active_clip().map(str::to_string),
            playback_rate: controller.playback_rate(),
            linear_speed: controller.linear_speed(),
            stride_length: controller.stride_length(),
            turning: controller.rotation().is_some(),
        }
    }

    /// One `role -> clip` line per binding, then the fallback pool.
    pub fn catalog_lines(catalog: &AnimationCatalog) -> Vec<String> {
        let report = catalog.report();
        let mut lines: Vec<String> = report
            .bindings
            .iter()
            .map(|(role, clip)| format!("{role:>9} -> {clip}"))
            .collect();
        if !report.fallback.is_empty() {
            lines.push(format!(" fallback: {}", report.fallback.join(", ")));
        }
        lines
    }
}

/// Summary of locomotion state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct LocomotionSummary {
    pub mode: MovementMode,
    pub position: [f32; 3],
    pub directions: Vec<Direction>,
    pub target: Option<[f32; 3]>,
    pub clip: Option<String>,
    pub playback_rate: f32,
    pub linear_speed: f32,
    pub stride_length: Option<f32>,
    pub turning: bool,
}

impl std::fmt::Display for LocomotionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Avatar: mode={:?} pos=({:.2}, {:.2}, {:.2})",
            self.mode, self.position[0], self.position[1], self.position[2],
        )?;
        if !self.directions.is_empty() {
            let held: Vec<&str> = self.directions.iter().map(|d| d.symbol()).collect();
            write!(f, " held=[{}]", held.join(","))?;
        }
        if let Some(t) = self.target {
            write!(f, " target=({:.2}, {:.2}, {:.2})", t[0], t[1], t[2])?;
        }
        write!(
            f,
            " clip={} rate={:.2} speed={:.2}",
            self.clip.as_deref().unwrap_or("-"),
            self.playback_rate,
            self.linear_speed
        )?;
        if let Some(stride) = self.stride_length {
            write!(f, " stride={stride:.3}")?;
        }
        Ok(())
    }
}
