use std::f32::consts::TAU;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use embody_anim::ClipInfo;
use embody_common::{Clock, ManualClock};
use embody_locomotion::{HeadlessAvatar, HeadlessView, StepOutcome, playback_rate};
use embody_orchestrator::{EmbodimentConfig, EmbodimentOrchestrator, LocalScheduler, RecordingSink};
use embody_tools::LocomotionInspector;
use glam::Vec3;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "embody-cli", about = "CLI tool for avatar embodiment")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info
    Info,
    /// Bind animation roles for a list of clip names
    Catalog {
        /// Comma-separated clip names
        #[arg(short, long, value_delimiter = ',', required = true)]
        clips: Vec<String>,
        /// Config file with custom role rules
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the bindings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the walk playback rate for a stride
    Stride {
        /// Stride length
        #[arg(long)]
        stride: f32,
        /// Walk clip duration in seconds
        #[arg(long)]
        duration: f32,
        /// Ground speed
        #[arg(long)]
        speed: f32,
        /// Speed unit conversion factor
        #[arg(long, default_value = "10")]
        factor: f32,
    },
    /// Run a headless third-person simulation
    Simulate {
        /// Embodiment config (YAML, or JSON by extension)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Comma-separated clip names the avatar ships with
        #[arg(long, value_delimiter = ',', default_value = "idle,walk,run")]
        clips: Vec<String>,
        /// Walk to this point, given as X,Z
        #[arg(long)]
        target: Option<String>,
        /// Hold a direction (left, right, forward, back, up)
        #[arg(long)]
        direction: Option<String>,
        /// Frames to hold the direction for
        #[arg(long, default_value = "60")]
        hold: u32,
        /// Frames to simulate
        #[arg(short, long, default_value = "300")]
        frames: u32,
        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Ground speed
        #[arg(long, default_value = "2")]
        speed: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("embody-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", embody_common::crate_info());
            println!("anim: {}", embody_anim::crate_info());
            println!("locomotion: {}", embody_locomotion::crate_info());
            println!("orchestrator: {}", embody_orchestrator::crate_info());
            println!("tools: {}", embody_tools::crate_info());
        }
        Commands::Catalog {
            clips,
            config,
            json,
        } => {
            let config = load_config(config)?;
            let catalog = config.build_catalog(clips.into_iter().map(|n| ClipInfo::new(n, 1.0)).collect());
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog.report())?);
            } else {
                for line in LocomotionInspector::catalog_lines(&catalog) {
                    println!("{line}");
                }
            }
        }
        Commands::Stride {
            stride,
            duration,
            speed,
            factor,
        } => {
            let Some(rate) = playback_rate(stride, duration, speed, factor) else {
                bail!("stride and duration must be positive");
            };
            println!("playback rate: {rate:.4}");
        }
        Commands::Simulate {
            config,
            clips,
            target,
            direction,
            hold,
            frames,
            fps,
            speed,
        } => {
            if !(fps > 0.0) {
                bail!("fps must be positive");
            }
            let target = target.as_deref().map(parse_point).transpose()?;
            let config = load_config(config)?;
            simulate(&config, clips, target, direction, hold, frames, fps, speed)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<EmbodimentConfig> {
    match path {
        Some(path) => EmbodimentConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EmbodimentConfig::default()),
    }
}

fn parse_point(text: &str) -> anyhow::Result<Vec3> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    let [x, z] = parts.as_slice() else {
        bail!("expected X,Z but got {text:?}");
    };
    let x: f32 = x.parse().with_context(|| format!("bad X in {text:?}"))?;
    let z: f32 = z.parse().with_context(|| format!("bad Z in {text:?}"))?;
    Ok(Vec3::new(x, 0.0, z))
}

/// Foot offsets for a one-second gait cycle at `phase` radians.
fn gait(phase: f32) -> (Vec3, Vec3) {
    let swing = phase.sin() * 0.35;
    (Vec3::new(0.15, 0.0, swing), Vec3::new(-0.15, 0.0, -swing))
}

#[allow(clippy::too_many_arguments)]
fn simulate(
    config: &EmbodimentConfig,
    clips: Vec<String>,
    target: Option<Vec3>,
    direction: Option<String>,
    hold: u32,
    frames: u32,
    fps: f32,
    speed: f32,
) -> anyhow::Result<()> {
    let clock = ManualClock::new();
    let shared: Rc<dyn Clock> = Rc::new(clock.clone());
    let left = config.locomotion.left_effector.clone();
    let right = config.locomotion.right_effector.clone();
    let (l, r) = gait(0.0);
    let avatar = HeadlessAvatar::new()
        .with_effector(left.clone(), l)
        .with_effector(right.clone(), r);

    let mut orchestrator = EmbodimentOrchestrator::from_config(
        avatar,
        HeadlessView::third_person(),
        clips.into_iter().map(|n| ClipInfo::new(n, 1.0)).collect(),
        RecordingSink::online(),
        LocalScheduler::new(Rc::clone(&shared)),
        config,
        shared,
    )?;
    orchestrator.attach();

    if let Some(point) = target {
        orchestrator.move_to_target(point);
    }
    if let Some(symbol) = direction.as_deref() {
        orchestrator.on_direction(symbol, true);
    }

    let dt = 1.0 / fps;
    let report_every = (fps.round() as u32 / 2).max(1);
    for frame in 0..frames {
        if frame == hold {
            if let Some(symbol) = direction.as_deref() {
                orchestrator.on_direction(symbol, false);
            }
        }
        clock.advance(Duration::from_secs_f32(dt));
        let (l, r) = gait(frame as f32 * dt * TAU);
        let avatar = orchestrator.controller_mut().avatar_mut();
        avatar.set_effector(&left, l);
        avatar.set_effector(&right, r);

        let outcome = orchestrator.on_frame(dt, speed);
        orchestrator.poll_intervals();

        let finished = matches!(
            outcome,
            Some(StepOutcome::Arrived | StepOutcome::Missed | StepOutcome::TimedOut)
        );
        if finished || frame % report_every == 0 {
            println!(
                "[{:>5.2}s] {}",
                clock.elapsed().as_secs_f32(),
                LocomotionInspector::summary(orchestrator.controller())
            );
        }
    }

    tracing::info!(
        frames,
        notifications = orchestrator.network().sent().len(),
        "simulation finished"
    );
    for event in orchestrator.network().sent() {
        println!("{}", event.to_json()?);
    }
    orchestrator.dispose();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_point_accepts_x_z() {
        assert_eq!(parse_point("1.5, -2").unwrap(), Vec3::new(1.5, 0.0, -2.0));
        assert!(parse_point("1,2,3").is_err());
        assert!(parse_point("a,2").is_err());
    }

    #[test]
    fn gait_feet_are_apart() {
        let (l, r) = gait(TAU / 4.0);
        assert!((l.distance(r) - (0.3f32.powi(2) + 0.7f32.powi(2)).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "embody-cli",
            "simulate",
            "--target",
            "3,4",
            "--frames",
            "10",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Simulate { frames: 10, .. }));
    }
}
