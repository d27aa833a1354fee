// Headless runtime - drives a scripted VR session against the simulated host.
//
// Useful for checking locomotion and climbing behavior without a headset:
// walks up to a ladder, climbs it, teleports, and prints the body trajectory.

mod scenario;

use std::{path::PathBuf, rc::Rc, time::Duration};

use anyhow::Context;
use cgmath::vec3;
use clap::Parser;
use serde_json::json;
use tracing::info;
use vrproj::{
    Config, VrCharacter,
    host::{HapticPlayer, LocomotionServices, OverlapActor},
    sim::{
        FlatWorld, OverlapSensor, RecordingFader, RecordingHaptics, Surface, TimerQueue,
        TrackingSpace, Volume,
    },
};

/// Radius of the sphere used for hand overlaps, in meters
const HAND_RADIUS: f32 = 0.05;

#[derive(Parser)]
#[command(name = "headless_runtime")]
#[command(about = "Run a scripted VR locomotion session without a headset")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value = "1200")]
    frames: usize,

    /// Frame time in milliseconds
    #[arg(long, default_value = "11")]
    dt: u64,

    /// Record a sample every N frames
    #[arg(long, default_value = "45")]
    sample_every: usize,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    engine::logging::init_logging("VRPROJ_LOG");

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    let space = TrackingSpace::new(vec3(0.0, 0.9, 0.0), 0.9);
    let world = FlatWorld::new(0.0)
        .with_navigable_ground((-50.0, -50.0), (50.0, 50.0))
        .with_surface(Surface::new((-3.0, -30.0), (3.0, -24.0), 3.0, true))
        .with_volume(Volume::new(
            OverlapActor::new(100, &["Climbable"]),
            vec3(-0.5, 0.0, -2.4),
            vec3(1.0, 6.0, -2.1),
        ));
    let sensor = OverlapSensor::new(world.clone(), space.clone(), HAND_RADIUS);
    let fader = RecordingFader::new();
    let haptics = RecordingHaptics::new();
    let player: Rc<dyn HapticPlayer> = Rc::new(haptics.clone());

    let services = LocomotionServices {
        world: Box::new(world),
        fader: Box::new(fader.clone()),
        scheduler: Box::new(TimerQueue::new()),
    };
    let mut character = VrCharacter::new(&config, space.rig(), services, Some(player))
        .context("Failed to create character")?;

    let dt = Duration::from_millis(args.dt.max(1));
    info!(frames = args.frames, ?dt, "starting headless session");

    let scenario = scenario::Scenario::walk_climb_teleport();
    let report = scenario::run(
        &scenario,
        &mut character,
        &space,
        &sensor,
        args.frames,
        dt,
        args.sample_every.max(1),
    );

    let final_position = space.body_position();
    if args.json {
        let output = json!({
            "report": report,
            "fades": fader.fades().len(),
            "haptic_pulses": haptics.pulses().len(),
            "final_position": [final_position.x, final_position.y, final_position.z],
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for sample in &report.samples {
            println!(
                "{:7.2}s  body=({:6.2}, {:6.2}, {:6.2})  phase={:<9} climbing={}",
                sample.time, sample.body[0], sample.body[1], sample.body[2], sample.phase, sample.climbing
            );
        }
        println!(
            "{} frames, {} fades, {} haptic pulses, final position ({:.2}, {:.2}, {:.2})",
            report.frames,
            fader.fades().len(),
            haptics.pulses().len(),
            final_position.x,
            final_position.y,
            final_position.z
        );
    }

    Ok(())
}
