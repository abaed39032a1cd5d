//! Headless player: runs the animation with the given settings and prints both arms frame by frame.
//!
//! Usage:
//!   cargo run --bin puma-player
//!   cargo run --bin puma-player -- --config run.yaml --fps 10 --all-candidates
//!   RUST_LOG=rs_puma_kinematics=trace cargo run --bin puma-player

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use rs_puma_kinematics::interpolator::{AnimationController, RunSettings};
use rs_puma_kinematics::kinematic_traits::JointState;
use rs_puma_kinematics::kinematics_impl::PumaKinematics;
use rs_puma_kinematics::parameters::puma_kinematics::Parameters;
use rs_puma_kinematics::parameters_from_file::load_config;
use rs_puma_kinematics::utils::{dump_branches, dump_pose, format_state};

#[derive(Parser)]
#[command(about = "Animate the PUMA arm between two poses and print the joint states")]
struct Args {
    /// YAML file with `puma_geometry` and `simulation` sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second of simulated time
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Print every IK branch at the start and end pose before running
    #[arg(long)]
    all_candidates: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rs_puma_kinematics=info".parse()?)
                .add_directive("warn".parse()?),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.fps > 0, "--fps must be positive");

    let (parameters, settings) = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => (Parameters::puma(), RunSettings::default()),
    };
    print!("{}", parameters.to_yaml());

    let robot = PumaKinematics::new();
    let rest = JointState::rest(parameters);
    if args.all_candidates {
        print!("Start pose ");
        dump_pose(&settings.start);
        dump_branches(&robot.inverse_branches(&rest, &settings.start));
        print!("End pose ");
        dump_pose(&settings.end);
        dump_branches(&robot.inverse_branches(&rest, &settings.end));
    }

    let mut animation = AnimationController::new(robot, rest);
    // Simulated clock, so the output does not depend on how fast this machine is
    let t0 = Instant::now();
    animation.launch(&settings, t0).context("Cannot start the run")?;

    let step = Duration::from_secs_f64(1.0 / args.fps as f64);
    let mut now = t0;
    for frame_index in 0.. {
        let frame = animation.tick(now);
        if !frame.running {
            break;
        }
        let (left, right) = animation.actuator_positions();
        println!("{:5} reference [{}] at ({:.3}, {:.3}, {:.3})",
                 frame_index, format_state(&frame.reference), left.x, left.y, left.z);
        println!("{:5} redundant [{}] at ({:.3}, {:.3}, {:.3})",
                 frame_index, format_state(&frame.redundant), right.x, right.y, right.z);
        now += step;
    }
    Ok(())
}
