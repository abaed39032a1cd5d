//! Animation of the arm between two poses.
//!
//! Two arms are driven by one run. The reference arm interpolates directly in joint space
//! between the solutions found at both ends. The redundant arm follows the interpolated pose:
//! every tick the pose is solved again and the branch nearest to the previous tick is kept,
//! as the order of branches coming from the solver is not stable over time.

use std::fmt;
use std::time::{Duration, Instant};
use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use tracing::{debug, info, warn};
use crate::circular::lerp_state;
use crate::kinematic_traits::{Candidates, JointState, Kinematics, Pose, Position};
use crate::kinematics_impl::PumaKinematics;

/// Which candidate of a solve to take when a run is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidatePick {
    First,
    Last,
    Index(usize),
}

impl CandidatePick {
    pub fn pick(&self, candidates: &Candidates) -> Option<JointState> {
        match *self {
            CandidatePick::First => candidates.first().copied(),
            CandidatePick::Last => candidates.last().copied(),
            CandidatePick::Index(i) => candidates.get(i).copied(),
        }
    }
}

/// What the user sets up before pressing "run".
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Length of the run in seconds.
    pub duration: f64,
    pub start: Pose,
    pub end: Pose,
    /// Candidate for the reference arm at both ends.
    pub reference_pick: CandidatePick,
    /// Candidate the redundant arm starts from.
    pub redundant_pick: CandidatePick,
}

impl RunSettings {
    pub fn new(start: Pose, end: Pose, duration: f64) -> Self {
        RunSettings { start, end, duration, ..RunSettings::default() }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            duration: 5.0,
            start: Isometry3::identity(),
            end: Isometry3::from_parts(Translation3::new(500.0, 0.0, 0.0), UnitQuaternion::identity()),
            reference_pick: CandidatePick::First,
            redundant_pick: CandidatePick::Last,
        }
    }
}

/// A run in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub start_state: JointState,
    pub end_state: JointState,
    pub start_pose: Pose,
    pub end_pose: Pose,
    pub start_time: Instant,
    /// Seconds.
    pub duration: f64,
}

impl SimulationRun {
    /// Elapsed fraction of the run. Above 1 once the run is over; a run without positive
    /// duration is over immediately.
    pub fn progress(&self, now: Instant) -> f64 {
        if !(self.duration > 0.0) {
            return f64::INFINITY;
        }
        now.saturating_duration_since(self.start_time).as_secs_f64() / self.duration
    }

    pub fn end_time(&self) -> Option<Instant> {
        Duration::try_from_secs_f64(self.duration).ok()
            .and_then(|d| self.start_time.checked_add(d))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Running(SimulationRun),
}

/// Displayed states after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub reference: JointState,
    pub redundant: JointState,
    /// False once the run is over (or if there was none).
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LaunchError {
    /// No candidate to pick at the start pose.
    NoStartSolution(CandidatePick),
    /// No candidate to pick at the end pose.
    NoEndSolution(CandidatePick),
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LaunchError::NoStartSolution(pick) =>
                write!(f, "No {:?} solution at the start pose", pick),
            LaunchError::NoEndSolution(pick) =>
                write!(f, "No {:?} solution at the end pose", pick),
        }
    }
}

impl std::error::Error for LaunchError {}

/// Linear interpolation of the position and spherical interpolation of the orientation.
pub fn interpolate_pose(start: &Pose, end: &Pose, t: f64) -> Pose {
    let translation = start.translation.vector.lerp(&end.translation.vector, t);
    let rotation = start.rotation.slerp(&end.rotation, t);
    Isometry3::from_parts(Translation3::from(translation), rotation)
}

/// Owns the run (if any) and the states of both displayed arms.
pub struct AnimationController<K: Kinematics = PumaKinematics> {
    robot: K,
    run: RunState,
    reference: JointState,
    redundant: JointState,
}

impl<K: Kinematics> AnimationController<K> {
    /// Both arms start from the same state, which also supplies the arm geometry.
    pub fn new(robot: K, initial: JointState) -> Self {
        AnimationController {
            robot,
            run: RunState::Idle,
            reference: initial,
            redundant: initial,
        }
    }

    pub fn robot(&self) -> &K {
        &self.robot
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Running(_))
    }

    /// State of the arm that interpolates in joint space.
    pub fn reference(&self) -> &JointState {
        &self.reference
    }

    /// State of the arm that re-solves the interpolated pose.
    pub fn redundant(&self) -> &JointState {
        &self.redundant
    }

    /// Actuator positions of the reference and the redundant arm.
    pub fn actuator_positions(&self) -> (Position, Position) {
        (self.robot.forward(&self.reference), self.robot.forward(&self.redundant))
    }

    /// Replace whatever was running with this run. The redundant arm continues from its
    /// current state.
    pub fn start(&mut self, run: SimulationRun) {
        self.run = RunState::Running(run);
    }

    /// Solve both end poses and start a run. The reference arm takes `reference_pick` at both
    /// ends, the redundant arm is placed on `redundant_pick` at the start pose. Nothing
    /// changes if a pick has no candidate.
    pub fn launch(&mut self, settings: &RunSettings, now: Instant) -> Result<(), LaunchError> {
        let at_start = self.robot.inverse(&self.reference, &settings.start);
        let at_end = self.robot.inverse(&self.reference, &settings.end);

        let start_state = settings.reference_pick.pick(&at_start)
            .ok_or(LaunchError::NoStartSolution(settings.reference_pick))?;
        let end_state = settings.reference_pick.pick(&at_end)
            .ok_or(LaunchError::NoEndSolution(settings.reference_pick))?;
        let redundant = settings.redundant_pick.pick(&at_start)
            .ok_or(LaunchError::NoStartSolution(settings.redundant_pick))?;

        info!(candidates_start = at_start.len(), candidates_end = at_end.len(),
              duration = settings.duration, "Run started");

        self.redundant = redundant;
        self.start(SimulationRun {
            start_state,
            end_state,
            start_pose: settings.start,
            end_pose: settings.end,
            start_time: now,
            duration: settings.duration,
        });
        Ok(())
    }

    /// Advance the animation to `now`. Once the run is over the controller goes idle and
    /// both arms stay where the last tick left them.
    pub fn tick(&mut self, now: Instant) -> Frame {
        if let RunState::Running(run) = &self.run {
            let progress = run.progress(now);
            if progress > 1.0 {
                debug!("Run finished");
                self.run = RunState::Idle;
            } else {
                self.reference = lerp_state(&run.start_state, &run.end_state, progress);
                let pose = interpolate_pose(&run.start_pose, &run.end_pose, progress);
                match self.nearest(&pose) {
                    Some(next) => self.redundant = next,
                    None => warn!(progress, "No IK solution, redundant arm holds its state"),
                }
            }
        }
        Frame {
            reference: self.reference,
            redundant: self.redundant,
            running: self.is_running(),
        }
    }

    /// Candidate at the pose that is closest to the current redundant state.
    fn nearest(&self, pose: &Pose) -> Option<JointState> {
        self.robot.inverse_continuing(pose, &self.redundant).into_iter().next()
    }
}
