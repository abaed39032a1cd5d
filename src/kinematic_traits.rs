extern crate nalgebra as na;

use std::fmt;
use na::{Isometry3, Point3};
use crate::circular::state_distance;
use crate::parameters::puma_kinematics::Parameters;

/// Pose is used as a target of the robot tip. It contains both Cartesian position and rotation
/// quaternion. World frame is right-handed with z pointing up.
/// ```
/// extern crate nalgebra as na;
/// use na::{Isometry3, Translation3, UnitQuaternion};
///
/// type Pose = Isometry3<f64>;
///
/// let translation = Translation3::new(12.0, 3.0, 20.0);
/// let rotation = UnitQuaternion::from_euler_angles(0.0, 0.0, 0.5);
/// let target = Pose::from_parts(translation, rotation);
/// ```
pub type Pose = Isometry3<f64>;

/// Position of the actuator (tip) in the world frame.
pub type Position = Point3<f64>;

/// Joint space configurations produced by one solve call. Up to 8 entries, in the fixed
/// branch order (see `PumaKinematics::inverse_branches`). May contain duplicates at
/// orientation singularities, so treat it as a set.
pub type Candidates = Vec<JointState>;

/// One fully specified configuration of the arm. Geometry is carried along so the
/// state is self-contained for forward kinematics and drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointState {
    /// Fixed arm geometry, copied from the reference state into every candidate.
    pub geometry: Parameters,

    /// Extension of the prismatic joint. Non-negative after a solve.
    pub q2: f64,

    /// Base rotation about the vertical axis, degrees.
    pub alpha_1: f64,
    /// Shoulder, degrees.
    pub alpha_2: f64,
    /// Elbow, degrees.
    pub alpha_3: f64,
    /// Wrist bend, degrees.
    pub alpha_4: f64,
    /// Wrist roll, degrees.
    pub alpha_5: f64,
}

impl JointState {
    /// The arm as it stands before anything was solved: extension 10, all angles zero.
    pub fn rest(geometry: Parameters) -> Self {
        JointState {
            geometry,
            q2: 10.0,
            alpha_1: 0.0,
            alpha_2: 0.0,
            alpha_3: 0.0,
            alpha_4: 0.0,
            alpha_5: 0.0,
        }
    }

    /// Revolute joint angles, alpha_1 first.
    pub fn angles(&self) -> [f64; 5] {
        [self.alpha_1, self.alpha_2, self.alpha_3, self.alpha_4, self.alpha_5]
    }

    /// Same geometry and extension, new revolute angles.
    pub fn with_angles(&self, angles: [f64; 5]) -> Self {
        JointState {
            alpha_1: angles[0],
            alpha_2: angles[1],
            alpha_3: angles[2],
            alpha_4: angles[3],
            alpha_5: angles[4],
            ..*self
        }
    }
}

/// Divisions in the closed form solution that break down when the divisor is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Singularity {
    /// cos(alpha_1) is zero, the arm plane is perpendicular to the world x axis.
    CosAlpha1,
    /// cos(alpha_2) is zero, the arm points straight up or down.
    CosAlpha2,
    /// cos(alpha_4) is zero, the wrist is bent by 90 degrees out of the arm plane.
    CosAlpha4,
}

/// Reason why one of the 8 branch slots produced no candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BranchRejection {
    Singularity(Singularity),
    /// Some joint value came out as NaN or infinity.
    NonFinite,
    /// The extension exceeds the configured `max_extension`.
    ExtensionLimit(f64),
    /// Forward kinematics of the candidate misses the target by this distance.
    OutOfTolerance(f64),
}

impl fmt::Display for BranchRejection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BranchRejection::Singularity(Singularity::CosAlpha1) =>
                write!(f, "singular branch: cos(alpha_1) = 0"),
            BranchRejection::Singularity(Singularity::CosAlpha2) =>
                write!(f, "singular branch: cos(alpha_2) = 0"),
            BranchRejection::Singularity(Singularity::CosAlpha4) =>
                write!(f, "singular branch: cos(alpha_4) = 0"),
            BranchRejection::NonFinite =>
                write!(f, "non-finite joint value"),
            BranchRejection::ExtensionLimit(q2) =>
                write!(f, "extension {:.3} exceeds the limit", q2),
            BranchRejection::OutOfTolerance(distance) =>
                write!(f, "actuator misses the target by {:.3}", distance),
        }
    }
}

pub trait Kinematics {
    /// Find all joint states that place the actuator at the given pose. Fixed geometry
    /// comes from the reference state, its joint values are not used.
    fn inverse(&self, reference: &JointState, pose: &Pose) -> Candidates;

    /// Find all joint states for the pose, sorted by proximity to the previous state (closest
    /// first, ties keep the branch order). Geometry comes from the previous state.
    fn inverse_continuing(&self, pose: &Pose, previous: &JointState) -> Candidates {
        let mut candidates = self.inverse(previous, pose);
        candidates.sort_by(|a, b| {
            state_distance(a, previous).total_cmp(&state_distance(b, previous))
        });
        candidates
    }

    /// Position of the actuator in the world frame.
    fn forward(&self, state: &JointState) -> Position;

    /// Full tip frame (position and orientation) in the world frame.
    fn forward_pose(&self, state: &JointState) -> Pose;

    /// Frames of the arm segments, base first and tip last, as needed for drawing.
    fn forward_with_joint_poses(&self, state: &JointState) -> [Pose; 6];
}
