//! Closed form kinematics of the 5 joint arm with a prismatic second joint.
//!
//! # Conventions
//!
//! The chain is composed in its own right-handed frame where y points up, multiplying
//! column-vector transforms parent first (`M = M_parent * M_local`):
//!
//! ```text
//! shoulder = T(0, l1, 0) * Ry(alpha_1)
//! arm      = shoulder * Rz(-alpha_2)
//! elbow    = arm * T(q2, 0, 0)
//! wrist    = elbow * Rz(-alpha_3) * T(0, -l3, 0) * Ry(alpha_4)
//! tool     = wrist * T(l4, 0, 0) * Rx(alpha_5 - 90)
//! ```
//!
//! The world frame has z up and is the chain frame turned by +90 degrees about x, so a chain
//! point `(x, y, z)` lands at `(x, -z, y)`. Target poses are given in world coordinates, the
//! tip x axis being the direction of the wrist offset `l4`. The inverse formulas below are
//! derived for exactly this composition; any change in sign or axis order breaks them.

use std::f64::consts::{FRAC_PI_2, PI};
use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use tracing::trace;
use crate::circular::normalize;
use crate::kinematic_traits::{BranchRejection, Candidates, JointState, Kinematics, Pose,
                              Position, Singularity};
use crate::parameters::puma_kinematics::Parameters;

/// Candidates whose actuator lands further than this from the target are discarded.
pub const POSITION_TOLERANCE: f64 = 0.5;

/// A cosine below this magnitude is treated as zero when used as a divisor.
pub const SINGULARITY_EPSILON: f64 = 1e-10;

/// The wrist bend comes from `asin`, which loses half the digits near +-1. A sine of alpha_4
/// within this distance of +-1 is treated as a wrist bent by 90 degrees.
pub const WRIST_SINGULARITY_EPSILON: f64 = 1e-12;

/// Number of algebraic branches: 2 (alpha_1) x 2 (alpha_4) x 2 (alpha_2).
pub const BRANCHES: usize = 8;

/// Result of a single branch slot of the solver.
pub type Branch = Result<JointState, BranchRejection>;

#[derive(Debug, Clone, Copy)]
pub struct PumaKinematics {
    tolerance: f64,
}

impl PumaKinematics {
    /// Creates a new solver with the default acceptance tolerance of 0.5 length units.
    pub fn new() -> Self {
        PumaKinematics { tolerance: POSITION_TOLERANCE }
    }

    /// Creates a solver that accepts candidates within the given distance of the target.
    pub fn with_tolerance(tolerance: f64) -> Self {
        PumaKinematics { tolerance }
    }

    /// Largest distance between the actuator and the target for a candidate to be accepted.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Evaluate all 8 branches for the target, in index order `b1 + 2 * b4 + 4 * b2`
    /// where `b1` flips alpha_1 by 180 degrees, `b4` takes the reflected alpha_4 and `b2` flips
    /// alpha_2 by 180 degrees. Slots that produce no valid candidate say why.
    pub fn inverse_branches(&self, reference: &JointState, pose: &Pose) -> [Branch; BRANCHES] {
        let target = WristTarget::new(&reference.geometry, pose);
        let goal = Position::from(pose.translation.vector);
        std::array::from_fn(|i| {
            let raw = target.branch(i & 1 == 1, i & 2 == 2, i & 4 == 4)?;
            self.accept(correct_extension_sign(raw), &goal)
        })
    }

    /// Candidates arrive sign corrected, so the extension is never negative here.
    fn accept(&self, candidate: JointState, target: &Position) -> Branch {
        if !is_finite(&candidate) {
            return Err(BranchRejection::NonFinite);
        }
        if let Some(limit) = candidate.geometry.max_extension {
            if candidate.q2 > limit {
                return Err(BranchRejection::ExtensionLimit(candidate.q2));
            }
        }
        let miss = (self.forward(&candidate) - target).norm();
        // Written so that NaN is rejected as well
        if !(miss <= self.tolerance) {
            return Err(BranchRejection::OutOfTolerance(miss));
        }
        Ok(candidate)
    }
}

impl Default for PumaKinematics {
    fn default() -> Self {
        PumaKinematics::new()
    }
}

/// If the extension came out negative, point the arm the other way instead: the same elbow
/// location is reached with `-q2` and alpha_2 turned by 180 degrees, and alpha_3 turns along
/// to keep the forearm where it was.
pub fn correct_extension_sign(state: JointState) -> JointState {
    if state.q2 < 0.0 {
        JointState {
            q2: -state.q2,
            alpha_2: normalize(state.alpha_2 + 180.0),
            alpha_3: normalize(state.alpha_3 + 180.0),
            ..state
        }
    } else {
        state
    }
}

fn is_finite(state: &JointState) -> bool {
    state.q2.is_finite() && state.angles().iter().all(|a| a.is_finite())
}

/// Target decomposed into what every branch needs: tip axes and the shared alpha_1 root.
struct WristTarget {
    geometry: Parameters,
    p: Vector3<f64>,
    x5: Vector3<f64>,
    y5: Vector3<f64>,
    z5: Vector3<f64>,
    theta_1: f64,
}

impl WristTarget {
    fn new(geometry: &Parameters, pose: &Pose) -> Self {
        let p = pose.translation.vector;
        let x5 = pose.rotation * Vector3::x();
        let y5 = pose.rotation * Vector3::y();
        let z5 = pose.rotation * Vector3::z();

        // The wrist (target minus the offset l4 along the tip x axis) lies in the arm plane
        let theta_1 = ((p.y - geometry.l4 * x5.y) / (p.x - geometry.l4 * x5.x)).atan();

        WristTarget { geometry: *geometry, p, x5, y5, z5, theta_1 }
    }

    /// Raw branch before sign correction and validation. Angles in degrees, normalized.
    fn branch(&self, flip_1: bool, reflect_4: bool, flip_2: bool) -> Branch {
        let WristTarget { geometry: g, p, x5, y5, z5, .. } = self;

        let alpha_1 = self.theta_1 + if flip_1 { PI } else { 0.0 };
        let (s1, c1) = alpha_1.sin_cos();
        if c1.abs() < SINGULARITY_EPSILON {
            return Err(BranchRejection::Singularity(Singularity::CosAlpha1));
        }

        let sin_bend = (c1 * x5.y - s1 * x5.x).clamp(-1.0, 1.0);
        if sin_bend.abs() > 1.0 - WRIST_SINGULARITY_EPSILON {
            return Err(BranchRejection::Singularity(Singularity::CosAlpha4));
        }
        let bend = sin_bend.asin();
        let alpha_4 = match (reflect_4, bend > 0.0) {
            (false, _) => bend,
            (true, true) => PI - bend,
            (true, false) => -PI - bend,
        };
        let (s4, c4) = alpha_4.sin_cos();

        // Wrist roll from the tip y and z axes projected on the arm plane normal
        let c5 = (c1 * y5.y - s1 * y5.x) / c4;
        let s5 = (s1 * z5.x - c1 * z5.y) / c4;
        let alpha_5 = s5.atan2(c5);

        let reach_x = c4 * (p.x - g.l4 * x5.x) - c1 * g.l3 * x5.z;
        let nom = -(c1 * c4 * (p.z - g.l4 * x5.z - g.l1) + g.l3 * (x5.x + s1 * s4));
        let alpha_2 = (nom / reach_x).atan() + if flip_2 { PI } else { 0.0 };
        let c2 = alpha_2.cos();
        // Vertical arm: the extension drops out of the horizontal reach
        if c2.abs() < SINGULARITY_EPSILON {
            return Err(BranchRejection::Singularity(Singularity::CosAlpha2));
        }

        let q2 = reach_x / (c1 * c2 * c4);

        let c23 = (x5.x + s1 * s4) / (c1 * c4);
        let s23 = -x5.z / c4;
        let alpha_3 = s23.atan2(c23) - alpha_2;

        Ok(JointState {
            geometry: *g,
            q2,
            alpha_1: normalize(alpha_1.to_degrees()),
            alpha_2: normalize(alpha_2.to_degrees()),
            alpha_3: normalize(alpha_3.to_degrees()),
            alpha_4: normalize(alpha_4.to_degrees()),
            alpha_5: normalize(alpha_5.to_degrees()),
        })
    }
}

fn rotation(axis: Vector3<f64>, degrees: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_scaled_axis(axis * degrees.to_radians())
}

fn frame(x: f64, y: f64, z: f64, rotation: UnitQuaternion<f64>) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::new(x, y, z), rotation)
}

/// Chain frame to world frame: +90 degrees about x, so chain y (up) becomes world z.
fn chain_to_world() -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::identity(),
                          UnitQuaternion::from_scaled_axis(Vector3::x() * FRAC_PI_2))
}

/// Segment frames in the chain frame: base, shoulder, arm, elbow, wrist, tool.
fn chain_frames(state: &JointState) -> [Isometry3<f64>; 6] {
    let g = &state.geometry;
    let none = UnitQuaternion::identity();

    let base = Isometry3::identity();
    let shoulder = frame(0.0, g.l1, 0.0, rotation(Vector3::y(), state.alpha_1));
    let arm = shoulder * frame(0.0, 0.0, 0.0, rotation(Vector3::z(), -state.alpha_2));
    let elbow = arm * frame(state.q2, 0.0, 0.0, none);
    let wrist = elbow
        * frame(0.0, 0.0, 0.0, rotation(Vector3::z(), -state.alpha_3))
        * frame(0.0, -g.l3, 0.0, rotation(Vector3::y(), state.alpha_4));
    let tool = wrist * frame(g.l4, 0.0, 0.0, rotation(Vector3::x(), state.alpha_5 - 90.0));

    [base, shoulder, arm, elbow, wrist, tool]
}

impl Kinematics for PumaKinematics {
    fn inverse(&self, reference: &JointState, pose: &Pose) -> Candidates {
        self.inverse_branches(reference, pose)
            .into_iter()
            .enumerate()
            .filter_map(|(branch, result)| match result {
                Ok(candidate) => Some(candidate),
                Err(rejection) => {
                    trace!(branch, %rejection, "IK branch rejected");
                    None
                }
            })
            .collect()
    }

    fn forward(&self, state: &JointState) -> Position {
        let tip = chain_frames(state)[5].translation.vector;
        chain_to_world() * Position::from(tip)
    }

    fn forward_pose(&self, state: &JointState) -> Pose {
        chain_to_world() * chain_frames(state)[5]
    }

    fn forward_with_joint_poses(&self, state: &JointState) -> [Pose; 6] {
        let world = chain_to_world();
        chain_frames(state).map(|f| world * f)
    }
}
