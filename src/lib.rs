//! Rust implementation of inverse and forward kinematics for a redundant PUMA-like arm with
//! five revolute joints and one prismatic joint, and of the animation that moves it between two
//! poses without jumping from one solution branch to another.
//!
//! # Features
//!
//! - Closed form inverse kinematics: up to 8 candidates per target pose, every one of them
//!   normalized (angles in [0, 360) degrees, non-negative extension) and cross-checked with
//!   forward kinematics.
//! - Singular branches (division by a vanishing cos(alpha_1) or cos(alpha_4)) are detected and
//!   reported instead of producing NaN values.
//! - Circular angle arithmetic: shortest arc interpolation and distance, and a joint state
//!   distance used to keep the animation on the nearest branch.
//! - Animation of two arms at once: one interpolating in joint space, one re-solving the
//!   interpolated pose each tick.
//! - Arm geometry and run settings can be read from YAML (feature `allow_filesystem`).
//!
//! # Conventions
//!
//! Angles are in degrees, lengths in arbitrary units. The world frame is right-handed with z
//! pointing up. See [kinematics_impl] for the composition of the chain.
//!
//! ```
//! use rs_puma_kinematics::kinematic_traits::{JointState, Kinematics};
//! use rs_puma_kinematics::kinematics_impl::PumaKinematics;
//! use rs_puma_kinematics::parameters::puma_kinematics::Parameters;
//!
//! let robot = PumaKinematics::new();
//! let arm = JointState { q2: 8.0, alpha_1: 30.0, alpha_2: 40.0, alpha_3: 50.0,
//!     alpha_4: 20.0, alpha_5: 10.0, ..JointState::rest(Parameters::puma()) };
//!
//! let pose = robot.forward_pose(&arm);
//! for candidate in robot.inverse(&arm, &pose) {
//!     assert!((robot.forward(&candidate) - robot.forward(&arm)).norm() <= 0.5);
//! }
//! ```

pub mod parameters;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;
#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

#[path = "utils/utils.rs"]
pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;

pub mod circular;

pub mod interpolator;

#[cfg(test)]
#[cfg(feature = "allow_filesystem")]
mod tests;
