//! Helper functions

use nalgebra::{Isometry3, UnitQuaternion};
use crate::kinematic_traits::{Candidates, JointState};
use crate::kinematics_impl::Branch;

/// Format the joint values of the state as one line: extension first, then the five angles in degrees.
pub fn format_state(state: &JointState) -> String {
    let mut row_str = format!("q2 {:7.3} |", state.q2);
    for angle in state.angles() {
        row_str.push_str(&format!(" {:6.2}", angle));
    }
    row_str
}

/// Print joint values of a single state.
#[allow(dead_code)]
pub fn dump_state(state: &JointState) {
    println!("[{}]", format_state(state));
}

/// Print joint values for all candidates.
#[allow(dead_code)]
pub fn dump_candidates(candidates: &Candidates) {
    if candidates.is_empty() {
        println!("No solutions");
    }
    for candidate in candidates {
        dump_state(candidate);
    }
}

/// Print every branch slot, with the reason when the slot is empty.
#[allow(dead_code)]
pub fn dump_branches(branches: &[Branch]) {
    for (index, branch) in branches.iter().enumerate() {
        match branch {
            Ok(state) => println!("{}: [{}]", index, format_state(state)),
            Err(rejection) => println!("{}: {}", index, rejection),
        }
    }
}

pub fn dump_pose(isometry: &Isometry3<f64>) {
    let translation = isometry.translation.vector;
    let rotation: UnitQuaternion<f64> = isometry.rotation;

    println!(
        "x: {:.5}, y: {:.5}, z: {:.5},  quat: {:.5},{:.5},{:.5},{:.5}",
        translation.x, translation.y, translation.z, rotation.i, rotation.j, rotation.k, rotation.w
    );
}

/// Orientation from Euler angles in degrees, applied as Rz * Ry * Rx (x first).
pub fn orientation_from_euler(degrees: [f64; 3]) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(
        degrees[0].to_radians(),
        degrees[1].to_radians(),
        degrees[2].to_radians(),
    )
}

/// Euler angles in degrees of the orientation, inverse of `orientation_from_euler`.
pub fn euler_from_orientation(rotation: &UnitQuaternion<f64>) -> [f64; 3] {
    let (x, y, z) = rotation.euler_angles();
    [x.to_degrees(), y.to_degrees(), z.to_degrees()]
}
