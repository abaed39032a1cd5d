//! Angle arithmetic on the circle of 360 degrees.
//!
//! Used both to interpolate joint states during animation and to measure how far apart
//! two solver branches are, so the animation can stay on the nearest one.

use crate::kinematic_traits::JointState;

/// Period of the angular domain, degrees.
pub const FULL_TURN: f64 = 360.0;

/// Reduce the angle into [0, 360).
pub fn normalize(a: f64) -> f64 {
    let r = a.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to the period itself, and keeps the sign of -0
    if r >= FULL_TURN { 0.0 } else { r + 0.0 }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Interpolate between two angles along the shorter arc. `t = 0` gives `a`, `t = 1` gives `b`
/// (both normalized), and the path never travels more than 180 degrees.
pub fn mix(a: f64, b: f64, t: f64) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if (a - b).abs() <= FULL_TURN / 2.0 {
        normalize(lerp(a, b, t))
    } else if b >= a {
        normalize(lerp(a, b - FULL_TURN, t))
    } else {
        normalize(lerp(a, b + FULL_TURN, t))
    }
}

/// Angular separation along the shorter arc, always within [0, 180].
pub fn distance(a: f64, b: f64) -> f64 {
    let d = (normalize(a) - normalize(b)).abs();
    if d > FULL_TURN / 2.0 { FULL_TURN - d } else { d }
}

/// Continuity metric between two joint states: Euclidean norm over the extension difference
/// and the five circular angle distances. Not a physical distance.
pub fn state_distance(s1: &JointState, s2: &JointState) -> f64 {
    let a1 = s1.angles();
    let a2 = s2.angles();
    let angular: f64 = a1.iter().zip(a2.iter())
        .map(|(&x, &y)| distance(x, y).powi(2))
        .sum();
    ((s1.q2 - s2.q2).powi(2) + angular).sqrt()
}

/// Interpolate two joint states. Geometry comes from `s1`, the extension is interpolated
/// linearly and every angle along its shorter arc.
pub fn lerp_state(s1: &JointState, s2: &JointState, t: f64) -> JointState {
    let a1 = s1.angles();
    let a2 = s2.angles();
    JointState {
        geometry: s1.geometry,
        q2: lerp(s1.q2, s2.q2, t),
        ..*s1
    }.with_angles(std::array::from_fn(|i| mix(a1[i], a2[i], t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::puma_kinematics::Parameters;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPS: f64 = 1e-9;

    fn same_angle(a: f64, b: f64) -> bool {
        distance(a, b) < EPS
    }

    fn state(q2: f64, angles: [f64; 5]) -> JointState {
        JointState { q2, ..JointState::rest(Parameters::puma()) }.with_angles(angles)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(360.0), 0.0);
        assert_eq!(normalize(-90.0), 270.0);
        assert_eq!(normalize(725.0), 5.0);
        assert_eq!(normalize(-1e-20), 0.0);
        assert!(normalize(-0.0).is_sign_positive());
        assert!(normalize(-720.0).is_sign_positive());
        assert!((normalize(-72_000.5) - 359.5).abs() < EPS);
    }

    #[test]
    fn test_mix_crosses_zero() {
        assert!(same_angle(mix(350.0, 10.0, 0.5), 0.0));
        assert!(same_angle(mix(10.0, 350.0, 0.5), 0.0));
        assert!((mix(350.0, 10.0, 0.25) - 355.0).abs() < EPS);
        assert!((mix(10.0, 350.0, 0.25) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_mix_plain() {
        assert!((mix(10.0, 100.0, 0.5) - 55.0).abs() < EPS);
        assert!((mix(100.0, 10.0, 0.1) - 91.0).abs() < EPS);
    }

    #[test]
    fn test_mix_endpoints_and_arc() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let a = rng.random_range(-720.0..720.0);
            let b = rng.random_range(-720.0..720.0);
            assert!(same_angle(mix(a, b, 0.0), normalize(a)), "mix({a}, {b}, 0)");
            assert!(same_angle(mix(a, b, 1.0), normalize(b)), "mix({a}, {b}, 1)");

            // Travel never exceeds the short arc
            let t = rng.random_range(0.0..1.0);
            let m = mix(a, b, t);
            assert!(distance(a, m) + distance(m, b) <= distance(a, b) + 1e-6);
        }
    }

    #[test]
    fn test_distance_properties() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let a = rng.random_range(-1000.0..1000.0);
            let b = rng.random_range(-1000.0..1000.0);
            let d = distance(a, b);
            assert!((0.0..=180.0).contains(&d));
            assert_eq!(d, distance(b, a));
            assert_eq!(distance(a, a), 0.0);
        }
        assert!((distance(350.0, 10.0) - 20.0).abs() < EPS);
        assert!((distance(0.0, 180.0) - 180.0).abs() < EPS);
        assert!(distance(30.0, 390.0) < EPS);
    }

    #[test]
    fn test_state_distance() {
        let s1 = state(10.0, [350.0, 0.0, 0.0, 0.0, 0.0]);
        let s2 = state(13.0, [10.0, 0.0, 0.0, 0.0, 4.0]);
        assert_eq!(state_distance(&s1, &s1), 0.0);
        assert_eq!(state_distance(&s1, &s2), state_distance(&s2, &s1));
        // sqrt(3^2 + 20^2 + 4^2)
        assert!((state_distance(&s1, &s2) - 425.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_lerp_state() {
        let mut far = Parameters::puma();
        far.l1 = 99.0;
        let s1 = state(10.0, [350.0, 20.0, 90.0, 180.0, 0.0]);
        let mut s2 = state(20.0, [10.0, 60.0, 270.0, 0.0, 359.0]);
        s2.geometry = far;

        let half = lerp_state(&s1, &s2, 0.5);
        assert_eq!(half.geometry, s1.geometry);
        assert!((half.q2 - 15.0).abs() < EPS);
        for (i, angle) in half.angles().iter().enumerate() {
            assert_eq!(*angle, mix(s1.angles()[i], s2.angles()[i], 0.5));
        }
        assert!(same_angle(half.alpha_1, 0.0));
        assert!(same_angle(half.alpha_5, 359.5));

        let start = lerp_state(&s1, &s2, 0.0);
        assert!(state_distance(&start, &s1) < EPS);
    }
}
