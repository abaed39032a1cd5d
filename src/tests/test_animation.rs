#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::circular::{lerp_state, state_distance};
    use crate::interpolator::{interpolate_pose, AnimationController, CandidatePick, LaunchError,
                              RunSettings, RunState, SimulationRun};
    use crate::kinematic_traits::{Candidates, JointState, Kinematics, Pose, Position};
    use crate::kinematics_impl::{PumaKinematics, POSITION_TOLERANCE};
    use crate::tests::test_utils::puma_state;

    /// Solver that never finds anything, forward kinematics as usual.
    struct Unreachable(PumaKinematics);

    impl Kinematics for Unreachable {
        fn inverse(&self, _reference: &JointState, _pose: &Pose) -> Candidates {
            Vec::new()
        }

        fn forward(&self, state: &JointState) -> Position {
            self.0.forward(state)
        }

        fn forward_pose(&self, state: &JointState) -> Pose {
            self.0.forward_pose(state)
        }

        fn forward_with_joint_poses(&self, state: &JointState) -> [Pose; 6] {
            self.0.forward_with_joint_poses(state)
        }
    }

    fn slow_run_ends() -> (JointState, JointState) {
        (puma_state(8.0, [30.0, 40.0, 50.0, 20.0, 10.0]),
         puma_state(10.0, [50.0, 60.0, 40.0, 30.0, 40.0]))
    }

    #[test]
    fn test_redundant_arm_stays_on_branch() {
        const TICKS: u32 = 120;
        let robot = PumaKinematics::new();
        let (from, to) = slow_run_ends();
        let mut settings = RunSettings::new(robot.forward_pose(&from), robot.forward_pose(&to), 4.0);
        settings.redundant_pick = CandidatePick::First;

        let mut animation = AnimationController::new(robot, from);
        let t0 = Instant::now();
        animation.launch(&settings, t0).expect("Both ends must be solvable");

        let mut previous = *animation.redundant();
        for k in 0..TICKS {
            let now = t0 + Duration::from_secs_f64(settings.duration * k as f64 / TICKS as f64);
            let progress = match animation.run_state() {
                RunState::Running(run) => run.progress(now),
                RunState::Idle => panic!("Run ended early at tick {}", k),
            };
            let frame = animation.tick(now);
            assert!(frame.running);

            let pose = interpolate_pose(&settings.start, &settings.end, progress);
            let candidates = animation.robot().inverse(&previous, &pose);
            assert!(!candidates.is_empty(), "No solution at tick {}", k);

            // Nearest to the state of the previous tick
            let chosen = state_distance(&frame.redundant, &previous);
            for candidate in &candidates {
                assert!(chosen <= state_distance(candidate, &previous) + 1e-12,
                        "Tick {} did not take the nearest candidate", k);
            }
            assert!(chosen < 10.0, "Jump of {} at tick {}", chosen, k);

            let miss = (animation.robot().forward(&frame.redundant)
                - Position::from(pose.translation.vector)).norm();
            assert!(miss <= POSITION_TOLERANCE);
            previous = frame.redundant;
        }

        // Close to the end pose on the last tick, then finished
        let (_, redundant) = animation.actuator_positions();
        assert!((redundant - animation.robot().forward(&to)).norm() < 1.0);
        let after = animation.tick(t0 + Duration::from_secs_f64(settings.duration + 0.1));
        assert!(!after.running);
        assert_eq!(after.redundant, previous);
    }

    #[test]
    fn test_reference_interpolates_joints() {
        let robot = PumaKinematics::new();
        let (from, to) = slow_run_ends();
        let settings = RunSettings::new(robot.forward_pose(&from), robot.forward_pose(&to), 2.0);

        let mut animation = AnimationController::new(robot, from);
        let t0 = Instant::now();
        animation.launch(&settings, t0).expect("Both ends must be solvable");

        let run = match animation.run_state() {
            RunState::Running(run) => run.clone(),
            RunState::Idle => panic!("Must be running"),
        };
        let now = t0 + Duration::from_millis(700);
        let frame = animation.tick(now);
        let expected = lerp_state(&run.start_state, &run.end_state, run.progress(now));
        assert!(state_distance(&frame.reference, &expected) < 1e-9);
    }

    #[test]
    fn test_redundant_holds_without_solution() {
        let robot = Unreachable(PumaKinematics::new());
        let (from, to) = slow_run_ends();
        let start_pose = robot.forward_pose(&from);
        let end_pose = robot.forward_pose(&to);

        let mut animation = AnimationController::new(robot, from);
        let t0 = Instant::now();
        animation.start(SimulationRun {
            start_state: from,
            end_state: to,
            start_pose,
            end_pose,
            start_time: t0,
            duration: 1.0,
        });

        let frame = animation.tick(t0 + Duration::from_millis(500));
        assert!(frame.running);
        assert_eq!(frame.redundant, from);
        assert!(state_distance(&frame.reference, &from) > 1.0);
    }

    #[test]
    fn test_launch_without_solution() {
        let (from, _) = slow_run_ends();
        let mut animation = AnimationController::new(Unreachable(PumaKinematics::new()), from);
        let result = animation.launch(&RunSettings::default(), Instant::now());
        assert_eq!(result, Err(LaunchError::NoStartSolution(CandidatePick::First)));
        assert!(!animation.is_running());
        assert_eq!(*animation.redundant(), from);
    }

    #[test]
    fn test_launch_pick_out_of_range() {
        let (from, _) = slow_run_ends();
        let mut animation = AnimationController::new(PumaKinematics::new(), from);
        let settings = RunSettings { redundant_pick: CandidatePick::Index(8), ..RunSettings::default() };
        let result = animation.launch(&settings, Instant::now());
        assert_eq!(result, Err(LaunchError::NoStartSolution(CandidatePick::Index(8))));
        assert!(!animation.is_running());
    }
}
