//! Defines the arm geometry data structure

pub mod puma_kinematics {

    /// Fixed geometry of the arm. It never changes while the arm moves and is copied into
    /// every joint state the solver produces.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Parameters {
        /// Placement of the base on the floor, x. Kinematics and segment frames are relative
        /// to the base, the caller places the arm in its scene with this offset.
        pub base_x: f64,

        /// Placement of the base on the floor, y. See `base_x`.
        pub base_y: f64,

        /// Height of the shoulder above the floor (first link).
        pub l1: f64,

        /// Length of the forearm link between the elbow and the wrist.
        pub l3: f64,

        /// Distance from the wrist to the actuator tip, along the tip x axis (wrist offset).
        pub l4: f64,

        /// Optional upper bound on the prismatic extension q2. Candidates above it are rejected.
        /// The mechanism itself has no bound, so this is `None` unless configured.
        pub max_extension: Option<f64>,
    }

    impl Parameters {
        /// The arm used by the interpolation demo.
        pub fn puma() -> Self {
            Parameters {
                base_x: 10.0,
                base_y: 10.0,
                l1: 15.0,
                l3: 5.0,
                l4: 5.0,
                max_extension: None,
            }
        }

        /// Upper bound on the distance of the actuator from the base, if the extension is bounded.
        pub fn reach(&self) -> Option<f64> {
            self.max_extension.map(|q2| self.l1 + self.l3 + self.l4 + q2)
        }

        /// Convert to string yaml representation (quick viewing, etc).
        pub fn to_yaml(&self) -> String {
            let mut yaml = format!(
                "puma_geometry:\n  \
              base_x: {}\n  \
              base_y: {}\n  \
              l1: {}\n  \
              l3: {}\n  \
              l4: {}\n",
                self.base_x, self.base_y, self.l1, self.l3, self.l4
            );
            if let Some(max_extension) = self.max_extension {
                yaml.push_str(&format!("  max_extension: {}\n", max_extension));
            }
            yaml
        }
    }

    impl Default for Parameters {
        fn default() -> Self {
            Parameters::puma()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::puma_kinematics::Parameters;

    #[test]
    fn test_reach_only_when_bounded() {
        let mut parameters = Parameters::puma();
        assert_eq!(parameters.reach(), None);
        parameters.max_extension = Some(20.0);
        assert_eq!(parameters.reach(), Some(45.0));
    }

    #[test]
    fn test_to_yaml() {
        let yaml = Parameters::puma().to_yaml();
        assert!(yaml.starts_with("puma_geometry:\n"));
        assert!(yaml.contains("  l1: 15\n"));
        assert!(!yaml.contains("max_extension"));
    }
}
