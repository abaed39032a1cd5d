//! Supports reading the arm geometry and the run settings from a YAML file (optional)

use std::path::Path;
use nalgebra::{Isometry3, Translation3};
use yaml_rust2::{Yaml, YamlLoader};

use crate::interpolator::{CandidatePick, RunSettings};
use crate::parameter_error::ParameterError;
use crate::parameters::puma_kinematics::Parameters;
use crate::utils::orientation_from_euler;

const GEOMETRY: &str = "puma_geometry";
const SIMULATION: &str = "simulation";

impl Parameters {
    /// Read the arm geometry from YAML file. YAML file like this is supported:
    /// ```yaml
    /// puma_geometry:
    ///   base_x: 10
    ///   base_y: 10
    ///   l1: 15
    ///   l3: 5
    ///   l4: 5
    ///   max_extension: 100
    /// ```
    /// Missing values are taken from `Parameters::puma()`, `max_extension` is optional.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Parameters::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        geometry(&document(contents)?[GEOMETRY])
    }
}

impl RunSettings {
    /// Read the run settings from the `simulation` section of YAML file:
    /// ```yaml
    /// simulation:
    ///   duration: 5                  # seconds
    ///   position_start: [0, 0, 0]
    ///   position_end: [500, 0, 0]
    ///   orientation_start: [0, 0, 0] # Euler angles, degrees
    ///   orientation_end: [0, 0, 90]
    ///   reference_pick: first        # first, last or index
    ///   redundant_pick: last
    /// ```
    /// Every key is optional, defaults are those of `RunSettings::default()`.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        RunSettings::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        simulation(&document(contents)?[SIMULATION])
    }
}

/// Read both sections from the same file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<(Parameters, RunSettings), ParameterError> {
    let contents = std::fs::read_to_string(path)?;
    let root = document(&contents)?;
    Ok((geometry(&root[GEOMETRY])?, simulation(&root[SIMULATION])?))
}

fn document(contents: &str) -> Result<Yaml, ParameterError> {
    let mut docs = YamlLoader::load_from_str(contents)
        .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
    // An empty file is a valid (all defaults) configuration
    Ok(if docs.is_empty() { Yaml::Null } else { docs.swap_remove(0) })
}

fn geometry(section: &Yaml) -> Result<Parameters, ParameterError> {
    let defaults = Parameters::puma();
    let length = |key: &str, default: f64| -> Result<f64, ParameterError> {
        let value = number(&section[key], key)?.unwrap_or(default);
        if value < 0.0 {
            return Err(ParameterError::InvalidValue(format!(
                "{}.{} must not be negative (got {})", GEOMETRY, key, value
            )));
        }
        Ok(value)
    };

    let parameters = Parameters {
        base_x: number(&section["base_x"], "base_x")?.unwrap_or(defaults.base_x),
        base_y: number(&section["base_y"], "base_y")?.unwrap_or(defaults.base_y),
        l1: length("l1", defaults.l1)?,
        l3: length("l3", defaults.l3)?,
        l4: length("l4", defaults.l4)?,
        max_extension: None,
    };
    Ok(match number(&section["max_extension"], "max_extension")? {
        Some(_) => Parameters { max_extension: Some(length("max_extension", 0.0)?), ..parameters },
        None => parameters,
    })
}

fn simulation(section: &Yaml) -> Result<RunSettings, ParameterError> {
    let defaults = RunSettings::default();

    let duration = number(&section["duration"], "duration")?.unwrap_or(defaults.duration);
    if !(duration > 0.0) {
        return Err(ParameterError::InvalidValue(format!(
            "{}.duration must be positive (got {})", SIMULATION, duration
        )));
    }

    let pose = |position: &str, orientation: &str, default: &Isometry3<f64>| {
        let translation = match triple(&section[position], position)? {
            Some([x, y, z]) => Translation3::new(x, y, z),
            None => default.translation,
        };
        let rotation = match triple(&section[orientation], orientation)? {
            Some(euler) => orientation_from_euler(euler),
            None => default.rotation,
        };
        Ok::<_, ParameterError>(Isometry3::from_parts(translation, rotation))
    };

    Ok(RunSettings {
        duration,
        start: pose("position_start", "orientation_start", &defaults.start)?,
        end: pose("position_end", "orientation_end", &defaults.end)?,
        reference_pick: pick(&section["reference_pick"], "reference_pick")?
            .unwrap_or(defaults.reference_pick),
        redundant_pick: pick(&section["redundant_pick"], "redundant_pick")?
            .unwrap_or(defaults.redundant_pick),
    })
}

/// Missing key gives `None`, anything else must be a finite number.
fn number(yaml: &Yaml, field: &str) -> Result<Option<f64>, ParameterError> {
    let value = match yaml {
        Yaml::BadValue | Yaml::Null => return Ok(None),
        Yaml::Integer(i) => *i as f64,
        Yaml::Real(_) => yaml.as_f64()
            .ok_or_else(|| ParameterError::ParseError(format!("{}: malformed number", field)))?,
        _ => return Err(ParameterError::InvalidValue(format!("{} must be a number", field))),
    };
    if !value.is_finite() {
        return Err(ParameterError::InvalidValue(format!("{} must be finite (got {})", field, value)));
    }
    Ok(Some(value))
}

fn triple(yaml: &Yaml, field: &str) -> Result<Option<[f64; 3]>, ParameterError> {
    let items = match yaml {
        Yaml::BadValue | Yaml::Null => return Ok(None),
        Yaml::Array(items) => items,
        _ => return Err(ParameterError::InvalidValue(format!("{} must be a list [x, y, z]", field))),
    };
    if items.len() != 3 {
        return Err(ParameterError::InvalidLength {
            field: field.to_string(),
            expected: 3,
            found: items.len(),
        });
    }
    let mut out = [0.0; 3];
    for (i, item) in items.iter().enumerate() {
        out[i] = number(item, field)?
            .ok_or_else(|| ParameterError::MissingField(format!("{}[{}]", field, i)))?;
    }
    Ok(Some(out))
}

fn pick(yaml: &Yaml, field: &str) -> Result<Option<CandidatePick>, ParameterError> {
    match yaml {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::String(s) if s.eq_ignore_ascii_case("first") => Ok(Some(CandidatePick::First)),
        Yaml::String(s) if s.eq_ignore_ascii_case("last") => Ok(Some(CandidatePick::Last)),
        Yaml::Integer(i) if *i >= 0 => Ok(Some(CandidatePick::Index(*i as usize))),
        _ => Err(ParameterError::InvalidValue(format!(
            "{} must be 'first', 'last' or a candidate index", field
        ))),
    }
}
