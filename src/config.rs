use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::Deserialize;

use crate::math::Vec2;

/// Documented input ranges from the interactive front end this replaces.
/// `mu` outside its range is rejected; initial-state components outside
/// theirs only warn, since the ranges are guidance rather than hard limits.
pub const MU_MIN: f64 = 0.001;
pub const MU_MAX: f64 = 10.0;
pub const POSITION_COMPONENT_MIN: f64 = 0.2;
pub const POSITION_COMPONENT_MAX: f64 = 1.5;
pub const VELOCITY_COMPONENT_MAX: f64 = 3.0;

/// Initial positions closer to the origin than this are replaced by the
/// documented default before any integration happens.
pub const DEGENERATE_POSITION_NORM: f64 = 1e-6;

pub const DEFAULT_POSITION: Vec2 = Vec2 { x: 1.0, y: 0.0 };
pub const DEFAULT_VELOCITY: Vec2 = Vec2 { x: 0.0, y: 1.0 };

#[derive(Debug, Deserialize)]
struct ConfigRoot {
    simulation: SimulationSection,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Deserialize)]
struct SimulationSection {
    #[serde(default = "default_mu")]
    mu: f64,
    #[serde(default = "default_dt")]
    dt: f64,
    #[serde(default = "default_total_time")]
    total_time: f64,
    #[serde(default = "default_record_every")]
    record_every: usize,
    #[serde(default)]
    initial_state: InitialStateSection,
}

fn default_mu() -> f64 {
    1.0
}

fn default_dt() -> f64 {
    1e-3
}

fn default_total_time() -> f64 {
    std::f64::consts::TAU
}

fn default_record_every() -> usize {
    16
}

#[derive(Debug, Deserialize)]
struct InitialStateSection {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Default for InitialStateSection {
    fn default() -> Self {
        Self {
            x: DEFAULT_POSITION.x,
            y: DEFAULT_POSITION.y,
            vx: DEFAULT_VELOCITY.x,
            vy: DEFAULT_VELOCITY.y,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutputSection {
    #[serde(default = "default_directory")]
    directory: PathBuf,
    #[serde(default = "default_data_csv")]
    data_csv: PathBuf,
    #[serde(default = "default_data_json")]
    data_json: PathBuf,
    #[serde(default = "default_trajectory_png")]
    trajectory_png: PathBuf,
    #[serde(default = "default_trajectory_svg")]
    trajectory_svg: PathBuf,
    #[serde(default = "default_energy_png")]
    energy_png: PathBuf,
    #[serde(default = "default_energy_svg")]
    energy_svg: PathBuf,
    #[serde(default = "default_angular_momentum_png")]
    angular_momentum_png: PathBuf,
    #[serde(default = "default_angular_momentum_svg")]
    angular_momentum_svg: PathBuf,
    #[serde(default)]
    toggles: OutputTogglesSection,
    #[serde(default)]
    data: DataSection,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            data_csv: default_data_csv(),
            data_json: default_data_json(),
            trajectory_png: default_trajectory_png(),
            trajectory_svg: default_trajectory_svg(),
            energy_png: default_energy_png(),
            energy_svg: default_energy_svg(),
            angular_momentum_png: default_angular_momentum_png(),
            angular_momentum_svg: default_angular_momentum_svg(),
            toggles: OutputTogglesSection::default(),
            data: DataSection::default(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("output")
}

fn default_data_csv() -> PathBuf {
    PathBuf::from("orbit.csv")
}

fn default_data_json() -> PathBuf {
    PathBuf::from("orbit.json")
}

fn default_trajectory_png() -> PathBuf {
    PathBuf::from("trajectory.png")
}

fn default_trajectory_svg() -> PathBuf {
    PathBuf::from("trajectory.svg")
}

fn default_energy_png() -> PathBuf {
    PathBuf::from("energy.png")
}

fn default_energy_svg() -> PathBuf {
    PathBuf::from("energy.svg")
}

fn default_angular_momentum_png() -> PathBuf {
    PathBuf::from("angular_momentum.png")
}

fn default_angular_momentum_svg() -> PathBuf {
    PathBuf::from("angular_momentum.svg")
}

#[derive(Debug, Deserialize, Clone, Copy)]
struct OutputTogglesSection {
    #[serde(default = "default_true")]
    trajectory: bool,
    #[serde(default = "default_true")]
    energy: bool,
    #[serde(default = "default_true")]
    angular_momentum: bool,
}

impl Default for OutputTogglesSection {
    fn default() -> Self {
        Self {
            trajectory: true,
            energy: true,
            angular_momentum: true,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
struct DataSection {
    #[serde(default)]
    csv: CsvDataSection,
    #[serde(default)]
    json: JsonDataSection,
}

#[derive(Debug, Deserialize, Clone)]
struct CsvDataSection {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_sample_fields")]
    fields: Vec<String>,
}

impl Default for CsvDataSection {
    fn default() -> Self {
        Self {
            enabled: true,
            fields: default_sample_fields(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
struct JsonDataSection {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default = "default_true")]
    include_metadata: bool,
    #[serde(default = "default_true")]
    include_orbital: bool,
    #[serde(default = "default_true")]
    include_samples: bool,
    #[serde(default = "default_sample_fields")]
    sample_fields: Vec<String>,
}

impl Default for JsonDataSection {
    fn default() -> Self {
        Self {
            enabled: true,
            include_metadata: true,
            include_orbital: true,
            include_samples: true,
            sample_fields: default_sample_fields(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sample_fields() -> Vec<String> {
    vec![
        "time".into(),
        "x".into(),
        "y".into(),
        "vx".into(),
        "vy".into(),
        "radius".into(),
        "speed".into(),
        "specific_energy".into(),
        "specific_angular_momentum".into(),
    ]
}

/// Validated runtime parameters for one propagation run.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub mu: f64,
    pub dt: f64,
    pub total_time: f64,
    pub record_every: usize,
    pub initial_position: Vec2,
    pub initial_velocity: Vec2,
    pub output: OutputPaths,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub directory: PathBuf,
    pub data_csv: PathBuf,
    pub data_json: PathBuf,
    pub trajectory_png: PathBuf,
    pub trajectory_svg: PathBuf,
    pub energy_png: PathBuf,
    pub energy_svg: PathBuf,
    pub angular_momentum_png: PathBuf,
    pub angular_momentum_svg: PathBuf,
    pub toggles: OutputToggles,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct OutputToggles {
    pub trajectory: bool,
    pub energy: bool,
    pub angular_momentum: bool,
}

#[derive(Debug, Clone)]
pub struct DataConfig {
    pub csv: CsvExportConfig,
    pub json: JsonExportConfig,
}

#[derive(Debug, Clone)]
pub struct CsvExportConfig {
    pub enabled: bool,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct JsonExportConfig {
    pub enabled: bool,
    pub include_metadata: bool,
    pub include_orbital: bool,
    pub include_samples: bool,
    pub sample_fields: Vec<String>,
}

impl SimulationParams {
    /// Human friendly description of key configuration choices.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("mu = {}", self.mu),
            format!(
                "initial state: r0=({}, {}), v0=({}, {})",
                self.initial_position.x,
                self.initial_position.y,
                self.initial_velocity.x,
                self.initial_velocity.y,
            ),
            format!(
                "stepping: dt={}, total_time={}, record every {} steps",
                self.dt, self.total_time, self.record_every
            ),
            format!(
                "output dir: {} (csv={}, json={})",
                self.output.directory.display(),
                self.output.data.csv.enabled,
                self.output.data.json.enabled
            ),
        ]
    }
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<SimulationParams> {
    let raw = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

    let parsed: ConfigRoot =
        toml::from_str(&raw).context("Failed to parse simulation configuration")?;
    load_from_sections(&parsed.simulation, &parsed.output)
}

fn load_from_sections(
    simulation: &SimulationSection,
    output: &OutputSection,
) -> Result<SimulationParams> {
    let mut params = SimulationParams {
        mu: simulation.mu,
        dt: simulation.dt,
        total_time: simulation.total_time,
        record_every: simulation.record_every,
        initial_position: Vec2::new(simulation.initial_state.x, simulation.initial_state.y),
        initial_velocity: Vec2::new(simulation.initial_state.vx, simulation.initial_state.vy),
        output: OutputPaths {
            directory: output.directory.clone(),
            data_csv: output.data_csv.clone(),
            data_json: output.data_json.clone(),
            trajectory_png: output.trajectory_png.clone(),
            trajectory_svg: output.trajectory_svg.clone(),
            energy_png: output.energy_png.clone(),
            energy_svg: output.energy_svg.clone(),
            angular_momentum_png: output.angular_momentum_png.clone(),
            angular_momentum_svg: output.angular_momentum_svg.clone(),
            toggles: OutputToggles {
                trajectory: output.toggles.trajectory,
                energy: output.toggles.energy,
                angular_momentum: output.toggles.angular_momentum,
            },
            data: DataConfig {
                csv: CsvExportConfig {
                    enabled: output.data.csv.enabled,
                    fields: output.data.csv.fields.clone(),
                },
                json: JsonExportConfig {
                    enabled: output.data.json.enabled,
                    include_metadata: output.data.json.include_metadata,
                    include_orbital: output.data.json.include_orbital,
                    include_samples: output.data.json.include_samples,
                    sample_fields: output.data.json.sample_fields.clone(),
                },
            },
        },
    };

    validate(&mut params)?;
    Ok(params)
}

/// Check and normalize parameters before they reach the integrator. The
/// integrator itself never validates; degenerate values are rejected or
/// defaulted here.
pub fn validate(params: &mut SimulationParams) -> Result<()> {
    if !params.dt.is_finite() || params.dt <= 0.0 {
        return Err(anyhow!("Time step dt must be positive, got {}", params.dt));
    }

    if !params.total_time.is_finite() || params.total_time <= 0.0 {
        return Err(anyhow!(
            "Total time must be positive, got {}",
            params.total_time
        ));
    }

    if !params.mu.is_finite() || params.mu < MU_MIN || params.mu > MU_MAX {
        return Err(anyhow!(
            "mu must lie in [{}, {}], got {}",
            MU_MIN,
            MU_MAX,
            params.mu
        ));
    }

    let r0 = params.initial_position;
    let v0 = params.initial_velocity;
    if !r0.x.is_finite() || !r0.y.is_finite() || !v0.x.is_finite() || !v0.y.is_finite() {
        return Err(anyhow!("Initial state must be finite"));
    }

    if r0.norm() < DEGENERATE_POSITION_NORM {
        warn!(
            "|r0| = {:.3e} too small; using default ({}, {})",
            r0.norm(),
            DEFAULT_POSITION.x,
            DEFAULT_POSITION.y
        );
        params.initial_position = DEFAULT_POSITION;
    } else if !(POSITION_COMPONENT_MIN..=POSITION_COMPONENT_MAX).contains(&r0.norm()) {
        warn!(
            "initial radius {} outside documented range [{}, {}]",
            r0.norm(),
            POSITION_COMPONENT_MIN,
            POSITION_COMPONENT_MAX
        );
    }

    for component in [v0.x, v0.y] {
        if component.abs() > VELOCITY_COMPONENT_MAX {
            warn!(
                "initial velocity component {} outside documented range [-{}, {}]",
                component, VELOCITY_COMPONENT_MAX, VELOCITY_COMPONENT_MAX
            );
        }
    }

    if params.record_every == 0 {
        params.record_every = 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_from(toml_str: &str) -> Result<SimulationParams> {
        let parsed: ConfigRoot = toml::from_str(toml_str).unwrap();
        load_from_sections(&parsed.simulation, &parsed.output)
    }

    #[test]
    fn defaults_match_the_documented_run() {
        let params = params_from("[simulation]\n").unwrap();
        assert_eq!(params.mu, 1.0);
        assert_eq!(params.dt, 1e-3);
        assert_eq!(params.record_every, 16);
        assert_eq!(params.initial_position, DEFAULT_POSITION);
        assert_eq!(params.initial_velocity, DEFAULT_VELOCITY);
    }

    #[test]
    fn degenerate_initial_position_is_defaulted() {
        let params = params_from(
            "[simulation]\n[simulation.initial_state]\nx = 1e-9\ny = 0.0\nvx = 0.0\nvy = 1.0\n",
        )
        .unwrap();
        assert_eq!(params.initial_position, DEFAULT_POSITION);
    }

    #[test]
    fn rejects_mu_outside_documented_range() {
        assert!(params_from("[simulation]\nmu = 0.0\n").is_err());
        assert!(params_from("[simulation]\nmu = 11.0\n").is_err());
    }

    #[test]
    fn rejects_non_positive_dt() {
        assert!(params_from("[simulation]\ndt = 0.0\n").is_err());
        assert!(params_from("[simulation]\ndt = -1e-3\n").is_err());
    }

    #[test]
    fn record_every_is_floored_at_one() {
        let params = params_from("[simulation]\nrecord_every = 0\n").unwrap();
        assert_eq!(params.record_every, 1);
    }
}
