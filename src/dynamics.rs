use serde::Serialize;

use crate::analysis;
use crate::config::SimulationParams;
use crate::math::Vec2;
use crate::state::OrbitState;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulationSample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub speed: f64,
    pub specific_energy: f64,
    pub specific_angular_momentum: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimulationMetadata {
    pub mu: f64,
    pub dt: f64,
    pub total_time: f64,
    pub record_every: usize,
    pub initial_position: Vec2,
    pub initial_velocity: Vec2,
}

#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub metadata: SimulationMetadata,
    pub samples: Vec<SimulationSample>,
}

/// Run the fixed-step propagation described by `params` and collect samples
/// at the configured cadence (always including t = 0 and the final step).
///
/// There is no failure path below the configuration layer: the integrator
/// clamps the degenerate radius instead of erroring, so every step produces
/// a finite state.
pub fn propagate(params: &SimulationParams) -> SimulationResult {
    let mut state = OrbitState::new(params.initial_position, params.initial_velocity, params.mu);

    let total_steps = (params.total_time / params.dt).ceil() as usize;
    let mut samples = Vec::with_capacity(total_steps / params.record_every + 2);
    samples.push(make_sample(&state, params.mu));

    for step in 1..=total_steps {
        state.advance(params.dt, params.mu);
        if step % params.record_every == 0 || step == total_steps {
            samples.push(make_sample(&state, params.mu));
        }
    }

    SimulationResult {
        metadata: SimulationMetadata {
            mu: params.mu,
            dt: params.dt,
            total_time: params.total_time,
            record_every: params.record_every,
            initial_position: params.initial_position,
            initial_velocity: params.initial_velocity,
        },
        samples,
    }
}

fn make_sample(state: &OrbitState, mu: f64) -> SimulationSample {
    SimulationSample {
        time: state.time,
        x: state.position.x,
        y: state.position.y,
        vx: state.velocity.x,
        vy: state.velocity.y,
        radius: state.radius(),
        speed: state.speed(),
        specific_energy: analysis::specific_energy(state.position, state.velocity, mu),
        specific_angular_momentum: analysis::specific_angular_momentum(
            state.position,
            state.velocity,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::config::{CsvExportConfig, DataConfig, JsonExportConfig, OutputPaths, OutputToggles};

    fn test_params(dt: f64, total_time: f64, record_every: usize) -> SimulationParams {
        SimulationParams {
            mu: 1.0,
            dt,
            total_time,
            record_every,
            initial_position: Vec2::new(1.0, 0.0),
            initial_velocity: Vec2::new(0.0, 1.0),
            output: OutputPaths {
                directory: PathBuf::from("unused"),
                data_csv: PathBuf::from("orbit.csv"),
                data_json: PathBuf::from("orbit.json"),
                trajectory_png: PathBuf::from("trajectory.png"),
                trajectory_svg: PathBuf::from("trajectory.svg"),
                energy_png: PathBuf::from("energy.png"),
                energy_svg: PathBuf::from("energy.svg"),
                angular_momentum_png: PathBuf::from("angular_momentum.png"),
                angular_momentum_svg: PathBuf::from("angular_momentum.svg"),
                toggles: OutputToggles {
                    trajectory: true,
                    energy: true,
                    angular_momentum: true,
                },
                data: DataConfig {
                    csv: CsvExportConfig {
                        enabled: true,
                        fields: Vec::new(),
                    },
                    json: JsonExportConfig {
                        enabled: true,
                        include_metadata: true,
                        include_orbital: true,
                        include_samples: true,
                        sample_fields: Vec::new(),
                    },
                },
            },
        }
    }

    #[test]
    fn records_initial_intermediate_and_final_samples() {
        // 10 steps, recorded every 4: t=0 plus steps 4, 8 and the final 10.
        let result = propagate(&test_params(0.1, 1.0, 4));
        assert_eq!(result.samples.len(), 4);
        assert_eq!(result.samples[0].time, 0.0);
        let last = result.samples.last().unwrap();
        assert!((last.time - 1.0).abs() < 1e-9);
    }

    #[test]
    fn energy_stays_bounded_over_one_period() {
        let result = propagate(&test_params(1e-3, std::f64::consts::TAU, 16));
        let e0 = result.samples[0].specific_energy;
        for sample in &result.samples {
            assert!((sample.specific_energy - e0).abs() < 1e-4);
        }
    }

    #[test]
    fn metadata_echoes_the_run_parameters() {
        let params = test_params(1e-3, 0.1, 16);
        let result = propagate(&params);
        assert_eq!(result.metadata.mu, params.mu);
        assert_eq!(result.metadata.dt, params.dt);
        assert_eq!(result.metadata.initial_position, params.initial_position);
    }
}
