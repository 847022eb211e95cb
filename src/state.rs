use serde::Serialize;

use crate::math::Vec2;
use crate::physics;

/// Owned state of one simulation run. The stored acceleration is always the
/// acceleration law evaluated at the stored position; it is derived in the
/// constructor and replaced together with position and velocity on every
/// step, never set on its own.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrbitState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub time: f64,
}

impl OrbitState {
    pub fn new(position: Vec2, velocity: Vec2, mu: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: physics::acceleration(position, mu),
            time: 0.0,
        }
    }

    /// Advance by one fixed sub-step and accumulate elapsed time.
    pub fn advance(&mut self, dt: f64, mu: f64) {
        let (position, velocity, acceleration) =
            physics::step(self.position, self.velocity, self.acceleration, dt, mu);
        self.position = position;
        self.velocity = velocity;
        self.acceleration = acceleration;
        self.time += dt;
    }

    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_derives_acceleration_from_position() {
        let state = OrbitState::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 1.0);
        assert!((state.acceleration.x + 1.0).abs() < 1e-12);
        assert!(state.acceleration.y.abs() < 1e-12);
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn advance_matches_a_raw_step_and_tracks_time() {
        let mu = 1.0;
        let dt = 1e-3;
        let mut state = OrbitState::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), mu);
        let (r, v, a) = physics::step(state.position, state.velocity, state.acceleration, dt, mu);

        state.advance(dt, mu);

        assert_eq!(state.position, r);
        assert_eq!(state.velocity, v);
        assert_eq!(state.acceleration, a);
        assert!((state.time - dt).abs() < 1e-15);
    }
}
