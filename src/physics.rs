use log::warn;

use crate::math::Vec2;

/// Smallest radius used as a divisor in the acceleration law. Positions
/// closer to the origin than this are clamped, keeping the acceleration
/// large but finite.
pub const RADIUS_FLOOR: f64 = 1e-9;

/// Gravitational acceleration of an inverse-square central force at
/// `position`: `-mu * r / |r|^3`, magnitude `mu / |r|^2`, directed toward
/// the origin.
pub fn acceleration(position: Vec2, mu: f64) -> Vec2 {
    let mut r = position.norm();
    if r < RADIUS_FLOOR {
        warn!(
            "radius {:.3e} below floor {:.3e}; clamping before division",
            r, RADIUS_FLOOR
        );
        r = RADIUS_FLOOR;
    }
    position.scale(-mu / (r * r * r))
}

/// Advance one fixed velocity-Verlet step and return the updated
/// (position, velocity, acceleration) triple.
///
/// The scheme is time-reversible and symplectic, so the energy error stays
/// bounded over long runs at fixed step size; `accel` must be the
/// acceleration at `position` (the caller feeds the previous step's output
/// back in). The caller advances its own elapsed time by `dt`.
pub fn step(position: Vec2, velocity: Vec2, accel: Vec2, dt: f64, mu: f64) -> (Vec2, Vec2, Vec2) {
    let next_position = position + velocity.scale(dt) + accel.scale(0.5 * dt * dt);
    let next_accel = acceleration(next_position, mu);
    let next_velocity = velocity + (accel + next_accel).scale(0.5 * dt);
    (next_position, next_velocity, next_accel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::cross;

    fn specific_energy(r: Vec2, v: Vec2, mu: f64) -> f64 {
        0.5 * v.norm_squared() - mu / r.norm()
    }

    #[test]
    fn acceleration_magnitude_and_direction() {
        let r = Vec2::new(0.6, -0.8);
        let mu = 2.5;
        let a = acceleration(r, mu);

        let expected = mu / r.norm_squared();
        assert!((a.norm() - expected).abs() < 1e-12);
        // Radial force: no tangential component.
        assert!(cross(a, r).abs() < 1e-12);
        // Attractive: opposite the position vector.
        assert!(a.dot(r) < 0.0);
    }

    #[test]
    fn near_zero_radius_stays_finite() {
        let a = acceleration(Vec2::new(1e-12, 0.0), 1.0);
        assert!(a.x.is_finite());
        assert!(a.y.is_finite());
        assert!(a.x < 0.0);
    }

    #[test]
    fn circular_orbit_conserves_energy_and_closes() {
        let mu = 1.0;
        let dt = 1e-3;
        let mut r = Vec2::new(1.0, 0.0);
        let mut v = Vec2::new(0.0, 1.0);
        let mut a = acceleration(r, mu);

        let e0 = specific_energy(r, v, mu);
        let l0 = cross(r, v);

        // ~ one full period of the unit circular orbit.
        for _ in 0..6283 {
            let (rn, vn, an) = step(r, v, a, dt, mu);
            r = rn;
            v = vn;
            a = an;
            assert!((specific_energy(r, v, mu) - e0).abs() < 1e-4);
            assert!((cross(r, v) - l0).abs() < 1e-6);
        }

        assert!((r - Vec2::new(1.0, 0.0)).norm() < 1e-2);
    }

    #[test]
    fn step_is_time_reversible() {
        let mu = 1.3;
        let dt = 1e-3;
        let r = Vec2::new(0.9, 0.2);
        let v = Vec2::new(-0.3, 1.1);
        let a = acceleration(r, mu);

        let (r1, v1, a1) = step(r, v, a, dt, mu);
        let (r2, _, _) = step(r1, v1, a1, -dt, mu);

        assert!((r2 - r).norm() < 1e-9);
    }
}
