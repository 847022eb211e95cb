use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::math::{cross, Vec2};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrbitalElements {
    pub specific_energy: f64,
    pub specific_angular_momentum: f64,
    pub eccentricity: f64,
}

/// Kinetic plus potential energy per unit mass, `0.5*|v|^2 - mu/|r|`.
/// Constant for an unperturbed two-body orbit.
pub fn specific_energy(position: Vec2, velocity: Vec2, mu: f64) -> f64 {
    0.5 * velocity.norm_squared() - mu / position.norm()
}

/// Signed planar angular momentum per unit mass, `r.x*v.y - r.y*v.x`.
/// Conserved for any central force.
pub fn specific_angular_momentum(position: Vec2, velocity: Vec2) -> f64 {
    cross(position, velocity)
}

pub fn compute_orbital_elements(
    position: Vec2,
    velocity: Vec2,
    mu: f64,
) -> Result<OrbitalElements> {
    let radius = position.norm();
    if !radius.is_finite() || radius <= 0.0 {
        return Err(anyhow!(
            "Invalid radius {:.6} for orbital element calculation",
            radius
        ));
    }

    let energy = specific_energy(position, velocity, mu);
    let momentum = specific_angular_momentum(position, velocity);

    let ecc_argument = 1.0 + (2.0 * energy * momentum * momentum) / (mu * mu);
    let eccentricity = if ecc_argument < 0.0 {
        0.0
    } else {
        ecc_argument.sqrt()
    };

    Ok(OrbitalElements {
        specific_energy: energy,
        specific_angular_momentum: momentum,
        eccentricity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_orbit_elements() {
        let elements =
            compute_orbital_elements(Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), 1.0).unwrap();
        assert!((elements.specific_energy + 0.5).abs() < 1e-12);
        assert!((elements.specific_angular_momentum - 1.0).abs() < 1e-12);
        assert!(elements.eccentricity < 1e-6);
    }

    #[test]
    fn angular_momentum_is_signed() {
        let retrograde = specific_angular_momentum(Vec2::new(1.0, 0.0), Vec2::new(0.0, -1.0));
        assert!(retrograde < 0.0);
    }

    #[test]
    fn rejects_degenerate_radius() {
        assert!(compute_orbital_elements(Vec2::ZERO, Vec2::new(0.0, 1.0), 1.0).is_err());
    }
}
