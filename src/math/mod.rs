use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Immutable 2D vector over `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise multiplication by a scalar.
    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Vec2::new(self.x * k, self.y * k)
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn norm_squared(self) -> f64 {
        self.dot(self)
    }

    /// Euclidean norm. Never negative, but may be a tiny positive value
    /// rather than exactly zero; callers compare against an epsilon.
    #[inline]
    pub fn norm(self) -> f64 {
        self.norm_squared().sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, k: f64) -> Vec2 {
        self.scale(k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        self.scale(-1.0)
    }
}

/// z-component of the 3D cross product of two planar vectors. With
/// `a = position` and `b = velocity` this is the specific angular momentum.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn addition_commutes() {
        let a = Vec2::new(1.5, -2.0);
        let b = Vec2::new(-0.25, 4.0);
        assert_eq!(a + b, b + a);
    }

    #[test]
    fn scaling_composes() {
        let a = Vec2::new(0.3, -0.7);
        let once = a.scale(2.5).scale(-4.0);
        let combined = a.scale(2.5 * -4.0);
        assert!((once.x - combined.x).abs() < TOL);
        assert!((once.y - combined.y).abs() < TOL);
    }

    #[test]
    fn dot_is_symmetric() {
        let a = Vec2::new(3.0, 1.0);
        let b = Vec2::new(-2.0, 0.5);
        assert!((a.dot(b) - b.dot(a)).abs() < TOL);
    }

    #[test]
    fn norm_is_non_negative_and_homogeneous() {
        let a = Vec2::new(-3.0, 4.0);
        assert!(Vec2::ZERO.norm() >= 0.0);
        assert!((a.norm() - 5.0).abs() < TOL);
        for k in [-2.5, 0.0, 0.125] {
            assert!((a.scale(k).norm() - k.abs() * a.norm()).abs() < TOL);
        }
    }

    #[test]
    fn cross_product_sign() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert!(cross(a, b) > 0.0);
        assert!(cross(b, a) < 0.0);
        assert!((cross(a, a)).abs() < TOL);
    }
}
