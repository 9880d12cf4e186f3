use nalgebra::Unit;

use crate::{Float, Vec3};

/// Polarization state of a ray, as `(s, p)` amplitude components.
///
/// The reflection engine weighs the Fresnel coefficients by the squared
/// components, so `(1, 0)` is pure s-polarization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polarization {
    pub s: Float,
    pub p: Float,
}

impl Default for Polarization {
    /// Pure s-polarization.
    #[inline]
    fn default() -> Self {
        Self { s: 1.0, p: 0.0 }
    }
}

/// A light ray: a half-line carrying spectral state.
///
/// Rays are immutable values. Reflecting one produces a new ray; the
/// incident ray is left untouched, so a bounce sequence retains every
/// generation it went through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line.
    pub origin: Vec3,
    /// The direction of the half-line, unit length by construction.
    pub direction: Unit<Vec3>,
    /// Wavelength in nanometers. Visible mapping covers roughly
    /// `[380, 750]`, but any positive value traces fine.
    pub wavelength: Float,
    /// Radiant intensity, non-negative, non-increasing along a path.
    pub intensity: Float,
    pub polarization: Polarization,
}

impl Ray {
    /// # Panics
    ///
    /// If `direction` is the zero vector.
    #[inline]
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3, wavelength: Float, intensity: Float) -> Self {
        Self::try_new(origin, direction, wavelength, intensity)
            .expect("ray direction must be non-zero")
    }

    /// Returns `None` if `direction` is the zero vector.
    #[inline]
    #[must_use]
    pub fn try_new(
        origin: Vec3,
        direction: Vec3,
        wavelength: Float,
        intensity: Float,
    ) -> Option<Self> {
        Unit::try_new(direction, Float::EPSILON).map(|direction| Self {
            origin,
            direction,
            wavelength,
            intensity,
            polarization: Polarization::default(),
        })
    }

    /// The same ray with a different polarization state.
    #[inline]
    #[must_use]
    pub fn with_polarization(mut self, polarization: Polarization) -> Self {
        self.polarization = polarization;
        self
    }

    /// The point at distance `t` (can be negative) from the ray's origin.
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vec3 {
        self.origin + self.direction.as_ref() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized_at_construction() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(3.0, 4.0, 0.0), 550.0, 1.0);
        assert!((ray.direction.norm() - 1.0).abs() < 1e-6);
        assert!((ray.direction.x - 0.6).abs() < 1e-12);
        assert!((ray.direction.y - 0.8).abs() < 1e-12);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::try_new(Vec3::zeros(), Vec3::zeros(), 550.0, 1.0).is_none());
    }

    #[test]
    fn default_polarization_is_pure_s() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0), 550.0, 1.0);
        assert_eq!(ray.polarization, Polarization { s: 1.0, p: 0.0 });
    }

    #[test]
    fn at_walks_along_the_direction() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -2.0), 550.0, 1.0);
        let p = ray.at(0.5);
        assert!((p - Vec3::new(0.0, 0.0, 0.5)).norm() < 1e-12);
    }
}
