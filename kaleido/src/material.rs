use core::fmt;
use std::collections::HashMap;

use thiserror::Error;

use crate::{surface::Surface, Float};

/// Optical properties of a mirror coating.
///
/// Immutable once loaded for a simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// Base fraction of incident power reflected, in `[0, 1]`.
    pub reflectance: Float,
    /// Spectral dispersion, `>= 0`. Carried through configuration but not
    /// read by the reflection model.
    pub dispersion: Float,
    /// Standard deviation of the scatter applied to the specular
    /// direction, `>= 0`. Zero means a perfectly smooth mirror.
    pub roughness: Float,
    /// Refractive index, `> 0`, used for the Fresnel coefficients.
    pub refractive_index: Float,
    /// Wavelength-dependent absorption strength, `>= 0`.
    pub absorption_coefficient: Float,
}

/// Identifier a [`Surface`] uses to reference its material in a
/// [`MaterialRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors surfaced by the optics core.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OpticsError {
    /// A surface referenced a material id absent from the registry.
    /// This is a configuration error; the affected ray's trace aborts.
    #[error("no material registered under id {0}")]
    MaterialNotFound(MaterialId),
}

/// The materials available to one simulation run, keyed by id.
///
/// Populated before tracing starts and read-only thereafter. Validating
/// the registry against the surface set up front guarantees that lookups
/// during a trace never miss.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialRegistry {
    materials: HashMap<MaterialId, Material>,
}

impl MaterialRegistry {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `material` under `id`, overwriting any previous entry.
    #[inline]
    pub fn add(&mut self, id: MaterialId, material: Material) {
        self.materials.insert(id, material);
    }

    /// Look up the material registered under `id`.
    #[inline]
    pub fn get(&self, id: MaterialId) -> Result<&Material, OpticsError> {
        self.materials
            .get(&id)
            .ok_or(OpticsError::MaterialNotFound(id))
    }

    /// Check that every surface's material id resolves, so later lookups
    /// cannot fail mid-trace.
    pub fn validate(&self, surfaces: &[Surface]) -> Result<(), OpticsError> {
        surfaces
            .iter()
            .try_for_each(|surface| self.get(surface.material).map(|_| ()))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate over `(id, material)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().map(|(id, material)| (*id, material))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Vec3;

    pub(crate) fn silver() -> Material {
        Material {
            name: "Silver Mirror".into(),
            reflectance: 0.95,
            dispersion: 1.0,
            roughness: 0.02,
            refractive_index: 0.05,
            absorption_coefficient: 0.001,
        }
    }

    #[test]
    fn add_then_get() {
        let mut registry = MaterialRegistry::new();
        registry.add(MaterialId(1), silver());
        assert_eq!(registry.get(MaterialId(1)).unwrap().name, "Silver Mirror");
    }

    #[test]
    fn get_missing_id_fails() {
        let registry = MaterialRegistry::new();
        assert_eq!(
            registry.get(MaterialId(9)),
            Err(OpticsError::MaterialNotFound(MaterialId(9)))
        );
    }

    #[test]
    fn add_overwrites() {
        let mut registry = MaterialRegistry::new();
        registry.add(MaterialId(1), silver());
        let mut dull = silver();
        dull.reflectance = 0.2;
        registry.add(MaterialId(1), dull);
        assert_eq!(registry.len(), 1);
        assert!((registry.get(MaterialId(1)).unwrap().reflectance - 0.2).abs() < 1e-12);
    }

    #[test]
    fn validate_catches_unassigned_materials() {
        let mut registry = MaterialRegistry::new();
        registry.add(MaterialId(1), silver());

        let known = Surface::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), MaterialId(1));
        let unknown = Surface::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0), MaterialId(2));

        assert!(registry.validate(&[known]).is_ok());
        assert_eq!(
            registry.validate(&[known, unknown]),
            Err(OpticsError::MaterialNotFound(MaterialId(2)))
        );
    }
}
