use thiserror::Error;

use kaleido::{Float, MaterialId, MaterialRegistry, OpticsError, PhysicsMode, Vec3};

/// Kind of light source. Informational: the ray generator treats every
/// kind the same way, but the kind travels with the configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    #[default]
    Point,
    Directional,
    Area,
}

/// A light source feeding rays into the cavity.
#[derive(Clone, Debug, PartialEq)]
pub struct LightSource {
    /// Wavelength of the emitted rays, in nanometers.
    pub wavelength: Float,
    /// Total intensity, divided evenly among the source's rays.
    pub intensity: Float,
    pub position: Vec3,
    pub kind: SourceKind,
}

/// A resolved kaleidoscope configuration: everything needed to build a
/// scene and run it. The caller (persistence boundary) assembles this
/// from stored data; a missing configuration or material is its error to
/// report.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub name: String,
    /// Number of mirror faces around the cavity axis.
    pub mirror_count: usize,
    /// Apex angles between adjacent mirrors, in degrees. Informational;
    /// the trace itself never reads them.
    pub mirror_angles: Vec<Float>,
    /// Material assigned to each mirror face. When shorter than
    /// `mirror_count`, remaining faces use the first entry.
    pub material_ids: Vec<MaterialId>,
    pub physics_mode: PhysicsMode,
    pub light_sources: Vec<LightSource>,
    /// The materials resolved for this run.
    pub materials: MaterialRegistry,
}

/// Errors raised while validating a configuration for a run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Optics(#[from] OpticsError),
    #[error("configuration needs at least one mirror")]
    NoMirrors,
    #[error("configuration assigns no materials to its mirrors")]
    NoMaterialAssignment,
    #[error("configuration has no light sources")]
    NoLightSources,
}

impl SceneConfig {
    /// Structural checks that do not depend on the synthesized surfaces.
    /// Material resolution is checked separately, against the built
    /// scene, by [`crate::Simulation::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mirror_count == 0 {
            return Err(ConfigError::NoMirrors);
        }
        if self.material_ids.is_empty() {
            return Err(ConfigError::NoMaterialAssignment);
        }
        if self.light_sources.is_empty() {
            return Err(ConfigError::NoLightSources);
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use kaleido::Material;

    /// Three silver mirrors, one green point source overhead.
    pub(crate) fn triangle_config() -> SceneConfig {
        let mut materials = MaterialRegistry::new();
        materials.add(
            MaterialId(1),
            Material {
                name: "Silver Mirror".into(),
                reflectance: 0.95,
                dispersion: 1.0,
                roughness: 0.02,
                refractive_index: 0.05,
                absorption_coefficient: 0.001,
            },
        );

        SceneConfig {
            name: "Default Triangle".into(),
            mirror_count: 3,
            mirror_angles: vec![60.0, 60.0, 60.0],
            material_ids: vec![MaterialId(1), MaterialId(1), MaterialId(1)],
            physics_mode: PhysicsMode::Dry,
            light_sources: vec![LightSource {
                wavelength: 550.0,
                intensity: 1.0,
                position: Vec3::new(0.0, 0.0, 1.0),
                kind: SourceKind::Point,
            }],
            materials,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(triangle_config().validate().is_ok());
    }

    #[test]
    fn structural_defects_are_reported() {
        let mut config = triangle_config();
        config.mirror_count = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoMirrors));

        let mut config = triangle_config();
        config.material_ids.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoMaterialAssignment));

        let mut config = triangle_config();
        config.light_sources.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoLightSources));
    }
}
