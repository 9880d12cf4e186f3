//! JSON boundary of the kaleidoscope simulator.
//!
//! Configurations arrive from, and results return to, the persistence
//! and API collaborators as JSON documents. This crate maps those
//! documents onto the `kaleido`/`kaleido_sim` types; nothing here touches
//! the trace itself.

use std::error::Error;

use kaleido::{
    Float, Material, MaterialId, MaterialRegistry, Pattern, PatternBounds, PatternPoint,
    PhysicsMode, Ray, Surface, Vec3,
};
use kaleido_sim::{LightSource, Performance, SceneConfig, SimulationOutcome, SourceKind};

pub use serde_json;

/// Serialize into a JSON value.
pub trait JsonSer {
    fn to_json(&self) -> serde_json::Value;
}

/// Deserialize from a JSON value.
///
/// Returns an error if the value's format or contents are invalid.
pub trait JsonDes {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;
}

fn get<'j>(json: &'j serde_json::Value, field: &str) -> Result<&'j serde_json::Value, Box<dyn Error>> {
    json.get(field)
        .ok_or_else(|| format!("missing field {field:?}").into())
}

fn get_float(json: &serde_json::Value, field: &str) -> Result<Float, Box<dyn Error>> {
    get(json, field)?
        .as_f64()
        .ok_or_else(|| format!("field {field:?} must be a number").into())
}

fn get_vector(json: &serde_json::Value, field: &str) -> Result<Vec3, Box<dyn Error>> {
    let array = get(json, field)?
        .as_array()
        .filter(|array| array.len() == 3)
        .ok_or_else(|| format!("field {field:?} must be an array of 3 numbers"))?;

    let mut coords = [0.0; 3];
    for (coord, value) in coords.iter_mut().zip(array) {
        *coord = value
            .as_f64()
            .ok_or_else(|| format!("field {field:?} must contain numbers"))?;
    }
    Ok(Vec3::from(coords))
}

impl JsonSer for Material {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "reflectance": self.reflectance,
            "dispersion": self.dispersion,
            "roughness": self.roughness,
            "refractive_index": self.refractive_index,
            "absorption_coefficient": self.absorption_coefficient,
        })
    }
}

impl JsonDes for Material {
    /// Deserialize a material from a JSON object.
    ///
    /// The object must carry `name` (string) and the five numeric
    /// properties `reflectance`, `dispersion`, `roughness`,
    /// `refractive_index` and `absorption_coefficient`.
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            name: get(json, "name")?
                .as_str()
                .ok_or("material name must be a string")?
                .into(),
            reflectance: get_float(json, "reflectance")?,
            dispersion: get_float(json, "dispersion")?,
            roughness: get_float(json, "roughness")?,
            refractive_index: get_float(json, "refractive_index")?,
            absorption_coefficient: get_float(json, "absorption_coefficient")?,
        })
    }
}

impl JsonSer for PhysicsMode {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Dry => "dry",
            Self::Wet => "wet",
        }
        .into()
    }
}

impl JsonDes for PhysicsMode {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        match json.as_str() {
            Some("dry") => Ok(Self::Dry),
            Some("wet") => Ok(Self::Wet),
            _ => Err(r#"physics mode must be "dry" or "wet""#.into()),
        }
    }
}

impl JsonSer for SourceKind {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Point => "point",
            Self::Directional => "directional",
            Self::Area => "area",
        }
        .into()
    }
}

impl JsonDes for SourceKind {
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        match json.as_str() {
            Some("point") => Ok(Self::Point),
            Some("directional") => Ok(Self::Directional),
            Some("area") => Ok(Self::Area),
            _ => Err(r#"light source type must be "point", "directional" or "area""#.into()),
        }
    }
}

impl JsonSer for LightSource {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "wavelength": self.wavelength,
            "intensity": self.intensity,
            "position": self.position.as_slice(),
            "type": self.kind.to_json(),
        })
    }
}

impl JsonDes for LightSource {
    /// Deserialize a light source from a JSON object.
    ///
    /// ```json
    /// {
    ///     "wavelength": 550.0,
    ///     "intensity": 1.0,
    ///     "position": [0.0, 0.0, 1.0],
    ///     "type": "point"
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            wavelength: get_float(json, "wavelength")?,
            intensity: get_float(json, "intensity")?,
            position: get_vector(json, "position")?,
            kind: SourceKind::from_json(get(json, "type")?)?,
        })
    }
}

impl JsonSer for SceneConfig {
    fn to_json(&self) -> serde_json::Value {
        let materials: serde_json::Map<_, _> = self
            .materials
            .iter()
            .map(|(id, material)| (id.to_string(), material.to_json()))
            .collect();

        serde_json::json!({
            "name": self.name,
            "mirror_count": self.mirror_count,
            "mirror_angles": self.mirror_angles,
            "materials": materials,
            "material_ids": Vec::from_iter(self.material_ids.iter().map(|id| id.0)),
            "physics_mode": self.physics_mode.to_json(),
            "light_sources": Vec::from_iter(self.light_sources.iter().map(JsonSer::to_json)),
        })
    }
}

impl JsonDes for SceneConfig {
    /// Deserialize a resolved scene configuration from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "name": "Default Triangle",
    ///     "mirror_count": 3,
    ///     "mirror_angles": [60.0, 60.0, 60.0],
    ///     "materials": { "1": { /* see Material */ } },
    ///     "material_ids": [1, 1, 1],
    ///     "physics_mode": "dry",
    ///     "light_sources": [ /* see LightSource */ ]
    /// }
    /// ```
    fn from_json(json: &serde_json::Value) -> Result<Self, Box<dyn Error>> {
        let mut materials = MaterialRegistry::new();
        for (key, value) in get(json, "materials")?
            .as_object()
            .ok_or("materials must be an object keyed by id")?
        {
            let id = key
                .parse()
                .map_err(|_| format!("invalid material id {key:?}"))?;
            materials.add(MaterialId(id), Material::from_json(value)?);
        }

        let material_ids = get(json, "material_ids")?
            .as_array()
            .ok_or("material_ids must be an array")?
            .iter()
            .map(|value| {
                value
                    .as_u64()
                    .map(|id| MaterialId(id as u32))
                    .ok_or_else(|| "material ids must be integers".into())
            })
            .collect::<Result<_, Box<dyn Error>>>()?;

        let mirror_angles = get(json, "mirror_angles")?
            .as_array()
            .ok_or("mirror_angles must be an array")?
            .iter()
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| "mirror angles must be numbers".into())
            })
            .collect::<Result<_, Box<dyn Error>>>()?;

        Ok(Self {
            name: get(json, "name")?
                .as_str()
                .ok_or("configuration name must be a string")?
                .into(),
            mirror_count: get(json, "mirror_count")?
                .as_u64()
                .ok_or("mirror_count must be a positive integer")? as usize,
            mirror_angles,
            material_ids,
            physics_mode: PhysicsMode::from_json(get(json, "physics_mode")?)?,
            light_sources: map_json_array(get(json, "light_sources")?, LightSource::from_json)?,
            materials,
        })
    }
}

impl JsonSer for Ray {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "origin": self.origin.as_slice(),
            "direction": self.direction.as_ref().as_slice(),
            "wavelength": self.wavelength,
            "intensity": self.intensity,
            "polarization": [self.polarization.s, self.polarization.p],
        })
    }
}

impl JsonSer for Surface {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "point": self.point.as_slice(),
            "normal": self.normal.as_ref().as_slice(),
            "material_id": self.material.0,
        })
    }
}

impl JsonSer for PatternPoint {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "x": self.x,
            "y": self.y,
            "intensity": self.intensity,
            "rgb": self.rgb,
            "wavelength": self.wavelength,
        })
    }
}

impl JsonSer for PatternBounds {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "min_x": self.min_x,
            "max_x": self.max_x,
            "min_y": self.min_y,
            "max_y": self.max_y,
        })
    }
}

impl JsonSer for Pattern {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "points": Vec::from_iter(self.points.iter().map(JsonSer::to_json)),
            "bounds": self.bounds.to_json(),
        })
    }
}

impl JsonSer for Performance {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ray_count": self.ray_count,
            "computation_time": self.computation_time,
            "initial_ray_count": self.initial_ray_count,
            "avg_bounces": self.avg_bounces,
            "total_intensity": self.total_intensity,
            "quality_score": self.quality_score,
        })
    }
}

impl JsonSer for SimulationOutcome {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ray_paths": Vec::from_iter(
                self.ray_paths
                    .iter()
                    .map(|path| Vec::from_iter(path.iter().map(JsonSer::to_json))),
            ),
            "surfaces": Vec::from_iter(self.surfaces.iter().map(JsonSer::to_json)),
            "pattern": self.pattern.to_json(),
            "performance": self.performance.to_json(),
        })
    }
}

/// Apply `map` to every element of a JSON array, collecting the results.
pub fn map_json_array<C: FromIterator<T>, T>(
    json: &serde_json::Value,
    map: impl FnMut(&serde_json::Value) -> Result<T, Box<dyn Error>>,
) -> Result<C, Box<dyn Error>> {
    json.as_array()
        .ok_or("json value must be an array")?
        .iter()
        .map(map)
        .collect()
}

/// Deserialize a stored scene configuration.
pub fn deserialize_config(json: &serde_json::Value) -> Result<SceneConfig, Box<dyn Error>> {
    SceneConfig::from_json(json)
}

/// Serialize a finished run for the result sink.
pub fn serialize_outcome(outcome: &SimulationOutcome) -> serde_json::Value {
    outcome.to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_json() -> serde_json::Value {
        serde_json::json!({
            "name": "Default Triangle",
            "mirror_count": 3,
            "mirror_angles": [60.0, 60.0, 60.0],
            "materials": {
                "1": {
                    "name": "Silver Mirror",
                    "reflectance": 0.95,
                    "dispersion": 1.0,
                    "roughness": 0.02,
                    "refractive_index": 0.05,
                    "absorption_coefficient": 0.001
                }
            },
            "material_ids": [1, 1, 1],
            "physics_mode": "dry",
            "light_sources": [
                {
                    "wavelength": 550.0,
                    "intensity": 1.0,
                    "position": [0.0, 0.0, 1.0],
                    "type": "point"
                }
            ]
        })
    }

    #[test]
    fn config_deserializes() {
        let config = deserialize_config(&config_json()).unwrap();
        assert_eq!(config.name, "Default Triangle");
        assert_eq!(config.mirror_count, 3);
        assert_eq!(config.material_ids, vec![MaterialId(1); 3]);
        assert_eq!(config.physics_mode, PhysicsMode::Dry);
        assert_eq!(config.light_sources.len(), 1);
        assert_eq!(config.light_sources[0].kind, SourceKind::Point);
        assert!((config.materials.get(MaterialId(1)).unwrap().reflectance - 0.95).abs() < 1e-12);
    }

    #[test]
    fn config_round_trips() {
        let config = deserialize_config(&config_json()).unwrap();
        let restored = deserialize_config(&config.to_json()).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn missing_fields_are_reported() {
        let mut json = config_json();
        json.as_object_mut().unwrap().remove("light_sources");
        let error = deserialize_config(&json).unwrap_err();
        assert!(error.to_string().contains("light_sources"));
    }

    #[test]
    fn invalid_physics_mode_is_rejected() {
        let mut json = config_json();
        json["physics_mode"] = "damp".into();
        assert!(deserialize_config(&json).is_err());
    }

    #[test]
    fn outcome_serializes_every_section() {
        use kaleido_sim::Simulation;
        use rand::{rngs::StdRng, SeedableRng};

        let config = deserialize_config(&config_json()).unwrap();
        let simulation = Simulation::new(config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let outcome = simulation.run(6, 3, &mut rng).unwrap();

        let json = serialize_outcome(&outcome);
        assert_eq!(json["ray_paths"].as_array().unwrap().len(), 6);
        assert_eq!(json["surfaces"].as_array().unwrap().len(), 3);
        assert!(json["pattern"]["points"].is_array());
        assert_eq!(
            json["performance"]["initial_ray_count"].as_u64(),
            Some(6)
        );
    }
}
