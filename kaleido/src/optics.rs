use nalgebra::Unit;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    material::{MaterialRegistry, OpticsError},
    ray::Ray,
    surface::Surface,
    Float, Vec3,
};

/// Per-run physics switch scaling the effective reflectance of every
/// bounce uniformly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhysicsMode {
    #[default]
    Dry,
    /// Moisture-enhanced specular response: effective reflectance is
    /// multiplied by 1.1, capped at 1.
    Wet,
}

/// Reflectance gain applied per bounce in [`PhysicsMode::Wet`].
const WET_GAIN: Float = 1.1;

/// When `|normal x e_x|` falls below this, the normal is nearly parallel
/// to the x axis and the tangent basis is built from the y axis instead.
const TANGENT_FALLBACK_EPS: Float = 0.1;

/// s- and p-polarized power reflectances at a dielectric interface.
///
/// `theta_i` is the incident angle in radians, measured from the normal;
/// callers must orient it into `[0, pi/2]` first (see [`Optics::reflect`]).
/// Returns `(1.0, 1.0)` under total internal reflection, i.e. whenever
/// `(n1 / n2) * sin(theta_i) > 1`.
#[must_use]
pub fn fresnel(n1: Float, n2: Float, theta_i: Float) -> (Float, Float) {
    let cos_i = theta_i.cos();

    let sin_t = (n1 / n2) * theta_i.sin();
    if sin_t > 1.0 {
        return (1.0, 1.0);
    }
    let cos_t = (1.0 - sin_t * sin_t).sqrt();

    let rs = ((n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t)).powi(2);
    let rp = ((n2 * cos_i - n1 * cos_t) / (n2 * cos_i + n1 * cos_t)).powi(2);

    (rs, rp)
}

/// Refracted direction through an interface, by the vector form of
/// Snell's law.
///
/// The normal is oriented against the incident direction, so either
/// orientation may be passed in. Returns `None` under total internal
/// reflection.
///
/// The trace loop is reflection-only and never calls this; it is part of
/// the engine's surface for transmissive materials.
#[must_use]
pub fn refract(
    n1: Float,
    n2: Float,
    incident: &Unit<Vec3>,
    normal: &Unit<Vec3>,
) -> Option<Unit<Vec3>> {
    let d = incident.as_ref();

    let mut n = *normal.as_ref();
    let mut cos_i = -d.dot(&n);
    if cos_i < 0.0 {
        n = -n;
        cos_i = -cos_i;
    }

    let ratio = n1 / n2;
    let discriminant = 1.0 - ratio * ratio * (1.0 - cos_i * cos_i);
    if discriminant < 0.0 {
        return None;
    }

    let refracted = ratio * d + (ratio * cos_i - discriminant.sqrt()) * n;
    Some(Unit::new_normalize(refracted))
}

/// The reflection engine of one simulation run: borrows the frozen
/// material registry and carries the run's physics mode.
#[derive(Clone, Copy, Debug)]
pub struct Optics<'a> {
    materials: &'a MaterialRegistry,
    mode: PhysicsMode,
}

impl<'a> Optics<'a> {
    #[inline]
    #[must_use]
    pub fn new(materials: &'a MaterialRegistry, mode: PhysicsMode) -> Self {
        Self { materials, mode }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> PhysicsMode {
        self.mode
    }

    /// Reflect `incident` off `surface`, producing the bounce ray.
    ///
    /// The new ray originates at `surface.point`, keeps the incident
    /// wavelength and polarization, and carries the attenuated intensity:
    /// Fresnel reflectance blended by the squared s/p polarization
    /// components, scaled by the material's base reflectance (and the wet
    /// gain, if active), then by spectral absorption
    /// `exp(-absorption * wavelength / 1000)`.
    ///
    /// A positive material roughness perturbs the specular direction by a
    /// normally-distributed amount drawn from `rng`; with zero roughness
    /// the result is fully deterministic.
    ///
    /// Neither input is modified. Fails only when the surface's material
    /// id is not registered.
    pub fn reflect(
        &self,
        incident: &Ray,
        surface: &Surface,
        rng: &mut (impl Rng + ?Sized),
    ) -> Result<Ray, OpticsError> {
        let material = self.materials.get(surface.material)?;

        // orient the normal to face the incident ray
        let d = incident.direction.as_ref();
        let mut normal = *surface.normal.as_ref();
        let mut cos_i = -d.dot(&normal);
        if cos_i < 0.0 {
            normal = -normal;
            cos_i = -cos_i;
        }

        let ideal = d - 2.0 * cos_i * normal;

        let direction = if material.roughness > 0.0 {
            let magnitude = Normal::new(0.0, material.roughness)
                .expect("scatter deviation must be a valid standard deviation")
                .sample(rng);

            let mut tangent1 = normal.cross(&Vec3::x());
            if tangent1.norm() < TANGENT_FALLBACK_EPS {
                tangent1 = normal.cross(&Vec3::y());
            }
            let tangent1 = tangent1.normalize();
            let tangent2 = normal.cross(&tangent1);

            let scattered = ideal
                + magnitude * tangent1 * rng.gen::<Float>()
                + magnitude * tangent2 * rng.gen::<Float>();
            Unit::new_normalize(scattered)
        } else {
            Unit::new_normalize(ideal)
        };

        let theta_i = cos_i.acos();
        // ambient side is air
        let (rs, rp) = fresnel(1.0, material.refractive_index, theta_i);

        let s = incident.polarization.s;
        let p = incident.polarization.p;
        let mut effective_reflectance = material.reflectance * (rs * s * s + rp * p * p);

        if self.mode == PhysicsMode::Wet {
            effective_reflectance = (effective_reflectance * WET_GAIN).min(1.0);
        }

        let absorption =
            (-material.absorption_coefficient * incident.wavelength / 1000.0).exp();

        Ok(Ray {
            origin: surface.point,
            direction,
            wavelength: incident.wavelength,
            intensity: incident.intensity * effective_reflectance * absorption,
            polarization: incident.polarization,
        })
    }
}
