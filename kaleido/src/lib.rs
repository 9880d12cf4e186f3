//! Core geometric-optics engine of the kaleidoscope simulator.
//!
//! Casts rays inside a cavity of planar mirror surfaces and follows them
//! through multiple reflections. Each bounce applies Fresnel reflectance,
//! polarization-weighted mixing, roughness scatter and spectral absorption;
//! the resulting bounce sequences are projected onto an observation plane
//! to form the visible pattern.
//!
//! Everything here is pure computation over frozen inputs: the material
//! registry and the surface set are established once per run and read-only
//! while tracing. Randomness (roughness scatter) always comes from an
//! `rng` parameter passed in by the caller.

pub use nalgebra;

pub mod material;
pub mod optics;
pub mod pattern;
pub mod ray;
pub mod spectrum;
pub mod surface;
pub mod tracer;

pub use material::{Material, MaterialId, MaterialRegistry, OpticsError};
pub use optics::{fresnel, refract, Optics, PhysicsMode};
pub use pattern::{project_to_pattern, Pattern, PatternBounds, PatternPoint};
pub use ray::{Polarization, Ray};
pub use spectrum::wavelength_to_rgb;
pub use surface::Surface;
pub use tracer::{intersect, trace, RayPath, MIN_INTENSITY};

pub type Float = f64;

/// 3-dimensional vector of [`Float`]s.
pub type Vec3 = nalgebra::Vector3<Float>;
