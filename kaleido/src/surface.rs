use nalgebra::Unit;

use crate::{material::MaterialId, Float, Vec3};

/// One planar mirror face of the cavity.
///
/// The plane is anchored at `point` and oriented by `normal`. Surfaces are
/// immutable for the duration of a trace; together they form the fixed
/// cavity geometry of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    /// A point on the mirror plane.
    pub point: Vec3,
    /// Plane normal, unit length by construction.
    pub normal: Unit<Vec3>,
    pub material: MaterialId,
}

impl Surface {
    /// # Panics
    ///
    /// If `normal` is the zero vector.
    #[inline]
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3, material: MaterialId) -> Self {
        Self::try_new(point, normal, material).expect("surface normal must be non-zero")
    }

    /// Returns `None` if `normal` is the zero vector.
    #[inline]
    #[must_use]
    pub fn try_new(point: Vec3, normal: Vec3, material: MaterialId) -> Option<Self> {
        Unit::try_new(normal, Float::EPSILON).map(|normal| Self {
            point,
            normal,
            material,
        })
    }

    /// A copy of this surface anchored at `point` instead.
    ///
    /// The tracer uses this to carry the intersection point into the
    /// reflection, preserving the original normal and material.
    #[inline]
    #[must_use]
    pub fn anchored_at(&self, point: Vec3) -> Self {
        Self { point, ..*self }
    }
}
