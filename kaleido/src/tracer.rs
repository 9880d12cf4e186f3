use rand::Rng;

use crate::{
    material::OpticsError,
    optics::Optics,
    ray::Ray,
    surface::Surface,
    Float,
};

/// The bounce sequence of one primary ray, in chronological order.
///
/// The first element is the initial ray; each subsequent element is the
/// reflection of the previous one. Never longer than `max_bounces + 1`.
pub type RayPath = Vec<Ray>;

/// A reflected ray dimmer than this is extinguished and ends its path.
pub const MIN_INTENSITY: Float = 0.01;

/// Rays and planes closer to parallel than this do not intersect.
const PARALLEL_EPS: Float = 1e-6;

/// Minimum travel distance before a hit counts, so a ray does not
/// re-intersect the surface it just bounced off.
const MIN_TRAVEL: Float = 1e-6;

/// Distance along `ray` to the mirror plane of `surface`.
///
/// Returns `None` when the ray is parallel to the plane, or when the
/// intersection lies behind (or indistinguishably close to) the origin.
#[must_use]
pub fn intersect(ray: &Ray, surface: &Surface) -> Option<Float> {
    let denominator = ray.direction.dot(surface.normal.as_ref());
    if denominator.abs() < PARALLEL_EPS {
        return None;
    }

    let t = surface.normal.dot(&(surface.point - ray.origin)) / denominator;
    (t >= MIN_TRAVEL).then_some(t)
}

/// The surface with the smallest positive intersection distance, ties
/// broken by iteration order.
fn closest_hit<'s>(ray: &Ray, surfaces: &'s [Surface]) -> Option<(Float, &'s Surface)> {
    let mut closest: Option<(Float, &Surface)> = None;

    for surface in surfaces {
        if let Some(distance) = intersect(ray, surface) {
            if closest.map_or(true, |(t, _)| distance < t) {
                closest = Some((distance, surface));
            }
        }
    }

    closest
}

/// Trace `initial` through the cavity for up to `max_bounces`
/// reflections.
///
/// Each iteration reflects the current ray off the nearest surface in
/// front of it; the reflection happens on a copy of that surface anchored
/// at the intersection point. The path ends when the ray escapes the
/// cavity (no intersection), when a reflection drops below
/// [`MIN_INTENSITY`] (the extinguished ray is still recorded), or when
/// `max_bounces` is reached. All three are normal termination.
///
/// Fails only if a surface references an unregistered material, which
/// aborts this ray's path alone.
pub fn trace(
    initial: Ray,
    surfaces: &[Surface],
    max_bounces: usize,
    optics: &Optics<'_>,
    rng: &mut (impl Rng + ?Sized),
) -> Result<RayPath, OpticsError> {
    let mut path = vec![initial];
    let mut current = initial;

    for _ in 0..max_bounces {
        let Some((distance, surface)) = closest_hit(&current, surfaces) else {
            // escaped the cavity
            break;
        };

        let hit = surface.anchored_at(current.at(distance));
        let reflected = optics.reflect(&current, &hit, rng)?;

        path.push(reflected);
        if reflected.intensity < MIN_INTENSITY {
            // extinguished
            break;
        }
        current = reflected;
    }

    Ok(path)
}
