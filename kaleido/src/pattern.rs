use crate::{spectrum::wavelength_to_rgb, tracer::RayPath, Float, Ray};

/// Projection of one ray onto the observation plane `z = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternPoint {
    pub x: Float,
    pub y: Float,
    pub intensity: Float,
    pub rgb: [Float; 3],
    pub wavelength: Float,
}

/// Axis-aligned bounds of a projected pattern. All zero when the pattern
/// is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatternBounds {
    pub min_x: Float,
    pub max_x: Float,
    pub min_y: Float,
    pub max_y: Float,
}

/// The projected kaleidoscope pattern: the visualization payload handed
/// back to the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    pub points: Vec<PatternPoint>,
    pub bounds: PatternBounds,
}

/// Project every ray of every path onto the observation plane.
///
/// A ray contributes a point when its direction has a nonzero z component
/// and its forward half-line (`t > 0`) crosses `z = 0`; the point carries
/// the ray's intensity, wavelength and mapped color.
#[must_use]
pub fn project_to_pattern<'a>(paths: impl IntoIterator<Item = &'a RayPath>) -> Pattern {
    let points: Vec<_> = paths
        .into_iter()
        .flatten()
        .filter_map(project_ray)
        .collect();
    let bounds = bounds_of(&points);

    Pattern { points, bounds }
}

fn project_ray(ray: &Ray) -> Option<PatternPoint> {
    let dz = ray.direction.z;
    if dz == 0.0 {
        return None;
    }

    let t = -ray.origin.z / dz;
    if t <= 0.0 {
        return None;
    }

    let crossing = ray.at(t);
    Some(PatternPoint {
        x: crossing.x,
        y: crossing.y,
        intensity: ray.intensity,
        rgb: wavelength_to_rgb(ray.wavelength),
        wavelength: ray.wavelength,
    })
}

fn bounds_of(points: &[PatternPoint]) -> PatternBounds {
    let mut points = points.iter();
    let Some(first) = points.next() else {
        return PatternBounds::default();
    };

    points.fold(
        PatternBounds {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        },
        |bounds, p| PatternBounds {
            min_x: bounds.min_x.min(p.x),
            max_x: bounds.max_x.max(p.x),
            min_y: bounds.min_y.min(p.y),
            max_y: bounds.max_y.max(p.y),
        },
    )
}
