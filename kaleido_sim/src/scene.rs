use core::f64::consts::{FRAC_PI_3, TAU};

use rand::Rng;

use kaleido::{Float, Ray, Surface, Vec3};

use crate::config::SceneConfig;

/// Radius of the circle the mirror faces sit on.
const CAVITY_RADIUS: Float = 1.0;

/// Half-angle of the emission cone around the downward axis.
const CONE_HALF_ANGLE: Float = FRAC_PI_3;

/// Synthesize the cavity geometry: `mirror_count` planar mirrors evenly
/// spaced around the unit circle, normals facing the axis.
#[must_use]
pub fn build_surfaces(config: &SceneConfig) -> Vec<Surface> {
    (0..config.mirror_count)
        .map(|i| {
            let angle = TAU * i as Float / config.mirror_count as Float;
            let (sin, cos) = angle.sin_cos();

            let point = Vec3::new(CAVITY_RADIUS * cos, CAVITY_RADIUS * sin, 0.0);
            let normal = Vec3::new(-cos, -sin, 0.0);

            // faces beyond the assignment list reuse the first material
            let material = *config
                .material_ids
                .get(i)
                .unwrap_or(&config.material_ids[0]);

            Surface::new(point, normal, material)
        })
        .collect()
}

/// Generate the initial rays for every light source.
///
/// Each source emits `num_rays / source_count` rays; a remainder that
/// does not divide evenly is dropped. Directions are sampled inside a
/// 60-degree cone pointed down the cavity axis, and the source intensity
/// is split evenly across its rays.
#[must_use]
pub fn initial_rays(
    config: &SceneConfig,
    num_rays: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Vec<Ray> {
    let source_count = config.light_sources.len();
    if source_count == 0 {
        return Vec::new();
    }

    let rays_per_source = num_rays / source_count;
    let dropped = num_rays - rays_per_source * source_count;
    if dropped > 0 {
        log::debug!("{num_rays} rays do not divide across {source_count} sources, dropping {dropped}");
    }

    let mut rays = Vec::with_capacity(rays_per_source * source_count);
    for source in &config.light_sources {
        for _ in 0..rays_per_source {
            let theta = rng.gen_range(0.0..CONE_HALF_ANGLE);
            let phi = rng.gen_range(0.0..TAU);

            let direction = Vec3::new(
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                -theta.cos(),
            );

            rays.push(Ray::new(
                source.position,
                direction,
                source.wavelength,
                source.intensity / rays_per_source as Float,
            ));
        }
    }

    rays
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::triangle_config;
    use crate::config::{LightSource, SourceKind};
    use kaleido::MaterialId;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn surfaces_sit_on_the_unit_circle_facing_inward() {
        let surfaces = build_surfaces(&triangle_config());
        assert_eq!(surfaces.len(), 3);

        for surface in &surfaces {
            assert!((surface.point.norm() - 1.0).abs() < 1e-12);
            assert!((surface.normal.norm() - 1.0).abs() < 1e-6);
            // the normal points straight back at the axis
            assert!((surface.normal.dot(&surface.point) + 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn short_material_assignment_falls_back_to_the_first_entry() {
        let mut config = triangle_config();
        config.mirror_count = 4;
        config.material_ids = vec![MaterialId(1), MaterialId(2)];

        let surfaces = build_surfaces(&config);
        let ids: Vec<_> = surfaces.iter().map(|s| s.material).collect();
        assert_eq!(
            ids,
            vec![MaterialId(1), MaterialId(2), MaterialId(1), MaterialId(1)]
        );
    }

    #[test]
    fn rays_split_evenly_across_sources_dropping_the_remainder() {
        let mut config = triangle_config();
        let second = LightSource {
            wavelength: 650.0,
            intensity: 0.5,
            position: Vec3::new(0.1, 0.0, 1.0),
            kind: SourceKind::Directional,
        };
        config.light_sources.push(second);

        let mut rng = StdRng::seed_from_u64(0);
        let rays = initial_rays(&config, 7, &mut rng);
        // 7 / 2 = 3 per source, one ray dropped
        assert_eq!(rays.len(), 6);

        assert!(rays[..3].iter().all(|r| r.wavelength == 550.0));
        assert!(rays[3..].iter().all(|r| r.wavelength == 650.0));
        for ray in &rays[..3] {
            assert!((ray.intensity - 1.0 / 3.0).abs() < 1e-12);
        }
        for ray in &rays[3..] {
            assert!((ray.intensity - 0.5 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ray_directions_stay_inside_the_downward_cone() {
        let config = triangle_config();
        let mut rng = StdRng::seed_from_u64(1);
        let rays = initial_rays(&config, 200, &mut rng);
        assert_eq!(rays.len(), 200);

        for ray in &rays {
            assert!((ray.direction.norm() - 1.0).abs() < 1e-6);
            // within 60 degrees of straight down
            assert!(ray.direction.z <= -CONE_HALF_ANGLE.cos() + 1e-12);
        }
    }
}
