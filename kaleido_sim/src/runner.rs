use std::time::Instant;

use rand::Rng;

use kaleido::{
    project_to_pattern, trace, Float, Optics, Pattern, RayPath, Surface,
};

use crate::{
    config::{ConfigError, SceneConfig},
    scene,
};

/// Aggregate metrics of one simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Performance {
    /// Total rays across all paths, bounces included.
    pub ray_count: usize,
    /// Wall-clock seconds spent building and tracing.
    pub computation_time: Float,
    pub initial_ray_count: usize,
    /// Mean path length per primary ray.
    pub avg_bounces: Float,
    /// Sum of the intensity of every ray in every path.
    pub total_intensity: Float,
    /// See [`Performance::quality_score`].
    pub quality_score: Float,
}

impl Performance {
    fn gather(paths: &[RayPath], initial_ray_count: usize, computation_time: Float) -> Self {
        let ray_count: usize = paths.iter().map(Vec::len).sum();
        let total_intensity: Float = paths
            .iter()
            .flatten()
            .map(|ray| ray.intensity)
            .sum();
        let avg_bounces = if initial_ray_count == 0 {
            0.0
        } else {
            ray_count as Float / initial_ray_count as Float
        };

        let mut performance = Self {
            ray_count,
            computation_time,
            initial_ray_count,
            avg_bounces,
            total_intensity,
            quality_score: 0.0,
        };
        performance.quality_score = performance.quality_score();
        performance
    }

    /// Blend of ray yield, speed and retained intensity: the mean of
    /// `ray_count / 1000`, `1 - computation_time / 10` and
    /// `total_intensity / initial_ray_count * 10`, each clamped to
    /// `[0, 1]` before averaging.
    #[must_use]
    pub fn quality_score(&self) -> Float {
        let ray_score = (self.ray_count as Float / 1000.0).clamp(0.0, 1.0);
        let time_score = (1.0 - self.computation_time / 10.0).clamp(0.0, 1.0);
        let intensity_score = if self.initial_ray_count == 0 {
            0.0
        } else {
            (self.total_intensity / self.initial_ray_count as Float * 10.0).clamp(0.0, 1.0)
        };

        (ray_score + time_score + intensity_score) / 3.0
    }
}

/// Everything a run hands back to the caller.
#[derive(Clone, Debug)]
pub struct SimulationOutcome {
    pub ray_paths: Vec<RayPath>,
    pub surfaces: Vec<Surface>,
    pub pattern: Pattern,
    pub performance: Performance,
}

/// One simulation run: configuration and cavity geometry frozen at
/// construction, shared by every trace.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SceneConfig,
    surfaces: Vec<Surface>,
}

impl Simulation {
    /// Freeze `config` for a run.
    ///
    /// Builds the cavity surfaces and resolves every material assignment
    /// up front, so traces cannot fail a lookup mid-flight.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let surfaces = scene::build_surfaces(&config);
        config.materials.validate(&surfaces)?;

        Ok(Self { config, surfaces })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Cast `num_rays` primary rays and trace each through the cavity.
    ///
    /// Every primary ray's bounce sequence is sequential, but rays are
    /// independent of each other; the registry and surfaces stay frozen
    /// for the whole batch.
    pub fn run(
        &self,
        num_rays: usize,
        max_bounces: usize,
        rng: &mut (impl Rng + ?Sized),
    ) -> Result<SimulationOutcome, ConfigError> {
        let started = Instant::now();

        let optics = Optics::new(&self.config.materials, self.config.physics_mode);
        let initial = scene::initial_rays(&self.config, num_rays, rng);
        let initial_ray_count = initial.len();

        let ray_paths = initial
            .into_iter()
            .map(|ray| trace(ray, &self.surfaces, max_bounces, &optics, rng))
            .collect::<Result<Vec<_>, _>>()?;

        let pattern = project_to_pattern(&ray_paths);
        let performance = Performance::gather(
            &ray_paths,
            initial_ray_count,
            started.elapsed().as_secs_f64(),
        );

        log::debug!(
            "traced {} primary rays into {} path entries in {:.3}s",
            initial_ray_count,
            performance.ray_count,
            performance.computation_time,
        );

        Ok(SimulationOutcome {
            ray_paths,
            surfaces: self.surfaces.clone(),
            pattern,
            performance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::triangle_config;
    use kaleido::MaterialId;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn unresolved_material_fails_at_construction() {
        let mut config = triangle_config();
        config.material_ids = vec![MaterialId(9)];
        assert!(matches!(
            Simulation::new(config),
            Err(ConfigError::Optics(_))
        ));
    }

    #[test]
    fn triangular_cavity_end_to_end() {
        let simulation = Simulation::new(triangle_config()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let outcome = simulation.run(20, 5, &mut rng).unwrap();
        assert_eq!(outcome.performance.initial_ray_count, 20);
        assert_eq!(outcome.ray_paths.len(), 20);
        assert_eq!(outcome.surfaces.len(), 3);

        // rays bounce at least once off the high-reflectance mirrors, and
        // every bounce strictly dims the ray
        assert!(outcome.ray_paths.iter().any(|path| path.len() > 1));
        for path in &outcome.ray_paths {
            assert!(path.len() <= 6);
            for pair in path.windows(2) {
                assert!(pair[1].intensity < pair[0].intensity);
            }
        }
    }

    #[test]
    fn metrics_are_consistent_with_the_paths() {
        let simulation = Simulation::new(triangle_config()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = simulation.run(10, 4, &mut rng).unwrap();
        let performance = outcome.performance;

        let ray_count: usize = outcome.ray_paths.iter().map(Vec::len).sum();
        assert_eq!(performance.ray_count, ray_count);
        assert!(
            (performance.avg_bounces - ray_count as Float / 10.0).abs() < 1e-12
        );

        let total: Float = outcome
            .ray_paths
            .iter()
            .flatten()
            .map(|ray| ray.intensity)
            .sum();
        assert!((performance.total_intensity - total).abs() < 1e-9);

        assert!((0.0..=1.0).contains(&performance.quality_score));
        assert!((performance.quality_score - performance.quality_score()).abs() < 1e-12);
    }

    #[test]
    fn deterministic_under_a_fixed_seed() {
        let simulation = Simulation::new(triangle_config()).unwrap();

        let mut first_rng = StdRng::seed_from_u64(11);
        let mut second_rng = StdRng::seed_from_u64(11);
        let first = simulation.run(8, 5, &mut first_rng).unwrap();
        let second = simulation.run(8, 5, &mut second_rng).unwrap();

        assert_eq!(first.ray_paths, second.ray_paths);
        assert_eq!(first.pattern, second.pattern);
    }
}
