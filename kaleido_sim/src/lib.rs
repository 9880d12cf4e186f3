//! Simulation layer on top of the `kaleido` optics core.
//!
//! Turns a resolved scene configuration into concrete surfaces and
//! initial rays, runs the trace over every primary ray, and aggregates
//! the results (pattern, performance metrics, quality score) for the
//! caller to deliver or store.

pub mod config;
pub mod scene;
pub mod runner;

pub use config::{ConfigError, LightSource, SceneConfig, SourceKind};
pub use runner::{Performance, Simulation, SimulationOutcome};
pub use scene::{build_surfaces, initial_rays};
