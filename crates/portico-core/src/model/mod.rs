//! Domain model: project descriptors, platform stats, probe outcomes.

pub mod health;
pub mod project;
pub mod stats;

pub use health::{HealthCheck, ProbeReport, UnreachableCause};
pub use project::{ProjectDescriptor, ProjectMetadata, ProjectStatus};
pub use stats::AggregateStats;
