/// Particle effect description.
pub mod model;
