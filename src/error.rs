//! Error types for icosphere planet generation

use std::fmt;

/// Errors that can occur during planet generation or queries
#[derive(Debug, Clone)]
pub enum PlanetError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// Generation failed due to geometry issues
    GenerationFailed(String),
}

impl fmt::Display for PlanetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanetError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            PlanetError::GenerationFailed(msg) => write!(f, "generation failed: {}", msg),
        }
    }
}

impl std::error::Error for PlanetError {}

/// Result type alias for planet operations
pub type Result<T> = std::result::Result<T, PlanetError>;
