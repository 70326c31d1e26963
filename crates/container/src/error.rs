//! Container error types.

use thiserror::Error;

/// Errors raised while resolving services.
///
/// All of these are wiring mistakes made at bootstrap, so callers are
/// expected to propagate them rather than recover.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// No definition or delegate provides the identifier.
    #[error("Service not found: {0}")]
    NotFound(String),

    /// Resolving the identifier requires resolving itself.
    #[error("Circular dependency while resolving '{id}': {}", .path.join(" -> "))]
    CircularDependency { id: String, path: Vec<String> },

    /// The resolved instance is not of the requested type.
    #[error("Service '{id}' is not a {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    /// A factory asked for a constructor argument that was never declared.
    #[error("Service '{id}' has no constructor argument at index {index}")]
    MissingArgument { id: String, index: usize },
}

/// Convenience type alias for container results.
pub type Result<T> = std::result::Result<T, ContainerError>;
