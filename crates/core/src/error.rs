//! Error types for the tidefield core.

use thiserror::Error;

/// Errors produced by field, config and lifecycle operations.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A surface, viewport or image had a zero width or height.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A particle set was requested with no particles.
    #[error("invalid particle count: at least one particle is required")]
    InvalidParticleCount,

    /// A configuration value was outside its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A requested parameter name was not found in the params object.
    #[error("parameter not found: {0}")]
    ParamNotFound(String),

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A theme name was neither `light` nor `dark`.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// A renderer failed to draw or resize.
    #[error("render error: {0}")]
    Render(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),
}
