//! Controller construction errors

/// An invalid tuning value found while validating [`ControllerConfig`].
///
/// [`ControllerConfig`]: crate::ControllerConfig
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Errors that can occur while assembling a controller
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    #[error("invalid controller configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
