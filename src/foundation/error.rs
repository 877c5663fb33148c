/// Convenience result type used across rings.
pub type RingsResult<T> = Result<T, RingsError>;

/// Top-level error taxonomy used by the rasterizer, cache and view APIs.
#[derive(thiserror::Error, Debug)]
pub enum RingsError {
    /// Invalid caller-provided data (sizes, colors, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// The text shaper could not measure or outline a string.
    #[error("measurement error: {0}")]
    Measurement(String),

    /// A drawing primitive failed on the target surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while loading or interpreting a ring configuration document.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RingsError {
    /// Build a [`RingsError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RingsError::Measurement`] value.
    pub fn measurement(msg: impl Into<String>) -> Self {
        Self::Measurement(msg.into())
    }

    /// Build a [`RingsError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RingsError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
