/// Convenience result type used across thumbforge.
pub type ThumbResult<T> = Result<T, ThumbError>;

/// Error taxonomy for the compositing engine.
#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    /// Malformed or undecodable raster input.
    #[error("decode error: {0}")]
    Decode(String),

    /// Placement contract violations (non-positive canvas or cutout dimensions).
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Blur, silhouette or mask synthesis failed on a degenerate raster.
    #[error("effect synthesis error: {0}")]
    EffectSynthesis(String),

    /// Layer stack assembly or flattening failed.
    #[error("compositing error: {0}")]
    Compositing(String),

    /// Invalid caller-provided options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing scene or option data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    /// Build a [`ThumbError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ThumbError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`ThumbError::EffectSynthesis`] value.
    pub fn effect(msg: impl Into<String>) -> Self {
        Self::EffectSynthesis(msg.into())
    }

    /// Build a [`ThumbError::Compositing`] value.
    pub fn compositing(msg: impl Into<String>) -> Self {
        Self::Compositing(msg.into())
    }

    /// Build a [`ThumbError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ThumbError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
