/// Convenience result type used across sfxbake.
pub type SfxResult<T> = Result<T, SfxError>;

/// Top-level error taxonomy.
///
/// Every variant except [`SfxError::Decode`] is scoped to a single effect part: the export pipeline
/// records it against the part and moves on (or stops, depending on the failure policy).
#[derive(thiserror::Error, Debug)]
pub enum SfxError {
    /// Invalid effect description or options (lifetime mismatch, start speed, emission setup).
    #[error("validation error: {0}")]
    Validation(String),

    /// A module curve uses an evaluation mode the sampler cannot discretize.
    #[error("unsupported curve mode '{mode}' in {module} module of part '{part}'")]
    UnsupportedCurveMode {
        /// Name of the offending part.
        part: String,
        /// Module label, e.g. `"rotation over lifetime"`.
        module: String,
        /// Curve mode label, e.g. `"two constants"`.
        mode: String,
    },

    /// A value cannot be represented in the binary record layout.
    #[error("encode error: {0}")]
    Encode(String),

    /// Malformed or truncated `.sfx` input.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SfxError {
    /// Build a [`SfxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SfxError::UnsupportedCurveMode`] value.
    pub fn unsupported_curve_mode(
        part: impl Into<String>,
        module: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        Self::UnsupportedCurveMode {
            part: part.into(),
            module: module.into(),
            mode: mode.into(),
        }
    }

    /// Build a [`SfxError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SfxError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SfxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
