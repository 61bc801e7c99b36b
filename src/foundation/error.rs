use std::time::Duration;

/// Convenience result type used across snapreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid caller-provided configuration or values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A media field the chosen template requires is absent.
    #[error("missing media: template '{template}' requires {field}")]
    MissingMedia {
        /// Template that declared the requirement.
        template: String,
        /// Name of the absent media field.
        field: String,
    },

    /// The recipe lacks data a template structurally needs.
    #[error("invalid recipe: {0}")]
    InvalidRecipe(String),

    /// An overlay frame intrudes into the protected margins.
    #[error("safe zone violation in overlay '{overlay}': {detail}")]
    SafeZoneViolation {
        /// Overlay kind that failed validation.
        overlay: String,
        /// Which inset was crossed and by how much.
        detail: String,
    },

    /// The render pipeline exceeded its time budget.
    #[error("render timed out after {budget:?}")]
    RenderTimeout {
        /// Budget that was exceeded.
        budget: Duration,
    },

    /// Output still exceeds the hard size limit after the downgrade pass.
    #[error("export size exceeded: {size_bytes} bytes > limit {limit_bytes} bytes")]
    ExportSizeExceeded {
        /// Size of the last encoded pass.
        size_bytes: u64,
        /// Hard limit in bytes.
        limit_bytes: u64,
    },

    /// Lower-level encoder failure.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Errors while producing frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// The caller cancelled the render.
    #[error("render cancelled")]
    Cancelled,

    /// A render for the same requesting context is still running.
    #[error("render already in flight for context '{context}'")]
    RenderInFlight {
        /// Requesting context key.
        context: String,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::InvalidRecipe`] value.
    pub fn invalid_recipe(msg: impl Into<String>) -> Self {
        Self::InvalidRecipe(msg.into())
    }

    /// Build a [`ReelError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`ReelError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`ReelError::MissingMedia`] value.
    pub fn missing_media(template: impl ToString, field: impl ToString) -> Self {
        Self::MissingMedia {
            template: template.to_string(),
            field: field.to_string(),
        }
    }

    /// Build a [`ReelError::SafeZoneViolation`] value.
    pub fn safe_zone(overlay: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SafeZoneViolation {
            overlay: overlay.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
