//! Error types for the linking engine.

use crate::config::ConfigError;
use crate::granule::FieldId;
use crate::linker::CyclePhase;

/// Result type alias
pub type Result<T> = std::result::Result<T, LinkError>;

/// Errors raised while building or running a linking cycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    /// Non-finite coordinates reached the index builder or a search window.
    ///
    /// Aborts the current cycle; its link table is never published.
    #[error("Invalid geometry in {context} at #{index}: ({x}, {y})")]
    InvalidGeometry {
        /// Where the coordinates were seen.
        context: &'static str,
        /// Insertion index of the offending item.
        index: usize,
        /// First coordinate.
        x: f64,
        /// Second coordinate.
        y: f64,
    },

    /// A field declared samples but none of them survived validation.
    ///
    /// The field keeps its handle but is absent from the index.
    #[error("Field {field} has no valid granules ({declared} declared)")]
    EmptyElement {
        /// Handle of the rejected field.
        field: FieldId,
        /// Number of samples the field declared.
        declared: usize,
    },

    /// Operation called out of sequence; a caller bug, never retried.
    #[error("Cannot {operation} while cycle is {phase}")]
    State {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the linker was in.
        phase: CyclePhase,
    },

    /// Configuration rejected at construction.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl LinkError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidGeometry { .. } => "INVALID_GEOMETRY",
            Self::EmptyElement { .. } => "EMPTY_ELEMENT",
            Self::State { .. } => "STATE",
            Self::Config(_) => "CONFIG",
        }
    }

    /// Whether the cycle can continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyElement { .. })
    }

    pub(crate) fn invalid_geometry(context: &'static str, index: usize, x: f64, y: f64) -> Self {
        Self::InvalidGeometry {
            context,
            index,
            x,
            y,
        }
    }
}
