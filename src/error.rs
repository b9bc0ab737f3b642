use thiserror::Error;

use crate::document::{EntityId, LayerId};
use crate::math::Point2;

/// Top-level error type for the linework pipeline.
///
/// Degenerate geometry is never an error: zero-length segments are filtered
/// before any matching stage sees them.
#[derive(Debug, Error)]
pub enum LineworkError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by the drawing document and its batch contract.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("layer not found: {0:?}")]
    LayerNotFound(LayerId),
}

/// Errors raised by pipeline stages.
///
/// Every variant is fatal for the run; none of them is resolved locally.
#[derive(Debug, Error)]
pub enum OperationError {
    /// More than one endpoint matched within tolerance at a junction.
    #[error("ambiguous connection at ({x}, {y}) between {ids:?}", x = .point.x, y = .point.y)]
    AmbiguousConnection { point: Point2, ids: Vec<EntityId> },

    /// An entity is a container in one group and contained in another.
    #[error("entity {id:?} is both a container and contained")]
    NestingViolation { id: EntityId },

    /// Every rotation of a boundary's start segment produced an empty offset.
    #[error("offset of {id:?} failed after {attempts} attempts")]
    OffsetFailure { id: EntityId, attempts: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors related to pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for '{name}': {value}")]
    Invalid { name: &'static str, value: f64 },
}

/// Convenience type alias for results using [`LineworkError`].
pub type Result<T> = std::result::Result<T, LineworkError>;

impl OperationError {
    /// Ids of the entities involved in the failure, for highlighting by the caller.
    #[must_use]
    pub fn involved_ids(&self) -> Vec<EntityId> {
        match self {
            Self::AmbiguousConnection { ids, .. } => ids.clone(),
            Self::NestingViolation { id } | Self::OffsetFailure { id, .. } => vec![*id],
            Self::InvalidInput(_) => Vec::new(),
        }
    }
}
