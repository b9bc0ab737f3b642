pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod pipeline;

pub use config::{JoinStyle, PipelineConfig};
pub use document::{Batch, Drawing, EntityId, EntityKind, LayerId};
pub use error::{LineworkError, Result};
pub use pipeline::{Pipeline, PipelineReport};
