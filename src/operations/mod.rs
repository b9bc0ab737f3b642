//! Pipeline stages over a [`Drawing`](crate::document::Drawing).
//!
//! Each stage is a struct built with `new(..)` and run with `execute()`.
//! Stages read the drawing or the previous stage's output and return plain
//! data; turning that data into document changes is left to the caller.

pub mod assemble;
pub mod dedup;
pub mod explode;
pub mod filter;
pub mod nesting;
pub mod offset;
pub mod segment;
pub mod simplify;
pub mod snap;
pub mod spatial_index;

pub use assemble::{AssembleChains, AssembledChain};
pub use dedup::EliminateDuplicates;
pub use explode::{Explode, Exploded};
pub use filter::{MinLengthFilter, Pruned};
pub use nesting::{ContainmentGroup, GroupNesting};
pub use offset::{BoundaryRole, OffsetCurve, OffsetGroups, PlineOffset};
pub use segment::{EndpointRef, Segment};
pub use simplify::SimplifyChain;
pub use snap::{SnapEndpoints, Snapped};
pub use spatial_index::{BoxIndex, Neighbor, SpatialIndex};
