pub mod bbox;
pub mod chain;
pub mod pline;
pub mod shape;

pub use bbox::Aabb;
pub use chain::{Chain, Orientation};
pub use pline::{Pline, PlineVertex};
pub use shape::{Arc, End, Line, Shape};
