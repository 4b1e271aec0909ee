//! Input-side nodes: remap coordinates before evaluating a child.

mod affine;
mod slice;
mod warp;

pub use affine::{Affine, AffineTransform};
pub use slice::{Project, Slice};
pub use warp::DomainWarp;
