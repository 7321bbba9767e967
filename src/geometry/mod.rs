//! Coordinate frames and reading order on the pasteboard.

mod ordering;
mod transform;

pub use ordering::Direction;
pub use transform::{AnchorPoint, Transform};
