//! Formatting as IDML records it: `ParagraphStyleRange` and
//! `CharacterStyleRange` wrappers with their attributes and `Properties`.

mod definitions;
mod properties;
mod range;

pub use definitions::StyleDefinitions;
pub use properties::{GeometryPath, PathGeometry, PathPoint, Properties, Property};
pub use range::{CHARACTER_STYLE_RANGE, PARAGRAPH_STYLE_RANGE, StyleRange, StyleRangeKind};
