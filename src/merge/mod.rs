//! Merge: rebuild story parts from (possibly translated) text units and
//! write a complete package.
//!
//! The events of each story are regrouped into a tree in which referent
//! groups hang off the text unit that points at them. Merging walks that
//! tree depth first, turning coded text back into story elements, and the
//! elements are serialized with freshly generated style-range wrappers.

mod merger;
mod package;
mod story;
mod tree;

pub use package::IdmlWriter;
