//! Story parts: the styled element tree inside `<Story>` and the writer that
//! regenerates style-range wrappers around it.

mod element;
mod parser;
mod writer;

pub use element::{ReferenceElement, ReferenceKind, StoryChildElement, StyledElement, Table};
pub use parser::StoryParser;
pub use writer::StoryElementsWriter;

pub const STORY: &str = "Story";
pub const CONTENT: &str = "Content";
pub const BREAK: &str = "Br";
