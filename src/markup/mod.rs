//! Owned XML events, a pull cursor over part bytes, and the serializer that
//! turns events back into bytes.
//!
//! Every structural parser in the crate works on [`MarkupEvent`]s pulled from an
//! [`XmlCursor`]. Keeping events owned lets parsed story elements hold on to
//! their exact markup so that unchanged parts of a story are written back as
//! they were read.

mod cursor;
mod event;
mod range;
mod writer;

pub use cursor::XmlCursor;
pub use event::{Attribute, Declaration, EndTag, Instruction, MarkupEvent, StartTag};
pub use range::{Element, MarkupRange};
pub use writer::{events_to_bytes, events_to_string};
