//! Extraction: story elements to text units with inline codes.
//!
//! [`IdmlFilter`] walks a package and yields [`FilterEvent`]s. Each run of a
//! story, up to and including a paragraph break, becomes a [`TextUnit`] whose
//! [`TextFragment`] interleaves literal text with [`Code`]s; the unit's
//! skeleton records what every code stands for so the merge step can rebuild
//! the story exactly.

mod code;
mod event;
mod filter;
mod fragment;
mod ids;
mod mapper;
mod referents;
mod special;
mod story;

pub use code::{Code, CodeType, Formatting, TagType};
pub use event::{
    CodeObject, DocumentPart, FilterEvent, PartSkeleton, ReferenceTarget, StartDocument,
    StartGroup, StartSubDocument, TextUnit, TextUnitSkeleton,
};
pub use filter::{IdmlFilter, PartPlan};
pub use fragment::{Span, TextFragment};
pub use ids::IdGenerator;
pub(crate) use mapper::RunMapper;
pub use special::{InstructionKind, SpecialCharacter, SpecialCharacterKind};
pub(crate) use story::StorySubDocument;
