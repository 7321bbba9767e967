use std::collections::BTreeMap;
use std::sync::Arc;

use super::fragment::TextFragment;
use super::special::SpecialCharacter;
use crate::config::FilterConfig;
use crate::markup::MarkupRange;
use crate::package::Package;
use crate::story::{ReferenceElement, StoryChildElement, Table};
use crate::style::StyleDefinitions;

/// One event of the extraction stream.
#[derive(Debug, Clone)]
pub enum FilterEvent {
    StartDocument(StartDocument),
    StartSubDocument(StartSubDocument),
    DocumentPart(DocumentPart),
    TextUnit(TextUnit),
    StartGroup(StartGroup),
    EndGroup { id: String },
    EndSubDocument { id: String },
    EndDocument { id: String },
}

impl FilterEvent {
    pub fn id(&self) -> &str {
        match self {
            FilterEvent::StartDocument(e) => &e.id,
            FilterEvent::StartSubDocument(e) => &e.id,
            FilterEvent::DocumentPart(e) => &e.id,
            FilterEvent::TextUnit(e) => &e.id,
            FilterEvent::StartGroup(e) => &e.id,
            FilterEvent::EndGroup { id }
            | FilterEvent::EndSubDocument { id }
            | FilterEvent::EndDocument { id } => id,
        }
    }

    pub fn as_text_unit(&self) -> Option<&TextUnit> {
        match self {
            FilterEvent::TextUnit(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn as_text_unit_mut(&mut self) -> Option<&mut TextUnit> {
        match self {
            FilterEvent::TextUnit(unit) => Some(unit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StartDocument {
    pub id: String,
    pub mime_type: String,
    /// Source package; non-translatable parts are copied from it on output.
    pub package: Arc<Package>,
    pub config: FilterConfig,
}

/// Start of a translatable story part.
#[derive(Debug, Clone)]
pub struct StartSubDocument {
    pub id: String,
    pub part_name: String,
}

#[derive(Debug, Clone)]
pub struct DocumentPart {
    pub id: String,
    pub skeleton: PartSkeleton,
}

/// What a document part writes back.
#[derive(Debug, Clone)]
pub enum PartSkeleton {
    /// A whole package entry, copied byte for byte.
    ZipEntry(String),
    /// Raw markup around the story content.
    Markup(Vec<MarkupRange>),
    /// Story elements without translatable text.
    Elements(Vec<StoryChildElement>),
}

#[derive(Debug, Clone)]
pub struct TextUnit {
    pub id: String,
    pub source: TextFragment,
    pub target: Option<TextFragment>,
    pub skeleton: TextUnitSkeleton,
}

impl TextUnit {
    /// Replace the text written back on merge. Codes must keep the ids they
    /// have in the source.
    pub fn set_target(&mut self, target: TextFragment) {
        self.target = Some(target);
    }

    pub fn target_or_source(&self) -> &TextFragment {
        self.target.as_ref().unwrap_or(&self.source)
    }

    /// Whether a code of this unit points at the referent group `group_id`.
    pub fn references(&self, group_id: &str) -> bool {
        self.skeleton.code_map.values().any(|object| {
            matches!(object, CodeObject::Referent { group_id: id } if id == group_id)
        })
    }
}

/// Everything needed to rebuild a text unit's story elements from its text.
#[derive(Debug, Clone, Default)]
pub struct TextUnitSkeleton {
    /// The `Br` that ended the run, re-appended after the text.
    pub break_element: Option<StoryChildElement>,
    pub code_map: BTreeMap<u32, CodeObject>,
    /// Style pair of text that sits outside every code.
    pub ambient: Option<StyleDefinitions>,
}

/// What a code id stands for in the skeleton.
#[derive(Debug, Clone)]
pub enum CodeObject {
    /// Opening/closing pair for a change of style.
    Styles(StyleDefinitions),
    /// Opening/closing pair for a hyperlink source, stored without children.
    Hyperlink(ReferenceElement),
    /// Placeholder for an element kept as is.
    Element(StoryChildElement),
    /// Placeholder for a footnote, note or table extracted as a group.
    Referent { group_id: String },
    SpecialCharacter(SpecialCharacter),
}

#[derive(Debug, Clone)]
pub struct StartGroup {
    pub id: String,
    pub target: ReferenceTarget,
}

/// The container a group rebuilds, stripped of its content.
#[derive(Debug, Clone)]
pub enum ReferenceTarget {
    Table(Table),
    Reference(ReferenceElement),
}
