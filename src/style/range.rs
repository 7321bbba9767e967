use super::properties::Properties;
use crate::error::Result;
use crate::markup::{Attribute, MarkupEvent, StartTag, XmlCursor};

pub const PARAGRAPH_STYLE_RANGE: &str = "ParagraphStyleRange";
pub const CHARACTER_STYLE_RANGE: &str = "CharacterStyleRange";

const DEFAULT_PARAGRAPH_STYLE: &str = "ParagraphStyle/$ID/[No paragraph style]";
const DEFAULT_CHARACTER_STYLE: &str = "CharacterStyle/$ID/[No character style]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRangeKind {
    Paragraph,
    Character,
}

impl StyleRangeKind {
    pub fn element_name(self) -> &'static str {
        match self {
            StyleRangeKind::Paragraph => PARAGRAPH_STYLE_RANGE,
            StyleRangeKind::Character => CHARACTER_STYLE_RANGE,
        }
    }
}

/// A paragraph or character style range: the wrapper's attributes and its
/// `Properties` block, without the content it wraps.
///
/// Two ranges are equal when they have the same kind, the same attributes in
/// any order, and the same properties.
#[derive(Debug, Clone)]
pub struct StyleRange {
    kind: StyleRangeKind,
    start: StartTag,
    properties: Properties,
}

impl StyleRange {
    pub fn new(kind: StyleRangeKind, attributes: Vec<Attribute>, properties: Properties) -> Self {
        let start = StartTag {
            name: kind.element_name().to_string(),
            attributes,
            self_closing: false,
        };
        Self {
            kind,
            start,
            properties,
        }
    }

    /// Parse a style range whose start tag was just consumed, along with its
    /// leading `Properties` block. The wrapped content is left in the cursor.
    pub fn parse(start: StartTag, kind: StyleRangeKind, cursor: &mut XmlCursor) -> Result<Self> {
        let properties = if start.self_closing {
            Properties::default()
        } else {
            Properties::parse_optional(cursor)?
        };
        Ok(Self {
            kind,
            start: start.opened(),
            properties,
        })
    }

    pub fn default_paragraph() -> Self {
        Self::new(
            StyleRangeKind::Paragraph,
            vec![Attribute::new("AppliedParagraphStyle", DEFAULT_PARAGRAPH_STYLE)],
            Properties::default(),
        )
    }

    pub fn default_character() -> Self {
        Self::new(
            StyleRangeKind::Character,
            vec![Attribute::new("AppliedCharacterStyle", DEFAULT_CHARACTER_STYLE)],
            Properties::default(),
        )
    }

    pub fn kind(&self) -> StyleRangeKind {
        self.kind
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.start.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.start.attribute(name)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// No attributes and no properties.
    pub fn is_empty(&self) -> bool {
        self.start.attributes.is_empty() && self.properties.is_empty()
    }

    /// Equal to the default range of its kind, or carrying nothing at all.
    pub fn is_default_equivalent(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let default = match self.kind {
            StyleRangeKind::Paragraph => Self::default_paragraph(),
            StyleRangeKind::Character => Self::default_character(),
        };
        *self == default
    }

    /// Every attribute and property of `self` is present in `other`.
    pub fn is_contained_in(&self, other: &StyleRange) -> bool {
        self.kind == other.kind
            && self
                .start
                .attributes
                .iter()
                .all(|attr| other.start.attributes.contains(attr))
            && self.properties.is_contained_in(&other.properties)
    }

    /// Containment that never holds for an empty range.
    pub fn is_subset_of(&self, other: &StyleRange) -> bool {
        !self.is_empty() && self.is_contained_in(other)
    }

    /// Opening wrapper: start tag and properties.
    pub fn write_open(&self, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::Start(self.start.clone()));
        self.properties.write_events(out);
    }

    pub fn write_close(&self, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::End(self.start.end_tag()));
    }
}

impl PartialEq for StyleRange {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.start.attributes.len() == other.start.attributes.len()
            && self.is_contained_in(other)
            && self.properties == other.properties
    }
}
