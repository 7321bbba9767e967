use super::writer::StoryElementsWriter;
use crate::markup::{Element, MarkupEvent, MarkupRange, StartTag};
use crate::style::{Properties, StyleDefinitions};

/// One element of a story's flattened content.
///
/// Parsing removes the `ParagraphStyleRange`/`CharacterStyleRange` wrappers:
/// each element instead carries the style pair that applied to it.
#[derive(Debug, Clone, PartialEq)]
pub enum StoryChildElement {
    /// Story-level markup outside any style range, such as `StoryPreference`
    /// or the tags of a kept `XMLElement` around the story content.
    Markup(MarkupRange),
    /// An opaque styled element, e.g. an anchored frame or a text variable.
    Styled(StyledElement),
    Content(StyledElement),
    Break(StyledElement),
    Reference(ReferenceElement),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledElement {
    pub element: Element,
    pub styles: StyleDefinitions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Footnote,
    Note,
    HyperlinkTextSource,
    Cell,
}

/// An element whose children are story content of their own: footnotes,
/// notes, hyperlink sources and table cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceElement {
    pub kind: ReferenceKind,
    pub start: StartTag,
    pub properties: Properties,
    pub children: Vec<StoryChildElement>,
    /// Cells have no style pair of their own.
    pub styles: Option<StyleDefinitions>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub start: StartTag,
    pub properties: Properties,
    /// `Row` and `Column` elements, kept verbatim.
    pub markup: Vec<Element>,
    pub cells: Vec<ReferenceElement>,
    pub styles: StyleDefinitions,
}

impl StoryChildElement {
    pub fn styles(&self) -> Option<&StyleDefinitions> {
        match self {
            StoryChildElement::Markup(_) => None,
            StoryChildElement::Styled(e)
            | StoryChildElement::Content(e)
            | StoryChildElement::Break(e) => Some(&e.styles),
            StoryChildElement::Reference(r) => r.styles.as_ref(),
            StoryChildElement::Table(t) => Some(&t.styles),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StoryChildElement::Markup(e) => e.name(),
            StoryChildElement::Styled(e)
            | StoryChildElement::Content(e)
            | StoryChildElement::Break(e) => e.element.name(),
            StoryChildElement::Reference(r) => &r.start.name,
            StoryChildElement::Table(t) => &t.start.name,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, StoryChildElement::Break(_))
    }

    /// Events of the element itself, without style-range wrappers.
    pub fn write_events(&self, out: &mut Vec<MarkupEvent>) {
        match self {
            StoryChildElement::Markup(e) => e.write_events(out),
            StoryChildElement::Styled(e)
            | StoryChildElement::Content(e)
            | StoryChildElement::Break(e) => e.element.write_events(out),
            StoryChildElement::Reference(r) => r.write_events(out),
            StoryChildElement::Table(t) => t.write_events(out),
        }
    }
}

impl ReferenceElement {
    /// Same element with its children removed.
    pub fn without_children(&self) -> Self {
        Self {
            kind: self.kind,
            start: self.start.clone(),
            properties: self.properties.clone(),
            children: Vec::new(),
            styles: self.styles.clone(),
        }
    }

    pub fn write_events(&self, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::Start(self.start.clone()));
        self.properties.write_events(out);
        let writer = match (self.kind, &self.styles) {
            (ReferenceKind::HyperlinkTextSource, Some(styles)) => StoryElementsWriter::within(styles),
            _ => StoryElementsWriter::new(),
        };
        writer.write(&self.children, out);
        out.push(MarkupEvent::End(self.start.end_tag()));
    }
}

impl Table {
    pub fn without_cells(&self) -> Self {
        Self {
            start: self.start.clone(),
            properties: self.properties.clone(),
            markup: self.markup.clone(),
            cells: Vec::new(),
            styles: self.styles.clone(),
        }
    }

    pub fn write_events(&self, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::Start(self.start.clone()));
        self.properties.write_events(out);
        for element in &self.markup {
            element.write_events(out);
        }
        for cell in &self.cells {
            cell.write_events(out);
        }
        out.push(MarkupEvent::End(self.start.end_tag()));
    }
}
