use std::sync::Arc;

use super::element::{ReferenceElement, ReferenceKind, StoryChildElement, StyledElement, Table};
use super::{BREAK, CONTENT};
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::markup::{Element, MarkupEvent, MarkupRange, StartTag, XmlCursor};
use crate::style::{
    CHARACTER_STYLE_RANGE, PARAGRAPH_STYLE_RANGE, Properties, StyleDefinitions, StyleRange,
    StyleRangeKind,
};

const PROPERTIES: &str = "Properties";
const TABLE: &str = "Table";
const ROW: &str = "Row";
const COLUMN: &str = "Column";
const CELL: &str = "Cell";
const CHANGE: &str = "Change";
const CHANGE_TYPE: &str = "ChangeType";
const DELETED_TEXT: &str = "DeletedText";
const XML_ELEMENT: &str = "XMLElement";
const XML_ATTRIBUTE: &str = "XMLAttribute";
const XML_COMMENT: &str = "XMLComment";
const XML_INSTRUCTION: &str = "XMLInstruction";
const MARKUP_TAG: &str = "MarkupTag";

/// Story children that carry a style pair. Anything else found directly in
/// a story, footnote, note, cell or hyperlink is kept as plain markup.
const STYLED_ELEMENTS: &[&str] = &[
    PARAGRAPH_STYLE_RANGE,
    CHARACTER_STYLE_RANGE,
    "Footnote",
    "GaijiOwnedItemObject",
    "Note",
    TABLE,
    "TextVariableInstance",
    "HyperlinkTextDestination",
    CHANGE,
    "HiddenText",
    XML_ELEMENT,
    XML_ATTRIBUTE,
    XML_COMMENT,
    XML_INSTRUCTION,
    "DTD",
    "Oval",
    "Rectangle",
    "GraphicLine",
    "Polygon",
    "Group",
    "TextFrame",
    "Button",
    "FormField",
    "MultiStateObject",
    "EPSText",
    "HyperlinkTextSource",
    "PageReference",
    "ParagraphDestination",
    "CrossReferenceSource",
    CONTENT,
    BREAK,
];

/// Style ranges in effect where an element is found. `None` means no
/// wrapper of that kind encloses the element.
#[derive(Debug, Clone, Default)]
struct Ambient {
    paragraph: Option<Arc<StyleRange>>,
    character: Option<Arc<StyleRange>>,
}

/// Parses the children of a `<Story>` into [`StoryChildElement`]s, folding
/// the style-range wrappers into the elements they enclose.
pub struct StoryParser<'c> {
    cursor: &'c mut XmlCursor,
    untag_xml_structures: bool,
    story_markup_tag: Option<&'c str>,
    default_paragraph: Arc<StyleRange>,
    default_character: Arc<StyleRange>,
}

impl<'c> StoryParser<'c> {
    pub fn new(cursor: &'c mut XmlCursor, config: &FilterConfig) -> Self {
        Self {
            cursor,
            untag_xml_structures: config.untag_xml_structures,
            story_markup_tag: None,
            default_paragraph: Arc::new(StyleRange::default_paragraph()),
            default_character: Arc::new(StyleRange::default_character()),
        }
    }

    /// `MarkupTag` of the default story tagging. When XML structures are
    /// kept, a story-level `XMLElement` with this tag stays in place as
    /// markup around its content instead of hiding that content.
    pub fn with_story_markup_tag(mut self, tag: Option<&'c str>) -> Self {
        self.story_markup_tag = tag;
        self
    }

    pub fn cursor(&mut self) -> &mut XmlCursor {
        self.cursor
    }

    /// Parse one direct child of the story whose start tag was just read.
    pub fn parse_child(&mut self, start: StartTag) -> Result<Vec<StoryChildElement>> {
        if self.is_story_tagging(&start) {
            let end = start.end_tag();
            let mut elements = vec![StoryChildElement::Markup(MarkupRange::Start(start))];
            elements.extend(self.parse_children(XML_ELEMENT, &Ambient::default())?);
            elements.push(StoryChildElement::Markup(MarkupRange::End(end)));
            return Ok(elements);
        }
        self.parse_element(start, &Ambient::default())
    }

    fn is_story_tagging(&self, start: &StartTag) -> bool {
        !self.untag_xml_structures
            && start.name == XML_ELEMENT
            && self
                .story_markup_tag
                .is_some_and(|tag| start.attribute(MARKUP_TAG) == Some(tag))
    }

    fn parse_element(&mut self, start: StartTag, ambient: &Ambient) -> Result<Vec<StoryChildElement>> {
        if start.name == PARAGRAPH_STYLE_RANGE {
            return self.parse_paragraph_range(start);
        }
        if !STYLED_ELEMENTS.contains(&start.name.as_str()) {
            log::trace!("keeping <{}> as story markup", start.name);
            return Ok(vec![StoryChildElement::Markup(Element::parse(start, self.cursor)?.into())]);
        }
        let paragraph = ambient
            .paragraph
            .clone()
            .unwrap_or_else(|| self.default_paragraph.clone());
        if start.name == CHARACTER_STYLE_RANGE {
            return self.parse_character_range(start, paragraph);
        }
        let character = ambient
            .character
            .clone()
            .unwrap_or_else(|| self.default_character.clone());
        self.parse_styled(start, StyleDefinitions::new(paragraph, character))
    }

    fn parse_paragraph_range(&mut self, start: StartTag) -> Result<Vec<StoryChildElement>> {
        let self_closing = start.self_closing;
        let paragraph = Arc::new(StyleRange::parse(start, StyleRangeKind::Paragraph, self.cursor)?);
        let mut elements = Vec::new();
        if self_closing {
            self.cursor.expect_event(PARAGRAPH_STYLE_RANGE)?;
            return Ok(elements);
        }
        loop {
            match self.cursor.next_tag(PARAGRAPH_STYLE_RANGE)? {
                MarkupEvent::End(end) if end.name == PARAGRAPH_STYLE_RANGE => return Ok(elements),
                MarkupEvent::Start(child) if child.name == CHARACTER_STYLE_RANGE => {
                    elements.extend(self.parse_character_range(child, paragraph.clone())?);
                }
                MarkupEvent::Start(child) => {
                    let styles = StyleDefinitions::new(paragraph.clone(), self.default_character.clone());
                    elements.extend(self.parse_styled(child, styles)?);
                }
                MarkupEvent::End(end) => {
                    return Err(Error::unexpected(format!(
                        "unexpected </{}> inside <{PARAGRAPH_STYLE_RANGE}>",
                        end.name
                    )));
                }
                _ => {}
            }
        }
    }

    fn parse_character_range(
        &mut self,
        start: StartTag,
        paragraph: Arc<StyleRange>,
    ) -> Result<Vec<StoryChildElement>> {
        let self_closing = start.self_closing;
        let character = Arc::new(StyleRange::parse(start, StyleRangeKind::Character, self.cursor)?);
        if self_closing {
            self.cursor.expect_event(CHARACTER_STYLE_RANGE)?;
            return Ok(Vec::new());
        }
        self.parse_styled_children(CHARACTER_STYLE_RANGE, StyleDefinitions::new(paragraph, character))
    }

    /// Children of a character range or change: every child takes `styles`.
    fn parse_styled_children(
        &mut self,
        container: &str,
        styles: StyleDefinitions,
    ) -> Result<Vec<StoryChildElement>> {
        let mut elements = Vec::new();
        loop {
            match self.cursor.next_tag(container)? {
                MarkupEvent::End(end) if end.name == container => return Ok(elements),
                MarkupEvent::Start(child) => elements.extend(self.parse_styled(child, styles.clone())?),
                MarkupEvent::End(end) => {
                    return Err(Error::unexpected(format!(
                        "unexpected </{}> inside <{container}>",
                        end.name
                    )));
                }
                _ => {}
            }
        }
    }

    /// Children of a container that may open its own style ranges.
    fn parse_children(&mut self, container: &str, ambient: &Ambient) -> Result<Vec<StoryChildElement>> {
        let mut elements = Vec::new();
        loop {
            match self.cursor.next_tag(container)? {
                MarkupEvent::End(end) if end.name == container => return Ok(elements),
                MarkupEvent::Start(child) => elements.extend(self.parse_element(child, ambient)?),
                MarkupEvent::End(end) => {
                    return Err(Error::unexpected(format!(
                        "unexpected </{}> inside <{container}>",
                        end.name
                    )));
                }
                _ => {}
            }
        }
    }

    fn parse_styled(&mut self, start: StartTag, styles: StyleDefinitions) -> Result<Vec<StoryChildElement>> {
        match start.name.as_str() {
            XML_ATTRIBUTE | XML_COMMENT | XML_INSTRUCTION if self.untag_xml_structures => {
                Element::parse(start, self.cursor)?;
                Ok(Vec::new())
            }
            XML_ELEMENT if self.untag_xml_structures => {
                let ambient = Ambient {
                    paragraph: Some(styles.paragraph),
                    character: Some(styles.character),
                };
                self.parse_children(XML_ELEMENT, &ambient)
            }
            CHANGE => {
                let change_type = start.required_attribute(CHANGE_TYPE)?;
                if change_type == DELETED_TEXT {
                    Element::parse(start, self.cursor)?;
                    return Ok(Vec::new());
                }
                self.parse_styled_children(CHANGE, styles)
            }
            "Footnote" => {
                let reference = self.parse_reference(ReferenceKind::Footnote, start, Some(styles))?;
                Ok(vec![StoryChildElement::Reference(reference)])
            }
            "Note" => {
                let reference = self.parse_reference(ReferenceKind::Note, start, Some(styles))?;
                Ok(vec![StoryChildElement::Reference(reference)])
            }
            "HyperlinkTextSource" => {
                let reference =
                    self.parse_reference(ReferenceKind::HyperlinkTextSource, start, Some(styles))?;
                Ok(vec![StoryChildElement::Reference(reference)])
            }
            TABLE => Ok(vec![StoryChildElement::Table(self.parse_table(start, styles)?)]),
            CONTENT => {
                let element = Element::parse(start, self.cursor)?;
                Ok(vec![StoryChildElement::Content(StyledElement { element, styles })])
            }
            BREAK => {
                let element = Element::parse(start, self.cursor)?;
                Ok(vec![StoryChildElement::Break(StyledElement { element, styles })])
            }
            _ => {
                let element = Element::parse(start, self.cursor)?;
                Ok(vec![StoryChildElement::Styled(StyledElement { element, styles })])
            }
        }
    }

    /// Parse a footnote, note, hyperlink source or cell. Hyperlink content
    /// continues the enclosing style; the others start from the defaults.
    fn parse_reference(
        &mut self,
        kind: ReferenceKind,
        start: StartTag,
        styles: Option<StyleDefinitions>,
    ) -> Result<ReferenceElement> {
        let ambient = match (kind, &styles) {
            (ReferenceKind::HyperlinkTextSource, Some(styles)) => Ambient {
                paragraph: Some(styles.paragraph.clone()),
                character: Some(styles.character.clone()),
            },
            _ => Ambient::default(),
        };
        let mut properties = Properties::default();
        let mut children = Vec::new();
        loop {
            match self.cursor.next_tag(&start.name)? {
                MarkupEvent::End(end) if end.name == start.name => break,
                MarkupEvent::Start(child)
                    if child.name == PROPERTIES && children.is_empty() && properties.is_empty() =>
                {
                    properties = Properties::parse(child, self.cursor)?;
                }
                MarkupEvent::Start(child) => children.extend(self.parse_element(child, &ambient)?),
                MarkupEvent::End(end) => {
                    return Err(Error::unexpected(format!(
                        "unexpected </{}> inside <{}>",
                        end.name, start.name
                    )));
                }
                _ => {}
            }
        }
        Ok(ReferenceElement {
            kind,
            start: start.opened(),
            properties,
            children,
            styles,
        })
    }

    fn parse_table(&mut self, start: StartTag, styles: StyleDefinitions) -> Result<Table> {
        let mut properties = Properties::default();
        let mut markup = Vec::new();
        let mut cells = Vec::new();
        loop {
            match self.cursor.next_tag(TABLE)? {
                MarkupEvent::End(end) if end.name == TABLE => break,
                MarkupEvent::Start(child) if child.name == PROPERTIES => {
                    properties = Properties::parse(child, self.cursor)?;
                }
                MarkupEvent::Start(child) if child.name == ROW || child.name == COLUMN => {
                    markup.push(Element::parse(child, self.cursor)?);
                }
                MarkupEvent::Start(child) if child.name == CELL => {
                    cells.push(self.parse_reference(ReferenceKind::Cell, child, None)?);
                }
                other => {
                    return Err(Error::unexpected(format!("unexpected {other:?} inside <{TABLE}>")));
                }
            }
        }
        Ok(Table {
            start: start.opened(),
            properties,
            markup,
            cells,
            styles,
        })
    }
}
