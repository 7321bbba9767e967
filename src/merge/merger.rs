use std::mem;

use super::tree::{Group, Node};
use crate::error::{Error, Result};
use crate::extract::{
    CodeObject, PartSkeleton, ReferenceTarget, SpecialCharacter, Span, TagType, TextUnit,
};
use crate::markup::{Element, MarkupEvent, MarkupRange, StartTag};
use crate::story::{CONTENT, ReferenceElement, StoryChildElement, StyledElement};
use crate::style::StyleDefinitions;

/// Merged output of a story, in document order.
#[derive(Debug, Clone)]
pub(crate) enum Merged {
    /// Raw markup around the story content.
    Markup(Vec<MarkupRange>),
    Elements(Vec<StoryChildElement>),
}

/// Rebuild story content from a tree of extracted events.
pub(crate) fn merge_nodes(nodes: Vec<Node>) -> Result<Vec<Merged>> {
    let mut merged = Vec::new();
    for node in nodes {
        match node {
            Node::Part(part) => match part.skeleton {
                PartSkeleton::Markup(ranges) => merged.push(Merged::Markup(ranges)),
                PartSkeleton::Elements(elements) => merged.push(Merged::Elements(elements)),
                PartSkeleton::ZipEntry(name) => {
                    return Err(Error::unexpected(format!(
                        "package entry {name} inside a story"
                    )));
                }
            },
            Node::Unit { unit, groups } => {
                merged.push(Merged::Elements(merge_text_unit(&unit, groups)?));
            }
            Node::Group(group) => merged.push(Merged::Elements(vec![merge_group(group)?])),
        }
    }
    Ok(merged)
}

/// Content elements of a group, which holds no raw markup.
fn merge_children(nodes: Vec<Node>) -> Result<Vec<StoryChildElement>> {
    let mut elements = Vec::new();
    for merged in merge_nodes(nodes)? {
        match merged {
            Merged::Elements(children) => elements.extend(children),
            Merged::Markup(_) => {
                return Err(Error::unexpected("raw markup inside a referent group"));
            }
        }
    }
    Ok(elements)
}

fn merge_group(group: Group) -> Result<StoryChildElement> {
    match group.target {
        ReferenceTarget::Table(mut table) => {
            for node in group.children {
                let Node::Group(cell) = node else {
                    return Err(Error::unexpected(format!(
                        "table {} holds content outside its cells",
                        group.id
                    )));
                };
                match merge_group(cell)? {
                    StoryChildElement::Reference(cell) => table.cells.push(cell),
                    other => {
                        return Err(Error::unexpected(format!(
                            "<{}> is not a table cell",
                            other.name()
                        )));
                    }
                }
            }
            Ok(StoryChildElement::Table(table))
        }
        ReferenceTarget::Reference(mut reference) => {
            reference.children = merge_children(group.children)?;
            Ok(StoryChildElement::Reference(reference))
        }
    }
}

/// An open code while the text is walked.
enum Frame {
    Styles {
        id: u32,
        styles: StyleDefinitions,
    },
    Hyperlink {
        id: u32,
        reference: ReferenceElement,
        styles: StyleDefinitions,
        children: Vec<StoryChildElement>,
    },
}

impl Frame {
    fn id(&self) -> u32 {
        match self {
            Frame::Styles { id, .. } | Frame::Hyperlink { id, .. } => *id,
        }
    }

    fn styles(&self) -> &StyleDefinitions {
        match self {
            Frame::Styles { styles, .. } | Frame::Hyperlink { styles, .. } => styles,
        }
    }
}

/// Inverse of the text unit mapper: walks the coded text and regenerates
/// `Content` elements stamped with the style pair in force.
struct UnitMerger<'u> {
    unit: &'u TextUnit,
    groups: Vec<Group>,
    default_styles: StyleDefinitions,
    frames: Vec<Frame>,
    elements: Vec<StoryChildElement>,
    content: Vec<MarkupEvent>,
}

fn merge_text_unit(unit: &TextUnit, groups: Vec<Group>) -> Result<Vec<StoryChildElement>> {
    let mut merger = UnitMerger {
        unit,
        groups,
        default_styles: unit.skeleton.ambient.clone().unwrap_or_default(),
        frames: Vec::new(),
        elements: Vec::new(),
        content: Vec::new(),
    };
    for span in unit.target_or_source().spans() {
        match span {
            Span::Text(text) => merger.push_text(text),
            Span::Code(code) => match code.tag {
                TagType::Opening => merger.open(code.id)?,
                TagType::Closing => merger.close(code.id)?,
                TagType::Placeholder => merger.placeholder(code.id)?,
            },
        }
    }
    merger.flush();
    while let Some(frame) = merger.frames.pop() {
        merger.end_frame(frame);
    }
    if let Some(break_element) = &unit.skeleton.break_element {
        merger.elements.push(break_element.clone());
    }
    Ok(merger.elements)
}

impl<'u> UnitMerger<'u> {
    fn object(&self, id: u32) -> Result<&'u CodeObject> {
        let unit: &'u TextUnit = self.unit;
        unit.skeleton
            .code_map
            .get(&id)
            .ok_or(Error::UnexpectedCode(id))
    }

    fn current_styles(&self) -> &StyleDefinitions {
        self.frames
            .last()
            .map_or(&self.default_styles, Frame::styles)
    }

    /// Element list the next element belongs to: the innermost hyperlink's
    /// children, or the unit itself.
    fn target(&mut self) -> &mut Vec<StoryChildElement> {
        for frame in self.frames.iter_mut().rev() {
            if let Frame::Hyperlink { children, .. } = frame {
                return children;
            }
        }
        &mut self.elements
    }

    fn push_text(&mut self, text: &str) {
        if let Some(MarkupEvent::Text(last)) = self.content.last_mut() {
            last.push_str(text);
        } else {
            self.content.push(MarkupEvent::Text(text.to_string()));
        }
    }

    /// Close the pending `Content` element.
    fn flush(&mut self) {
        if self.content.is_empty() {
            return;
        }
        let inner = mem::take(&mut self.content);
        let styles = self.current_styles().clone();
        let content = StoryChildElement::Content(StyledElement {
            element: Element::new(StartTag::new(CONTENT), inner),
            styles,
        });
        self.target().push(content);
    }

    fn open(&mut self, id: u32) -> Result<()> {
        let frame = match self.object(id)? {
            CodeObject::Styles(styles) => Frame::Styles {
                id,
                styles: styles.clone(),
            },
            CodeObject::Hyperlink(reference) => Frame::Hyperlink {
                id,
                reference: reference.clone(),
                styles: reference.styles.clone().unwrap_or_default(),
                children: Vec::new(),
            },
            _ => return Err(Error::UnexpectedCode(id)),
        };
        self.flush();
        self.frames.push(frame);
        Ok(())
    }

    fn close(&mut self, id: u32) -> Result<()> {
        if !self.frames.iter().any(|frame| frame.id() == id) {
            return Err(Error::UnexpectedCode(id));
        }
        self.flush();
        while let Some(frame) = self.frames.pop() {
            let done = frame.id() == id;
            self.end_frame(frame);
            if done {
                break;
            }
        }
        Ok(())
    }

    fn end_frame(&mut self, frame: Frame) {
        if let Frame::Hyperlink {
            mut reference,
            children,
            ..
        } = frame
        {
            reference.children = children;
            self.target().push(StoryChildElement::Reference(reference));
        }
    }

    fn placeholder(&mut self, id: u32) -> Result<()> {
        let element = match self.object(id)? {
            CodeObject::SpecialCharacter(SpecialCharacter::Character(kind)) => {
                let mut buf = [0; 4];
                let c = kind.as_char().encode_utf8(&mut buf).to_string();
                self.push_text(&c);
                return Ok(());
            }
            CodeObject::SpecialCharacter(SpecialCharacter::Instruction(instruction)) => {
                self.content.push(MarkupEvent::Instruction(instruction.clone()));
                return Ok(());
            }
            CodeObject::Element(element) => element.clone(),
            CodeObject::Referent { group_id } => {
                let position = self
                    .groups
                    .iter()
                    .position(|group| group.id == *group_id)
                    .ok_or(Error::UnexpectedCode(id))?;
                let group = self.groups.remove(position);
                merge_group(group)?
            }
            CodeObject::Styles(_) | CodeObject::Hyperlink(_) => {
                return Err(Error::UnexpectedCode(id));
            }
        };
        self.flush();
        self.target().push(element);
        Ok(())
    }
}
