use std::fmt;

use super::special::{InstructionKind, SpecialCharacterKind};
use crate::story::{ReferenceKind, StoryChildElement};
use crate::style::{StyleDefinitions, StyleRange};

const CODE_DATA_NAME: &str = "content";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Opening,
    Closing,
    Placeholder,
}

/// An inline code in extracted text.
///
/// Opening and closing codes share an id. A placeholder that stands for a
/// referent group carries the group id in `referent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub tag: TagType,
    pub id: u32,
    pub code_type: CodeType,
    pub data: String,
    pub referent: Option<String>,
}

impl Code {
    pub fn opening(id: u32, code_type: CodeType) -> Self {
        Self::with_data(TagType::Opening, id, code_type, format!("<{CODE_DATA_NAME}-{id}>"))
    }

    pub fn closing(id: u32, code_type: CodeType) -> Self {
        Self::with_data(TagType::Closing, id, code_type, format!("</{CODE_DATA_NAME}-{id}>"))
    }

    pub fn placeholder(id: u32, code_type: CodeType) -> Self {
        Self::with_data(TagType::Placeholder, id, code_type, format!("<{CODE_DATA_NAME}-{id}/>"))
    }

    /// Placeholder standing for the referent group `referent`.
    pub fn reference(id: u32, code_type: CodeType, referent: impl Into<String>) -> Self {
        let referent = referent.into();
        let data = format!("<{CODE_DATA_NAME}-{referent}-{id}/>");
        Self {
            referent: Some(referent),
            ..Self::with_data(TagType::Placeholder, id, code_type, data)
        }
    }

    fn with_data(tag: TagType, id: u32, code_type: CodeType, data: String) -> Self {
        Self {
            tag,
            id,
            code_type,
            data,
            referent: None,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.referent.is_some()
    }
}

/// Formatting read off a character style range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Formatting {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub superscript: bool,
    pub subscript: bool,
}

impl Formatting {
    pub fn from_range(range: &StyleRange) -> Self {
        let mut formatting = Formatting::default();

        if let Some(font_style) = range.attribute("FontStyle") {
            formatting.bold |= font_style.contains("Bold");
            formatting.italic |= font_style.contains("Italic");
        }
        if let Some(style) = range.attribute("AppliedCharacterStyle") {
            let name = style.rsplit('/').next().unwrap_or(style);
            formatting.bold |= name.contains("Bold");
            formatting.italic |= name.contains("Italic");
        }
        if let Some(skew) = range.attribute("Skew") {
            formatting.italic |= skew.parse::<f64>().is_ok_and(|angle| angle != 0.0);
        }
        formatting.strikethrough = range.attribute("StrikeThru") == Some("true");
        formatting.underline = range.attribute("Underline") == Some("true");
        match range.attribute("Position") {
            Some("Superscript" | "OTSuperscript") => formatting.superscript = true,
            Some("Subscript" | "OTSubscript") => formatting.subscript = true,
            _ => {}
        }
        formatting
    }

    pub fn is_empty(&self) -> bool {
        *self == Formatting::default()
    }
}

/// Semantic tag of a code, for downstream tools only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeType {
    #[default]
    None,
    Link,
    TableRef,
    FootnoteRef,
    NoteRef,
    Formatting(Formatting),
    Special(SpecialCharacterKind),
    Instruction(InstructionKind),
    Break,
}

impl CodeType {
    pub fn for_styles(styles: &StyleDefinitions) -> Self {
        let formatting = Formatting::from_range(&styles.character);
        if formatting.is_empty() {
            CodeType::None
        } else {
            CodeType::Formatting(formatting)
        }
    }

    pub fn for_element(element: &StoryChildElement) -> Self {
        match element {
            StoryChildElement::Reference(reference) => match reference.kind {
                ReferenceKind::Footnote => CodeType::FootnoteRef,
                ReferenceKind::Note => CodeType::NoteRef,
                ReferenceKind::HyperlinkTextSource => CodeType::Link,
                ReferenceKind::Cell => CodeType::None,
            },
            StoryChildElement::Table(_) => CodeType::TableRef,
            StoryChildElement::Break(_) => CodeType::Break,
            _ => CodeType::None,
        }
    }
}

impl fmt::Display for CodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeType::None => Ok(()),
            CodeType::Link => f.write_str("x-link"),
            CodeType::TableRef => f.write_str("x-table-ref"),
            CodeType::FootnoteRef => f.write_str("x-footnote-ref"),
            CodeType::NoteRef => f.write_str("x-note-ref"),
            CodeType::Break => f.write_str("x-break"),
            CodeType::Special(kind) => write!(f, "x-{}", kind.name()),
            CodeType::Instruction(kind) => match kind.name() {
                Some(name) => write!(f, "x-{name}"),
                None => f.write_str("x-instruction"),
            },
            CodeType::Formatting(formatting) => {
                let flags = [
                    (formatting.bold, "x-bold"),
                    (formatting.italic, "x-italic"),
                    (formatting.underline, "x-underline"),
                    (formatting.strikethrough, "x-strikethrough"),
                    (formatting.superscript, "x-superscript"),
                    (formatting.subscript, "x-subscript"),
                ];
                let names: Vec<&str> = flags
                    .iter()
                    .filter(|(set, _)| *set)
                    .map(|(_, name)| *name)
                    .collect();
                f.write_str(&names.join(";"))
            }
        }
    }
}
