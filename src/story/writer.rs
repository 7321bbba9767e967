use std::sync::Arc;

use super::element::StoryChildElement;
use crate::markup::MarkupEvent;
use crate::style::{StyleDefinitions, StyleRange};

/// Writes story elements back out, wrapping them in style ranges.
///
/// A wrapper is opened only where the style pair changes from one element to
/// the next, so runs of equally styled elements share one wrapper.
pub struct StoryElementsWriter<'a> {
    enclosing: Option<&'a StyleDefinitions>,
    paragraph: Option<Arc<StyleRange>>,
    character: Option<Arc<StyleRange>>,
    default_character: StyleRange,
}

impl<'a> StoryElementsWriter<'a> {
    /// Writer for a story body, footnote, note or cell.
    pub fn new() -> Self {
        Self {
            enclosing: None,
            paragraph: None,
            character: None,
            default_character: StyleRange::default_character(),
        }
    }

    /// Writer for content nested in an element that already sits inside
    /// `enclosing`'s wrappers, such as a hyperlink source. Wrappers are
    /// emitted only where the style differs from `enclosing`.
    pub fn within(enclosing: &'a StyleDefinitions) -> Self {
        Self {
            enclosing: Some(enclosing),
            paragraph: None,
            character: None,
            default_character: StyleRange::default_character(),
        }
    }

    pub fn write(mut self, elements: &[StoryChildElement], out: &mut Vec<MarkupEvent>) {
        for element in elements {
            match element.styles() {
                Some(styles) => self.open(styles, out),
                None => {
                    self.close_character(out);
                    self.close_paragraph(out);
                }
            }
            element.write_events(out);
        }
        self.close_character(out);
        self.close_paragraph(out);
    }

    fn open(&mut self, styles: &StyleDefinitions, out: &mut Vec<MarkupEvent>) {
        if let Some(enclosing) = self.enclosing {
            self.open_within(enclosing, styles, out);
            return;
        }

        if self.paragraph.as_ref() != Some(&styles.paragraph) {
            self.close_character(out);
            self.close_paragraph(out);
            styles.paragraph.write_open(out);
            self.paragraph = Some(styles.paragraph.clone());
            self.open_character(&styles.character, out);
        } else if self.character.as_ref() != Some(&styles.character) {
            self.close_character(out);
            self.open_character(&styles.character, out);
        }
    }

    /// Wrappers relative to the enclosing pair. A paragraph range that differs
    /// from the enclosing one is reopened here; inside it, content starts from
    /// the default character style as it does in any paragraph range.
    fn open_within(
        &mut self,
        enclosing: &StyleDefinitions,
        styles: &StyleDefinitions,
        out: &mut Vec<MarkupEvent>,
    ) {
        let paragraph = (styles.paragraph != enclosing.paragraph).then_some(&styles.paragraph);
        if self.paragraph.as_ref() != paragraph {
            self.close_character(out);
            self.close_paragraph(out);
            if let Some(paragraph) = paragraph {
                paragraph.write_open(out);
                self.paragraph = Some(paragraph.clone());
            }
        }

        let inherited = match self.paragraph {
            Some(_) => *styles.character == self.default_character,
            None => styles.character == enclosing.character,
        };
        if inherited {
            self.close_character(out);
        } else if self.character.as_ref() != Some(&styles.character) {
            self.close_character(out);
            self.open_character(&styles.character, out);
        }
    }

    fn open_character(&mut self, character: &Arc<StyleRange>, out: &mut Vec<MarkupEvent>) {
        character.write_open(out);
        self.character = Some(character.clone());
    }

    fn close_character(&mut self, out: &mut Vec<MarkupEvent>) {
        if let Some(character) = self.character.take() {
            character.write_close(out);
        }
    }

    fn close_paragraph(&mut self, out: &mut Vec<MarkupEvent>) {
        if let Some(paragraph) = self.paragraph.take() {
            paragraph.write_close(out);
        }
    }
}

impl Default for StoryElementsWriter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
