use std::sync::Arc;

use super::range::StyleRange;

/// The effective paragraph and character style pair of a story element.
///
/// Ranges are shared, so every element parsed inside one wrapper points at
/// the same allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefinitions {
    pub paragraph: Arc<StyleRange>,
    pub character: Arc<StyleRange>,
}

impl StyleDefinitions {
    pub fn new(paragraph: Arc<StyleRange>, character: Arc<StyleRange>) -> Self {
        Self {
            paragraph,
            character,
        }
    }

    /// Both ranges are default-equivalent: unstyled text needs no code.
    pub fn is_default(&self) -> bool {
        self.paragraph.is_default_equivalent() && self.character.is_default_equivalent()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraph.is_empty() && self.character.is_empty()
    }

    /// `self` carries something, and everything it carries is also present in
    /// `other`. An empty pair is never a subset, not even of itself.
    pub fn is_subset_of(&self, other: &StyleDefinitions) -> bool {
        !self.is_empty()
            && self.paragraph.is_contained_in(&other.paragraph)
            && self.character.is_contained_in(&other.character)
    }
}

impl Default for StyleDefinitions {
    fn default() -> Self {
        Self::new(
            Arc::new(StyleRange::default_paragraph()),
            Arc::new(StyleRange::default_character()),
        )
    }
}
