use crate::config::FilterConfig;
use crate::error::Result;
use crate::geometry::Direction;
use crate::markup::{MarkupEvent, XmlCursor};

/// The document preferences the filter cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub story_direction: Direction,
    /// Tag InDesign applies when a whole story is tagged at once.
    pub default_story_tag_name: Option<String>,
}

impl Preferences {
    pub fn parse(data: Vec<u8>, config: &FilterConfig) -> Result<Self> {
        let mut cursor = XmlCursor::new(data, config.max_attribute_size);
        let mut preferences = Preferences::default();

        while let Some(event) = cursor.next_event()? {
            let MarkupEvent::Start(start) = event else {
                continue;
            };
            match start.name.as_str() {
                "StoryPreference" => {
                    if let Some(direction) = start.attribute("StoryDirection") {
                        preferences.story_direction = Direction::from_story_direction(direction);
                    }
                }
                "XMLPreference" => {
                    preferences.default_story_tag_name =
                        start.attribute("DefaultStoryTagName").map(str::to_string);
                }
                _ => {}
            }
        }
        Ok(preferences)
    }

    /// `MarkupTag` value of an `XMLElement` carrying the default story tag.
    pub fn story_markup_tag(&self) -> Option<String> {
        self.default_story_tag_name
            .as_ref()
            .map(|name| format!("XMLTag/{name}"))
    }
}
