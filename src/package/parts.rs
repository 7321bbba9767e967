use super::design_map::DesignMap;
use crate::error::{Error, Result};

pub const MIMETYPE: &str = "mimetype";
pub const DESIGN_MAP: &str = "designmap.xml";
const CONTAINER: &str = "META-INF/container.xml";
const METADATA: &str = "META-INF/metadata.xml";

const STORY_PREFIX: &str = "Stories/Story_";
const STORY_SUFFIX: &str = ".xml";

/// Every non-story part in package order, followed by the given stories.
pub(crate) fn package_part_names(design_map: &DesignMap, stories: &[String]) -> Vec<String> {
    let mut names: Vec<String> = [MIMETYPE, DESIGN_MAP, CONTAINER, METADATA]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let singles = [
        &design_map.graphic,
        &design_map.fonts,
        &design_map.styles,
        &design_map.preferences,
        &design_map.tags,
    ];
    names.extend(singles.into_iter().flatten().cloned());
    names.extend(design_map.master_spreads.iter().cloned());
    names.extend(design_map.spreads.iter().cloned());
    names.extend(design_map.backing_story.iter().cloned());
    names.extend(stories.iter().cloned());
    names
}

/// Sort entry names by their position in `declared`; names that are not
/// declared keep their relative order after the declared ones.
pub fn order_entries<'a>(entries: impl IntoIterator<Item = &'a str>, declared: &[String]) -> Vec<String> {
    let mut ordered: Vec<(usize, &str)> = entries
        .into_iter()
        .map(|name| {
            let rank = declared
                .iter()
                .position(|d| d == name)
                .unwrap_or(usize::MAX);
            (rank, name)
        })
        .collect();
    ordered.sort_by_key(|(rank, _)| *rank);
    ordered.into_iter().map(|(_, name)| name.to_string()).collect()
}

/// `Stories/Story_u1d8.xml` → `u1d8`.
pub fn story_id_from_part_name(part_name: &str) -> Result<&str> {
    part_name
        .strip_prefix(STORY_PREFIX)
        .and_then(|rest| rest.strip_suffix(STORY_SUFFIX))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::StoryPartName(format!("unexpected story part name: {part_name}")))
}

/// Find the part holding the story with the given id.
pub fn story_part_name(story_id: &str, story_parts: &[String]) -> Result<String> {
    for part_name in story_parts {
        if story_id_from_part_name(part_name)? == story_id {
            return Ok(part_name.clone());
        }
    }
    Err(Error::StoryPartName(format!(
        "story part does not exist for story {story_id}"
    )))
}
