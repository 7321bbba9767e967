use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use super::StorySubDocument;
use super::event::{DocumentPart, FilterEvent, PartSkeleton, StartDocument};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::package::{
    DESIGN_MAP, DesignMap, IDML_MIME_TYPE, Package, Preferences, order_entries,
    package_part_names, story_part_name,
};
use crate::spread::{
    MASTER_SPREAD, SPREAD, Spread, VisibilityFilter, ordered_pasteboard_items, ordered_story_ids,
    parse_spread,
};

const DOCUMENT_ID: &str = "sd";

/// Translatable and copied parts of a package, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartPlan {
    /// Every entry of the package, in the order it is written back.
    pub entries: Vec<String>,
    /// Story parts whose text is extracted.
    pub translatable: Vec<String>,
    /// Story parts only placed on hidden items or skipped master spreads.
    pub non_translatable: Vec<String>,
    /// `MarkupTag` of the default story tagging, from the preferences.
    pub story_markup_tag: Option<String>,
}

impl PartPlan {
    /// Work out story reading order and visibility from the spreads.
    pub fn new(package: &Package, config: &FilterConfig) -> Result<Self> {
        let design_map = DesignMap::parse(package.read_part(DESIGN_MAP)?, config)?;
        let preferences = match &design_map.preferences {
            Some(part) => Preferences::parse(package.read_part(part)?, config)?,
            None => Preferences::default(),
        };
        let active_layer = design_map.active_layer.as_deref();

        let master_spreads = parse_spreads(package, &design_map.master_spreads, MASTER_SPREAD, active_layer, config)?;
        let spreads = parse_spreads(package, &design_map.spreads, SPREAD, active_layer, config)?;

        let direction = preferences.story_direction;
        let visibility = VisibilityFilter::new(&design_map, config);
        let mut candidates = Vec::new();
        let mut invisible = Vec::new();
        let master_items = ordered_pasteboard_items(&master_spreads, direction);
        if config.extract_master_spreads {
            candidates.extend(master_items);
        } else {
            invisible.extend(master_items);
        }
        candidates.extend(ordered_pasteboard_items(&spreads, direction));
        let (visible, hidden) = visibility.partition(candidates)?;
        invisible.extend(hidden);

        let mut translatable = Vec::new();
        for id in ordered_story_ids(&visible) {
            translatable.push(story_part_name(&id, &design_map.stories)?);
        }
        let mut non_translatable = Vec::new();
        for id in ordered_story_ids(&invisible) {
            let part = story_part_name(&id, &design_map.stories)?;
            if !translatable.contains(&part) && !non_translatable.contains(&part) {
                non_translatable.push(part);
            }
        }
        for part in &design_map.stories {
            if !translatable.contains(part) && !non_translatable.contains(part) {
                translatable.push(part.clone());
            }
        }

        let mut stories = translatable.clone();
        stories.extend(non_translatable.iter().cloned());
        let declared = package_part_names(&design_map, &stories);
        let entries = order_entries(package.entry_names(), &declared);

        log::debug!(
            "{} entries, {} translatable stories, {} non-translatable stories",
            entries.len(),
            translatable.len(),
            non_translatable.len()
        );
        Ok(Self {
            entries,
            translatable,
            non_translatable,
            story_markup_tag: preferences.story_markup_tag(),
        })
    }
}

fn parse_spreads(
    package: &Package,
    parts: &[String],
    element: &str,
    active_layer: Option<&str>,
    config: &FilterConfig,
) -> Result<Vec<Spread>> {
    parts
        .iter()
        .map(|part| parse_spread(package.read_part(part)?, element, active_layer, config))
        .collect()
}

/// Pull-based extraction over an IDML package.
///
/// Yields a start-of-document event, then one event per copied entry or a
/// sub-document per translatable story, then an end-of-document event.
/// After an error the iterator is exhausted.
///
/// ```no_run
/// use idml_filter::{FilterConfig, IdmlFilter, Package};
///
/// let package = Package::open("brochure.idml").unwrap();
/// for event in IdmlFilter::open(package, FilterConfig::default()).unwrap() {
///     if let Some(unit) = event.unwrap().as_text_unit() {
///         println!("{}: {}", unit.id, unit.source);
///     }
/// }
/// ```
pub struct IdmlFilter {
    package: Arc<Package>,
    config: FilterConfig,
    entries: VecDeque<String>,
    translatable: HashSet<String>,
    story_markup_tag: Option<String>,
    current: Option<StorySubDocument>,
    next_sub_document: u32,
    started: bool,
    finished: bool,
}

impl IdmlFilter {
    pub fn open(package: impl Into<Arc<Package>>, config: FilterConfig) -> Result<Self> {
        let package = package.into();
        let plan = PartPlan::new(&package, &config)?;
        Ok(Self {
            package,
            config,
            entries: plan.entries.into(),
            translatable: plan.translatable.into_iter().collect(),
            story_markup_tag: plan.story_markup_tag,
            current: None,
            next_sub_document: 1,
            started: false,
            finished: false,
        })
    }

    pub fn package(&self) -> &Arc<Package> {
        &self.package
    }

    fn next_event(&mut self) -> Result<Option<FilterEvent>> {
        if !self.started {
            self.started = true;
            log::debug!("extracting {} entries", self.entries.len());
            return Ok(Some(FilterEvent::StartDocument(StartDocument {
                id: DOCUMENT_ID.to_string(),
                mime_type: IDML_MIME_TYPE.to_string(),
                package: self.package.clone(),
                config: self.config.clone(),
            })));
        }

        loop {
            if let Some(story) = &mut self.current {
                match story.next() {
                    Some(event) => return event.map(Some),
                    None => self.current = None,
                }
            }

            let Some(entry) = self.entries.pop_front() else {
                self.finished = true;
                return Ok(Some(FilterEvent::EndDocument {
                    id: DOCUMENT_ID.to_string(),
                }));
            };
            if !self.translatable.contains(&entry) {
                return Ok(Some(FilterEvent::DocumentPart(DocumentPart {
                    id: entry.clone(),
                    skeleton: PartSkeleton::ZipEntry(entry),
                })));
            }

            let id = self.next_sub_document.to_string();
            self.next_sub_document += 1;
            let data = self.package.read_part(&entry)?;
            self.current = Some(
                StorySubDocument::new(id, entry, data, &self.config)
                    .with_story_markup_tag(self.story_markup_tag.clone()),
            );
        }
    }
}

impl Iterator for IdmlFilter {
    type Item = Result<FilterEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_event() {
            Ok(event) => event.map(Ok),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
