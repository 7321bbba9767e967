use super::item::{Spread, SpreadItem, SpreadItemKind};
use crate::config::FilterConfig;
use crate::error::Result;
use crate::geometry::{AnchorPoint, Direction, Transform};
use crate::package::DesignMap;

/// A text-carrying item with its anchor points mapped onto the pasteboard.
#[derive(Debug, Clone)]
pub struct PasteboardItem<'a> {
    pub item: &'a SpreadItem,
    pub anchors: Vec<AnchorPoint>,
}

impl<'a> PasteboardItem<'a> {
    /// Map `item`'s path points through `frames`, outermost frame first,
    /// ending with the item's own transform.
    fn new(item: &'a SpreadItem, frames: &[Transform]) -> Self {
        let transform = Transform::compose(frames);
        let anchors = item
            .properties
            .anchor_points()
            .into_iter()
            .map(|p| transform.apply(AnchorPoint::new(p.x, p.y)))
            .collect();
        Self { item, anchors }
    }
}

/// Text-carrying items of every spread in reading order.
///
/// Spreads are taken top to bottom; the items of each spread are sorted by
/// their transformed anchor points in the story direction.
pub fn ordered_pasteboard_items(spreads: &[Spread], direction: Direction) -> Vec<PasteboardItem<'_>> {
    let mut sorted: Vec<&Spread> = spreads.iter().collect();
    sorted.sort_by(|a, b| a.vertical_offset().total_cmp(&b.vertical_offset()));

    let mut ordered = Vec::new();
    for spread in sorted {
        let mut frames = vec![spread.transform];
        let mut items = Vec::new();
        collect_items(&spread.items, &mut frames, &mut items);
        items.sort_by(|a, b| direction.compare_items(&a.anchors, &b.anchors));
        ordered.extend(items);
    }
    ordered
}

fn collect_items<'a>(
    spread_items: &'a [SpreadItem],
    frames: &mut Vec<Transform>,
    out: &mut Vec<PasteboardItem<'a>>,
) {
    for item in spread_items {
        frames.push(item.transform);
        match &item.kind {
            SpreadItemKind::Group { items } | SpreadItemKind::TextBox { items } => {
                collect_items(items, frames, out);
            }
            SpreadItemKind::MultiStateObject { states } | SpreadItemKind::Button { states } => {
                for state in states.iter().filter(|s| s.active) {
                    collect_items(&state.items, frames, out);
                }
            }
            _ => out.push(PasteboardItem::new(item, frames)),
        }
        frames.pop();
    }
}

/// Story ids in reading order, taken from the first frame of each text
/// frame chain and from text paths starting a chain. Repeated ids keep their
/// first position.
pub fn ordered_story_ids(items: &[PasteboardItem<'_>]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    let mut push = |id: &str| {
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    };
    for pasteboard_item in items {
        if let Some(thread) = pasteboard_item.item.thread()
            && thread.starts_story()
        {
            push(&thread.story_id);
        }
        for path in pasteboard_item.item.text_paths() {
            if path.thread.starts_story() {
                push(&path.thread.story_id);
            }
        }
    }
    ids
}

/// Decides which pasteboard items count as visible.
pub struct VisibilityFilter<'a> {
    design_map: &'a DesignMap,
    config: &'a FilterConfig,
}

impl<'a> VisibilityFilter<'a> {
    pub fn new(design_map: &'a DesignMap, config: &'a FilterConfig) -> Self {
        Self { design_map, config }
    }

    pub fn is_visible(&self, item: &SpreadItem) -> Result<bool> {
        let layer = self.design_map.layer(&item.layer_id)?;
        if !layer.visible && !self.config.extract_hidden_layers {
            return Ok(false);
        }
        Ok(item.visible)
    }

    /// Split items into visible and invisible ones, keeping their order.
    pub fn partition<'s>(
        &self,
        items: Vec<PasteboardItem<'s>>,
    ) -> Result<(Vec<PasteboardItem<'s>>, Vec<PasteboardItem<'s>>)> {
        let mut visible = Vec::new();
        let mut invisible = Vec::new();
        for item in items {
            if self.is_visible(item.item)? {
                visible.push(item);
            } else {
                invisible.push(item);
            }
        }
        Ok((visible, invisible))
    }
}
