use super::merger::{Merged, merge_nodes};
use super::tree::TreeBuilder;
use crate::error::Result;
use crate::extract::FilterEvent;
use crate::markup::{MarkupEvent, events_to_bytes};
use crate::story::{StoryChildElement, StoryElementsWriter};

/// Collects one sub-document's events and serializes the rebuilt story.
#[derive(Debug)]
pub(crate) struct StoryWriter {
    part_name: String,
    tree: TreeBuilder,
}

impl StoryWriter {
    pub fn new(part_name: String) -> Self {
        Self {
            part_name,
            tree: TreeBuilder::new(),
        }
    }

    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    pub fn push(&mut self, event: FilterEvent) -> Result<()> {
        self.tree.push(event)
    }

    /// The story part's new bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let merged = merge_nodes(self.tree.finish()?)?;
        let mut out = Vec::new();
        let mut pending: Vec<StoryChildElement> = Vec::new();
        for part in merged {
            match part {
                Merged::Elements(elements) => pending.extend(elements),
                Merged::Markup(ranges) => {
                    flush(&mut pending, &mut out);
                    for range in &ranges {
                        range.write_events(&mut out);
                    }
                }
            }
        }
        flush(&mut pending, &mut out);
        Ok(events_to_bytes(&out))
    }
}

/// Elements of consecutive runs are written together so that they share
/// style-range wrappers.
fn flush(pending: &mut Vec<StoryChildElement>, out: &mut Vec<MarkupEvent>) {
    if !pending.is_empty() {
        StoryElementsWriter::new().write(pending, out);
        pending.clear();
    }
}
