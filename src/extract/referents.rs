use super::RunMapper;
use super::event::{FilterEvent, ReferenceTarget, StartGroup};
use super::ids::IdGenerator;
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::story::{ReferenceElement, StoryChildElement};

const CELL_GROUP: &str = "rg";

/// Events for a table, footnote or note extracted as group `group_id`:
/// the group start, the events of its content, and the group end.
///
/// Each table cell is a nested group of its own.
pub(crate) fn accumulate(
    element: &StoryChildElement,
    group_id: &str,
    config: &FilterConfig,
) -> Result<Vec<FilterEvent>> {
    match element {
        StoryChildElement::Table(table) => {
            let mut events = vec![FilterEvent::StartGroup(StartGroup {
                id: group_id.to_string(),
                target: ReferenceTarget::Table(table.without_cells()),
            })];
            let mut cell_ids = IdGenerator::with_root(group_id, CELL_GROUP);
            for cell in &table.cells {
                events.extend(accumulate_reference(cell, &cell_ids.create_id(), config)?);
            }
            events.push(FilterEvent::EndGroup {
                id: group_id.to_string(),
            });
            Ok(events)
        }
        StoryChildElement::Reference(reference) => accumulate_reference(reference, group_id, config),
        other => Err(Error::unexpected(format!(
            "<{}> cannot be extracted as a group",
            other.name()
        ))),
    }
}

fn accumulate_reference(
    reference: &ReferenceElement,
    group_id: &str,
    config: &FilterConfig,
) -> Result<Vec<FilterEvent>> {
    let mut events = vec![FilterEvent::StartGroup(StartGroup {
        id: group_id.to_string(),
        target: ReferenceTarget::Reference(reference.without_children()),
    })];
    let mut mapper = RunMapper::with_root(config.clone(), group_id);
    events.extend(mapper.map_elements(&reference.children)?);
    events.push(FilterEvent::EndGroup {
        id: group_id.to_string(),
    });
    Ok(events)
}
