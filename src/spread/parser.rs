use super::item::{Spread, SpreadItem, SpreadItemKind, State, TextPath, TextThread};
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::geometry::Transform;
use crate::markup::{MarkupEvent, StartTag, XmlCursor};
use crate::style::Properties;

pub const SPREAD: &str = "Spread";
pub const MASTER_SPREAD: &str = "MasterSpread";
const STATE: &str = "State";
const TEXT_PATH: &str = "TextPath";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    TextFrame,
    GraphicLine,
    Rectangle,
    Oval,
    Polygon,
    Group,
    TextBox,
    MultiStateObject,
    Button,
}

impl ItemKind {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "TextFrame" => ItemKind::TextFrame,
            "GraphicLine" => ItemKind::GraphicLine,
            "Rectangle" => ItemKind::Rectangle,
            "Oval" => ItemKind::Oval,
            "Polygon" => ItemKind::Polygon,
            "Group" => ItemKind::Group,
            "TextBox" => ItemKind::TextBox,
            "MultiStateObject" => ItemKind::MultiStateObject,
            "Button" => ItemKind::Button,
            _ => return None,
        })
    }
}

/// Parse a spread part. `element` is [`SPREAD`] or [`MASTER_SPREAD`]; items
/// without an `ItemLayer` are placed on `active_layer`.
pub fn parse_spread(
    data: Vec<u8>,
    element: &str,
    active_layer: Option<&str>,
    config: &FilterConfig,
) -> Result<Spread> {
    let mut parser = SpreadParser {
        cursor: XmlCursor::new(data, config.max_attribute_size),
    };
    let start = parser
        .cursor
        .find_start(element)?
        .ok_or_else(|| Error::unexpected(format!("no <{element}> element in spread part")))?;
    let id = start.required_attribute("Self")?.to_string();
    let transform = start.required_attribute("ItemTransform")?.parse::<Transform>()?;
    let items = if start.self_closing {
        Vec::new()
    } else {
        parser.parse_items(element, active_layer)?
    };
    Ok(Spread {
        id,
        transform,
        items,
    })
}

struct SpreadParser {
    cursor: XmlCursor,
}

impl SpreadParser {
    /// Collect the page items directly inside `container` up to its end tag.
    fn parse_items(&mut self, container: &str, layer: Option<&str>) -> Result<Vec<SpreadItem>> {
        let mut items = Vec::new();
        loop {
            match self.cursor.expect_event(container)? {
                MarkupEvent::Start(start) => {
                    if let Some(kind) = ItemKind::from_name(&start.name) {
                        items.push(self.parse_item(start, kind, layer)?);
                    }
                }
                MarkupEvent::End(end) if end.name == container => return Ok(items),
                _ => {}
            }
        }
    }

    fn parse_item(&mut self, start: StartTag, kind: ItemKind, layer: Option<&str>) -> Result<SpreadItem> {
        let id = start.required_attribute("Self")?.to_string();
        let layer_id = match start.attribute("ItemLayer").or(layer) {
            Some(layer_id) => layer_id.to_string(),
            None => return Err(Error::missing_attribute(&start.name, "ItemLayer")),
        };
        let visible = start.bool_attribute("Visible", true);
        let transform = start.required_attribute("ItemTransform")?.parse::<Transform>()?;
        let properties = if start.self_closing {
            Properties::default()
        } else {
            Properties::parse_optional(&mut self.cursor)?
        };

        let kind = match kind {
            ItemKind::Group => SpreadItemKind::Group {
                items: self.parse_items(&start.name, Some(&layer_id))?,
            },
            ItemKind::TextBox => SpreadItemKind::TextBox {
                items: self.parse_items(&start.name, Some(&layer_id))?,
            },
            ItemKind::MultiStateObject => SpreadItemKind::MultiStateObject {
                states: self.parse_states(&start.name, &layer_id)?,
            },
            ItemKind::Button => SpreadItemKind::Button {
                states: self.parse_states(&start.name, &layer_id)?,
            },
            ItemKind::TextFrame => {
                let thread = TextThread::from_start(&start)?;
                let text_paths = self.parse_text_paths(&start.name)?;
                SpreadItemKind::TextFrame { thread, text_paths }
            }
            ItemKind::GraphicLine => SpreadItemKind::GraphicLine {
                text_paths: self.parse_text_paths(&start.name)?,
            },
            ItemKind::Rectangle => SpreadItemKind::Rectangle {
                text_paths: self.parse_text_paths(&start.name)?,
            },
            ItemKind::Oval => SpreadItemKind::Oval {
                text_paths: self.parse_text_paths(&start.name)?,
            },
            ItemKind::Polygon => SpreadItemKind::Polygon {
                text_paths: self.parse_text_paths(&start.name)?,
            },
        };

        if !properties.has_path_geometry() && matches!(kind, SpreadItemKind::TextFrame { .. }) {
            log::warn!("text frame {id} has no path geometry; ordering it first");
        }

        Ok(SpreadItem {
            id,
            layer_id,
            visible,
            transform,
            properties,
            kind,
        })
    }

    /// Skip to the end of a shape, collecting its text paths.
    fn parse_text_paths(&mut self, name: &str) -> Result<Vec<TextPath>> {
        let mut text_paths = Vec::new();
        let mut depth = 0usize;
        loop {
            match self.cursor.expect_event(name)? {
                MarkupEvent::Start(start) if start.name == name => depth += 1,
                MarkupEvent::Start(start) if start.name == TEXT_PATH => {
                    text_paths.push(TextPath::from_start(&start)?);
                }
                MarkupEvent::End(end) if end.name == name => {
                    if depth == 0 {
                        return Ok(text_paths);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }

    fn parse_states(&mut self, container: &str, layer: &str) -> Result<Vec<State>> {
        let mut states = Vec::new();
        loop {
            match self.cursor.expect_event(container)? {
                MarkupEvent::Start(start) if start.name == STATE => {
                    let id = start.required_attribute("Self")?.to_string();
                    let active = start.bool_attribute("Active", false);
                    let items = self.parse_items(STATE, Some(layer))?;
                    states.push(State { id, active, items });
                }
                MarkupEvent::End(end) if end.name == container => return Ok(states),
                _ => {}
            }
        }
    }
}
