use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::markup::{MarkupEvent, XmlCursor};

/// A document layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub id: String,
    pub name: Option<String>,
    pub visible: bool,
}

/// The package manifest (`designmap.xml`): layers and the names of every
/// part the document is made of.
#[derive(Debug, Clone, Default)]
pub struct DesignMap {
    pub active_layer: Option<String>,
    pub layers: Vec<Layer>,
    pub graphic: Option<String>,
    pub fonts: Option<String>,
    pub styles: Option<String>,
    pub preferences: Option<String>,
    pub tags: Option<String>,
    pub backing_story: Option<String>,
    pub master_spreads: Vec<String>,
    pub spreads: Vec<String>,
    pub stories: Vec<String>,
}

impl DesignMap {
    pub fn parse(data: Vec<u8>, config: &FilterConfig) -> Result<Self> {
        let mut cursor = XmlCursor::new(data, config.max_attribute_size);
        let mut map = DesignMap::default();

        while let Some(event) = cursor.next_event()? {
            let MarkupEvent::Start(start) = event else {
                continue;
            };
            match start.name.as_str() {
                "Document" => {
                    map.active_layer = start.attribute("ActiveLayer").map(str::to_string);
                }
                "Layer" => map.layers.push(Layer {
                    id: start.required_attribute("Self")?.to_string(),
                    name: start.attribute("Name").map(str::to_string),
                    visible: start.bool_attribute("Visible", true),
                }),
                "idPkg:Graphic" => map.graphic = Some(src(&start)?),
                "idPkg:Fonts" => map.fonts = Some(src(&start)?),
                "idPkg:Styles" => map.styles = Some(src(&start)?),
                "idPkg:Preferences" => map.preferences = Some(src(&start)?),
                "idPkg:Tags" => map.tags = Some(src(&start)?),
                "idPkg:BackingStory" => map.backing_story = Some(src(&start)?),
                "idPkg:MasterSpread" => map.master_spreads.push(src(&start)?),
                "idPkg:Spread" => map.spreads.push(src(&start)?),
                "idPkg:Story" => map.stories.push(src(&start)?),
                _ => {}
            }
        }

        log::debug!(
            "design map: {} layers, {} master spreads, {} spreads, {} stories",
            map.layers.len(),
            map.master_spreads.len(),
            map.spreads.len(),
            map.stories.len()
        );
        Ok(map)
    }

    pub fn layer(&self, id: &str) -> Result<&Layer> {
        self.layers
            .iter()
            .find(|layer| layer.id == id)
            .ok_or_else(|| Error::UnknownLayer(id.to_string()))
    }
}

fn src(start: &crate::markup::StartTag) -> Result<String> {
    Ok(start.required_attribute("src")?.to_string())
}
