//! In-memory IDML packages for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const MIMETYPE: &str = "application/vnd.adobe.indesign-idml-package";
pub const LAYER: &str = "ub3";
const PACKAGING_NS: &str = "http://ns.adobe.com/AdobeInDesign/idml/1.0/packaging";

/// A text frame at `(x, y)` holding the start of `story`.
pub fn text_frame(id: &str, story: &str, x: f64, y: f64) -> String {
    frame_xml(id, story, x, y, "")
}

/// Same as [`text_frame`] with extra attributes such as `Visible="false"`.
pub fn text_frame_with(id: &str, story: &str, x: f64, y: f64, attributes: &str) -> String {
    frame_xml(id, story, x, y, attributes)
}

fn frame_xml(id: &str, story: &str, x: f64, y: f64, attributes: &str) -> String {
    format!(
        r#"<TextFrame Self="{id}" ParentStory="{story}" PreviousTextFrame="n" NextTextFrame="n" ItemTransform="1 0 0 1 {x} {y}" {attributes}><Properties><PathGeometry><GeometryPathType PathOpen="false"><PathPointArray><PathPointType Anchor="0 0" LeftDirection="0 0" RightDirection="0 0"/><PathPointType Anchor="0 100" LeftDirection="0 100" RightDirection="0 100"/><PathPointType Anchor="100 100" LeftDirection="100 100" RightDirection="100 100"/><PathPointType Anchor="100 0" LeftDirection="100 0" RightDirection="100 0"/></PathPointArray></GeometryPathType></PathGeometry></Properties></TextFrame>"#
    )
}

/// A paragraph of unstyled text followed by a break.
pub fn paragraph(text: &str) -> String {
    format!(
        r#"<ParagraphStyleRange AppliedParagraphStyle="ParagraphStyle/$ID/[No paragraph style]"><CharacterStyleRange AppliedCharacterStyle="CharacterStyle/$ID/[No character style]"><Content>{text}</Content><Br/></CharacterStyleRange></ParagraphStyleRange>"#
    )
}

pub fn story_part(id: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><idPkg:Story xmlns:idPkg="{PACKAGING_NS}" DOMVersion="8.0"><Story Self="{id}" AppliedTOCStyle="n" TrackChanges="false" StoryTitle="$ID/" AppliedNamedGrid="n"><StoryPreference OpticalMarginAlignment="false" OpticalMarginSize="12" FrameType="TextFrameType" StoryOrientation="Horizontal" StoryDirection="LeftToRightDirection"/>{body}</Story></idPkg:Story>"#
    )
}

#[derive(Debug, Clone, Default)]
pub struct IdmlBuilder {
    layers: Vec<(String, bool)>,
    master_spreads: Vec<(String, String)>,
    spreads: Vec<(String, String)>,
    stories: Vec<(String, String)>,
    extra: Vec<(String, String)>,
    story_direction: Option<String>,
    entry_order: Option<Vec<String>>,
}

impl IdmlBuilder {
    pub fn new() -> Self {
        Self {
            layers: vec![(LAYER.to_string(), true)],
            ..Self::default()
        }
    }

    pub fn layer(mut self, id: &str, visible: bool) -> Self {
        self.layers.push((id.to_string(), visible));
        self
    }

    /// A spread holding the given page items.
    pub fn spread(mut self, id: &str, items: &[String]) -> Self {
        self.spreads.push((id.to_string(), items.concat()));
        self
    }

    pub fn master_spread(mut self, id: &str, items: &[String]) -> Self {
        self.master_spreads.push((id.to_string(), items.concat()));
        self
    }

    /// A story whose `<Story>` element holds `body`.
    pub fn story(mut self, id: &str, body: &str) -> Self {
        self.stories.push((id.to_string(), story_part(id, body)));
        self
    }

    /// An entry the design map does not declare.
    pub fn extra(mut self, name: &str, data: &str) -> Self {
        self.extra.push((name.to_string(), data.to_string()));
        self
    }

    pub fn story_direction(mut self, direction: &str) -> Self {
        self.story_direction = Some(direction.to_string());
        self
    }

    /// Write entries in this order instead of the default one.
    pub fn entry_order(mut self, names: &[&str]) -> Self {
        self.entry_order = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn story_name(id: &str) -> String {
        format!("Stories/Story_{id}.xml")
    }

    pub fn spread_name(id: &str) -> String {
        format!("Spreads/Spread_{id}.xml")
    }

    pub fn master_spread_name(id: &str) -> String {
        format!("MasterSpreads/MasterSpread_{id}.xml")
    }

    fn design_map(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><?aid style="50" type="document" readerVersion="6.0" featureSet="257" product="8.0(370)" ?><Document xmlns:idPkg="{PACKAGING_NS}" DOMVersion="8.0" Self="d" ActiveLayer="{LAYER}">"#
        );
        xml.push_str(r#"<idPkg:Preferences src="Resources/Preferences.xml"/>"#);
        for (id, visible) in &self.layers {
            xml.push_str(&format!(r#"<Layer Self="{id}" Name="{id}" Visible="{visible}"/>"#));
        }
        for (id, _) in &self.master_spreads {
            xml.push_str(&format!(r#"<idPkg:MasterSpread src="{}"/>"#, Self::master_spread_name(id)));
        }
        for (id, _) in &self.spreads {
            xml.push_str(&format!(r#"<idPkg:Spread src="{}"/>"#, Self::spread_name(id)));
        }
        for (id, _) in &self.stories {
            xml.push_str(&format!(r#"<idPkg:Story src="{}"/>"#, Self::story_name(id)));
        }
        xml.push_str("</Document>");
        xml
    }

    fn preferences(&self) -> String {
        let direction = self
            .story_direction
            .as_deref()
            .unwrap_or("LeftToRightDirection");
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><idPkg:Preferences xmlns:idPkg="{PACKAGING_NS}" DOMVersion="8.0"><StoryPreference OpticalMarginAlignment="false" StoryDirection="{direction}"/><XMLPreference DefaultStoryTagName="Story" DefaultTableTagName="Table" DefaultCellTagName="Cell"/></idPkg:Preferences>"#
        )
    }

    fn entries(&self) -> Vec<(String, String)> {
        let mut entries = vec![
            ("mimetype".to_string(), MIMETYPE.to_string()),
            ("designmap.xml".to_string(), self.design_map()),
            (
                "META-INF/container.xml".to_string(),
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><container xmlns="urn:oasis:names:tc:opendocument:xmlns:container" version="1.0"><rootfiles><rootfile full-path="designmap.xml" media-type="text/xml"/></rootfiles></container>"#.to_string(),
            ),
            ("Resources/Preferences.xml".to_string(), self.preferences()),
        ];
        for (id, items) in &self.master_spreads {
            entries.push((
                Self::master_spread_name(id),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><idPkg:MasterSpread xmlns:idPkg="{PACKAGING_NS}" DOMVersion="8.0"><MasterSpread Self="{id}" ItemTransform="1 0 0 1 0 0">{items}</MasterSpread></idPkg:MasterSpread>"#
                ),
            ));
        }
        for (id, items) in &self.spreads {
            entries.push((
                Self::spread_name(id),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><idPkg:Spread xmlns:idPkg="{PACKAGING_NS}" DOMVersion="8.0"><Spread Self="{id}" ItemTransform="1 0 0 1 0 0">{items}</Spread></idPkg:Spread>"#
                ),
            ));
        }
        for (id, xml) in &self.stories {
            entries.push((Self::story_name(id), xml.clone()));
        }
        entries.extend(self.extra.iter().cloned());

        if let Some(order) = &self.entry_order {
            entries.sort_by_key(|(name, _)| order.iter().position(|n| n == name).unwrap_or(usize::MAX));
        }
        entries
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, data) in self.entries() {
            let options = if name == "mimetype" { stored } else { deflated };
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

/// Entry names and contents of a written package, in archive order.
pub fn read_entries(data: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        entries.push((file.name().to_string(), content));
    }
    entries
}

/// Whether the entry called `name` is stored without compression.
pub fn is_stored(data: &[u8], name: &str) -> bool {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    let file = archive.by_name(name).unwrap();
    file.compression() == CompressionMethod::Stored
}
