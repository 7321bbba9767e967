//! Extraction tests over whole packages.
//!
//! Packages are assembled in memory; see `common::IdmlBuilder`.

mod common;

use common::{IdmlBuilder, LAYER, paragraph, text_frame, text_frame_with};
use idml_filter::extract::PartSkeleton;
use idml_filter::{Error, FilterConfig, FilterEvent, IdmlFilter, Package, TagType};

fn events(builder: &IdmlBuilder, config: FilterConfig) -> Vec<FilterEvent> {
    let package = Package::from_bytes(builder.build()).unwrap();
    IdmlFilter::open(package, config)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn sources(events: &[FilterEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(FilterEvent::as_text_unit)
        .map(|unit| unit.source.to_string())
        .collect()
}

/// Parts emitted as sub-documents, in order.
fn sub_documents(events: &[FilterEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            FilterEvent::StartSubDocument(start) => Some(start.part_name.clone()),
            _ => None,
        })
        .collect()
}

/// Parts copied as they are.
fn copied(events: &[FilterEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            FilterEvent::DocumentPart(part) => match &part.skeleton {
                PartSkeleton::ZipEntry(name) => Some(name.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn single_story(body: &str) -> IdmlBuilder {
    IdmlBuilder::new()
        .spread("s1", &[text_frame("tf1", "u1", 0.0, 0.0)])
        .story("u1", body)
}

// ============================================================================
// Event stream
// ============================================================================

#[test]
fn test_hello_world() {
    let events = events(&single_story(&paragraph("Hello world")), FilterConfig::default());

    assert!(matches!(events.first(), Some(FilterEvent::StartDocument(_))));
    assert!(matches!(events.last(), Some(FilterEvent::EndDocument { .. })));
    assert_eq!(sources(&events), vec!["Hello world"]);
    assert_eq!(sub_documents(&events), vec!["Stories/Story_u1.xml"]);
    assert_eq!(
        copied(&events),
        vec![
            "mimetype",
            "designmap.xml",
            "META-INF/container.xml",
            "Resources/Preferences.xml",
            "Spreads/Spread_s1.xml",
        ]
    );

    let ids: Vec<&str> = events
        .iter()
        .skip_while(|e| !matches!(e, FilterEvent::StartSubDocument(_)))
        .map(FilterEvent::id)
        .collect();
    assert_eq!(ids, vec!["1", "dp1", "dp2", "tu1", "dp3", "1", "sd"]);
}

#[test]
fn test_bold_scenario() {
    let events = events(
        &single_story(
            r#"<ParagraphStyleRange><CharacterStyleRange><Content>Hello </Content></CharacterStyleRange><CharacterStyleRange AppliedCharacterStyle="Bold"><Content>world</Content></CharacterStyleRange></ParagraphStyleRange>"#,
        ),
        FilterConfig::default(),
    );
    let unit = events.iter().find_map(FilterEvent::as_text_unit).unwrap();
    assert_eq!(unit.source.to_string(), "Hello <content-1>world</content-1>");
    assert_eq!(unit.source.text(), "Hello world");

    let codes: Vec<_> = unit.source.codes().collect();
    assert_eq!(codes.len(), 2);
    assert_eq!(codes[0].tag, TagType::Opening);
    assert_eq!(codes[0].code_type.to_string(), "x-bold");
    assert_eq!(codes[1].tag, TagType::Closing);
    assert_eq!(codes[1].id, codes[0].id);
}

#[test]
fn test_markup_footnote_is_placeholder() {
    let events = events(
        &single_story(
            "<ParagraphStyleRange><CharacterStyleRange><Content>Text</Content><Footnote><ParagraphStyleRange><CharacterStyleRange><Content><?ACE 4?></Content></CharacterStyleRange></ParagraphStyleRange></Footnote></CharacterStyleRange></ParagraphStyleRange>",
        ),
        FilterConfig::default(),
    );
    assert_eq!(sources(&events), vec!["Text<content-1/>"]);
    assert!(!events.iter().any(|e| matches!(e, FilterEvent::StartGroup(_))));
}

#[test]
fn test_footnote_with_text_is_group() {
    let events = events(
        &single_story(
            "<ParagraphStyleRange><CharacterStyleRange><Content>Text</Content><Footnote><ParagraphStyleRange><CharacterStyleRange><Content><?ACE 4?> See chapter two.</Content></CharacterStyleRange></ParagraphStyleRange></Footnote><Br/></CharacterStyleRange></ParagraphStyleRange>",
        ),
        FilterConfig::default(),
    );
    assert_eq!(
        sources(&events),
        vec!["Text<content-tu1_rg1-1/>", "<content-1/> See chapter two."]
    );
    let groups: Vec<&str> = events
        .iter()
        .filter(|e| matches!(e, FilterEvent::StartGroup(_)))
        .map(FilterEvent::id)
        .collect();
    assert_eq!(groups, vec!["tu1_rg1"]);
}

#[test]
fn test_break_only_run_is_document_part() {
    let events = events(
        &single_story(
            "<ParagraphStyleRange><CharacterStyleRange><Br/></CharacterStyleRange></ParagraphStyleRange>",
        ),
        FilterConfig::default(),
    );
    assert!(sources(&events).is_empty());
    assert_eq!(sub_documents(&events), vec!["Stories/Story_u1.xml"]);
}

#[test]
fn test_table_cells() {
    let events = events(
        &single_story(
            r#"<ParagraphStyleRange><CharacterStyleRange><Table Self="t1" HeaderRowCount="0" BodyRowCount="1" ColumnCount="2"><Row Self="t1r0" Name="0"/><Column Self="t1c0" Name="0"/><Column Self="t1c1" Name="1"/><Cell Self="t1i0" Name="0:0"><ParagraphStyleRange><CharacterStyleRange><Content>Left</Content></CharacterStyleRange></ParagraphStyleRange></Cell><Cell Self="t1i1" Name="1:0"><ParagraphStyleRange><CharacterStyleRange><Content>Right</Content></CharacterStyleRange></ParagraphStyleRange></Cell></Table><Br/></CharacterStyleRange></ParagraphStyleRange>"#,
        ),
        FilterConfig::default(),
    );
    assert_eq!(
        sources(&events),
        vec!["<content-tu1_rg1-1/>", "Left", "Right"]
    );
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_notes_toggle() {
    let builder = single_story(
        "<ParagraphStyleRange><CharacterStyleRange><Content>Text</Content><Note><ParagraphStyleRange><CharacterStyleRange><Content>Check this</Content></CharacterStyleRange></ParagraphStyleRange></Note></CharacterStyleRange></ParagraphStyleRange>",
    );

    let skipped = events(&builder, FilterConfig::default());
    assert_eq!(sources(&skipped), vec!["Text<content-1/>"]);

    let extracted = events(&builder, FilterConfig::default().with_extract_notes(true));
    assert_eq!(
        sources(&extracted),
        vec!["Text<content-tu1_rg1-1/>", "Check this"]
    );
}

#[test]
fn test_discretionary_hyphens() {
    let builder = single_story(&paragraph("hy\u{00AD}phen"));

    let kept = events(&builder, FilterConfig::default());
    assert_eq!(sources(&kept), vec!["hy<content-1/>phen"]);

    let skipped = events(
        &builder,
        FilterConfig::default().with_skip_discretionary_hyphens(true),
    );
    assert_eq!(sources(&skipped), vec!["hyphen"]);
}

#[test]
fn test_hidden_layers() {
    let builder = IdmlBuilder::new()
        .layer("hidden", false)
        .spread(
            "s1",
            &[
                text_frame("tf1", "u1", 0.0, 0.0),
                text_frame_with("tf2", "u2", 0.0, 200.0, r#"ItemLayer="hidden""#),
            ],
        )
        .story("u1", &paragraph("Shown"))
        .story("u2", &paragraph("Hidden"));

    let events_default = events(&builder, FilterConfig::default());
    assert_eq!(sources(&events_default), vec!["Shown"]);
    assert!(copied(&events_default).contains(&"Stories/Story_u2.xml".to_string()));

    let all = events(&builder, FilterConfig::default().with_extract_hidden_layers(true));
    assert_eq!(sources(&all), vec!["Shown", "Hidden"]);
}

#[test]
fn test_hidden_items() {
    let builder = IdmlBuilder::new()
        .spread(
            "s1",
            &[
                text_frame("tf1", "u1", 0.0, 0.0),
                text_frame_with("tf2", "u2", 0.0, 200.0, r#"Visible="false""#),
            ],
        )
        .story("u1", &paragraph("Shown"))
        .story("u2", &paragraph("Hidden"));

    let events = events(&builder, FilterConfig::default().with_extract_hidden_layers(true));
    assert_eq!(sources(&events), vec!["Shown"]);
    assert!(copied(&events).contains(&"Stories/Story_u2.xml".to_string()));
}

#[test]
fn test_master_spreads() {
    let builder = IdmlBuilder::new()
        .master_spread("m1", &[text_frame("mf1", "u2", 0.0, 0.0)])
        .spread("s1", &[text_frame("tf1", "u1", 0.0, 0.0)])
        .story("u1", &paragraph("Body"))
        .story("u2", &paragraph("Running head"));

    let with_masters = events(&builder, FilterConfig::default());
    assert_eq!(sources(&with_masters), vec!["Running head", "Body"]);
    assert_eq!(
        sub_documents(&with_masters),
        vec!["Stories/Story_u2.xml", "Stories/Story_u1.xml"]
    );

    let without = events(
        &builder,
        FilterConfig::default().with_extract_master_spreads(false),
    );
    assert_eq!(sources(&without), vec!["Body"]);
    assert!(copied(&without).contains(&"Stories/Story_u2.xml".to_string()));
}

// ============================================================================
// Reading order
// ============================================================================

#[test]
fn test_reading_order_follows_direction() {
    let builder = IdmlBuilder::new()
        .spread(
            "s1",
            &[
                text_frame("right", "u1", 200.0, 0.0),
                text_frame("left", "u2", 0.0, 0.0),
                text_frame("below", "u3", 0.0, 300.0),
            ],
        )
        .story("u1", &paragraph("right"))
        .story("u2", &paragraph("left"))
        .story("u3", &paragraph("below"))
        .story("u4", &paragraph("unplaced"));

    let ltr = events(&builder, FilterConfig::default());
    assert_eq!(sources(&ltr), vec!["left", "right", "below", "unplaced"]);

    let rtl = events(
        &builder.clone().story_direction("RightToLeftDirection"),
        FilterConfig::default(),
    );
    assert_eq!(sources(&rtl), vec!["right", "left", "below", "unplaced"]);
}

#[test]
fn test_explicit_item_layer() {
    let builder = IdmlBuilder::new()
        .spread("s1", &[text_frame_with("tf1", "u1", 0.0, 0.0, &format!(r#"ItemLayer="{LAYER}""#))])
        .story("u1", &paragraph("explicit"));
    assert_eq!(sources(&events(&builder, FilterConfig::default())), vec!["explicit"]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_mimetype() {
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("designmap.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<Document/>").unwrap();
    let data = zip.finish().unwrap().into_inner();

    assert!(matches!(
        Package::from_bytes(data),
        Err(Error::InvalidPackage(_))
    ));
}

#[test]
fn test_mimetype_not_first() {
    let builder = IdmlBuilder::new()
        .spread("s1", &[text_frame("tf1", "u1", 0.0, 0.0)])
        .story("u1", &paragraph("late"))
        .entry_order(&["designmap.xml", "mimetype"]);
    assert!(matches!(
        Package::from_bytes(builder.build()),
        Err(Error::InvalidPackage(_))
    ));
}

#[test]
fn test_unknown_layer() {
    let builder = IdmlBuilder::new()
        .spread("s1", &[text_frame_with("tf1", "u1", 0.0, 0.0, r#"ItemLayer="nowhere""#)])
        .story("u1", &paragraph("lost"));
    let package = Package::from_bytes(builder.build()).unwrap();
    assert!(matches!(
        IdmlFilter::open(package, FilterConfig::default()),
        Err(Error::UnknownLayer(_))
    ));
}

#[test]
fn test_unterminated_story_stops_iteration() {
    let builder = IdmlBuilder::new()
        .spread("s1", &[text_frame("tf1", "u1", 0.0, 0.0)])
        .story("u1", "<ParagraphStyleRange><CharacterStyleRange><Content>never closed");
    let package = Package::from_bytes(builder.build()).unwrap();
    let results: Vec<_> = IdmlFilter::open(package, FilterConfig::default())
        .unwrap()
        .collect();
    assert!(results.last().is_some_and(|r| r.is_err()));
}
