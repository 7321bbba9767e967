use std::collections::BTreeMap;
use std::mem;

use super::code::{Code, CodeType};
use super::event::{CodeObject, DocumentPart, FilterEvent, PartSkeleton, TextUnit, TextUnitSkeleton};
use super::fragment::TextFragment;
use super::ids::IdGenerator;
use super::referents;
use super::special::{InstructionKind, SpecialCharacter, SpecialCharacterKind};
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::markup::MarkupEvent;
use crate::story::{ReferenceKind, StoryChildElement, StyledElement};
use crate::style::StyleDefinitions;

const DOCUMENT_PART: &str = "dp";
const TEXT_UNIT: &str = "tu";
const REFERENT_GROUP: &str = "rg";

/// Turns runs of story elements into document parts and text units, with
/// ids drawn from one scope (a story, or one referent group).
pub(crate) struct RunMapper {
    config: FilterConfig,
    document_parts: IdGenerator,
    text_units: IdGenerator,
}

impl RunMapper {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            document_parts: IdGenerator::new(DOCUMENT_PART),
            text_units: IdGenerator::new(TEXT_UNIT),
        }
    }

    pub fn with_root(config: FilterConfig, root: &str) -> Self {
        Self {
            config,
            document_parts: IdGenerator::with_root(root, DOCUMENT_PART),
            text_units: IdGenerator::with_root(root, TEXT_UNIT),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn document_part(&mut self, skeleton: PartSkeleton) -> FilterEvent {
        FilterEvent::DocumentPart(DocumentPart {
            id: self.document_parts.create_id(),
            skeleton,
        })
    }

    /// Split `elements` into runs ending at a break and map each one.
    pub fn map_elements(&mut self, elements: &[StoryChildElement]) -> Result<Vec<FilterEvent>> {
        let mut events = Vec::new();
        let mut run = Vec::new();
        for element in elements {
            self.push_element(element.clone(), &mut run, &mut events)?;
        }
        if !run.is_empty() {
            events.extend(self.map_run(run)?);
        }
        Ok(events)
    }

    /// Add `element` to the open `run`, mapping the run once a break ends
    /// it. Unstyled markup ends the run and becomes a part of its own.
    pub fn push_element(
        &mut self,
        element: StoryChildElement,
        run: &mut Vec<StoryChildElement>,
        events: &mut Vec<FilterEvent>,
    ) -> Result<()> {
        if let StoryChildElement::Markup(_) = element {
            if !run.is_empty() {
                events.extend(self.map_run(mem::take(run))?);
            }
            events.push(self.document_part(PartSkeleton::Elements(vec![element])));
            return Ok(());
        }
        let is_break = element.is_break();
        run.push(element);
        if is_break {
            events.extend(self.map_run(mem::take(run))?);
        }
        Ok(())
    }

    /// Map one run: a text unit followed by the groups it references, or a
    /// single document part when the run has nothing to translate.
    pub fn map_run(&mut self, run: Vec<StoryChildElement>) -> Result<Vec<FilterEvent>> {
        let text_unit_id = self.text_units.peek_id();
        let mut mapper = TextUnitMapper::new(&self.config, &text_unit_id);
        let mut fragment = TextFragment::new();
        let translatable = mapper.assemble(&run, &mut fragment, 0)?;

        if !translatable && mapper.referent_events.is_empty() {
            return Ok(vec![FilterEvent::DocumentPart(DocumentPart {
                id: self.document_parts.create_id(),
                skeleton: PartSkeleton::Elements(run),
            })]);
        }

        self.text_units.create_id();
        let break_element = run.iter().find(|e| e.is_break()).cloned();
        let mut events = Vec::with_capacity(1 + mapper.referent_events.len());
        events.push(FilterEvent::TextUnit(TextUnit {
            id: text_unit_id,
            source: fragment,
            target: None,
            skeleton: TextUnitSkeleton {
                break_element,
                code_map: mapper.code_map,
                ambient: mapper.ambient,
            },
        }));
        events.extend(mapper.referent_events);
        Ok(events)
    }
}

/// A code opened for a style change or a hyperlink and not yet closed.
struct OpenCode {
    id: u32,
    code_type: CodeType,
    styles: StyleDefinitions,
}

/// Builds the coded text of one run.
struct TextUnitMapper<'a> {
    config: &'a FilterConfig,
    referent_ids: IdGenerator,
    next_code_id: u32,
    open: Vec<OpenCode>,
    code_map: BTreeMap<u32, CodeObject>,
    referent_events: Vec<FilterEvent>,
    ambient: Option<StyleDefinitions>,
}

impl<'a> TextUnitMapper<'a> {
    fn new(config: &'a FilterConfig, text_unit_id: &str) -> Self {
        Self {
            config,
            referent_ids: IdGenerator::with_root(text_unit_id, REFERENT_GROUP),
            next_code_id: 1,
            open: Vec::new(),
            code_map: BTreeMap::new(),
            referent_events: Vec::new(),
            ambient: None,
        }
    }

    /// Append `elements` to `fragment`. `depth` is the number of codes that
    /// belong to enclosing hyperlinks and must stay open. Returns whether
    /// any translatable text was added.
    fn assemble(
        &mut self,
        elements: &[StoryChildElement],
        fragment: &mut TextFragment,
        depth: usize,
    ) -> Result<bool> {
        let mut translatable = false;
        for element in elements {
            match element {
                StoryChildElement::Break(_) if depth == 0 => break,
                StoryChildElement::Reference(reference)
                    if reference.kind == ReferenceKind::HyperlinkTextSource =>
                {
                    translatable |= self.add_hyperlink(element, fragment, depth)?;
                }
                StoryChildElement::Reference(reference)
                    if reference.kind == ReferenceKind::Note && !self.config.extract_notes =>
                {
                    self.add_isolated(element, fragment);
                }
                StoryChildElement::Reference(_) | StoryChildElement::Table(_) => {
                    self.add_referent(element, fragment)?;
                }
                StoryChildElement::Content(content) => {
                    translatable |= self.add_content(content, fragment, depth)?;
                }
                _ => self.add_isolated(element, fragment),
            }
        }
        self.close_to_depth(fragment, depth);
        Ok(translatable)
    }

    /// A hyperlink source stays inline: its content sits between an opening
    /// and a closing link code.
    fn add_hyperlink(
        &mut self,
        element: &StoryChildElement,
        fragment: &mut TextFragment,
        depth: usize,
    ) -> Result<bool> {
        let StoryChildElement::Reference(reference) = element else {
            return Ok(false);
        };
        let styles = reference.styles.clone().unwrap_or_default();
        self.close_codes(&styles, depth, fragment);

        let id = self.next_id();
        fragment.push_code(Code::opening(id, CodeType::Link));
        self.code_map
            .insert(id, CodeObject::Hyperlink(reference.without_children()));
        self.open.push(OpenCode {
            id,
            code_type: CodeType::Link,
            styles,
        });

        let translatable = self.assemble(&reference.children, fragment, self.open.len())?;
        if let Some(open) = self.open.pop() {
            fragment.push_code(Code::closing(open.id, open.code_type));
        }
        Ok(translatable)
    }

    /// Footnotes, extracted notes and tables become groups of their own,
    /// referenced by a placeholder. Without translatable text inside they
    /// stay a plain placeholder.
    fn add_referent(&mut self, element: &StoryChildElement, fragment: &mut TextFragment) -> Result<()> {
        let group_id = self.referent_ids.peek_id();
        let events = referents::accumulate(element, &group_id, self.config)?;
        if !events.iter().any(|event| matches!(event, FilterEvent::TextUnit(_))) {
            self.add_isolated(element, fragment);
            return Ok(());
        }

        self.referent_ids.create_id();
        let id = self.next_id();
        fragment.push_code(Code::reference(id, CodeType::for_element(element), group_id.clone()));
        self.code_map.insert(id, CodeObject::Referent { group_id });
        self.referent_events.extend(events);
        Ok(())
    }

    fn add_content(
        &mut self,
        content: &StyledElement,
        fragment: &mut TextFragment,
        depth: usize,
    ) -> Result<bool> {
        let styles = &content.styles;
        self.close_codes(styles, depth, fragment);

        // Text outside every code takes the ambient style on merge, so a
        // code is needed whenever the style differs from what encloses it.
        let distinct = match self.open.last() {
            Some(open) => open.styles != *styles,
            None => self
                .ambient
                .as_ref()
                .map_or(!styles.is_default(), |ambient| ambient != styles),
        };

        if distinct {
            let id = self.next_id();
            let code_type = CodeType::for_styles(styles);
            fragment.push_code(Code::opening(id, code_type));
            self.code_map.insert(id, CodeObject::Styles(styles.clone()));
            self.open.push(OpenCode {
                id,
                code_type,
                styles: styles.clone(),
            });
        } else if self.open.is_empty() && self.ambient.is_none() {
            self.ambient = Some(styles.clone());
        }

        let mut translatable = false;
        for event in &content.element.inner {
            match event {
                MarkupEvent::Text(text) | MarkupEvent::CData(text) => {
                    translatable |= self.add_text(text, fragment);
                }
                MarkupEvent::Instruction(instruction) => {
                    let id = self.next_id();
                    let kind = InstructionKind::from_instruction(instruction);
                    fragment.push_code(Code::placeholder(id, CodeType::Instruction(kind)));
                    self.code_map.insert(
                        id,
                        CodeObject::SpecialCharacter(SpecialCharacter::Instruction(instruction.clone())),
                    );
                }
                other => {
                    return Err(Error::unexpected(format!(
                        "unexpected {other:?} inside <{}>",
                        content.element.name()
                    )));
                }
            }
        }
        Ok(translatable)
    }

    fn add_text(&mut self, text: &str, fragment: &mut TextFragment) -> bool {
        let mut translatable = false;
        for c in text.chars() {
            match SpecialCharacterKind::from_char(c) {
                Some(SpecialCharacterKind::DiscretionaryHyphen)
                    if self.config.skip_discretionary_hyphens => {}
                Some(kind) => {
                    let id = self.next_id();
                    fragment.push_code(Code::placeholder(id, CodeType::Special(kind)));
                    self.code_map.insert(
                        id,
                        CodeObject::SpecialCharacter(SpecialCharacter::Character(kind)),
                    );
                }
                None => {
                    translatable |= !c.is_whitespace();
                    fragment.push_char(c);
                }
            }
        }
        translatable
    }

    fn add_isolated(&mut self, element: &StoryChildElement, fragment: &mut TextFragment) {
        let id = self.next_id();
        fragment.push_code(Code::placeholder(id, CodeType::for_element(element)));
        self.code_map.insert(id, CodeObject::Element(element.clone()));
    }

    /// Close codes above `depth` until the innermost one is a subset of
    /// `styles` and can stay open around the new text.
    fn close_codes(&mut self, styles: &StyleDefinitions, depth: usize, fragment: &mut TextFragment) {
        while self.open.len() > depth {
            match self.open.last() {
                Some(open) if !open.styles.is_subset_of(styles) => {
                    fragment.push_code(Code::closing(open.id, open.code_type));
                    self.open.pop();
                }
                _ => break,
            }
        }
    }

    fn close_to_depth(&mut self, fragment: &mut TextFragment, depth: usize) {
        while self.open.len() > depth {
            if let Some(open) = self.open.pop() {
                fragment.push_code(Code::closing(open.id, open.code_type));
            }
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_code_id;
        self.next_code_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Span, TagType};
    use crate::markup::XmlCursor;
    use crate::story::StoryParser;

    fn parse(story: &str, config: &FilterConfig) -> Vec<StoryChildElement> {
        let xml = format!("<Story>{story}</Story>");
        let mut cursor = XmlCursor::new(xml.into_bytes(), 4096);
        cursor.find_start("Story").unwrap();
        let mut parser = StoryParser::new(&mut cursor, config);
        let mut elements = Vec::new();
        loop {
            match parser.cursor().next_tag("Story").unwrap() {
                MarkupEvent::Start(start) => elements.extend(parser.parse_child(start).unwrap()),
                _ => break,
            }
        }
        elements
    }

    fn extract(story: &str, config: &FilterConfig) -> Vec<FilterEvent> {
        let elements = parse(story, config);
        RunMapper::new(config.clone()).map_elements(&elements).unwrap()
    }

    fn text_unit(event: &FilterEvent) -> &TextUnit {
        event.as_text_unit().expect("expected a text unit")
    }

    #[test]
    fn test_plain_text() {
        let events = extract(
            "<ParagraphStyleRange><CharacterStyleRange><Content>Hello world</Content><Br/></CharacterStyleRange></ParagraphStyleRange>",
            &FilterConfig::default(),
        );
        assert_eq!(events.len(), 1);
        let unit = text_unit(&events[0]);
        assert_eq!(unit.id, "tu1");
        assert_eq!(unit.source.to_string(), "Hello world");
        assert!(unit.skeleton.break_element.is_some());
        assert!(unit.skeleton.ambient.is_some());
    }

    #[test]
    fn test_bold_opens_code() {
        let events = extract(
            r#"<ParagraphStyleRange><CharacterStyleRange><Content>Hello </Content></CharacterStyleRange><CharacterStyleRange AppliedCharacterStyle="Bold"><Content>world</Content></CharacterStyleRange></ParagraphStyleRange>"#,
            &FilterConfig::default(),
        );
        let unit = text_unit(&events[0]);
        let spans = unit.source.spans();
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0], Span::Text("Hello ".to_string()));
        let Span::Code(open) = &spans[1] else {
            panic!("expected code");
        };
        assert_eq!(open.tag, TagType::Opening);
        assert_eq!(open.id, 1);
        assert_eq!(open.code_type.to_string(), "x-bold");
        assert_eq!(spans[2], Span::Text("world".to_string()));
        let Span::Code(close) = &spans[3] else {
            panic!("expected code");
        };
        assert_eq!(close.tag, TagType::Closing);
        assert_eq!(close.id, 1);
    }

    #[test]
    fn test_nested_styles_share_codes() {
        let events = extract(
            r#"<ParagraphStyleRange AppliedParagraphStyle="P"><CharacterStyleRange FontStyle="Bold"><Content>a</Content></CharacterStyleRange><CharacterStyleRange FontStyle="Bold" Underline="true"><Content>b</Content></CharacterStyleRange><CharacterStyleRange FontStyle="Bold"><Content>c</Content></CharacterStyleRange></ParagraphStyleRange>"#,
            &FilterConfig::default(),
        );
        let unit = text_unit(&events[0]);
        assert_eq!(
            unit.source.to_string(),
            "<content-1>a<content-2>b</content-2>c</content-1>"
        );
    }

    #[test]
    fn test_codes_pair_up() {
        let events = extract(
            r#"<ParagraphStyleRange AppliedParagraphStyle="P"><CharacterStyleRange FontStyle="Bold"><Content>a</Content></CharacterStyleRange><CharacterStyleRange FontStyle="Italic"><Content>b</Content></CharacterStyleRange><CharacterStyleRange><Content>c</Content></CharacterStyleRange></ParagraphStyleRange>"#,
            &FilterConfig::default(),
        );
        let unit = text_unit(&events[0]);
        let mut open = Vec::new();
        for code in unit.source.codes() {
            match code.tag {
                TagType::Opening => open.push(code.id),
                TagType::Closing => assert_eq!(open.pop(), Some(code.id)),
                TagType::Placeholder => {}
            }
        }
        assert!(open.is_empty());
    }

    #[test]
    fn test_special_characters() {
        let story = "<ParagraphStyleRange><CharacterStyleRange><Content>a\u{00A0}b\u{00AD}c<?ACE 18?></Content></CharacterStyleRange></ParagraphStyleRange>";
        let events = extract(story, &FilterConfig::default());
        let unit = text_unit(&events[0]);
        assert_eq!(unit.source.text(), "abc");
        let types: Vec<String> = unit.source.codes().map(|c| c.code_type.to_string()).collect();
        assert_eq!(
            types,
            vec!["x-nonbreaking-space", "x-discretionary-hyphen", "x-auto-page-number"]
        );

        let config = FilterConfig::default().with_skip_discretionary_hyphens(true);
        let events = extract(story, &config);
        assert_eq!(text_unit(&events[0]).source.codes().count(), 2);
    }

    #[test]
    fn test_break_only_run_is_document_part() {
        let events = extract(
            "<ParagraphStyleRange><CharacterStyleRange><Br/></CharacterStyleRange></ParagraphStyleRange>",
            &FilterConfig::default(),
        );
        assert_eq!(events.len(), 1);
        let FilterEvent::DocumentPart(part) = &events[0] else {
            panic!("expected document part");
        };
        assert_eq!(part.id, "dp1");
        assert!(matches!(&part.skeleton, PartSkeleton::Elements(elements) if elements.len() == 1));
    }

    #[test]
    fn test_runs_split_at_breaks() {
        let events = extract(
            "<ParagraphStyleRange><CharacterStyleRange><Content>one</Content><Br/><Content>two</Content></CharacterStyleRange></ParagraphStyleRange>",
            &FilterConfig::default(),
        );
        let ids: Vec<&str> = events.iter().map(FilterEvent::id).collect();
        assert_eq!(ids, vec!["tu1", "tu2"]);
        assert!(text_unit(&events[1]).skeleton.break_element.is_none());
    }

    #[test]
    fn test_markup_footnote_collapses() {
        let events = extract(
            "<ParagraphStyleRange><CharacterStyleRange><Content>Text</Content><Footnote><ParagraphStyleRange><CharacterStyleRange><Content><?ACE 4?></Content></CharacterStyleRange></ParagraphStyleRange></Footnote></CharacterStyleRange></ParagraphStyleRange>",
            &FilterConfig::default(),
        );
        assert_eq!(events.len(), 1);
        let unit = text_unit(&events[0]);
        let codes: Vec<&Code> = unit.source.codes().collect();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[0].tag, TagType::Placeholder);
        assert!(!codes[0].is_reference());
        assert_eq!(codes[0].code_type, CodeType::FootnoteRef);
    }

    #[test]
    fn test_footnote_becomes_group() {
        let events = extract(
            "<ParagraphStyleRange><CharacterStyleRange><Content>Text</Content><Footnote><ParagraphStyleRange><CharacterStyleRange><Content><?ACE 4?>Note text</Content></CharacterStyleRange></ParagraphStyleRange></Footnote></CharacterStyleRange></ParagraphStyleRange>",
            &FilterConfig::default(),
        );
        let ids: Vec<&str> = events.iter().map(FilterEvent::id).collect();
        assert_eq!(ids, vec!["tu1", "tu1_rg1", "tu1_rg1_tu1", "tu1_rg1"]);
        assert!(matches!(events[1], FilterEvent::StartGroup(_)));
        assert!(matches!(events[3], FilterEvent::EndGroup { .. }));

        let unit = text_unit(&events[0]);
        assert_eq!(unit.source.to_string(), "Text<content-tu1_rg1-1/>");
        assert!(unit.references("tu1_rg1"));
        assert_eq!(text_unit(&events[2]).source.text(), "Note text");
    }

    #[test]
    fn test_notes_toggle() {
        let story = "<ParagraphStyleRange><CharacterStyleRange><Content>Text</Content><Note><ParagraphStyleRange><CharacterStyleRange><Content>remark</Content></CharacterStyleRange></ParagraphStyleRange></Note></CharacterStyleRange></ParagraphStyleRange>";
        let events = extract(story, &FilterConfig::default());
        assert_eq!(events.len(), 1);
        assert_eq!(text_unit(&events[0]).source.codes().next().map(|c| c.code_type), Some(CodeType::NoteRef));

        let events = extract(story, &FilterConfig::default().with_extract_notes(true));
        assert_eq!(events.len(), 4);
        assert_eq!(text_unit(&events[2]).source.text(), "remark");
    }

    #[test]
    fn test_table_cells_nest_groups() {
        let events = extract(
            r#"<ParagraphStyleRange><CharacterStyleRange><Table Self="t"><Row Self="r" Name="0"/><Column Self="c" Name="0"/><Cell Self="c1" Name="0:0"><ParagraphStyleRange><CharacterStyleRange><Content>cell</Content></CharacterStyleRange></ParagraphStyleRange></Cell><Cell Self="c2" Name="1:0"/></Table><Br/></CharacterStyleRange></ParagraphStyleRange>"#,
            &FilterConfig::default(),
        );
        let ids: Vec<&str> = events.iter().map(FilterEvent::id).collect();
        assert_eq!(
            ids,
            vec![
                "tu1",
                "tu1_rg1",
                "tu1_rg1_rg1",
                "tu1_rg1_rg1_tu1",
                "tu1_rg1_rg1",
                "tu1_rg1_rg2",
                "tu1_rg1_rg2",
                "tu1_rg1",
            ]
        );
        let unit = text_unit(&events[0]);
        assert_eq!(unit.source.to_string(), "<content-tu1_rg1-1/>");
    }

    #[test]
    fn test_hyperlink_is_inline() {
        let events = extract(
            r#"<ParagraphStyleRange><CharacterStyleRange><Content>see </Content><HyperlinkTextSource Self="h"><Content>here</Content></HyperlinkTextSource><Br/></CharacterStyleRange></ParagraphStyleRange>"#,
            &FilterConfig::default(),
        );
        assert_eq!(events.len(), 1);
        let unit = text_unit(&events[0]);
        assert_eq!(unit.source.to_string(), "see <content-1>here</content-1>");
        assert_eq!(unit.source.codes().next().map(|c| c.code_type), Some(CodeType::Link));
    }

    #[test]
    fn test_markup_splits_runs() {
        let elements = vec![StoryChildElement::Markup(crate::markup::MarkupRange::Element(
            crate::markup::Element::new(crate::markup::StartTag::new("StoryPreference"), Vec::new()),
        ))];
        let events = RunMapper::new(FilterConfig::default())
            .map_elements(&elements)
            .unwrap();
        assert!(matches!(&events[0], FilterEvent::DocumentPart(part) if part.id == "dp1"));
    }
}
