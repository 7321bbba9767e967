use std::collections::VecDeque;
use std::mem;

use super::RunMapper;
use super::event::{FilterEvent, PartSkeleton, StartSubDocument};
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::markup::{MarkupEvent, MarkupRange, XmlCursor};
use crate::story::{STORY, StoryChildElement, StoryParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Start,
    Header,
    Children,
    Done,
}

/// Events of one translatable story part, produced as the part is read.
///
/// The markup up to and including the `Story` start tag becomes the first
/// document part and everything from the `Story` end tag on becomes the
/// last. Children in between are grouped into runs ending at a break.
pub(crate) struct StorySubDocument {
    id: String,
    part_name: String,
    cursor: XmlCursor,
    mapper: RunMapper,
    stage: Stage,
    run: Vec<StoryChildElement>,
    pending: VecDeque<FilterEvent>,
    story_markup_tag: Option<String>,
}

impl StorySubDocument {
    pub fn new(id: String, part_name: String, data: Vec<u8>, config: &FilterConfig) -> Self {
        Self {
            id,
            part_name,
            cursor: XmlCursor::new(data, config.max_attribute_size),
            mapper: RunMapper::new(config.clone()),
            stage: Stage::Start,
            run: Vec::new(),
            pending: VecDeque::new(),
            story_markup_tag: None,
        }
    }

    pub fn with_story_markup_tag(mut self, tag: Option<String>) -> Self {
        self.story_markup_tag = tag;
        self
    }

    fn advance(&mut self) -> Result<()> {
        match self.stage {
            Stage::Start => {
                log::debug!("opening story {} as sub-document {}", self.part_name, self.id);
                self.pending.push_back(FilterEvent::StartSubDocument(StartSubDocument {
                    id: self.id.clone(),
                    part_name: self.part_name.clone(),
                }));
                self.stage = Stage::Header;
            }
            Stage::Header => {
                let header = self.read_header()?;
                let part = self.mapper.document_part(PartSkeleton::Markup(header));
                self.pending.push_back(part);
                self.stage = Stage::Children;
            }
            Stage::Children => self.read_child()?,
            Stage::Done => {}
        }
        Ok(())
    }

    /// The prolog as one opaque range, then the `Story` start tag.
    fn read_header(&mut self) -> Result<Vec<MarkupRange>> {
        let mut prolog = Vec::new();
        while let Some(event) = self.cursor.next_event()? {
            match event {
                MarkupEvent::Start(start) if start.name == STORY => {
                    let mut header = Vec::with_capacity(2);
                    if !prolog.is_empty() {
                        header.push(MarkupRange::Opaque(prolog));
                    }
                    header.push(MarkupRange::Start(start));
                    return Ok(header);
                }
                event => prolog.push(event),
            }
        }
        Err(Error::unexpected(format!(
            "no <{STORY}> element in {}",
            self.part_name
        )))
    }

    fn read_child(&mut self) -> Result<()> {
        match self.cursor.next_tag(STORY)? {
            MarkupEvent::Start(start) => {
                let children = StoryParser::new(&mut self.cursor, self.mapper.config())
                    .with_story_markup_tag(self.story_markup_tag.as_deref())
                    .parse_child(start)?;
                let mut events = Vec::new();
                for child in children {
                    self.mapper.push_element(child, &mut self.run, &mut events)?;
                }
                self.pending.extend(events);
            }
            MarkupEvent::End(end) => {
                if !self.run.is_empty() {
                    let events = self.mapper.map_run(mem::take(&mut self.run))?;
                    self.pending.extend(events);
                }
                let mut epilog = Vec::new();
                while let Some(event) = self.cursor.next_event()? {
                    epilog.push(event);
                }
                let mut trailer = vec![MarkupRange::End(end)];
                if !epilog.is_empty() {
                    trailer.push(MarkupRange::Opaque(epilog));
                }
                let part = self.mapper.document_part(PartSkeleton::Markup(trailer));
                self.pending.push_back(part);
                self.pending.push_back(FilterEvent::EndSubDocument {
                    id: self.id.clone(),
                });
                log::debug!("closed story {}", self.part_name);
                self.stage = Stage::Done;
            }
            other => {
                return Err(Error::unexpected(format!(
                    "expected a tag inside <{STORY}>, found {other:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Iterator for StorySubDocument {
    type Item = Result<FilterEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.stage == Stage::Done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.stage = Stage::Done;
                return Some(Err(e));
            }
        }
    }
}
