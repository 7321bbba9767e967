use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::event::{Attribute, Declaration, EndTag, Instruction, MarkupEvent, StartTag};
use crate::error::{Error, Result};

/// Pull cursor over the bytes of one package part.
///
/// Empty elements are reported as a start tag flagged `self_closing` followed
/// by the matching end tag, and adjacent text and entity references are merged
/// into one [`MarkupEvent::Text`].
pub struct XmlCursor {
    reader: Reader<Cursor<Vec<u8>>>,
    buf: Vec<u8>,
    pending: VecDeque<MarkupEvent>,
    finished: bool,
    max_attribute_size: usize,
}

impl XmlCursor {
    pub fn new(mut data: Vec<u8>, max_attribute_size: usize) -> Self {
        if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
            data.drain(..3);
        }
        let mut reader = Reader::from_reader(Cursor::new(data));
        reader.config_mut().trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            finished: false,
            max_attribute_size,
        }
    }

    /// Next event, or `None` at the end of the part.
    pub fn next_event(&mut self) -> Result<Option<MarkupEvent>> {
        if self.pending.is_empty() && !self.finished {
            self.fill()?;
        }
        Ok(self.pending.pop_front())
    }

    pub fn peek_event(&mut self) -> Result<Option<&MarkupEvent>> {
        if self.pending.is_empty() && !self.finished {
            self.fill()?;
        }
        Ok(self.pending.front())
    }

    /// Next event; running out of input is an error.
    pub fn expect_event(&mut self, context: &str) -> Result<MarkupEvent> {
        self.next_event()?.ok_or_else(|| {
            Error::unexpected(format!("unexpected end of part inside <{context}>"))
        })
    }

    /// Drop whitespace-only text, comments and processing instructions.
    pub fn skip_insignificant(&mut self) -> Result<()> {
        while let Some(event) = self.peek_event()? {
            let skip = event.is_whitespace()
                || matches!(event, MarkupEvent::Comment(_) | MarkupEvent::Instruction(_));
            if !skip {
                break;
            }
            self.pending.pop_front();
        }
        Ok(())
    }

    /// Next start or end tag, skipping insignificant events in between.
    pub fn next_tag(&mut self, context: &str) -> Result<MarkupEvent> {
        self.skip_insignificant()?;
        match self.expect_event(context)? {
            event @ (MarkupEvent::Start(_) | MarkupEvent::End(_)) => Ok(event),
            other => Err(Error::unexpected(format!(
                "expected a tag inside <{context}>, found {other:?}"
            ))),
        }
    }

    /// Advance to the next start tag with the given name.
    pub fn find_start(&mut self, name: &str) -> Result<Option<StartTag>> {
        while let Some(event) = self.next_event()? {
            if let MarkupEvent::Start(start) = event
                && start.name == name
            {
                return Ok(Some(start));
            }
        }
        Ok(None)
    }

    fn fill(&mut self) -> Result<()> {
        let limit = self.max_attribute_size;
        let mut text: Option<String> = None;
        loop {
            self.buf.clear();
            let event = self.reader.read_event_into(&mut self.buf)?;
            match event {
                Event::Text(e) => {
                    let raw = std::str::from_utf8(&e)?;
                    text.get_or_insert_with(String::new)
                        .push_str(&unescape(raw)?);
                    continue;
                }
                Event::GeneralRef(e) => {
                    let name = std::str::from_utf8(&e)?;
                    let resolved = resolve_entity(name).ok_or_else(|| {
                        Error::Escape(format!("unknown entity reference &{name};"))
                    })?;
                    text.get_or_insert_with(String::new).push(resolved);
                    continue;
                }
                _ => {}
            }

            if let Some(text) = text.take() {
                self.pending.push_back(MarkupEvent::Text(text));
            }
            match event {
                Event::Start(e) => {
                    let start = start_tag(&e, false, limit)?;
                    self.pending.push_back(MarkupEvent::Start(start));
                }
                Event::Empty(e) => {
                    let start = start_tag(&e, true, limit)?;
                    let end = start.end_tag();
                    self.pending.push_back(MarkupEvent::Start(start));
                    self.pending.push_back(MarkupEvent::End(end));
                }
                Event::End(e) => {
                    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
                    self.pending.push_back(MarkupEvent::End(EndTag::new(name)));
                }
                Event::CData(e) => {
                    let raw = std::str::from_utf8(&e)?.to_string();
                    self.pending.push_back(MarkupEvent::CData(raw));
                }
                Event::Comment(e) => {
                    let raw = std::str::from_utf8(&e)?.to_string();
                    self.pending.push_back(MarkupEvent::Comment(raw));
                }
                Event::PI(e) => {
                    let target = std::str::from_utf8(e.target())?;
                    let content = std::str::from_utf8(e.content())?;
                    self.pending.push_back(MarkupEvent::Instruction(Instruction::new(
                        target,
                        content.trim_start(),
                    )));
                }
                Event::Decl(e) => {
                    let version = std::str::from_utf8(&e.version()?)?.to_string();
                    let encoding = match e.encoding() {
                        Some(value) => {
                            let value = value.map_err(quick_xml::Error::from)?;
                            Some(std::str::from_utf8(&value)?.to_string())
                        }
                        None => None,
                    };
                    let standalone = match e.standalone() {
                        Some(value) => {
                            let value = value.map_err(quick_xml::Error::from)?;
                            Some(std::str::from_utf8(&value)?.to_string())
                        }
                        None => None,
                    };
                    self.pending
                        .push_back(MarkupEvent::Declaration(Declaration {
                            version,
                            encoding,
                            standalone,
                        }));
                }
                Event::DocType(e) => {
                    let raw = std::str::from_utf8(&e)?.to_string();
                    self.pending.push_back(MarkupEvent::DocType(raw));
                }
                Event::Eof => self.finished = true,
                _ => continue,
            }
            return Ok(());
        }
    }
}

fn start_tag(e: &BytesStart<'_>, self_closing: bool, limit: usize) -> Result<StartTag> {
    let name = std::str::from_utf8(e.name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        if attr.value.len() > limit {
            return Err(Error::AttributeTooLarge {
                name: key.to_string(),
                size: attr.value.len(),
                limit,
            });
        }
        let raw = std::str::from_utf8(&attr.value)?;
        attributes.push(Attribute::new(key, unescape(raw)?.into_owned()));
    }
    Ok(StartTag {
        name,
        attributes,
        self_closing,
    })
}

fn unescape(raw: &str) -> Result<Cow<'_, str>> {
    quick_xml::escape::unescape(raw).map_err(|e| Error::Escape(e.to_string()))
}

fn resolve_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "apos" => return Some('\''),
        "quot" => return Some('"'),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()?
    } else {
        return None;
    };
    char::from_u32(code)
}
