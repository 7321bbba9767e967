use super::cursor::XmlCursor;
use super::event::{EndTag, MarkupEvent, StartTag};
use crate::error::Result;

/// A complete element captured verbatim: its start tag, every event nested
/// inside it, and its end tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub start: StartTag,
    pub inner: Vec<MarkupEvent>,
    pub end: EndTag,
}

impl Element {
    pub fn new(start: StartTag, inner: Vec<MarkupEvent>) -> Self {
        let end = start.end_tag();
        Self { start, inner, end }
    }

    /// Read the rest of the element whose start tag was just consumed.
    ///
    /// Nested elements with the same name are counted so that the range
    /// closes on the matching end tag.
    pub fn parse(start: StartTag, cursor: &mut XmlCursor) -> Result<Self> {
        let mut depth = 0usize;
        let mut inner = Vec::new();
        loop {
            match cursor.expect_event(&start.name)? {
                MarkupEvent::End(end) if end.name == start.name && depth == 0 => {
                    return Ok(Self { start, inner, end });
                }
                event => {
                    match &event {
                        MarkupEvent::Start(s) if s.name == start.name => depth += 1,
                        MarkupEvent::End(e) if e.name == start.name => depth -= 1,
                        _ => {}
                    }
                    inner.push(event);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.start.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.start.attribute(name)
    }

    pub fn write_events(&self, out: &mut Vec<MarkupEvent>) {
        out.push(MarkupEvent::Start(self.start.clone()));
        out.extend(self.inner.iter().cloned());
        out.push(MarkupEvent::End(self.end.clone()));
    }

    pub fn events(&self) -> Vec<MarkupEvent> {
        let mut out = Vec::with_capacity(self.inner.len() + 2);
        self.write_events(&mut out);
        out
    }

    /// Concatenated character data of the element.
    pub fn text(&self) -> String {
        self.inner
            .iter()
            .filter_map(|e| match e {
                MarkupEvent::Text(t) | MarkupEvent::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Start tags of every descendant with the given name, in document order.
    pub fn descendants<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StartTag> + 'a {
        self.inner.iter().filter_map(move |e| match e {
            MarkupEvent::Start(s) if s.name == name => Some(s),
            _ => None,
        })
    }
}

/// A span of markup kept verbatim.
///
/// Story headers and trailers cut across elements: the header ends with the
/// `<Story>` start tag and the trailer begins with its end tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupRange {
    /// Events with no element boundary of their own, such as the prolog.
    Opaque(Vec<MarkupEvent>),
    /// A start tag whose element closes in a later range.
    Start(StartTag),
    /// An end tag whose element opened in an earlier range.
    End(EndTag),
    Element(Element),
}

impl MarkupRange {
    /// Element name, or an empty string for opaque events.
    pub fn name(&self) -> &str {
        match self {
            MarkupRange::Opaque(_) => "",
            MarkupRange::Start(start) => &start.name,
            MarkupRange::End(end) => &end.name,
            MarkupRange::Element(element) => element.name(),
        }
    }

    pub fn write_events(&self, out: &mut Vec<MarkupEvent>) {
        match self {
            MarkupRange::Opaque(events) => out.extend(events.iter().cloned()),
            MarkupRange::Start(start) => out.push(MarkupEvent::Start(start.clone())),
            MarkupRange::End(end) => out.push(MarkupEvent::End(end.clone())),
            MarkupRange::Element(element) => element.write_events(out),
        }
    }
}

impl From<Element> for MarkupRange {
    fn from(element: Element) -> Self {
        MarkupRange::Element(element)
    }
}
