use quick_xml::escape::{escape, partial_escape};

use super::event::MarkupEvent;

/// Serialize events to an XML string.
///
/// A start tag flagged `self_closing` that is immediately followed by its end
/// tag is written in the empty form again.
pub fn events_to_string(events: &[MarkupEvent]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            MarkupEvent::Declaration(decl) => {
                out.push_str("<?xml version=\"");
                out.push_str(&decl.version);
                out.push('"');
                if let Some(encoding) = &decl.encoding {
                    out.push_str(" encoding=\"");
                    out.push_str(encoding);
                    out.push('"');
                }
                if let Some(standalone) = &decl.standalone {
                    out.push_str(" standalone=\"");
                    out.push_str(standalone);
                    out.push('"');
                }
                out.push_str("?>");
            }
            MarkupEvent::Start(start) => {
                out.push('<');
                out.push_str(&start.name);
                for attr in &start.attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape(attr.value.as_str()));
                    out.push('"');
                }
                let closes_next = start.self_closing
                    && matches!(events.get(i + 1), Some(MarkupEvent::End(end)) if end.name == start.name);
                if closes_next {
                    out.push_str("/>");
                    i += 1;
                } else {
                    out.push('>');
                }
            }
            MarkupEvent::End(end) => {
                out.push_str("</");
                out.push_str(&end.name);
                out.push('>');
            }
            MarkupEvent::Text(text) => out.push_str(&partial_escape(text.as_str())),
            MarkupEvent::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
            MarkupEvent::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            MarkupEvent::Instruction(pi) => {
                out.push_str("<?");
                out.push_str(&pi.target);
                if !pi.data.is_empty() {
                    out.push(' ');
                    out.push_str(&pi.data);
                }
                out.push_str("?>");
            }
            MarkupEvent::DocType(doctype) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype.trim_start());
                out.push('>');
            }
        }
        i += 1;
    }
    out
}

pub fn events_to_bytes(events: &[MarkupEvent]) -> Vec<u8> {
    events_to_string(events).into_bytes()
}
