use std::fmt;

use super::code::Code;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Code(Code),
}

/// Coded text: literal text interleaved with inline codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFragment {
    spans: Vec<Span>,
}

impl TextFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Span::Text(last)) = self.spans.last_mut() {
            last.push_str(text);
        } else {
            self.spans.push(Span::Text(text.to_string()));
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(Span::Text(last)) = self.spans.last_mut() {
            last.push(c);
        } else {
            self.spans.push(Span::Text(c.to_string()));
        }
    }

    pub fn push_code(&mut self, code: Code) {
        self.spans.push(Span::Code(code));
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn codes(&self) -> impl Iterator<Item = &Code> {
        self.spans.iter().filter_map(|span| match span {
            Span::Code(code) => Some(code),
            Span::Text(_) => None,
        })
    }

    /// Literal text without codes.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .filter_map(|span| match span {
                Span::Text(text) => Some(text.as_str()),
                Span::Code(_) => None,
            })
            .collect()
    }

    /// Whether the fragment holds any non-whitespace literal text.
    pub fn has_text(&self) -> bool {
        self.text().chars().any(|c| !c.is_whitespace())
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Renders codes by their data, e.g. `Hello <content-1>world</content-1>`.
impl fmt::Display for TextFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            match span {
                Span::Text(text) => f.write_str(text)?,
                Span::Code(code) => f.write_str(&code.data)?,
            }
        }
        Ok(())
    }
}
