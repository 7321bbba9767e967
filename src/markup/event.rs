use crate::error::{Error, Result};

/// A single attribute. Values are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element start tag.
///
/// `self_closing` records that the tag was written as `<name/>`; the cursor
/// still reports a matching [`EndTag`] right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

impl StartTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn required_attribute(&self, name: &str) -> Result<&str> {
        self.attribute(name)
            .ok_or_else(|| Error::missing_attribute(&self.name, name))
    }

    /// Boolean attribute in the IDML `true`/`false` spelling.
    pub fn bool_attribute(&self, name: &str, default: bool) -> bool {
        match self.attribute(name) {
            Some(value) => value == "true",
            None => default,
        }
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Same tag, forced to the open form so content can follow it.
    pub fn opened(&self) -> StartTag {
        StartTag {
            self_closing: false,
            ..self.clone()
        }
    }

    pub fn end_tag(&self) -> EndTag {
        EndTag::new(self.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag {
    pub name: String,
}

impl EndTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The `<?xml ...?>` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A processing instruction such as `<?ACE 4?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub target: String,
    pub data: String,
}

impl Instruction {
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            data: data.into(),
        }
    }

    /// Split the raw text between `<?` and `?>`.
    pub fn from_raw(raw: &str) -> Self {
        match raw.find(char::is_whitespace) {
            Some(pos) => Self::new(&raw[..pos], raw[pos..].trim_start()),
            None => Self::new(raw, ""),
        }
    }
}

/// An owned XML event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Declaration(Declaration),
    Start(StartTag),
    End(EndTag),
    /// Character data, unescaped.
    Text(String),
    CData(String),
    Comment(String),
    Instruction(Instruction),
    DocType(String),
}

impl MarkupEvent {
    pub fn is_whitespace(&self) -> bool {
        matches!(self, MarkupEvent::Text(t) if t.chars().all(char::is_whitespace))
    }

    pub fn is_start_of(&self, name: &str) -> bool {
        matches!(self, MarkupEvent::Start(s) if s.name == name)
    }

    pub fn is_end_of(&self, name: &str) -> bool {
        matches!(self, MarkupEvent::End(e) if e.name == name)
    }
}

pub(crate) fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_from_raw() {
        let pi = Instruction::from_raw("ACE 18");
        assert_eq!(pi.target, "ACE");
        assert_eq!(pi.data, "18");

        let bare = Instruction::from_raw("target");
        assert_eq!(bare.target, "target");
        assert_eq!(bare.data, "");
    }

    #[test]
    fn test_local_name() {
        let tag = StartTag::new("idPkg:Story");
        assert_eq!(tag.local_name(), "Story");
        assert_eq!(StartTag::new("Content").local_name(), "Content");
    }

    #[test]
    fn test_required_attribute() {
        let tag = StartTag::new("TextFrame").with_attribute("Self", "u1");
        assert_eq!(tag.required_attribute("Self").unwrap(), "u1");
        assert!(matches!(
            tag.required_attribute("ParentStory"),
            Err(Error::MissingAttribute { .. })
        ));
    }
}
