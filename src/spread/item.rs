use crate::error::Result;
use crate::geometry::Transform;
use crate::markup::StartTag;
use crate::style::Properties;

const NO_VALUE: &str = "n";

/// A spread or master spread.
#[derive(Debug, Clone)]
pub struct Spread {
    pub id: String,
    pub transform: Transform,
    pub items: Vec<SpreadItem>,
}

/// A page item placed on a spread.
#[derive(Debug, Clone)]
pub struct SpreadItem {
    pub id: String,
    pub layer_id: String,
    pub visible: bool,
    pub transform: Transform,
    pub properties: Properties,
    pub kind: SpreadItemKind,
}

#[derive(Debug, Clone)]
pub enum SpreadItemKind {
    TextFrame {
        thread: TextThread,
        text_paths: Vec<TextPath>,
    },
    GraphicLine {
        text_paths: Vec<TextPath>,
    },
    Rectangle {
        text_paths: Vec<TextPath>,
    },
    Oval {
        text_paths: Vec<TextPath>,
    },
    Polygon {
        text_paths: Vec<TextPath>,
    },
    Group {
        items: Vec<SpreadItem>,
    },
    TextBox {
        items: Vec<SpreadItem>,
    },
    MultiStateObject {
        states: Vec<State>,
    },
    Button {
        states: Vec<State>,
    },
}

/// Links of a text frame or text path into its story's frame chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextThread {
    pub story_id: String,
    pub previous_frame: String,
    pub next_frame: String,
}

/// Text running along the outline of a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPath {
    pub id: String,
    pub thread: TextThread,
}

/// One state of a multi-state object or button.
#[derive(Debug, Clone)]
pub struct State {
    pub id: String,
    pub active: bool,
    pub items: Vec<SpreadItem>,
}

impl TextThread {
    pub fn from_start(start: &StartTag) -> Result<Self> {
        Ok(Self {
            story_id: start.required_attribute("ParentStory")?.to_string(),
            previous_frame: start
                .attribute("PreviousTextFrame")
                .unwrap_or(NO_VALUE)
                .to_string(),
            next_frame: start
                .attribute("NextTextFrame")
                .unwrap_or(NO_VALUE)
                .to_string(),
        })
    }

    /// The first frame of a chain is where its story starts.
    pub fn starts_story(&self) -> bool {
        self.previous_frame == NO_VALUE
    }
}

impl TextPath {
    pub fn from_start(start: &StartTag) -> Result<Self> {
        Ok(Self {
            id: start.required_attribute("Self")?.to_string(),
            thread: TextThread::from_start(start)?,
        })
    }
}

impl SpreadItem {
    /// Items that can carry text and are placed on the pasteboard directly.
    pub fn is_textual(&self) -> bool {
        matches!(
            self.kind,
            SpreadItemKind::TextFrame { .. }
                | SpreadItemKind::GraphicLine { .. }
                | SpreadItemKind::Rectangle { .. }
                | SpreadItemKind::Oval { .. }
                | SpreadItemKind::Polygon { .. }
        )
    }

    pub fn text_paths(&self) -> &[TextPath] {
        match &self.kind {
            SpreadItemKind::TextFrame { text_paths, .. }
            | SpreadItemKind::GraphicLine { text_paths }
            | SpreadItemKind::Rectangle { text_paths }
            | SpreadItemKind::Oval { text_paths }
            | SpreadItemKind::Polygon { text_paths } => text_paths,
            _ => &[],
        }
    }

    pub fn thread(&self) -> Option<&TextThread> {
        match &self.kind {
            SpreadItemKind::TextFrame { thread, .. } => Some(thread),
            _ => None,
        }
    }
}

impl Spread {
    /// Vertical offset of the spread, used to order spreads top to bottom.
    pub fn vertical_offset(&self) -> f64 {
        self.transform.ty
    }
}
