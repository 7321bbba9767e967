use crate::error::{Error, Result};
use crate::extract::{DocumentPart, FilterEvent, ReferenceTarget, TextUnit};

/// A story's events regrouped so that every referent group hangs off the
/// text unit that references it.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Part(DocumentPart),
    Unit { unit: TextUnit, groups: Vec<Group> },
    /// A group nobody references directly, such as a table cell.
    Group(Group),
}

#[derive(Debug, Clone)]
pub(crate) struct Group {
    pub id: String,
    pub target: ReferenceTarget,
    pub children: Vec<Node>,
}

/// Collects the events between a sub-document's start and end into a tree.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<Group>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FilterEvent) -> Result<()> {
        match event {
            FilterEvent::DocumentPart(part) => self.children().push(Node::Part(part)),
            FilterEvent::TextUnit(unit) => self.children().push(Node::Unit {
                unit,
                groups: Vec::new(),
            }),
            FilterEvent::StartGroup(start) => self.open.push(Group {
                id: start.id,
                target: start.target,
                children: Vec::new(),
            }),
            FilterEvent::EndGroup { id } => {
                let group = self
                    .open
                    .pop()
                    .filter(|group| group.id == id)
                    .ok_or_else(|| Error::unexpected(format!("unbalanced end of group {id}")))?;
                self.attach(group);
            }
            other => {
                return Err(Error::unexpected(format!(
                    "unexpected event {} inside a story",
                    other.id()
                )));
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<Node>> {
        match self.open.last() {
            Some(group) => Err(Error::unexpected(format!("group {} is never closed", group.id))),
            None => Ok(self.roots),
        }
    }

    fn children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(group) => &mut group.children,
            None => &mut self.roots,
        }
    }

    fn attach(&mut self, group: Group) {
        let siblings = self.children();
        if let Some(Node::Unit { unit, groups }) = siblings.last_mut()
            && unit.references(&group.id)
        {
            groups.push(group);
            return;
        }
        siblings.push(Node::Group(group));
    }
}
