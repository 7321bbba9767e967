use crate::error::{Error, Result};
use crate::markup::{Element, MarkupEvent, StartTag, XmlCursor};

pub(crate) const PROPERTIES: &str = "Properties";
const PATH_GEOMETRY: &str = "PathGeometry";
const GEOMETRY_PATH_TYPE: &str = "GeometryPathType";
const PATH_POINT_TYPE: &str = "PathPointType";

/// The `Properties` block attached to a style range, a story element or a
/// spread item. An absent block is represented by an empty value.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    start: Option<StartTag>,
    items: Vec<Property>,
}

/// One child of a `Properties` block.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    PathGeometry(PathGeometry),
    Other(Element),
}

/// Vector outline of a shape, kept verbatim along with its parsed points.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    element: Element,
    paths: Vec<GeometryPath>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryPath {
    pub open: bool,
    pub points: Vec<PathPoint>,
}

/// A path point's anchor in the owning item's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl Properties {
    /// Parse the block whose start tag was just consumed.
    pub fn parse(start: StartTag, cursor: &mut XmlCursor) -> Result<Self> {
        let mut items = Vec::new();
        loop {
            match cursor.next_tag(PROPERTIES)? {
                MarkupEvent::End(end) if end.name == start.name => break,
                MarkupEvent::Start(child) => {
                    let element = Element::parse(child, cursor)?;
                    items.push(Property::from_element(element)?);
                }
                other => {
                    return Err(Error::unexpected(format!(
                        "unexpected {other:?} inside <{PROPERTIES}>"
                    )));
                }
            }
        }
        Ok(Self {
            start: Some(start),
            items,
        })
    }

    /// Consume a `Properties` block if it is the next tag.
    pub fn parse_optional(cursor: &mut XmlCursor) -> Result<Self> {
        cursor.skip_insignificant()?;
        let next_is_properties =
            matches!(cursor.peek_event()?, Some(event) if event.is_start_of(PROPERTIES));
        if !next_is_properties {
            return Ok(Self::default());
        }
        match cursor.next_event()? {
            Some(MarkupEvent::Start(start)) => Self::parse(start, cursor),
            _ => Ok(Self::default()),
        }
    }

    pub fn items(&self) -> &[Property] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item of `self` also appears in `other`.
    pub fn is_contained_in(&self, other: &Properties) -> bool {
        self.items.iter().all(|item| other.items.contains(item))
    }

    /// Anchor points of every path in the geometry, in document order.
    pub fn anchor_points(&self) -> Vec<PathPoint> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Property::PathGeometry(geometry) => Some(geometry),
                Property::Other(_) => None,
            })
            .flat_map(|geometry| geometry.paths.iter())
            .flat_map(|path| path.points.iter().copied())
            .collect()
    }

    pub fn has_path_geometry(&self) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, Property::PathGeometry(_)))
    }

    pub fn write_events(&self, out: &mut Vec<MarkupEvent>) {
        let Some(start) = &self.start else {
            return;
        };
        out.push(MarkupEvent::Start(start.clone()));
        for item in &self.items {
            match item {
                Property::PathGeometry(geometry) => geometry.element.write_events(out),
                Property::Other(element) => element.write_events(out),
            }
        }
        out.push(MarkupEvent::End(start.end_tag()));
    }
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Property {
    fn from_element(element: Element) -> Result<Self> {
        if element.name() == PATH_GEOMETRY {
            Ok(Property::PathGeometry(PathGeometry::from_element(element)?))
        } else {
            Ok(Property::Other(element))
        }
    }
}

impl PathGeometry {
    fn from_element(element: Element) -> Result<Self> {
        let mut paths: Vec<GeometryPath> = Vec::new();
        for event in &element.inner {
            let MarkupEvent::Start(start) = event else {
                continue;
            };
            if start.name == GEOMETRY_PATH_TYPE {
                paths.push(GeometryPath {
                    open: start.bool_attribute("PathOpen", false),
                    points: Vec::new(),
                });
            } else if start.name == PATH_POINT_TYPE {
                let point = PathPoint::parse(start.required_attribute("Anchor")?)?;
                match paths.last_mut() {
                    Some(path) => path.points.push(point),
                    None => paths.push(GeometryPath {
                        open: false,
                        points: vec![point],
                    }),
                }
            }
        }
        Ok(Self { element, paths })
    }

    pub fn paths(&self) -> &[GeometryPath] {
        &self.paths
    }
}

impl PathPoint {
    /// Parse an `"x y"` coordinate pair.
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts = value.split_whitespace().map(str::parse::<f64>);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(x)), Some(Ok(y)), None) => Ok(Self { x, y }),
            _ => Err(Error::unexpected(format!("invalid anchor point {value:?}"))),
        }
    }
}
