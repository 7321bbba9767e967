use std::cmp::Ordering;

use super::transform::AnchorPoint;

/// Story direction from the document preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    pub fn from_story_direction(value: &str) -> Self {
        match value {
            "RightToLeftDirection" => Direction::RightToLeft,
            _ => Direction::LeftToRight,
        }
    }

    /// Order anchor points so the first one is where reading starts:
    /// leftmost then topmost, or rightmost then bottommost for right-to-left.
    pub fn compare_points(self, a: &AnchorPoint, b: &AnchorPoint) -> Ordering {
        match self {
            Direction::LeftToRight => a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)),
            Direction::RightToLeft => b.x.total_cmp(&a.x).then(b.y.total_cmp(&a.y)),
        }
    }

    pub fn min_point(self, points: &[AnchorPoint]) -> Option<AnchorPoint> {
        points
            .iter()
            .copied()
            .min_by(|a, b| self.compare_points(a, b))
    }

    /// Reading order of two items given their transformed anchor points.
    ///
    /// Items without points come first. Otherwise the items' minimal points
    /// are compared by vertical position, then horizontally in reading
    /// direction.
    pub fn compare_items(self, a: &[AnchorPoint], b: &[AnchorPoint]) -> Ordering {
        let (a_min, b_min) = match (self.min_point(a), self.min_point(b)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a_min), Some(b_min)) => (a_min, b_min),
        };
        a_min.y.total_cmp(&b_min.y).then_with(|| match self {
            Direction::LeftToRight => a_min.x.total_cmp(&b_min.x),
            Direction::RightToLeft => b_min.x.total_cmp(&a_min.x),
        })
    }
}
