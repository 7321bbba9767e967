use std::str::FromStr;

use crate::error::{Error, Result};

/// A point on the pasteboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub x: f64,
    pub y: f64,
}

impl AnchorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2x3 affine transformation as written in `ItemTransform`:
/// `a b c d tx ty`, mapping `(x, y)` to `(a*x + c*y + tx, b*x + d*y + ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn apply(&self, point: AnchorPoint) -> AnchorPoint {
        AnchorPoint {
            x: self.a * point.x + self.c * point.y + self.tx,
            y: self.b * point.x + self.d * point.y + self.ty,
        }
    }

    /// The transform that applies `self` first and then `outer`.
    pub fn then(&self, outer: &Transform) -> Transform {
        Transform {
            a: outer.a * self.a + outer.c * self.b,
            b: outer.b * self.a + outer.d * self.b,
            c: outer.a * self.c + outer.c * self.d,
            d: outer.b * self.c + outer.d * self.d,
            tx: outer.a * self.tx + outer.c * self.ty + outer.tx,
            ty: outer.b * self.tx + outer.d * self.ty + outer.ty,
        }
    }

    /// Collapse a stack of frames, outermost first, into one transform that
    /// maps points from the innermost frame to the outermost.
    pub fn compose(stack: &[Transform]) -> Transform {
        stack
            .iter()
            .rev()
            .fold(Transform::IDENTITY, |acc, frame| acc.then(frame))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FromStr for Transform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidTransform(s.to_string()))?;
        match values.as_slice() {
            [a, b, c, d, tx, ty] => Ok(Transform {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                tx: *tx,
                ty: *ty,
            }),
            _ => Err(Error::InvalidTransform(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_and_apply() {
        let t: Transform = "1 0 0 1 -306 -396".parse().unwrap();
        assert_eq!(t.apply(AnchorPoint::new(10.0, 20.0)), AnchorPoint::new(-296.0, -376.0));
    }

    #[test]
    fn test_parse_errors() {
        assert!("1 0 0 1 0".parse::<Transform>().is_err());
        assert!("1 0 0 1 0 x".parse::<Transform>().is_err());
    }

    #[test]
    fn test_rotation() {
        let rotate: Transform = "0 1 -1 0 0 0".parse().unwrap();
        let p = rotate.apply(AnchorPoint::new(1.0, 0.0));
        assert_eq!(p, AnchorPoint::new(0.0, 1.0));
    }

    fn transform() -> impl Strategy<Value = Transform> {
        (-4i32..4, -4i32..4, -4i32..4, -4i32..4, -100i32..100, -100i32..100).prop_map(
            |(a, b, c, d, tx, ty)| Transform {
                a: a as f64,
                b: b as f64,
                c: c as f64,
                d: d as f64,
                tx: tx as f64,
                ty: ty as f64,
            },
        )
    }

    proptest! {
        #[test]
        fn composition_matches_sequential_application(
            outer in transform(),
            middle in transform(),
            inner in transform(),
            x in -500i32..500,
            y in -500i32..500,
        ) {
            let point = AnchorPoint::new(x as f64, y as f64);
            let sequential = outer.apply(middle.apply(inner.apply(point)));
            let composed = Transform::compose(&[outer, middle, inner]).apply(point);
            prop_assert_eq!(sequential, composed);
        }
    }
}
