//! Parent-link classification and connector geometry.
//!
//! A connector between a child node and one of its parents is [`Straight`]
//! when both sit in the same lane and [`Curved`] otherwise. Curved connectors
//! are cubic Béziers whose control points are pulled vertically from each
//! endpoint to the midpoint row, giving an S-curve across lanes.
//!
//! [`Straight`]: EdgeKind::Straight
//! [`Curved`]: EdgeKind::Curved

use serde::Serialize;

/// A point in layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Straight,
    Curved,
}

impl EdgeKind {
    /// Classify a connector by the lanes of its endpoints.
    #[must_use]
    pub const fn classify(child_lane: usize, parent_lane: usize) -> Self {
        if child_lane == parent_lane {
            Self::Straight
        } else {
            Self::Curved
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Curved => "curved",
        }
    }
}

/// Drawable connector geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgePath {
    Line {
        from: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        c1: Point,
        c2: Point,
        to: Point,
    },
}

impl EdgePath {
    /// Geometry for a connector of `kind` from `from` (child) to `to`
    /// (parent).
    #[must_use]
    pub fn between(kind: EdgeKind, from: Point, to: Point) -> Self {
        match kind {
            EdgeKind::Straight => Self::Line { from, to },
            EdgeKind::Curved => {
                let mid_y = (from.y + to.y) / 2.0;
                Self::Cubic {
                    from,
                    c1: Point::new(from.x, mid_y),
                    c2: Point::new(to.x, mid_y),
                    to,
                }
            }
        }
    }

    #[must_use]
    pub const fn start(&self) -> Point {
        match *self {
            Self::Line { from, .. } | Self::Cubic { from, .. } => from,
        }
    }

    #[must_use]
    pub const fn end(&self) -> Point {
        match *self {
            Self::Line { to, .. } | Self::Cubic { to, .. } => to,
        }
    }

    /// Point at parameter `t` in `[0, 1]` along the connector.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Line { from, to } => Point::new(
                (to.x - from.x).mul_add(t, from.x),
                (to.y - from.y).mul_add(t, from.y),
            ),
            Self::Cubic { from, c1, c2, to } => {
                let u = 1.0 - t;
                let b0 = u * u * u;
                let b1 = 3.0 * u * u * t;
                let b2 = 3.0 * u * t * t;
                let b3 = t * t * t;
                Point::new(
                    b0 * from.x + b1 * c1.x + b2 * c2.x + b3 * to.x,
                    b0 * from.y + b1 * c1.y + b2 * c2.y + b3 * to.y,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn same_lane_is_straight() {
        assert_eq!(EdgeKind::classify(2, 2), EdgeKind::Straight);
        assert_eq!(EdgeKind::classify(0, 1), EdgeKind::Curved);
        assert_eq!(EdgeKind::classify(3, 1), EdgeKind::Curved);
    }

    #[test]
    fn straight_path_is_a_line() {
        let from = Point::new(12.0, 12.0);
        let to = Point::new(12.0, 60.0);
        let path = EdgePath::between(EdgeKind::Straight, from, to);
        assert_eq!(path, EdgePath::Line { from, to });
        let mid = path.point_at(0.5);
        assert!(approx(mid.x, 12.0));
        assert!(approx(mid.y, 36.0));
    }

    #[test]
    fn curved_control_points_meet_at_midpoint_row() {
        let from = Point::new(12.0, 12.0);
        let to = Point::new(28.0, 60.0);
        let EdgePath::Cubic { c1, c2, .. } = EdgePath::between(EdgeKind::Curved, from, to) else {
            panic!("curved edge must be cubic");
        };
        assert!(approx(c1.x, from.x));
        assert!(approx(c2.x, to.x));
        assert!(approx(c1.y, 36.0));
        assert!(approx(c2.y, 36.0));
    }

    #[test]
    fn curve_endpoints_and_symmetry() {
        let from = Point::new(12.0, 12.0);
        let to = Point::new(28.0, 60.0);
        let path = EdgePath::between(EdgeKind::Curved, from, to);
        assert_eq!(path.point_at(0.0), from);
        assert_eq!(path.point_at(1.0), to);
        assert_eq!(path.start(), from);
        assert_eq!(path.end(), to);
        // the S-curve passes through the centre of its bounding box
        let mid = path.point_at(0.5);
        assert!(approx(mid.x, 20.0));
        assert!(approx(mid.y, 36.0));
    }

    #[test]
    fn distance_is_euclidean() {
        assert!(approx(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&EdgeKind::Curved).expect("serialize");
        assert_eq!(json, "\"curved\"");
        assert_eq!(EdgeKind::Straight.as_str(), "straight");
    }
}
