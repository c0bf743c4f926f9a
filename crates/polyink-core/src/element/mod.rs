//! Element definitions for the canvas.

mod mutate;

pub use mutate::ElementUpdate;
use mutate::next_version_nonce;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// The kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Line,
    Arrow,
    Freedraw,
    Rectangle,
    Diamond,
    Ellipse,
    Text,
    Image,
}

/// Per-kind behaviour consulted during finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindPolicy {
    /// Geometry is a point list rather than a box.
    pub linear: bool,
    /// Endpoints may bind to containers.
    pub supports_binding: bool,
    /// A trailing preview point is dropped on finalize.
    pub trims_trailing_point: bool,
    /// A near-closed path is snapped exactly closed.
    pub closes_loops: bool,
    /// Can act as a binding container.
    pub bindable: bool,
}

impl KindPolicy {
    const LINEAR: Self = Self {
        linear: true,
        supports_binding: false,
        trims_trailing_point: true,
        closes_loops: false,
        bindable: false,
    };

    const CONTAINER: Self = Self {
        linear: false,
        supports_binding: false,
        trims_trailing_point: false,
        closes_loops: false,
        bindable: true,
    };
}

impl ElementKind {
    /// Look up the finalization policy for this kind.
    pub const fn policy(self) -> KindPolicy {
        match self {
            ElementKind::Line => KindPolicy {
                closes_loops: true,
                ..KindPolicy::LINEAR
            },
            ElementKind::Arrow => KindPolicy {
                supports_binding: true,
                ..KindPolicy::LINEAR
            },
            ElementKind::Freedraw => KindPolicy {
                trims_trailing_point: false,
                closes_loops: true,
                ..KindPolicy::LINEAR
            },
            ElementKind::Rectangle
            | ElementKind::Diamond
            | ElementKind::Ellipse
            | ElementKind::Text
            | ElementKind::Image => KindPolicy::CONTAINER,
        }
    }

    pub fn is_linear(self) -> bool {
        self.policy().linear
    }

    pub fn supports_binding(self) -> bool {
        self.policy().supports_binding
    }

    pub fn is_bindable(self) -> bool {
        self.policy().bindable
    }

    pub fn is_freedraw(self) -> bool {
        self == ElementKind::Freedraw
    }
}

/// Which end of a linear element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Start,
    End,
}

impl Edge {
    /// The opposite edge.
    pub fn opposite(self) -> Self {
        match self {
            Edge::Start => Edge::End,
            Edge::End => Edge::Start,
        }
    }
}

/// A binding from one end of a linear element to a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointBinding {
    /// The container the endpoint is attached to.
    pub element_id: ElementId,
    /// Where the endpoint's direction crosses the container, in [-1, 1].
    pub focus: f64,
    /// Distance kept between the endpoint and the container outline.
    pub gap: f64,
}

/// A drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Element kind.
    pub kind: ElementKind,
    /// Global x of the element origin.
    pub x: f64,
    /// Global y of the element origin.
    pub y: f64,
    /// Width (derived from points for linear elements).
    pub width: f64,
    /// Height (derived from points for linear elements).
    pub height: f64,
    /// Points relative to the element origin.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Index in `points` of the last point the user explicitly placed.
    #[serde(default)]
    pub last_committed_index: Option<usize>,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub start_binding: Option<PointBinding>,
    #[serde(default)]
    pub end_binding: Option<PointBinding>,
    /// Linear elements bound to this container.
    #[serde(default)]
    pub bound_elements: Vec<ElementId>,
    /// Incremented on every mutation.
    pub version: u32,
    /// Random nonce regenerated on every mutation.
    pub version_nonce: u32,
}

impl Element {
    fn with_kind(kind: ElementKind, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            x,
            y,
            width: 0.0,
            height: 0.0,
            points: Vec::new(),
            last_committed_index: None,
            is_deleted: false,
            start_binding: None,
            end_binding: None,
            bound_elements: Vec::new(),
            version: 1,
            version_nonce: next_version_nonce(1, 0),
        }
    }

    /// Create a linear element (line, arrow or freehand stroke) at `origin`.
    ///
    /// Every point is considered committed; use [`Element::with_preview_point`]
    /// to append a hover point.
    pub fn linear(kind: ElementKind, origin: Point, points: Vec<Point>) -> Self {
        debug_assert!(kind.is_linear());
        let mut element = Self::with_kind(kind, origin.x, origin.y);
        let size = points_size(&points);
        element.width = size.0;
        element.height = size.1;
        element.last_committed_index = points.len().checked_sub(1);
        element.points = points;
        element
    }

    /// Create a box-shaped element.
    pub fn container(kind: ElementKind, rect: Rect) -> Self {
        debug_assert!(!kind.is_linear());
        let mut element = Self::with_kind(kind, rect.x0, rect.y0);
        element.width = rect.width();
        element.height = rect.height();
        element
    }

    /// Append an uncommitted trailing point (the live pointer position).
    pub fn with_preview_point(mut self, point: Point) -> Self {
        self.points.push(point);
        let size = points_size(&self.points);
        self.width = size.0;
        self.height = size.1;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The last point the user explicitly placed, if any.
    pub fn last_committed_point(&self) -> Option<Point> {
        self.last_committed_index.and_then(|i| self.points.get(i).copied())
    }

    /// Whether the trailing point is the committed marker.
    pub fn trailing_point_committed(&self) -> bool {
        match self.last_committed_index {
            Some(i) => !self.points.is_empty() && i == self.points.len() - 1,
            None => false,
        }
    }

    pub fn binding(&self, edge: Edge) -> Option<&PointBinding> {
        match edge {
            Edge::Start => self.start_binding.as_ref(),
            Edge::End => self.end_binding.as_ref(),
        }
    }

    /// Bounding box in global coordinates.
    pub fn bounds(&self) -> Rect {
        if self.kind.is_linear() && !self.points.is_empty() {
            let local = crate::geometry::points_bounds(&self.points);
            return local + kurbo::Vec2::new(self.x, self.y);
        }
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

/// Width and height spanned by a point list.
pub(crate) fn points_size(points: &[Point]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let bounds = crate::geometry::points_bounds(points);
    (bounds.width(), bounds.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        assert!(ElementKind::Arrow.supports_binding());
        assert!(!ElementKind::Line.supports_binding());
        assert!(ElementKind::Line.policy().closes_loops);
        assert!(!ElementKind::Arrow.policy().closes_loops);
        assert!(!ElementKind::Freedraw.policy().trims_trailing_point);
        assert!(ElementKind::Rectangle.is_bindable());
        assert!(!ElementKind::Rectangle.is_linear());
    }

    #[test]
    fn test_linear_commits_all_points() {
        let el = Element::linear(
            ElementKind::Line,
            Point::new(10.0, 10.0),
            vec![Point::new(0.0, 0.0), Point::new(40.0, 30.0)],
        );
        assert!(el.trailing_point_committed());
        assert_eq!(el.last_committed_point(), Some(Point::new(40.0, 30.0)));
        assert!((el.width - 40.0).abs() < f64::EPSILON);
        assert!((el.height - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_preview_point_is_uncommitted() {
        let el = Element::linear(ElementKind::Arrow, Point::ZERO, vec![Point::ZERO])
            .with_preview_point(Point::new(20.0, 0.0));
        assert!(!el.trailing_point_committed());
        assert_eq!(el.last_committed_point(), Some(Point::ZERO));
    }

    #[test]
    fn test_bounds_are_global() {
        let el = Element::linear(
            ElementKind::Line,
            Point::new(100.0, 50.0),
            vec![Point::new(0.0, 0.0), Point::new(10.0, -5.0)],
        );
        let b = el.bounds();
        assert!((b.x0 - 100.0).abs() < f64::EPSILON);
        assert!((b.y0 - 45.0).abs() < f64::EPSILON);
        assert!((b.x1 - 110.0).abs() < f64::EPSILON);

        let rect = Element::container(ElementKind::Rectangle, Rect::new(0.0, 0.0, 50.0, 20.0));
        assert_eq!(rect.bounds(), Rect::new(0.0, 0.0, 50.0, 20.0));
    }
}
