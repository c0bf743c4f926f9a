//! Partial element updates applied by the scene mutator.

use super::{Element, ElementId, PointBinding, points_size};
use kurbo::Point;
use std::sync::atomic::{AtomicU32, Ordering};

static EDIT_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Nonce for an element entering `version`, mixed with a process-wide edit
/// sequence. Never equal to `previous`.
pub(crate) fn next_version_nonce(version: u32, previous: u32) -> u32 {
    let sequence = EDIT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mut h = version.rotate_left(16) ^ sequence ^ previous.rotate_right(7);
    // murmur3 fmix32
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    if h == previous { h.wrapping_add(1) } else { h }
}

/// A partial update to an element. `None` fields are left untouched.
///
/// Binding fields are doubly optional: `Some(None)` clears the binding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementUpdate {
    pub points: Option<Vec<Point>>,
    pub is_deleted: Option<bool>,
    pub start_binding: Option<Option<PointBinding>>,
    pub end_binding: Option<Option<PointBinding>>,
    pub bound_elements: Option<Vec<ElementId>>,
}

impl ElementUpdate {
    pub fn points(points: Vec<Point>) -> Self {
        Self {
            points: Some(points),
            ..Self::default()
        }
    }

    pub fn deleted() -> Self {
        Self {
            is_deleted: Some(true),
            ..Self::default()
        }
    }

    pub fn binding(edge: super::Edge, binding: Option<PointBinding>) -> Self {
        match edge {
            super::Edge::Start => Self {
                start_binding: Some(binding),
                ..Self::default()
            },
            super::Edge::End => Self {
                end_binding: Some(binding),
                ..Self::default()
            },
        }
    }

    pub fn bound_elements(ids: Vec<ElementId>) -> Self {
        Self {
            bound_elements: Some(ids),
            ..Self::default()
        }
    }

    /// Apply the update, bumping the element's version.
    ///
    /// Updating points also recomputes width/height and drops a committed
    /// marker that no longer indexes a point.
    pub(crate) fn apply(self, element: &mut Element) {
        if let Some(points) = self.points {
            let (width, height) = points_size(&points);
            element.width = width;
            element.height = height;
            if element.last_committed_index.is_some_and(|i| i >= points.len()) {
                element.last_committed_index = None;
            }
            element.points = points;
        }
        if let Some(is_deleted) = self.is_deleted {
            element.is_deleted = is_deleted;
        }
        if let Some(binding) = self.start_binding {
            element.start_binding = binding;
        }
        if let Some(binding) = self.end_binding {
            element.end_binding = binding;
        }
        if let Some(ids) = self.bound_elements {
            element.bound_elements = ids;
        }
        element.version = element.version.wrapping_add(1);
        element.version_nonce = next_version_nonce(element.version, element.version_nonce);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_points_update_resizes() {
        let mut el = Element::linear(
            ElementKind::Line,
            Point::ZERO,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
        );
        let version = el.version;
        ElementUpdate::points(vec![Point::new(0.0, 0.0), Point::new(30.0, 5.0)]).apply(&mut el);
        assert!((el.width - 30.0).abs() < f64::EPSILON);
        assert!((el.height - 5.0).abs() < f64::EPSILON);
        assert_eq!(el.version, version + 1);
    }

    #[test]
    fn test_committed_marker_survives_trim() {
        let mut el = Element::linear(
            ElementKind::Line,
            Point::ZERO,
            vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)],
        )
        .with_preview_point(Point::new(9.0, 9.0));
        ElementUpdate::points(el.points[..2].to_vec()).apply(&mut el);
        assert_eq!(el.last_committed_index, Some(1));
        assert!(el.trailing_point_committed());
    }

    #[test]
    fn test_nonce_changes_on_every_update() {
        let mut el = Element::linear(ElementKind::Arrow, Point::ZERO, vec![Point::ZERO]);
        let mut seen = vec![el.version_nonce];
        for _ in 0..8 {
            ElementUpdate::deleted().apply(&mut el);
            assert_ne!(Some(&el.version_nonce), seen.last());
            seen.push(el.version_nonce);
        }
        assert_eq!(el.version, 9);
    }

    #[test]
    fn test_same_version_gets_distinct_nonces() {
        assert_ne!(next_version_nonce(3, 0), next_version_nonce(3, 0));
    }
}
