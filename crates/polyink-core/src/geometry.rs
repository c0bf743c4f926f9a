//! Pure geometry helpers used during finalization.

use crate::config::FinalizeConfig;
use crate::element::Element;
use crate::state::Zoom;
use kurbo::{Point, Rect};

/// Axis-aligned bounds of a point list. Empty input yields `Rect::ZERO`.
pub fn points_bounds(points: &[Point]) -> Rect {
    if points.is_empty() {
        return Rect::ZERO;
    }
    let (min_x, max_x) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(mn, mx), p| (mn.min(p.x), mx.max(p.x)));
    let (min_y, max_y) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(mn, mx), p| (mn.min(p.y), mx.max(p.y)));
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Check whether an element would be invisible once rendered.
///
/// Linear elements need at least two points. Any element whose extent is
/// below `min_visible_extent` on both axes is invisible.
pub fn is_invisibly_small(element: &Element, config: &FinalizeConfig) -> bool {
    if element.kind.is_linear() && element.points.len() < 2 {
        return true;
    }
    let (width, height) = if element.kind.is_linear() {
        let b = points_bounds(&element.points);
        (b.width(), b.height())
    } else {
        (element.width.abs(), element.height.abs())
    };
    width < config.min_visible_extent && height < config.min_visible_extent
}

/// Check whether a path closes on itself at the given zoom.
///
/// The confirm threshold is in screen pixels, so zooming in shrinks it in
/// world units. Paths with fewer than three points are never loops.
pub fn is_path_a_loop(points: &[Point], zoom: Zoom, config: &FinalizeConfig) -> bool {
    if points.len() < 3 {
        return false;
    }
    let first = points[0];
    let last = points[points.len() - 1];
    first.distance(last) <= config.line_confirm_threshold / zoom.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn square_loop(gap: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(gap, 0.0),
        ]
    }

    #[test]
    fn test_points_bounds() {
        let b = points_bounds(&[Point::new(5.0, -2.0), Point::new(-1.0, 8.0)]);
        assert_eq!(b, Rect::new(-1.0, -2.0, 5.0, 8.0));
        assert_eq!(points_bounds(&[]), Rect::ZERO);
    }

    #[test]
    fn test_loop_detection() {
        let config = FinalizeConfig::default();
        assert!(is_path_a_loop(&square_loop(3.0), Zoom::default(), &config));
        assert!(!is_path_a_loop(&square_loop(20.0), Zoom::default(), &config));
    }

    #[test]
    fn test_loop_threshold_scales_with_zoom() {
        let config = FinalizeConfig::default();
        let points = square_loop(6.0);
        assert!(is_path_a_loop(&points, Zoom::new(1.0), &config));
        // At 4x the threshold is 2 world units.
        assert!(!is_path_a_loop(&points, Zoom::new(4.0), &config));
        // At 0.5x the threshold is 16 world units.
        assert!(is_path_a_loop(&square_loop(15.0), Zoom::new(0.5), &config));
    }

    #[test]
    fn test_two_points_never_loop() {
        let config = FinalizeConfig::default();
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 0.0)];
        assert!(!is_path_a_loop(&points, Zoom::default(), &config));
    }

    #[test]
    fn test_invisibly_small() {
        let config = FinalizeConfig::default();
        let single = Element::linear(ElementKind::Line, Point::ZERO, vec![Point::ZERO]);
        assert!(is_invisibly_small(&single, &config));

        let dot = Element::linear(
            ElementKind::Line,
            Point::ZERO,
            vec![Point::new(0.0, 0.0), Point::new(0.01, 0.02)],
        );
        assert!(is_invisibly_small(&dot, &config));

        let flat = Element::linear(
            ElementKind::Line,
            Point::ZERO,
            vec![Point::new(0.0, 0.0), Point::new(40.0, 0.0)],
        );
        assert!(!is_invisibly_small(&flat, &config));

        let rect = Element::container(ElementKind::Rectangle, Rect::new(0.0, 0.0, 0.0, 0.0));
        assert!(is_invisibly_small(&rect, &config));
    }
}
