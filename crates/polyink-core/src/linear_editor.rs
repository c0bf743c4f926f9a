//! Editing context for an existing linear element's points.

use crate::element::{Element, ElementId};
use crate::scene::Scene;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What an edge should be bound to when linear editing ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BindingTarget {
    /// Leave the edge's current binding untouched.
    #[default]
    Keep,
    /// Release the edge's binding.
    Unbound,
    /// Bind the edge to this container.
    Element(ElementId),
}

/// State kept while the user edits a linear element's points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearElementEditor {
    pub element_id: ElementId,
    pub start_binding_element: BindingTarget,
    pub end_binding_element: BindingTarget,
}

impl LinearElementEditor {
    /// Start editing `element_id`, keeping both bindings as they are.
    pub fn new(element_id: ElementId) -> Self {
        Self {
            element_id,
            start_binding_element: BindingTarget::Keep,
            end_binding_element: BindingTarget::Keep,
        }
    }

    /// Resolve the live element being edited. Deleted elements resolve to `None`.
    pub fn get_element(scene: &Scene, id: ElementId) -> Option<&Element> {
        scene.get_non_deleted(id)
    }

    /// Global coordinates of the point at `index`; negative indices count
    /// from the end (`-1` is the last point).
    pub fn point_at_index_global_coordinates(element: &Element, index: isize) -> Option<Point> {
        let len = element.points.len() as isize;
        let i = if index < 0 { len + index } else { index };
        if !(0..len).contains(&i) {
            return None;
        }
        let p = element.points[i as usize];
        Some(Point::new(element.x + p.x, element.y + p.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementUpdate};

    fn arrow() -> Element {
        Element::linear(
            ElementKind::Arrow,
            Point::new(100.0, 200.0),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0), Point::new(30.0, -5.0)],
        )
    }

    #[test]
    fn test_new_keeps_bindings() {
        let editor = LinearElementEditor::new(arrow().id());
        assert_eq!(editor.start_binding_element, BindingTarget::Keep);
        assert_eq!(editor.end_binding_element, BindingTarget::Keep);
    }

    #[test]
    fn test_global_coordinates() {
        let el = arrow();
        assert_eq!(
            LinearElementEditor::point_at_index_global_coordinates(&el, -1),
            Some(Point::new(130.0, 195.0))
        );
        assert_eq!(
            LinearElementEditor::point_at_index_global_coordinates(&el, 0),
            Some(Point::new(100.0, 200.0))
        );
        assert_eq!(LinearElementEditor::point_at_index_global_coordinates(&el, 3), None);
        assert_eq!(LinearElementEditor::point_at_index_global_coordinates(&el, -4), None);
    }

    #[test]
    fn test_get_element_skips_deleted() {
        let el = arrow();
        let id = el.id();
        let mut scene = Scene::from_elements([el]);
        assert!(LinearElementEditor::get_element(&scene, id).is_some());
        scene.mutate_element(id, ElementUpdate::deleted(), false).unwrap();
        assert!(LinearElementEditor::get_element(&scene, id).is_none());
    }
}
