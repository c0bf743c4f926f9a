//! Transient editor state for the active editing session.

use crate::element::ElementId;
use crate::linear_editor::LinearElementEditor;
use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum zoom factor.
pub const MAX_ZOOM: f64 = 30.0;

/// A zoom factor clamped to `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom(f64);

impl Zoom {
    pub fn new(value: f64) -> Self {
        if !value.is_finite() {
            return Self::default();
        }
        Self(value.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Device used for the last pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    /// Mouse and pen report hover positions, so they leave a preview point.
    pub fn has_hover(self) -> bool {
        !matches!(self, PointerType::Touch)
    }
}

/// Snapshot of the editor state.
///
/// At most one of `multi_element`, `editing_linear_element` and a freehand
/// `editing_element` is set at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    /// Element receiving points during multi-point placement.
    pub multi_element: Option<ElementId>,
    /// Element being drawn or edited (freehand strokes live here).
    pub editing_element: Option<ElementId>,
    /// Element currently being dragged.
    pub dragging_element: Option<ElementId>,
    /// Context for editing an existing linear element's points.
    pub editing_linear_element: Option<LinearElementEditor>,
    /// Selected elements.
    pub selected_element_ids: HashMap<ElementId, bool>,
    /// Active tool.
    pub element_type: ToolKind,
    /// Keep the active tool after finishing an element.
    pub element_locked: bool,
    pub last_pointer_down_with: PointerType,
    pub zoom: Zoom,
    /// Placeholder awaiting placement (e.g. an image being inserted).
    pub pending_image_element: Option<ElementId>,
    /// Container the start of the element being drawn should bind to.
    pub start_bound_element: Option<ElementId>,
    /// Containers highlighted as binding candidates.
    pub suggested_bindings: Vec<ElementId>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected_element_ids.get(&id).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_zoom_clamp() {
        assert!((Zoom::new(0.001).value() - MIN_ZOOM).abs() < f64::EPSILON);
        assert!((Zoom::new(1000.0).value() - MAX_ZOOM).abs() < f64::EPSILON);
        assert!((Zoom::new(f64::NAN).value() - 1.0).abs() < f64::EPSILON);
        assert!((Zoom::new(2.5).value() - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pointer_hover() {
        assert!(PointerType::Mouse.has_hover());
        assert!(PointerType::Pen.has_hover());
        assert!(!PointerType::Touch.has_hover());
    }

    #[test]
    fn test_selection_lookup() {
        let mut state = EditorState::new();
        let id = Uuid::new_v4();
        assert!(!state.is_selected(id));
        state.selected_element_ids.insert(id, true);
        assert!(state.is_selected(id));
        state.selected_element_ids.insert(id, false);
        assert!(!state.is_selected(id));
    }

    #[test]
    fn test_state_serializes() {
        let mut state = EditorState::new();
        state.multi_element = Some(Uuid::new_v4());
        state.zoom = Zoom::new(2.0);
        let json = serde_json::to_string(&state).unwrap();
        let back: EditorState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
