//! Scene: the ordered element collection and its single mutation path.

use crate::element::{Element, ElementId, ElementUpdate};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Scene errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// All elements of a drawing, keyed by id, with a back-to-front order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: HashMap<ElementId, Element>,
    /// Z-order of elements (back to front).
    order: Vec<ElementId>,
    /// Elements mutated with `inform = true` since the last `take_dirty`.
    dirty: HashSet<ElementId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from elements given back to front.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut scene = Self::new();
        scene.replace_all(elements);
        scene
    }

    /// Append an element on top.
    pub fn add_element(&mut self, element: Element) {
        let id = element.id();
        if self.elements.insert(id, element).is_none() {
            self.order.push(id);
        }
    }

    /// Get an element by id, deleted or not.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get an element only if it has not been deleted.
    pub fn get_non_deleted(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id).filter(|el| !el.is_deleted)
    }

    /// Elements back to front, including deleted ones.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Elements back to front, skipping deleted ones.
    pub fn non_deleted_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.elements().filter(|el| !el.is_deleted)
    }

    /// Clone the collection in order, leaving out `removed`.
    pub fn collect_without(&self, removed: ElementId) -> Vec<Element> {
        self.elements().filter(|el| el.id() != removed).cloned().collect()
    }

    /// Replace the whole collection (e.g. with an action's result).
    pub fn replace_all(&mut self, elements: impl IntoIterator<Item = Element>) {
        self.elements.clear();
        self.order.clear();
        for element in elements {
            self.add_element(element);
        }
        let elements = &self.elements;
        self.dirty.retain(|id| elements.contains_key(id));
    }

    /// Apply a partial update to an element.
    ///
    /// This is the only path that writes element geometry. With `inform` set
    /// the element is queued for re-render.
    pub fn mutate_element(
        &mut self,
        id: ElementId,
        update: ElementUpdate,
        inform: bool,
    ) -> SceneResult<&Element> {
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(SceneError::ElementNotFound(id))?;
        update.apply(element);
        if inform {
            self.dirty.insert(id);
        }
        Ok(element)
    }

    /// Drain the set of elements needing re-render.
    pub fn take_dirty(&mut self) -> HashSet<ElementId> {
        std::mem::take(&mut self.dirty)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use kurbo::{Point, Rect};
    use uuid::Uuid;

    fn rect() -> Element {
        Element::container(ElementKind::Rectangle, Rect::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_order_preserved() {
        let a = rect();
        let b = rect();
        let (ida, idb) = (a.id(), b.id());
        let scene = Scene::from_elements([a, b]);
        let ids: Vec<_> = scene.elements().map(|el| el.id()).collect();
        assert_eq!(ids, vec![ida, idb]);
    }

    #[test]
    fn test_mutate_marks_dirty() {
        let el = Element::linear(ElementKind::Line, Point::ZERO, vec![Point::ZERO]);
        let id = el.id();
        let mut scene = Scene::from_elements([el]);

        let points = vec![Point::ZERO, Point::new(4.0, 3.0)];
        scene
            .mutate_element(id, ElementUpdate::points(points), true)
            .unwrap();
        assert_eq!(scene.get(id).unwrap().points.len(), 2);
        assert!(scene.take_dirty().contains(&id));
        assert!(scene.take_dirty().is_empty());
    }

    #[test]
    fn test_silent_mutation() {
        let el = rect();
        let id = el.id();
        let mut scene = Scene::from_elements([el]);
        scene.mutate_element(id, ElementUpdate::deleted(), false).unwrap();
        assert!(scene.get(id).unwrap().is_deleted);
        assert!(scene.get_non_deleted(id).is_none());
        assert!(scene.take_dirty().is_empty());
        assert_eq!(scene.non_deleted_elements().count(), 0);
    }

    #[test]
    fn test_mutate_missing() {
        let mut scene = Scene::new();
        let id = Uuid::new_v4();
        assert_eq!(
            scene.mutate_element(id, ElementUpdate::deleted(), true).unwrap_err(),
            SceneError::ElementNotFound(id)
        );
    }

    #[test]
    fn test_collect_without() {
        let a = rect();
        let b = rect();
        let idb = b.id();
        let scene = Scene::from_elements([a, b]);
        let rest = scene.collect_without(idb);
        assert_eq!(rest.len(), 1);
        assert!(rest.iter().all(|el| el.id() != idb));
    }
}
