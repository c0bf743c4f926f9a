//! Binding of linear element endpoints to nearby containers.
//!
//! The distance primitives live behind [`ShapeIndex`] so hosts can plug in
//! exact outline tests. [`BoundsShapeIndex`] is a bounds-based default.

use crate::element::{Edge, Element, ElementId, ElementUpdate, PointBinding};
use crate::linear_editor::{BindingTarget, LinearElementEditor};
use crate::scene::{Scene, SceneError, SceneResult};
use crate::state::{EditorState, Zoom};
use kurbo::{Point, Vec2};
use std::collections::HashSet;

/// Smallest binding gap in world units.
const MIN_BINDING_GAP: f64 = 16.0;
/// Largest binding gap in world units.
const MAX_BINDING_GAP: f64 = 32.0;

/// Host-provided spatial queries used to resolve bindings.
pub trait ShapeIndex {
    /// Find the container an endpoint at `point` (global coordinates) should
    /// bind to, if any lies within binding distance.
    fn bindable_element_at(
        &self,
        scene: &Scene,
        linear: &Element,
        point: Point,
        zoom: Zoom,
    ) -> Option<ElementId>;

    /// Compute `(focus, gap)` for binding `edge` of `linear` to `container`.
    fn focus_and_gap(&self, linear: &Element, container: &Element, edge: Edge) -> (f64, f64);
}

/// Maximum distance at which an endpoint binds to a container of this size.
pub fn max_binding_gap(width: f64, height: f64) -> f64 {
    let smaller = width.abs().min(height.abs());
    (0.25 * smaller).min(MAX_BINDING_GAP).max(MIN_BINDING_GAP)
}

/// Bounds-based shape index over the scene's containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsShapeIndex;

impl BoundsShapeIndex {
    fn edge_points(linear: &Element, edge: Edge) -> Option<(Point, Point)> {
        let (end, adjacent) = match edge {
            Edge::Start => (0, 1),
            Edge::End => (-1, -2),
        };
        Some((
            LinearElementEditor::point_at_index_global_coordinates(linear, end)?,
            LinearElementEditor::point_at_index_global_coordinates(linear, adjacent)?,
        ))
    }
}

impl ShapeIndex for BoundsShapeIndex {
    fn bindable_element_at(
        &self,
        scene: &Scene,
        linear: &Element,
        point: Point,
        zoom: Zoom,
    ) -> Option<ElementId> {
        // Topmost container wins.
        scene
            .non_deleted_elements()
            .rev()
            .filter(|el| el.kind.is_bindable() && el.id() != linear.id())
            .find(|el| {
                let threshold = max_binding_gap(el.width, el.height) / zoom.value();
                el.bounds().inflate(threshold, threshold).contains(point)
            })
            .map(|el| el.id())
    }

    fn focus_and_gap(&self, linear: &Element, container: &Element, edge: Edge) -> (f64, f64) {
        let bounds = container.bounds();
        let Some((end, adjacent)) = Self::edge_points(linear, edge) else {
            return (0.0, 0.0);
        };

        let dx = (bounds.x0 - end.x).max(end.x - bounds.x1).max(0.0);
        let dy = (bounds.y0 - end.y).max(end.y - bounds.y1).max(0.0);
        let gap = Vec2::new(dx, dy).hypot();

        let dir = end - adjacent;
        let half_diagonal = Vec2::new(bounds.width(), bounds.height()).hypot() / 2.0;
        if dir.hypot() < f64::EPSILON || half_diagonal < f64::EPSILON {
            return (0.0, gap);
        }
        let signed = dir.cross(bounds.center() - adjacent) / dir.hypot();
        ((signed / half_diagonal).clamp(-1.0, 1.0), gap)
    }
}

/// Whether `linear` has two points and its other edge is already bound to
/// `container`. Binding both ends of a straight segment to one shape is refused.
fn is_simple_and_already_bound_on_opposite_edge(
    linear: &Element,
    container: ElementId,
    edge: Edge,
) -> bool {
    linear
        .binding(edge.opposite())
        .is_some_and(|b| b.element_id == container)
        && linear.points.len() < 3
}

/// Bind `edge` of a linear element to a container, recording the linear
/// element on the container's `bound_elements`.
pub fn bind_linear_element(
    scene: &mut Scene,
    index: &dyn ShapeIndex,
    linear_id: ElementId,
    container_id: ElementId,
    edge: Edge,
) -> SceneResult<()> {
    let linear = scene
        .get_non_deleted(linear_id)
        .ok_or(SceneError::ElementNotFound(linear_id))?;
    let container = scene
        .get_non_deleted(container_id)
        .ok_or(SceneError::ElementNotFound(container_id))?;

    let (focus, gap) = index.focus_and_gap(linear, container, edge);
    let mut bound = container.bound_elements.clone();
    if !bound.contains(&linear_id) {
        bound.push(linear_id);
    }

    let binding = PointBinding {
        element_id: container_id,
        focus,
        gap,
    };
    scene.mutate_element(linear_id, ElementUpdate::binding(edge, Some(binding)), true)?;
    scene.mutate_element(container_id, ElementUpdate::bound_elements(bound), true)?;
    log::debug!("Bound {:?} of {} to {}", edge, linear_id, container_id);
    Ok(())
}

/// Release `edge` of a linear element. Returns the container it was bound to.
pub fn unbind_linear_element(
    scene: &mut Scene,
    linear_id: ElementId,
    edge: Edge,
) -> SceneResult<Option<ElementId>> {
    let linear = scene
        .get(linear_id)
        .ok_or(SceneError::ElementNotFound(linear_id))?;
    let Some(previous) = linear.binding(edge).map(|b| b.element_id) else {
        return Ok(None);
    };
    scene.mutate_element(linear_id, ElementUpdate::binding(edge, None), true)?;
    log::debug!("Unbound {:?} of {} from {}", edge, linear_id, previous);
    Ok(Some(previous))
}

/// Containers touched while reconciling a linear element's edges.
#[derive(Debug, Default)]
struct BindingChanges {
    bound_to: HashSet<ElementId>,
    unbound_from: HashSet<ElementId>,
}

fn bind_or_unbind_edge(
    scene: &mut Scene,
    index: &dyn ShapeIndex,
    linear_id: ElementId,
    (target, other_target): (BindingTarget, BindingTarget),
    edge: Edge,
    changes: &mut BindingChanges,
) -> SceneResult<()> {
    match target {
        BindingTarget::Keep => {}
        BindingTarget::Unbound => {
            if let Some(previous) = unbind_linear_element(scene, linear_id, edge)? {
                changes.unbound_from.insert(previous);
            }
        }
        BindingTarget::Element(container_id) => {
            let linear = scene
                .get(linear_id)
                .ok_or(SceneError::ElementNotFound(linear_id))?;
            // The start edge takes precedence when both name the same container.
            let should_bind = match other_target {
                BindingTarget::Unbound => true,
                BindingTarget::Keep => {
                    !is_simple_and_already_bound_on_opposite_edge(linear, container_id, edge)
                }
                BindingTarget::Element(other) => edge == Edge::Start || other != container_id,
            };
            if should_bind {
                match bind_linear_element(scene, index, linear_id, container_id, edge) {
                    Ok(()) => {
                        changes.bound_to.insert(container_id);
                    }
                    Err(SceneError::ElementNotFound(id)) if id == container_id => {
                        log::debug!("Binding target {} no longer exists, skipping", id);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }
    Ok(())
}

/// Reconcile both edges of a linear element against recorded targets.
///
/// Containers that lost the element, and did not regain it on the other
/// edge, drop it from their `bound_elements`. Calling this again with the
/// same targets changes nothing.
pub fn bind_or_unbind_linear_element(
    scene: &mut Scene,
    index: &dyn ShapeIndex,
    linear_id: ElementId,
    start: BindingTarget,
    end: BindingTarget,
) -> SceneResult<()> {
    let mut seen = BindingChanges::default();
    for (edge, target, other) in [(Edge::Start, start, end), (Edge::End, end, start)] {
        bind_or_unbind_edge(scene, index, linear_id, (target, other), edge, &mut seen)?;
    }

    for container_id in seen.unbound_from.difference(&seen.bound_to) {
        let Some(container) = scene.get_non_deleted(*container_id) else {
            continue;
        };
        let remaining: Vec<ElementId> = container
            .bound_elements
            .iter()
            .copied()
            .filter(|id| *id != linear_id)
            .collect();
        scene.mutate_element(*container_id, ElementUpdate::bound_elements(remaining), true)?;
    }
    Ok(())
}

/// Bind a freshly drawn linear element: the start edge to the state's
/// `start_bound_element`, the end edge to whatever container sits at
/// `point`.
pub fn maybe_bind_linear_element(
    scene: &mut Scene,
    index: &dyn ShapeIndex,
    linear_id: ElementId,
    state: &EditorState,
    point: Point,
) -> SceneResult<()> {
    if let Some(start) = state.start_bound_element {
        if let Err(e) = bind_linear_element(scene, index, linear_id, start, Edge::Start) {
            log::debug!("Start binding skipped: {}", e);
        }
    }

    let linear = scene
        .get_non_deleted(linear_id)
        .ok_or(SceneError::ElementNotFound(linear_id))?;
    let Some(hovered) = index.bindable_element_at(scene, linear, point, state.zoom) else {
        log::trace!("No bindable element at {:?}", point);
        return Ok(());
    };
    if !is_simple_and_already_bound_on_opposite_edge(linear, hovered, Edge::End) {
        bind_linear_element(scene, index, linear_id, hovered, Edge::End)?;
    }
    Ok(())
}
