//! Finalize action: commits an in-progress multi-point or linear edit.

use super::{Action, ActionContext, ActionResult, Icon, ToolButton};
use crate::binding::{bind_or_unbind_linear_element, maybe_bind_linear_element};
use crate::element::{ElementId, ElementUpdate};
use crate::geometry::{is_invisibly_small, is_path_a_loop};
use crate::input::KeyEvent;
use crate::linear_editor::LinearElementEditor;
use crate::scene::Scene;
use crate::state::EditorState;
use crate::tools::ToolKind;

/// Ends multi-point placement, freehand drawing, or linear element editing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalizeAction;

impl FinalizeAction {
    pub const NAME: &'static str = "finalize";

    /// Finish editing an existing linear element. Returns `None` when the
    /// element is gone, letting the default path run instead.
    fn finalize_linear_edit(
        scene: &mut Scene,
        state: &EditorState,
        ctx: &mut ActionContext<'_>,
        editor: &LinearElementEditor,
    ) -> Option<ActionResult> {
        let element = LinearElementEditor::get_element(scene, editor.element_id)?;
        let id = element.id();
        let remove = element.points.len() < 2 || is_invisibly_small(element, ctx.config);

        // A dropped element must not end up in a container's bound elements.
        if !remove && element.kind.supports_binding() {
            if let Err(e) = bind_or_unbind_linear_element(
                scene,
                ctx.shape_index,
                id,
                editor.start_binding_element,
                editor.end_binding_element,
            ) {
                log::warn!("Failed to reconcile bindings for {}: {}", id, e);
            }
        }

        if remove {
            log::debug!("Removing degenerate linear element {}", id);
        }

        Some(ActionResult {
            elements: remove.then(|| scene.collect_without(id)),
            editor_state: EditorState {
                editing_linear_element: None,
                ..state.clone()
            },
            commit_to_history: true,
        })
    }

    /// The element being finished in the default path, if any.
    fn multi_point_subject(scene: &Scene, state: &EditorState) -> Option<ElementId> {
        if let Some(id) = state.multi_element {
            return scene.get(id).map(|el| el.id());
        }
        state
            .editing_element
            .and_then(|id| scene.get(id))
            .filter(|el| el.kind.is_freedraw())
            .map(|el| el.id())
    }

    /// Trim, elide, close and bind the subject. Returns the id to drop from
    /// the collection when the subject turned out invisibly small.
    fn finalize_subject(
        scene: &mut Scene,
        state: &EditorState,
        ctx: &mut ActionContext<'_>,
        id: ElementId,
    ) -> Option<ElementId> {
        let element = scene.get(id)?;
        let policy = element.kind.policy();

        // Mouse and pen leave a hover point behind the last click.
        if policy.trims_trailing_point
            && state.last_pointer_down_with.has_hover()
            && !element.trailing_point_committed()
        {
            let mut points = element.points.clone();
            points.pop();
            log::trace!("Dropping preview point of {}", id);
            if let Err(e) = scene.mutate_element(id, ElementUpdate::points(points), true) {
                log::warn!("Failed to trim {}: {}", id, e);
            }
        }

        let element = scene.get(id)?;
        let removed = is_invisibly_small(element, ctx.config).then_some(id);

        let is_loop = is_path_a_loop(&element.points, state.zoom, ctx.config);
        if is_loop && policy.closes_loops {
            // Exact equality keeps the loop closed at any zoom.
            let mut points = element.points.clone();
            let first = points[0];
            if let Some(last) = points.last_mut() {
                *last = first;
            }
            if let Err(e) = scene.mutate_element(id, ElementUpdate::points(points), true) {
                log::warn!("Failed to close loop of {}: {}", id, e);
            }
        }

        let element = scene.get(id)?;
        if removed.is_none() && policy.supports_binding && !is_loop && element.points.len() > 1 {
            if let Some(end) = LinearElementEditor::point_at_index_global_coordinates(element, -1) {
                if let Err(e) = maybe_bind_linear_element(scene, ctx.shape_index, id, state, end) {
                    log::debug!("Binding skipped for {}: {}", id, e);
                }
            }
        }

        removed
    }
}

impl Action for FinalizeAction {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn perform(
        &self,
        scene: &mut Scene,
        state: &EditorState,
        ctx: &mut ActionContext<'_>,
    ) -> ActionResult {
        if let Some(editor) = &state.editing_linear_element {
            if let Some(result) = Self::finalize_linear_edit(scene, state, ctx, editor) {
                return result;
            }
            log::debug!("Edited element {} is gone, finalizing as usual", editor.element_id);
        }

        if let Some(pending) = state.pending_image_element {
            if let Err(e) = scene.mutate_element(pending, ElementUpdate::deleted(), false) {
                log::debug!("Pending placeholder not removed: {}", e);
            }
        }

        if ctx.host.is_focus_outside_canvas() {
            ctx.host.focus_container();
        }

        let subject = Self::multi_point_subject(scene, state);
        let removed = subject.and_then(|id| Self::finalize_subject(scene, state, ctx, id));

        let keeps_tool = state.element_locked || state.element_type.is_freedraw();
        if !keeps_tool || subject.is_none() {
            ctx.host.reset_cursor();
        }

        let mut selected_element_ids = state.selected_element_ids.clone();
        if let Some(id) = subject.filter(|_| !keeps_tool) {
            selected_element_ids.insert(id, true);
        }

        let element_type = if keeps_tool && subject.is_some() {
            state.element_type
        } else {
            ToolKind::Selection
        };

        ActionResult {
            elements: removed.map(|id| scene.collect_without(id)),
            editor_state: EditorState {
                element_type,
                dragging_element: None,
                multi_element: None,
                editing_element: None,
                start_bound_element: None,
                suggested_bindings: Vec::new(),
                selected_element_ids,
                pending_image_element: None,
                ..state.clone()
            },
            commit_to_history: state.element_type == ToolKind::Freedraw,
        }
    }

    fn key_test(&self, event: &KeyEvent, state: &EditorState) -> bool {
        (event.is_escape()
            && (state.editing_linear_element.is_some()
                || (state.dragging_element.is_none() && state.multi_element.is_none())))
            || ((event.is_escape() || event.is_enter()) && state.multi_element.is_some())
    }

    fn panel_button(&self, state: &EditorState) -> Option<ToolButton> {
        Some(ToolButton {
            action: Self::NAME,
            icon: Icon::Done,
            title_key: "buttons.done",
            visible: state.multi_element.is_some(),
        })
    }
}
