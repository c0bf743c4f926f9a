//! Editor actions and the registry that dispatches them.

mod finalize;

pub use finalize::FinalizeAction;

use crate::binding::ShapeIndex;
use crate::config::FinalizeConfig;
use crate::element::Element;
use crate::input::KeyEvent;
use crate::scene::Scene;
use crate::state::EditorState;

/// Side effects an action may request from the host environment.
pub trait ActionHost {
    /// Restore the default cursor on the drawing surface.
    fn reset_cursor(&mut self);

    /// Whether keyboard focus sits on a UI element outside the drawing surface.
    fn is_focus_outside_canvas(&self) -> bool;

    /// Move keyboard focus back to the drawing surface container.
    fn focus_container(&mut self);
}

/// Capabilities handed to an action while it runs.
pub struct ActionContext<'a> {
    pub host: &'a mut dyn ActionHost,
    pub shape_index: &'a dyn ShapeIndex,
    pub config: &'a FinalizeConfig,
}

/// Outcome of running an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    /// New element collection back to front; `None` means no structural change.
    pub elements: Option<Vec<Element>>,
    /// Next editor state.
    pub editor_state: EditorState,
    /// Record this transition as an undo step.
    pub commit_to_history: bool,
}

/// Icons for action buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Done,
}

/// Description of a panel button that triggers an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolButton {
    /// Name of the action the button runs.
    pub action: &'static str,
    pub icon: Icon,
    /// Translation key for the title and aria label.
    pub title_key: &'static str,
    pub visible: bool,
}

/// An editor action.
pub trait Action {
    /// Unique action name.
    fn name(&self) -> &'static str;

    /// Run the action. Never fails: every condition resolves into the result.
    fn perform(
        &self,
        scene: &mut Scene,
        state: &EditorState,
        ctx: &mut ActionContext<'_>,
    ) -> ActionResult;

    /// Whether a key-down should trigger this action in the given state.
    fn key_test(&self, _event: &KeyEvent, _state: &EditorState) -> bool {
        false
    }

    /// Panel button for this action, if it has one.
    fn panel_button(&self, _state: &EditorState) -> Option<ToolButton> {
        None
    }
}

/// Registry of actions.
#[derive(Default)]
pub struct ActionManager {
    actions: Vec<Box<dyn Action>>,
}

impl ActionManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in actions.
    pub fn with_defaults() -> Self {
        let mut manager = Self::new();
        manager.register(Box::new(FinalizeAction));
        manager
    }

    /// Register an action. A later registration with the same name replaces
    /// the earlier one.
    pub fn register(&mut self, action: Box<dyn Action>) {
        self.actions.retain(|a| a.name() != action.name());
        self.actions.push(action);
    }

    /// Look up an action by name.
    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.iter().find(|a| a.name() == name).map(|a| a.as_ref())
    }

    /// Run the first action whose key test accepts the event.
    pub fn handle_key_down(
        &self,
        event: &KeyEvent,
        scene: &mut Scene,
        state: &EditorState,
        ctx: &mut ActionContext<'_>,
    ) -> Option<ActionResult> {
        let action = self.actions.iter().find(|a| a.key_test(event, state))?;
        log::debug!("Running action '{}' for {:?}", action.name(), event.key);
        Some(action.perform(scene, state, ctx))
    }

    /// Run an action by name (e.g. from a panel button).
    pub fn execute(
        &self,
        name: &str,
        scene: &mut Scene,
        state: &EditorState,
        ctx: &mut ActionContext<'_>,
    ) -> Option<ActionResult> {
        let action = self.get(name)?;
        log::debug!("Running action '{}' from panel", name);
        Some(action.perform(scene, state, ctx))
    }

    /// Buttons to show for the current state.
    pub fn visible_buttons(&self, state: &EditorState) -> Vec<ToolButton> {
        self.actions
            .iter()
            .filter_map(|a| a.panel_button(state))
            .filter(|b| b.visible)
            .collect()
    }

    /// Write an action result back into the session.
    pub fn apply(result: ActionResult, scene: &mut Scene, state: &mut EditorState) -> bool {
        if let Some(elements) = result.elements {
            scene.replace_all(elements);
        }
        *state = result.editor_state;
        result.commit_to_history
    }
}
