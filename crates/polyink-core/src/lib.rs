//! PolyInk Core Library
//!
//! Finalization of multi-point drawing sessions: trimming preview points,
//! dropping negligible elements, closing loops, binding arrow endpoints and
//! resetting the editor state when a line, arrow or freehand stroke is done.

pub mod actions;
pub mod binding;
pub mod config;
pub mod element;
pub mod geometry;
pub mod input;
pub mod linear_editor;
pub mod scene;
pub mod state;
pub mod tools;

pub use actions::{
    Action, ActionContext, ActionHost, ActionManager, ActionResult, FinalizeAction, ToolButton,
};
pub use binding::{BoundsShapeIndex, ShapeIndex};
pub use config::{ConfigError, FinalizeConfig};
pub use element::{Edge, Element, ElementId, ElementKind, ElementUpdate, KindPolicy, PointBinding};
pub use input::{Key, KeyEvent};
pub use linear_editor::{BindingTarget, LinearElementEditor};
pub use scene::{Scene, SceneError};
pub use state::{EditorState, PointerType, Zoom};
pub use tools::ToolKind;
