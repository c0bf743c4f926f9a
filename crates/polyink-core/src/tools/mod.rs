//! Tool identifiers for the canvas.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Selection,
    Rectangle,
    Diamond,
    Ellipse,
    Arrow,
    Line,
    Freedraw,
    Text,
    Image,
}

impl ToolKind {
    /// Check if this is the freehand drawing tool.
    pub fn is_freedraw(self) -> bool {
        self == ToolKind::Freedraw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_selection() {
        assert_eq!(ToolKind::default(), ToolKind::Selection);
    }

    #[test]
    fn test_is_freedraw() {
        assert!(ToolKind::Freedraw.is_freedraw());
        assert!(!ToolKind::Line.is_freedraw());
    }
}
