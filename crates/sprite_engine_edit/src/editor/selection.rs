use sprite_engine::{Handle, Position, Rectangle};

/// What the pointer is currently doing on the canvas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Dragging out a new sprite rectangle from `origin`.
    Drawing { origin: Position, rect: Rectangle },
    /// Dragging the selected sprite; `last` is the previous sample point.
    Moving { last: Position },
    /// Dragging one resize handle of the selected sprite.
    Resizing { handle: Handle, last: Position },
}

/// Selection and gesture state of the editor.
///
/// `focused` marks the sprite highlighted through the list without being
/// the drag target; it never gates any edit operation.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    pub(crate) selected_id: Option<String>,
    pub(crate) focused_id: Option<String>,
    pub(crate) mode: InteractionMode,
    suppress_notifications: bool,
}

impl SelectionController {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.focused_id.as_deref()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// True while the editor itself is changing the list selection; view
    /// echoes must be ignored during that window.
    pub fn is_suppressed(&self) -> bool {
        self.suppress_notifications
    }

    pub(crate) fn suppress(&mut self, on: bool) {
        self.suppress_notifications = on;
    }
}
