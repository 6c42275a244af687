use serde::{Deserialize, Serialize};
use sprite_engine::EngineResult;

use super::EditorCommand;

/// Undo/redo surface of the editor, e.g. for wiring up menu entries.
pub trait UndoState {
    fn undo_description(&self) -> Option<String>;
    fn can_undo(&self) -> bool;

    /// Revert the most recent command.
    ///
    /// # Errors
    ///
    /// Fails when the command cannot be replayed against the current
    /// project, e.g. a history entry that lost its sprite payload.
    fn undo(&mut self) -> EngineResult<()>;

    fn redo_description(&self) -> Option<String>;
    fn can_redo(&self) -> bool;

    /// Re-apply the most recently undone command.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`UndoState::undo`].
    fn redo(&mut self) -> EngineResult<()>;
}

/// What just happened to the command stack. Internal listeners use this to
/// decide how much view state to rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationType {
    Execute,
    Undo,
    Redo,
    Clear,
}

const MAX_HISTORY: usize = 100;

/// Serializable command history with separate undo and redo sides.
///
/// The undo side is capped at `MAX_HISTORY` entries; overflow evicts the
/// oldest entry so recent work always stays undoable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommandStack {
    undo_stack: Vec<EditorCommand>,
    redo_stack: Vec<EditorCommand>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly executed command. Clears the redo side.
    pub fn push(&mut self, op: EditorCommand) {
        self.redo_stack.clear();
        self.undo_stack.push(op);
        while self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Put a command back on the undo side without touching redo.
    /// Used when a redo re-applies a command.
    pub fn push_undo(&mut self, op: EditorCommand) {
        self.undo_stack.push(op);
    }

    pub fn pop_undo(&mut self) -> Option<EditorCommand> {
        self.undo_stack.pop()
    }

    pub fn push_redo(&mut self, op: EditorCommand) {
        self.redo_stack.push(op);
    }

    pub fn pop_redo(&mut self) -> Option<EditorCommand> {
        self.redo_stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(EditorCommand::get_description)
    }

    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(EditorCommand::get_description)
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
