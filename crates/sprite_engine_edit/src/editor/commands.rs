//! Editor commands as a serializable enum
//!
//! Every undoable mutation of the sprite registry is captured here, so a
//! whole editing session's history can be persisted and replayed.

use serde::{Deserialize, Serialize};
use sprite_engine::{EngineError, EngineResult, SpriteRegion};

use super::EditState;

/// One undoable edit. Commands that own a sprite keep it in an `Option`
/// payload that moves between the registry and the history entry: present
/// exactly while the sprite is *not* in the registry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EditorCommand {
    /// Insert a sprite at a registry position
    AddSprite {
        index: usize,
        name: String,
        sprite: Option<SpriteRegion>,
    },

    /// Remove the sprite at a registry position
    RemoveSprite {
        index: usize,
        name: String,
        sprite: Option<SpriteRegion>,
    },
}

impl EditorCommand {
    pub fn get_description(&self) -> String {
        match self {
            EditorCommand::AddSprite { name, .. } => format!("Add '{name}' sprite"),
            EditorCommand::RemoveSprite { name, .. } => format!("Delete '{name}'"),
        }
    }

    /// Perform the undo operation
    pub fn undo(&mut self, edit_state: &mut EditState) -> EngineResult<()> {
        match self {
            EditorCommand::AddSprite { index, sprite, .. } => {
                *sprite = Some(edit_state.remove_sprite_internal(*index)?);
                Ok(())
            }
            EditorCommand::RemoveSprite { index, sprite, .. } => {
                let region = sprite.take().ok_or(EngineError::MissingCommandPayload)?;
                edit_state.insert_sprite_internal(*index, region);
                Ok(())
            }
        }
    }

    /// Perform the redo operation
    pub fn redo(&mut self, edit_state: &mut EditState) -> EngineResult<()> {
        match self {
            EditorCommand::AddSprite { index, sprite, .. } => {
                let region = sprite.take().ok_or(EngineError::MissingCommandPayload)?;
                edit_state.insert_sprite_internal(*index, region);
                Ok(())
            }
            EditorCommand::RemoveSprite { index, sprite, .. } => {
                *sprite = Some(edit_state.remove_sprite_internal(*index)?);
                Ok(())
            }
        }
    }
}
