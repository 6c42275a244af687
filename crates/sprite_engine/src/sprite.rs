use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Position, Rectangle};

/// Mint a new sprite id (dashless hex, the form persisted in project files).
pub fn generate_sprite_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// A named rectangular crop area over the source image.
///
/// `id` is assigned once and never changes afterwards; two regions with
/// identical name and bounds are still distinct sprites.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteRegion {
    #[serde(default, alias = "Id")]
    pub id: String,

    #[serde(default = "default_sprite_name", alias = "Name")]
    pub name: String,

    #[serde(default, alias = "Bounds")]
    pub bounds: Rectangle,

    #[serde(default, alias = "Pivot")]
    pub pivot: Position,

    /// Invisible sprites stay in the registry but are excluded from
    /// hit-testing, rendering and list display.
    #[serde(default = "default_true", alias = "Visible", alias = "IsVisible", alias = "isVisible")]
    pub visible: bool,

    // Stand-in key for sprites loaded without an id, cached so repeated
    // lookups never mint a fresh key for the same instance.
    #[serde(skip)]
    pub(crate) fallback_key: Option<String>,
}

fn default_sprite_name() -> String {
    "Sprite".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SpriteRegion {
    fn default() -> Self {
        Self {
            id: generate_sprite_id(),
            name: default_sprite_name(),
            bounds: Rectangle::default(),
            pivot: Position::default(),
            visible: true,
            fallback_key: None,
        }
    }
}

impl SpriteRegion {
    pub fn new(name: impl Into<String>, bounds: Rectangle) -> Self {
        Self {
            name: name.into(),
            bounds,
            ..Self::default()
        }
    }

    /// Stable cache key for thumbnails: the sprite id when present,
    /// otherwise a generated key bound to this instance for its lifetime.
    pub fn thumbnail_key(&mut self) -> &str {
        if self.id.is_empty() {
            self.fallback_key.get_or_insert_with(generate_sprite_id)
        } else {
            &self.id
        }
    }
}
