use serde::{Deserialize, Serialize};

use crate::{SpriteRegion, generate_sprite_id};

/// Ordered sprite collection of a project.
///
/// Insertion order is significant: it drives list display, z-order and the
/// position undo re-inserts a deleted sprite at.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteRegistry {
    sprites: Vec<SpriteRegion>,
}

impl SpriteRegistry {
    /// Insert at `index`, clamped to `[0, len]`. Sprites arriving without
    /// an id (legacy documents) are assigned one here.
    pub fn insert(&mut self, index: usize, mut sprite: SpriteRegion) {
        if sprite.id.is_empty() {
            sprite.id = generate_sprite_id();
        }
        let index = index.min(self.sprites.len());
        self.sprites.insert(index, sprite);
    }

    pub fn push(&mut self, sprite: SpriteRegion) {
        self.insert(self.sprites.len(), sprite);
    }

    /// Remove by id. Returns the sprite, or `None` if no sprite owns `id`.
    pub fn remove(&mut self, id: &str) -> Option<SpriteRegion> {
        let index = self.index_of(id)?;
        Some(self.sprites.remove(index))
    }

    /// Remove by position. Callers check the index first.
    pub fn remove_at(&mut self, index: usize) -> SpriteRegion {
        self.sprites.remove(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sprites.iter().position(|sprite| sprite.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&SpriteRegion> {
        self.sprites.iter().find(|sprite| sprite.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut SpriteRegion> {
        self.sprites.iter_mut().find(|sprite| sprite.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&SpriteRegion> {
        self.sprites.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SpriteRegion> {
        self.sprites.get_mut(index)
    }

    pub fn sprites(&self) -> &[SpriteRegion] {
        &self.sprites
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpriteRegion> {
        self.sprites.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, SpriteRegion> {
        self.sprites.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }
}

impl<'a> IntoIterator for &'a SpriteRegistry {
    type Item = &'a SpriteRegion;
    type IntoIter = std::slice::Iter<'a, SpriteRegion>;

    fn into_iter(self) -> Self::IntoIter {
        self.sprites.iter()
    }
}
