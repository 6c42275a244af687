use image::RgbaImage;
use sprite_engine::{Rectangle, SpriteRegion};

/// Surface the embedding shell implements. The editor drives every visible
/// update through these callbacks, so shells stay free of editing logic.
///
/// No call here may re-enter the editor; notification loops are broken with
/// the selection suppression flag instead.
pub trait EditorView {
    /// Replace the whole sprite list with the given rows, in order.
    fn update_sprite_list(&mut self, sprites: &[SpriteRegion]);

    /// Refresh the row of a single sprite in place.
    fn update_sprite_row(&mut self, id: &str, sprite: &SpriteRegion);

    /// Highlight the row of `id`, or clear the highlight.
    fn set_list_selection(&mut self, id: Option<&str>);

    /// Bracket a batch of list changes, e.g. to pause repaints.
    fn begin_list_update(&mut self) {}
    fn end_list_update(&mut self) {}

    /// Show a freshly rendered thumbnail under its sprite key.
    fn update_thumbnail(&mut self, key: &str, image: &RgbaImage);

    /// Drop the thumbnail stored under `key`.
    fn remove_thumbnail(&mut self, key: &str);

    /// Drop every thumbnail, e.g. before a full rebuild.
    fn clear_thumbnails(&mut self);

    /// Point the property inspector at a sprite, or clear it.
    fn set_inspector_target(&mut self, sprite: Option<&SpriteRegion>);

    fn update_status(&mut self, message: &str);

    fn invalidate_canvas(&mut self);

    /// Bring the given document-space bounds into view.
    fn scroll_to_sprite(&mut self, bounds: Rectangle);

    /// Ask the user a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Standard columns of a sprite list row: name, position, size.
pub fn sprite_row_columns(sprite: &SpriteRegion) -> [String; 3] {
    [
        sprite.name.clone(),
        format!("{}, {}", sprite.bounds.x, sprite.bounds.y),
        format!("{}×{}", sprite.bounds.width, sprite.bounds.height),
    ]
}
