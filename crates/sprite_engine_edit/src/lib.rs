mod editor;
pub use editor::*;

pub mod thumbnails;
pub use thumbnails::{ThumbnailJob, ThumbnailLoader, ThumbnailUpdate};

// Re-export all necessary types from sprite_engine
pub use sprite_engine::{
    CursorKind, EngineError, EngineResult, Exporter, HANDLE_SIZE, Handle, JsonProjectStore, MIN_SPRITE_SIZE, PngExporter, Position, Project, ProjectSettings,
    ProjectStore, Rectangle, Size, SpriteRegion, SpriteRegistry, THUMBNAIL_SIZE, handle_points, hit_test_handles, hit_test_sprites, placeholder_thumbnail,
    render_thumbnail,
};
