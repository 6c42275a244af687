pub mod undo_stack;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub use undo_stack::*;

pub mod commands;
pub use commands::EditorCommand;

mod selection;
pub use selection::*;

mod view;
pub use view::*;

use image::RgbaImage;
use sprite_engine::{
    CursorKind, EngineError, EngineResult, Exporter, MIN_SPRITE_SIZE, Position, Project, Rectangle, SpriteRegion, apply_resize, cursor_for_handle,
    hit_test_handles, hit_test_sprites,
};
use tokio::sync::mpsc;

use crate::thumbnails::{ThumbnailJob, ThumbnailLoader, ThumbnailUpdate};

/// Field of the selected sprite the inspector can edit directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpriteField {
    X,
    Y,
    Width,
    Height,
}

/// The editing session around one sprite sheet: the project model, the
/// selection and gesture state, the undoable command history and the
/// asynchronously filled thumbnail cache.
///
/// All mutation entry points run synchronously against the model; only
/// thumbnail rendering happens off-thread, and its results are applied
/// when the embedder calls [`EditState::poll_thumbnails`].
pub struct EditState {
    project: Project,
    source_image: Option<Arc<RgbaImage>>,
    view: Box<dyn EditorView>,
    selection: SelectionController,

    /// Serializable undo stack (wrapped in Arc<Mutex> so commands can run
    /// against `self` while the stack stays reachable)
    command_stack: Arc<Mutex<CommandStack>>,

    thumbnail_cache: HashMap<String, RgbaImage>,
    loader: ThumbnailLoader,
    results: mpsc::UnboundedReceiver<ThumbnailUpdate>,
    /// Dispatched renders whose results have not been applied yet.
    pending_results: usize,
    /// Renders handed to the loader so far; cache hits do not count.
    renders_requested: usize,

    /// Numbers the `Sprite_{n}` names of drawn sprites.
    sprite_counter: u32,
    /// Selected sprite bounds as of the last view sync, so out-of-band
    /// model edits can be noticed in [`EditState::tick`].
    last_known_bounds: Option<Rectangle>,
}

impl EditState {
    pub fn new(view: Box<dyn EditorView>) -> Self {
        let (loader, results) = ThumbnailLoader::spawn();
        Self {
            project: Project::default(),
            source_image: None,
            view,
            selection: SelectionController::default(),
            command_stack: Arc::new(Mutex::new(CommandStack::new())),
            thumbnail_cache: HashMap::new(),
            loader,
            results,
            pending_results: 0,
            renders_requested: 0,
            sprite_counter: 1,
            last_known_bounds: None,
        }
    }

    pub fn get_project(&self) -> &Project {
        &self.project
    }

    pub fn get_project_mut(&mut self) -> &mut Project {
        &mut self.project
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn selected_sprite(&self) -> Option<&SpriteRegion> {
        self.selection.selected_id.as_deref().and_then(|id| self.project.sprites.find(id))
    }

    pub fn source_image(&self) -> Option<&Arc<RgbaImage>> {
        self.source_image.as_ref()
    }

    pub fn cached_thumbnail(&self, key: &str) -> Option<&RgbaImage> {
        self.thumbnail_cache.get(key)
    }

    pub fn renders_requested(&self) -> usize {
        self.renders_requested
    }

    pub fn pending_thumbnails(&self) -> usize {
        self.pending_results
    }

    pub fn undo_stack_len(&self) -> usize {
        self.command_stack.lock().unwrap().undo_len()
    }

    pub fn redo_stack_len(&self) -> usize {
        self.command_stack.lock().unwrap().redo_len()
    }

    /// Get clone of the undo stack (for serialization)
    pub fn get_undo_stack(&self) -> Arc<Mutex<CommandStack>> {
        self.command_stack.clone()
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Load a sheet image and reset the editing session around it: sprites,
    /// name counter and history all start over.
    pub fn open_image(&mut self, path: &Path) {
        match image::open(path) {
            Ok(img) => {
                self.source_image = Some(Arc::new(img.to_rgba8()));
                self.project.source_image_path = path.to_string_lossy().to_string();
                self.project.sprites.clear();
                self.sprite_counter = 1;
                self.select_sprite(None);
                let file_name = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().to_string());
                self.view.update_status(&format!("Loaded: {file_name}"));
                self.clear_history();
            }
            Err(err) => {
                log::warn!("Could not open {}: {err}", path.display());
                self.view.update_status(&format!("Error loading image: {err}"));
            }
        }
    }

    /// Replace the current project, e.g. after loading one from disk. The
    /// source image is reopened best-effort; sprites keep working without
    /// it, with placeholder thumbnails.
    pub fn set_project(&mut self, project: Project) {
        self.project = project;
        self.source_image = None;
        if !self.project.source_image_path.is_empty() {
            let path = Path::new(&self.project.source_image_path);
            match image::open(path) {
                Ok(img) => self.source_image = Some(Arc::new(img.to_rgba8())),
                Err(err) => log::warn!("Could not open source image {}: {err}", path.display()),
            }
        }
        self.select_sprite(None);
        self.clear_history();
    }

    // =========================================================================
    // Mouse gestures
    // =========================================================================

    /// Begin a gesture: resize when a handle of the hit sprite is under the
    /// pointer, move when its body is, otherwise start drawing a new sprite.
    pub fn mouse_down(&mut self, pos: Position) {
        if self.project.source_image_path.is_empty() {
            self.view.update_status("Please load an image first.");
            return;
        }

        let hit = hit_test_sprites(self.project.sprites.sprites(), pos).map(|sprite| (sprite.id.clone(), sprite.bounds));
        if let Some((id, bounds)) = hit {
            self.select_sprite(Some(&id));
            if let Some(handle) = hit_test_handles(bounds, pos) {
                self.selection.mode = InteractionMode::Resizing { handle, last: pos };
            } else {
                self.selection.mode = InteractionMode::Moving { last: pos };
            }
        } else {
            self.select_sprite(None);
            self.selection.mode = InteractionMode::Drawing {
                origin: pos,
                rect: Rectangle::new(pos.x, pos.y, 0, 0),
            };
        }
        self.view.invalidate_canvas();
    }

    /// Advance the active gesture to `pos`. Returns the pointer shape the
    /// canvas should show.
    pub fn mouse_move(&mut self, pos: Position) -> CursorKind {
        match self.selection.mode {
            InteractionMode::Drawing { origin, .. } => {
                self.selection.mode = InteractionMode::Drawing {
                    origin,
                    rect: Rectangle::from_pt(origin, pos),
                };
                self.view.invalidate_canvas();
                CursorKind::Default
            }
            InteractionMode::Moving { last } => {
                let delta = pos - last;
                if delta.x != 0 || delta.y != 0 {
                    self.drag_selected(pos, |bounds| {
                        bounds.x += delta.x;
                        bounds.y += delta.y;
                    });
                }
                CursorKind::Default
            }
            InteractionMode::Resizing { handle, last } => {
                let delta = pos - last;
                self.drag_selected(pos, |bounds| {
                    *bounds = apply_resize(*bounds, handle, delta.x, delta.y);
                });
                cursor_for_handle(handle)
            }
            InteractionMode::Idle => {
                if let Some(sprite) = self.selected_sprite() {
                    if let Some(handle) = hit_test_handles(sprite.bounds, pos) {
                        return cursor_for_handle(handle);
                    }
                }
                CursorKind::Default
            }
        }
    }

    /// Finish the active gesture: a finished draw larger than the sprite
    /// minimum becomes an undoable add, a finished move/resize syncs the
    /// views and reports the new geometry.
    pub fn mouse_up(&mut self, pos: Position) -> EngineResult<()> {
        match self.selection.mode {
            InteractionMode::Drawing { origin, .. } => {
                self.selection.mode = InteractionMode::Idle;
                let rect = Rectangle::from_pt(origin, pos);
                if rect.width > MIN_SPRITE_SIZE && rect.height > MIN_SPRITE_SIZE {
                    let name = format!("Sprite_{}", self.sprite_counter);
                    self.sprite_counter += 1;
                    let sprite = SpriteRegion::new(&name, rect);
                    let id = sprite.id.clone();
                    let index = self.project.sprites.len();
                    self.push_undo_action(EditorCommand::AddSprite {
                        index,
                        name,
                        sprite: Some(sprite),
                    })?;
                    self.select_sprite(Some(&id));
                }
                self.view.invalidate_canvas();
            }
            InteractionMode::Moving { .. } | InteractionMode::Resizing { .. } => {
                self.selection.mode = InteractionMode::Idle;
                if let Some(snapshot) = self.sync_selected_sprite() {
                    let bounds = snapshot.bounds;
                    self.view.update_status(&format!(
                        "Sprite updated. Position: ({}, {}), Size: {}x{}",
                        bounds.x, bounds.y, bounds.width, bounds.height
                    ));
                }
            }
            InteractionMode::Idle => {}
        }
        Ok(())
    }

    /// Apply `change` to the selected sprite's bounds mid-drag and push the
    /// new geometry to every view surface.
    fn drag_selected(&mut self, pos: Position, change: impl FnOnce(&mut Rectangle)) {
        let Some(id) = self.selection.selected_id.clone() else {
            return;
        };
        let Some(sprite) = self.project.sprites.find_mut(&id) else {
            return;
        };
        change(&mut sprite.bounds);
        let key = sprite.thumbnail_key().to_string();
        let snapshot = sprite.clone();

        self.selection.mode = match self.selection.mode {
            InteractionMode::Moving { .. } => InteractionMode::Moving { last: pos },
            InteractionMode::Resizing { handle, .. } => InteractionMode::Resizing { handle, last: pos },
            other => other,
        };
        self.last_known_bounds = Some(snapshot.bounds);
        self.view.invalidate_canvas();
        self.view.set_inspector_target(Some(&snapshot));
        self.refresh_thumbnail(key, snapshot.bounds);
        self.view.update_sprite_row(&snapshot.id, &snapshot);
    }

    /// Push the selected sprite's current state to thumbnail, row and
    /// monitor. Returns a snapshot when something was selected.
    fn sync_selected_sprite(&mut self) -> Option<SpriteRegion> {
        let id = self.selection.selected_id.clone()?;
        let sprite = self.project.sprites.find_mut(&id)?;
        let key = sprite.thumbnail_key().to_string();
        let snapshot = sprite.clone();
        self.last_known_bounds = Some(snapshot.bounds);
        self.refresh_thumbnail(key, snapshot.bounds);
        self.view.update_sprite_row(&snapshot.id, &snapshot);
        Some(snapshot)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Make `id` the selected sprite (or clear the selection) and sync the
    /// list highlight, inspector and bounds monitor.
    pub fn select_sprite(&mut self, id: Option<&str>) {
        let resolved = id.and_then(|id| self.project.sprites.find(id)).cloned();
        self.selection.suppress(true);
        match &resolved {
            Some(sprite) => {
                self.selection.selected_id = Some(sprite.id.clone());
                self.last_known_bounds = Some(sprite.bounds);
                self.view.set_list_selection(Some(&sprite.id));
                self.view.set_inspector_target(Some(sprite));
            }
            None => {
                self.selection.selected_id = None;
                self.last_known_bounds = None;
                self.view.set_list_selection(None);
                self.view.set_inspector_target(None);
            }
        }
        self.selection.suppress(false);
        self.view.invalidate_canvas();
    }

    /// The embedder calls this when the user picks a row in the sprite
    /// list. Echoes of the editor's own list updates are ignored.
    pub fn on_list_selection_changed(&mut self, id: Option<&str>) {
        if self.selection.is_suppressed() {
            return;
        }
        let hit = id.and_then(|id| self.project.sprites.find(id)).map(|sprite| (sprite.id.clone(), sprite.bounds));
        match hit {
            Some((id, bounds)) => {
                self.select_sprite(Some(&id));
                self.selection.focused_id = Some(id);
                self.view.scroll_to_sprite(bounds);
            }
            None => self.selection.focused_id = None,
        }
    }

    /// Center the view on a sprite and mark it focused, without changing
    /// the selection. Wired to double-clicks on the sprite list.
    pub fn focus_sprite(&mut self, id: &str) {
        let Some(sprite) = self.project.sprites.find(id) else {
            return;
        };
        let bounds = sprite.bounds;
        let name = sprite.name.clone();
        self.selection.focused_id = Some(sprite.id.clone());
        self.view.scroll_to_sprite(bounds);
        self.view.invalidate_canvas();
        self.view.update_status(&format!("Focused: {name}"));
    }

    /// Abort any in-flight gesture and clear the selection.
    pub fn cancel_operation(&mut self) {
        self.selection.mode = InteractionMode::Idle;
        self.select_sprite(None);
        self.view.update_status("Operation cancelled");
    }

    // =========================================================================
    // Editing operations
    // =========================================================================

    /// Remove the selected sprite as an undoable command, behind a
    /// confirmation prompt.
    pub fn delete_selected(&mut self) -> EngineResult<()> {
        if self.source_image.is_none() {
            self.view.update_status("Please load an image first");
            return Ok(());
        }
        let Some(selected) = self.selected_sprite() else {
            self.view.update_status("No sprite selected");
            return Ok(());
        };
        let name = selected.name.clone();
        let id = selected.id.clone();

        if !self.view.confirm(&format!("Delete sprite '{name}'?")) {
            return Ok(());
        }
        let Some(index) = self.project.sprites.index_of(&id) else {
            return Ok(());
        };
        self.push_undo_action(EditorCommand::RemoveSprite {
            index,
            name: name.clone(),
            sprite: None,
        })?;
        self.view.update_status(&format!("Sprite '{name}' deleted"));
        Ok(())
    }

    /// Apply one inspector field edit to the selected sprite. Width and
    /// height are clamped to the sprite minimum.
    pub fn apply_inspector_edit(&mut self, field: SpriteField, value: i32) {
        let Some(id) = self.selection.selected_id.clone() else {
            return;
        };
        let Some(sprite) = self.project.sprites.find_mut(&id) else {
            return;
        };
        match field {
            SpriteField::X => sprite.bounds.x = value,
            SpriteField::Y => sprite.bounds.y = value,
            SpriteField::Width => sprite.bounds.width = value.max(MIN_SPRITE_SIZE),
            SpriteField::Height => sprite.bounds.height = value.max(MIN_SPRITE_SIZE),
        }
        let key = sprite.thumbnail_key().to_string();
        let snapshot = sprite.clone();

        self.last_known_bounds = Some(snapshot.bounds);
        self.view.invalidate_canvas();
        self.view.update_sprite_row(&snapshot.id, &snapshot);
        self.view.set_inspector_target(Some(&snapshot));
        if matches!(field, SpriteField::Width | SpriteField::Height) {
            self.view
                .update_status(&format!("Size changed to {}x{}", snapshot.bounds.width, snapshot.bounds.height));
        }
        self.refresh_thumbnail(key, snapshot.bounds);
    }

    /// Poll for out-of-band bounds changes on the selected sprite, e.g.
    /// model edits made directly through [`EditState::get_project_mut`].
    /// Embedders call this on a short timer; gestures keep the monitor
    /// up to date themselves, so this stays quiet during drags.
    pub fn tick(&mut self) {
        let Some(id) = self.selection.selected_id.clone() else {
            return;
        };
        let Some(sprite) = self.project.sprites.find_mut(&id) else {
            return;
        };
        let bounds = sprite.bounds;
        if self.last_known_bounds == Some(bounds) {
            return;
        }
        let size_changed = self
            .last_known_bounds
            .map_or(true, |last| last.width != bounds.width || last.height != bounds.height);
        let key = sprite.thumbnail_key().to_string();
        let snapshot = sprite.clone();

        self.last_known_bounds = Some(bounds);
        self.view.invalidate_canvas();
        self.view.update_sprite_row(&snapshot.id, &snapshot);
        self.view.set_inspector_target(Some(&snapshot));
        if size_changed {
            self.view.update_status(&format!("Size changed to {}x{}", bounds.width, bounds.height));
        }
        self.refresh_thumbnail(key, bounds);
    }

    /// Placeholder until region detection lands; only validates the gate.
    pub fn auto_detect(&mut self) {
        if self.project.source_image_path.is_empty() {
            self.view.update_status("Please load an image first");
            return;
        }
        self.view.update_status("Auto-detection - Feature coming soon");
    }

    /// Export every exportable sprite to `out_dir` and report the outcome
    /// in the status bar. Returns the number of sprites written.
    pub fn export_sprites(&mut self, exporter: &dyn Exporter, out_dir: &Path) -> usize {
        if self.project.source_image_path.is_empty() {
            self.view.update_status("Please load an image first");
            return 0;
        }
        if self.project.sprites.is_empty() {
            self.view.update_status("No sprites to export");
            return 0;
        }
        match exporter.export(&self.project, out_dir) {
            Ok(count) => {
                self.view.update_status(&format!("Exported {count} sprites to {}", out_dir.display()));
                count
            }
            Err(err) => {
                log::error!("Export to {} failed: {err}", out_dir.display());
                self.view.update_status(&format!("Error exporting sprites: {err}"));
                0
            }
        }
    }

    // =========================================================================
    // Command plumbing
    // =========================================================================

    /// Push and execute an undoable command
    pub fn push_undo_action(&mut self, mut op: EditorCommand) -> EngineResult<()> {
        op.redo(self)?;
        self.command_stack.lock().unwrap().push(op);
        self.on_commands_changed(OperationType::Execute);
        Ok(())
    }

    /// Drop both history sides, e.g. when the document is replaced.
    pub fn clear_history(&mut self) {
        self.command_stack.lock().unwrap().clear();
        self.on_commands_changed(OperationType::Clear);
    }

    fn on_commands_changed(&mut self, op: OperationType) {
        match op {
            // Execute paths refresh their own views; nothing extra to do.
            OperationType::Execute => {}
            OperationType::Undo | OperationType::Redo | OperationType::Clear => {
                self.rebuild_all_thumbnails();
                self.view.begin_list_update();
                self.view.update_sprite_list(self.project.sprites.sprites());
                let selected = self.selection.selected_id.clone();
                self.view.set_list_selection(selected.as_deref());
                self.view.end_list_update();
                self.view.invalidate_canvas();
            }
        }
    }

    /// Insert without recording history. Commands and their replay call
    /// this; everything else goes through [`EditState::push_undo_action`].
    pub(crate) fn insert_sprite_internal(&mut self, index: usize, sprite: SpriteRegion) {
        let index = index.min(self.project.sprites.len());
        self.project.sprites.insert(index, sprite);
        let Some(inserted) = self.project.sprites.get_mut(index) else {
            return;
        };
        let key = inserted.thumbnail_key().to_string();
        let bounds = inserted.bounds;
        let id = inserted.id.clone();

        self.request_thumbnail(key, bounds);
        self.view.begin_list_update();
        self.view.update_sprite_list(self.project.sprites.sprites());
        self.select_sprite(Some(&id));
        self.view.end_list_update();
    }

    /// Remove without recording history, handing the sprite back to the
    /// caller. Selection falls to the neighbor that slid into the removed
    /// slot, if any.
    pub(crate) fn remove_sprite_internal(&mut self, index: usize) -> EngineResult<SpriteRegion> {
        let len = self.project.sprites.len();
        if index >= len {
            return Err(EngineError::sprite_index_out_of_range(index, len));
        }
        let mut removed = self.project.sprites.remove_at(index);
        let key = removed.thumbnail_key().to_string();
        self.thumbnail_cache.remove(&key);
        self.view.remove_thumbnail(&key);

        self.view.begin_list_update();
        self.view.update_sprite_list(self.project.sprites.sprites());
        let next_id = if self.project.sprites.is_empty() {
            None
        } else {
            let next = index.min(self.project.sprites.len() - 1);
            self.project.sprites.get(next).map(|sprite| sprite.id.clone())
        };
        self.select_sprite(next_id.as_deref());
        self.view.end_list_update();
        Ok(removed)
    }

    // =========================================================================
    // Thumbnails
    // =========================================================================

    /// Drop every cached thumbnail and re-render the whole list in order.
    pub fn rebuild_all_thumbnails(&mut self) {
        self.thumbnail_cache.clear();
        self.view.clear_thumbnails();
        let mut jobs = Vec::with_capacity(self.project.sprites.len());
        for sprite in self.project.sprites.iter_mut() {
            jobs.push(ThumbnailJob {
                key: sprite.thumbnail_key().to_string(),
                bounds: sprite.bounds,
            });
        }
        self.renders_requested += jobs.len();
        // Every job reports back, plus the completion marker.
        self.pending_results += jobs.len() + 1;
        self.loader.request_rebuild(jobs, self.source_image.clone());
    }

    /// Ensure a thumbnail exists for `key`, serving from cache when
    /// possible. Embedders call this as rows come into view.
    pub fn request_thumbnail(&mut self, key: String, bounds: Rectangle) {
        if let Some(image) = self.thumbnail_cache.get(&key) {
            self.view.update_thumbnail(&key, image);
            return;
        }
        self.dispatch_render(key, bounds);
    }

    /// Invalidate the cached thumbnail for `key` and render a fresh one.
    fn refresh_thumbnail(&mut self, key: String, bounds: Rectangle) {
        self.thumbnail_cache.remove(&key);
        self.dispatch_render(key, bounds);
    }

    fn dispatch_render(&mut self, key: String, bounds: Rectangle) {
        self.renders_requested += 1;
        self.pending_results += 1;
        self.loader.request(key, self.source_image.clone(), bounds);
    }

    /// Apply every thumbnail result delivered so far. Embedders call this
    /// from their idle or timer handler.
    pub fn poll_thumbnails(&mut self) {
        while let Ok(update) = self.results.try_recv() {
            self.pending_results = self.pending_results.saturating_sub(1);
            self.apply_thumbnail_update(update);
        }
    }

    /// Block until every dispatched render has been applied. Meant for
    /// shutdown paths and deterministic tests.
    pub fn drain_thumbnails_blocking(&mut self) {
        while self.pending_results > 0 {
            match self.results.blocking_recv() {
                Some(update) => {
                    self.pending_results -= 1;
                    self.apply_thumbnail_update(update);
                }
                None => break,
            }
        }
    }

    fn apply_thumbnail_update(&mut self, update: ThumbnailUpdate) {
        match update {
            ThumbnailUpdate::Rendered { key, image } => {
                // A render may outlive its sprite; completions for vanished
                // keys must not revive cache entries.
                let alive = self.project.sprites.iter_mut().any(|sprite| sprite.thumbnail_key() == key.as_str());
                if !alive {
                    log::debug!("Dropping thumbnail for vanished sprite key {key}");
                    return;
                }
                self.view.update_thumbnail(&key, &image);
                self.thumbnail_cache.insert(key, image);
            }
            ThumbnailUpdate::RebuildFinished => {
                self.view.update_sprite_list(self.project.sprites.sprites());
            }
        }
    }
}

impl UndoState for EditState {
    fn undo_description(&self) -> Option<String> {
        self.command_stack.lock().unwrap().undo_description()
    }

    fn can_undo(&self) -> bool {
        self.command_stack.lock().unwrap().can_undo()
    }

    fn undo(&mut self) -> EngineResult<()> {
        let Some(mut op) = self.command_stack.lock().unwrap().pop_undo() else {
            return Ok(());
        };
        let res = op.undo(self);
        self.command_stack.lock().unwrap().push_redo(op);
        self.on_commands_changed(OperationType::Undo);
        res
    }

    fn redo_description(&self) -> Option<String> {
        self.command_stack.lock().unwrap().redo_description()
    }

    fn can_redo(&self) -> bool {
        self.command_stack.lock().unwrap().can_redo()
    }

    fn redo(&mut self) -> EngineResult<()> {
        let Some(mut op) = self.command_stack.lock().unwrap().pop_redo() else {
            return Ok(());
        };
        let res = op.redo(self);
        self.command_stack.lock().unwrap().push_undo(op);
        self.on_commands_changed(OperationType::Redo);
        res
    }
}
