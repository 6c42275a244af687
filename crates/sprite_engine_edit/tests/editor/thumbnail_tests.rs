//! Thumbnail cache behavior: identity keys, cache hits and stale results.

use sprite_engine_edit::{Position, Project, Rectangle, SpriteRegion, UndoState};

use crate::helpers::{create_empty_state, create_test_state, draw_sprite, key_of, sheet_path};

#[test]
fn test_new_sprite_gets_thumbnail() {
    let (mut state, log, _dir) = create_test_state();
    let id = draw_sprite(&mut state, (10, 10), (50, 50));
    let key = key_of(&mut state, &id);

    state.drain_thumbnails_blocking();

    assert_eq!(0, state.pending_thumbnails());
    assert_eq!(Some(&(48, 48)), log.lock().unwrap().thumbnails.get(&key));
    assert!(state.cached_thumbnail(&key).is_some());
}

#[test]
fn test_cache_hit_serves_without_rerender() {
    let (mut state, log, _dir) = create_test_state();
    let id = draw_sprite(&mut state, (10, 10), (50, 50));
    let key = key_of(&mut state, &id);
    let bounds = state.get_project().sprites.find(&id).unwrap().bounds;
    state.drain_thumbnails_blocking();

    let renders = state.renders_requested();
    let updates = log.lock().unwrap().thumbnail_updates.len();

    state.request_thumbnail(key.clone(), bounds);

    // Served synchronously from the cache, nothing dispatched.
    assert_eq!(renders, state.renders_requested());
    assert_eq!(0, state.pending_thumbnails());
    assert_eq!(updates + 1, log.lock().unwrap().thumbnail_updates.len());
    assert_eq!(Some(&key), log.lock().unwrap().thumbnail_updates.last());
}

#[test]
fn test_move_rerenders_under_the_same_key() {
    let (mut state, log, _dir) = create_test_state();
    let id = draw_sprite(&mut state, (10, 10), (50, 50));
    let key = key_of(&mut state, &id);
    state.drain_thumbnails_blocking();
    let renders = state.renders_requested();

    state.mouse_down(Position::new(30, 30));
    state.mouse_move(Position::new(45, 50));
    state.mouse_up(Position::new(45, 50)).unwrap();
    state.drain_thumbnails_blocking();

    // One render per drag step plus the final sync, all under one key.
    assert_eq!(renders + 2, state.renders_requested());
    let log = log.lock().unwrap();
    assert_eq!(1, log.thumbnails.len());
    assert!(log.thumbnails.contains_key(&key));
}

#[test]
fn test_undo_rebuilds_remaining_thumbnails() {
    let (mut state, log, _dir) = create_test_state();
    let a = draw_sprite(&mut state, (10, 10), (50, 50));
    let b = draw_sprite(&mut state, (60, 10), (100, 50));
    let key_a = key_of(&mut state, &a);
    let key_b = key_of(&mut state, &b);
    state.drain_thumbnails_blocking();
    assert_eq!(2, log.lock().unwrap().thumbnails.len());

    state.undo().unwrap();
    state.drain_thumbnails_blocking();

    let log = log.lock().unwrap();
    assert_eq!(1, log.thumbnails.len());
    assert!(log.thumbnails.contains_key(&key_a));
    assert!(!log.thumbnails.contains_key(&key_b));
    assert_eq!(1, log.list.len());
}

#[test]
fn test_stale_result_for_deleted_sprite_is_dropped() {
    let (mut state, log, _dir) = create_test_state();
    let id = draw_sprite(&mut state, (10, 10), (50, 50));
    let key = key_of(&mut state, &id);

    // Delete before the render for the freshly drawn sprite is applied.
    state.delete_selected().unwrap();
    state.drain_thumbnails_blocking();

    assert!(!log.lock().unwrap().thumbnails.contains_key(&key));
    assert!(state.cached_thumbnail(&key).is_none());

    // Undoing brings the sprite and its thumbnail back under the same key.
    state.undo().unwrap();
    state.drain_thumbnails_blocking();
    assert_eq!(Some(&(48, 48)), log.lock().unwrap().thumbnails.get(&key));
}

#[test]
fn test_rebuild_without_source_uses_placeholders() {
    let (mut state, log) = create_empty_state();
    let mut project = Project::default();
    project.source_image_path = "/no/such/sheet.png".to_string();
    project.sprites.push(SpriteRegion::new("a", Rectangle::new(0, 0, 16, 16)));
    project.sprites.push(SpriteRegion::new("b", Rectangle::new(16, 0, 16, 16)));

    state.set_project(project);
    state.drain_thumbnails_blocking();

    assert!(state.source_image().is_none());
    let log = log.lock().unwrap();
    assert_eq!(2, log.thumbnails.len());
    assert!(log.thumbnails.values().all(|dims| *dims == (48, 48)));
}

#[test]
fn test_drain_leaves_nothing_pending() {
    let (mut state, _log, dir) = create_test_state();
    draw_sprite(&mut state, (10, 10), (50, 50));
    state.open_image(&sheet_path(&dir));
    draw_sprite(&mut state, (20, 20), (60, 60));

    state.drain_thumbnails_blocking();
    assert_eq!(0, state.pending_thumbnails());
    state.drain_thumbnails_blocking();
    assert_eq!(0, state.pending_thumbnails());
}
