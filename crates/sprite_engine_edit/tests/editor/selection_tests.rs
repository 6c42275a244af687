//! Selection flow between canvas, sprite list and inspector.

use sprite_engine_edit::{InteractionMode, Position};

use crate::helpers::{create_test_state, draw_sprite, last_status};

#[test]
fn test_click_selects_topmost_of_overlapping() {
    let (mut state, _log, _dir) = create_test_state();
    let _a = draw_sprite(&mut state, (10, 10), (50, 50));
    let b = draw_sprite(&mut state, (60, 60), (100, 100));

    // Drag the later sprite over the first one.
    state.mouse_down(Position::new(80, 80));
    state.mouse_move(Position::new(50, 50));
    state.mouse_up(Position::new(50, 50)).unwrap();
    assert_eq!(30, state.get_project().sprites.find(&b).unwrap().bounds.x);

    // Both sprites cover this point; the later one wins.
    state.mouse_down(Position::new(35, 40));
    state.mouse_up(Position::new(35, 40)).unwrap();

    assert_eq!(Some(b.as_str()), state.selection().selected_id());
}

#[test]
fn test_click_empty_space_clears_selection() {
    let (mut state, log, _dir) = create_test_state();
    let invalidations_before;
    {
        draw_sprite(&mut state, (10, 10), (50, 50));
        invalidations_before = log.lock().unwrap().invalidations;
    }

    state.mouse_down(Position::new(150, 150));

    assert_eq!(None, state.selection().selected_id());
    assert!(matches!(state.selection().mode(), InteractionMode::Drawing { .. }));
    assert_eq!(None, log.lock().unwrap().list_selection);
    assert_eq!(None, log.lock().unwrap().inspector);
    assert!(log.lock().unwrap().invalidations > invalidations_before);

    state.mouse_up(Position::new(150, 150)).unwrap();
    assert_eq!(1, state.get_project().sprites.len());
}

#[test]
fn test_list_selection_syncs_editor() {
    let (mut state, log, _dir) = create_test_state();
    let a = draw_sprite(&mut state, (10, 10), (50, 50));
    draw_sprite(&mut state, (60, 10), (100, 50));

    state.on_list_selection_changed(Some(&a));

    assert_eq!(Some(a.as_str()), state.selection().selected_id());
    assert_eq!(Some(a.as_str()), state.selection().focused_id());
    assert_eq!(Some(a.clone()), log.lock().unwrap().inspector);
    let bounds = state.get_project().sprites.find(&a).unwrap().bounds;
    assert_eq!(Some(&bounds), log.lock().unwrap().scrolls.last());
}

#[test]
fn test_list_clear_keeps_selection() {
    let (mut state, _log, _dir) = create_test_state();
    let a = draw_sprite(&mut state, (10, 10), (50, 50));
    state.on_list_selection_changed(Some(&a));

    state.on_list_selection_changed(None);

    // Clearing the list highlight drops focus but not the selection.
    assert_eq!(Some(a.as_str()), state.selection().selected_id());
    assert_eq!(None, state.selection().focused_id());
}

#[test]
fn test_unknown_list_id_treated_as_clear() {
    let (mut state, _log, _dir) = create_test_state();
    let a = draw_sprite(&mut state, (10, 10), (50, 50));

    state.on_list_selection_changed(Some("no-such-sprite"));

    assert_eq!(Some(a.as_str()), state.selection().selected_id());
    assert_eq!(None, state.selection().focused_id());
}

#[test]
fn test_double_click_focuses_without_selecting() {
    let (mut state, log, _dir) = create_test_state();
    let a = draw_sprite(&mut state, (10, 10), (50, 50));
    let b = draw_sprite(&mut state, (60, 10), (100, 50));
    state.select_sprite(Some(&a));

    state.focus_sprite(&b);

    assert_eq!(Some(a.as_str()), state.selection().selected_id());
    assert_eq!(Some(b.as_str()), state.selection().focused_id());
    assert_eq!("Focused: Sprite_2", last_status(&log));
    let bounds = state.get_project().sprites.find(&b).unwrap().bounds;
    assert_eq!(Some(&bounds), log.lock().unwrap().scrolls.last());
}

#[test]
fn test_cancel_mid_drag_keeps_partial_move() {
    let (mut state, log, _dir) = create_test_state();
    let a = draw_sprite(&mut state, (10, 10), (50, 50));

    state.mouse_down(Position::new(30, 30));
    state.mouse_move(Position::new(40, 40));
    state.cancel_operation();

    assert_eq!(InteractionMode::Idle, state.selection().mode());
    assert_eq!(None, state.selection().selected_id());
    assert_eq!("Operation cancelled", last_status(&log));
    // The gesture is dropped, not rolled back.
    assert_eq!(20, state.get_project().sprites.find(&a).unwrap().bounds.x);
}

#[test]
fn test_delete_last_selects_new_last() {
    let (mut state, _log, _dir) = create_test_state();
    draw_sprite(&mut state, (10, 10), (30, 30));
    let b = draw_sprite(&mut state, (40, 10), (60, 30));
    let c = draw_sprite(&mut state, (70, 10), (90, 30));

    state.select_sprite(Some(&c));
    state.delete_selected().unwrap();

    assert_eq!(Some(b.as_str()), state.selection().selected_id());
}
