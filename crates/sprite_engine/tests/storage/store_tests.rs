//! Round-trip and migration tests for the JSON project store.

use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use sprite_engine::{JsonProjectStore, Project, ProjectStore, Rectangle, SpriteRegion};
use tempfile::TempDir;

fn project_with_sprites(names: &[&str]) -> Project {
    let mut project = Project::default();
    project.name = "Test Pack".to_string();
    for (i, name) in names.iter().enumerate() {
        project.sprites.push(SpriteRegion::new(*name, Rectangle::new(i as i32 * 20, 0, 16, 16)));
    }
    project
}

#[test]
fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pack.ssp");
    let mut saved = project_with_sprites(&["walk_0", "walk_1"]);
    JsonProjectStore.save(&mut saved, &path).unwrap();

    let loaded = JsonProjectStore.load(&path).unwrap();
    assert_eq!(saved.name, loaded.name);
    assert_eq!(saved.schema_version, loaded.schema_version);
    assert_eq!(2, loaded.sprites.len());
    for (a, b) in saved.sprites.sprites().iter().zip(loaded.sprites.sprites()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.bounds, b.bounds);
        assert_eq!(a.visible, b.visible);
    }
}

#[test]
fn test_load_missing_file_returns_default() {
    let dir = TempDir::new().unwrap();
    let project = JsonProjectStore.load(&dir.path().join("nope.ssp")).unwrap();
    assert_eq!("New Project", project.name);
    assert!(project.sprites.is_empty());
}

#[test]
fn test_load_corrupt_file_returns_default_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ssp");
    fs::write(&path, "{{{ not json").unwrap();

    let project = JsonProjectStore.load(&path).unwrap();
    assert_eq!("New Project", project.name);
    assert!(project.sprites.is_empty());
    // Unrecoverable files are left alone for manual inspection.
    assert_eq!("{{{ not json", fs::read_to_string(&path).unwrap());
}

#[test]
fn test_legacy_file_is_migrated_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.ssp");
    fs::write(
        &path,
        r#"{
            "Name": "Old Pack",
            "SourceImagePath": "sheet.png",
            "Sprites": [
                { "Name": "a", "Bounds": { "X": 0, "Y": 0, "Width": 16, "Height": 16 } },
                { "Name": "b", "Bounds": { "X": 20, "Y": 0, "Width": 16, "Height": 16 } }
            ]
        }"#,
    )
    .unwrap();

    let project = JsonProjectStore.load(&path).unwrap();
    assert_eq!("Old Pack", project.name);
    assert_eq!(2, project.sprites.len());
    for sprite in project.sprites.sprites() {
        assert!(!sprite.id.is_empty());
    }

    // The file was rewritten in the current schema.
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"schemaVersion\""));
    assert!(raw.contains("\"id\""));
}

#[test]
fn test_migration_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("old.ssp");
    fs::write(
        &path,
        r#"{ "Name": "Old", "Sprites": [ { "Name": "a", "Bounds": { "X": 1, "Y": 2, "Width": 3, "Height": 6 } } ] }"#,
    )
    .unwrap();

    let first = JsonProjectStore.load(&path).unwrap();
    let raw_after_first = fs::read_to_string(&path).unwrap();
    let second = JsonProjectStore.load(&path).unwrap();
    let raw_after_second = fs::read_to_string(&path).unwrap();

    // Ids are assigned once and stick.
    assert_eq!(first.sprites.get(0).unwrap().id, second.sprites.get(0).unwrap().id);
    assert_eq!(raw_after_first, raw_after_second);
}

#[test]
fn test_save_creates_parent_dirs_and_leaves_no_temp() {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("a").join("b").join("pack.ssp");
    let mut project = project_with_sprites(&["only"]);
    JsonProjectStore.save(&mut project, &path).unwrap();

    assert!(path.exists());
    let siblings: Vec<String> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(vec!["pack.ssp".to_string()], siblings);
}

#[test]
fn test_save_assigns_missing_ids() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pack.ssp");
    let mut project = Project::default();
    let mut sprite = SpriteRegion::new("anon", Rectangle::new(0, 0, 8, 8));
    sprite.id = String::new();
    project.sprites.push(sprite);

    JsonProjectStore.save(&mut project, &path).unwrap();
    assert!(!project.sprites.get(0).unwrap().id.is_empty());

    let loaded = JsonProjectStore.load(&path).unwrap();
    assert_eq!(project.sprites.get(0).unwrap().id, loaded.sprites.get(0).unwrap().id);
}
