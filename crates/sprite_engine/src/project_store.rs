use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::sprite::generate_sprite_id;
use crate::{EngineResult, Position, Project, Rectangle, SpriteRegion};

/// Persistence seam for projects. The JSON implementation below is the
/// production one; tests swap in their own when they need failure modes.
pub trait ProjectStore {
    fn load(&self, path: &Path) -> EngineResult<Project>;
    fn save(&self, project: &mut Project, path: &Path) -> EngineResult<()>;
}

/// Stores projects as pretty-printed JSON, replacing the target file
/// atomically via a temp file in the same directory.
#[derive(Copy, Clone, Debug, Default)]
pub struct JsonProjectStore;

impl ProjectStore for JsonProjectStore {
    fn load(&self, path: &Path) -> EngineResult<Project> {
        if !path.exists() {
            return Ok(Project::default());
        }
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                log::error!("Failed to read project {}: {err}", path.display());
                return Ok(Project::default());
            }
        };

        // Files written before sprites carried ids lack any "id" key.
        let mut needs_migration = !raw.to_ascii_lowercase().contains("\"id\"");
        let mut project = match serde_json::from_str::<Project>(&raw) {
            Ok(project) => project,
            Err(err) => {
                log::warn!("Structured parse of {} failed ({err}), trying legacy layout", path.display());
                needs_migration = true;
                match parse_legacy_project(&raw) {
                    Some(project) => project,
                    None => {
                        log::error!("Could not recover project data from {}", path.display());
                        return Ok(Project::default());
                    }
                }
            }
        };

        if ensure_sprite_ids(&mut project) || needs_migration {
            if let Err(err) = self.save(&mut project, path) {
                log::error!("Failed to write migrated project {}: {err}", path.display());
            }
        }
        Ok(project)
    }

    fn save(&self, project: &mut Project, path: &Path) -> EngineResult<()> {
        ensure_sprite_ids(project);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(project)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "project.json".to_string(), |name| name.to_string_lossy().to_string());
        let temp = path.with_file_name(format!(".{file_name}.tmp"));
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(err) = fs::rename(&temp, path) {
            log::error!("Failed to move {} into place: {err}", temp.display());
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        Ok(())
    }
}

fn ensure_sprite_ids(project: &mut Project) -> bool {
    let mut assigned = false;
    for sprite in project.sprites.iter_mut() {
        if sprite.id.is_empty() {
            sprite.id = generate_sprite_id();
            assigned = true;
        }
    }
    assigned
}

/// Best-effort reader for pre-schema project files. Only the fields the
/// old writer produced are looked up; anything missing falls back to the
/// defaults a fresh project would have.
fn parse_legacy_project(raw: &str) -> Option<Project> {
    let root: Value = serde_json::from_str(raw).ok()?;
    let root = root.as_object()?;

    let mut project = Project::default();
    if let Some(name) = field(root, "Name", "name").and_then(Value::as_str) {
        project.name = name.to_string();
    }
    if let Some(path) = field(root, "SourceImagePath", "sourceImagePath").and_then(Value::as_str) {
        project.source_image_path = path.to_string();
    }

    if let Some(entries) = field(root, "Sprites", "sprites").and_then(Value::as_array) {
        for entry in entries {
            let Some(entry) = entry.as_object() else {
                continue;
            };
            let Some(bounds) = field(entry, "Bounds", "bounds").and_then(parse_legacy_rect) else {
                continue;
            };
            let mut sprite = SpriteRegion {
                id: String::new(),
                bounds,
                ..SpriteRegion::default()
            };
            if let Some(name) = field(entry, "Name", "name").and_then(Value::as_str) {
                sprite.name = name.to_string();
            }
            if let Some(pivot) = field(entry, "Pivot", "pivot").and_then(parse_legacy_point) {
                sprite.pivot = pivot;
            }
            if let Some(visible) = field(entry, "Visible", "visible").and_then(Value::as_bool) {
                sprite.visible = visible;
            }
            project.sprites.push(sprite);
        }
    }
    Some(project)
}

fn field<'a>(obj: &'a serde_json::Map<String, Value>, pascal: &str, camel: &str) -> Option<&'a Value> {
    obj.get(pascal).or_else(|| obj.get(camel))
}

fn parse_legacy_rect(value: &Value) -> Option<Rectangle> {
    let obj = value.as_object()?;
    Some(Rectangle::new(
        int_field(obj, "X", "x")?,
        int_field(obj, "Y", "y")?,
        int_field(obj, "Width", "width")?,
        int_field(obj, "Height", "height")?,
    ))
}

fn parse_legacy_point(value: &Value) -> Option<Position> {
    let obj = value.as_object()?;
    Some(Position::new(int_field(obj, "X", "x")?, int_field(obj, "Y", "y")?))
}

fn int_field(obj: &serde_json::Map<String, Value>, pascal: &str, camel: &str) -> Option<i32> {
    field(obj, pascal, camel)?.as_i64().map(|n| n as i32)
}
