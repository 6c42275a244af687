use std::fs;
use std::path::Path;

use image::imageops;

use crate::{EngineError, EngineResult, Project, SpriteRegion};

/// Writes the sprites of a project out as individual files.
pub trait Exporter {
    /// Returns the number of sprites actually written.
    fn export(&self, project: &Project, out_dir: &Path) -> EngineResult<usize>;
}

/// Crops each exportable sprite out of the source sheet and saves it as
/// `{name}.png` in the output directory.
#[derive(Copy, Clone, Debug, Default)]
pub struct PngExporter;

impl Exporter for PngExporter {
    fn export(&self, project: &Project, out_dir: &Path) -> EngineResult<usize> {
        fs::create_dir_all(out_dir)?;

        let source_path = Path::new(&project.source_image_path);
        if !source_path.exists() {
            return Err(EngineError::source_image_missing(source_path));
        }
        let sheet = image::open(source_path)?.to_rgba8();
        let sheet_width = sheet.width() as i32;
        let sheet_height = sheet.height() as i32;

        let mut written = 0;
        for sprite in &project.sprites {
            if !is_exportable(sprite, sheet_width, sheet_height) {
                log::debug!("Skipping '{}': hidden or outside the sheet {}", sprite.name, sprite.bounds);
                continue;
            }
            let bounds = sprite.bounds;
            let crop = imageops::crop_imm(&sheet, bounds.x as u32, bounds.y as u32, bounds.width as u32, bounds.height as u32);
            crop.to_image().save(out_dir.join(format!("{}.png", sprite.name)))?;
            written += 1;
        }
        Ok(written)
    }
}

fn is_exportable(sprite: &SpriteRegion, sheet_width: i32, sheet_height: i32) -> bool {
    let bounds = sprite.bounds;
    sprite.visible
        && bounds.width > 0
        && bounds.height > 0
        && bounds.x >= 0
        && bounds.y >= 0
        && bounds.right() <= sheet_width
        && bounds.bottom() <= sheet_height
}
