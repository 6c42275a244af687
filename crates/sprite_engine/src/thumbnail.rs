use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use lazy_static::lazy_static;

use crate::Rectangle;

/// Width and height of every thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 48;

const CHECKER_CELL: u32 = 6;
const DARK: Rgba<u8> = Rgba([100, 100, 100, 255]);
const LIGHT: Rgba<u8> = Rgba([150, 150, 150, 255]);
const BORDER: Rgba<u8> = Rgba([255, 255, 255, 255]);

lazy_static! {
    static ref CHECKERBOARD: RgbaImage = RgbaImage::from_fn(THUMBNAIL_SIZE, THUMBNAIL_SIZE, |x, y| {
        if (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0 {
            DARK
        } else {
            LIGHT
        }
    });
}

/// Render the thumbnail for one sprite region.
///
/// The region is cropped out of `source`, scaled to fit the checkerboard
/// backdrop with a small margin and centered. Regions that lie outside the
/// source image (or have no area) produce the bare placeholder instead.
pub fn render_thumbnail(source: &RgbaImage, bounds: Rectangle) -> RgbaImage {
    let mut thumb = CHECKERBOARD.clone();

    if region_fits(source, bounds) {
        let margin = (THUMBNAIL_SIZE - 2) as f32;
        let scale = (margin / bounds.width as f32).min(margin / bounds.height as f32);
        let dest_width = ((bounds.width as f32 * scale) as i32).max(1);
        let dest_height = ((bounds.height as f32 * scale) as i32).max(1);
        let dest_x = (THUMBNAIL_SIZE as i32 - dest_width) / 2;
        let dest_y = (THUMBNAIL_SIZE as i32 - dest_height) / 2;

        let crop = imageops::crop_imm(source, bounds.x as u32, bounds.y as u32, bounds.width as u32, bounds.height as u32);
        let scaled = imageops::resize(
            &crop.to_image(),
            (dest_width - 2).max(1) as u32,
            (dest_height - 2).max(1) as u32,
            FilterType::Nearest,
        );
        imageops::overlay(&mut thumb, &scaled, i64::from(dest_x + 1), i64::from(dest_y + 1));
    }

    draw_border(&mut thumb);
    thumb
}

/// Checkerboard-only thumbnail used when no pixels are available.
pub fn placeholder_thumbnail() -> RgbaImage {
    let mut thumb = CHECKERBOARD.clone();
    draw_border(&mut thumb);
    thumb
}

fn region_fits(source: &RgbaImage, bounds: Rectangle) -> bool {
    bounds.x >= 0
        && bounds.y >= 0
        && bounds.width > 0
        && bounds.height > 0
        && bounds.right() <= source.width() as i32
        && bounds.bottom() <= source.height() as i32
}

fn draw_border(thumb: &mut RgbaImage) {
    let last = THUMBNAIL_SIZE - 1;
    for x in 0..THUMBNAIL_SIZE {
        thumb.put_pixel(x, 0, BORDER);
        thumb.put_pixel(x, last, BORDER);
    }
    for y in 0..THUMBNAIL_SIZE {
        thumb.put_pixel(0, y, BORDER);
        thumb.put_pixel(last, y, BORDER);
    }
}
