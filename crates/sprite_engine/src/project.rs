use serde::{Deserialize, Serialize};

use crate::SpriteRegistry;

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The persisted project document: one source sheet plus its sprite regions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default = "default_schema_version", alias = "SchemaVersion")]
    pub schema_version: i32,

    #[serde(default = "default_project_name", alias = "Name")]
    pub name: String,

    /// Path of the loaded sheet; opaque here beyond existence checks.
    #[serde(default, alias = "SourceImagePath")]
    pub source_image_path: String,

    #[serde(default, alias = "Settings")]
    pub settings: ProjectSettings,

    #[serde(default, alias = "Sprites")]
    pub sprites: SpriteRegistry,
}

fn default_schema_version() -> i32 {
    CURRENT_SCHEMA_VERSION
}

fn default_project_name() -> String {
    "New Project".to_string()
}

impl Default for Project {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            name: default_project_name(),
            source_image_path: String::new(),
            settings: ProjectSettings::default(),
            sprites: SpriteRegistry::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default = "default_output_directory", alias = "OutputDirectory")]
    pub output_directory: String,

    #[serde(default = "default_output_format", alias = "OutputFormat")]
    pub output_format: String,

    #[serde(
        default = "default_auto_detect",
        alias = "AutoDetect",
        alias = "AutoDetectEnabled",
        alias = "autoDetectEnabled"
    )]
    pub auto_detect: bool,

    /// Signed 32-bit ARGB, cosmetic only. Kept signed so documents written
    /// by the legacy editor (which stores `Color.ToArgb()`) load unchanged.
    #[serde(
        default = "default_highlight_color",
        alias = "HighlightColor",
        alias = "HighlightColorArgb",
        alias = "highlightColorArgb"
    )]
    pub highlight_color: i32,
}

fn default_output_directory() -> String {
    "./Output/".to_string()
}

fn default_output_format() -> String {
    "png".to_string()
}

fn default_auto_detect() -> bool {
    true
}

// Opaque yellow.
fn default_highlight_color() -> i32 {
    0xFFFF_FF00_u32 as i32
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            output_format: default_output_format(),
            auto_detect: default_auto_detect(),
            highlight_color: default_highlight_color(),
        }
    }
}
