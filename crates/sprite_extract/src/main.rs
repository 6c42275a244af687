use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use sprite_engine::{Exporter, JsonProjectStore, PngExporter, ProjectStore};

#[derive(Parser)]
#[command(version, about = "Inspect, migrate and export sprite sheet projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print a summary of a project file")]
    Info {
        #[arg(help = "Project file (.ssp)")]
        path: PathBuf,
    },

    #[command(about = "Cut every sprite out of the sheet as an individual PNG")]
    Export {
        #[arg(help = "Project file (.ssp)")]
        path: PathBuf,

        #[arg(long, help = "Output directory, defaults to the project's configured one")]
        out: Option<PathBuf>,
    },

    #[command(about = "Rewrite a project file in the current schema")]
    Migrate {
        #[arg(help = "Project file (.ssp)")]
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { path } => info(&path),
        Commands::Export { path, out } => export(&path, out),
        Commands::Migrate { path } => migrate(&path),
    }
}

fn info(path: &Path) -> anyhow::Result<()> {
    let project = JsonProjectStore.load(path)?;
    println!("Project:  {}", project.name);
    println!("Schema:   {}", project.schema_version);
    println!("Image:    {}", project.source_image_path);
    println!("Sprites:  {}", project.sprites.len());
    for sprite in project.sprites.sprites() {
        let b = sprite.bounds;
        println!("  {:<24} ({}, {}) {}×{}", sprite.name, b.x, b.y, b.width, b.height);
    }
    Ok(())
}

fn export(path: &Path, out: Option<PathBuf>) -> anyhow::Result<()> {
    let project = JsonProjectStore.load(path)?;
    let out_dir = out.unwrap_or_else(|| PathBuf::from(&project.settings.output_directory));
    let count = PngExporter.export(&project, &out_dir)?;
    println!("Exported {count} sprites to {}", out_dir.display());
    Ok(())
}

fn migrate(path: &Path) -> anyhow::Result<()> {
    let mut project = JsonProjectStore.load(path)?;
    JsonProjectStore.save(&mut project, path)?;
    log::info!("Rewrote {} with schema version {}", path.display(), project.schema_version);
    println!("Migrated {}", path.display());
    Ok(())
}
