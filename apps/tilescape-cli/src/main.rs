use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use tilescape_assets::TextureStore;
use tilescape_gen::{RawWorldConfig, WorldConfig};
use tilescape_ingest::WorldDocument;
use tilescape_persist::{SettingsFile, WorldStore};
use tilescape_render::{AsciiRenderer, Frame, RenderView, Renderer};
use tilescape_render::settings::{FOG_INTENSITY_KEY, RENDER_DISTANCE_KEY};
use tilescape_tools::WorldInspector;
use tilescape_world::WorldSession;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilescape", about = "CLI tool for tile world operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Generate a world from a seed and print its summary
    Generate {
        #[command(flatten)]
        world: GenerateArgs,
        /// Save the result as worlds/<NAME>/world.json under --root
        #[arg(long)]
        save: Option<String>,
        /// Store root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Check a generation config or world document without building anything
    Validate {
        /// JSON file to check
        path: PathBuf,
        /// Treat the file as a custom world document instead of a config
        #[arg(long)]
        document: bool,
    },
    /// Load a world document from a store and print what was ingested
    Load {
        /// Identifier such as worlds/glade/world.json
        id: String,
        /// Store root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Print a text view of the visible region around a tile
    Render {
        /// Render a stored world instead of generating one
        #[arg(long)]
        world: Option<String>,
        /// Store root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[command(flatten)]
        generate: GenerateArgs,
        /// Player tile column (defaults to the player spawn)
        #[arg(long)]
        col: Option<u32>,
        /// Player tile row (defaults to the player spawn)
        #[arg(long)]
        row: Option<u32>,
        /// Settings file with renderDistance and fogIntensity
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Render distance in tiles, overriding the settings file
        #[arg(long)]
        distance: Option<u32>,
        /// Fog intensity 0-100, overriding the settings file
        #[arg(long)]
        fog: Option<u32>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// World size: small, medium, or large
    #[arg(long, default_value = "small")]
    size: String,
    /// Seed string
    #[arg(long, default_value = "DEFAULT")]
    seed: String,
    /// Generation config JSON file; overrides the other generation flags
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    grass: Option<f64>,
    #[arg(long)]
    water: Option<f64>,
    #[arg(long)]
    wall: Option<f64>,
    #[arg(long)]
    cave: Option<f64>,
}

impl GenerateArgs {
    fn raw_config(&self) -> anyhow::Result<RawWorldConfig> {
        if let Some(path) = &self.config {
            let text = read(path)?;
            return RawWorldConfig::from_json(&text)
                .with_context(|| format!("parsing {}", path.display()));
        }
        // Flags left out keep their default share.
        let mut percentages: BTreeMap<String, serde_json::Value> = WorldConfig::default()
            .to_raw()
            .tile_percentages
            .unwrap_or_default();
        for (key, value) in [
            ("grass", self.grass),
            ("water", self.water),
            ("wall", self.wall),
            ("cave", self.cave),
        ] {
            if let Some(v) = value {
                percentages.insert(key.to_string(), serde_json::Value::from(v));
            }
        }
        Ok(RawWorldConfig {
            world_size: Some(self.size.clone()),
            seed: Some(self.seed.clone()),
            tile_percentages: Some(percentages),
        })
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_world(session: &WorldSession) {
    let grid = session.grid();
    println!("{}", WorldInspector::summary(grid));
    print!("{}", WorldInspector::histogram(grid));
    for line in WorldInspector::placements(session.spawn_points(), session.npcs(), grid.tile_size()) {
        println!("  {line}");
    }
    for diagnostic in session.diagnostics() {
        println!("  note: {diagnostic:?}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tilescape v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", tilescape_common::crate_info());
            println!("assets: {}", tilescape_assets::crate_info());
            println!("persist: {}", tilescape_persist::crate_info());
            println!("render: {}", tilescape_render::crate_info());
            println!("tools: {}", tilescape_tools::crate_info());
            println!("world: {}", tilescape_world::crate_info());
        }
        Commands::Generate { world, save, root } => {
            let session = WorldSession::generate(&world.raw_config()?)?;
            print_world(&session);
            if let Some(name) = save {
                let doc = tilescape_ingest::export_document(session.grid(), session.name());
                let id = WorldStore::open(&root).save_document(&name, &doc)?;
                println!("Saved {}", root.join(id).display());
            }
        }
        Commands::Validate { path, document } => {
            let text = read(&path)?;
            if document {
                let doc = WorldDocument::from_json(&text)?;
                println!("OK: {}x{} world document", doc.width, doc.height);
            } else {
                let config = tilescape_gen::validate(&RawWorldConfig::from_json(&text)?)?;
                println!(
                    "OK: {} world, seed {:?}",
                    config.world_size.name(),
                    config.seed
                );
            }
        }
        Commands::Load { id, root } => {
            let session = WorldSession::load_from_path(&WorldStore::open(&root), &id)?;
            println!("Loaded {}", session.name().unwrap_or("<unnamed>"));
            print_world(&session);
        }
        Commands::Render {
            world,
            root,
            generate,
            col,
            row,
            settings,
            distance,
            fog,
        } => {
            let session = match world {
                Some(id) => WorldSession::load_from_path(&WorldStore::open(&root), &id)?,
                None => WorldSession::generate(&generate.raw_config()?)?,
            };

            let mut settings = match settings {
                Some(path) => SettingsFile::load(path)?,
                None => SettingsFile::new(),
            };
            if let Some(d) = distance {
                settings.set(RENDER_DISTANCE_KEY, d.to_string());
            }
            if let Some(f) = fog {
                settings.set(FOG_INTENSITY_KEY, f.to_string());
            }

            let grid = session.grid();
            let ts = grid.tile_size() as f32;
            let spawn = session.spawn_for("player");
            let player = match (col, row) {
                (Some(c), Some(r)) => Vec2::new((c as f32 + 0.5) * ts, (r as f32 + 0.5) * ts),
                (c, r) => {
                    let (sc, sr) = spawn.tile(grid.tile_size());
                    let c = c.map_or(sc as f32, |c| c as f32);
                    let r = r.map_or(sr as f32, |r| r as f32);
                    Vec2::new((c + 0.5) * ts, (r + 0.5) * ts)
                }
            };
            let mut view = RenderView {
                player,
                ..RenderView::default()
            };
            view.camera.center_on(player, view.canvas_size);

            let textures = TextureStore::new();
            let frame = Frame {
                grid,
                view: &view,
                settings: &settings,
                textures: &textures,
            };
            print!("{}", AsciiRenderer::new().render(&frame));
        }
    }

    Ok(())
}
