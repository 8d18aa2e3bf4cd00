use clap::{Parser, Subcommand};
use cli::{find_symbol, load_config, summarize_symbols};
use color_eyre::eyre::{eyre, Result};
use geo_types::Coord;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};
use vector_fill::{FillTool, Map, Rasterizer};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the region around a map position with a new object
    Fill {
        /// Path to the JSON map
        #[arg(short, long)]
        map: PathBuf,
        /// X coordinate of the click, in map units
        #[arg(short, long, allow_hyphen_values = true)]
        x: f64,
        /// Y coordinate of the click, in map units
        #[arg(short, long, allow_hyphen_values = true)]
        y: f64,
        /// Palette symbol for the new object
        #[arg(short, long)]
        symbol: String,
        /// Fill configuration (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Where to write the updated map (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also export the updated map as GeoJSON
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Write the occupancy grid the fill tool sees as a PNG
    Rasterize {
        /// Path to the JSON map
        #[arg(short, long)]
        map: PathBuf,
        /// Fill configuration (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the map's symbols and whether they can be used for filling
    Symbols {
        /// Path to the JSON map
        #[arg(short, long)]
        map: PathBuf,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // stdout may carry JSON output, keep logs on stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Fill { map, x, y, symbol, config, output, geojson } => {
            fill(map, Coord { x: *x, y: *y }, symbol, config.as_deref(), output.as_deref(), geojson.as_deref())?;
        }
        Commands::Rasterize { map, config, output } => {
            rasterize(map, config.as_deref(), output)?;
        }
        Commands::Symbols { map, json } => {
            symbols(map, *json)?;
        }
    }

    Ok(())
}

fn fill(
    map_path: &Path,
    click: Coord<f64>,
    symbol_name: &str,
    config_path: Option<&Path>,
    output: Option<&Path>,
    geojson: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let mut map = Map::from_json_file(map_path)?;
    let symbol = find_symbol(&map, symbol_name)?;
    info!("Loaded {} objects from {:?}", map.object_count(), map_path);

    let tool = FillTool::new(config);
    let outcome = match tool.fill_at(&mut map, &symbol, click) {
        Ok(outcome) => outcome,
        Err(e) if e.is_recoverable() => {
            warn!("Fill at ({}, {}) failed: {}", click.x, click.y, e);
            return Err(eyre!("{}", e));
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Created object {} from {} sections ({} boundary pixels)",
        outcome.object_index, outcome.section_count, outcome.contour_len
    );

    let output = output.unwrap_or(map_path);
    map.to_json_file(output)?;
    info!("Saved map to {:?}", output);

    if let Some(path) = geojson {
        map.save_geojson(path)?;
        info!("Saved GeoJSON to {:?}", path);
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn rasterize(map_path: &Path, config_path: Option<&Path>, output: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let map = Map::from_json_file(map_path)?;
    let extent = map.extent().ok_or_else(|| eyre!("The map contains no objects"))?;

    let region = map.rasterize(extent, &config)?;
    region.grid.save_png(output)?;
    info!(
        "Saved {}x{} occupancy grid ({} occupied) to {:?}",
        region.grid.width(),
        region.grid.height(),
        region.grid.occupied_count(),
        output
    );
    Ok(())
}

fn symbols(map_path: &Path, json: bool) -> Result<()> {
    let map = Map::from_json_file(map_path)?;
    let summaries = summarize_symbols(&map);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{:<24} {:<10} {:>8} {:>6}", "symbol", "kind", "objects", "fill");
    for s in &summaries {
        let fill = if s.can_fill { "yes" } else { "no" };
        println!("{:<24} {:<10} {:>8} {:>6}", s.name, s.kind.to_string(), s.object_count, fill);
    }
    Ok(())
}
