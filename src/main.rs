use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use prize_wheel::{App, Wheel, WheelConfig};
use tracing::{info, warn};

const DEFAULT_DATA_FILE: &str = "default.txt";

/// Fonts tried when `--font` is not given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Parser)]
#[command(name = "prize-wheel")]
#[command(about = "Spin a wheel of participants to hand out prizes")]
#[command(version)]
struct Cli {
    #[arg(help = "Data file with [Participants], [Prizes] and [GrantedWinners] sections")]
    data: Option<PathBuf>,

    #[arg(short, long, env = "PRIZE_WHEEL_FONT")]
    #[arg(help = "TrueType/OpenType font used for labels")]
    font: Option<PathBuf>,

    #[arg(long)]
    #[arg(help = "RNG seed for reproducible draws")]
    seed: Option<u64>,

    #[arg(long, default_value_t = 600)]
    #[arg(help = "Logical size of the square drawing surface")]
    size: u32,

    #[arg(long)]
    #[arg(help = "Show the current angle and the participant under the pointer")]
    debug_overlay: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let font_data = match resolve_font(cli.font.as_deref()) {
        Some(path) => {
            info!(path = %path.display(), "using font");
            Some(fs::read(&path).with_context(|| format!("reading font {}", path.display()))?)
        }
        None => {
            warn!("no usable font found; pass --font to draw labels");
            None
        }
    };

    let config = WheelConfig::builder()
        .surface_size(cli.size.max(100))
        .debug_overlay(cli.debug_overlay)
        .maybe_font_data(font_data)
        .build();
    let wheel = match cli.seed {
        Some(seed) => Wheel::seeded(config, seed),
        None => Wheel::new(config),
    };

    // Only a file named on the command line has to exist.
    let required = cli.data.is_some();
    let data_path = cli.data.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
    let mut app = App::new(wheel, Some(data_path)).context("setting up the wheel")?;
    app.startup(required);

    println!("Controls:");
    println!("- Space: spin");
    println!("- Enter / R: record the winner");
    println!("- D / Delete: dismiss the winner");
    println!("- L: load / reset, F5: reload the data file");
    println!("- Tab: show or hide the winners panel");
    println!("- Drop a file on the window to load it, Esc to quit");

    app.run().context("running the wheel window")?;
    Ok(())
}

fn resolve_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    SYSTEM_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}
