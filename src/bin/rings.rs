use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rings", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a ring config to a PNG.
    Render(RenderArgs),
    /// Print the cache key a ring would use at a view size.
    Key(KeyArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input ring config JSON.
    #[arg(long)]
    config: PathBuf,

    /// View width in pixels.
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// View height in pixels.
    #[arg(long, default_value_t = 512)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Fallback font for components without one.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Force layout guides on.
    #[arg(long)]
    blueprint: bool,

    /// Render this many times through one cache (reports hit/miss statistics).
    #[arg(long, default_value_t = 1)]
    repeat: u32,

    /// Use a private cache of this many bytes instead of the process-wide one.
    #[arg(long)]
    cache_bytes: Option<usize>,
}

#[derive(Parser, Debug)]
struct KeyArgs {
    /// Ring name.
    #[arg(long)]
    name: String,

    /// View width in pixels.
    #[arg(long)]
    width: f64,

    /// View height in pixels.
    #[arg(long)]
    height: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Key(args) => cmd_key(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = rings::RingConfig::from_path(&args.config)?;
    let base_dir = args.config.parent().unwrap_or_else(|| Path::new("."));
    let mut view = config.into_view(base_dir)?;
    if args.blueprint {
        view.show_blueprint = true;
    }

    let mut shaper = rings::ParleyShaper::new();
    if let Some(path) = &args.font {
        let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        let family = shaper.register_font(&rings::FontBytes::new(bytes))?;
        tracing::info!(%family, "registered fallback font");
    }

    let private;
    let cache = match args.cache_bytes {
        Some(bytes) => {
            private = rings::ImageCache::new(bytes);
            &private
        }
        None => rings::ImageCache::shared(),
    };

    let size = rings::Size::new(f64::from(args.width), f64::from(args.height));
    let mut image = rings::RasterImage::empty();
    for _ in 0..args.repeat.max(1) {
        image = view.render(size, cache, &mut shaper)?;
    }
    let stats = cache.stats();
    tracing::info!(
        hits = stats.hits,
        misses = stats.misses,
        evictions = stats.evictions,
        size_bytes = cache.size_bytes(),
        "image cache"
    );

    if image.is_empty() {
        anyhow::bail!("view size {}x{} has no pixels", args.width, args.height);
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image
        .to_rgba_image()?
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_key(args: KeyArgs) -> anyhow::Result<()> {
    let size = rings::Size::new(args.width, args.height);
    println!("{}", rings::cache_key(&args.name, size));
    Ok(())
}
