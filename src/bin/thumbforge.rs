use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use thumbforge::{
    BoundingBox, CompositeOutput, CompositorOpts, LifestyleParams, PlacementIntent,
    ProductCategory, Raster, Recipe, SceneDesign,
};

#[derive(Parser, Debug)]
#[command(name = "thumbforge", version)]
struct Cli {
    /// Compositor options JSON (canvas, resize_filter, threads).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Right-aligned product with a category shadow.
    Flat(FlatArgs),
    /// Scene-driven placement, shadow and reflection.
    Contextual(ContextualArgs),
    /// Softened, vignetted background with the product on top.
    Lifestyle(LifestyleArgs),
    /// One recipe over many backgrounds.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct Io {
    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Product cutout with alpha.
    #[arg(long)]
    cutout: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FlatArgs {
    #[command(flatten)]
    io: Io,

    /// Product category (fitness, baby, tech, ...). Unknown values use the default shadow.
    #[arg(long)]
    category: Option<String>,
}

#[derive(Args, Debug)]
struct ContextualArgs {
    #[command(flatten)]
    io: Io,

    /// Scene design JSON.
    #[arg(long)]
    scene: PathBuf,
}

#[derive(Args, Debug)]
struct LifestyleArgs {
    #[command(flatten)]
    io: Io,

    /// center, left-third, right-third or center-bottom.
    #[arg(long, default_value_t = PlacementIntent::Center)]
    intent: PlacementIntent,

    /// Background blur radius (clamped to 8..=15).
    #[arg(long)]
    blur: Option<f32>,

    /// Vignette edge opacity (clamped to 0.20..=0.30).
    #[arg(long)]
    vignette_opacity: Option<f32>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Background images, one variation each.
    #[arg(long, num_args = 1.., required = true)]
    backgrounds: Vec<PathBuf>,

    /// Product cutout with alpha.
    #[arg(long)]
    cutout: PathBuf,

    /// Directory receiving `variation-<n>.png`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Recipe JSON, e.g. `{"kind": "lifestyle", "intent": "left-third"}`.
    #[arg(long)]
    recipe: PathBuf,
}

#[derive(serde::Serialize, Debug)]
struct Summary {
    output: PathBuf,
    composited: bool,
    placement: Option<BoundingBox>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let opts = match &cli.config {
        Some(path) => CompositorOpts::from_json_path(path)?,
        None => CompositorOpts::default(),
    };

    match cli.cmd {
        Command::Flat(args) => cmd_flat(args, &opts),
        Command::Contextual(args) => cmd_contextual(args, &opts),
        Command::Lifestyle(args) => cmd_lifestyle(args, &opts),
        Command::Batch(args) => cmd_batch(args, &opts),
    }
}

fn cmd_flat(args: FlatArgs, opts: &CompositorOpts) -> anyhow::Result<()> {
    let (background, cutout) = read_inputs(&args.io)?;
    let category = ProductCategory::from_label(args.category.as_deref());
    let out = thumbforge::render_flat(&background, &cutout, category, opts)?;
    finish_single(out, &args.io.out)
}

fn cmd_contextual(args: ContextualArgs, opts: &CompositorOpts) -> anyhow::Result<()> {
    let (background, cutout) = read_inputs(&args.io)?;
    let scene = SceneDesign::from_path(&args.scene)?;
    let out = thumbforge::render_contextual(&background, &cutout, &scene, opts)?;
    finish_single(out, &args.io.out)
}

fn cmd_lifestyle(args: LifestyleArgs, opts: &CompositorOpts) -> anyhow::Result<()> {
    let (background, cutout) = read_inputs(&args.io)?;
    let defaults = LifestyleParams::default();
    let params = LifestyleParams {
        intent: args.intent,
        blur_radius: args.blur.unwrap_or(defaults.blur_radius),
        vignette_opacity: args.vignette_opacity.unwrap_or(defaults.vignette_opacity),
    };
    let out = thumbforge::render_lifestyle(&background, &cutout, &params, opts)?;
    finish_single(out, &args.io.out)
}

fn cmd_batch(args: BatchArgs, opts: &CompositorOpts) -> anyhow::Result<()> {
    let recipe_json = std::fs::read_to_string(&args.recipe)
        .with_context(|| format!("read recipe '{}'", args.recipe.display()))?;
    let recipe: Recipe = serde_json::from_str(&recipe_json)
        .with_context(|| format!("parse recipe '{}'", args.recipe.display()))?;

    let backgrounds = args
        .backgrounds
        .iter()
        .map(PathBuf::as_path)
        .map(read_raster)
        .collect::<anyhow::Result<Vec<_>>>()?;
    let cutout = read_raster(&args.cutout)?;

    let outcomes = thumbforge::render_variations(&backgrounds, &cutout, &recipe, opts)?;

    let mut summaries = Vec::with_capacity(outcomes.len());
    for (idx, outcome) in outcomes.iter().enumerate() {
        let path = args.out_dir.join(format!("variation-{idx}.png"));
        write_png(&path, outcome.image())?;
        summaries.push(Summary {
            output: path,
            composited: outcome.composited(),
            placement: outcome.placement(),
        });
    }
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

fn read_inputs(io: &Io) -> anyhow::Result<(Raster, Raster)> {
    Ok((read_raster(&io.background)?, read_raster(&io.cutout)?))
}

fn read_raster(path: &Path) -> anyhow::Result<Raster> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    thumbforge::decode_raster(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn write_png(path: &Path, raster: &Raster) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = thumbforge::encode_png(raster)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))
}

fn finish_single(out: CompositeOutput, path: &Path) -> anyhow::Result<()> {
    write_png(path, &out.image)?;
    let summary = Summary {
        output: path.to_path_buf(),
        composited: out.composited,
        placement: Some(out.placement),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
