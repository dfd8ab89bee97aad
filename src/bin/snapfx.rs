use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snapfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split an image into dust layers and write each layer as a PNG.
    Layers(LayersArgs),
    /// Run a full snap cycle on an image and write every composited frame as a PNG.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct LayersArgs {
    /// Input image (PNG).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; created if missing.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of layers.
    #[arg(long, default_value_t = 16)]
    buckets: usize,

    /// Seed for the pixel assignment.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input image (PNG).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory; created if missing.
    #[arg(long)]
    out_dir: PathBuf,

    /// Effect configuration JSON. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames per second of the fixed-step clock.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Override the configured seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured duration in milliseconds.
    #[arg(long)]
    duration_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Layers(args) => cmd_layers(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn read_image(path: &Path) -> anyhow::Result<snapfx::PixelBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    Ok(snapfx::decode_png(&bytes)?)
}

fn read_config(path: &Path) -> anyhow::Result<snapfx::SnapConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = serde_json::from_reader(BufReader::new(f)).context("parse config JSON")?;
    Ok(cfg)
}

fn write_png(buf: snapfx::PixelBuffer, path: &Path) -> anyhow::Result<()> {
    let img: image::RgbaImage = buf.into();
    img.save(path).with_context(|| format!("write png '{}'", path.display()))
}

/// Largest padded canvas `frames` will allocate, in pixels.
const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Canvas with room around the subject for the farthest a layer can drift.
fn padded_opts(
    src: &snapfx::PixelBuffer,
    cfg: &snapfx::SnapConfig,
) -> anyhow::Result<snapfx::CompositeOpts> {
    let reach_x = cfg.offset.x.abs() + cfg.random_dislocation_offset.x.abs();
    let reach_y = cfg.offset.y.abs() + cfg.random_dislocation_offset.y.abs();
    let pad_x = padding(reach_x)?;
    let pad_y = padding(reach_y)?;

    let width = u64::from(src.width()) + 2 * u64::from(pad_x);
    let height = u64::from(src.height()) + 2 * u64::from(pad_y);
    if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
        anyhow::bail!(
            "padded canvas {width}x{height} exceeds {MAX_CANVAS_PIXELS} pixels; \
             reduce offset or random_dislocation_offset"
        );
    }

    Ok(snapfx::CompositeOpts {
        canvas: snapfx::Canvas {
            width: u32::try_from(width).context("canvas width")?,
            height: u32::try_from(height).context("canvas height")?,
        },
        origin: (i64::from(pad_x), i64::from(pad_y)),
        clear_rgba: Some([18, 20, 28, 255]),
    })
}

fn padding(reach: f64) -> anyhow::Result<u32> {
    let pad = reach.ceil() + 2.0;
    if !pad.is_finite() || pad > f64::from(u32::MAX) {
        anyhow::bail!("layer travel of {reach} pixels does not fit on a canvas");
    }
    Ok(pad as u32)
}

fn cmd_layers(args: LayersArgs) -> anyhow::Result<()> {
    let src = read_image(&args.in_path)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create '{}'", args.out_dir.display()))?;

    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);
    let layers = snapfx::decompose(&src, args.buckets, &mut rng)?;
    for enc in snapfx::encode_layers(&layers)? {
        let path = args.out_dir.join(format!("layer_{:03}.png", enc.index));
        std::fs::write(&path, &enc.png[..]).with_context(|| format!("write '{}'", path.display()))?;
    }
    tracing::info!(layers = layers.len(), out = %args.out_dir.display(), "wrote layers");
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("fps must be > 0");
    }
    let src = read_image(&args.in_path)?;
    let mut cfg = match &args.config {
        Some(path) => read_config(path)?,
        None => snapfx::SnapConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(ms) = args.duration_ms {
        cfg.duration_ms = ms;
    }
    cfg.encode_layers = false;
    cfg.validate()?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create '{}'", args.out_dir.display()))?;

    let opts = padded_opts(&src, &cfg)?;

    let capture = snapfx::StillCapture::new(src.clone());
    let mut fx = snapfx::SnapEffect::new(cfg, capture, || tracing::info!("snap completed"))?;

    let dt = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let mut index = 0u64;
    let mut emit = |fx: &snapfx::SnapEffect| -> anyhow::Result<()> {
        let frame = snapfx::render_view(&fx.frame(), &src, &opts)?;
        let path = args.out_dir.join(format!("frame_{index:05}.png"));
        write_png(frame.into_pixel_buffer()?, &path)?;
        index += 1;
        Ok(())
    };

    emit(&fx)?;
    fx.snap()?;
    let phase = fx.wait_ready(Duration::from_secs(60))?;
    if phase == snapfx::SnapPhase::Preparing {
        anyhow::bail!("timed out waiting for layers");
    }
    loop {
        emit(&fx)?;
        if fx.tick(dt)? == snapfx::SnapPhase::Completed {
            emit(&fx)?;
            break;
        }
    }
    tracing::info!(frames = index, out = %args.out_dir.display(), "wrote frames");
    Ok(())
}
