use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use glyphcast::encode::export::export_grid;
use glyphcast::glyph::sampler::sample_grid;
use glyphcast::{
    BackendKind, CharacterSet, Color, ColorPreset, ConfigEdit, ExportArtifact, ExportFormat,
    GlyphFont, ImageSequenceSource, Point, RasterBackend, RenderConfig, Resolution, Session,
    SessionUpdate, SourceImage, TracingSink, Vec2, ViewEvent, Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "glyphcast", version, about = "Turn images into character art")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an image and write one export artifact.
    Convert(ConvertArgs),
    /// Print the character grid to stdout.
    Preview(PreviewArgs),
    /// Render the viewport (zoom/pan/rotate/flip applied) as a PNG.
    View(ViewArgs),
    /// Replay a directory of images as a periodic capture, exporting each frame received.
    Capture(CaptureArgs),
    /// List character sets, resolutions and color presets.
    Presets,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input image (PNG, JPEG, WebP or SVG).
    #[arg(required_unless_present = "sample")]
    input: Option<PathBuf>,

    /// Use the built-in placeholder image instead of an input file.
    #[arg(long, conflicts_with = "input")]
    sample: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Render config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    charset: Option<CharacterSet>,

    /// tiny, small, medium, large or ultra.
    #[arg(long, conflicts_with = "block_size")]
    resolution: Option<Resolution>,

    /// Source pixels per glyph.
    #[arg(long)]
    block_size: Option<u32>,

    #[arg(long)]
    invert: bool,

    /// -100..=100
    #[arg(long, allow_hyphen_values = true)]
    brightness: Option<i32>,

    /// -100..=100
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<i32>,

    /// Color preset key or display name; explicit colors override it.
    #[arg(long)]
    preset: Option<ColorPreset>,

    /// `#RRGGBB`, `#RRGGBBAA` or `transparent`.
    #[arg(long)]
    background: Option<Color>,

    #[arg(long)]
    characters: Option<Color>,

    /// Monospace font file (defaults to `$GLYPHCAST_FONT` or a system font).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output file path.
    #[arg(long, conflicts_with = "out_dir")]
    out: Option<PathBuf>,

    /// Directory for the generated `ascii-<millis>.<ext>` file.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long, default_value = "png")]
    format: ExportFormat,

    #[command(flatten)]
    output: OutputArgs,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct ViewArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// 0.5..=4
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Degrees, -180..=180.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    rotation: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_x: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pan_y: f64,

    #[arg(long)]
    flip_x: bool,

    #[arg(long)]
    flip_y: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

#[derive(Args, Debug)]
struct CaptureArgs {
    /// Directory of frames, replayed in file-name order.
    dir: PathBuf,

    /// Stop after this many frames.
    #[arg(long, default_value_t = 10)]
    frames: u64,

    #[arg(long, default_value_t = 200)]
    interval_ms: u64,

    /// Start over at the first frame when the directory runs out.
    #[arg(long = "loop")]
    looping: bool,

    #[arg(long, default_value = "txt")]
    format: ExportFormat,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Preview(args) => cmd_preview(args),
        Command::View(args) => cmd_view(args),
        Command::Capture(args) => cmd_capture(args),
        Command::Presets => cmd_presets(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn render_config(args: &RenderArgs) -> anyhow::Result<RenderConfig> {
    let mut cfg = match &args.config {
        Some(path) => RenderConfig::from_path(path)
            .with_context(|| format!("load render config '{}'", path.display()))?,
        None => RenderConfig::default(),
    };

    let mut edits = Vec::new();
    edits.extend(args.charset.map(ConfigEdit::CharacterSet));
    edits.extend(args.resolution.map(ConfigEdit::Resolution));
    edits.extend(args.block_size.map(ConfigEdit::BlockSize));
    if args.invert {
        edits.push(ConfigEdit::Invert(true));
    }
    edits.extend(args.brightness.map(ConfigEdit::Brightness));
    edits.extend(args.contrast.map(ConfigEdit::Contrast));
    edits.extend(args.preset.map(ConfigEdit::Preset));
    edits.extend(args.background.map(ConfigEdit::Background));
    edits.extend(args.characters.map(ConfigEdit::Characters));
    for edit in edits {
        edit.apply_to(&mut cfg);
    }

    cfg.validate()?;
    Ok(cfg)
}

fn load_input(args: &InputArgs) -> anyhow::Result<SourceImage> {
    if args.sample {
        return Ok(glyphcast::placeholder_sample()?);
    }
    let path = args
        .input
        .as_deref()
        .context("an input image or --sample is required")?;
    let decoded = glyphcast::decode_path(path)
        .with_context(|| format!("load image '{}'", path.display()))?;
    for warning in &decoded.warnings {
        tracing::warn!(input = %path.display(), "{warning}");
    }
    Ok(decoded.image)
}

fn backend(font: Option<&Path>) -> anyhow::Result<Box<dyn RasterBackend>> {
    let font = match font {
        Some(path) => GlyphFont::from_path(path)?,
        None => GlyphFont::discover()?,
    };
    tracing::debug!(font = %font.origin().display(), "glyph font");
    Ok(glyphcast::create_backend(BackendKind::Cpu, font)?)
}

fn session(args: &RenderArgs, image: SourceImage) -> anyhow::Result<Session> {
    let config = render_config(args)?;
    let mut session = Session::with_config(
        config,
        backend(args.font.as_deref())?,
        Box::new(TracingSink),
    );
    session.apply(SessionUpdate::LoadImage(image))?;
    Ok(session)
}

fn write_artifact(path: &Path, artifact: &ExportArtifact) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, &artifact.bytes)
        .with_context(|| format!("write {} '{}'", artifact.mime, path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let image = load_input(&args.input)?;

    let artifact = if args.format.is_text() {
        let config = render_config(&args.render)?;
        let grid = sample_grid(&image, &config)?;
        export_grid(&grid, &config, args.format)
            .context("text export produced no artifact")?
    } else {
        let mut session = session(&args.render, image)?;
        session.export(args.format)?
    };

    let path = match (&args.output.out, &args.output.out_dir) {
        (Some(out), _) => out.clone(),
        (None, Some(dir)) => dir.join(&artifact.file_name),
        (None, None) => PathBuf::from(&artifact.file_name),
    };
    write_artifact(&path, &artifact)
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let image = load_input(&args.input)?;
    let config = render_config(&args.render)?;
    let grid = sample_grid(&image, &config)?;
    print!("{}", grid.to_text());
    Ok(())
}

fn cmd_view(args: ViewArgs) -> anyhow::Result<()> {
    let image = load_input(&args.input)?;
    let viewport = Viewport::new(args.width, args.height)?;
    let mut session = session(&args.render, image)?;

    let mut events = vec![
        ViewEvent::SetZoom(args.zoom),
        ViewEvent::SetRotation(args.rotation),
    ];
    if args.pan_x != 0.0 || args.pan_y != 0.0 {
        events.push(ViewEvent::PointerDown(Point::ORIGIN));
        events.push(ViewEvent::PointerMove(
            Point::ORIGIN + Vec2::new(args.pan_x, args.pan_y),
        ));
        events.push(ViewEvent::PointerUp);
    }
    if args.flip_x {
        events.push(ViewEvent::ToggleFlipX);
    }
    if args.flip_y {
        events.push(ViewEvent::ToggleFlipY);
    }
    for event in events {
        session.apply(SessionUpdate::View(event))?;
    }

    let frame = session.present(viewport)?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let config = render_config(&args.render)?;
    let mut session = Session::with_config(
        config,
        backend(args.render.font.as_deref())?,
        Box::new(TracingSink),
    );
    let interval = Duration::from_millis(args.interval_ms);
    session.start_capture(ImageSequenceSource::new(&args.dir).looping(args.looping), interval)?;

    // Generous wait so a slow decode is not mistaken for the end of the sequence.
    let timeout = interval * 10 + Duration::from_secs(5);
    let mut written = 0u64;
    while written < args.frames {
        let Some(seq) = session.wait_capture(timeout)? else {
            break;
        };
        let artifact = session.export(args.format)?;
        let path = args
            .out_dir
            .join(format!("frame{seq:05}-{}", artifact.file_name));
        write_artifact(&path, &artifact)?;
        written += 1;
    }
    session.stop_capture();

    eprintln!("captured {written} frame(s) from '{}'", args.dir.display());
    Ok(())
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("character sets:");
    for set in CharacterSet::ALL {
        println!("  {:<14} {}", set.name(), set.as_str());
    }
    println!("resolutions:");
    for r in Resolution::ALL {
        println!("  {:<14} {} px", r.name(), r.block_size());
    }
    println!("color presets:");
    for p in ColorPreset::ALL {
        let (bg, fg) = p.colors();
        println!("  {:<14} {:<16} {fg} on {bg}", p.key(), p.display_name());
    }
    println!("export formats:");
    for f in ExportFormat::ALL {
        println!("  {f}");
    }
    Ok(())
}
