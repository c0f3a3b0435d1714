use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use stickerforge::{
    CaptionPosition, Compositor, FontBook, ForgeConfig, GenerationConfig, HttpBackend,
    InMemoryJobStore, InMemoryPackStore, JobId, JobStatus, Orchestrator, Pack, PlanBuilder,
    catalog::library::{builtin_library, load_library},
    compositor::codec::parse_data_uri,
};

#[derive(Parser, Debug)]
#[command(name = "stickerforge", version)]
struct Cli {
    /// Optional JSON config file; environment overrides are applied on top.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn a local image into a sticker PNG.
    Composite(CompositeArgs),
    /// Print the sticker plan for a mood/style/language as JSON.
    Plan(PlanArgs),
    /// Generate a full pack from a photo using the configured HTTP backend.
    ImagePack(ImagePackArgs),
    /// Generate a full pack from a text subject using the configured HTTP backend.
    TextPack(TextPackArgs),
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Input image (PNG, JPEG or WebP).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Caption text; empty means no caption.
    #[arg(long, default_value = "")]
    caption: String,

    /// Caption placement.
    #[arg(long, value_enum, default_value_t = PositionChoice::Bottom)]
    position: PositionChoice,
}

#[derive(Parser, Debug, Clone)]
struct Selection {
    /// Mood name (`roast`, `cool`, `cute`, `work`), a literal tag list, or `random`.
    #[arg(long, default_value = "random")]
    mood: String,

    /// Style (`anime`, `cartoon`, `3d`, `real`) or `random`.
    #[arg(long, default_value = "random")]
    style: String,

    /// Caption language (`en`, `tr`, `es`, `de`, `fr`).
    #[arg(long, default_value = "en", conflicts_with = "no_captions")]
    language: String,

    /// Produce stickers without captions.
    #[arg(long)]
    no_captions: bool,
}

impl Selection {
    fn to_config(&self) -> GenerationConfig {
        let language = (!self.no_captions).then_some(self.language.as_str());
        GenerationConfig::new(self.mood.clone(), self.style.clone(), language)
    }
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    selection: Selection,
}

#[derive(Parser, Debug)]
struct ImagePackArgs {
    /// Source photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for stickers and `pack.json`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Author id used for the pack nickname.
    #[arg(long)]
    user: Option<String>,

    #[command(flatten)]
    selection: Selection,
}

#[derive(Parser, Debug)]
struct TextPackArgs {
    /// Sticker subject, e.g. "a tired cat".
    #[arg(long)]
    subject: String,

    /// Output directory for stickers and `pack.json`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Author id used for the pack nickname.
    #[arg(long)]
    user: Option<String>,

    #[command(flatten)]
    selection: Selection,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PositionChoice {
    Top,
    Bottom,
    Center,
}

impl From<PositionChoice> for CaptionPosition {
    fn from(choice: PositionChoice) -> Self {
        match choice {
            PositionChoice::Top => CaptionPosition::Top,
            PositionChoice::Bottom => CaptionPosition::Bottom,
            PositionChoice::Center => CaptionPosition::Center,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = ForgeConfig::load(cli.config.as_deref()).context("load configuration")?;
    match cli.cmd {
        Command::Composite(args) => cmd_composite(&cfg, args),
        Command::Plan(args) => cmd_plan(&cfg, args),
        Command::ImagePack(args) => cmd_image_pack(&cfg, args).await,
        Command::TextPack(args) => cmd_text_pack(&cfg, args).await,
    }
}

fn cmd_composite(cfg: &ForgeConfig, args: CompositeArgs) -> anyhow::Result<()> {
    let source = std::fs::read(&args.in_path)
        .with_context(|| format!("read image '{}'", args.in_path.display()))?;

    let mut opts = cfg.compositor.options.clone();
    if let Some(caption) = opts.caption.as_mut() {
        caption.position = args.position.into();
    }
    let fonts = FontBook::with_font_dirs(&cfg.compositor.font_dirs);
    tracing::debug!(faces = fonts.face_count(), "fonts loaded");
    let compositor = Compositor::new(fonts, opts);

    let png = compositor
        .composite_sticker(&source, &args.caption)
        .with_context(|| format!("composite '{}'", args.in_path.display()))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(cfg: &ForgeConfig, args: PlanArgs) -> anyhow::Result<()> {
    let library = match &cfg.plan.library_path {
        Some(path) => load_library(path)?,
        None => builtin_library()?,
    };
    let planner = PlanBuilder::new(library)
        .with_count(cfg.plan.count)
        .with_min_pool(cfg.plan.min_pool)
        .with_seed(cfg.plan.seed);

    let plan = planner.build_plan(&args.selection.to_config())?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize plan")?
    );
    Ok(())
}

async fn cmd_image_pack(cfg: &ForgeConfig, args: ImagePackArgs) -> anyhow::Result<()> {
    let photo = std::fs::read(&args.in_path)
        .with_context(|| format!("read photo '{}'", args.in_path.display()))?;
    let orchestrator = make_orchestrator(cfg)?;
    let id = orchestrator.submit_image_job(photo, args.selection.to_config(), args.user);
    let pack = wait_for_pack(&orchestrator, id).await?;
    write_pack(&pack, &args.out_dir)
}

async fn cmd_text_pack(cfg: &ForgeConfig, args: TextPackArgs) -> anyhow::Result<()> {
    let orchestrator = make_orchestrator(cfg)?;
    let id = orchestrator.submit_text_job(args.subject, args.selection.to_config(), args.user);
    let pack = wait_for_pack(&orchestrator, id).await?;
    write_pack(&pack, &args.out_dir)
}

fn make_orchestrator(cfg: &ForgeConfig) -> anyhow::Result<Orchestrator> {
    if cfg.provider.api_key.is_none() {
        anyhow::bail!("no provider API key; set STICKERFORGE_API_KEY or provider.api_key");
    }
    let backend = HttpBackend::new(cfg.provider.clone()).context("build HTTP backend")?;
    Ok(Orchestrator::from_config(
        cfg,
        Arc::new(backend),
        Arc::new(InMemoryJobStore::new()),
        Arc::new(InMemoryPackStore::new()),
    )?)
}

async fn wait_for_pack(orchestrator: &Orchestrator, id: JobId) -> anyhow::Result<Pack> {
    let mut last_percent = None;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;
        let snapshot = orchestrator
            .poll_job(id)
            .with_context(|| format!("job {id} disappeared"))?;
        match snapshot.status {
            JobStatus::Pending => {
                let percent = snapshot.progress.percent();
                if last_percent != Some(percent) {
                    eprintln!(
                        "job {id}: {}/{} ({percent}%)",
                        snapshot.progress.completed, snapshot.progress.total
                    );
                    last_percent = Some(percent);
                }
            }
            JobStatus::Completed => {
                return snapshot
                    .result
                    .with_context(|| format!("job {id} completed without a pack (bug)"));
            }
            JobStatus::Failed => {
                anyhow::bail!(
                    "job {id} failed: {}",
                    snapshot.error.unwrap_or_else(|| "unknown error".into())
                );
            }
        }
    }
}

/// Decode inline stickers to `<id>.png`; remote references stay as URLs in `pack.json`.
fn write_pack(pack: &Pack, out_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let mut manifest = pack.clone();
    for sticker in &mut manifest.stickers {
        let Some((_, bytes)) = parse_data_uri(&sticker.image_ref) else {
            continue;
        };
        let file_name = format!("{}.png", sticker.id);
        let path = out_dir.join(&file_name);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        sticker.image_ref = file_name;
    }

    let manifest_path = out_dir.join("pack.json");
    let json = serde_json::to_vec_pretty(&manifest).context("serialize pack")?;
    std::fs::write(&manifest_path, json)
        .with_context(|| format!("write '{}'", manifest_path.display()))?;

    eprintln!(
        "wrote {} ({} stickers, {} placeholders)",
        manifest_path.display(),
        manifest.stickers.len(),
        manifest.placeholder_count()
    );
    Ok(())
}
