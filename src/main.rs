//! Insertion Sort MV entry point
//!
//! Offline driver for the frame timelines: prints export info, samples single
//! frames, or exports a frame range as JSON lines for an external renderer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use insertion_sort_mv::Settings;
use insertion_sort_mv::clock::{ExportInfo, PlaybackClock};
use insertion_sort_mv::scene::Scene;

#[derive(Parser, Debug)]
#[command(name = "insertion-sort-mv", version)]
struct Cli {
    /// Settings JSON (defaults to the authored scene).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print frame rate and frame count of an offline export.
    Info,
    /// Print one frame sample as JSON.
    Frame(FrameArgs),
    /// Write frame samples as JSON lines.
    Export(ExportArgs),
    /// Write the effective settings as JSON.
    DumpSettings(DumpArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct FrameArgs {
    /// Frame number (may be negative or past the end; reads clamp).
    #[arg(long, allow_negative_numbers = true)]
    frame: Option<i64>,

    /// Audio position in seconds; mapped to a frame with the lead-in applied.
    #[arg(long)]
    audio_time: Option<f64>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// First frame (inclusive).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    from: i64,

    /// Last frame (exclusive); defaults to the export frame count.
    #[arg(long, allow_negative_numbers = true)]
    to: Option<i64>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => Settings::default(),
    };

    match cli.cmd {
        Command::Info => cmd_info(&settings),
        Command::Frame(args) => cmd_frame(&settings, args),
        Command::Export(args) => cmd_export(&settings, args),
        Command::DumpSettings(args) => cmd_dump_settings(&settings, args),
    }
}

fn build_scene(settings: &Settings) -> anyhow::Result<Scene> {
    Scene::new(settings).context("build scene timelines")
}

fn cmd_info(settings: &Settings) -> anyhow::Result<()> {
    let info = ExportInfo::new(settings);
    println!("{}", serde_json::to_string(&info)?);
    Ok(())
}

fn cmd_frame(settings: &Settings, args: FrameArgs) -> anyhow::Result<()> {
    let frame = match (args.frame, args.audio_time) {
        (Some(frame), _) => frame,
        (None, Some(seconds)) => PlaybackClock::new(settings)
            .frame_at(seconds)
            .with_context(|| format!("--audio-time must be finite, got {seconds}"))?,
        (None, None) => anyhow::bail!("either --frame or --audio-time is required"),
    };

    let scene = build_scene(settings)?;
    println!("{}", serde_json::to_string_pretty(&scene.sample(frame))?);
    Ok(())
}

fn cmd_export(settings: &Settings, args: ExportArgs) -> anyhow::Result<()> {
    let to = args
        .to
        .unwrap_or_else(|| args.from + ExportInfo::new(settings).number_of_frames as i64);
    if to < args.from {
        anyhow::bail!("--to ({to}) must not be before --from ({})", args.from);
    }

    let scene = build_scene(settings)?;

    let mut writer: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create '{}'", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for frame in args.from..to {
        serde_json::to_writer(&mut writer, &scene.sample(frame))
            .with_context(|| format!("write frame {frame}"))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    log::info!("Exported frames {}..{}", args.from, to);
    Ok(())
}

fn cmd_dump_settings(settings: &Settings, args: DumpArgs) -> anyhow::Result<()> {
    match &args.out {
        Some(path) => settings
            .save(path)
            .with_context(|| format!("save settings '{}'", path.display()))?,
        None => println!("{}", settings.to_json()?),
    }
    Ok(())
}
