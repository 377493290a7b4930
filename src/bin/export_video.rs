use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use acid_warp::input::InputEvents;
use acid_warp::render::session_rgba;
use acid_warp::warp::{DisplayMode, FadeDirection, Session, SessionConfig, EFFECT_CYCLE_INTERVAL};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

const DEFAULT_OUTPUT: &str = "export.mp4";
const DEFAULT_SEED: u64 = 0xAC1D_0A2F;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_video",
    version,
    about = "Offline export of the palette animation to MP4 via ffmpeg"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "MP4", default_value = DEFAULT_OUTPUT)]
    pub(crate) out: PathBuf,

    #[arg(long, default_value_t = 640)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = 400)]
    pub(crate) height: usize,

    #[arg(long, default_value_t = 30)]
    pub(crate) fps: u32,

    #[arg(long, value_name = "SECONDS", default_value_t = 30.0)]
    pub(crate) duration: f32,

    #[arg(short = 'f', long, allow_negative_numbers = true)]
    pub(crate) formula: Option<i64>,

    #[arg(long, default_value_t = 0)]
    pub(crate) logo_secs: u64,

    #[arg(long, default_value_t = 8)]
    pub(crate) image_secs: u64,

    #[arg(long, default_value_t = false)]
    pub(crate) fade_white: bool,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub(crate) seed: u64,

    /// Export the RGB effects instead of the palette patterns.
    #[arg(long, default_value_t = false)]
    pub(crate) effects: bool,
}

pub(crate) fn compute_frame_count(duration_s: f32, fps: u32) -> usize {
    ((duration_s.max(0.0) * fps as f32).floor() as usize).max(1)
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    if args.duration.is_nan() || args.duration <= 0.0 {
        bail!("--duration must be > 0 seconds");
    }
    Ok(())
}

pub(crate) fn session_config(args: &Cli) -> SessionConfig {
    SessionConfig {
        width: args.width,
        height: args.height,
        logo_time: Duration::from_secs(args.logo_secs),
        image_time: Duration::from_secs(args.image_secs),
        forced_formula: args.formula,
        fade_direction: if args.fade_white {
            FadeDirection::White
        } else {
            FadeDirection::Black
        },
        seed: Some(args.seed),
        mode: if args.effects {
            DisplayMode::Effects
        } else {
            DisplayMode::Palette
        },
        effect_interval: EFFECT_CYCLE_INTERVAL,
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;
    ensure_ffmpeg_available()?;

    let frame_count = compute_frame_count(args.duration, args.fps);
    let mut session = Session::new(session_config(&args)).context("allocate pixel buffer")?;

    let mut parent = args.out.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))?;

    let mut ffmpeg = spawn_ffmpeg(&args.out, args.width, args.height, args.fps)?;
    let mut ffmpeg_in = ffmpeg
        .stdin
        .take()
        .context("failed to open ffmpeg stdin for rawvideo input")?;

    render_frames(
        &mut session,
        frame_count,
        args.width,
        args.height,
        args.fps,
        &mut ffmpeg_in,
    )?;
    drop(ffmpeg_in);

    let status = ffmpeg.wait().context("wait for ffmpeg")?;
    if !status.success() {
        bail!("ffmpeg exited with status {status}");
    }

    println!(
        "exported {} frames @ {} fps -> {}",
        frame_count,
        args.fps,
        args.out.display()
    );
    Ok(())
}

fn ensure_ffmpeg_available() -> Result<()> {
    match Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            bail!("ffmpeg not found in PATH (install ffmpeg and retry)")
        }
        Err(err) => Err(anyhow!("failed to run ffmpeg: {err}")),
    }
}

fn spawn_ffmpeg(
    out_path: &Path,
    width: usize,
    height: usize,
    fps: u32,
) -> Result<std::process::Child> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-framerate")
        .arg(fps.to_string())
        .arg("-i")
        .arg("-")
        .arg("-c:v")
        .arg("libx264")
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg("-movflags")
        .arg("+faststart")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    cmd.spawn()
        .with_context(|| format!("spawn ffmpeg for output {}", out_path.display()))
}

/// One session tick per frame on a synthetic clock.
pub(crate) fn render_frames(
    session: &mut Session,
    frame_count: usize,
    width: usize,
    height: usize,
    fps: u32,
    sink: &mut dyn Write,
) -> Result<()> {
    let start = Instant::now();
    let idle = InputEvents::none();
    let mut rgba = Vec::with_capacity(width * height * 4);

    for frame_idx in 0..frame_count {
        let now = start + Duration::from_secs_f64(frame_idx as f64 / fps as f64);
        session.tick(now, &idle);
        session_rgba(session, width, height, &mut rgba);
        sink.write_all(&rgba).context("write frame to ffmpeg stdin")?;
    }
    Ok(())
}
