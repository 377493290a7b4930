use crate::warp::{DisplayMode, FadeDirection, SessionConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "acid_warp",
    version,
    about = "Palette-cycling generative patterns in the terminal"
)]
pub struct Config {
    /// Pixel buffer width (default: terminal pixel grid at startup).
    #[arg(long)]
    pub width: Option<usize>,

    /// Pixel buffer height (default: terminal pixel grid at startup).
    #[arg(long)]
    pub height: Option<usize>,

    /// Start without the status line.
    #[arg(long, default_value_t = false)]
    pub fullscreen: bool,

    /// Always draw this formula instead of the shuffled sequence.
    #[arg(short = 'f', long, visible_alias = "image-func", allow_negative_numbers = true)]
    pub formula: Option<i64>,

    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    /// Milliseconds per animation tick.
    #[arg(long, default_value_t = 30)]
    pub tick_ms: u64,

    #[arg(long, default_value_t = 4)]
    pub logo_secs: u64,

    #[arg(long, default_value_t = 20)]
    pub image_secs: u64,

    #[arg(long, value_enum, default_value_t = FadeTo::Black)]
    pub fade_to: FadeTo,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Start on the direct-RGB effects instead of the palette patterns.
    #[arg(long, visible_alias = "modern-effect", default_value_t = false)]
    pub effects: bool,

    /// Seconds each RGB effect shows before the auto-cycle moves on.
    #[arg(long, default_value_t = 8)]
    pub effect_secs: u64,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_probe: bool,

    /// Write diagnostics to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    #[value(alias = "hires", alias = "dots")]
    Braille,
    Kitty,
}

impl RendererMode {
    /// Pixels per terminal cell (columns, rows).
    pub fn cell_pixels(self) -> (usize, usize) {
        match self {
            Self::Ascii => (1, 1),
            Self::HalfBlock => (1, 2),
            Self::Braille | Self::Kitty => (2, 4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FadeTo {
    Black,
    White,
}

impl From<FadeTo> for FadeDirection {
    fn from(v: FadeTo) -> Self {
        match v {
            FadeTo::Black => FadeDirection::Black,
            FadeTo::White => FadeDirection::White,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.width == Some(0) {
            anyhow::bail!("--width must be at least 1");
        }
        if self.height == Some(0) {
            anyhow::bail!("--height must be at least 1");
        }
        if self.effect_secs == 0 {
            anyhow::bail!("--effect-secs must be at least 1");
        }
        if self.log_filter.trim().is_empty() {
            anyhow::bail!("--log-filter must not be empty");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Session settings, filling unset dimensions from `fallback`.
    pub fn session_config(&self, fallback: (usize, usize)) -> SessionConfig {
        SessionConfig {
            width: self.width.unwrap_or(fallback.0).max(1),
            height: self.height.unwrap_or(fallback.1).max(1),
            logo_time: Duration::from_secs(self.logo_secs),
            image_time: Duration::from_secs(self.image_secs),
            forced_formula: self.formula,
            fade_direction: self.fade_to.into(),
            seed: self.seed,
            mode: if self.effects {
                DisplayMode::Effects
            } else {
                DisplayMode::Palette
            },
            effect_interval: Duration::from_secs(self.effect_secs),
        }
    }
}
