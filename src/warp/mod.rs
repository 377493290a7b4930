//! Palette-cycling animation core.
//!
//! A [`Session`] owns the pixel buffer, both palettes and every control flag.
//! The outer loop feeds it one [`InputEvents`] batch per tick and reads back
//! the buffer and the main palette for presentation.

pub mod clock;
pub mod effects;
pub mod formulas;
pub mod image;
pub mod logo;
pub mod lut;
pub mod palette;
pub mod sequence;

use crate::input::InputEvents;
use std::time::{Duration, Instant};

pub use clock::FrameClock;
pub use effects::{Effect, EffectCycle, EFFECT_CYCLE_INTERVAL};
pub use formulas::{formula_label, generate, Formula, FormulaKind, NUM_IMAGE_FUNCTIONS};
pub use image::IndexedImage;
pub use palette::{FadeStatus, Palette, PaletteType, RollState, SolidFade};
pub use sequence::PatternSequence;

/// Largest palette index plus one handed to the formula bank.
pub const COLOR_MAX: i64 = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    LogoDisplay,
    LogoFade,
    NewImage,
    FadeIn,
    Rotate,
    FadeOut,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Self::LogoDisplay => "logo",
            Self::LogoFade => "logo-fade",
            Self::NewImage => "new-image",
            Self::FadeIn => "fade-in",
            Self::Rotate => "rotate",
            Self::FadeOut => "fade-out",
        }
    }
}

/// What the session puts on screen: the indexed buffer through the main
/// palette, or one of the direct-RGB effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Palette,
    Effects,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Palette => Self::Effects,
            Self::Effects => Self::Palette,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Palette => "palette",
            Self::Effects => "effects",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FadeDirection {
    #[default]
    Black,
    White,
}

impl FadeDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }

    fn solid(self) -> SolidFade {
        match self {
            Self::Black => SolidFade::Black,
            Self::White => SolidFade::White,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub width: usize,
    pub height: usize,
    pub logo_time: Duration,
    pub image_time: Duration,
    /// Always regenerate with this selector instead of the shuffled order.
    pub forced_formula: Option<i64>,
    pub fade_direction: FadeDirection,
    pub seed: Option<u64>,
    pub mode: DisplayMode,
    /// Dwell time per effect before the auto-cycle moves on.
    pub effect_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 200,
            logo_time: Duration::from_secs(4),
            image_time: Duration::from_secs(20),
            forced_formula: None,
            fade_direction: FadeDirection::Black,
            seed: None,
            mode: DisplayMode::Palette,
            effect_interval: EFFECT_CYCLE_INTERVAL,
        }
    }
}

/// HUD snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
    pub phase: Phase,
    pub formula: Option<i64>,
    pub formula_name: &'static str,
    pub palette_type: PaletteType,
    pub mode: DisplayMode,
    pub effect: Effect,
    pub paused: bool,
    pub locked: bool,
    pub fade_direction: FadeDirection,
}

pub struct Session {
    logo_time: Duration,
    image_time: Duration,
    forced_formula: Option<i64>,

    image: IndexedImage,
    main: Palette,
    target: Palette,
    roll: RollState,
    sequence: PatternSequence,
    rng: fastrand::Rng,

    phase: Phase,
    deadline: Option<Instant>,
    fade_complete: bool,
    skip: bool,

    paused: bool,
    locked: bool,
    fade_direction: FadeDirection,

    formula: Option<i64>,
    palette_type: PaletteType,

    mode: DisplayMode,
    effects: EffectCycle,
    // Advances only while effects are showing and the session is running.
    effect_time: Duration,
    last_tick: Option<Instant>,
}

impl Session {
    /// Allocates the pixel buffer and paints the intro. Fails only when the
    /// buffer cannot be allocated.
    pub fn new(cfg: SessionConfig) -> anyhow::Result<Self> {
        let mut rng = cfg
            .seed
            .map(fastrand::Rng::with_seed)
            .unwrap_or_else(fastrand::Rng::new);
        let mut image = IndexedImage::new(cfg.width, cfg.height)?;
        logo::draw_logo(&mut image);
        lut::warm_up();

        let sequence = PatternSequence::new(NUM_IMAGE_FUNCTIONS, &mut rng);
        let palette_type = PaletteType::RgbwLightning;

        tracing::info!(
            width = cfg.width,
            height = cfg.height,
            forced = ?cfg.forced_formula,
            "session ready"
        );

        Ok(Self {
            logo_time: cfg.logo_time,
            image_time: cfg.image_time,
            forced_formula: cfg.forced_formula,
            image,
            main: Palette::new(palette_type),
            target: Palette::new(palette_type),
            roll: RollState::default(),
            sequence,
            rng,
            phase: Phase::LogoDisplay,
            deadline: None,
            fade_complete: false,
            skip: false,
            paused: false,
            locked: false,
            fade_direction: cfg.fade_direction,
            formula: None,
            palette_type,
            mode: cfg.mode,
            effects: EffectCycle::new(Effect::Plasma, cfg.effect_interval),
            effect_time: Duration::ZERO,
            last_tick: None,
        })
    }

    pub fn image(&self) -> &IndexedImage {
        &self.image
    }

    pub fn palette(&self) -> &Palette {
        &self.main
    }

    pub fn target_palette(&self) -> &Palette {
        &self.target
    }

    pub fn roll_state(&self) -> RollState {
        self.roll
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn fade_direction(&self) -> FadeDirection {
        self.fade_direction
    }

    pub fn formula(&self) -> Option<i64> {
        self.formula
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn effect(&self) -> Effect {
        self.effects.current()
    }

    /// Effect clock in milliseconds; frozen while paused or in palette mode.
    pub fn effect_time_ms(&self) -> u64 {
        self.effect_time.as_millis() as u64
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            formula: self.formula,
            formula_name: match self.formula {
                Some(f) => formula_label(f),
                None => "Intro",
            },
            palette_type: self.palette_type,
            mode: self.mode,
            effect: self.effects.current(),
            paused: self.paused,
            locked: self.locked,
            fade_direction: self.fade_direction,
        }
    }

    /// One animation step at time `now`.
    pub fn tick(&mut self, now: Instant, input: &InputEvents) {
        let dt = self
            .last_tick
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t));
        self.last_tick = Some(now);

        self.apply_toggles(input);
        if self.paused {
            return;
        }
        if input.mode_toggle {
            self.switch_mode();
        }
        if self.mode == DisplayMode::Effects {
            self.tick_effects(dt, input);
            return;
        }
        if input.skip_next {
            self.skip = true;
        }
        if input.skip_prev {
            self.step_back();
        }

        match self.phase {
            Phase::LogoDisplay => {
                let deadline = *self.deadline.get_or_insert(now + self.logo_time);
                if self.take_skip() || self.logo_time.is_zero() || now >= deadline {
                    self.fade_complete = false;
                    self.enter(Phase::LogoFade);
                    return;
                }
                self.roll.step(&mut self.main, &mut self.rng);
            }
            Phase::LogoFade => {
                if self.take_skip() || self.fade_complete {
                    self.fade_complete = false;
                    self.sequence.reshuffle(&mut self.rng);
                    self.enter(Phase::NewImage);
                    return;
                }
                palette::fade_solid_and_roll(
                    &mut self.main,
                    SolidFade::Black,
                    &mut self.roll,
                    &mut self.fade_complete,
                    &mut self.rng,
                );
            }
            Phase::NewImage => {
                let next = match self.forced_formula {
                    Some(f) => f,
                    None => self.sequence.advance(&mut self.rng) as i64,
                };
                self.palette_type = PaletteType::random(&mut self.rng);
                self.regenerate(next);
                self.target.initialize(self.palette_type);
                self.fade_complete = false;
                self.enter(Phase::FadeIn);
            }
            Phase::FadeIn => {
                if self.take_skip() || self.fade_complete {
                    self.fade_complete = false;
                    self.deadline = Some(now + self.image_time);
                    self.enter(Phase::Rotate);
                    return;
                }
                palette::fade_to_target_and_roll(
                    &mut self.main,
                    &mut self.target,
                    &mut self.roll,
                    &mut self.fade_complete,
                    &mut self.rng,
                );
            }
            Phase::Rotate => {
                let expired = self.deadline.is_some_and(|d| now >= d);
                if self.take_skip() || (!self.locked && expired) {
                    self.fade_complete = false;
                    self.enter(Phase::FadeOut);
                    return;
                }
                self.roll.step(&mut self.main, &mut self.rng);
                if input.new_palette {
                    self.palette_type = PaletteType::random(&mut self.rng);
                    self.main.initialize(self.palette_type);
                    tracing::debug!(palette = self.palette_type.label(), "new palette");
                }
            }
            Phase::FadeOut => {
                if self.take_skip() || self.fade_complete {
                    self.fade_complete = false;
                    self.enter(Phase::NewImage);
                    return;
                }
                palette::fade_solid_and_roll(
                    &mut self.main,
                    self.fade_direction.solid(),
                    &mut self.roll,
                    &mut self.fade_complete,
                    &mut self.rng,
                );
            }
        }
    }

    /// The only inputs honoured while paused.
    fn apply_toggles(&mut self, input: &InputEvents) {
        if input.pause_toggle {
            self.paused = !self.paused;
        }
        if input.lock_toggle {
            self.locked = !self.locked;
        }
        if input.fade_dir_toggle {
            self.fade_direction = self.fade_direction.toggled();
        }
    }

    /// Redraw the previous image in place. There is none to go back to on
    /// the logo, or on the NEW_IMAGE tick right after a reshuffle.
    fn step_back(&mut self) {
        if matches!(
            self.phase,
            Phase::LogoDisplay | Phase::LogoFade | Phase::NewImage
        ) {
            return;
        }
        let prev = match self.forced_formula {
            Some(f) => Some(f),
            None => self.sequence.step_back().map(|i| i as i64),
        };
        if let Some(prev) = prev {
            self.regenerate(prev);
        }
    }

    fn switch_mode(&mut self) {
        self.mode = self.mode.toggled();
        match self.mode {
            DisplayMode::Effects => self.effects.restart(self.effect_time),
            // Come back to a fresh image rather than the one left behind.
            DisplayMode::Palette => self.skip = true,
        }
        tracing::debug!(mode = self.mode.label(), "display mode");
    }

    fn tick_effects(&mut self, dt: Duration, input: &InputEvents) {
        self.effect_time += dt;
        let now = self.effect_time;
        let before = self.effects.current();
        if input.skip_next {
            self.effects.next(now);
        } else if input.skip_prev {
            self.effects.prev(now);
        } else if self.locked {
            self.effects.restart(now);
        } else {
            self.effects.auto_advance(now, &mut self.rng);
        }
        let after = self.effects.current();
        if after != before {
            tracing::info!(effect = after.name(), "effect");
        }
    }

    fn take_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip)
    }

    fn enter(&mut self, next: Phase) {
        tracing::debug!(from = self.phase.label(), to = next.label(), "phase");
        self.phase = next;
    }

    fn regenerate(&mut self, selector: i64) {
        let started = Instant::now();
        let center = self.image.center();
        generate(selector, &mut self.image, center, COLOR_MAX, &mut self.rng);
        self.formula = Some(selector);
        tracing::info!(
            formula = selector,
            name = formula_label(selector),
            palette = self.palette_type.label(),
            ms = started.elapsed().as_secs_f64() * 1000.0,
            "generated image"
        );
    }
}
