//! Palette store and animator.
//!
//! Channels are 6-bit (0..=63). Fades never touch entry 0, which generation
//! never emits.

pub const PALETTE_ENTRIES: usize = 256;
pub const PALETTE_BYTES: usize = PALETTE_ENTRIES * 3;
pub const CHANNEL_MAX: u8 = 63;

const SPARKLE_AMOUNT: u8 = 9;
const DIRECTION_CHANGE_PERIOD: u32 = 256;
// Bytes of entries 1..=255.
const FADE_START: usize = 3;
const FADE_BYTES: usize = PALETTE_BYTES - FADE_START;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PaletteType {
    Rgbw = 0,
    White = 1,
    HalfWhite = 2,
    Pastel = 3,
    RgbwLightning = 4,
    WhiteLightning = 5,
    HalfWhiteLightning = 6,
    PastelLightning = 7,
}

impl PaletteType {
    pub const COUNT: usize = 8;

    pub const fn all() -> [Self; Self::COUNT] {
        [
            Self::Rgbw,
            Self::White,
            Self::HalfWhite,
            Self::Pastel,
            Self::RgbwLightning,
            Self::WhiteLightning,
            Self::HalfWhiteLightning,
            Self::PastelLightning,
        ]
    }

    /// Unknown selectors fall back to `White`.
    pub fn from_index(idx: i64) -> Self {
        usize::try_from(idx)
            .ok()
            .and_then(|i| Self::all().get(i).copied())
            .unwrap_or(Self::White)
    }

    /// Draws from one past the last type, so the white ramp is picked a
    /// little more often than the others.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::from_index(rng.i64(0..=Self::COUNT as i64))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Rgbw => "rgbw",
            Self::White => "white",
            Self::HalfWhite => "half-white",
            Self::Pastel => "pastel",
            Self::RgbwLightning => "rgbw-lightning",
            Self::WhiteLightning => "white-lightning",
            Self::HalfWhiteLightning => "half-white-lightning",
            Self::PastelLightning => "pastel-lightning",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeStatus {
    Done,
    NotDone,
}

impl FadeStatus {
    fn from_settled(settled: usize) -> Self {
        if settled >= FADE_BYTES {
            Self::Done
        } else {
            Self::NotDone
        }
    }
}

/// 256 RGB entries, stored as consecutive `r, g, b` bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette([u8; PALETTE_BYTES]);

impl Default for Palette {
    fn default() -> Self {
        Self([0; PALETTE_BYTES])
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("entry1", &self.entry(1))
            .field("entry128", &self.entry(128))
            .finish_non_exhaustive()
    }
}

impl Palette {
    pub fn new(kind: PaletteType) -> Self {
        let mut p = Self::default();
        p.initialize(kind);
        p
    }

    /// Wraps raw bytes, clamping every channel to the 6-bit range.
    pub fn from_bytes(mut bytes: [u8; PALETTE_BYTES]) -> Self {
        for b in &mut bytes {
            *b = (*b).min(CHANNEL_MAX);
        }
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; PALETTE_BYTES] {
        &self.0
    }

    #[inline]
    pub fn entry(&self, idx: u8) -> [u8; 3] {
        let i = idx as usize * 3;
        [self.0[i], self.0[i + 1], self.0[i + 2]]
    }

    fn set(&mut self, idx: usize, rgb: [u8; 3]) {
        self.0[idx * 3..idx * 3 + 3].copy_from_slice(&rgb);
    }

    fn set_gray(&mut self, idx: usize, v: u8) {
        self.set(idx, [v, v, v]);
    }

    pub fn initialize(&mut self, kind: PaletteType) {
        match kind {
            PaletteType::Rgbw => self.init_rgbw(),
            PaletteType::White => self.init_white(),
            PaletteType::HalfWhite => self.init_half_white(),
            PaletteType::Pastel => self.init_pastel(),
            PaletteType::RgbwLightning => {
                // The white pass overwrites the bands entirely.
                self.init_rgbw();
                self.add_sparkles(SPARKLE_AMOUNT);
                self.init_white();
                self.add_sparkles(SPARKLE_AMOUNT);
            }
            PaletteType::WhiteLightning => {
                self.init_white();
                self.add_sparkles(SPARKLE_AMOUNT);
            }
            PaletteType::HalfWhiteLightning => {
                self.init_half_white();
                self.add_sparkles(SPARKLE_AMOUNT);
            }
            PaletteType::PastelLightning => {
                self.init_pastel();
                self.add_sparkles(SPARKLE_AMOUNT);
            }
        }
    }

    fn init_rgbw(&mut self) {
        for p in 0..64usize {
            let v = (if p < 32 { p * 2 } else { (63 - p) * 2 }) as u8;
            self.set(p, [v, 0, 0]);
            self.set(p + 64, [0, v, 0]);
            self.set(p + 128, [0, 0, v]);
            self.set(p + 192, [v, v, v]);
        }
    }

    fn init_white(&mut self) {
        for p in 0..128usize {
            self.set_gray(p, (p / 2) as u8);
        }
        for p in 128..256usize {
            self.set_gray(p, ((255 - p) / 2) as u8);
        }
    }

    fn init_half_white(&mut self) {
        for p in 0..64usize {
            self.set_gray(p, p as u8);
            self.set_gray(p + 64, (63 - p) as u8);
        }
        for p in 128..256usize {
            self.set_gray(p, 0);
        }
    }

    fn init_pastel(&mut self) {
        for p in 0..128usize {
            self.set_gray(p, (31 + p / 4) as u8);
            self.set_gray(p + 128, (31 + (127 - p) / 4) as u8);
        }
    }

    /// Brightens entries 1, 5, 9, ... by `amount`, clamped to 63.
    pub fn add_sparkles(&mut self, amount: u8) {
        for idx in (1..PALETTE_ENTRIES).step_by(4) {
            for c in &mut self.0[idx * 3..idx * 3 + 3] {
                *c = c.saturating_add(amount).min(CHANNEL_MAX);
            }
        }
    }

    /// Cyclic shift of one channel over all 256 entries.
    ///
    /// Forward moves every value one entry down (entry `i` takes entry `i + 1`).
    pub fn rotate_channel(&mut self, channel: usize, forward: bool) {
        debug_assert!(channel < 3);
        let n = PALETTE_ENTRIES;
        if forward {
            let first = self.0[channel];
            for i in 0..n - 1 {
                self.0[i * 3 + channel] = self.0[(i + 1) * 3 + channel];
            }
            self.0[(n - 1) * 3 + channel] = first;
        } else {
            let last = self.0[(n - 1) * 3 + channel];
            for i in (1..n).rev() {
                self.0[i * 3 + channel] = self.0[(i - 1) * 3 + channel];
            }
            self.0[channel] = last;
        }
    }

    pub fn fade_to_white(&mut self) -> FadeStatus {
        let mut settled = 0;
        for b in &mut self.0[FADE_START..] {
            if *b < CHANNEL_MAX {
                *b += 1;
            } else {
                settled += 1;
            }
        }
        FadeStatus::from_settled(settled)
    }

    pub fn fade_to_black(&mut self) -> FadeStatus {
        let mut settled = 0;
        for b in &mut self.0[FADE_START..] {
            if *b > 0 {
                *b -= 1;
            } else {
                settled += 1;
            }
        }
        FadeStatus::from_settled(settled)
    }

    /// One step toward `target` on every byte past entry 0.
    pub fn fade_to_target(&mut self, target: &Palette) -> FadeStatus {
        let mut settled = 0;
        for (b, &t) in self.0[FADE_START..].iter_mut().zip(&target.0[FADE_START..]) {
            match (*b).cmp(&t) {
                std::cmp::Ordering::Less => *b += 1,
                std::cmp::Ordering::Greater => *b -= 1,
                std::cmp::Ordering::Equal => settled += 1,
            }
        }
        FadeStatus::from_settled(settled)
    }
}

/// Per-channel roll direction; `false` rolls forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollState {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
}

impl RollState {
    /// Flips at most one channel, each with probability 1/256.
    pub fn maybe_flip(&mut self, rng: &mut fastrand::Rng) {
        match rng.u32(0..DIRECTION_CHANGE_PERIOD) {
            0 => self.red = !self.red,
            1 => self.green = !self.green,
            2 => self.blue = !self.blue,
            _ => {}
        }
    }

    pub fn roll(&self, palette: &mut Palette) {
        palette.rotate_channel(0, !self.red);
        palette.rotate_channel(1, !self.green);
        palette.rotate_channel(2, !self.blue);
    }

    /// Direction flip followed by a roll of `palette`.
    pub fn step(&mut self, palette: &mut Palette, rng: &mut fastrand::Rng) {
        self.maybe_flip(rng);
        self.roll(palette);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolidFade {
    Black,
    White,
}

/// Fade one step toward a solid color, then roll. Once the fade has
/// completed, `complete` stays set and later calls do nothing.
pub fn fade_solid_and_roll(
    palette: &mut Palette,
    to: SolidFade,
    roll: &mut RollState,
    complete: &mut bool,
    rng: &mut fastrand::Rng,
) {
    if *complete {
        return;
    }
    let status = match to {
        SolidFade::Black => palette.fade_to_black(),
        SolidFade::White => palette.fade_to_white(),
    };
    if status == FadeStatus::Done {
        *complete = true;
    }
    roll.step(palette, rng);
}

/// Fade `main` toward `target` and roll both with the same directions. After
/// the fade completes only `main` keeps rolling.
pub fn fade_to_target_and_roll(
    main: &mut Palette,
    target: &mut Palette,
    roll: &mut RollState,
    complete: &mut bool,
    rng: &mut fastrand::Rng,
) {
    if *complete {
        roll.step(main, rng);
        return;
    }
    if main.fade_to_target(target) == FadeStatus::Done {
        *complete = true;
    }
    roll.maybe_flip(rng);
    roll.roll(main);
    roll.roll(target);
}
