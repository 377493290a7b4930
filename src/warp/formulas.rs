//! The formula bank: closed-form pixel-coordinate formulas that fill an
//! [`IndexedImage`] with palette indices.
//!
//! Every formula is evaluated on integers with truncating division, exactly as
//! written per variant. The raw value is then folded into `1..color_max`.

use super::image::IndexedImage;
use super::lut::{lut_angle, lut_cos, lut_dist, lut_sin, ANGLE_UNIT};

/// How many formulas take part in the shuffled rotation. The last formula
/// is only reachable through an explicit override.
pub const NUM_IMAGE_FUNCTIONS: usize = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormulaKind {
    /// Pure function of the pixel position and the per-image ripple offsets.
    Closed,
    /// Reads the already-written left and upper neighbors. The image must be
    /// filled in one sequential raster pass (left to right, top to bottom);
    /// these formulas cannot be split across rows or tiles.
    Feedback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formula {
    RaysWaves,
    RaysWavesStrong,
    RandomRipples,
    Peacock,
    SineRings,
    WaveSpiral,
    PeacockTrio,
    PeacockTrioSpiral,
    PeacockTrioFine,
    FiveArmStar,
    Wave2d,
    Wave2dBroad,
    ConcentricRings,
    Rays,
    ToothedSpiral,
    RingsSine,
    RingsSineSliding,
    CosineLattice,
    WaveFalloff7,
    WaveFalloff17,
    InterferenceSpiral,
    InterferenceRings,
    InterferenceGrid,
    SevenArmRays,
    RipplesBold,
    RippleSpiral,
    RippleSpiralQuad,
    RipplesFine,
    Rain,
    RainRings,
    XorPeacock,
    XorRaysRings,
    XorGrid,
    RainVariation,
    RainPools,
    DoubleToothedSpiral,
    DoubleRaysWaves,
    StretchedRaysWaves,
    InterlacedSpiral,
    StretchedXorRays,
    StretchedXorGrid,
}

impl Formula {
    pub const ALL: [Self; 41] = [
        Self::RaysWaves,
        Self::RaysWavesStrong,
        Self::RandomRipples,
        Self::Peacock,
        Self::SineRings,
        Self::WaveSpiral,
        Self::PeacockTrio,
        Self::PeacockTrioSpiral,
        Self::PeacockTrioFine,
        Self::FiveArmStar,
        Self::Wave2d,
        Self::Wave2dBroad,
        Self::ConcentricRings,
        Self::Rays,
        Self::ToothedSpiral,
        Self::RingsSine,
        Self::RingsSineSliding,
        Self::CosineLattice,
        Self::WaveFalloff7,
        Self::WaveFalloff17,
        Self::InterferenceSpiral,
        Self::InterferenceRings,
        Self::InterferenceGrid,
        Self::SevenArmRays,
        Self::RipplesBold,
        Self::RippleSpiral,
        Self::RippleSpiralQuad,
        Self::RipplesFine,
        Self::Rain,
        Self::RainRings,
        Self::XorPeacock,
        Self::XorRaysRings,
        Self::XorGrid,
        Self::RainVariation,
        Self::RainPools,
        Self::DoubleToothedSpiral,
        Self::DoubleRaysWaves,
        Self::StretchedRaysWaves,
        Self::InterlacedSpiral,
        Self::StretchedXorRays,
        Self::StretchedXorGrid,
    ];

    pub fn from_index(idx: i64) -> Option<Self> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> FormulaKind {
        match self {
            Self::Rain | Self::RainRings | Self::RainVariation | Self::RainPools => {
                FormulaKind::Feedback
            }
            _ => FormulaKind::Closed,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::RaysWaves => "Rays plus 2D Waves",
            Self::RaysWavesStrong => "Rays plus Strong 2D Waves",
            Self::RandomRipples => "Four Random Ripples",
            Self::Peacock => "Peacock",
            Self::SineRings => "Sine Rings",
            Self::WaveSpiral => "2D Wave + Spiral",
            Self::PeacockTrio => "Peacock, Three Centers",
            Self::PeacockTrioSpiral => "Peacock Spiral, Three Centers",
            Self::PeacockTrioFine => "Fine Peacock, Three Centers",
            Self::FiveArmStar => "Five Arm Star",
            Self::Wave2d => "2D Wave",
            Self::Wave2dBroad => "Broad 2D Wave",
            Self::ConcentricRings => "Simple Concentric Rings",
            Self::Rays => "Simple Rays",
            Self::ToothedSpiral => "Toothed Spiral Sharp",
            Self::RingsSine => "Rings with Sine",
            Self::RingsSineSliding => "Rings with Sliding Inner Rings",
            Self::CosineLattice => "Cosine Lattice Falloff",
            Self::WaveFalloff7 => "2D Wave Falloff x7",
            Self::WaveFalloff17 => "2D Wave Falloff x17",
            Self::InterferenceSpiral => "2D Wave Interference Spiral",
            Self::InterferenceRings => "2D Wave Interference Rings",
            Self::InterferenceGrid => "2D Wave Interference Grid",
            Self::SevenArmRays => "Seven Arm Rays",
            Self::RipplesBold => "Bold Random Ripples",
            Self::RippleSpiral => "Random Ripple Spiral",
            Self::RippleSpiralQuad => "Quad Random Ripple Spiral",
            Self::RipplesFine => "Fine Random Ripples",
            Self::Rain => "Random Curtain of Rain",
            Self::RainRings => "Rain over Rings",
            Self::XorPeacock => "XOR Peacock",
            Self::XorRaysRings => "XOR Rays and Rings",
            Self::XorGrid => "XOR Grid",
            Self::RainVariation => "Variation on Rain",
            Self::RainPools => "Rain Pools",
            Self::DoubleToothedSpiral => "Double Toothed Spiral",
            Self::DoubleRaysWaves => "Double Rays and Waves",
            Self::StretchedRaysWaves => "Stretched Rays and Waves",
            Self::InterlacedSpiral => "Interlaced Spiral",
            Self::StretchedXorRays => "Stretched XOR Rays",
            Self::StretchedXorGrid => "Stretched XOR Grid",
        }
    }
}

/// Name for any selector, including the random-fill fallback.
pub fn formula_label(idx: i64) -> &'static str {
    Formula::from_index(idx)
        .map(Formula::name)
        .unwrap_or("Random Noise")
}

/// Secondary ripple centers, drawn once per image.
#[derive(Clone, Copy, Debug)]
struct Ripples {
    x: [i64; 4],
    y: [i64; 4],
}

impl Ripples {
    fn draw(rng: &mut fastrand::Rng) -> Self {
        let mut x = [0i64; 4];
        let mut y = [0i64; 4];
        for v in &mut x {
            *v = rng.i64(0..40) - 20;
        }
        for v in &mut y {
            *v = rng.i64(0..40) - 20;
        }
        Self { x, y }
    }
}

struct Pixel {
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    dist: i64,
    angle: i64,
    xmax: i64,
    ymax: i64,
}

impl Pixel {
    fn at(x: i64, y: i64, center: (i64, i64), xmax: i64, ymax: i64) -> Self {
        let dx = x - center.0;
        let dy = y - center.1;
        Self {
            x,
            y,
            dx,
            dy,
            dist: lut_dist(dx, dy),
            angle: lut_angle(dx, dy),
            xmax,
            ymax,
        }
    }

    // lut_cos(k * x * ANGLE_UNIT / xmax)
    fn wave_x(&self, k: i64) -> i64 {
        lut_cos(k * self.x * ANGLE_UNIT / self.xmax)
    }

    fn wave_y(&self, k: i64) -> i64 {
        lut_cos(k * self.y * ANGLE_UNIT / self.ymax)
    }

    // lut_cos(x * ANGLE_UNIT / xmax * 2); truncates before doubling.
    fn wave_x2(&self) -> i64 {
        lut_cos(self.x * ANGLE_UNIT / self.xmax * 2)
    }

    fn wave_y2(&self) -> i64 {
        lut_cos(self.y * ANGLE_UNIT / self.ymax * 2)
    }

    fn ripple(&self, r: &Ripples, i: usize, mul: i64) -> i64 {
        lut_sin(lut_dist(self.dx + r.x[i], self.dy + r.y[i]) * mul)
    }

    fn ring_at(&self, ox: i64, oy: i64, mul: i64) -> i64 {
        lut_sin(lut_dist(self.dx + ox, self.dy + oy) * mul)
    }

    // Same pixel seen through a vertically squashed lens.
    fn stretched(&self) -> (i64, i64, i64) {
        let dy = self.dy * 2;
        (dy, lut_dist(self.dx, dy), lut_angle(self.dx, dy))
    }
}

/// Fill `image` with `selector` around `center`.
///
/// Selectors outside the known set produce uniform random noise. Output
/// indices are always in `1..color_max`; `color_max` is clamped to `2..=256`.
pub fn generate(
    selector: i64,
    image: &mut IndexedImage,
    center: (i64, i64),
    color_max: i64,
    rng: &mut fastrand::Rng,
) {
    let formula = Formula::from_index(selector);
    let modulus = color_max.clamp(2, 256) - 1;
    let ripples = Ripples::draw(rng);
    let w = image.width();
    let h = image.height();
    let (xmax, ymax) = (w as i64, h as i64);

    for y in 0..h {
        for x in 0..w {
            let raw = match formula {
                Some(f) => {
                    let px = Pixel::at(x as i64, y as i64, center, xmax, ymax);
                    let neighbors = if f.kind() == FormulaKind::Feedback && x > 0 && y > 0 {
                        Some((image.get(x - 1, y) as i64, image.get(x, y - 1) as i64))
                    } else {
                        None
                    };
                    evaluate(f, &px, &ripples, neighbors, rng)
                }
                None => rng.i64(0..modulus) + 1,
            };
            image.set(x, y, fold_color(raw, modulus));
        }
    }
}

#[inline]
fn fold_color(raw: i64, modulus: i64) -> u8 {
    let mut c = raw % modulus;
    if c < 0 {
        c += modulus;
    }
    (c + 1) as u8
}

fn evaluate(
    f: Formula,
    p: &Pixel,
    r: &Ripples,
    neighbors: Option<(i64, i64)>,
    rng: &mut fastrand::Rng,
) -> i64 {
    let (dist, angle) = (p.dist, p.angle);
    match f {
        Formula::RaysWaves => {
            angle + lut_sin(dist * 10) / 64 + p.wave_x2() / 32 + p.wave_y2() / 32
        }
        Formula::RaysWavesStrong => {
            angle + lut_sin(dist * 10) / 16 + p.wave_x2() / 8 + p.wave_y2() / 8
        }
        Formula::RandomRipples => {
            p.ripple(r, 0, 4) / 32
                + p.ripple(r, 1, 8) / 32
                + p.ripple(r, 2, 16) / 32
                + p.ripple(r, 3, 32) / 32
        }
        Formula::Peacock => {
            angle + p.ring_at(20, 0, 10) / 32 + angle + p.ring_at(-20, 0, 10) / 32
        }
        Formula::SineRings => lut_sin(dist) / 16,
        Formula::WaveSpiral => p.wave_x(1) / 8 + p.wave_y(1) / 8 + angle + lut_sin(dist) / 32,
        Formula::PeacockTrio => {
            p.ring_at(0, -20, 4) / 32 + p.ring_at(20, 20, 4) / 32 + p.ring_at(-20, 20, 4) / 32
        }
        Formula::PeacockTrioSpiral => {
            angle
                + p.ring_at(0, -20, 8) / 32
                + p.ring_at(20, 20, 8) / 32
                + p.ring_at(-20, 20, 8) / 32
        }
        Formula::PeacockTrioFine => {
            p.ring_at(0, -20, 12) / 32 + p.ring_at(20, 20, 12) / 32 + p.ring_at(-20, 20, 12) / 32
        }
        Formula::FiveArmStar => dist + lut_sin(5 * angle) / 64,
        Formula::Wave2d => p.wave_x2() / 4 + p.wave_y2() / 4,
        Formula::Wave2dBroad => p.wave_x(1) / 8 + p.wave_y(1) / 8,
        Formula::ConcentricRings => dist,
        Formula::Rays => angle,
        Formula::ToothedSpiral => angle + lut_sin(dist * 8) / 32,
        Formula::RingsSine => lut_sin(dist * 4) / 32,
        Formula::RingsSineSliding => dist + lut_sin(dist * 4) / 32,
        Formula::CosineLattice => {
            lut_sin(p.wave_x(2)) / (20 + dist) + lut_sin(p.wave_y(2)) / (20 + dist)
        }
        Formula::WaveFalloff7 => p.wave_x(7) / (20 + dist) + p.wave_y(7) / (20 + dist),
        Formula::WaveFalloff17 => p.wave_x(17) / (20 + dist) + p.wave_y(17) / (20 + dist),
        Formula::InterferenceSpiral => p.wave_x(17) / 32 + p.wave_y(17) / 32 + dist + angle,
        Formula::InterferenceRings => p.wave_x(7) / 32 + p.wave_y(7) / 32 + dist,
        Formula::InterferenceGrid => {
            p.wave_x(7) / 32 + p.wave_y(7) / 32 + p.wave_x(11) / 32 + p.wave_y(11) / 32
        }
        Formula::SevenArmRays => lut_sin(angle * 7) / 32,
        Formula::RipplesBold => {
            p.ripple(r, 0, 2) / 12
                + p.ripple(r, 1, 4) / 12
                + p.ripple(r, 2, 6) / 12
                + p.ripple(r, 3, 8) / 12
        }
        Formula::RippleSpiral => {
            angle
                + p.ripple(r, 0, 2) / 16
                + angle
                + p.ripple(r, 1, 4) / 16
                + p.ripple(r, 2, 6) / 8
                + p.ripple(r, 3, 8) / 8
        }
        Formula::RippleSpiralQuad => {
            angle
                + p.ripple(r, 0, 2) / 12
                + angle
                + p.ripple(r, 1, 4) / 12
                + angle
                + p.ripple(r, 2, 6) / 12
                + angle
                + p.ripple(r, 3, 8) / 12
        }
        Formula::RipplesFine => {
            p.ripple(r, 0, 2) / 32
                + p.ripple(r, 1, 4) / 32
                + p.ripple(r, 2, 6) / 32
                + p.ripple(r, 3, 8) / 32
        }
        Formula::Rain => match neighbors {
            None => rng.i64(0..16),
            Some((left, up)) => (left + up) / 2 + rng.i64(0..16) - 8,
        },
        Formula::RainRings => match neighbors {
            None => rng.i64(0..1024),
            Some((left, up)) => dist / 6 + (left + up) / 2 + rng.i64(0..16) - 8,
        },
        Formula::XorPeacock => {
            p.ring_at(0, -20, 4) / 32 ^ p.ring_at(20, 20, 4) / 32 ^ p.ring_at(-20, 20, 4) / 32
        }
        Formula::XorRaysRings => (angle % (ANGLE_UNIT / 4)) ^ dist,
        Formula::XorGrid => p.dy ^ p.dx,
        Formula::RainVariation => {
            let mut c = match neighbors {
                None => rng.i64(0..16),
                Some((left, up)) => (left + up) / 2,
            };
            c += rng.i64(0..2) - 1;
            if c < 64 {
                c += rng.i64(0..16) - 8;
            }
            c
        }
        Formula::RainPools => {
            let mut c = match neighbors {
                None => rng.i64(0..16),
                Some((left, up)) => (left + up) / 2,
            };
            if c < 100 {
                c += rng.i64(0..16) - 8;
            }
            c
        }
        Formula::DoubleToothedSpiral => {
            let first = angle + lut_sin(dist * 8) / 32;
            let (_, dist2, angle2) = p.stretched();
            (first + angle2 + lut_sin(dist2 * 8) / 32) / 2
        }
        Formula::DoubleRaysWaves => {
            let first = angle + lut_sin(dist * 10) / 16 + p.wave_x2() / 8 + p.wave_y2() / 8;
            let (_, dist2, angle2) = p.stretched();
            (first + angle2 + lut_sin(dist2 * 8) / 32) / 2
        }
        Formula::StretchedRaysWaves => {
            let first = angle + lut_sin(dist * 10) / 16 + p.wave_x2() / 8 + p.wave_y2() / 8;
            let (_, dist2, angle2) = p.stretched();
            (first + angle2 + lut_sin(dist2 * 10) / 16 + p.wave_x2() / 8 + p.wave_y2() / 8) / 2
        }
        Formula::InterlacedSpiral => {
            let (dist, angle) = if p.dy % 2 != 0 {
                let (_, d, a) = p.stretched();
                (d, a)
            } else {
                (dist, angle)
            };
            angle + lut_sin(dist * 8) / 32
        }
        Formula::StretchedXorRays => {
            let first = (angle % (ANGLE_UNIT / 4)) ^ dist;
            let (_, dist2, angle2) = p.stretched();
            (first + ((angle2 % (ANGLE_UNIT / 4)) ^ dist2)) / 2
        }
        Formula::StretchedXorGrid => {
            let first = p.dy ^ p.dx;
            let (dy2, _, _) = p.stretched();
            (first + (dy2 ^ p.dx)) / 2
        }
    }
}
