//! Direct-RGB animated effects.
//!
//! Unlike the formula bank these ignore the palettes entirely: each effect
//! shades every output pixel from its position and the effect clock.

use std::f32::consts::PI;
use std::time::Duration;

/// Time each effect stays on screen before the auto-cycle picks another.
pub const EFFECT_CYCLE_INTERVAL: Duration = Duration::from_secs(8);

const JULIA_MAX_ITER: u32 = 350;
const MANDELBROT_MAX_ITER: u32 = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Plasma,
    Swirl,
    Tunnel,
    Rings,
    Checker,
    RaysWaves,
    RaysWaves2,
    MultiRadial,
    Peacock,
    RingsSimple,
    WaveSpiral,
    PeacockThree,
    PeacockThreeAngle,
    PeacockThreeVariant,
    FiveArmStar,
    Wave,
    Wave2,
    ConcentricRings,
    RaysSimple,
    SpiralSharp,
    RingsSine,
    RingsSineSlide,
    NestedTrig,
    Wave3,
    Wave4,
    Mandelbrot,
    Julia,
}

impl Effect {
    pub const COUNT: usize = 27;

    pub const ALL: [Effect; Self::COUNT] = [
        Self::Plasma,
        Self::Swirl,
        Self::Tunnel,
        Self::Rings,
        Self::Checker,
        Self::RaysWaves,
        Self::RaysWaves2,
        Self::MultiRadial,
        Self::Peacock,
        Self::RingsSimple,
        Self::WaveSpiral,
        Self::PeacockThree,
        Self::PeacockThreeAngle,
        Self::PeacockThreeVariant,
        Self::FiveArmStar,
        Self::Wave,
        Self::Wave2,
        Self::ConcentricRings,
        Self::RaysSimple,
        Self::SpiralSharp,
        Self::RingsSine,
        Self::RingsSineSlide,
        Self::NestedTrig,
        Self::Wave3,
        Self::Wave4,
        Self::Mandelbrot,
        Self::Julia,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Plasma => "Plasma",
            Self::Swirl => "Swirl",
            Self::Tunnel => "Tunnel",
            Self::Rings => "Rings",
            Self::Checker => "Checker",
            Self::RaysWaves => "Rays plus 2D Waves",
            Self::RaysWaves2 => "Rays plus 2D Waves 2",
            Self::MultiRadial => "Multi-frequency radial waves",
            Self::Peacock => "Peacock",
            Self::RingsSimple => "Simple concentric rings",
            Self::WaveSpiral => "2D Wave + Spiral",
            Self::PeacockThree => "Peacock (three centers)",
            Self::PeacockThreeAngle => "Peacock (three centers, angle)",
            Self::PeacockThreeVariant => "Peacock (three centers, variant)",
            Self::FiveArmStar => "Five Arm Star",
            Self::Wave => "2D Wave",
            Self::Wave2 => "2D Wave 2",
            Self::ConcentricRings => "Concentric Rings",
            Self::RaysSimple => "Simple Rays",
            Self::SpiralSharp => "Toothed Spiral Sharp",
            Self::RingsSine => "Rings with Sine",
            Self::RingsSineSlide => "Rings with Sine (slide)",
            Self::NestedTrig => "Nested Trig",
            Self::Wave3 => "2D Wave 3",
            Self::Wave4 => "2D Wave 4",
            Self::Mandelbrot => "Mandelbrot Fractal",
            Self::Julia => "Julia Set",
        }
    }
}

/// Which effect is showing and since when, on the effect clock.
#[derive(Clone, Debug)]
pub struct EffectCycle {
    current: Effect,
    since: Duration,
    interval: Duration,
}

impl EffectCycle {
    pub fn new(start: Effect, interval: Duration) -> Self {
        Self {
            current: start,
            since: Duration::ZERO,
            interval,
        }
    }

    pub fn current(&self) -> Effect {
        self.current
    }

    /// Restart the dwell timer without changing the effect.
    pub fn restart(&mut self, now: Duration) {
        self.since = now;
    }

    pub fn next(&mut self, now: Duration) {
        self.select((self.current.index() + 1) % Effect::COUNT, now);
    }

    pub fn prev(&mut self, now: Duration) {
        self.select((self.current.index() + Effect::COUNT - 1) % Effect::COUNT, now);
    }

    /// Once the dwell time has strictly passed, jump to a random different
    /// effect. Returns whether the effect changed.
    pub fn auto_advance(&mut self, now: Duration, rng: &mut fastrand::Rng) -> bool {
        if now.saturating_sub(self.since) <= self.interval {
            return false;
        }
        // Draw from the other COUNT-1 effects so the pick always differs.
        let skip = rng.usize(1..Effect::COUNT);
        self.select((self.current.index() + skip) % Effect::COUNT, now);
        true
    }

    fn select(&mut self, index: usize, now: Duration) {
        if let Some(effect) = Effect::from_index(index) {
            self.current = effect;
        }
        self.since = now;
    }
}

/// Per-frame values shared by every pixel.
struct FrameParams {
    ms: f32,
    orbits: [(f32, f32); 4],
    julia_c: (f64, f64),
    julia_scale: f64,
    julia_swirl: f64,
    julia_cycle: f32,
    julia_sat: f32,
    mandel_scale: f64,
    mandel_cycle: f32,
}

impl FrameParams {
    fn new(time_ms: u64) -> Self {
        let ms = time_ms as f32;
        let t = ms * 0.00035;
        let jt = time_ms as f64 * 0.00004;
        // The zoom restarts periodically so the f64 plane keeps its precision.
        let mt = (time_ms % 1_000_000) as f64 * 0.00004;
        Self {
            ms,
            orbits: [
                (20.0 * t.sin(), 20.0 * t.cos()),
                (20.0 * (t * 1.1).cos(), 20.0 * (t * 1.2).sin()),
                (20.0 * (t * 1.3).sin(), 20.0 * (t * 1.4).cos()),
                (20.0 * (t * 1.5).cos(), 20.0 * (t * 1.6).sin()),
            ],
            julia_c: (
                -0.70176 + 0.25 * (jt * 1.1).cos(),
                -0.3842 + 0.25 * (jt * 0.9).sin(),
            ),
            julia_scale: 1.5 / 1.008f64.powf(jt * 60.0),
            julia_swirl: 0.10 * jt,
            julia_cycle: fract01(ms * 0.00011),
            julia_sat: 0.85 + 0.15 * (ms * 0.0002).cos(),
            mandel_scale: 1.8 / 1.008f64.powf(mt * 60.0),
            mandel_cycle: fract01(ms * 0.00007),
        }
    }
}

/// Shade a `w × h` RGBA frame (alpha 255) of `effect` at `time_ms`.
pub fn render(effect: Effect, w: usize, h: usize, time_ms: u64, rgba: &mut Vec<u8>) {
    rgba.clear();
    if w == 0 || h == 0 {
        return;
    }
    rgba.resize(w * h * 4, 255);

    let p = FrameParams::new(time_ms);
    let (wf, hf) = (w as f32, h as f32);
    for (y, row) in rgba.chunks_exact_mut(w * 4).enumerate() {
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let [r, g, b] = shade(effect, &p, x as f32, y as f32, wf, hf);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
}

fn shade(effect: Effect, p: &FrameParams, x: f32, y: f32, w: f32, h: f32) -> [u8; 3] {
    let ms = p.ms;
    let dx = x - w / 2.0;
    let dy = y - h / 2.0;
    let dist = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);
    let wave = |v: f32, t: f32| 0.5 + 0.5 * (v + t).sin();
    // Distance from the pixel to a point offset by (ox, oy) from center.
    let off = |ox: f32, oy: f32| ((dx + ox) * (dx + ox) + (dy + oy) * (dy + oy)).sqrt();

    let hue = match effect {
        Effect::Plasma => {
            let t = ms * 0.0003;
            let (fx, fy) = (x / w, y / h);
            let v = (fx * 10.0 + t).sin()
                + ((fy * 10.0 + t) * 1.3).sin()
                + ((fx + fy + t) * 7.0).sin();
            wave(v, t)
        }
        Effect::Swirl => {
            let t = ms * 0.0007;
            let a = angle + t + (dist * 0.07 + t).sin();
            wave(a, dist * 0.04)
        }
        Effect::Tunnel => {
            let t = ms * 0.0005;
            let v = (dist * 0.04 - t * 3.0 + angle * 4.0).sin();
            wave(v, t + dist * 0.01)
        }
        Effect::Rings => {
            let t = ms * 0.0004;
            let v = (dist * 0.07 + t * 2.0).sin();
            wave(v, t + dist * 0.02)
        }
        Effect::Checker => {
            let t = ms * 0.001;
            let cx = ((x / 32.0).floor() + t * 4.0) as i32;
            let cy = ((y / 32.0).floor() + t * 4.0) as i32;
            let hue = if (cx ^ cy) & 1 == 1 { 0.6 } else { 0.1 };
            return hsv_to_rgb(hue, 0.8, 1.0);
        }
        Effect::RaysWaves => {
            let t = ms * 0.0004;
            let v = angle
                + (dist * 0.10 + t).sin()
                + (x * 4.0 * PI / w).cos()
                + (y * 4.0 * PI / h).cos();
            wave(v, t)
        }
        Effect::RaysWaves2 => {
            let t = ms * 0.0005;
            let v = angle
                + (dist * 0.10 + t).sin() * 0.7
                + (x * 4.0 * PI / w).cos() * 0.5
                + (y * 4.0 * PI / h).cos() * 0.5;
            wave(v, t)
        }
        Effect::MultiRadial => {
            let t = ms * 0.00035;
            let v = p
                .orbits
                .iter()
                .zip([0.04f32, 0.08, 0.16, 0.32])
                .map(|(&(ox, oy), k)| (off(ox, oy) * k).sin())
                .sum::<f32>();
            wave(v, t)
        }
        Effect::Peacock => {
            let t = ms * 0.0004;
            let v = angle + (off(20.0, 0.0) * 0.10).sin() + angle + (off(-20.0, 0.0) * 0.10).sin();
            wave(v, t)
        }
        Effect::RingsSimple => fract01(dist * 0.04 + ms * 0.0006),
        Effect::WaveSpiral => {
            let t = ms * 0.00045;
            let v = (x * PI / w).cos() + (y * PI / h).cos() + angle + (dist + t).sin();
            wave(v, t)
        }
        Effect::PeacockThree => wave(three_centers(off, 0.04), ms * 0.0005),
        Effect::PeacockThreeAngle => wave(angle + three_centers(off, 0.08), ms * 0.00045),
        Effect::PeacockThreeVariant => wave(three_centers(off, 0.12), ms * 0.0005),
        Effect::FiveArmStar => {
            let t = ms * 0.0004;
            let v = dist + (5.0 * angle + t).sin();
            wave(v * 0.15, t)
        }
        Effect::Wave => {
            let v = (x * 4.0 * PI / w).cos() * 0.25 + (y * 4.0 * PI / h).cos() * 0.25;
            wave(v, ms * 0.0004)
        }
        Effect::Wave2 => {
            let v = (x * 2.0 * PI / w).cos() * 0.125 + (y * 2.0 * PI / h).cos() * 0.125;
            wave(v, ms * 0.0005)
        }
        Effect::ConcentricRings => fract01(dist * 0.04 + ms * 0.0003),
        Effect::RaysSimple => fract01(angle / (2.0 * PI) + ms * 0.0004),
        Effect::SpiralSharp => {
            let t = ms * 0.0003;
            let teeth = if (dist * 0.15 + t).sin() > 0.0 { 1.0 } else { -1.0 };
            fract01(angle / (2.0 * PI) + 0.5 * teeth + t)
        }
        Effect::RingsSine => wave(dist * 0.16, ms * 0.0005),
        Effect::RingsSineSlide => wave(dist * 0.16 + dist * 0.04, ms * 0.0005),
        Effect::NestedTrig => {
            let fall = 20.0 + dist;
            let v = (2.0 * x * PI / w).cos().sin() / fall + (2.0 * y * PI / h).cos().sin() / fall;
            wave(v * 2.0, ms * 0.0004)
        }
        Effect::Wave3 => wave(cos_grid(x, y, w, h, 7.0, dist) * 2.0, ms * 0.00045),
        Effect::Wave4 => wave(cos_grid(x, y, w, h, 17.0, dist) * 2.0, ms * 0.00045),
        Effect::Mandelbrot => return mandelbrot(p, dx, dy, w, h),
        Effect::Julia => return julia(p, dx, dy, w, h),
    };
    hsv_to_rgb(hue, 1.0, 1.0)
}

fn three_centers(off: impl Fn(f32, f32) -> f32, k: f32) -> f32 {
    (off(0.0, -20.0) * k).sin() + (off(20.0, 20.0) * k).sin() + (off(-20.0, 20.0) * k).sin()
}

fn cos_grid(x: f32, y: f32, w: f32, h: f32, freq: f32, dist: f32) -> f32 {
    let fall = 20.0 + dist;
    (freq * x * PI / w).cos() / fall + (freq * y * PI / h).cos() / fall
}

fn julia(p: &FrameParams, dx: f32, dy: f32, w: f32, h: f32) -> [u8; 3] {
    let sx = dx as f64 * p.julia_scale / (w as f64 / 2.0);
    let sy = dy as f64 * p.julia_scale / (h as f64 / 2.0);
    let (s, c) = p.julia_swirl.sin_cos();
    let z = (c * sx - s * sy, s * sx + c * sy);
    let (iter, mu) = escape(z, p.julia_c, JULIA_MAX_ITER);
    let hue = fract01(0.4 + 0.5 * mu + p.julia_cycle);
    let val = if iter < JULIA_MAX_ITER { 1.0 } else { 0.15 };
    hsv_to_rgb(hue, p.julia_sat, val)
}

fn mandelbrot(p: &FrameParams, dx: f32, dy: f32, w: f32, h: f32) -> [u8; 3] {
    // Seahorse valley.
    const TARGET: (f64, f64) = (-0.743_643_887, 0.131_825_904);
    let half = (w.min(h) as f64 / 2.0).max(1.0);
    let c = (
        TARGET.0 + dx as f64 * p.mandel_scale / half,
        TARGET.1 + dy as f64 * p.mandel_scale / half,
    );
    let (iter, mu) = escape((0.0, 0.0), c, MANDELBROT_MAX_ITER);
    if iter >= MANDELBROT_MAX_ITER {
        return [0, 0, 0];
    }
    hsv_to_rgb(fract01(0.6 + 2.0 * mu + p.mandel_cycle), 0.9, 1.0)
}

/// Iterate `z² + c` from `z`. Returns the iteration count and the smoothed
/// count normalized by `max_iter`.
fn escape(mut z: (f64, f64), c: (f64, f64), max_iter: u32) -> (u32, f32) {
    let mut iter = 0;
    while z.0 * z.0 + z.1 * z.1 < 4.0 && iter < max_iter {
        z = (z.0 * z.0 - z.1 * z.1 + c.0, 2.0 * z.0 * z.1 + c.1);
        iter += 1;
    }
    let mu = if iter < max_iter {
        iter as f64 - (z.0 * z.0 + z.1 * z.1).log2().log2()
    } else {
        iter as f64
    };
    (iter, (mu / max_iter as f64) as f32)
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = fract01(h) * 6.0;
    let i = h.floor() as i32;
    let f = h - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i.rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

fn fract01(x: f32) -> f32 {
    let f = x - x.floor();
    if f < 0.0 { f + 1.0 } else { f }
}
