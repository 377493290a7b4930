use std::f64::consts::TAU;
use std::sync::LazyLock;

/// Angle steps per full turn.
pub const ANGLE_UNIT: i64 = 256;
/// Amplitude of the integer sine table.
pub const TRIG_UNIT: i64 = 8192;

/// Offsets with `|dx|` or `|dy|` at or beyond this are computed directly.
const SPAN: usize = 1024;

struct Tables {
    sin: [i64; ANGLE_UNIT as usize],
    // First quadrant only, indexed by `ady * SPAN + adx`.
    dist: Vec<u16>,
    quad_angle: Vec<u8>,
}

static TABLES: LazyLock<Tables> = LazyLock::new(Tables::build);

impl Tables {
    fn build() -> Self {
        let mut sin = [0i64; ANGLE_UNIT as usize];
        for (a, v) in sin.iter_mut().enumerate() {
            *v = exact_sin(a as i64);
        }

        let mut dist = vec![0u16; SPAN * SPAN];
        let mut quad_angle = vec![0u8; SPAN * SPAN];
        for ady in 0..SPAN {
            for adx in 0..SPAN {
                let i = ady * SPAN + adx;
                dist[i] = exact_dist(adx as i64, ady as i64) as u16;
                quad_angle[i] = exact_quad_angle(adx as i64, ady as i64) as u8;
            }
        }

        Self {
            sin,
            dist,
            quad_angle,
        }
    }
}

fn exact_sin(a: i64) -> i64 {
    let turn = a.rem_euclid(ANGLE_UNIT) as f64 / ANGLE_UNIT as f64;
    ((turn * TAU).sin() * TRIG_UNIT as f64).round() as i64
}

fn exact_dist(adx: i64, ady: i64) -> i64 {
    ((adx * adx + ady * ady) as f64).sqrt().floor() as i64
}

// Angle of a first-quadrant offset, in [0, ANGLE_UNIT / 4].
fn exact_quad_angle(adx: i64, ady: i64) -> i64 {
    let a = (ady as f64).atan2(adx as f64);
    (a / TAU * ANGLE_UNIT as f64).round() as i64
}

/// Make sure the tables are built before the first frame is timed.
pub fn warm_up() {
    LazyLock::force(&TABLES);
}

#[inline]
pub fn lut_sin(a: i64) -> i64 {
    TABLES.sin[a.rem_euclid(ANGLE_UNIT) as usize]
}

#[inline]
pub fn lut_cos(a: i64) -> i64 {
    lut_sin(a + ANGLE_UNIT / 4)
}

#[inline]
pub fn lut_dist(dx: i64, dy: i64) -> i64 {
    let (adx, ady) = (dx.unsigned_abs() as usize, dy.unsigned_abs() as usize);
    if adx < SPAN && ady < SPAN {
        TABLES.dist[ady * SPAN + adx] as i64
    } else {
        exact_dist(adx as i64, ady as i64)
    }
}

/// Quantized `atan2(dy, dx)` in `[0, ANGLE_UNIT)`.
#[inline]
pub fn lut_angle(dx: i64, dy: i64) -> i64 {
    let (adx, ady) = (dx.unsigned_abs() as usize, dy.unsigned_abs() as usize);
    let q = if adx < SPAN && ady < SPAN {
        TABLES.quad_angle[ady * SPAN + adx] as i64
    } else {
        exact_quad_angle(adx as i64, ady as i64)
    };
    let half = ANGLE_UNIT / 2;
    let a = match (dx < 0, dy < 0) {
        (false, false) => q,
        (true, false) => half - q,
        (true, true) => half + q,
        (false, true) => ANGLE_UNIT - q,
    };
    a.rem_euclid(ANGLE_UNIT)
}
