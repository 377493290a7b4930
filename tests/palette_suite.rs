use acid_warp::warp::palette::{fade_solid_and_roll, fade_to_target_and_roll, PALETTE_BYTES};
use acid_warp::warp::{FadeStatus, Palette, PaletteType, RollState, SolidFade};
use proptest::prelude::*;

fn palette_from(v: &[u8]) -> Palette {
    let mut bytes = [0u8; PALETTE_BYTES];
    bytes.copy_from_slice(v);
    Palette::from_bytes(bytes)
}

fn palette_strategy() -> impl Strategy<Value = Palette> {
    proptest::collection::vec(0u8..=63, PALETTE_BYTES).prop_map(|v| palette_from(&v))
}

// ── Initialization ──────────────────────────────────────────────────────────

#[test]
fn every_type_stays_within_six_bits() {
    for kind in PaletteType::all() {
        let p = Palette::new(kind);
        assert!(
            p.bytes().iter().all(|&b| b <= 63),
            "{} has a channel above 63",
            kind.label()
        );
    }
}

#[test]
fn rgbw_bands_ramp_up_then_down() {
    let p = Palette::new(PaletteType::Rgbw);
    assert_eq!(p.entry(0), [0, 0, 0]);
    assert_eq!(p.entry(31), [62, 0, 0]);
    assert_eq!(p.entry(32), [62, 0, 0]);
    assert_eq!(p.entry(63), [0, 0, 0]);
    assert_eq!(p.entry(64 + 10), [0, 20, 0]);
    assert_eq!(p.entry(128 + 10), [0, 0, 20]);
    assert_eq!(p.entry(192 + 10), [20, 20, 20]);
}

#[test]
fn white_ramp_peaks_mid_palette() {
    let p = Palette::new(PaletteType::White);
    assert_eq!(p.entry(0), [0, 0, 0]);
    assert_eq!(p.entry(127), [63, 63, 63]);
    assert_eq!(p.entry(128), [63, 63, 63]);
    assert_eq!(p.entry(255), [0, 0, 0]);
}

#[test]
fn half_white_leaves_upper_half_black() {
    let p = Palette::new(PaletteType::HalfWhite);
    assert_eq!(p.entry(63), [63, 63, 63]);
    assert_eq!(p.entry(64), [63, 63, 63]);
    for i in 128..=255u8 {
        assert_eq!(p.entry(i), [0, 0, 0]);
    }
}

#[test]
fn pastel_never_drops_below_31() {
    let p = Palette::new(PaletteType::Pastel);
    assert!(p.bytes().iter().all(|&b| (31..=62).contains(&b)));
}

#[test]
fn rgbw_lightning_ends_up_as_white_lightning() {
    assert_eq!(
        Palette::new(PaletteType::RgbwLightning),
        Palette::new(PaletteType::WhiteLightning)
    );
}

#[test]
fn sparkles_hit_every_fourth_entry_from_one() {
    let plain = Palette::new(PaletteType::HalfWhite);
    let lit = Palette::new(PaletteType::HalfWhiteLightning);
    assert_eq!(lit.entry(1), [10, 10, 10]);
    assert_eq!(lit.entry(2), plain.entry(2));
    assert_eq!(lit.entry(5), [14, 14, 14]);
    assert_eq!(lit.entry(200), [0, 0, 0]);
    assert_eq!(lit.entry(201), [9, 9, 9]);
    assert_eq!(lit.entry(62), plain.entry(62));
    // Clamped at the top.
    assert_eq!(lit.entry(61), [63, 63, 63]);
}

#[test]
fn unknown_type_index_falls_back_to_white() {
    assert_eq!(PaletteType::from_index(-3), PaletteType::White);
    assert_eq!(PaletteType::from_index(8), PaletteType::White);
    assert_eq!(PaletteType::from_index(99), PaletteType::White);
    assert_eq!(PaletteType::from_index(3), PaletteType::Pastel);
}

#[test]
fn random_type_covers_the_catalog() {
    let mut rng = fastrand::Rng::with_seed(17);
    let mut seen = [false; PaletteType::COUNT];
    for _ in 0..2000 {
        seen[PaletteType::random(&mut rng) as usize] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn from_bytes_clamps_channels() {
    let p = Palette::from_bytes([200; PALETTE_BYTES]);
    assert!(p.bytes().iter().all(|&b| b == 63));
}

// ── Fades ───────────────────────────────────────────────────────────────────

#[test]
fn fade_to_equal_target_is_done_immediately() {
    let target = Palette::new(PaletteType::Pastel);
    let mut p = target.clone();
    assert_eq!(p.fade_to_target(&target), FadeStatus::Done);
    assert_eq!(p, target);
}

#[test]
fn fades_leave_entry_zero_alone() {
    let mut bytes = [0u8; PALETTE_BYTES];
    bytes[..3].copy_from_slice(&[30, 30, 30]);
    let mut p = Palette::from_bytes(bytes);
    for _ in 0..70 {
        p.fade_to_white();
    }
    assert_eq!(p.entry(0), [30, 30, 30]);
    assert_eq!(p.entry(1), [63, 63, 63]);
    for _ in 0..70 {
        p.fade_to_black();
    }
    assert_eq!(p.entry(0), [30, 30, 30]);
    assert_eq!(p.fade_to_black(), FadeStatus::Done);
}

#[test]
fn fade_solid_stops_once_complete() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut p = Palette::new(PaletteType::White);
    let mut roll = RollState::default();
    let mut complete = false;
    // Values parked at entry 0 skip a fade step, so allow a few extra ticks.
    for _ in 0..80 {
        fade_solid_and_roll(&mut p, SolidFade::Black, &mut roll, &mut complete, &mut rng);
    }
    assert!(complete);
    let frozen = p.clone();
    fade_solid_and_roll(&mut p, SolidFade::Black, &mut roll, &mut complete, &mut rng);
    assert_eq!(p, frozen);
}

#[test]
fn fade_to_target_rolls_both_palettes_in_step() {
    let mut rng = fastrand::Rng::with_seed(2);
    let mut main = Palette::new(PaletteType::White);
    let mut target = main.clone();
    let mut roll = RollState::default();
    let mut complete = false;

    fade_to_target_and_roll(&mut main, &mut target, &mut roll, &mut complete, &mut rng);
    assert!(complete);
    assert_eq!(main, target, "same rotation applied to both");

    let held = target.clone();
    fade_to_target_and_roll(&mut main, &mut target, &mut roll, &mut complete, &mut rng);
    assert_eq!(target, held, "target is frozen after completion");
    assert_ne!(main, held);
}

// ── Rotation ────────────────────────────────────────────────────────────────

#[test]
fn forward_rotation_pulls_from_the_next_entry() {
    let mut p = Palette::new(PaletteType::Rgbw);
    let before = p.clone();
    p.rotate_channel(0, true);
    assert_eq!(p.entry(0)[0], before.entry(1)[0]);
    assert_eq!(p.entry(255)[0], before.entry(0)[0]);
    assert_eq!(p.entry(10)[1], before.entry(10)[1], "green untouched");

    p.rotate_channel(0, false);
    assert_eq!(p, before);
}

#[test]
fn roll_state_flips_are_rare() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut roll = RollState::default();
    let mut flips = 0;
    for _ in 0..25_600 {
        let prev = roll;
        roll.maybe_flip(&mut rng);
        if roll != prev {
            flips += 1;
        }
    }
    // Expected about 300 (3 in 256).
    assert!((150..=450).contains(&flips), "flips={flips}");
}

proptest! {
    #[test]
    fn fade_to_target_converges_within_64_steps(
        mut p in palette_strategy(),
        target in palette_strategy(),
    ) {
        let mut status = FadeStatus::NotDone;
        for _ in 0..64 {
            status = p.fade_to_target(&target);
            if status == FadeStatus::Done {
                break;
            }
        }
        prop_assert_eq!(status, FadeStatus::Done);
        prop_assert_eq!(&p.bytes()[3..], &target.bytes()[3..]);
    }

    #[test]
    fn solid_fades_settle_within_63_calls(p in palette_strategy(), white in any::<bool>()) {
        let mut q = p.clone();
        let bound = if white { 63 } else { 0 };
        for _ in 0..63 {
            if white {
                q.fade_to_white();
            } else {
                q.fade_to_black();
            }
        }
        prop_assert!(q.bytes()[3..].iter().all(|&b| b == bound));
        prop_assert_eq!(&q.bytes()[..3], &p.bytes()[..3]);
        let next = if white { q.fade_to_white() } else { q.fade_to_black() };
        prop_assert_eq!(next, FadeStatus::Done);
    }

    #[test]
    fn fade_steps_keep_six_bit_range(mut p in palette_strategy(), white in any::<bool>()) {
        for _ in 0..10 {
            if white {
                p.fade_to_white();
            } else {
                p.fade_to_black();
            }
            prop_assert!(p.bytes().iter().all(|&b| b <= 63));
        }
    }

    #[test]
    fn full_rotation_is_identity(p in palette_strategy(), channel in 0usize..3, fwd in any::<bool>()) {
        let mut q = p.clone();
        for _ in 0..256 {
            q.rotate_channel(channel, fwd);
        }
        prop_assert_eq!(q, p);
    }

    #[test]
    fn rotation_permutes_channel_values(p in palette_strategy(), channel in 0usize..3) {
        let mut q = p.clone();
        q.rotate_channel(channel, true);
        let mut a: Vec<u8> = p.bytes().iter().skip(channel).step_by(3).copied().collect();
        let mut b: Vec<u8> = q.bytes().iter().skip(channel).step_by(3).copied().collect();
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }
}
