use std::time::Duration;

use acid_warp::warp::effects::render;
use acid_warp::warp::{Effect, EffectCycle};

fn frame(effect: Effect, w: usize, h: usize, time_ms: u64) -> Vec<u8> {
    let mut rgba = Vec::new();
    render(effect, w, h, time_ms, &mut rgba);
    rgba
}

// ── Table ───────────────────────────────────────────────────────────────────

#[test]
fn table_has_unique_names_in_index_order() {
    assert_eq!(Effect::ALL.len(), Effect::COUNT);
    let mut names: Vec<&str> = Effect::ALL.iter().map(|e| e.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Effect::COUNT);

    for (i, e) in Effect::ALL.iter().enumerate() {
        assert_eq!(e.index(), i);
        assert_eq!(Effect::from_index(i), Some(*e));
    }
    assert_eq!(Effect::from_index(Effect::COUNT), None);
    assert_eq!(Effect::Mandelbrot.index(), 25);
    assert_eq!(Effect::Julia.index(), 26);
}

// ── Output ──────────────────────────────────────────────────────────────────

#[test]
fn every_effect_fills_an_opaque_frame() {
    for e in Effect::ALL {
        let rgba = frame(e, 64, 40, 12_345);
        assert_eq!(rgba.len(), 64 * 40 * 4, "{}", e.name());
        assert!(rgba.chunks_exact(4).all(|px| px[3] == 255), "{}", e.name());
        let first = &rgba[..3];
        assert!(
            rgba.chunks_exact(4).any(|px| &px[..3] != first),
            "{} produced a flat frame",
            e.name()
        );
    }
}

#[test]
fn same_time_gives_the_same_frame() {
    for e in Effect::ALL {
        assert_eq!(frame(e, 48, 30, 9_000), frame(e, 48, 30, 9_000), "{}", e.name());
    }
}

#[test]
fn plasma_moves_with_time() {
    assert_ne!(frame(Effect::Plasma, 48, 30, 0), frame(Effect::Plasma, 48, 30, 2_000));
}

#[test]
fn empty_grid_clears_output() {
    let mut rgba = vec![1, 2, 3];
    render(Effect::Tunnel, 0, 10, 0, &mut rgba);
    assert!(rgba.is_empty());
}

// ── Cycling ─────────────────────────────────────────────────────────────────

#[test]
fn manual_steps_wrap_both_ways() {
    let mut cycle = EffectCycle::new(Effect::Julia, Duration::from_secs(8));
    cycle.next(Duration::ZERO);
    assert_eq!(cycle.current(), Effect::Plasma);
    cycle.prev(Duration::ZERO);
    assert_eq!(cycle.current(), Effect::Julia);
}

#[test]
fn auto_advance_always_picks_another_effect() {
    let mut rng = fastrand::Rng::with_seed(4);
    let interval = Duration::from_secs(8);
    let mut cycle = EffectCycle::new(Effect::Plasma, interval);
    let mut now = Duration::ZERO;

    assert!(!cycle.auto_advance(interval, &mut rng), "dwell must strictly pass");
    for _ in 0..200 {
        let before = cycle.current();
        now += interval + Duration::from_millis(1);
        assert!(cycle.auto_advance(now, &mut rng));
        assert_ne!(cycle.current(), before);
    }
}

#[test]
fn manual_step_restarts_the_dwell_timer() {
    let mut rng = fastrand::Rng::with_seed(4);
    let mut cycle = EffectCycle::new(Effect::Plasma, Duration::from_secs(8));
    cycle.next(Duration::from_secs(7));
    assert!(!cycle.auto_advance(Duration::from_secs(10), &mut rng));
    assert_eq!(cycle.current(), Effect::Swirl);
}
