use std::time::{Duration, Instant};

use acid_warp::input::InputEvents;
use acid_warp::warp::{
    DisplayMode, Effect, FadeDirection, PatternSequence, Phase, Session, SessionConfig,
};

fn config() -> SessionConfig {
    SessionConfig {
        width: 64,
        height: 40,
        logo_time: Duration::ZERO,
        image_time: Duration::from_secs(5),
        forced_formula: None,
        fade_direction: FadeDirection::Black,
        seed: Some(1234),
        mode: DisplayMode::Palette,
        effect_interval: Duration::from_secs(1),
    }
}

fn idle() -> InputEvents {
    InputEvents::none()
}

/// Tick on a 30 ms synthetic clock until `phase` is reached.
fn run_until(session: &mut Session, clock: &mut Instant, phase: Phase, max_ticks: usize) {
    for _ in 0..max_ticks {
        if session.phase() == phase {
            return;
        }
        *clock += Duration::from_millis(30);
        session.tick(*clock, &idle());
    }
    assert_eq!(session.phase(), phase, "phase not reached in {max_ticks} ticks");
}

#[test]
fn starts_on_the_logo() {
    let s = Session::new(SessionConfig::default()).unwrap();
    assert_eq!(s.phase(), Phase::LogoDisplay);
    assert_eq!(s.formula(), None);
    assert_eq!(s.status().formula_name, "Intro");
    assert!(s.image().pixels().iter().any(|&px| px != 255), "logo drawn");
}

#[test]
fn zero_size_buffer_is_rejected() {
    let cfg = SessionConfig {
        width: 0,
        ..config()
    };
    assert!(Session::new(cfg).is_err());
}

#[test]
fn zero_logo_time_leaves_logo_on_first_tick() {
    let mut s = Session::new(config()).unwrap();
    s.tick(Instant::now(), &idle());
    assert_eq!(s.phase(), Phase::LogoFade);
}

#[test]
fn logo_waits_for_its_deadline() {
    let mut s = Session::new(SessionConfig {
        logo_time: Duration::from_secs(2),
        ..config()
    })
    .unwrap();
    let t0 = Instant::now();
    s.tick(t0, &idle());
    s.tick(t0 + Duration::from_secs(1), &idle());
    assert_eq!(s.phase(), Phase::LogoDisplay);
    s.tick(t0 + Duration::from_secs(2), &idle());
    assert_eq!(s.phase(), Phase::LogoFade);
}

#[test]
fn skip_ends_the_logo_early() {
    let mut s = Session::new(SessionConfig {
        logo_time: Duration::from_secs(60),
        ..config()
    })
    .unwrap();
    let input = InputEvents {
        skip_next: true,
        ..InputEvents::none()
    };
    s.tick(Instant::now(), &input);
    assert_eq!(s.phase(), Phase::LogoFade);
}

#[test]
fn full_cycle_reaches_rotate_and_back() {
    let mut s = Session::new(config()).unwrap();
    let mut clock = Instant::now();

    run_until(&mut s, &mut clock, Phase::FadeIn, 200);
    let first = s.formula().expect("image generated");
    assert!((0..=40).contains(&first));
    assert!(s.image().pixels().iter().all(|&px| px != 0));

    run_until(&mut s, &mut clock, Phase::Rotate, 200);
    // 5 s at 30 ms per tick.
    run_until(&mut s, &mut clock, Phase::FadeOut, 200);
    run_until(&mut s, &mut clock, Phase::NewImage, 200);
    run_until(&mut s, &mut clock, Phase::FadeIn, 2);
}

#[test]
fn shuffled_sequence_shows_distinct_formulas() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::ZERO,
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    let mut seen = Vec::new();
    for _ in 0..5 {
        run_until(&mut s, &mut clock, Phase::FadeIn, 400);
        seen.push(s.formula().unwrap());
        run_until(&mut s, &mut clock, Phase::FadeOut, 400);
    }
    let mut dedup = seen.clone();
    dedup.sort_unstable();
    dedup.dedup();
    assert_eq!(dedup.len(), seen.len(), "repeat before exhaustion: {seen:?}");
}

#[test]
fn forced_formula_is_used_every_time() {
    let mut s = Session::new(SessionConfig {
        forced_formula: Some(12),
        image_time: Duration::ZERO,
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    for _ in 0..3 {
        run_until(&mut s, &mut clock, Phase::FadeIn, 400);
        assert_eq!(s.formula(), Some(12));
        assert_eq!(s.status().formula_name, "Simple Concentric Rings");
        run_until(&mut s, &mut clock, Phase::FadeOut, 400);
    }
}

#[test]
fn lock_holds_rotation_until_skip() {
    let mut s = Session::new(config()).unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::Rotate, 400);

    let lock = InputEvents {
        lock_toggle: true,
        ..InputEvents::none()
    };
    s.tick(clock, &lock);
    assert!(s.is_locked());

    clock += Duration::from_secs(60);
    for _ in 0..10 {
        clock += Duration::from_millis(30);
        s.tick(clock, &idle());
    }
    assert_eq!(s.phase(), Phase::Rotate);

    let skip = InputEvents {
        skip_next: true,
        ..InputEvents::none()
    };
    s.tick(clock, &skip);
    assert_eq!(s.phase(), Phase::FadeOut);
}

#[test]
fn pause_freezes_palette_and_phase() {
    let mut s = Session::new(config()).unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::Rotate, 400);

    let pause = InputEvents {
        pause_toggle: true,
        ..InputEvents::none()
    };
    s.tick(clock, &pause);
    assert!(s.is_paused());
    let frozen = s.palette().clone();

    clock += Duration::from_secs(60);
    for _ in 0..20 {
        clock += Duration::from_millis(30);
        s.tick(clock, &idle());
    }
    assert_eq!(s.phase(), Phase::Rotate);
    assert_eq!(s.palette(), &frozen);

    s.tick(clock, &pause);
    assert!(!s.is_paused());
}

#[test]
fn pause_drops_image_changes() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::from_secs(600),
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::Rotate, 400);

    let pause = InputEvents {
        pause_toggle: true,
        ..InputEvents::none()
    };
    s.tick(clock, &pause);
    let shown = s.formula();
    let image = s.image().clone();

    let skips = InputEvents {
        skip_next: true,
        skip_prev: true,
        new_palette: true,
        mode_toggle: true,
        ..InputEvents::none()
    };
    for _ in 0..5 {
        clock += Duration::from_millis(30);
        s.tick(clock, &skips);
    }
    assert_eq!(s.formula(), shown);
    assert_eq!(s.image(), &image);
    assert_eq!(s.mode(), DisplayMode::Palette);

    // Nothing was queued while paused.
    s.tick(clock, &pause);
    for _ in 0..5 {
        clock += Duration::from_millis(30);
        s.tick(clock, &idle());
    }
    assert_eq!(s.phase(), Phase::Rotate);
    assert_eq!(s.formula(), shown);
}

#[test]
fn lock_and_fade_toggles_still_work_while_paused() {
    let mut s = Session::new(config()).unwrap();
    let pause = InputEvents {
        pause_toggle: true,
        ..InputEvents::none()
    };
    s.tick(Instant::now(), &pause);
    let toggles = InputEvents {
        lock_toggle: true,
        fade_dir_toggle: true,
        ..InputEvents::none()
    };
    s.tick(Instant::now(), &toggles);
    assert!(s.is_paused());
    assert!(s.is_locked());
    assert_eq!(s.fade_direction(), FadeDirection::White);
}

#[test]
fn skip_prev_redraws_during_rotation() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::from_secs(600),
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::Rotate, 400);
    let shown = s.formula();

    let back = InputEvents {
        skip_prev: true,
        ..InputEvents::none()
    };
    s.tick(clock, &back);
    assert_eq!(s.phase(), Phase::Rotate);
    assert_ne!(s.formula(), shown);
}

#[test]
fn skip_prev_is_ignored_on_the_logo() {
    let mut s = Session::new(SessionConfig {
        logo_time: Duration::from_secs(60),
        ..config()
    })
    .unwrap();
    let back = InputEvents {
        skip_prev: true,
        ..InputEvents::none()
    };
    s.tick(Instant::now(), &back);
    assert_eq!(s.phase(), Phase::LogoDisplay);
    assert_eq!(s.formula(), None);
}

#[test]
fn skip_prev_on_a_fresh_order_keeps_the_first_pick() {
    let mut a = Session::new(config()).unwrap();
    let mut b = Session::new(config()).unwrap();
    let mut ca = Instant::now();
    let mut cb = ca;
    run_until(&mut a, &mut ca, Phase::NewImage, 200);
    run_until(&mut b, &mut cb, Phase::NewImage, 200);

    let back = InputEvents {
        skip_prev: true,
        ..InputEvents::none()
    };
    a.tick(ca, &back);
    b.tick(cb, &idle());
    assert_eq!(a.phase(), Phase::FadeIn);
    assert_eq!(a.formula(), b.formula());
    assert_eq!(a.image(), b.image());
}

#[test]
fn step_back_waits_for_the_first_advance() {
    let mut rng = fastrand::Rng::with_seed(8);
    let mut seq = PatternSequence::new(40, &mut rng);
    assert_eq!(seq.step_back(), None);
    assert_eq!(seq.current(), None);

    let first = seq.advance(&mut rng);
    assert_eq!(seq.current(), Some(first));
    let last = seq.order()[39];
    assert_eq!(seq.step_back(), Some(last), "wraps to the end of the order");
    assert_eq!(seq.current(), Some(last));
}

#[test]
fn new_palette_only_applies_while_rotating() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::from_secs(600),
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    let swap = InputEvents {
        new_palette: true,
        ..InputEvents::none()
    };

    // Ignored on the logo: only the roll touches the palette.
    let mut logo = Session::new(SessionConfig {
        logo_time: Duration::from_secs(60),
        ..config()
    })
    .unwrap();
    let before = logo.status().palette_type;
    logo.tick(clock, &swap);
    assert_eq!(logo.status().palette_type, before);

    run_until(&mut s, &mut clock, Phase::Rotate, 400);
    let mut kinds = vec![s.status().palette_type];
    for _ in 0..20 {
        clock += Duration::from_millis(30);
        s.tick(clock, &swap);
        kinds.push(s.status().palette_type);
    }
    kinds.dedup();
    assert!(kinds.len() > 1, "palette type never changed");
    assert_eq!(s.phase(), Phase::Rotate);
}

#[test]
fn fade_direction_toggle_goes_to_white() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::ZERO,
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    let toggle = InputEvents {
        fade_dir_toggle: true,
        ..InputEvents::none()
    };
    s.tick(clock, &toggle);
    assert_eq!(s.fade_direction(), FadeDirection::White);

    run_until(&mut s, &mut clock, Phase::FadeOut, 400);
    for _ in 0..120 {
        clock += Duration::from_millis(30);
        s.tick(clock, &idle());
        if s.phase() != Phase::FadeOut {
            break;
        }
    }
    assert_ne!(s.phase(), Phase::FadeOut);
    assert_eq!(s.status().fade_direction, FadeDirection::White);
}

#[test]
fn seeded_sessions_replay_identically() {
    let mut a = Session::new(config()).unwrap();
    let mut b = Session::new(config()).unwrap();
    let t0 = Instant::now();
    for i in 0..300u64 {
        let now = t0 + Duration::from_millis(30 * i);
        a.tick(now, &idle());
        b.tick(now, &idle());
    }
    assert_eq!(a.phase(), b.phase());
    assert_eq!(a.formula(), b.formula());
    assert_eq!(a.palette(), b.palette());
    assert_eq!(a.image(), b.image());
}

#[test]
fn logs_through_a_test_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("acid_warp=debug")
        .try_init();
    let mut s = Session::new(config()).unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::FadeIn, 200);
}

// ── RGB effects ─────────────────────────────────────────────────────────────

fn press_mode() -> InputEvents {
    InputEvents {
        mode_toggle: true,
        ..InputEvents::none()
    }
}

#[test]
fn mode_toggle_switches_to_effects_and_freezes_the_palette_cycle() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::from_secs(600),
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::Rotate, 400);
    let palette = s.palette().clone();

    s.tick(clock, &press_mode());
    assert_eq!(s.mode(), DisplayMode::Effects);
    assert_eq!(s.status().mode, DisplayMode::Effects);
    assert_eq!(s.status().effect, Effect::Plasma);

    for _ in 0..10 {
        clock += Duration::from_millis(30);
        s.tick(clock, &idle());
    }
    assert_eq!(s.palette(), &palette, "palette rolls only in palette mode");
    assert_eq!(s.effect_time_ms(), 300);
}

#[test]
fn skips_step_through_effects_with_wrap() {
    let mut s = Session::new(SessionConfig {
        mode: DisplayMode::Effects,
        ..config()
    })
    .unwrap();
    let now = Instant::now();
    let next = InputEvents {
        skip_next: true,
        ..InputEvents::none()
    };
    let back = InputEvents {
        skip_prev: true,
        ..InputEvents::none()
    };
    s.tick(now, &next);
    assert_eq!(s.effect(), Effect::Swirl);
    s.tick(now, &back);
    s.tick(now, &back);
    assert_eq!(s.effect(), Effect::Julia);
    assert_eq!(s.phase(), Phase::LogoDisplay, "palette phases untouched");
}

#[test]
fn effects_auto_cycle_after_the_dwell_time() {
    let mut s = Session::new(SessionConfig {
        mode: DisplayMode::Effects,
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    s.tick(clock, &idle());
    // Exactly the dwell time is not enough.
    clock += Duration::from_secs(1);
    s.tick(clock, &idle());
    assert_eq!(s.effect(), Effect::Plasma);

    clock += Duration::from_millis(30);
    s.tick(clock, &idle());
    assert_ne!(s.effect(), Effect::Plasma);
}

#[test]
fn lock_and_pause_hold_the_effect() {
    let mut s = Session::new(SessionConfig {
        mode: DisplayMode::Effects,
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    let lock = InputEvents {
        lock_toggle: true,
        ..InputEvents::none()
    };
    s.tick(clock, &lock);
    for _ in 0..100 {
        clock += Duration::from_millis(30);
        s.tick(clock, &idle());
    }
    assert_eq!(s.effect(), Effect::Plasma);

    let pause = InputEvents {
        pause_toggle: true,
        ..InputEvents::none()
    };
    s.tick(clock, &pause);
    let frozen = s.effect_time_ms();
    clock += Duration::from_secs(30);
    s.tick(clock, &idle());
    assert_eq!(s.effect_time_ms(), frozen);
}

#[test]
fn leaving_effects_moves_on_to_a_new_image() {
    let mut s = Session::new(SessionConfig {
        image_time: Duration::from_secs(600),
        ..config()
    })
    .unwrap();
    let mut clock = Instant::now();
    run_until(&mut s, &mut clock, Phase::Rotate, 400);

    s.tick(clock, &press_mode());
    clock += Duration::from_millis(30);
    s.tick(clock, &press_mode());
    assert_eq!(s.mode(), DisplayMode::Palette);
    assert_eq!(s.phase(), Phase::FadeOut);
}
