use std::time::{Duration, Instant};

use acid_warp::warp::{generate, lut, Formula, IndexedImage, Palette, PaletteType, RollState, COLOR_MAX};
use anyhow::Result;

struct Args {
    w: usize,
    h: usize,
    reps: usize,
    rotate_frames: usize,
    seed: u64,
    ci_smoke: bool,
    quick: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        w: 320,
        h: 200,
        reps: 8,
        rotate_frames: 2000,
        seed: 0xAC1D,
        ci_smoke: false,
        quick: false,
        max_ms: 50.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--width", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--height", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--reps", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.reps = n.max(1);
                }
                i += 2;
            }
            ("--rotate-frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.rotate_frames = n.max(1);
                }
                i += 2;
            }
            ("--seed", Some(x)) => {
                if let Ok(n) = x.parse::<u64>() {
                    args.seed = n;
                }
                i += 2;
            }
            ("--ci-smoke", Some(x)) if !x.starts_with("--") => {
                args.ci_smoke = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--quick", Some(x)) if !x.starts_with("--") => {
                args.quick = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--quick", _) => {
                args.quick = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if args.quick {
        args.reps = args.reps.min(2);
        args.rotate_frames = args.rotate_frames.min(256);
    }

    args
}

fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bench_formulas(args: &Args) -> Result<()> {
    let mut image = IndexedImage::new(args.w, args.h)?;
    let center = image.center();
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let mut total_time = Duration::ZERO;
    let mut total_runs = 0usize;
    let mut zero_formulas = Vec::<String>::new();
    let mut slow_formulas = Vec::<(String, f64)>::new();

    lut::warm_up();
    println!(
        "Formula benchmark: formulas={} reps/formula={} size={}x{} quick={}",
        Formula::ALL.len(),
        args.reps,
        args.w,
        args.h,
        args.quick
    );

    for f in Formula::ALL {
        let start = Instant::now();
        let mut distinct = [false; 256];
        for _ in 0..args.reps {
            generate(f.index() as i64, &mut image, center, COLOR_MAX, &mut rng);
        }
        let elapsed = start.elapsed();
        for &px in image.pixels() {
            distinct[px as usize] = true;
        }
        let used = distinct.iter().filter(|&&b| b).count();

        total_time += elapsed;
        total_runs += args.reps;
        let ms = elapsed.as_secs_f64() * 1000.0 / args.reps as f64;
        println!(
            "{:>2}. {:<34} {:>8.3} ms/image  colors={:>3}",
            f.index(),
            f.name(),
            ms,
            used
        );
        if distinct[0] {
            zero_formulas.push(f.name().to_string());
        }
        if args.ci_smoke && ms > args.max_ms {
            slow_formulas.push((f.name().to_string(), ms));
        }
    }

    let avg_ms = total_time.as_secs_f64() * 1000.0 / total_runs.max(1) as f64;
    println!("Formula summary: {:>8.3} ms/image avg", avg_ms);

    if args.ci_smoke {
        if !zero_formulas.is_empty() || !slow_formulas.is_empty() {
            eprintln!("CI smoke: FAIL");
            if !zero_formulas.is_empty() {
                eprintln!("  formulas writing index 0: {}", zero_formulas.join(", "));
            }
            for (name, ms) in slow_formulas {
                eprintln!("  slow formula: {} ({:.3} ms/image > {:.3})", name, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}

fn bench_rotation(args: &Args) {
    let mut rng = fastrand::Rng::with_seed(args.seed);
    let mut palette = Palette::new(PaletteType::RgbwLightning);
    let mut roll = RollState::default();

    let start = Instant::now();
    for _ in 0..args.rotate_frames {
        roll.step(&mut palette, &mut rng);
    }
    let us = start.elapsed().as_secs_f64() * 1e6 / args.rotate_frames as f64;
    println!(
        "Palette rotation: {:>8.3} us/step  steps={}  final entry 1={:?}",
        us,
        args.rotate_frames,
        palette.entry(1)
    );
}

fn main() -> Result<()> {
    let args = parse_args();
    bench_formulas(&args)?;
    bench_rotation(&args);
    Ok(())
}
