use crate::capability::probe_renderer;
use crate::config::Config;
use crate::input::poll_input;
use crate::logging;
use crate::render::{make_renderer, session_rgba, wrap_lines, Frame, Renderer};
use crate::terminal::TerminalGuard;
use crate::warp::{DisplayMode, FrameClock, Session, SessionStatus};
use anyhow::Context;
use std::io::BufWriter;
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    cfg.validate()?;
    logging::init(cfg.log_file.as_deref(), &cfg.log_filter)?;

    let caps = probe_renderer(cfg.renderer, cfg.auto_probe);
    for note in caps.notes() {
        if caps.changed() {
            tracing::warn!("{note}");
        } else {
            tracing::debug!("{note}");
        }
    }
    let mode = caps.renderer;
    let (px_w_mul, px_h_mul) = mode.cell_pixels();

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        anyhow::bail!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        );
    }

    let mut fullscreen = cfg.fullscreen;
    let grid = pixel_grid(
        last_size,
        hud_rows_for_size(last_size, !fullscreen),
        (px_w_mul, px_h_mul),
    );
    let mut session =
        Session::new(cfg.session_config(grid)).context("allocate pixel buffer")?;
    tracing::info!(
        renderer = ?mode,
        probe = %caps.status_label(),
        tick_ms = cfg.tick_ms,
        "starting"
    );

    let _term = TerminalGuard::new("Acid Warp")?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut renderer = make_renderer(mode);
    let mut clock = FrameClock::new(cfg.tick_interval(), Instant::now());
    let mut fps = FpsCounter::new();
    let mut show_help = false;
    let mut rgba = Vec::new();
    let mut last_render_ms = 0.0f32;

    loop {
        let input = poll_input()?;
        if input.quit {
            tracing::info!("quit requested");
            return Ok(());
        }
        if input.fullscreen_toggle {
            fullscreen = !fullscreen;
        }
        if input.help_toggle {
            show_help = !show_help;
        }
        if input.faster {
            clock.faster();
        }
        if input.slower {
            clock.slower();
        }

        // Resize events can be missed in some terminals.
        let sz = crossterm::terminal::size().context("get terminal size")?;
        if sz != last_size {
            tracing::debug!(cols = sz.0, rows = sz.1, "terminal resized");
            last_size = sz;
        }

        let tick_start = Instant::now();
        session.tick(tick_start, &input);
        let last_tick_ms = ms_since(tick_start);

        let (term_cols, term_rows) = last_size;
        let hud = if fullscreen {
            String::new()
        } else {
            build_wrapped_hud(
                term_cols as usize,
                &session.status(),
                &HudStats {
                    fps: fps.fps(),
                    tick: clock.interval(),
                    tick_ms: last_tick_ms,
                    render_ms: last_render_ms,
                    renderer: renderer.name(),
                    probe: caps.status_label(),
                },
            )
        };
        let hud_rows = hud_rows_for_text(term_rows, !fullscreen, &hud);
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let (w, h) = pixel_grid(last_size, hud_rows, (px_w_mul, px_h_mul));

        session_rgba(&session, w, h, &mut rgba);

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: &rgba,
            hud: &hud,
            hud_rows,
            overlay: show_help.then(help_popup_text),
            sync_updates: cfg.sync_updates,
        };

        let render_start = Instant::now();
        renderer.render(&frame, &mut out).context("render frame")?;
        last_render_ms = ms_since(render_start);

        fps.tick();
        clock.wait();
    }
}

fn ms_since(t: Instant) -> f32 {
    t.elapsed().as_secs_f32() * 1000.0
}

fn pixel_grid(size: (u16, u16), hud_rows: u16, (mul_w, mul_h): (usize, usize)) -> (usize, usize) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    (
        (cols as usize).max(1) * mul_w,
        visual_rows as usize * mul_h,
    )
}

fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    if !show_hud || size.1 <= 1 {
        return 0;
    }
    (size.1 - 1).min(2)
}

fn hud_rows_for_text(term_rows: u16, show_hud: bool, hud: &str) -> u16 {
    if !show_hud {
        return 0;
    }
    (hud.lines().count() as u16).min(term_rows.saturating_sub(1))
}

struct HudStats {
    fps: f32,
    tick: Duration,
    tick_ms: f32,
    render_ms: f32,
    renderer: &'static str,
    probe: String,
}

fn build_wrapped_hud(cols: usize, status: &SessionStatus, stats: &HudStats) -> String {
    let (shown, phase) = match (status.mode, status.formula) {
        (DisplayMode::Effects, _) => (
            format!("Effect {} {}", status.effect.index(), status.effect.name()),
            status.mode.label(),
        ),
        (DisplayMode::Palette, Some(f)) => {
            (format!("#{f} {}", status.formula_name), status.phase.label())
        }
        (DisplayMode::Palette, None) => (status.formula_name.to_string(), status.phase.label()),
    };
    let mut flags = Vec::new();
    if status.paused {
        flags.push("PAUSED");
    }
    if status.locked {
        flags.push("LOCKED");
    }

    let lines = [
        format!(
            "{} | {} | Palette: {} | Fade: {} | Tick: {}ms | FPS: {:>4.1}{}",
            shown,
            phase,
            status.palette_type.label(),
            status.fade_direction.label(),
            stats.tick.as_millis(),
            stats.fps,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" | {}", flags.join(" "))
            },
        ),
        format!(
            "ms(T/R): {:>4.1}/{:>4.1} | Renderer: {} ({}) | h help | q quit",
            stats.tick_ms, stats.render_ms, stats.renderer, stats.probe
        ),
    ];

    let mut out = Vec::new();
    for line in &lines {
        out.extend(wrap_lines(line, cols));
    }
    out.join("\n")
}

fn help_popup_text() -> &'static str {
    "Acid Warp Hotkeys\n\
n or →  next image or effect\n\
←  previous image or effect\n\
m  toggle palette patterns/RGB effects\n\
space or p  pause/resume\n\
l  lock current image\n\
c  new palette (while rotating)\n\
w  toggle fade-out to black/white\n\
+ / -  faster / slower ticks\n\
f  hide/show status line\n\
h or ? or F1  toggle this help\n\
q or esc  quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
