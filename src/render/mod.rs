mod ascii;
mod braille;
mod halfblock;
mod kitty;

pub use ascii::AsciiRenderer;
pub use braille::{braille_cell, BrailleRenderer};
pub use halfblock::HalfBlockRenderer;
pub use kitty::KittyRenderer;

use crate::config::RendererMode;
use crate::warp::{effects, DisplayMode, IndexedImage, Palette, Session};
use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

pub fn make_renderer(mode: RendererMode) -> Box<dyn Renderer> {
    match mode {
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Braille => Box::new(BrailleRenderer::new()),
        RendererMode::Kitty => Box::new(KittyRenderer::new()),
    }
}

/// 6-bit channel to 8-bit by replicating the top bits.
#[inline]
pub fn expand_channel(v: u8) -> u8 {
    let v = v & 0x3f;
    (v << 2) | (v >> 4)
}

pub fn palette_rgb(palette: &Palette) -> [[u8; 3]; 256] {
    let mut lut = [[0u8; 3]; 256];
    for (i, rgb) in lut.iter_mut().enumerate() {
        let [r, g, b] = palette.entry(i as u8);
        *rgb = [expand_channel(r), expand_channel(g), expand_channel(b)];
    }
    lut
}

/// Look every index up in `palette` and scale the result to `out_w × out_h`
/// (nearest neighbor) as RGBA.
pub fn rasterize(
    image: &IndexedImage,
    palette: &Palette,
    out_w: usize,
    out_h: usize,
    rgba: &mut Vec<u8>,
) {
    rgba.clear();
    if out_w == 0 || out_h == 0 {
        return;
    }
    rgba.resize(out_w * out_h * 4, 255);

    let lut = palette_rgb(palette);
    let (iw, ih) = (image.width(), image.height());
    let src_x: Vec<usize> = (0..out_w).map(|x| x * iw / out_w).collect();
    let pixels = image.pixels();

    for (y, row) in rgba.chunks_exact_mut(out_w * 4).enumerate() {
        let sy = y * ih / out_h;
        let src_row = &pixels[sy * iw..(sy + 1) * iw];
        for (px, &sx) in row.chunks_exact_mut(4).zip(&src_x) {
            let [r, g, b] = lut[src_row[sx] as usize];
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
}

/// Fill `rgba` with whatever `session` currently shows at `out_w × out_h`.
pub fn session_rgba(session: &Session, out_w: usize, out_h: usize, rgba: &mut Vec<u8>) {
    match session.mode() {
        DisplayMode::Palette => rasterize(session.image(), session.palette(), out_w, out_h, rgba),
        DisplayMode::Effects => {
            effects::render(session.effect(), out_w, out_h, session.effect_time_ms(), rgba)
        }
    }
}

/// Integer Rec.709 luma (0..255).
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u8
}

#[inline]
pub(crate) fn write_fg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> std::io::Result<()> {
    write!(out, "\x1b[38;2;{};{};{}m", r, g, b)
}

#[inline]
pub(crate) fn write_bg_rgb(out: &mut dyn Write, r: u8, g: u8, b: u8) -> std::io::Result<()> {
    write!(out, "\x1b[48;2;{};{};{}m", r, g, b)
}

/// Validate the frame against the cell geometry and open a text frame.
///
/// Returns `(cols, visual_rows, width, height)`, or `None` when there is
/// nothing to draw.
pub(crate) fn text_frame_begin(
    frame: &Frame<'_>,
    px_w_mul: usize,
    px_h_mul: usize,
    out: &mut dyn Write,
) -> anyhow::Result<Option<(usize, usize, usize, usize)>> {
    let cols = frame.term_cols as usize;
    let visual_rows = frame.visual_rows as usize;
    let w = frame.pixel_width;
    let h = frame.pixel_height;

    if cols == 0 || visual_rows == 0 || w == 0 || h == 0 {
        return Ok(None);
    }
    if w != cols * px_w_mul || h != visual_rows * px_h_mul {
        return Ok(None);
    }

    let need = w * h * 4;
    if frame.pixels_rgba.len() < need {
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        out.write_all(b"\x1b[H\x1b[0m\x1b[2J")?;
        write!(
            out,
            "pixel buffer too small (need {}, got {})",
            need,
            frame.pixels_rgba.len()
        )?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        return Ok(None);
    }

    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    // Home, reset, autowrap off while painting full-width rows.
    out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
    Ok(Some((cols, visual_rows, w, h)))
}

/// HUD, overlay, autowrap restore and flush.
pub(crate) fn text_frame_end(
    frame: &Frame<'_>,
    cols: usize,
    visual_rows: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    write_hud(frame, cols, visual_rows, out)?;

    if let Some(text) = frame.overlay {
        draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
    }

    out.write_all(b"\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn write_hud(
    frame: &Frame<'_>,
    cols: usize,
    visual_rows: usize,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let mut lines = frame.hud.lines();
    for i in 0..frame.hud_rows as usize {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
        if let Some(line) = lines.next() {
            let clipped: String = line.chars().take(cols).collect();
            out.write_all(clipped.as_bytes())?;
        }
    }
    Ok(())
}

pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }

    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(6).max(1);
    let lines = wrap_lines(text, max_inner_w);
    if lines.is_empty() {
        return Ok(());
    }

    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, max_inner_w);
    let box_w = (inner_w + 4).min(cols.saturating_sub(2)).max(4);
    let inner_w = box_w.saturating_sub(4);
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_h = (body_h + 2).min(rows.saturating_sub(1)).max(3);

    let start_col = cols.saturating_sub(box_w) / 2 + 1;
    let start_row = rows.saturating_sub(box_h) / 2 + 1;

    let horiz = "-".repeat(box_w.saturating_sub(2));
    let blank = " ".repeat(inner_w);

    out.write_all(b"\x1b[0m\x1b[38;2;236;242;255m\x1b[48;2;10;14;24m")?;
    write!(out, "\x1b[{};{}H+{}+", start_row, start_col, horiz)?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = start_row + 1 + i;
        write!(out, "\x1b[{};{}H| {} |", row, start_col, blank)?;
        if i == 0 {
            write!(
                out,
                "\x1b[{};{}H\x1b[1m\x1b[38;2;255;236;160m{}\x1b[22m\x1b[38;2;236;242;255m",
                row,
                start_col + 2,
                line
            )?;
        } else {
            write!(out, "\x1b[{};{}H{}", row, start_col + 2, line)?;
        }
    }
    write!(out, "\x1b[{};{}H+{}+", start_row + box_h - 1, start_col, horiz)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}

/// Hard-wrap each line of `text` at `width` characters.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    for raw in text.lines() {
        if raw.is_empty() {
            lines.push(String::new());
            continue;
        }
        let chars: Vec<char> = raw.chars().collect();
        for chunk in chars.chunks(width) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}
