use crate::render::{luma_u8, text_frame_begin, text_frame_end, write_bg_rgb, write_fg_rgb, Frame, Renderer};
use std::io::Write;

/// 2×4 pixels per cell. Dots above the cell's mid luma are lit in the mean
/// color of the lit pixels; the rest become the background.
pub struct BrailleRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl BrailleRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for BrailleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

const DOT_BITS: [u8; 8] = [0x01, 0x08, 0x02, 0x10, 0x04, 0x20, 0x40, 0x80];

#[derive(Default)]
struct Mean {
    r: u32,
    g: u32,
    b: u32,
    n: u32,
}

impl Mean {
    fn add(&mut self, (r, g, b): (u8, u8, u8)) {
        self.r += r as u32;
        self.g += g as u32;
        self.b += b as u32;
        self.n += 1;
    }

    fn get(&self) -> Option<(u8, u8, u8)> {
        (self.n > 0).then(|| {
            (
                (self.r / self.n) as u8,
                (self.g / self.n) as u8,
                (self.b / self.n) as u8,
            )
        })
    }
}

/// Braille glyph plus fg/bg for one 2×4 block.
pub fn braille_cell(rgb: &[(u8, u8, u8); 8]) -> (char, (u8, u8, u8), (u8, u8, u8)) {
    let lum = rgb.map(|(r, g, b)| luma_u8(r, g, b));
    let min_l = lum.iter().copied().min().unwrap_or(0) as u16;
    let max_l = lum.iter().copied().max().unwrap_or(0) as u16;
    let thr = ((min_l + max_l) / 2) as u8;

    let mut bits = 0u8;
    let mut on = Mean::default();
    let mut off = Mean::default();
    for i in 0..8 {
        if lum[i] > thr {
            bits |= DOT_BITS[i];
            on.add(rgb[i]);
        } else {
            off.add(rgb[i]);
        }
    }

    let bg = off.get().unwrap_or((0, 0, 0));
    if bits == 0 {
        return (' ', bg, bg);
    }
    let fg = on.get().unwrap_or(bg);
    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
    (ch, fg, off.get().unwrap_or(fg))
}

impl Renderer for BrailleRenderer {
    fn name(&self) -> &'static str {
        "braille"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let Some((cols, visual_rows, w, _h)) = text_frame_begin(frame, 2, 4, out)? else {
            return Ok(());
        };
        self.last_fg = None;
        self.last_bg = None;

        let px = frame.pixels_rgba;
        let mut buf = [0u8; 4];
        for row in 0..visual_rows {
            for col in 0..cols {
                let mut rgb = [(0u8, 0u8, 0u8); 8];
                for dy in 0..4usize {
                    for dx in 0..2usize {
                        let i = ((row * 4 + dy) * w + col * 2 + dx) * 4;
                        rgb[dy * 2 + dx] = (px[i], px[i + 1], px[i + 2]);
                    }
                }
                let (ch, fg, bg) = braille_cell(&rgb);

                if self.last_fg != Some(fg) {
                    write_fg_rgb(out, fg.0, fg.1, fg.2)?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write_bg_rgb(out, bg.0, bg.1, bg.2)?;
                    self.last_bg = Some(bg);
                }
                out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            }
            if row + 1 < visual_rows {
                out.write_all(b"\r\n")?;
            }
        }

        text_frame_end(frame, cols, visual_rows, out)
    }
}
