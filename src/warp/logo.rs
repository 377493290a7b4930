use super::image::IndexedImage;

pub const LOGO_TEXT: &str = "ACID WARP";

const BACKGROUND: u8 = 255;

/// Paint the intro title into `image`, scaled to about three quarters of its
/// width. Glyph pixels get a diagonal index ramp so the rolling palette
/// sweeps across the letters; the background is one solid index.
pub fn draw_logo(image: &mut IndexedImage) {
    image.pixels_mut().fill(BACKGROUND);

    let (w, h) = (image.width(), image.height());
    let text_w = text_cells(LOGO_TEXT);
    let scale = ((w * 3 / 4) / text_w).min(h / 2 / 5).max(1);
    let x0 = w.saturating_sub(text_w * scale) / 2;
    let y0 = h.saturating_sub(5 * scale) / 2;

    for (i, ch) in LOGO_TEXT.chars().enumerate() {
        let cx = x0 + i * 4 * scale;
        for (ry, bits) in glyph(ch).iter().enumerate() {
            for rx in 0..3usize {
                if bits & (1u8 << (2 - rx)) == 0 {
                    continue;
                }
                for oy in 0..scale {
                    for ox in 0..scale {
                        let x = cx + rx * scale + ox;
                        let y = y0 + ry * scale + oy;
                        if x < w && y < h {
                            image.set(x, y, 1 + ((x + y) % 254) as u8);
                        }
                    }
                }
            }
        }
    }
}

fn text_cells(text: &str) -> usize {
    (text.chars().count() * 4).saturating_sub(1).max(1)
}

fn glyph(ch: char) -> [u8; 5] {
    match ch {
        'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        _ => [0; 5],
    }
}
