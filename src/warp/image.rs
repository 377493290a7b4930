/// Width × height grid of palette indices, row-major.
///
/// Generation never writes index 0, so a freshly generated image only holds
/// values in `1..=255`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl IndexedImage {
    pub fn new(width: usize, height: usize) -> anyhow::Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("pixel buffer must be at least 1x1 (got {width}x{height})");
        }
        let len = width
            .checked_mul(height)
            .ok_or_else(|| anyhow::anyhow!("pixel buffer {width}x{height} overflows"))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|e| anyhow::anyhow!("allocate {width}x{height} pixel buffer: {e}"))?;
        pixels.resize(len, 0);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.pixels[y * self.width + x] = v;
    }

    /// Center used by the formula bank (`width / 2`, `height / 2`).
    pub fn center(&self) -> (i64, i64) {
        ((self.width / 2) as i64, (self.height / 2) as i64)
    }
}
