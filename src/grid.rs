use crate::pixel::Pixel;

/// Caller-owned pixel buffer, row-major, dimensions fixed at construction.
///
/// The codec mutates a grid in place; ownership never leaves the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixel count must match grid dimensions"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn filled(width: usize, height: usize, pixel: Pixel) -> Self {
        Self::new(width, height, vec![pixel; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) {
        self.pixels[y * self.width + x] = pixel;
    }

    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.get(x, y).luma()
    }

    /// Paint a pixel at minimum brightness, keeping its alpha.
    pub fn paint_min(&mut self, x: usize, y: usize) {
        let alpha = self.get(x, y).alpha;
        self.set(x, y, Pixel::new(0, 0, 0, alpha));
    }

    /// Paint a pixel at maximum brightness, keeping its alpha.
    pub fn paint_max(&mut self, x: usize, y: usize) {
        let alpha = self.get(x, y).alpha;
        self.set(x, y, Pixel::new(u8::MAX, u8::MAX, u8::MAX, alpha));
    }

    /// Nudge every channel up by one, clamped. Run before embedding so that
    /// no natural pixel sits at pure black.
    pub fn lighten_min(&mut self) {
        for pixel in &mut self.pixels {
            pixel.red = pixel.red.saturating_add(1);
            pixel.green = pixel.green.saturating_add(1);
            pixel.blue = pixel.blue.saturating_add(1);
        }
    }

    pub(crate) fn set_by_index(&mut self, index: usize, pixel: Pixel) {
        self.pixels[index] = pixel;
    }
}
