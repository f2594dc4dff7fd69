use crate::chunks::plte::PLTEChunk;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}
impl Pixel {
    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn grey(value: u8) -> Self {
        Self::new(value, value, value, u8::MAX)
    }

    /// Rec. 601 luma, the brightness sample the codec thresholds against.
    pub fn luma(&self) -> u8 {
        let weighted =
            299 * self.red as u32 + 587 * self.green as u32 + 114 * self.blue as u32;
        (weighted / 1000) as u8
    }
}

pub(crate) struct IndexedPixel(pub(crate) u8);
impl IndexedPixel {
    pub(crate) fn to_pixel(&self, palette: &PLTEChunk, alpha: u8) -> Option<Pixel> {
        let (red, green, blue) = palette.get_color(self.0)?;
        Some(Pixel {
            red,
            green,
            blue,
            alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Pixel;

    #[test]
    fn luma_matches_rec601_extremes() {
        assert_eq!(Pixel::new(0, 0, 0, 255).luma(), 0);
        assert_eq!(Pixel::new(255, 255, 255, 255).luma(), 255);
        assert_eq!(Pixel::grey(128).luma(), 128);
        // Green dominates the weighting.
        assert!(Pixel::new(0, 255, 0, 255).luma() > Pixel::new(255, 0, 0, 255).luma());
    }
}
