//! The scanline codec: a deterministic bidirectional mapping between a text
//! message and black/white pixel edits on a [`PixelGrid`].
//!
//! Layout convention (identical for both directions, by construction):
//! bit slots are enumerated row-major — rows top to bottom, and within a row
//! the columns `0, step, 2*step, ...` left to right. Each message byte takes
//! 8 consecutive slots, most-significant bit first. A bit equal to
//! `black_bit` is painted at minimum brightness, the other bit at maximum.
//! A single 0x00 byte terminates the message; slots past it stay untouched.

use core::fmt;
use std::iter::once;

use crate::{grid::PixelGrid, utils::div_ceil};

/// Luma at or above this reads as the light bit. Midpoint thresholding is
/// what lets slightly perturbed pixels (resampling, colour management)
/// still decode.
const LUMA_THRESHOLD: u8 = 128;

const BITS_PER_CHAR: usize = 8;

/// Reserved end-of-message byte; never valid inside a message.
const TERMINATOR: u8 = 0;

/// Which logical bit value is rendered at minimum brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackBit {
    Zero,
    One,
}
impl BlackBit {
    fn bit(self) -> u8 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }
}
impl TryFrom<u8> for BlackBit {
    type Error = CodecError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            _ => Err(CodecError::InvalidParameters(
                "black bit must be 0 or 1",
            )),
        }
    }
}

/// Per-run settings, applied uniformly to the whole grid. Only
/// constructible through [`EncodingParameters::new`], which rejects a zero
/// step up front.
#[derive(Debug, Clone, Copy)]
pub struct EncodingParameters {
    black_bit: BlackBit,
    step: usize,
}
impl EncodingParameters {
    pub fn new(black_bit: BlackBit, step: usize) -> Result<Self, CodecError> {
        if step < 1 {
            return Err(CodecError::InvalidParameters("step must be at least 1"));
        }
        Ok(Self { black_bit, step })
    }

    pub fn black_bit(&self) -> BlackBit {
        self.black_bit
    }

    pub fn step(&self) -> usize {
        self.step
    }
}

/// Failure modes of a single encode or decode call. Nothing here is
/// retryable; every error is local to the call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The message needs more bit slots than the grid provides.
    CapacityExceeded {
        message_len: usize,
        capacity: usize,
    },
    /// All slots were read without hitting the end-of-message byte.
    NoTerminatorFound,
    /// Bad step or black-bit value, or a grid too small for even the
    /// terminator byte.
    InvalidParameters(&'static str),
    /// A character outside U+0001..=U+00FF cannot be embedded.
    UnencodableMessage(char),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                message_len,
                capacity,
            } => write!(
                f,
                "message of {message_len} characters exceeds grid capacity of {capacity}"
            ),
            Self::NoTerminatorFound => write!(f, "no terminator found before the grid ran out"),
            Self::InvalidParameters(reason) => write!(f, "invalid parameters: {reason}"),
            Self::UnencodableMessage(c) => {
                write!(f, "character {c:?} cannot be encoded as a single byte")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Pure enumeration of bit slots for a grid. The single point of truth for
/// the encode/decode layout; takes only (width, height, step).
struct SlotIter {
    width: usize,
    height: usize,
    step: usize,
    x: usize,
    y: usize,
}
impl SlotIter {
    fn new(width: usize, height: usize, step: usize) -> Self {
        Self {
            width,
            height,
            step,
            x: 0,
            y: 0,
        }
    }
}
impl Iterator for SlotIter {
    type Item = (usize, usize);
    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.height || self.width == 0 {
            return None;
        }
        let slot = (self.x, self.y);
        self.x += self.step;
        if self.x >= self.width {
            self.x = 0;
            self.y += 1;
        }
        Some(slot)
    }
}

pub struct ScanlineCodec {
    params: EncodingParameters,
}

impl ScanlineCodec {
    pub fn new(params: EncodingParameters) -> Self {
        Self { params }
    }

    /// Maximum message length in characters for a grid of the given size.
    /// One byte's worth of slots is reserved for the terminator.
    pub fn capacity(&self, width: usize, height: usize) -> usize {
        (self.slot_count(width, height) / BITS_PER_CHAR).saturating_sub(1)
    }

    fn slot_count(&self, width: usize, height: usize) -> usize {
        div_ceil(width, self.params.step) * height
    }

    /// Embed `message` into the grid. All-or-nothing: every failure is
    /// detected before the first pixel is touched.
    pub fn encode(&self, grid: &mut PixelGrid, message: &str) -> Result<(), CodecError> {
        let bytes = message_bytes(message)?;
        if self.slot_count(grid.width(), grid.height()) < BITS_PER_CHAR {
            return Err(CodecError::InvalidParameters(
                "grid too small to hold the terminator",
            ));
        }
        let capacity = self.capacity(grid.width(), grid.height());
        if bytes.len() > capacity {
            return Err(CodecError::CapacityExceeded {
                message_len: bytes.len(),
                capacity,
            });
        }

        let mut slots = SlotIter::new(grid.width(), grid.height(), self.params.step);
        for byte in bytes.iter().chain(once(&TERMINATOR)) {
            for shift in (0..BITS_PER_CHAR).rev() {
                let bit = (byte >> shift) & 1;
                let (x, y) = slots.next().expect("capacity was checked above");
                if bit == self.params.black_bit.bit() {
                    grid.paint_min(x, y);
                } else {
                    grid.paint_max(x, y);
                }
            }
        }
        log::info!(
            "embedded {} character(s) plus terminator at step {}",
            bytes.len(),
            self.params.step
        );
        Ok(())
    }

    /// Recover a message from the grid. Fails hard when the terminator is
    /// never seen; a partial read is a bug surface, not a result.
    pub fn decode(&self, grid: &PixelGrid) -> Result<String, CodecError> {
        if self.slot_count(grid.width(), grid.height()) < BITS_PER_CHAR {
            return Err(CodecError::InvalidParameters(
                "grid too small to hold the terminator",
            ));
        }
        let mut message = String::new();
        let mut byte = 0u8;
        let mut bits_read = 0;
        for (x, y) in SlotIter::new(grid.width(), grid.height(), self.params.step) {
            let dark = grid.luma(x, y) < LUMA_THRESHOLD;
            let bit = if dark {
                self.params.black_bit.bit()
            } else {
                1 - self.params.black_bit.bit()
            };
            byte = (byte << 1) | bit;
            bits_read += 1;
            if bits_read == BITS_PER_CHAR {
                if byte == TERMINATOR {
                    log::info!("extracted {} character(s)", message.len());
                    return Ok(message);
                }
                // Latin-1 mapping: any byte is a valid char, so garbage
                // grids decode deterministically instead of crashing.
                message.push(byte as char);
                byte = 0;
                bits_read = 0;
            }
        }
        Err(CodecError::NoTerminatorFound)
    }
}

fn message_bytes(message: &str) -> Result<Vec<u8>, CodecError> {
    message
        .chars()
        .map(|c| {
            let code = c as u32;
            if code == TERMINATOR as u32 || code > u8::MAX as u32 {
                Err(CodecError::UnencodableMessage(c))
            } else {
                Ok(code as u8)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{BlackBit, CodecError, EncodingParameters, ScanlineCodec, SlotIter};
    use crate::{grid::PixelGrid, pixel::Pixel};

    fn codec(black_bit: BlackBit, step: usize) -> ScanlineCodec {
        ScanlineCodec::new(EncodingParameters::new(black_bit, step).unwrap())
    }

    fn grey_grid(width: usize, height: usize, value: u8) -> PixelGrid {
        PixelGrid::filled(width, height, Pixel::grey(value))
    }

    #[test]
    fn slots_enumerate_row_major_with_stride() {
        let slots: Vec<_> = SlotIter::new(6, 2, 2).collect();
        assert_eq!(
            slots,
            vec![(0, 0), (2, 0), (4, 0), (0, 1), (2, 1), (4, 1)]
        );
    }

    #[test]
    fn stride_wider_than_grid_leaves_one_column() {
        let slots: Vec<_> = SlotIter::new(3, 2, 10).collect();
        assert_eq!(slots, vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn capacity_reserves_the_terminator() {
        assert_eq!(codec(BlackBit::Zero, 2).capacity(64, 64), 255);
        assert_eq!(codec(BlackBit::Zero, 1).capacity(8, 1), 0);
        assert_eq!(codec(BlackBit::Zero, 1).capacity(4, 1), 0);
        assert_eq!(codec(BlackBit::Zero, 2).capacity(16, 8), 7);
    }

    #[test]
    fn round_trip_across_parameter_grid() {
        let message = "Scanline, old TV style!";
        for black_bit in [BlackBit::Zero, BlackBit::One] {
            for step in [1, 2, 3, 5] {
                let codec = codec(black_bit, step);
                let mut grid = grey_grid(64, 64, 90);
                codec.encode(&mut grid, message).unwrap();
                assert_eq!(codec.decode(&grid).unwrap(), message);
            }
        }
    }

    #[test]
    fn scenario_hi_on_64x64_even_columns() {
        let codec = codec(BlackBit::Zero, 2);
        let mut grid = grey_grid(64, 64, 90);
        codec.encode(&mut grid, "HI").unwrap();
        // 'H' = 0x48 = 01001000, MSB first: the first slot (column 0, row 0)
        // carries a 0 bit, painted black; the second (column 2) a 1, white.
        assert_eq!(grid.luma(0, 0), 0);
        assert_eq!(grid.luma(2, 0), 255);
        // Odd columns are never slots.
        assert_eq!(grid.luma(1, 0), 90);
        assert_eq!(codec.decode(&grid).unwrap(), "HI");
    }

    #[test]
    fn scenario_empty_message_fills_one_row_with_terminator() {
        let codec = codec(BlackBit::Zero, 1);
        let mut grid = grey_grid(8, 1, 200);
        codec.encode(&mut grid, "").unwrap();
        // Terminator 0x00 with black_bit=0 paints all eight slots black.
        for x in 0..8 {
            assert_eq!(grid.luma(x, 0), 0);
        }
        assert_eq!(codec.decode(&grid).unwrap(), "");
    }

    #[test]
    fn capacity_boundary_is_exact() {
        let codec = codec(BlackBit::Zero, 2);
        // 16x8 at step 2 -> 64 slots -> 7 characters + terminator.
        let mut grid = grey_grid(16, 8, 90);
        codec.encode(&mut grid, "AAAAAAA").unwrap();
        assert_eq!(codec.decode(&grid).unwrap(), "AAAAAAA");

        let mut grid = grey_grid(16, 8, 90);
        assert_eq!(
            codec.encode(&mut grid, "AAAAAAAA"),
            Err(CodecError::CapacityExceeded {
                message_len: 8,
                capacity: 7
            })
        );
    }

    #[test]
    fn failed_encode_leaves_the_grid_untouched() {
        let codec = codec(BlackBit::Zero, 1);
        let mut grid = grey_grid(8, 2, 90);
        let before = grid.clone();
        assert!(codec.encode(&mut grid, "far too long for this").is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn tolerates_brightness_noise_within_threshold() {
        let codec = codec(BlackBit::Zero, 2);
        let mut grid = grey_grid(32, 16, 90);
        codec.encode(&mut grid, "noisy").unwrap();
        // Push every channel 10 units towards the midpoint, as a lossy
        // post-processing step might.
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let p = grid.get(x, y);
                let nudge = |v: u8| if v < 128 { v + 10 } else { v - 10 };
                grid.set(x, y, Pixel::new(nudge(p.red), nudge(p.green), nudge(p.blue), p.alpha));
            }
        }
        assert_eq!(codec.decode(&grid).unwrap(), "noisy");
    }

    #[test]
    fn never_encoded_grid_decodes_deterministically() {
        let codec = codec(BlackBit::Zero, 2);
        // Uniform light grid: every byte reads 0xFF, never the terminator.
        let grid = grey_grid(32, 32, 200);
        assert_eq!(codec.decode(&grid), Err(CodecError::NoTerminatorFound));
        assert_eq!(codec.decode(&grid), Err(CodecError::NoTerminatorFound));

        // With the opposite polarity the same grid reads all zeroes, which
        // is an immediate terminator. Arbitrary, but stable across calls.
        let codec = super::ScanlineCodec::new(
            EncodingParameters::new(BlackBit::One, 2).unwrap(),
        );
        assert_eq!(codec.decode(&grid).unwrap(), "");
        assert_eq!(codec.decode(&grid).unwrap(), "");
    }

    #[test]
    fn latin1_characters_round_trip() {
        let codec = codec(BlackBit::One, 1);
        let mut grid = grey_grid(16, 8, 90);
        codec.encode(&mut grid, "héllo").unwrap();
        assert_eq!(codec.decode(&grid).unwrap(), "héllo");
    }

    #[test]
    fn rejects_unencodable_characters() {
        let codec = codec(BlackBit::Zero, 1);
        let mut grid = grey_grid(16, 8, 90);
        assert_eq!(
            codec.encode(&mut grid, "crab \u{1F980}"),
            Err(CodecError::UnencodableMessage('\u{1F980}'))
        );
        assert_eq!(
            codec.encode(&mut grid, "nul\0byte"),
            Err(CodecError::UnencodableMessage('\0'))
        );
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(matches!(
            EncodingParameters::new(BlackBit::Zero, 0),
            Err(CodecError::InvalidParameters(_))
        ));
        assert!(matches!(BlackBit::try_from(2), Err(_)));

        let codec = codec(BlackBit::Zero, 1);
        let mut grid = grey_grid(4, 1, 90);
        assert!(matches!(
            codec.encode(&mut grid, ""),
            Err(CodecError::InvalidParameters(_))
        ));
        assert!(matches!(
            codec.decode(&grid),
            Err(CodecError::InvalidParameters(_))
        ));
    }

    #[test]
    fn encoded_bit_pattern_renders_as_expected() {
        // 'A' = 0x41 = 01000001 followed by the all-zero terminator.
        let codec = codec(BlackBit::Zero, 1);
        let mut grid = grey_grid(16, 1, 200);
        codec.encode(&mut grid, "A").unwrap();
        let rendered: String = (0..16)
            .map(|x| if grid.luma(x, 0) < 128 { '#' } else { '.' })
            .collect();
        insta::assert_snapshot!(rendered, @"#.#####.########");
    }
}
