//! Scanline steganography for PNG images: short ASCII messages embedded as
//! black/white pixels at a fixed column stride, styled as CRT interlace noise.

mod chunks;
pub mod codec;
mod filters;
mod grid;
mod image_data;
mod interlacing;
mod pixel;
mod png;
mod scanlines;
mod utils;

pub use codec::{BlackBit, CodecError, EncodingParameters, ScanlineCodec};
pub use grid::PixelGrid;
pub use pixel::Pixel;
pub use png::PNG;
