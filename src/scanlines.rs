use std::ops::RangeFrom;

use crate::{
    chunks::ihdr::IHDRChunk,
    interlacing::{Adam7Iter, PixelIndicesIter},
};

/// One filtered scanline as it sits in the decompressed stream, together
/// with the indices of the pixels it fills in the final image.
pub(crate) struct Scanline<'a> {
    /// Filter byte followed by the filtered pixel bytes.
    pub(crate) data: &'a [u8],
    pub(crate) pixel_indices: Vec<usize>,
    /// True for the first scanline of the image, and of every Adam7 pass.
    /// The filter reconstruction resets its previous-line buffer here.
    pub(crate) first_in_pass: bool,
}

pub(crate) trait ScanlineIterator<'a>: Iterator<Item = Scanline<'a>> {}
impl<'a> ScanlineIterator<'a> for NormalScanlines<'a> {}
impl<'a> ScanlineIterator<'a> for Adam7Scanlines<'a> {}

pub(crate) struct NormalScanlines<'a> {
    scanline_iter: std::iter::Take<std::slice::Chunks<'a, u8>>,
    counter: RangeFrom<usize>,
    width: usize,
    first: bool,
}
impl<'a> NormalScanlines<'a> {
    pub(crate) fn new(image_data: &'a [u8], header: &IHDRChunk) -> Self {
        Self {
            scanline_iter: image_data
                .chunks(header.scanline_size())
                .take(header.height as usize),
            counter: 0..,
            width: header.width as usize,
            first: true,
        }
    }
}
impl<'a> Iterator for NormalScanlines<'a> {
    type Item = Scanline<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        let data = self.scanline_iter.next()?;
        let mut pixel_indices = Vec::with_capacity(self.width);
        for _ in 0..self.width {
            pixel_indices.push(self.counter.next()?)
        }
        let first_in_pass = self.first;
        self.first = false;
        Some(Scanline {
            data,
            pixel_indices,
            first_in_pass,
        })
    }
}

pub(crate) struct Adam7Scanlines<'a> {
    image_data: &'a [u8],
    bytes_per_pixel: usize,
    passes: Adam7Iter,
    current: Option<PassScanlines<'a>>,
}
struct PassScanlines<'a> {
    lines: std::iter::Take<std::slice::Chunks<'a, u8>>,
    indices: ChunkIter<PixelIndicesIter>,
    starting: bool,
}
impl<'a> Adam7Scanlines<'a> {
    pub(crate) fn new(image_data: &'a [u8], header: &IHDRChunk) -> Self {
        Self {
            image_data,
            bytes_per_pixel: header.bytes_per_pixel(),
            passes: Adam7Iter::new(header.width as usize, header.height as usize),
            current: None,
        }
    }
}
impl<'a> Iterator for Adam7Scanlines<'a> {
    type Item = Scanline<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pass) = self.current.as_mut() {
                if let Some(data) = pass.lines.next() {
                    let pixel_indices = pass.indices.next()?;
                    let first_in_pass = pass.starting;
                    pass.starting = false;
                    return Some(Scanline {
                        data,
                        pixel_indices,
                        first_in_pass,
                    });
                }
            }
            let sub_image = self.passes.next()?;
            let scanline_length = sub_image.width * self.bytes_per_pixel + 1;
            let pass_bytes = scanline_length * sub_image.height;
            if self.image_data.len() < pass_bytes {
                return None;
            }
            let (sub_image_data, rest) = self.image_data.split_at(pass_bytes);
            self.image_data = rest;
            self.current = Some(PassScanlines {
                lines: sub_image_data.chunks(scanline_length).take(sub_image.height),
                indices: sub_image.pixel_indices.vec_chunks(sub_image.width),
                starting: true,
            });
        }
    }
}

struct ChunkIter<I> {
    inner: I,
    size: usize,
}
impl<V, I> Iterator for ChunkIter<I>
where
    I: Iterator<Item = V>,
{
    type Item = Vec<I::Item>;
    fn next(&mut self) -> Option<Self::Item> {
        let mut results = Vec::with_capacity(self.size);
        for _ in 0..self.size {
            results.push(self.inner.next()?);
        }
        Some(results)
    }
}
trait IteratorExt<S> {
    fn vec_chunks(self, n: usize) -> ChunkIter<S>;
}
impl<T> IteratorExt<T> for T {
    fn vec_chunks(self, size: usize) -> ChunkIter<T> {
        ChunkIter { inner: self, size }
    }
}
