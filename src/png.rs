use anyhow::{anyhow, bail, Context};
use nom::{bytes::complete::tag, IResult};

use crate::{
    chunks::{
        self,
        idat::IDATChunk,
        iend,
        ihdr::{ColorType, IHDRChunk, Interlacing},
        plte::PLTEChunk,
        trns::tRNSChunk,
        Chunk,
    },
    filters::{reconstruct_scanline, Filter},
    grid::PixelGrid,
    image_data,
    pixel::{IndexedPixel, Pixel},
    scanlines::{Adam7Scanlines, NormalScanlines, ScanlineIterator},
};

const SIGNATURE: &[u8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// A decoded PNG image, reduced to its pixel grid.
///
/// Decoding accepts greyscale, truecolor, and indexed images (with or
/// without alpha) at bit depth 8, filtered or Adam7-interlaced. Encoding
/// always writes 8-bit RGBA, non-interlaced, filter type None; pixel values
/// survive the round trip exactly.
pub struct PNG {
    pub grid: PixelGrid,
}

impl PNG {
    pub fn from_grid(grid: PixelGrid) -> Self {
        Self { grid }
    }

    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        let (rest, _) = parse_signature(bytes)
            .map_err(|_| anyhow!("input doesn't start with expected signature"))?;
        let mut header: Option<IHDRChunk> = None;
        let mut palette: Option<PLTEChunk> = None;
        let mut transparency: Option<tRNSChunk> = None;
        let mut compressed = Vec::new();
        for chunk in chunks::iter_chunks(rest) {
            match chunk? {
                Chunk::IHDR(ihdr) => {
                    log::debug!("IHDR: {ihdr:?}");
                    header = Some(ihdr);
                }
                Chunk::PLTE(plte) => palette = Some(plte),
                Chunk::tRNS(trns) => transparency = Some(trns),
                Chunk::IDAT(idat) => compressed.extend_from_slice(idat.data),
                Chunk::IEND => break,
                Chunk::Unknown(raw) => log::debug!(
                    "skipping chunk {}",
                    String::from_utf8_lossy(raw.chunk_type)
                ),
            }
        }
        let header = header.context("PNG has no IHDR chunk")?;
        if header.bit_depth != 8 {
            bail!(
                "Unsupported bit depth {} (only 8 is handled)",
                header.bit_depth
            );
        }
        if compressed.is_empty() {
            bail!("PNG has no IDAT data");
        }
        let data = image_data::decompress_data(&compressed)?;
        let grid = assemble_grid(&data, &header, palette.as_ref(), transparency.as_ref())?;
        Ok(Self { grid })
    }

    pub fn encode(&self) -> Vec<u8> {
        let grid = &self.grid;
        let header = IHDRChunk {
            width: grid.width() as u32,
            height: grid.height() as u32,
            bit_depth: 8,
            color_type: ColorType::TruecolorWithAlpha,
            compression_method: 0,
            filter_method: 0,
            interlace_method: Interlacing::None,
        };
        let mut raw = Vec::with_capacity((grid.width() * 4 + 1) * grid.height());
        for y in 0..grid.height() {
            raw.push(0); // filter type None
            for x in 0..grid.width() {
                let pixel = grid.get(x, y);
                raw.extend([pixel.red, pixel.green, pixel.blue, pixel.alpha]);
            }
        }
        let compressed = image_data::compress_data(&raw);
        log::debug!(
            "encoded {}x{} RGBA, {} -> {} bytes",
            grid.width(),
            grid.height(),
            raw.len(),
            compressed.len()
        );
        let mut bytes = SIGNATURE.to_vec();
        bytes.extend(header.to_bytes());
        bytes.extend(IDATChunk { data: compressed }.to_bytes());
        bytes.extend(iend::write_end());
        bytes
    }
}

fn assemble_grid(
    data: &[u8],
    header: &IHDRChunk,
    palette: Option<&PLTEChunk>,
    transparency: Option<&tRNSChunk>,
) -> anyhow::Result<PixelGrid> {
    let bpp = header.bytes_per_pixel();
    let mut grid = PixelGrid::filled(
        header.width as usize,
        header.height as usize,
        Pixel::default(),
    );
    let scanline_source: Box<dyn ScanlineIterator<'_> + '_> = match header.interlace_method {
        Interlacing::None => Box::new(NormalScanlines::new(data, header)),
        Interlacing::Adam7 => Box::new(Adam7Scanlines::new(data, header)),
    };
    let mut previous: Vec<u8> = Vec::new();
    for scanline in scanline_source {
        let Some((&filter_byte, filtered)) = scanline.data.split_first() else {
            bail!("Empty scanline in image data");
        };
        anyhow::ensure!(
            filtered.len() >= scanline.pixel_indices.len() * bpp,
            "Truncated scanline in image data"
        );
        if scanline.first_in_pass {
            previous = vec![0; filtered.len()];
        }
        let filter = Filter::try_from(filter_byte)?;
        let mut current = filtered.to_vec();
        reconstruct_scanline(filter, &mut current, &previous, bpp);
        for (i, &index) in scanline.pixel_indices.iter().enumerate() {
            let sample = &current[i * bpp..(i + 1) * bpp];
            grid.set_by_index(
                index,
                expand_pixel(sample, header.color_type, palette, transparency)?,
            );
        }
        previous = current;
    }
    Ok(grid)
}

fn expand_pixel(
    sample: &[u8],
    color_type: ColorType,
    palette: Option<&PLTEChunk>,
    transparency: Option<&tRNSChunk>,
) -> anyhow::Result<Pixel> {
    let pixel = match color_type {
        ColorType::Greyscale => {
            let value = sample[0];
            let alpha = match transparency.and_then(tRNSChunk::as_greyscale) {
                Some(key) if key == value as u16 => 0,
                _ => u8::MAX,
            };
            Pixel::new(value, value, value, alpha)
        }
        ColorType::GreyscaleWithAlpha => Pixel::new(sample[0], sample[0], sample[0], sample[1]),
        ColorType::Truecolor => {
            let (red, green, blue) = (sample[0], sample[1], sample[2]);
            let alpha = match transparency.and_then(tRNSChunk::as_truecolor) {
                Some(key) if key == (red as u16, green as u16, blue as u16) => 0,
                _ => u8::MAX,
            };
            Pixel::new(red, green, blue, alpha)
        }
        ColorType::TruecolorWithAlpha => Pixel::new(sample[0], sample[1], sample[2], sample[3]),
        ColorType::IndexedColor => {
            let palette = palette.context("Indexed PNG without a PLTE chunk")?;
            let alpha = transparency
                .map(|trns| trns.as_palette(sample[0]))
                .unwrap_or(u8::MAX);
            IndexedPixel(sample[0])
                .to_pixel(palette, alpha)
                .context("Palette index out of range")?
        }
    };
    Ok(pixel)
}

fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(SIGNATURE)(input)
}
