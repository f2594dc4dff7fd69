use super::crc::calculate_crc;
use crate::utils::div_ceil;
use nom::{bytes::complete::take, combinator::map_opt, number::complete::be_u32, IResult};

pub(crate) const HEADER: &[u8; 4] = b"IHDR";

#[derive(Debug, Default)]
pub(crate) struct IHDRChunk {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) bit_depth: u8,
    pub(crate) color_type: ColorType,
    pub(crate) compression_method: u8,
    pub(crate) filter_method: u8,
    pub(crate) interlace_method: Interlacing,
}

impl IHDRChunk {
    /// Bytes per pixel in the decompressed stream. Only meaningful for
    /// 8-bit depth, which is the only depth this crate decodes.
    pub(crate) fn bytes_per_pixel(&self) -> usize {
        self.color_type.channel_count() as usize
    }

    pub(crate) fn scanline_size(&self) -> usize {
        div_ceil(
            self.width as usize * self.color_type.channel_count() as usize * self.bit_depth as usize,
            8,
        ) + 1
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0, 13];
        bytes.extend(HEADER);
        bytes.extend(&self.width.to_be_bytes());
        bytes.extend(&self.height.to_be_bytes());
        bytes.extend(&[
            self.bit_depth,
            self.color_type as u8,
            self.compression_method,
            self.filter_method,
            self.interlace_method as u8,
        ]);
        let crc = calculate_crc(bytes[4..].iter().copied()).to_be_bytes();
        bytes.extend(crc);
        bytes
    }
}

pub(crate) fn parse_data(chunk_data: &[u8]) -> IResult<&[u8], IHDRChunk> {
    let (rest, (width, height)) = nom::sequence::pair(be_u32, be_u32)(chunk_data)?;
    let (rest, ihdr) = map_opt(take(5usize), |other_bytes: &[u8]| {
        Some(IHDRChunk {
            width,
            height,
            bit_depth: other_bytes[0],
            color_type: ColorType::from_u8(other_bytes[1])?,
            compression_method: other_bytes[2],
            filter_method: other_bytes[3],
            interlace_method: Interlacing::from_u8(other_bytes[4])?,
        })
    })(rest)?;
    Ok((rest, ihdr))
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorType {
    #[default]
    Greyscale = 0,
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}
impl ColorType {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Greyscale),
            2 => Some(Self::Truecolor),
            3 => Some(Self::IndexedColor),
            4 => Some(Self::GreyscaleWithAlpha),
            6 => Some(Self::TruecolorWithAlpha),
            _ => None,
        }
    }

    pub(crate) fn channel_count(&self) -> u8 {
        match self {
            Self::Greyscale => 1,
            Self::IndexedColor => 1,
            Self::GreyscaleWithAlpha => 2,
            Self::Truecolor => 3,
            Self::TruecolorWithAlpha => 4,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interlacing {
    #[default]
    None,
    Adam7,
}
impl Interlacing {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Adam7),
            _ => None,
        }
    }
}
