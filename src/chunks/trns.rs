use nom::IResult;

pub(crate) const HEADER: &[u8; 4] = b"tRNS";

#[allow(non_camel_case_types)]
#[derive(Debug)]
pub(crate) struct tRNSChunk<'a> {
    inner: &'a [u8],
}
impl tRNSChunk<'_> {
    pub(crate) fn as_greyscale(&self) -> Option<u16> {
        Some(u16::from_be_bytes([
            *self.inner.first()?,
            *self.inner.get(1)?,
        ]))
    }
    pub(crate) fn as_truecolor(&self) -> Option<(u16, u16, u16)> {
        if self.inner.len() < 6 {
            return None;
        }
        Some((
            u16::from_be_bytes([self.inner[0], self.inner[1]]),
            u16::from_be_bytes([self.inner[2], self.inner[3]]),
            u16::from_be_bytes([self.inner[4], self.inner[5]]),
        ))
    }
    /// Palette entries past the end of the chunk are fully opaque.
    pub(crate) fn as_palette(&self, index: u8) -> u8 {
        *self.inner.get(index as usize).unwrap_or(&255)
    }
}

pub(crate) fn parse_data(chunk_data: &[u8]) -> IResult<&[u8], tRNSChunk> {
    Ok((&chunk_data[0..0], tRNSChunk { inner: chunk_data }))
}
