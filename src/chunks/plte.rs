use nom::IResult;

pub(crate) const HEADER: &[u8; 4] = b"PLTE";

#[derive(Debug)]
pub(crate) struct PLTEChunk<'a> {
    colors: &'a [u8],
}
impl PLTEChunk<'_> {
    pub(crate) fn get_color(&self, index: u8) -> Option<(u8, u8, u8)> {
        let offset = index as usize * 3;
        Some((
            *self.colors.get(offset)?,
            *self.colors.get(offset + 1)?,
            *self.colors.get(offset + 2)?,
        ))
    }
}

pub(crate) fn parse_data(chunk_data: &[u8]) -> IResult<&[u8], PLTEChunk> {
    Ok((&chunk_data[0..0], PLTEChunk { colors: chunk_data }))
}

#[cfg(test)]
mod tests {
    use super::parse_data;

    #[test]
    fn palette_entries_are_three_bytes_wide() {
        let (_, palette) = parse_data(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(palette.get_color(0), Some((1, 2, 3)));
        assert_eq!(palette.get_color(1), Some((4, 5, 6)));
        assert_eq!(palette.get_color(2), None);
    }
}
