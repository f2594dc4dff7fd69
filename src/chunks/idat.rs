use super::crc::calculate_crc;
use nom::IResult;

pub(crate) const HEADER: &[u8; 4] = b"IDAT";

#[derive(Debug)]
pub(crate) struct IDATChunk<T> {
    pub(crate) data: T,
}
impl<T> IDATChunk<T>
where
    T: AsRef<[u8]>,
{
    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let len = self.data.as_ref().len() as u32;
        let mut bytes = len.to_be_bytes().to_vec();
        bytes.extend(HEADER);
        bytes.extend(self.data.as_ref());
        let crc = calculate_crc(bytes[4..].iter().copied()).to_be_bytes();
        bytes.extend(crc);
        bytes
    }
}

pub(crate) fn parse_data(chunk_data: &[u8]) -> IResult<&[u8], IDATChunk<&[u8]>> {
    Ok((&chunk_data[0..0], IDATChunk { data: chunk_data }))
}
