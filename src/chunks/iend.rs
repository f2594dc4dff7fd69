use super::crc::calculate_crc;

pub(crate) const HEADER: &[u8; 4] = b"IEND";

pub(crate) fn write_end() -> [u8; 12] {
    let mut data = [0, 0, 0, 0, b'I', b'E', b'N', b'D', 0, 0, 0, 0];
    let crc = calculate_crc(data[4..8].iter().copied()).to_be_bytes();
    for (i, b) in crc.into_iter().enumerate() {
        data[i + 8] = b;
    }
    data
}
