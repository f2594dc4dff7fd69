use anyhow::Context;
use miniz_oxide::{deflate::compress_to_vec_zlib, inflate::decompress_to_vec_zlib};

pub(crate) fn compress_data(data: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(data, 9)
}

pub(crate) fn decompress_data(compressed_data: &[u8]) -> anyhow::Result<Vec<u8>> {
    decompress_to_vec_zlib(compressed_data).context("Failed to decompress image data.")
}
