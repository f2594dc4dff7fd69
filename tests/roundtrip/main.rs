use scanline_steg::{BlackBit, EncodingParameters, Pixel, PixelGrid, ScanlineCodec, PNG};

fn gradient_grid(width: usize, height: usize) -> PixelGrid {
    let pixels = (0..width * height)
        .map(|i| {
            Pixel::new(
                (i % 256) as u8,
                ((i * 3) % 256) as u8,
                ((i * 7) % 256) as u8,
                255,
            )
        })
        .collect();
    PixelGrid::new(width, height, pixels)
}

fn codec(black_bit: BlackBit, step: usize) -> ScanlineCodec {
    ScanlineCodec::new(EncodingParameters::new(black_bit, step).unwrap())
}

#[test]
fn message_survives_the_full_png_round_trip() {
    let message = "Nothing to see here, just interlace noise.";
    let codec = codec(BlackBit::Zero, 2);

    let mut grid = gradient_grid(96, 64);
    grid.lighten_min();
    codec.encode(&mut grid, message).unwrap();

    let bytes = PNG::from_grid(grid.clone()).encode();
    let reparsed = PNG::decode(&bytes).unwrap();
    assert_eq!(reparsed.grid, grid);
    assert_eq!(codec.decode(&reparsed.grid).unwrap(), message);
}

#[test]
fn empty_message_survives_the_round_trip() {
    let codec = codec(BlackBit::One, 3);
    let mut grid = gradient_grid(24, 8);
    codec.encode(&mut grid, "").unwrap();
    let reparsed = PNG::decode(&PNG::from_grid(grid).encode()).unwrap();
    assert_eq!(codec.decode(&reparsed.grid).unwrap(), "");
}

#[test]
fn decoding_with_the_wrong_step_does_not_crash() {
    let mut grid = gradient_grid(64, 64);
    codec(BlackBit::Zero, 2).encode(&mut grid, "hidden").unwrap();

    // Wrong stride reads misaligned bits: the result is unspecified but
    // must be deterministic and free of panics.
    let wrong = codec(BlackBit::Zero, 3);
    let first = wrong.decode(&grid);
    let second = wrong.decode(&grid);
    assert_eq!(first, second);
}

#[test]
fn reencoding_the_stego_image_is_lossless() {
    let message = "survives a second save";
    let codec = codec(BlackBit::Zero, 1);
    let mut grid = gradient_grid(48, 48);
    codec.encode(&mut grid, message).unwrap();

    // Save, load, save again: pixel values must not drift.
    let once = PNG::decode(&PNG::from_grid(grid).encode()).unwrap();
    let twice = PNG::decode(&PNG::from_grid(once.grid.clone()).encode()).unwrap();
    assert_eq!(twice.grid, once.grid);
    assert_eq!(codec.decode(&twice.grid).unwrap(), message);
}
