use anyhow::Context;
use scanline_steg::{BlackBit, EncodingParameters, ScanlineCodec, PNG};
use std::{ffi::OsStr, fs, path::Path};

const MESSAGE: &str = "The quick brown fox jumps over the lazy dog";

fn main() -> anyhow::Result<()> {
    let input_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bench-images".to_owned());
    let output_dir = Path::new("benchmark");
    fs::create_dir_all(output_dir)?;
    let test_images = fs::read_dir(&input_dir)
        .with_context(|| format!("Failed to read bench folder {input_dir}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension() == Some(OsStr::new("png")));

    let codec = ScanlineCodec::new(EncodingParameters::new(BlackBit::Zero, 2)?);
    let mut results = Vec::new();

    for image_path in test_images {
        let test_name = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("unnamed")
            .to_owned();
        let status = match run_one(&image_path, output_dir, &test_name, &codec) {
            Ok(true) => "ok".to_owned(),
            Ok(false) => "mismatch".to_owned(),
            Err(e) => format!("error: {e:#}"),
        };
        results.push(serde_json::json!({
            "image": test_name,
            "status": status,
        }));
    }

    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
    let report = serde_json::json!({
        "date": now,
        "message_len": MESSAGE.len(),
        "results": results,
    });
    fs::write(output_dir.join("stego_results.json"), report.to_string())?;
    Ok(())
}

fn run_one(
    image_path: &Path,
    output_dir: &Path,
    test_name: &str,
    codec: &ScanlineCodec,
) -> anyhow::Result<bool> {
    let mut png = PNG::decode(&fs::read(image_path)?)
        .with_context(|| format!("Failed to decode {}", image_path.display()))?;
    png.grid.lighten_min();
    codec.encode(&mut png.grid, MESSAGE)?;
    let bytes = png.encode();
    fs::write(output_dir.join(format!("{test_name}-steg.png")), &bytes)?;
    let reread = PNG::decode(&bytes)?;
    Ok(codec.decode(&reread.grid)? == MESSAGE)
}
