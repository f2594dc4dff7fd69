use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use scanline_steg::{BlackBit, EncodingParameters, ScanlineCodec, PNG};

/// Embed or extract ASCII text in PNG pixel columns, disguised as an
/// old-TV scanline artifact.
#[derive(Parser)]
#[command(name = "scanline-steg")]
struct Args {
    /// 'input' embeds text, 'output' extracts it
    #[arg(long, value_enum)]
    mode: Mode,
    /// Base image name without extension (e.g. 'photo' for photo.png)
    #[arg(long)]
    image: String,
    /// Which bit value is represented by a black pixel
    #[arg(long = "black-bit", default_value_t = 0)]
    black_bit: u8,
    /// Column step between encoded scanlines
    #[arg(long, default_value_t = 2)]
    step: usize,
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Input,
    Output,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let verbosity = if args.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();

    let params = EncodingParameters::new(BlackBit::try_from(args.black_bit)?, args.step)?;
    let codec = ScanlineCodec::new(params);

    match args.mode {
        Mode::Input => {
            let source = format!("{}.png", args.image);
            let input = std::fs::read(&source).with_context(|| format!("Failed to read {source}"))?;
            let mut png = PNG::decode(&input)?;
            png.grid.lighten_min();

            print!("Enter text to embed: ");
            io::stdout().flush()?;
            let mut text = String::new();
            io::stdin().lock().read_line(&mut text)?;
            let text = text.trim_end_matches(['\r', '\n']);

            codec.encode(&mut png.grid, text)?;
            let target = format!("{}_steg.png", args.image);
            std::fs::write(&target, png.encode())
                .with_context(|| format!("Failed to write {target}"))?;
            println!("Saved stego image: {target}");
        }
        Mode::Output => {
            let source = format!("{}_steg.png", args.image);
            let input = std::fs::read(&source).with_context(|| format!("Failed to read {source}"))?;
            let png = PNG::decode(&input)?;
            let text = codec.decode(&png.grid)?;
            println!("{text}");
        }
    }
    Ok(())
}
