//! Prints the chunks and the decoded size of PNG files.
//!
//! ```txt
//! pnginfo [--roundtrip] FILE...
//! ```
//!
//! With `--roundtrip` each image is also saved again in memory and loaded
//! back, which must give the same pixels.
//!
//! Set `PNGBUF_LOG` to a log level (`trace`, `debug`, ...) for more output.
//!
//! Built with `cargo run --features pnginfo --bin pnginfo -- FILE`.

use std::{fs::File, io::BufReader, path::Path, process::ExitCode};

use log::{info, Level};
use pngbuf::{png::*, PixelBuffer, PngResult};

fn main() -> ExitCode {
  let level: Level =
    std::env::var("PNGBUF_LOG").ok().and_then(|s| s.parse().ok()).unwrap_or(Level::Warn);
  if let Err(e) = simple_logger::init_with_level(level) {
    eprintln!("couldn't start the logger: {e}");
  }
  info!("Log level: {level}");

  let mut roundtrip = false;
  let mut paths = Vec::new();
  for arg in std::env::args().skip(1) {
    match arg.as_str() {
      "--roundtrip" => roundtrip = true,
      _ => paths.push(arg),
    }
  }
  if paths.is_empty() {
    eprintln!("usage: pnginfo [--roundtrip] FILE...");
    return ExitCode::FAILURE;
  }

  let mut failures = 0;
  for path in &paths {
    let path = Path::new(path);
    println!("{}:", path.display());
    if let Err(e) = print_chunks(path).and_then(|()| print_image(path, roundtrip)) {
      println!("  error: {e}");
      failures += 1;
    }
  }
  if failures == 0 {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  }
}

fn print_chunks(path: &Path) -> PngResult<()> {
  let mut reader = BufReader::new(File::open(path)?);
  read_signature(&mut reader)?;
  for (n, chunk) in ChunkReader::new(reader).enumerate() {
    let chunk = chunk?;
    if chunk.ty == PngChunkType::IHDR {
      println!("  {n}: {:?} {:?}", chunk.ty, IHDR::try_from(chunk.data.as_slice()));
    } else {
      println!("  {n}: {:?}, {} bytes", chunk.ty, chunk.data.len());
    }
  }
  Ok(())
}

fn print_image(path: &Path, roundtrip: bool) -> PngResult<()> {
  let img = PixelBuffer::load_file(path)?;
  let model = select_color_model(img.pixels());
  println!("  {}x{}, would save as {model:?}", img.width(), img.height());
  if roundtrip {
    let again = PixelBuffer::from_png_bytes(&img.to_png_bytes()?)?;
    println!("  roundtrip: {}", if again == img { "ok" } else { "MISMATCH" });
  }
  Ok(())
}
