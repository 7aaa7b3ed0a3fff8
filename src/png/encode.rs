#![forbid(unsafe_code)]

use std::io::Write;

use log::debug;
use pixel_formats::r8g8b8a8_Srgb;

use super::{
  chunk::{write_chunk, PngChunkType},
  unfilter::filter_none_into,
  zlib::zlib_encode,
  PngColorType, IHDR, PNG_SIGNATURE,
};
use crate::{error::PngResult, pixel_buffer::PixelBuffer};

/// The color models the encoder can pick from.
///
/// All of them are written at 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncodeColorModel {
  /// Every pixel is grey and opaque.
  Mono,
  /// Every pixel is grey, some aren't opaque.
  MonoAlpha,
  /// Some pixel isn't grey, every pixel is opaque.
  Color,
  /// Some pixel isn't grey and some pixel isn't opaque.
  ColorAlpha,
}
impl EncodeColorModel {
  #[inline]
  #[must_use]
  pub const fn color_type(self) -> PngColorType {
    match self {
      EncodeColorModel::Mono => PngColorType::Y,
      EncodeColorModel::MonoAlpha => PngColorType::YA,
      EncodeColorModel::Color => PngColorType::RGB,
      EncodeColorModel::ColorAlpha => PngColorType::RGBA,
    }
  }

  /// Appends the samples for one pixel under this model.
  #[inline]
  fn push_samples(self, p: r8g8b8a8_Srgb, out: &mut Vec<u8>) {
    match self {
      EncodeColorModel::Mono => out.push(p.r),
      EncodeColorModel::MonoAlpha => out.extend_from_slice(&[p.r, p.a]),
      EncodeColorModel::Color => out.extend_from_slice(&[p.r, p.g, p.b]),
      EncodeColorModel::ColorAlpha => out.extend_from_slice(&[p.r, p.g, p.b, p.a]),
    }
  }
}

/// Looks at every pixel once and picks the narrowest model that loses
/// nothing.
#[must_use]
pub fn select_color_model(pixels: &[r8g8b8a8_Srgb]) -> EncodeColorModel {
  let mut has_alpha = false;
  let mut has_color = false;
  for p in pixels {
    has_alpha |= p.a != u8::MAX;
    has_color |= p.r != p.g || p.g != p.b;
    if has_alpha && has_color {
      break;
    }
  }
  match (has_color, has_alpha) {
    (false, false) => EncodeColorModel::Mono,
    (false, true) => EncodeColorModel::MonoAlpha,
    (true, false) => EncodeColorModel::Color,
    (true, true) => EncodeColorModel::ColorAlpha,
  }
}

/// Writes the buffer as a complete PNG: signature, `IHDR`, a single `IDAT`,
/// and `IEND`. The writer is flushed at the end but otherwise left alone.
pub fn encode_png<W: Write>(buffer: &PixelBuffer, mut writer: W) -> PngResult<()> {
  let model = select_color_model(buffer.pixels());
  let ihdr = IHDR {
    width: buffer.width(),
    height: buffer.height(),
    bit_depth: 8,
    color_type: model.color_type(),
  };
  debug!("encoding {}x{} as {model:?}", ihdr.width, ihdr.height);

  let mut filtered: Vec<u8> = Vec::new();
  filtered.try_reserve(ihdr.filtered_data_len())?;
  let mut samples: Vec<u8> = Vec::with_capacity(ihdr.bytes_per_scanline());
  for row in buffer.pixels().chunks_exact(buffer.width() as usize) {
    samples.clear();
    row.iter().for_each(|p| model.push_samples(*p, &mut samples));
    filter_none_into(&samples, &mut filtered);
  }
  let idat = zlib_encode(&filtered);

  writer.write_all(&PNG_SIGNATURE)?;
  write_chunk(&mut writer, PngChunkType::IHDR, &[&ihdr.to_bytes()[..]])?;
  write_chunk(&mut writer, PngChunkType::IDAT, &[&idat[..]])?;
  write_chunk(&mut writer, PngChunkType::IEND, &[])?;
  writer.flush()?;
  Ok(())
}
