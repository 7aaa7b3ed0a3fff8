#![forbid(unsafe_code)]

//! Turning reconstructed scanlines into RGBA pixels.
//!
//! The color model is picked once from the header, and then each row is
//! expanded by the function for that model. Nothing checks the color type per
//! pixel.

use bitfrob::u8_replicate_bits;
use pixel_formats::r8g8b8a8_Srgb;

use super::{Palette, PngColorType, IHDR};

/// Intensities for 2-bit greyscale.
///
/// These are not the bit-replicated values (`0x55`, `0xAA`), and existing
/// images depend on them.
pub static GRAY_2BIT: [u8; 4] = [0x00, 0x67, 0xB6, 0xFF];

/// Expands a greyscale sample of the given depth to a 0-255 intensity.
///
/// * 1-bit: `{0, 255}`
/// * 2-bit: [`GRAY_2BIT`]
/// * 4-bit: steps of `0x11`
/// * 8-bit: unchanged
#[inline]
#[must_use]
pub fn gray_intensity(bit_depth: u8, sample: u8) -> u8 {
  match bit_depth {
    2 => GRAY_2BIT[usize::from(sample & 0b11)],
    1 | 4 => u8_replicate_bits(u32::from(bit_depth), sample),
    _ => sample,
  }
}

/// Splits packed bytes into samples of `bit_depth` bits, leftmost sample in
/// the high bits.
///
/// Padding bits at the end of a row come out as extra samples, so callers
/// should only take as many as the row has pixels. A `bit_depth` other than
/// 1, 2, 4, or 8 gives no samples at all.
pub fn unpack_samples(row: &[u8], bit_depth: u8) -> impl Iterator<Item = u8> + '_ {
  let (per_byte, mask) = match bit_depth {
    1 | 2 | 4 | 8 => (8 / bit_depth, ((1_u16 << bit_depth) - 1) as u8),
    _ => (0, 0),
  };
  row.iter().flat_map(move |&byte| {
    (1..=per_byte).map(move |k| (byte >> (8 - bit_depth * k)) & mask)
  })
}

/// How the samples of a decoded row become pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorModel {
  /// Greyscale at 1, 2, 4, or 8 bits.
  Mono { bit_depth: u8 },
  /// 8-bit greyscale + alpha.
  MonoAlpha,
  /// 8-bit RGB.
  Color,
  /// 8-bit RGBA.
  ColorAlpha,
  /// Palette indexes at 1, 2, 4, or 8 bits.
  Indexed { bit_depth: u8, palette: Palette },
}
impl ColorModel {
  /// Picks the model for a header. The palette is only kept for indexed
  /// color.
  #[must_use]
  pub fn new(ihdr: &IHDR, palette: Palette) -> Self {
    match ihdr.color_type {
      PngColorType::Y => ColorModel::Mono { bit_depth: ihdr.bit_depth },
      PngColorType::YA => ColorModel::MonoAlpha,
      PngColorType::RGB => ColorModel::Color,
      PngColorType::RGBA => ColorModel::ColorAlpha,
      PngColorType::Index => ColorModel::Indexed { bit_depth: ihdr.bit_depth, palette },
    }
  }

  /// Writes one reconstructed row (without its filter byte) into a row of
  /// pixels.
  ///
  /// Pixels are written left to right until either the samples or `out` run
  /// out. An indexed pixel whose index is past the end of the palette is left
  /// as it was.
  pub fn expand_row(&self, row: &[u8], out: &mut [r8g8b8a8_Srgb]) {
    match self {
      ColorModel::Mono { bit_depth } => expand_mono(*bit_depth, row, out),
      ColorModel::MonoAlpha => expand_mono_alpha(row, out),
      ColorModel::Color => expand_color(row, out),
      ColorModel::ColorAlpha => expand_color_alpha(row, out),
      ColorModel::Indexed { bit_depth, palette } => expand_indexed(*bit_depth, palette, row, out),
    }
  }
}

fn expand_mono(bit_depth: u8, row: &[u8], out: &mut [r8g8b8a8_Srgb]) {
  for (p, sample) in out.iter_mut().zip(unpack_samples(row, bit_depth)) {
    let y = gray_intensity(bit_depth, sample);
    *p = r8g8b8a8_Srgb { r: y, g: y, b: y, a: 0xFF };
  }
}

fn expand_mono_alpha(row: &[u8], out: &mut [r8g8b8a8_Srgb]) {
  for (p, ya) in out.iter_mut().zip(row.chunks_exact(2)) {
    *p = r8g8b8a8_Srgb { r: ya[0], g: ya[0], b: ya[0], a: ya[1] };
  }
}

fn expand_color(row: &[u8], out: &mut [r8g8b8a8_Srgb]) {
  for (p, rgb) in out.iter_mut().zip(row.chunks_exact(3)) {
    *p = r8g8b8a8_Srgb { r: rgb[0], g: rgb[1], b: rgb[2], a: 0xFF };
  }
}

fn expand_color_alpha(row: &[u8], out: &mut [r8g8b8a8_Srgb]) {
  for (p, rgba) in out.iter_mut().zip(row.chunks_exact(4)) {
    *p = r8g8b8a8_Srgb { r: rgba[0], g: rgba[1], b: rgba[2], a: rgba[3] };
  }
}

fn expand_indexed(bit_depth: u8, palette: &Palette, row: &[u8], out: &mut [r8g8b8a8_Srgb]) {
  for (p, index) in out.iter_mut().zip(unpack_samples(row, bit_depth)) {
    if let Some([r, g, b]) = palette.get(index) {
      *p = r8g8b8a8_Srgb { r, g, b, a: 0xFF };
    }
  }
}
