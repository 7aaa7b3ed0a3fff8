#![forbid(unsafe_code)]

use crate::error::{PngError, PngResult};

/// The types of color that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PngColorType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl PngColorType {
  /// The number of channels in this type of color.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// Bit depths this crate decodes for the color type.
  #[inline]
  #[must_use]
  const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y | Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => bit_depth == 8,
    }
  }
}
impl TryFrom<u8> for PngColorType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => PngColorType::Y,
      2 => PngColorType::RGB,
      3 => PngColorType::Index,
      4 => PngColorType::YA,
      6 => PngColorType::RGBA,
      _ => return Err(PngError::UnsupportedColorType(value)),
    })
  }
}

/// Image Header
///
/// Only non-interlaced images with compression and filter method 0 can be
/// represented, so those fields aren't stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel
  pub bit_depth: u8,
  /// pixel color type
  pub color_type: PngColorType,
}
impl IHDR {
  /// Size of the chunk's data.
  pub const LEN: usize = 13;

  /// Bits used by one pixel.
  #[inline]
  #[must_use]
  pub const fn bits_per_pixel(&self) -> usize {
    (self.bit_depth as usize) * self.color_type.channel_count()
  }

  /// The byte distance used by the scanline filters.
  ///
  /// Filtering is per byte within a pixel when pixels are more than 1 byte
  /// each, and per byte when pixels are 1 byte or less.
  #[inline]
  #[must_use]
  pub const fn filter_bytes_per_pixel(&self) -> usize {
    let bytes_per_channel = if self.bit_depth >= 8 { self.bit_depth as usize / 8 } else { 1 };
    self.color_type.channel_count() * bytes_per_channel
  }

  /// Packed sample bytes in one row, not counting the filter byte.
  ///
  /// When pixels are less than 8 bits it's possible to end up with partial
  /// bytes on the end, so we must round up.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(&self) -> usize {
    self.bits_per_pixel().saturating_mul(self.width as usize).saturating_add(7) / 8
  }

  /// Total bytes of filtered data (filter byte + samples, for every row).
  #[inline]
  #[must_use]
  pub const fn filtered_data_len(&self) -> usize {
    (self.bytes_per_scanline() + 1).saturating_mul(self.height as usize)
  }

  /// The 13 data bytes of this header as written in a PNG.
  #[must_use]
  pub fn to_bytes(&self) -> [u8; Self::LEN] {
    let [w0, w1, w2, w3] = self.width.to_be_bytes();
    let [h0, h1, h2, h3] = self.height.to_be_bytes();
    [w0, w1, w2, w3, h0, h1, h2, h3, self.bit_depth, self.color_type as u8, 0, 0, 0]
  }
}
impl TryFrom<&[u8]> for IHDR {
  type Error = PngError;
  /// Parses and validates `IHDR` chunk data.
  ///
  /// Fields are checked in the order they appear, and the first bad field
  /// decides the error.
  fn try_from(value: &[u8]) -> PngResult<Self> {
    match *value {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, color_type, compression_method, filter_method, interlace_method] =>
      {
        let width = u32::from_be_bytes([w0, w1, w2, w3]);
        let height = u32::from_be_bytes([h0, h1, h2, h3]);
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
          return Err(PngError::InvalidDimensions { width, height });
        }
        let color = PngColorType::try_from(color_type)?;
        if !color.allows_bit_depth(bit_depth) {
          return Err(PngError::UnsupportedBitDepth { bit_depth, color_type });
        }
        if compression_method != 0 {
          return Err(PngError::UnsupportedCompressionMethod(compression_method));
        }
        if filter_method != 0 {
          return Err(PngError::UnsupportedFilterMethod(filter_method));
        }
        if interlace_method != 0 {
          return Err(PngError::UnsupportedInterlaceMethod(interlace_method));
        }
        Ok(Self { width, height, bit_depth, color_type: color })
      }
      _ => Err(PngError::InvalidHeaderLength(value.len())),
    }
  }
}
