#![forbid(unsafe_code)]

//! Provides the owned RGBA image type.

use std::{
  fs::File,
  io::{BufReader, BufWriter, Read, Write},
  path::Path,
};

use pixel_formats::r8g8b8a8_Srgb;

use crate::{
  error::{PngError, PngResult},
  png::{decode_png, encode_png, DecoderOptions},
};

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
///
/// You don't ever need to call this function yourself, but it's how the
/// buffer converts 2d coordinates into index values within its pixel vector.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// A `width` by `height` grid of RGBA pixels, stored row by row from the top
/// left.
///
/// Both dimensions are always at least 1 and at most `i32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
  width: u32,
  height: u32,
  pixels: Vec<r8g8b8a8_Srgb>,
}
impl PixelBuffer {
  /// Makes a buffer with every pixel at the default (all zero) value.
  ///
  /// ## Failure
  /// * Either dimension is 0.
  /// * Either dimension is above `i32::MAX`.
  /// * The allocation fails.
  pub fn new(width: u32, height: u32) -> PngResult<Self> {
    if width == 0 || height == 0 {
      return Err(PngError::WidthOrHeightZero);
    }
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
      return Err(PngError::DimensionsTooLarge { width, height });
    }
    let pixel_count = (width as usize)
      .checked_mul(height as usize)
      .ok_or(PngError::DimensionsTooLarge { width, height })?;
    let mut pixels: Vec<r8g8b8a8_Srgb> = Vec::new();
    pixels.try_reserve(pixel_count)?;
    pixels.resize(pixel_count, r8g8b8a8_Srgb::default());
    Ok(Self { width, height, pixels })
  }

  #[inline]
  #[must_use]
  pub const fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  #[must_use]
  pub const fn height(&self) -> u32 {
    self.height
  }

  /// All the pixels, row by row.
  #[inline]
  #[must_use]
  pub fn pixels(&self) -> &[r8g8b8a8_Srgb] {
    &self.pixels
  }

  /// One row of pixels, or `None` past the bottom.
  #[inline]
  #[must_use]
  pub fn row_mut(&mut self, y: u32) -> Option<&mut [r8g8b8a8_Srgb]> {
    if y < self.height {
      let start = xy_width_to_index(0, y, self.width);
      self.pixels.get_mut(start..start + self.width as usize)
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut r8g8b8a8_Srgb> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }

  fn checked_index(&self, x: i32, y: i32) -> PngResult<usize> {
    match (u32::try_from(x), u32::try_from(y)) {
      (Ok(ux), Ok(uy)) if ux < self.width && uy < self.height => {
        Ok(xy_width_to_index(ux, uy, self.width))
      }
      _ => Err(PngError::OutOfRange { x: i64::from(x), y: i64::from(y) }),
    }
  }

  /// Reads one pixel.
  ///
  /// ## Failure
  /// * `OutOfRange` unless `0 <= x < width` and `0 <= y < height`.
  #[inline]
  pub fn get_pixel(&self, x: i32, y: i32) -> PngResult<r8g8b8a8_Srgb> {
    let i = self.checked_index(x, y)?;
    Ok(self.pixels[i])
  }

  /// Overwrites one pixel.
  ///
  /// ## Failure
  /// * `OutOfRange` unless `0 <= x < width` and `0 <= y < height`.
  #[inline]
  pub fn set_pixel(&mut self, x: i32, y: i32, pixel: r8g8b8a8_Srgb) -> PngResult<()> {
    let i = self.checked_index(x, y)?;
    self.pixels[i] = pixel;
    Ok(())
  }

  /// Decodes a PNG stream with the default [`DecoderOptions`].
  ///
  /// The stream is read up to the end of the `IEND` chunk type and no
  /// further. It's borrowed, never closed.
  #[inline]
  pub fn load<R: Read>(reader: R) -> PngResult<Self> {
    Self::load_with_options(reader, &DecoderOptions::default())
  }

  /// Decodes a PNG stream with the given options.
  #[inline]
  pub fn load_with_options<R: Read>(reader: R, options: &DecoderOptions) -> PngResult<Self> {
    decode_png(reader, options)
  }

  /// Encodes this buffer as a PNG into the stream, then flushes it.
  ///
  /// If this fails part way the stream may hold a partial PNG.
  #[inline]
  pub fn save<W: Write>(&self, writer: W) -> PngResult<()> {
    encode_png(self, writer)
  }

  /// Decodes PNG bytes that are already in memory.
  #[inline]
  pub fn from_png_bytes(bytes: &[u8]) -> PngResult<Self> {
    Self::load(bytes)
  }

  /// Encodes this buffer as PNG bytes in memory.
  #[inline]
  pub fn to_png_bytes(&self) -> PngResult<Vec<u8>> {
    let mut out = Vec::new();
    self.save(&mut out)?;
    Ok(out)
  }

  /// Opens a file, decodes it, and closes it again.
  pub fn load_file<P: AsRef<Path>>(path: P) -> PngResult<Self> {
    let file = File::open(path)?;
    Self::load(BufReader::new(file))
  }

  /// Creates (or truncates) a file, encodes into it, and closes it again.
  pub fn save_file<P: AsRef<Path>>(&self, path: P) -> PngResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    self.save(&mut writer)?;
    // an error on the final flush would otherwise be lost in the drop
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    Ok(())
  }
}
