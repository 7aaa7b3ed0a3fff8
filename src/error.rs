#![forbid(unsafe_code)]

use core::fmt;
use std::{error, io};

/// Result alias used throughout the crate.
pub type PngResult<T> = Result<T, PngError>;

/// Broad category of a [`PngError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PngErrorKind {
  /// The caller passed something unusable. Checked before any I/O happens.
  Argument,
  /// The PNG data itself is malformed or uses a feature this crate lacks.
  InvalidData,
  /// The underlying stream failed.
  Io,
  /// The allocator couldn't give us enough space.
  Alloc,
}

/// An error from the `pngbuf` crate.
pub enum PngError {
  /// A pixel coordinate outside of `0..width` / `0..height`.
  OutOfRange { x: i64, y: i64 },

  /// A buffer was requested with a width and/or height of 0.
  WidthOrHeightZero,

  /// The image is too large.
  ///
  /// Buffers are limited to `i32::MAX` on each side (the PNG limit), and the
  /// decoder additionally enforces the limits in its
  /// [`DecoderOptions`](crate::png::DecoderOptions).
  DimensionsTooLarge { width: u32, height: u32 },

  /// The allocator couldn't give us enough space.
  Alloc,

  /// The first eight bytes were not the PNG signature.
  InvalidSignature,

  /// A chunk's declared CRC doesn't match the CRC of its type and data.
  ChunkCrcMismatch { chunk: [u8; 4], declared: u32, actual: u32 },

  /// A chunk declared a length larger than PNG allows.
  ChunkLengthInvalid(u32),

  /// The first chunk of the stream wasn't `IHDR`.
  FirstChunkNotIHDR,

  /// More than one `IHDR` chunk.
  DuplicateHeader,

  /// The `IHDR` chunk data isn't exactly 13 bytes.
  InvalidHeaderLength(usize),

  /// The header declared a width or height of 0, or above `i32::MAX`.
  InvalidDimensions { width: u32, height: u32 },

  /// Color type outside of `{0, 2, 3, 4, 6}`.
  UnsupportedColorType(u8),

  /// The bit depth isn't allowed (or isn't supported) for the color type.
  UnsupportedBitDepth { bit_depth: u8, color_type: u8 },

  /// Compression method other than 0.
  UnsupportedCompressionMethod(u8),

  /// Filter method other than 0.
  UnsupportedFilterMethod(u8),

  /// Interlace method other than 0 (Adam7 is recognized but not supported).
  UnsupportedInterlaceMethod(u8),

  /// A scanline started with a filter byte outside of `0..=4`.
  UnsupportedScanlineFilter(u8),

  /// The `PLTE` data isn't a whole number of RGB entries, or has too many.
  InvalidPalette(usize),

  /// `IEND` arrived without any `IDAT` before it.
  MissingImageData,

  /// Inflating the image data failed.
  Decompress,

  /// The inflated image data is shorter than the header requires.
  NotEnoughImageData { expected: usize, actual: usize },

  /// Any error from the stream being read or written.
  Io(io::Error),
}

impl PngError {
  /// Which broad category this error falls into.
  #[must_use]
  pub fn kind(&self) -> PngErrorKind {
    match self {
      PngError::OutOfRange { .. } | PngError::WidthOrHeightZero => PngErrorKind::Argument,
      PngError::Alloc => PngErrorKind::Alloc,
      PngError::Io(_) => PngErrorKind::Io,
      _ => PngErrorKind::InvalidData,
    }
  }

  /// If this is a recognized PNG feature that the crate doesn't implement
  /// (16-bit channels and interlacing).
  #[must_use]
  pub fn is_unsupported_feature(&self) -> bool {
    matches!(
      self,
      PngError::UnsupportedBitDepth { bit_depth: 16, color_type: 0 | 2 | 4 | 6 }
        | PngError::UnsupportedInterlaceMethod(1)
    )
  }
}

impl From<io::Error> for PngError {
  #[inline]
  fn from(io_err: io::Error) -> Self {
    PngError::Io(io_err)
  }
}
impl From<std::collections::TryReserveError> for PngError {
  #[inline]
  fn from(_: std::collections::TryReserveError) -> Self {
    PngError::Alloc
  }
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PngError::OutOfRange { x, y } => write!(f, "pixel position ({x}, {y}) is out of range"),
      PngError::WidthOrHeightZero => write!(f, "width and height must both be non-zero"),
      PngError::DimensionsTooLarge { width, height } => {
        write!(f, "image dimensions {width}x{height} are too large")
      }
      PngError::Alloc => write!(f, "allocation failed"),
      PngError::InvalidSignature => write!(f, "invalid header"),
      PngError::ChunkCrcMismatch { chunk, declared, actual } => write!(
        f,
        "invalid chunk CRC: {} declared {declared:08X}, computed {actual:08X}",
        String::from_utf8_lossy(chunk)
      ),
      PngError::ChunkLengthInvalid(len) => write!(f, "invalid chunk length {len}"),
      PngError::FirstChunkNotIHDR => write!(f, "first chunk is not IHDR"),
      PngError::DuplicateHeader => write!(f, "multiple IHDR chunks"),
      PngError::InvalidHeaderLength(len) => write!(f, "IHDR data is {len} bytes, expected 13"),
      PngError::InvalidDimensions { width, height } => {
        write!(f, "invalid image dimensions {width}x{height}")
      }
      PngError::UnsupportedColorType(c) => write!(f, "unsupported color type {c}"),
      PngError::UnsupportedBitDepth { bit_depth, color_type } => {
        write!(f, "unsupported bit depth {bit_depth} for color type {color_type}")
      }
      PngError::UnsupportedCompressionMethod(m) => write!(f, "unsupported compression method {m}"),
      PngError::UnsupportedFilterMethod(m) => write!(f, "unsupported filter method {m}"),
      PngError::UnsupportedInterlaceMethod(m) => write!(f, "unsupported interlace method {m}"),
      PngError::UnsupportedScanlineFilter(b) => write!(f, "unsupported scanline filter {b}"),
      PngError::InvalidPalette(len) => write!(f, "invalid palette of {len} bytes"),
      PngError::MissingImageData => write!(f, "no IDAT chunk before IEND"),
      PngError::Decompress => write!(f, "image data could not be inflated"),
      PngError::NotEnoughImageData { expected, actual } => {
        write!(f, "not enough image data: expected {expected} bytes, got {actual}")
      }
      PngError::Io(io_err) => write!(f, "{io_err}"),
    }
  }
}

impl fmt::Debug for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{self}")
  }
}

impl error::Error for PngError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      PngError::Io(io_err) => Some(io_err),
      _ => None,
    }
  }
}
