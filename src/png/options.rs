#![forbid(unsafe_code)]

/// The largest width or height accepted by default.
///
/// This is the PNG format's own limit, so by default every valid header
/// passes. Set tighter limits when loading files from untrusted sources.
pub const DEFAULT_MAX_DIMENSION: u32 = i32::MAX as u32;

/// Settings for [`PixelBuffer::load_with_options`](crate::PixelBuffer::load_with_options).
///
/// Built up in a chain:
/// ```
/// # use pngbuf::DecoderOptions;
/// let opts = DecoderOptions::new().set_max_width(640).set_max_height(480);
/// assert_eq!(opts.max_width(), 640);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderOptions {
  max_width: u32,
  max_height: u32,
}
impl Default for DecoderOptions {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl DecoderOptions {
  /// Both limits at [`DEFAULT_MAX_DIMENSION`].
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { max_width: DEFAULT_MAX_DIMENSION, max_height: DEFAULT_MAX_DIMENSION }
  }

  /// Images wider than this fail with `DimensionsTooLarge` before any image
  /// data is inflated.
  #[inline]
  #[must_use]
  pub const fn set_max_width(mut self, width: u32) -> Self {
    self.max_width = width;
    self
  }

  /// Images taller than this fail with `DimensionsTooLarge` before any image
  /// data is inflated.
  #[inline]
  #[must_use]
  pub const fn set_max_height(mut self, height: u32) -> Self {
    self.max_height = height;
    self
  }

  #[inline]
  #[must_use]
  pub const fn max_width(&self) -> u32 {
    self.max_width
  }

  #[inline]
  #[must_use]
  pub const fn max_height(&self) -> u32 {
    self.max_height
  }

  /// If an image of this size is allowed.
  #[inline]
  #[must_use]
  pub const fn allows(&self, width: u32, height: u32) -> bool {
    width <= self.max_width && height <= self.max_height
  }
}
