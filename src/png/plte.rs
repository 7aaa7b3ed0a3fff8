#![forbid(unsafe_code)]

use core::fmt::Debug;

use crate::error::{PngError, PngResult};

/// Palette data
///
/// Palette entries are always RGB. Only indexed-color images use them.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Palette(Vec<[u8; 3]>);
impl Palette {
  /// PNG palettes can't index past a byte.
  pub const MAX_ENTRIES: usize = 256;

  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[[u8; 3]] {
    &self.0
  }

  /// Looks up an entry, `None` when the index is past the end.
  #[inline]
  #[must_use]
  pub fn get(&self, index: u8) -> Option<[u8; 3]> {
    self.0.get(usize::from(index)).copied()
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
impl TryFrom<&[u8]> for Palette {
  type Error = PngError;
  /// Parses `PLTE` chunk data.
  fn try_from(data: &[u8]) -> PngResult<Self> {
    match bytemuck::try_cast_slice::<u8, [u8; 3]>(data) {
      Ok(entries) if entries.len() <= Self::MAX_ENTRIES => {
        let mut v = Vec::new();
        v.try_reserve(entries.len())?;
        v.extend_from_slice(entries);
        Ok(Self(v))
      }
      _ => Err(PngError::InvalidPalette(data.len())),
    }
  }
}
impl From<Vec<[u8; 3]>> for Palette {
  #[inline]
  fn from(entries: Vec<[u8; 3]>) -> Self {
    Self(entries)
  }
}
impl Debug for Palette {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("Palette").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}
