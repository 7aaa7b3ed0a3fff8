#![forbid(unsafe_code)]

//! Scanline filtering.
//!
//! Every filtered row is one filter-type byte followed by the row's packed
//! sample bytes. Reconstruction of a row needs the row above it already
//! reconstructed, so rows are handled strictly in order.
//!
//! When encoding this crate always writes filter type 0 ("None").

use crate::error::{PngError, PngResult};

/// The five PNG scanline filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl TryFrom<u8> for FilterType {
  type Error = PngError;
  #[inline]
  fn try_from(value: u8) -> PngResult<Self> {
    Ok(match value {
      0 => FilterType::None,
      1 => FilterType::Sub,
      2 => FilterType::Up,
      3 => FilterType::Average,
      4 => FilterType::Paeth,
      _ => return Err(PngError::UnsupportedScanlineFilter(value)),
    })
  }
}

/// Picks whichever of `a` (left), `b` (up), or `c` (up-left) is closest to
/// `a + b - c`.
#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // Note: the order of these tests decides ties, and must not change.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// Undoes the filter on one row.
///
/// * `filter` is the row's filter byte.
/// * `raw` is the filtered sample bytes (without the filter byte).
/// * `previous` is the reconstructed row above. Pass all zeros (or an empty
///   slice) for the first row; any missing bytes count as 0.
/// * `bytes_per_pixel` is the distance to the "left" byte, see
///   [`IHDR::filter_bytes_per_pixel`](super::IHDR::filter_bytes_per_pixel).
///
/// ## Failure
/// * The filter byte isn't 0 through 4.
pub fn reconstruct_row(
  filter: u8, raw: &[u8], previous: &[u8], bytes_per_pixel: usize,
) -> PngResult<Vec<u8>> {
  let filter = FilterType::try_from(filter)?;
  let bpp = bytes_per_pixel.max(1);
  let mut row: Vec<u8> = Vec::new();
  row.try_reserve(raw.len())?;
  row.extend_from_slice(raw);
  let up = |i: usize| previous.get(i).copied().unwrap_or(0);

  match filter {
    FilterType::None => (),
    FilterType::Sub => {
      for i in bpp..row.len() {
        row[i] = row[i].wrapping_add(row[i - bpp]);
      }
    }
    FilterType::Up => {
      row.iter_mut().enumerate().for_each(|(i, p)| *p = p.wrapping_add(up(i)));
    }
    FilterType::Average => {
      for i in 0..row.len() {
        let a = if i >= bpp { row[i - bpp] } else { 0 };
        let b = up(i);
        row[i] = row[i].wrapping_add(((u16::from(a) + u16::from(b)) / 2) as u8);
      }
    }
    FilterType::Paeth => {
      for i in 0..row.len() {
        let (a, c) = if i >= bpp { (row[i - bpp], up(i - bpp)) } else { (0, 0) };
        row[i] = row[i].wrapping_add(paeth_predict(a, up(i), c));
      }
    }
  }
  Ok(row)
}

/// Appends one row under filter type 0: the filter byte, then the samples
/// unchanged.
#[inline]
pub fn filter_none_into(samples: &[u8], out: &mut Vec<u8>) {
  out.push(FilterType::None as u8);
  out.extend_from_slice(samples);
}
