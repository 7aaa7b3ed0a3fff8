#![forbid(unsafe_code)]

//! The zlib envelope around the filtered scanlines.
//!
//! The actual deflate work is done by `miniz_oxide`. On the way out we always
//! write the `78 9C` header (32K window, default compression). On the way in
//! the two header bytes are skipped without looking at them and the rest is
//! inflated as a raw deflate stream, so the Adler-32 trailer isn't checked.
//! Inflating stops at a caller-given output limit, so a tiny stream can't
//! expand into more memory than the image needs.

use log::debug;
use miniz_oxide::{
  deflate::compress_to_vec_zlib,
  inflate::{decompress_to_vec_with_limit, TINFLStatus},
};

use crate::error::{PngError, PngResult};

/// The zlib header this crate always writes.
pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x9C];

/// zlib's "default" level.
pub const COMPRESSION_LEVEL: u8 = 6;

/// Compresses the filtered data into a complete zlib stream.
#[must_use]
pub fn zlib_encode(filtered: &[u8]) -> Vec<u8> {
  let mut out = compress_to_vec_zlib(filtered, COMPRESSION_LEVEL);
  // The level bits are informative only, so pinning the header never changes
  // how the stream inflates.
  out[..2].copy_from_slice(&ZLIB_HEADER);
  debug!("deflated {} filtered bytes into {}", filtered.len(), out.len());
  out
}

/// Inflates a zlib stream, ignoring the header bytes.
///
/// At most `limit` bytes come out. A stream with more output than that is cut
/// off at `limit` bytes rather than being an error, and the caller decides
/// what to do with the excess.
pub fn zlib_decode(zlib: &[u8], limit: usize) -> PngResult<Vec<u8>> {
  let deflate = zlib.get(ZLIB_HEADER.len()..).ok_or(PngError::Decompress)?;
  let out = match decompress_to_vec_with_limit(deflate, limit) {
    Ok(out) => out,
    Err(e) if e.status == TINFLStatus::HasMoreOutput => {
      debug!("stopped inflating at the {limit} byte limit");
      e.output
    }
    Err(e) => {
      debug!("inflate failed: {:?}", e.status);
      return Err(PngError::Decompress);
    }
  };
  debug!("inflated {} bytes into {}", zlib.len(), out.len());
  Ok(out)
}
