#![forbid(unsafe_code)]

//! Module for working with PNG data.
//!
//! * [Portable Network Graphics Specification (Second Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/2003/REC-PNG-20031110/
//!
//! ## What's Supported
//!
//! Decoding handles the outputs of most common PNG producers:
//!
//! * Greyscale at 1, 2, 4, or 8 bits.
//! * Indexed color at 1, 2, 4, or 8 bits (with a `PLTE` chunk).
//! * 8-bit RGB, RGBA, and greyscale + alpha.
//!
//! Interlaced images and 16-bit channels are rejected, and
//! [`PngError::is_unsupported_feature`](crate::PngError::is_unsupported_feature)
//! tells those apart from data that's simply broken. Ancillary chunks are
//! skipped.
//!
//! Encoding always writes 8-bit samples, in the narrowest of greyscale,
//! greyscale + alpha, RGB, or RGBA that keeps every pixel exact. Every row
//! gets filter type 0 and all the image data goes into one `IDAT`.
//!
//! ## Decoding Policy
//!
//! Unlike many decoders this one is strict about integrity:
//!
//! * The 8 signature bytes must be exact.
//! * Every chunk's CRC is checked, except the CRC of `IEND`. Decoding stops as
//!   soon as the `IEND` type is read.
//! * `IHDR` must be the first chunk, and there can only be one.
//!
//! It's *not* strict about the Adler-32 checksum on the zlib stream, which is
//! never checked, or about extra image data past the last row, which is
//! ignored with a warning.
//!
//! ## Layers
//!
//! Most users only want [`PixelBuffer::load`](crate::PixelBuffer::load) and
//! [`PixelBuffer::save`](crate::PixelBuffer::save). The pieces those are built
//! from are public as well:
//!
//! 1) [`ChunkReader`] and [`write_chunk`] frame `length|type|data|crc` records,
//!    using [`png_crc`].
//! 2) [`zlib_encode`] and [`zlib_decode`] handle the compression envelope.
//! 3) [`reconstruct_row`] undoes the scanline filter on one row, given the row
//!    above it.
//! 4) [`ColorModel::expand_row`] turns one reconstructed row into RGBA pixels.

mod chunk;
pub use chunk::*;

mod crc32;
pub use crc32::*;

mod decode;
pub use decode::*;

mod encode;
pub use encode::*;

mod ihdr;
pub use ihdr::*;

mod options;
pub use options::*;

mod plte;
pub use plte::*;

mod unfilter;
pub use unfilter::*;

mod unpack;
pub use unpack::*;

mod zlib;
pub use zlib::*;

/// The 8 bytes every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Checks if the PNG's initial 8 bytes are correct.
///
/// * If this is the case, the rest of the bytes are very likely PNG data.
/// * If this is *not* the case, the rest of the bytes are very likely *not*
///   PNG data.
#[inline]
#[must_use]
pub const fn is_png_header_correct(png: &[u8]) -> bool {
  matches!(png, [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n', ..])
}
