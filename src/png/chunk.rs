#![forbid(unsafe_code)]

//! Framing of the `length | type | data | crc` records that make up a PNG.

use core::fmt::{Debug, Write as _};
use std::io::{self, Read, Write};

use log::trace;

use super::crc32::png_crc;
use crate::error::{PngError, PngResult};

/// PNG doesn't allow a chunk length with the high bit set.
pub const MAX_CHUNK_LEN: u32 = i32::MAX as u32;

/// The four ASCII bytes naming a chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style)]
impl PngChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
}
impl Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for byte in self.0 {
      f.write_char(byte as char)?;
    }
    Ok(())
  }
}

/// A chunk read from a stream, CRC already verified.
///
/// The `IEND` chunk is produced with empty data and no CRC check, since the
/// reader stops as soon as it sees the type.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RawChunk {
  pub ty: PngChunkType,
  pub data: Vec<u8>,
}
impl Debug for RawChunk {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .finish()
  }
}

/// Writes one chunk, with the data given as any number of slices.
///
/// The length written is the total of all the slices, and the CRC covers the
/// type followed by every slice.
pub fn write_chunk<W: Write>(
  writer: &mut W, ty: PngChunkType, data: &[&[u8]],
) -> PngResult<()> {
  let total: usize = data.iter().map(|part| part.len()).sum();
  let len = u32::try_from(total)
    .ok()
    .filter(|len| *len <= MAX_CHUNK_LEN)
    .ok_or(PngError::ChunkLengthInvalid(u32::MAX))?;
  let mut crc_parts: Vec<&[u8]> = Vec::with_capacity(data.len() + 1);
  crc_parts.push(&ty.0);
  crc_parts.extend_from_slice(data);
  let crc = png_crc(&crc_parts);

  writer.write_all(&len.to_be_bytes())?;
  writer.write_all(&ty.0)?;
  for part in data {
    writer.write_all(part)?;
  }
  writer.write_all(&crc.to_be_bytes())?;
  trace!("wrote {ty:?} chunk, {len} bytes, crc {crc:08X}");
  Ok(())
}

/// Pulls successive chunks from a stream that's positioned just after the
/// PNG signature.
///
/// As an iterator it yields every chunk up to and including `IEND`, or up to
/// and including the first error, and then only `None`.
#[derive(Debug)]
pub struct ChunkReader<R> {
  reader: R,
  finished: bool,
}
impl<R: Read> ChunkReader<R> {
  #[inline]
  pub const fn new(reader: R) -> Self {
    Self { reader, finished: false }
  }

  /// Gives back the stream.
  #[inline]
  pub fn into_inner(self) -> R {
    self.reader
  }

  /// Reads the next chunk.
  ///
  /// ## Failure
  /// * The stream errors or ends early (`UnexpectedEof`).
  /// * The length is above [`MAX_CHUNK_LEN`].
  /// * The CRC doesn't match.
  pub fn read_chunk(&mut self) -> PngResult<RawChunk> {
    let mut head = [0_u8; 8];
    self.reader.read_exact(&mut head)?;
    let [l0, l1, l2, l3, t0, t1, t2, t3] = head;
    let len = u32::from_be_bytes([l0, l1, l2, l3]);
    let ty = PngChunkType([t0, t1, t2, t3]);
    if ty == PngChunkType::IEND {
      trace!("found IEND, stopping");
      return Ok(RawChunk { ty, data: Vec::new() });
    }
    if len > MAX_CHUNK_LEN {
      return Err(PngError::ChunkLengthInvalid(len));
    }

    // `take` keeps a lying length from allocating more than the stream has.
    let mut data = Vec::new();
    let got = (&mut self.reader).take(u64::from(len)).read_to_end(&mut data)?;
    if got != len as usize {
      return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    let mut crc_bytes = [0_u8; 4];
    self.reader.read_exact(&mut crc_bytes)?;
    let declared = u32::from_be_bytes(crc_bytes);
    let actual = png_crc(&[&ty.0[..], &data[..]]);
    if declared != actual {
      return Err(PngError::ChunkCrcMismatch { chunk: ty.0, declared, actual });
    }
    trace!("read {ty:?} chunk, {len} bytes");
    Ok(RawChunk { ty, data })
  }
}
impl<R: Read> Iterator for ChunkReader<R> {
  type Item = PngResult<RawChunk>;
  fn next(&mut self) -> Option<Self::Item> {
    if self.finished {
      return None;
    }
    let out = self.read_chunk();
    self.finished = match &out {
      Ok(chunk) => chunk.ty == PngChunkType::IEND,
      Err(_) => true,
    };
    Some(out)
  }
}
