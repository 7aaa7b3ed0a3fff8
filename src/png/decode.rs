#![forbid(unsafe_code)]

use std::io::{ErrorKind, Read};

use log::{debug, trace, warn};

use super::{
  chunk::{ChunkReader, PngChunkType},
  is_png_header_correct,
  unfilter::reconstruct_row,
  unpack::ColorModel,
  zlib::zlib_decode,
  DecoderOptions, Palette, IHDR,
};
use crate::{
  error::{PngError, PngResult},
  pixel_buffer::PixelBuffer,
};

/// Reads the 8 signature bytes and checks them.
///
/// A stream too short to hold a signature is also an invalid signature.
pub fn read_signature<R: Read>(reader: &mut R) -> PngResult<()> {
  let mut sig = [0_u8; 8];
  match reader.read_exact(&mut sig) {
    Ok(()) if is_png_header_correct(&sig) => Ok(()),
    Ok(()) => Err(PngError::InvalidSignature),
    Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(PngError::InvalidSignature),
    Err(e) => Err(e.into()),
  }
}

/// What the decoder keeps from the chunks before `IEND`.
#[derive(Debug, Default)]
struct Collected {
  ihdr: Option<IHDR>,
  palette: Palette,
  idat: Vec<u8>,
  idat_chunks: usize,
}

fn collect_chunks<R: Read>(reader: R, options: &DecoderOptions) -> PngResult<(IHDR, Collected)> {
  let mut c = Collected::default();
  for chunk in ChunkReader::new(reader) {
    let chunk = chunk?;
    if c.ihdr.is_none() && chunk.ty != PngChunkType::IHDR {
      return Err(PngError::FirstChunkNotIHDR);
    }
    match chunk.ty {
      PngChunkType::IHDR => {
        if c.ihdr.is_some() {
          return Err(PngError::DuplicateHeader);
        }
        let ihdr = IHDR::try_from(chunk.data.as_slice())?;
        if !options.allows(ihdr.width, ihdr.height) {
          return Err(PngError::DimensionsTooLarge { width: ihdr.width, height: ihdr.height });
        }
        debug!("header: {ihdr:?}");
        c.ihdr = Some(ihdr);
      }
      PngChunkType::PLTE => {
        c.palette = Palette::try_from(chunk.data.as_slice())?;
        debug!("palette with {} entries", c.palette.len());
      }
      PngChunkType::IDAT => {
        c.idat.try_reserve(chunk.data.len())?;
        c.idat.extend_from_slice(&chunk.data);
        c.idat_chunks += 1;
      }
      PngChunkType::IEND => {
        let ihdr = c.ihdr.ok_or(PngError::FirstChunkNotIHDR)?;
        return Ok((ihdr, c));
      }
      other => trace!("skipping {other:?} chunk"),
    }
  }
  // The reader only stops early by returning an error, which `?` already
  // passed along, so this means the stream itself ran dry.
  Err(std::io::Error::from(ErrorKind::UnexpectedEof).into())
}

/// Decodes a whole PNG from the stream.
///
/// The stream is read just past the `IEND` chunk type and nothing more.
///
/// ## Failure
/// * Anything wrong with the signature, chunks, header, palette, or image
///   data. See [`PngError`] for the full list.
/// * The image is larger than the `options` allow.
pub fn decode_png<R: Read>(mut reader: R, options: &DecoderOptions) -> PngResult<PixelBuffer> {
  read_signature(&mut reader)?;
  let (ihdr, collected) = collect_chunks(&mut reader, options)?;
  if collected.idat_chunks == 0 {
    return Err(PngError::MissingImageData);
  }
  debug!("{} IDAT chunks, {} bytes total", collected.idat_chunks, collected.idat.len());

  let expected = ihdr.filtered_data_len();
  // one byte past the rows is enough to see that there's extra data
  let filtered = zlib_decode(&collected.idat, expected.saturating_add(1))?;
  if filtered.len() < expected {
    return Err(PngError::NotEnoughImageData { expected, actual: filtered.len() });
  }
  if filtered.len() > expected {
    warn!("ignoring image data past the last row");
  }

  let model = ColorModel::new(&ihdr, collected.palette);
  let mut buffer = PixelBuffer::new(ihdr.width, ihdr.height)?;
  let stride = ihdr.bytes_per_scanline() + 1;
  let bpp = ihdr.filter_bytes_per_pixel();
  let mut previous: Vec<u8> = Vec::new();
  for (y, line) in (0..ihdr.height).zip(filtered[..expected].chunks_exact(stride)) {
    let (filter, raw) = (line[0], &line[1..]);
    let row = reconstruct_row(filter, raw, &previous, bpp)?;
    if let Some(out) = buffer.row_mut(y) {
      model.expand_row(&row, out);
    }
    previous = row;
  }
  Ok(buffer)
}
