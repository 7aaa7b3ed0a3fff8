use std::io::Read;

use pngbuf::{png::*, r8g8b8a8_Srgb, PixelBuffer, PngError, PngErrorKind};
use walkdir::WalkDir;

fn rgba(r: u8, g: u8, b: u8, a: u8) -> r8g8b8a8_Srgb {
  r8g8b8a8_Srgb { r, g, b, a }
}

fn rgb(r: u8, g: u8, b: u8) -> r8g8b8a8_Srgb {
  rgba(r, g, b, 255)
}

/// Builds a PNG out of a raw IHDR and the filtered (not yet compressed) data.
fn build_png(ihdr: &[u8], palette: Option<&[u8]>, filtered: &[u8]) -> Vec<u8> {
  let mut out = PNG_SIGNATURE.to_vec();
  write_chunk(&mut out, PngChunkType::IHDR, &[ihdr]).unwrap();
  if let Some(plte) = palette {
    write_chunk(&mut out, PngChunkType::PLTE, &[plte]).unwrap();
  }
  write_chunk(&mut out, PngChunkType::IDAT, &[&zlib_encode(filtered)[..]]).unwrap();
  write_chunk(&mut out, PngChunkType::IEND, &[]).unwrap();
  out
}

fn header(width: u32, height: u32, bit_depth: u8, color_type: PngColorType) -> [u8; 13] {
  IHDR { width, height, bit_depth, color_type }.to_bytes()
}

/// The color type byte of an encoded PNG.
fn color_type_of(png: &[u8]) -> u8 {
  png[25]
}

fn roundtrip(img: &PixelBuffer) -> (PixelBuffer, u8) {
  let bytes = img.to_png_bytes().unwrap();
  (PixelBuffer::from_png_bytes(&bytes).unwrap(), color_type_of(&bytes))
}

#[test]
fn test_roundtrip_color_alpha() {
  let (w, h) = super::rand_size();
  let mut img = super::rand_buffer(w, h);
  img.set_pixel(0, 0, rgba(1, 2, 3, 4)).unwrap();
  let (back, color_type) = roundtrip(&img);
  assert_eq!(color_type, 6);
  assert_eq!(back, img);
}

#[test]
fn test_roundtrip_color() {
  let (w, h) = super::rand_size();
  let mut img = super::rand_buffer(w, h);
  for y in 0..h {
    for x in 0..w {
      img.get_mut(x, y).unwrap().a = 255;
    }
  }
  img.set_pixel(0, 0, rgb(1, 2, 3)).unwrap();
  let (back, color_type) = roundtrip(&img);
  assert_eq!(color_type, 2);
  assert_eq!(back, img);
}

#[test]
fn test_roundtrip_mono_alpha() {
  let (w, h) = super::rand_size();
  let mut img = super::rand_buffer(w, h);
  for y in 0..h {
    for x in 0..w {
      let p = img.get_mut(x, y).unwrap();
      *p = rgba(p.r, p.r, p.r, p.a);
    }
  }
  img.set_pixel(0, 0, rgba(9, 9, 9, 128)).unwrap();
  let (back, color_type) = roundtrip(&img);
  assert_eq!(color_type, 4);
  assert_eq!(back, img);
}

#[test]
fn test_roundtrip_mono() {
  let (w, h) = super::rand_size();
  let mut img = super::rand_buffer(w, h);
  for y in 0..h {
    for x in 0..w {
      let p = img.get_mut(x, y).unwrap();
      *p = rgb(p.g, p.g, p.g);
    }
  }
  let (back, color_type) = roundtrip(&img);
  assert_eq!(color_type, 0);
  assert_eq!(back, img);
}

#[test]
fn test_roundtrip_blank_keeps_zero_alpha() {
  let img = PixelBuffer::new(3, 3).unwrap();
  let (back, _) = roundtrip(&img);
  assert_eq!(back, img);
  assert!(back.pixels().iter().all(|p| p.a == 0));
}

#[test]
fn test_roundtrip_wide_and_tall() {
  for (w, h) in [(300, 1), (1, 300), (1, 1)] {
    let img = super::rand_buffer(w, h);
    assert_eq!(roundtrip(&img).0, img);
  }
}

#[test]
fn test_stream_is_left_after_iend() {
  let first = super::rand_buffer(3, 2);
  let second = super::rand_buffer(2, 3);
  let mut bytes = first.to_png_bytes().unwrap();
  bytes.extend(second.to_png_bytes().unwrap());

  let mut reader = &bytes[..];
  assert_eq!(PixelBuffer::load(&mut reader).unwrap(), first);
  // the IEND CRC is still in the stream
  let mut crc = [0_u8; 4];
  reader.read_exact(&mut crc).unwrap();
  assert_eq!(crc, [0xAE, 0x42, 0x60, 0x82]);
  assert_eq!(PixelBuffer::load(&mut reader).unwrap(), second);
  // and so is the second one
  assert_eq!(reader, [0xAE, 0x42, 0x60, 0x82]);
}

/// A 2x2 RGB image, and its rows after each filter type by hand.
const GOLDEN_PIXELS: [[u8; 3]; 4] = [[10, 20, 30], [40, 50, 60], [70, 80, 90], [100, 110, 120]];
const GOLDEN_ROWS: [[[u8; 6]; 2]; 5] = [
  // None
  [[10, 20, 30, 40, 50, 60], [70, 80, 90, 100, 110, 120]],
  // Sub
  [[10, 20, 30, 30, 30, 30], [70, 80, 90, 30, 30, 30]],
  // Up
  [[10, 20, 30, 40, 50, 60], [60, 60, 60, 60, 60, 60]],
  // Average
  [[10, 20, 30, 35, 40, 45], [65, 70, 75, 45, 45, 45]],
  // Paeth
  [[10, 20, 30, 30, 30, 30], [60, 60, 60, 30, 30, 30]],
];

fn golden_png(filter_top: u8, filter_bottom: u8) -> Vec<u8> {
  let mut filtered = vec![filter_top];
  filtered.extend_from_slice(&GOLDEN_ROWS[usize::from(filter_top)][0]);
  filtered.push(filter_bottom);
  filtered.extend_from_slice(&GOLDEN_ROWS[usize::from(filter_bottom)][1]);
  build_png(&header(2, 2, 8, PngColorType::RGB), None, &filtered)
}

fn assert_golden(img: &PixelBuffer) {
  let expected: Vec<r8g8b8a8_Srgb> = GOLDEN_PIXELS.iter().map(|&[r, g, b]| rgb(r, g, b)).collect();
  assert_eq!(img.pixels(), expected.as_slice());
}

#[test]
fn test_golden_each_filter() {
  for f in 0..=4 {
    let img = PixelBuffer::from_png_bytes(&golden_png(f, f)).unwrap();
    assert_golden(&img);
  }
}

#[test]
fn test_golden_mixed_filters() {
  for top in 0..=4 {
    for bottom in 0..=4 {
      let img = PixelBuffer::from_png_bytes(&golden_png(top, bottom)).unwrap();
      assert_golden(&img);
    }
  }
}

#[test]
fn test_bad_filter_byte() {
  let mut filtered = vec![0];
  filtered.extend_from_slice(&GOLDEN_ROWS[0][0]);
  filtered.push(5);
  filtered.extend_from_slice(&GOLDEN_ROWS[0][1]);
  let png = build_png(&header(2, 2, 8, PngColorType::RGB), None, &filtered);
  let e = PixelBuffer::from_png_bytes(&png).unwrap_err();
  assert!(matches!(e, PngError::UnsupportedScanlineFilter(5)));
  assert_eq!(e.kind(), PngErrorKind::InvalidData);
  assert_eq!(e.to_string(), "unsupported scanline filter 5");
}

#[test]
fn test_crc_bit_flips_are_caught() {
  let png = PixelBuffer::new(2, 1).unwrap().to_png_bytes().unwrap();
  // IHDR type + data, then its CRC, then the IDAT length
  let ihdr_span = 12..33;
  let idat_len = u32::from_be_bytes(png[33..37].try_into().unwrap()) as usize;
  let idat_span = 37..(41 + idat_len + 4);
  for span in [ihdr_span, idat_span] {
    for i in span {
      for bit in 0..8 {
        let mut bad = png.clone();
        bad[i] ^= 1 << bit;
        match PixelBuffer::from_png_bytes(&bad) {
          Err(e @ PngError::ChunkCrcMismatch { .. }) => {
            assert_eq!(e.kind(), PngErrorKind::InvalidData);
            assert!(e.to_string().starts_with("invalid chunk CRC"));
          }
          other => panic!("byte {i} bit {bit}: {other:?}"),
        }
      }
    }
  }
}

#[test]
fn test_bad_chunk_length() {
  let mut png = PixelBuffer::new(1, 1).unwrap().to_png_bytes().unwrap();
  png[8..12].copy_from_slice(&0x8000_0000_u32.to_be_bytes());
  let e = PixelBuffer::from_png_bytes(&png).unwrap_err();
  assert!(matches!(e, PngError::ChunkLengthInvalid(0x8000_0000)));
  assert!(e.to_string().starts_with("invalid chunk length"));
}

#[test]
fn test_bad_signature() {
  let mut png = PixelBuffer::new(1, 1).unwrap().to_png_bytes().unwrap();
  png[1] = b'X';
  let e = PixelBuffer::from_png_bytes(&png).unwrap_err();
  assert!(matches!(e, PngError::InvalidSignature));
  assert_eq!(e.to_string(), "invalid header");
  assert!(matches!(PixelBuffer::from_png_bytes(&[]), Err(PngError::InvalidSignature)));
}

#[test]
fn test_truncations_never_succeed() {
  let png = super::rand_buffer(4, 4).to_png_bytes().unwrap();
  // anything cut off before the IEND type is an error
  for len in 0..(png.len() - 4) {
    assert!(PixelBuffer::from_png_bytes(&png[..len]).is_err(), "len {len}");
  }
  // the IEND CRC is never read
  assert!(PixelBuffer::from_png_bytes(&png[..png.len() - 4]).is_ok());
}

#[test]
fn test_one_bit_gray() {
  let png = build_png(&header(2, 1, 1, PngColorType::Y), None, &[0, 0b0100_0000]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert_eq!(img.pixels(), &[rgb(0, 0, 0), rgb(255, 255, 255)]);
}

#[test]
fn test_four_bit_gray() {
  let png = build_png(&header(3, 1, 4, PngColorType::Y), None, &[0, 0x7F, 0x00]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert_eq!(img.pixels(), &[rgb(0x77, 0x77, 0x77), rgb(0xFF, 0xFF, 0xFF), rgb(0, 0, 0)]);
}

#[test]
fn test_two_bit_gray_with_filter() {
  // 5 pixels in 2 bytes per row, second row is Up filtered and all zero
  let png = build_png(
    &header(5, 2, 2, PngColorType::Y),
    None,
    &[0, 0b00_01_10_11, 0b11_00_00_00, 2, 0, 0],
  );
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  let expected = [0x00, 0x67, 0xB6, 0xFF, 0xFF];
  for y in 0..2 {
    for (x, v) in expected.iter().enumerate() {
      assert_eq!(img.get_pixel(x as i32, y).unwrap(), rgb(*v, *v, *v));
    }
  }
}

#[test]
fn test_gray_alpha_8bit() {
  let png = build_png(&header(2, 1, 8, PngColorType::YA), None, &[0, 10, 20, 30, 40]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert_eq!(img.pixels(), &[rgba(10, 10, 10, 20), rgba(30, 30, 30, 40)]);
}

#[test]
fn test_indexed_colors() {
  let plte = [255, 0, 0, 0, 255, 0, 0, 0, 255, 9, 9, 9];
  // 4-bit indexes 3, 0, 2 and a padding nibble
  let png = build_png(&header(3, 1, 4, PngColorType::Index), Some(&plte), &[0, 0x30, 0x20]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert_eq!(img.pixels(), &[rgb(9, 9, 9), rgb(255, 0, 0), rgb(0, 0, 255)]);

  // 1-bit with Sub, which can't change a row that's only one byte
  let png = build_png(&header(4, 1, 1, PngColorType::Index), Some(&plte), &[1, 0b1010_0000]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert_eq!(img.pixels(), &[rgb(0, 255, 0), rgb(255, 0, 0), rgb(0, 255, 0), rgb(255, 0, 0)]);
}

#[test]
fn test_palette_index_out_of_range_stays_default() {
  let plte = [255, 0, 0, 0, 255, 0];
  let png = build_png(&header(3, 1, 8, PngColorType::Index), Some(&plte), &[0, 1, 2, 255]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert_eq!(img.pixels(), &[rgb(0, 255, 0), rgba(0, 0, 0, 0), rgba(0, 0, 0, 0)]);

  // no palette at all
  let png = build_png(&header(2, 1, 8, PngColorType::Index), None, &[0, 0, 1]);
  let img = PixelBuffer::from_png_bytes(&png).unwrap();
  assert!(img.pixels().iter().all(|p| *p == r8g8b8a8_Srgb::default()));
}

#[test]
fn test_bad_palette() {
  let png = build_png(&header(1, 1, 8, PngColorType::Index), Some(&[1, 2, 3, 4]), &[0, 0]);
  assert!(matches!(PixelBuffer::from_png_bytes(&png), Err(PngError::InvalidPalette(4))));
}

#[test]
fn test_unsupported_features() {
  let mut ihdr = header(1, 1, 8, PngColorType::RGB);
  ihdr[8] = 16;
  let e = PixelBuffer::from_png_bytes(&build_png(&ihdr, None, &[0; 7])).unwrap_err();
  assert!(matches!(e, PngError::UnsupportedBitDepth { bit_depth: 16, color_type: 2 }));
  assert!(e.is_unsupported_feature());
  assert_eq!(e.kind(), PngErrorKind::InvalidData);

  let mut ihdr = header(1, 1, 8, PngColorType::RGB);
  ihdr[12] = 1;
  let e = PixelBuffer::from_png_bytes(&build_png(&ihdr, None, &[0; 4])).unwrap_err();
  assert!(matches!(e, PngError::UnsupportedInterlaceMethod(1)));
  assert!(e.is_unsupported_feature());
}

#[test]
fn test_bad_header_fields() {
  let base = header(1, 1, 8, PngColorType::RGB);
  let cases: [(usize, u8); 5] = [(8, 3), (9, 1), (10, 1), (11, 1), (12, 2)];
  for (at, value) in cases {
    let mut ihdr = base;
    ihdr[at] = value;
    let e = PixelBuffer::from_png_bytes(&build_png(&ihdr, None, &[0; 4])).unwrap_err();
    assert_eq!(e.kind(), PngErrorKind::InvalidData, "byte {at} = {value}");
    assert!(!e.is_unsupported_feature(), "byte {at} = {value}");
  }
  let zero_width = header(0, 1, 8, PngColorType::RGB);
  let e = PixelBuffer::from_png_bytes(&build_png(&zero_width, None, &[0])).unwrap_err();
  assert!(matches!(e, PngError::InvalidDimensions { width: 0, height: 1 }));
}

#[test]
fn test_size_limit_is_checked_before_inflate() {
  // the IDAT here isn't even zlib data
  let mut png = PNG_SIGNATURE.to_vec();
  write_chunk(&mut png, PngChunkType::IHDR, &[&header(20_000, 1, 8, PngColorType::Y)[..]]).unwrap();
  write_chunk(&mut png, PngChunkType::IDAT, &[&b"junk"[..]]).unwrap();
  write_chunk(&mut png, PngChunkType::IEND, &[]).unwrap();
  let tight = DecoderOptions::new().set_max_width(19_999);
  let e = PixelBuffer::load_with_options(&png[..], &tight).unwrap_err();
  assert!(matches!(e, PngError::DimensionsTooLarge { width: 20_000, height: 1 }));
  let tight = DecoderOptions::new().set_max_height(0);
  let e = PixelBuffer::load_with_options(&png[..], &tight).unwrap_err();
  assert!(matches!(e, PngError::DimensionsTooLarge { width: 20_000, height: 1 }));
  let roomy = DecoderOptions::new().set_max_width(20_000);
  let e = PixelBuffer::load_with_options(&png[..], &roomy).unwrap_err();
  assert!(matches!(e, PngError::Decompress));
  // no limit is set by default
  let e = PixelBuffer::from_png_bytes(&png).unwrap_err();
  assert!(matches!(e, PngError::Decompress));
}

#[test]
fn test_wide_image_roundtrips_with_default_options() {
  let mut img = PixelBuffer::new(17_001, 1).unwrap();
  img.set_pixel(17_000, 0, rgba(1, 2, 3, 4)).unwrap();
  img.set_pixel(0, 0, rgba(5, 6, 7, 8)).unwrap();
  let back = PixelBuffer::from_png_bytes(&img.to_png_bytes().unwrap()).unwrap();
  assert_eq!(back, img);
}

#[test]
fn test_chunk_reader_lists_chunks() {
  let png = super::rand_buffer(2, 2).to_png_bytes().unwrap();
  let mut reader = &png[..];
  read_signature(&mut reader).unwrap();
  let types: Vec<PngChunkType> = ChunkReader::new(reader).map(|c| c.unwrap().ty).collect();
  assert_eq!(types, [PngChunkType::IHDR, PngChunkType::IDAT, PngChunkType::IEND]);
}

#[test]
fn test_decoding_no_panics() {
  // every file in the test folder, even non-png files, must not panic.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let _ = PixelBuffer::from_png_bytes(&v);
    for _ in ChunkReader::new(&v[..]) {
      //
    }
  }
  // even totally random data should never panic.
  for _ in 0..10 {
    let mut v = PNG_SIGNATURE.to_vec();
    v.extend(super::rand_bytes(1024));
    let _ = PixelBuffer::from_png_bytes(&v);
    let _ = PixelBuffer::from_png_bytes(&v[8..]);
  }
  // nor should random image data behind a valid header.
  for color_type in [PngColorType::Y, PngColorType::Index] {
    for bit_depth in [1, 2, 4, 8] {
      let filtered = super::rand_bytes(9 * 3);
      let png = build_png(&header(8, 3, bit_depth, color_type), Some(&[1, 2, 3]), &filtered);
      let _ = PixelBuffer::from_png_bytes(&png);
    }
  }
}
