#![forbid(unsafe_code)]

//! The CRC32 used by PNG chunks (CRC-32/ISO-HDLC, reflected `0x04C11DB7`).

/// Byte-at-a-time lookup table, built at compile time.
pub const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

/// Runs more bytes through a CRC that's in progress.
///
/// This is the raw register update: start from `u32::MAX` and XOR the final
/// value with `u32::MAX`, or just use [`png_crc`].
#[inline]
#[must_use]
pub fn update_crc(mut crc: u32, bytes: &[u8]) -> u32 {
  for &byte in bytes {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// The finished CRC of all the given byte slices, in order.
#[inline]
#[must_use]
pub fn png_crc(parts: &[&[u8]]) -> u32 {
  parts.iter().fold(u32::MAX, |crc, part| update_crc(crc, part)) ^ u32::MAX
}
