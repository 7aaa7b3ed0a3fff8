#![forbid(unsafe_code)]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

//! A small PNG codec.
//!
//! The crate converts between a [`PixelBuffer`] (an owned grid of RGBA pixels)
//! and PNG streams. See the [`png`] module for which PNG files can be read and
//! what gets written.
//!
//! ```no_run
//! use pngbuf::{r8g8b8a8_Srgb, PixelBuffer};
//! # fn main() -> pngbuf::PngResult<()> {
//! let mut img = PixelBuffer::new(16, 16)?;
//! img.set_pixel(3, 4, r8g8b8a8_Srgb { r: 255, g: 0, b: 0, a: 255 })?;
//! img.save_file("red_dot.png")?;
//!
//! let back = PixelBuffer::load_file("red_dot.png")?;
//! assert_eq!(back, img);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//! Progress is reported through the [`log`] facade: `debug` for each stage of
//! a load or save, `trace` for each chunk, and `warn` when tolerated oddities
//! turn up in a file. Nothing is printed unless the application installs a
//! logger.

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub use pixel_formats::r8g8b8a8_Srgb;

pub mod error;
pub use error::*;

pub mod png;
pub use png::{DecoderOptions, PNG_SIGNATURE};

mod pixel_buffer;
pub use pixel_buffer::*;
