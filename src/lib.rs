//! # bpg-rs
//!
//! Read and write BPG images (HEVC intra-frame coding) from a generic pixel
//! pipeline, and browse a directory of images while skipping unreadable files.
//!
//! The native BPG library exchanges images as a flat record of `int`
//! samples. This crate translates between that record and a nested
//! `[row][col][channel]` grid, resolves encode options, and drives a
//! fault-tolerant directory browser on top of any [`Codec`].
//!
//! ## Features
//!
//! - Marshal a [`PixelGrid`] to a [`PixelRecord`] and back, exactly.
//! - Grayscale, RGB and RGBA images.
//! - Permissive encode options: invalid values fall back to defaults.
//! - Host formats (PNG, JPEG, ...) through the `image` crate.
//! - `.bpg` through the native library with the `native` feature
//!   (set `BPG_LIB_DIR` to the directory holding `bpg_load_save_lib`).
//! - Directory browsing with wraparound and bounded retry.
//!
//! ## Examples
//!
//! ### Reshaping a record
//!
//! ```no_run
//! use bpg_rs::{ChannelLayout, Error, PixelRecord, marshal, unmarshal};
//!
//! fn main() -> Result<(), Error> {
//!     // A 2x1 RGB image.
//!     let record = PixelRecord::new(2, 1, ChannelLayout::Rgb, vec![255, 0, 0, 0, 0, 255])?;
//!
//!     let grid = unmarshal(&record)?;
//!     assert_eq!(grid.pixel(0, 1), Some(&[0, 0, 255][..]));
//!
//!     assert_eq!(marshal(&grid)?, record);
//!     Ok(())
//! }
//! ```
//!
//! ### Encoding with options
//!
//! ```no_run
//! use std::{collections::HashMap, path::Path};
//! use bpg_rs::{Codecs, Error, OptionValue, PixelGrid, encode_grid};
//!
//! fn main() -> Result<(), Error> {
//!     let grid = PixelGrid::from_gray(vec![vec![0, 128], vec![255, 64]]);
//!
//!     let mut options = HashMap::new();
//!     options.insert("qp".to_string(), OptionValue::Int(20));
//!     options.insert("preferred_chroma_format".to_string(), OptionValue::Int(420));
//!
//!     encode_grid(&Codecs::standard(), &grid, Path::new("output.bpg"), &options)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Browsing a directory
//!
//! ```no_run
//! use bpg_rs::{Browser, CodecDecoder, Codecs, Error, FsLister, Navigation};
//!
//! fn main() -> Result<(), Error> {
//!     let mut browser = Browser::new(FsLister, CodecDecoder(Codecs::standard()));
//!
//!     browser.open("photos/first.bpg")?;
//!     println!("{}", browser.status_text());
//!
//!     if let Navigation::Shown { path, grid } = browser.step_forward()? {
//!         println!("{}: {}x{}", path.display(), grid.width(), grid.height());
//!     }
//!     Ok(())
//! }
//! ```

mod bindings;

mod types;
pub use types::*;

mod marshal;
pub use marshal::*;

mod params;
pub use params::*;

mod native;
pub use native::*;

mod codec;
pub use codec::*;

mod browser;
pub use browser::*;
