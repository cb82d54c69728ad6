#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
//! Declarations matching `bpg_load_save_lib.h`.

use libc::c_int;
#[cfg(feature = "native")]
use libc::c_char;

#[cfg(feature = "native")]
pub const DEFAULT_OUTFILENAME: &str = "out.bpg";

/// `DecodedImage` from `bpgenc.h`.
///
/// `raw_data` holds `w * h * pixel_len` row-major samples. Field order and
/// integer width must match the C definition exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct DecodedImage {
    pub w: c_int,
    pub h: c_int,
    pub pixel_len: c_int,
    pub has_alpha: c_int,
    pub is_grayscale: c_int,
    pub raw_data: *mut c_int,
}

impl DecodedImage {
    pub fn zero() -> Self {
        Self {
            w: 0,
            h: 0,
            pixel_len: 0,
            has_alpha: 0,
            is_grayscale: 0,
            raw_data: std::ptr::null_mut(),
        }
    }
}

impl Default for DecodedImage {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(feature = "native")]
unsafe extern "C" {
    pub fn load_bpg_image(filename: *mut c_char) -> DecodedImage;

    pub fn save_bpg_image(
        decoded_image: *mut DecodedImage,
        outfilename: *mut c_char,
        qp: c_int,
        lossless: c_int,
        compress_level: c_int,
        preffered_chroma_format: c_int,
        output_color_space: c_int,
    ) -> c_int;

    pub fn save_bpg_image_with_defaults(decoded_image: *mut DecodedImage) -> c_int;
}
