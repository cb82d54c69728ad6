use libc::c_int;

use crate::{ChannelLayout, Error, PixelRecord, bindings::DecodedImage};

/// The record layout shared with the native BPG library.
pub type NativeImage = DecodedImage;

impl PixelRecord {
    /// Copies a record out of a native image, checking every layout invariant.
    ///
    /// # Safety
    ///
    /// If `image.raw_data` is non-null it must point to at least
    /// `w * h * pixel_len` readable `c_int`s.
    pub unsafe fn from_native(image: &NativeImage) -> Result<Self, Error> {
        let layout = native_layout(image)?;
        if image.raw_data.is_null() {
            return Err(Error::MalformedRecord("null sample buffer".to_string()));
        }

        let len = layout
            .sample_count(image.w as usize, image.h as usize)
            .ok_or_else(|| {
                Error::MalformedRecord(format!("{}x{} overflows the sample count", image.w, image.h))
            })?;

        let samples = unsafe { std::slice::from_raw_parts(image.raw_data, len) }.to_vec();
        PixelRecord::new(image.w as u32, image.h as u32, layout, samples)
    }
}

fn native_layout(image: &NativeImage) -> Result<ChannelLayout, Error> {
    if image.w <= 0 || image.h <= 0 {
        return Err(Error::MalformedRecord(format!(
            "dimensions must be positive, got {}x{}",
            image.w, image.h
        )));
    }
    let layout = usize::try_from(image.pixel_len)
        .ok()
        .and_then(ChannelLayout::from_channel_count)
        .ok_or_else(|| {
            Error::MalformedRecord(format!("unsupported channel count {}", image.pixel_len))
        })?;
    if (image.has_alpha != 0) != layout.has_alpha() {
        return Err(Error::MalformedRecord(format!(
            "has_alpha={} contradicts {} channels",
            image.has_alpha, image.pixel_len
        )));
    }
    if (image.is_grayscale != 0) != layout.is_grayscale() {
        return Err(Error::MalformedRecord(format!(
            "is_grayscale={} contradicts {} channels",
            image.is_grayscale, image.pixel_len
        )));
    }
    Ok(layout)
}

/// A native image that borrows nothing: it owns a copy of the samples its
/// `raw_data` points at, so it can be handed to the encoder as `*mut`.
pub struct NativeBuffer {
    image: NativeImage,
    samples: Vec<c_int>,
}

impl NativeBuffer {
    pub fn new(record: &PixelRecord) -> Self {
        let image = NativeImage {
            w: record.width() as c_int,
            h: record.height() as c_int,
            pixel_len: record.channel_count() as c_int,
            has_alpha: c_int::from(record.has_alpha()),
            is_grayscale: c_int::from(record.is_grayscale()),
            raw_data: std::ptr::null_mut(),
        };
        NativeBuffer {
            image,
            samples: record.samples().to_vec(),
        }
    }

    pub fn image(&self) -> &NativeImage {
        &self.image
    }

    pub fn samples(&self) -> &[c_int] {
        &self.samples
    }

    /// Pointer for the native call. Valid while `self` is alive and not moved.
    pub fn as_mut_ptr(&mut self) -> *mut NativeImage {
        self.image.raw_data = self.samples.as_mut_ptr();
        &mut self.image
    }
}

#[cfg(feature = "native")]
pub use self::ffi_codec::NativeCodec;

#[cfg(feature = "native")]
mod ffi_codec {
    use std::{ffi::CString, path::Path};

    use libc::{c_char, c_int};

    use super::NativeBuffer;
    use crate::{
        Codec, EncodeParameters, Error, PixelRecord,
        bindings::{
            DEFAULT_OUTFILENAME, load_bpg_image, save_bpg_image, save_bpg_image_with_defaults,
        },
    };

    // Sample buffer allocated by the C library with malloc.
    struct NativeAllocation(*mut c_int);

    impl Drop for NativeAllocation {
        fn drop(&mut self) {
            unsafe {
                if !self.0.is_null() {
                    libc::free(self.0.cast());
                }
            }
        }
    }

    /// Reads and writes `.bpg` files through the native BPG library.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NativeCodec;

    impl NativeCodec {
        /// Writes `out.bpg` in the working directory with the library's defaults.
        pub fn encode_with_defaults(&self, record: &PixelRecord) -> Result<(), Error> {
            let mut buffer = NativeBuffer::new(record);
            let status = unsafe { save_bpg_image_with_defaults(buffer.as_mut_ptr()) };
            if status != 0 {
                return Err(Error::EncodingFailed(format!(
                    "{DEFAULT_OUTFILENAME}: native encoder returned {status}"
                )));
            }
            Ok(())
        }
    }

    fn c_path(path: &Path) -> Result<CString, String> {
        let text = path
            .to_str()
            .ok_or_else(|| format!("{} is not valid UTF-8", path.display()))?;
        CString::new(text).map_err(|_| format!("{} contains a NUL byte", path.display()))
    }

    fn is_bpg(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("bpg"))
    }

    impl Codec for NativeCodec {
        fn name(&self) -> &str {
            "bpg"
        }

        fn can_read(&self, path: &Path) -> bool {
            is_bpg(path)
        }

        fn can_write(&self, path: &Path) -> bool {
            is_bpg(path)
        }

        fn decode(&self, path: &Path) -> Result<PixelRecord, Error> {
            if !path.is_file() {
                return Err(Error::FileNotFound);
            }
            let filename = c_path(path).map_err(Error::DecodingFailed)?;

            let image = unsafe { load_bpg_image(filename.as_ptr() as *mut c_char) };
            let _allocation = NativeAllocation(image.raw_data);

            if image.raw_data.is_null() {
                return Err(Error::DecodingFailed(format!(
                    "{}: native decoder returned no pixels",
                    path.display()
                )));
            }
            unsafe { PixelRecord::from_native(&image) }
                .map_err(|e| Error::DecodingFailed(format!("{}: {e}", path.display())))
        }

        fn encode(
            &self,
            record: &PixelRecord,
            path: &Path,
            params: &EncodeParameters,
        ) -> Result<(), Error> {
            let filename = c_path(path).map_err(Error::EncodingFailed)?;
            let mut buffer = NativeBuffer::new(record);

            let status = unsafe {
                save_bpg_image(
                    buffer.as_mut_ptr(),
                    filename.as_ptr() as *mut c_char,
                    c_int::from(params.quantizer),
                    c_int::from(params.lossless),
                    c_int::from(params.compression_level),
                    params.chroma_format as c_int,
                    params.color_space as c_int,
                )
            };

            if status != 0 {
                return Err(Error::EncodingFailed(format!(
                    "{}: native encoder returned {status}",
                    path.display()
                )));
            }
            Ok(())
        }
    }
}
