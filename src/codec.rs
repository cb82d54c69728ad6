use std::{collections::HashMap, io::ErrorKind, path::Path};

use image::{DynamicImage, ImageBuffer, ImageError, ImageFormat, Pixel};

use crate::{
    ChannelLayout, EncodeParameters, Error, OptionValue, PixelGrid, PixelRecord,
    build_encode_parameters, marshal, unmarshal,
};

/// A file codec producing and consuming flat pixel records.
pub trait Codec {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether this codec should be asked to decode `path`, judged by its extension.
    fn can_read(&self, path: &Path) -> bool;

    /// Whether this codec should be asked to encode to `path`, judged by its extension.
    fn can_write(&self, path: &Path) -> bool;

    fn decode(&self, path: &Path) -> Result<PixelRecord, Error>;

    fn encode(
        &self,
        record: &PixelRecord,
        path: &Path,
        params: &EncodeParameters,
    ) -> Result<(), Error>;
}

/// Decodes `path` and reshapes the result into a pixel grid.
pub fn decode_grid<C: Codec + ?Sized>(codec: &C, path: &Path) -> Result<PixelGrid, Error> {
    let record = codec.decode(path)?;
    unmarshal(&record)
}

/// Flattens `grid`, resolves `options` into encode parameters and writes `path`.
pub fn encode_grid<C: Codec + ?Sized>(
    codec: &C,
    grid: &PixelGrid,
    path: &Path,
    options: &HashMap<String, OptionValue>,
) -> Result<(), Error> {
    let record = marshal(grid)?;
    let params = build_encode_parameters(options);
    codec.encode(&record, path, &params)
}

/// Host image formats (PNG, JPEG, ...) through the `image` crate.
///
/// Sources deeper than 8 bits decode at 16 bits per sample. Records whose
/// samples all fit in a byte are written at 8 bits, anything wider at 16.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn name(&self) -> &str {
        "image"
    }

    fn can_read(&self, path: &Path) -> bool {
        ImageFormat::from_path(path).is_ok()
    }

    fn can_write(&self, path: &Path) -> bool {
        ImageFormat::from_path(path).is_ok()
    }

    fn decode(&self, path: &Path) -> Result<PixelRecord, Error> {
        let img = image::open(path).map_err(|e| match e {
            ImageError::IoError(io) if io.kind() == ErrorKind::NotFound => Error::FileNotFound,
            e => Error::DecodingFailed(format!("{}: {e}", path.display())),
        })?;

        let color = img.color();
        let wide = color.bytes_per_pixel() / color.channel_count() > 1;
        let layout = if color.channel_count() == 1 {
            ChannelLayout::Gray
        } else if color.has_alpha() {
            ChannelLayout::Rgba
        } else {
            ChannelLayout::Rgb
        };

        let (width, height, samples) = match (layout, wide) {
            (ChannelLayout::Gray, false) => widen(img.into_luma8()),
            (ChannelLayout::Rgb, false) => widen(img.into_rgb8()),
            (ChannelLayout::Rgba, false) => widen(img.into_rgba8()),
            (ChannelLayout::Gray, true) => widen(img.into_luma16()),
            (ChannelLayout::Rgb, true) => widen(img.into_rgb16()),
            (ChannelLayout::Rgba, true) => widen(img.into_rgba16()),
        };

        PixelRecord::new(width, height, layout, samples)
            .map_err(|e| Error::DecodingFailed(format!("{}: {e}", path.display())))
    }

    fn encode(
        &self,
        record: &PixelRecord,
        path: &Path,
        params: &EncodeParameters,
    ) -> Result<(), Error> {
        log::debug!(
            "{}: encode parameters {params:?} do not apply to host formats",
            path.display()
        );

        let (width, height) = (record.width(), record.height());
        let img = if record.samples().iter().any(|&v| v > u8::MAX as i32) {
            let data: Vec<u16> = narrow(record.samples(), u16::MAX);
            match record.layout() {
                ChannelLayout::Gray => {
                    ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageLuma16)
                }
                ChannelLayout::Rgb => {
                    ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb16)
                }
                ChannelLayout::Rgba => {
                    ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba16)
                }
            }
        } else {
            let data: Vec<u8> = narrow(record.samples(), u8::MAX);
            match record.layout() {
                ChannelLayout::Gray => {
                    ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageLuma8)
                }
                ChannelLayout::Rgb => {
                    ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgb8)
                }
                ChannelLayout::Rgba => {
                    ImageBuffer::from_raw(width, height, data).map(DynamicImage::ImageRgba8)
                }
            }
        }
        .ok_or_else(|| Error::MalformedRecord("sample buffer does not match dimensions".into()))?;

        img.save(path)
            .map_err(|e| Error::EncodingFailed(format!("{}: {e}", path.display())))
    }
}

fn widen<P>(buf: ImageBuffer<P, Vec<P::Subpixel>>) -> (u32, u32, Vec<i32>)
where
    P: Pixel,
    P::Subpixel: Into<i32>,
{
    let (width, height) = buf.dimensions();
    let samples = buf.into_raw().into_iter().map(Into::into).collect();
    (width, height, samples)
}

fn narrow<T>(samples: &[i32], max: T) -> Vec<T>
where
    T: Copy + Into<i32> + TryFrom<i32>,
{
    let top = max.into();
    samples
        .iter()
        .map(|&v| T::try_from(v.clamp(0, top)).unwrap_or(max))
        .collect()
}

/// An ordered set of codecs; the first one accepting a path's extension handles it.
#[derive(Default)]
pub struct Codecs {
    codecs: Vec<Box<dyn Codec>>,
}

impl Codecs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The native BPG codec (when built with the `native` feature), then host formats.
    pub fn standard() -> Self {
        let codecs = Self::new();
        #[cfg(feature = "native")]
        let codecs = codecs.with(crate::NativeCodec);
        codecs.with(ImageCodec)
    }

    pub fn with(mut self, codec: impl Codec + 'static) -> Self {
        self.codecs.push(Box::new(codec));
        self
    }

    pub fn reader_for(&self, path: &Path) -> Result<&dyn Codec, Error> {
        self.codecs
            .iter()
            .find(|c| c.can_read(path))
            .map(|c| c.as_ref())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
    }

    pub fn writer_for(&self, path: &Path) -> Result<&dyn Codec, Error> {
        self.codecs
            .iter()
            .find(|c| c.can_write(path))
            .map(|c| c.as_ref())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
    }
}

impl Codec for Codecs {
    fn name(&self) -> &str {
        "dispatch"
    }

    fn can_read(&self, path: &Path) -> bool {
        self.codecs.iter().any(|c| c.can_read(path))
    }

    fn can_write(&self, path: &Path) -> bool {
        self.codecs.iter().any(|c| c.can_write(path))
    }

    fn decode(&self, path: &Path) -> Result<PixelRecord, Error> {
        let codec = self.reader_for(path)?;
        log::debug!("decoding {} with {}", path.display(), codec.name());
        codec.decode(path)
    }

    fn encode(
        &self,
        record: &PixelRecord,
        path: &Path,
        params: &EncodeParameters,
    ) -> Result<(), Error> {
        let codec = self.writer_for(path)?;
        log::debug!("encoding {} with {}", path.display(), codec.name());
        codec.encode(record, path, params)
    }
}
