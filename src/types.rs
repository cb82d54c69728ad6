use std::path::PathBuf;

/// Represents errors that can occur while marshaling, decoding, encoding or browsing BPG images.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A flat pixel record does not satisfy its layout invariants.
    #[error("Malformed pixel record: {0}")]
    MalformedRecord(String),
    /// A pixel grid is ragged, empty, or has an unsupported channel count.
    #[error("Malformed pixel grid: {0}")]
    MalformedGrid(String),
    /// Decoding a file failed. Contains a message from the codec.
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),
    /// Encoding to a file failed. Contains a message from the codec.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
    /// The specified file could not be found.
    #[error("File not found")]
    FileNotFound,
    /// The opened file is not part of its own directory listing.
    #[error("{} is not in its directory listing", .0.display())]
    FileNotInDirectory(PathBuf),
    /// Every file of the directory failed to decode in the current pass.
    #[error("No readable image in {}", .0.display())]
    NoReadableFile(PathBuf),
    /// Navigation was requested before any directory was opened.
    #[error("No browse session is open")]
    NoSession,
    /// No codec handles the file's extension.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    /// An I/O error occurred during file reading, writing or listing.
    #[error("I/O error occurred: {0}")]
    IoError(String),
}

/// Channel arrangement of a pixel.
///
/// The native record carries this as a channel count plus two redundant
/// flags; internally it is always one of these three tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// 1 sample per pixel.
    Gray,
    /// 3 samples per pixel: R, G, B.
    Rgb,
    /// 4 samples per pixel: R, G, B, then A.
    Rgba,
}

impl ChannelLayout {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    pub fn from_channel_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Gray),
            3 => Some(ChannelLayout::Rgb),
            4 => Some(ChannelLayout::Rgba),
            _ => None,
        }
    }

    pub fn has_alpha(self) -> bool {
        self == ChannelLayout::Rgba
    }

    pub fn is_grayscale(self) -> bool {
        self == ChannelLayout::Gray
    }

    /// `width * height * channels`, or `None` if it does not fit in `usize`.
    pub fn sample_count(self, width: usize, height: usize) -> Option<usize> {
        width
            .checked_mul(height)?
            .checked_mul(self.channel_count())
    }
}

/// A flat, row-major pixel buffer with explicit dimensions.
///
/// The sample at row `y`, column `x`, channel `c` lives at
/// `y * width * channels + x * channels + c`. The fields are private so that
/// `samples.len() == width * height * channels` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRecord {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    samples: Vec<i32>,
}

impl PixelRecord {
    /// Builds a record, checking dimensions and sample count.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        samples: Vec<i32>,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::MalformedRecord(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = layout
            .sample_count(width as usize, height as usize)
            .ok_or_else(|| {
                Error::MalformedRecord(format!(
                    "{width}x{height}x{} overflows the sample count",
                    layout.channel_count()
                ))
            })?;
        if samples.len() != expected {
            return Err(Error::MalformedRecord(format!(
                "expected {expected} samples for {width}x{height}x{}, got {}",
                layout.channel_count(),
                samples.len()
            )));
        }
        Ok(PixelRecord {
            width,
            height,
            layout,
            samples,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channel_count(&self) -> usize {
        self.layout.channel_count()
    }

    pub fn has_alpha(&self) -> bool {
        self.layout.has_alpha()
    }

    pub fn is_grayscale(&self) -> bool {
        self.layout.is_grayscale()
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }
}

/// A `[row][col][channel]` image as handed to the rest of the pipeline.
///
/// Rows are plain nested vectors, so a grid built by hand may be ragged;
/// [`crate::marshal`] rejects such grids with [`Error::MalformedGrid`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelGrid {
    pub rows: Vec<Vec<Vec<i32>>>,
}

impl PixelGrid {
    pub fn new(rows: Vec<Vec<Vec<i32>>>) -> Self {
        PixelGrid { rows }
    }

    /// Wraps a 2-dimensional grayscale grid, giving every cell one channel.
    pub fn from_gray(rows: Vec<Vec<i32>>) -> Self {
        PixelGrid {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|v| vec![v]).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn channel_count(&self) -> usize {
        self.rows
            .first()
            .and_then(|row| row.first())
            .map_or(0, Vec::len)
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<&[i32]> {
        self.rows.get(row)?.get(col).map(Vec::as_slice)
    }
}

/// Chroma subsampling requested from the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaFormat {
    Yuv444 = 444,
    Yuv422 = 422,
    Yuv420 = 420,
}

impl ChromaFormat {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            444 => Some(ChromaFormat::Yuv444),
            422 => Some(ChromaFormat::Yuv422),
            420 => Some(ChromaFormat::Yuv420),
            _ => None,
        }
    }
}

/// Output color space of the encoded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    YCbCr = 0,
    Rgb = 1,
    YCgCo = 2,
    YCbCrBt709 = 3,
    YCbCrBt2020 = 4,
}

impl ColorSpace {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ColorSpace::YCbCr),
            1 => Some(ColorSpace::Rgb),
            2 => Some(ColorSpace::YCgCo),
            3 => Some(ColorSpace::YCbCrBt709),
            4 => Some(ColorSpace::YCbCrBt2020),
            _ => None,
        }
    }
}

/// Options for controlling the BPG encoding process.
///
/// Build from loosely typed options with [`crate::build_encode_parameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeParameters {
    /// Quantizer parameter, 0 to 51. Smaller gives better quality. Defaults to 29.
    pub quantizer: u8,
    /// Lossless mode. Defaults to `false`.
    pub lossless: bool,
    /// Compression level, 1 (fast) to 9 (slow). Defaults to 8.
    pub compression_level: u8,
    /// Preferred chroma format. Defaults to 4:4:4.
    pub chroma_format: ChromaFormat,
    /// Output color space. Defaults to YCbCr.
    pub color_space: ColorSpace,
}

impl Default for EncodeParameters {
    fn default() -> Self {
        EncodeParameters {
            quantizer: 29,
            lossless: false,
            compression_level: 8,
            chroma_format: ChromaFormat::Yuv444,
            color_space: ColorSpace::YCbCr,
        }
    }
}

/// A loosely typed encode option value, as supplied by callers of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl OptionValue {
    /// Integer view of the value. Booleans map to 0/1 and text is parsed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            OptionValue::Bool(b) => Some(i64::from(*b)),
            OptionValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Boolean view of the value. Only 0 and 1 count as integers here.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Int(0) => Some(false),
            OptionValue::Int(1) => Some(true),
            OptionValue::Int(_) => None,
            OptionValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "no" | "off" => Some(false),
                "1" | "true" | "yes" | "on" => Some(true),
                _ => None,
            },
        }
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}
