use std::collections::HashMap;

use crate::{ChromaFormat, ColorSpace, EncodeParameters, OptionValue};

const QUANTIZER_MAX: i64 = 51;
const COMPRESSION_LEVEL_MIN: i64 = 1;
const COMPRESSION_LEVEL_MAX: i64 = 9;

/// The encode options this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncodeOption {
    Quantizer,
    Lossless,
    CompressionLevel,
    ChromaFormat,
    ColorSpace,
}

impl EncodeOption {
    const ALL: [EncodeOption; 5] = [
        EncodeOption::Quantizer,
        EncodeOption::Lossless,
        EncodeOption::CompressionLevel,
        EncodeOption::ChromaFormat,
        EncodeOption::ColorSpace,
    ];

    /// Accepted names, in order of precedence.
    fn names(self) -> &'static [&'static str] {
        match self {
            EncodeOption::Quantizer => &["quantizer", "qp"],
            EncodeOption::Lossless => &["lossless"],
            EncodeOption::CompressionLevel => {
                &["compressionLevel", "compression_level", "compress_level"]
            }
            EncodeOption::ChromaFormat => {
                &["chromaFormat", "chroma_format", "preferred_chroma_format"]
            }
            EncodeOption::ColorSpace => &["colorSpace", "color_space"],
        }
    }

    fn apply(self, value: &OptionValue, params: &mut EncodeParameters) -> bool {
        match self {
            EncodeOption::Quantizer => match value.as_int() {
                Some(v) if (0..=QUANTIZER_MAX).contains(&v) => params.quantizer = v as u8,
                _ => return false,
            },
            EncodeOption::Lossless => match value.as_bool() {
                Some(v) => params.lossless = v,
                None => return false,
            },
            EncodeOption::CompressionLevel => match value.as_int() {
                Some(v) if (COMPRESSION_LEVEL_MIN..=COMPRESSION_LEVEL_MAX).contains(&v) => {
                    params.compression_level = v as u8
                }
                _ => return false,
            },
            EncodeOption::ChromaFormat => match value.as_int().and_then(ChromaFormat::from_code) {
                Some(v) => params.chroma_format = v,
                None => return false,
            },
            EncodeOption::ColorSpace => match value.as_int().and_then(ColorSpace::from_code) {
                Some(v) => params.color_space = v,
                None => return false,
            },
        }
        true
    }
}

/// Builds encode parameters from loosely typed options.
///
/// Recognized options that are present and valid override the default.
/// Out-of-range values and unknown option names are ignored, so this never
/// fails. When an option is given under several names, a valid value under
/// the canonical name (`quantizer`, `compressionLevel`, ...) wins over aliases
/// such as `qp` or `compress_level`.
pub fn build_encode_parameters(requested: &HashMap<String, OptionValue>) -> EncodeParameters {
    let mut params = EncodeParameters::default();

    for option in EncodeOption::ALL {
        for name in option.names() {
            let Some(value) = requested.get(*name) else {
                continue;
            };
            if option.apply(value, &mut params) {
                break;
            }
            log::debug!("ignoring invalid value {value:?} for encode option {name:?}");
        }
    }

    for name in requested.keys() {
        if !EncodeOption::ALL.iter().any(|o| o.names().contains(&name.as_str())) {
            log::debug!("ignoring unknown encode option {name:?}");
        }
    }

    params
}

/// Parses a `key=value` option as given on a command line.
pub fn parse_option(text: &str) -> Option<(String, OptionValue)> {
    let (key, value) = text.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), OptionValue::from(value.trim())))
}
