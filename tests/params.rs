use bpg_rs::{
    ChromaFormat, ColorSpace, EncodeParameters, OptionValue, build_encode_parameters, parse_option,
};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn options(pairs: &[(&str, OptionValue)]) -> HashMap<String, OptionValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_defaults_when_empty() {
    let params = build_encode_parameters(&HashMap::new());
    assert_eq!(
        params,
        EncodeParameters {
            quantizer: 29,
            lossless: false,
            compression_level: 8,
            chroma_format: ChromaFormat::Yuv444,
            color_space: ColorSpace::YCbCr,
        }
    );
    assert_eq!(params, EncodeParameters::default());
}

#[test]
fn test_valid_values_applied() {
    let params = build_encode_parameters(&options(&[
        ("quantizer", OptionValue::Int(0)),
        ("lossless", OptionValue::Bool(true)),
        ("compressionLevel", OptionValue::Int(1)),
        ("chromaFormat", OptionValue::Int(420)),
        ("colorSpace", OptionValue::Int(4)),
    ]));

    assert_eq!(params.quantizer, 0);
    assert!(params.lossless);
    assert_eq!(params.compression_level, 1);
    assert_eq!(params.chroma_format, ChromaFormat::Yuv420);
    assert_eq!(params.color_space, ColorSpace::YCbCrBt2020);
}

#[test]
fn test_range_edges() {
    let params = build_encode_parameters(&options(&[
        ("quantizer", OptionValue::Int(51)),
        ("compressionLevel", OptionValue::Int(9)),
    ]));
    assert_eq!(params.quantizer, 51);
    assert_eq!(params.compression_level, 9);
}

#[test]
fn test_out_of_range_keeps_default() {
    for bad in [-1, 52, 1000] {
        let params = build_encode_parameters(&options(&[("quantizer", OptionValue::Int(bad))]));
        assert_eq!(params.quantizer, 29, "quantizer {} should be ignored", bad);
    }
    for bad in [0, 10] {
        let params =
            build_encode_parameters(&options(&[("compressionLevel", OptionValue::Int(bad))]));
        assert_eq!(params.compression_level, 8, "level {} should be ignored", bad);
    }

    let params = build_encode_parameters(&options(&[
        ("chromaFormat", OptionValue::Int(411)),
        ("lossless", OptionValue::Int(2)),
        ("colorSpace", OptionValue::Int(5)),
    ]));
    assert_eq!(params, EncodeParameters::default());
}

#[test]
fn test_unknown_names_ignored() {
    let params = build_encode_parameters(&options(&[
        ("quality", OptionValue::Int(90)),
        ("dither", OptionValue::Bool(true)),
    ]));
    assert_eq!(params, EncodeParameters::default());
}

#[test]
fn test_native_option_names() {
    let params = build_encode_parameters(&options(&[
        ("qp", OptionValue::Int(2)),
        ("compress_level", OptionValue::Int(3)),
        ("preferred_chroma_format", OptionValue::Int(422)),
        ("color_space", OptionValue::Int(1)),
    ]));

    assert_eq!(params.quantizer, 2);
    assert_eq!(params.compression_level, 3);
    assert_eq!(params.chroma_format, ChromaFormat::Yuv422);
    // The chroma option must not leak into lossless.
    assert!(!params.lossless);
    assert_eq!(params.color_space, ColorSpace::Rgb);
}

#[test]
fn test_canonical_name_wins_over_alias() {
    let params = build_encode_parameters(&options(&[
        ("quantizer", OptionValue::Int(10)),
        ("qp", OptionValue::Int(40)),
    ]));
    assert_eq!(params.quantizer, 10);

    // An invalid canonical value falls through to a valid alias.
    let params = build_encode_parameters(&options(&[
        ("quantizer", OptionValue::Int(99)),
        ("qp", OptionValue::Int(40)),
    ]));
    assert_eq!(params.quantizer, 40);
}

#[test]
fn test_lossless_accepts_integers_and_text() {
    let params = build_encode_parameters(&options(&[("lossless", OptionValue::Int(1))]));
    assert!(params.lossless);

    let params = build_encode_parameters(&options(&[("lossless", OptionValue::from("true"))]));
    assert!(params.lossless);

    let params = build_encode_parameters(&options(&[("lossless", OptionValue::from("maybe"))]));
    assert!(!params.lossless);
}

#[test]
fn test_text_values_parsed() {
    let params = build_encode_parameters(&options(&[
        ("qp", OptionValue::from("12")),
        ("chromaFormat", OptionValue::from(" 420 ")),
        ("compressionLevel", OptionValue::from("fast")),
    ]));
    assert_eq!(params.quantizer, 12);
    assert_eq!(params.chroma_format, ChromaFormat::Yuv420);
    assert_eq!(params.compression_level, 8);
}

#[test]
fn test_parse_option() {
    assert_eq!(
        parse_option("qp=20"),
        Some(("qp".to_string(), OptionValue::from("20")))
    );
    assert_eq!(
        parse_option(" lossless = 1 "),
        Some(("lossless".to_string(), OptionValue::from("1")))
    );
    assert_eq!(parse_option("qp"), None);
    assert_eq!(parse_option("=5"), None);
}
