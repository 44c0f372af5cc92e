/*!
 * Unit tests for the embedded locale-mapping codec
 */

use lingostore::codec::{LocaleMap, LocalizedValue, decode, decode_map, encode};
use lingostore::errors::CodecError;

#[test]
fn test_encode_writeOrderAcrossLocales_shouldNotAffectReads() {
    // en then ar
    let forward = {
        let raw = encode(None, None, "A".into(), "en").unwrap();
        encode(Some(&raw), None, "ب".into(), "ar").unwrap()
    };
    // ar then en
    let reverse = {
        let raw = encode(None, None, "ب".into(), "ar").unwrap();
        encode(Some(&raw), None, "A".into(), "en").unwrap()
    };

    for raw in [forward, reverse] {
        assert_eq!(decode(Some(&raw), "en").unwrap().as_deref(), Some("A"));
        assert_eq!(decode(Some(&raw), "ar").unwrap().as_deref(), Some("ب"));
    }
}

#[test]
fn test_encode_repeatedWritesToSameLocale_shouldKeepLastValue() {
    let first = encode(None, None, "draft".into(), "en").unwrap();
    let second = encode(None, Some(&first), "final".into(), "en").unwrap();

    assert_eq!(decode(Some(&second), "en").unwrap().as_deref(), Some("final"));
}

#[test]
fn test_encode_mapValue_shouldDropLocalesAbsentFromMap() {
    let prior = encode(None, None, "kept?".into(), "en").unwrap();

    let mut mapping = LocaleMap::new();
    mapping.insert("fr".to_string(), Some("gardé".to_string()));
    let raw = encode(Some(&prior), None, LocalizedValue::Map(mapping), "en").unwrap();

    assert_eq!(decode(Some(&raw), "en").unwrap(), None);
    assert_eq!(decode(Some(&raw), "fr").unwrap().as_deref(), Some("gardé"));
}

#[test]
fn test_decodeMap_withMalformedJson_shouldReportDetail() {
    let err = decode_map(Some("[1, 2")).unwrap_err();

    match err {
        CodecError::MalformedData { detail } => assert!(!detail.is_empty()),
        other => panic!("expected MalformedData, got {:?}", other),
    }
}

#[test]
fn test_decode_withNonObjectJson_shouldFail() {
    // Valid JSON, but not a locale mapping
    assert!(decode(Some("[\"en\"]"), "en").is_err());
    assert!(decode(Some("42"), "en").is_err());
}
