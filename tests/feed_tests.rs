// Host-side tests for feed parsing, record validation and configuration.

use globe_core::{
    format_population, parse_feed, parse_numeral, CountryRecord, GlobeConfig, Population,
    RecordError, RotationMode,
};

fn record(name: &str, latlng: Option<Vec<f64>>, population: Population) -> CountryRecord {
    CountryRecord {
        name: name.to_string(),
        latlng,
        population,
    }
}

#[test]
fn parses_numbers_and_numeral_strings() {
    let json = r#"[
        {"name": "Mexico", "latlng": [23.6345, -102.5528], "population": 128932753},
        {"name": "Norway", "latlng": [60.472, 8.4689], "population": "5,379,475"}
    ]"#;
    let records = parse_feed(json).unwrap();
    assert_eq!(records.len(), 2);

    let mexico = records[0].validate(0).unwrap();
    assert_eq!(mexico.label, "Mexico");
    assert!((mexico.coordinate.latitude - 23.6345).abs() < 1e-4);
    assert!((mexico.coordinate.longitude + 102.5528).abs() < 1e-4);
    assert_eq!(mexico.metric, 128_932_753.0);

    let norway = records[1].validate(1).unwrap();
    assert_eq!(norway.metric, 5_379_475.0);
}

#[test]
fn malformed_feed_is_a_parse_error() {
    assert!(parse_feed("{not json").is_err());
    assert!(parse_feed(r#"[{"latlng": [0, 0], "population": 1}]"#).is_err());
}

#[test]
fn numeral_parsing() {
    assert_eq!(parse_numeral("42"), Some(42.0));
    assert_eq!(parse_numeral("  1,234,567 "), Some(1_234_567.0));
    assert_eq!(parse_numeral("1_000"), Some(1000.0));
    assert_eq!(parse_numeral("12.5"), Some(12.5));
    assert_eq!(parse_numeral("-5"), Some(-5.0));
    assert_eq!(parse_numeral("abc"), None);
    assert_eq!(parse_numeral(""), None);
    assert_eq!(parse_numeral("12abc"), None);
    assert_eq!(parse_numeral(",100"), None);
    assert_eq!(parse_numeral("1."), None);
    assert_eq!(parse_numeral("NaN"), None);
    assert_eq!(parse_numeral("inf"), None);
}

#[test]
fn numeral_grouping_must_be_thousands() {
    assert_eq!(parse_numeral("5,379,475"), Some(5_379_475.0));
    assert_eq!(parse_numeral("12345"), Some(12_345.0));
    assert_eq!(parse_numeral("1,2,3"), None);
    assert_eq!(parse_numeral("1234,567"), None);
    assert_eq!(parse_numeral("12,34"), None);
    assert_eq!(parse_numeral("1,,000"), None);
    assert_eq!(parse_numeral("1,000,"), None);
}

#[test]
fn rejects_negative_and_unparseable_population() {
    let neg = record("Neg", Some(vec![0.0, 0.0]), Population::Number(-5.0));
    assert!(matches!(
        neg.validate(3),
        Err(RecordError::NegativePopulation { index: 3, .. })
    ));

    let neg_text = record("NegText", Some(vec![0.0, 0.0]), Population::Text("-5".into()));
    assert!(matches!(
        neg_text.validate(4),
        Err(RecordError::NegativePopulation { index: 4, .. })
    ));

    let abc = record("Abc", Some(vec![0.0, 0.0]), Population::Text("abc".into()));
    let err = abc.validate(5).unwrap_err();
    assert!(matches!(err, RecordError::UnparseablePopulation { .. }));
    assert_eq!(err.index(), 5);
    assert!(err.to_string().contains("Abc"));
}

#[test]
fn rejects_bad_coordinates() {
    let missing = record("Nowhere", None, Population::Number(1.0));
    assert!(matches!(
        missing.validate(0),
        Err(RecordError::MissingCoordinate { .. })
    ));

    let short = record("Short", Some(vec![1.0]), Population::Number(1.0));
    assert!(matches!(
        short.validate(0),
        Err(RecordError::CoordinateArity { len: 1, .. })
    ));

    let nan = record("Nan", Some(vec![f64::NAN, 0.0]), Population::Number(1.0));
    assert!(matches!(
        nan.validate(0),
        Err(RecordError::NonFiniteCoordinate { .. })
    ));
}

#[test]
fn rejects_non_finite_population() {
    let inf = record("Inf", Some(vec![0.0, 0.0]), Population::Number(f64::INFINITY));
    assert!(matches!(
        inf.validate(0),
        Err(RecordError::NonFinitePopulation { .. })
    ));
}

#[test]
fn zero_population_is_valid() {
    let zero = record("Empty", Some(vec![0.0, 0.0]), Population::Number(0.0));
    assert_eq!(zero.validate(0).unwrap().metric, 0.0);
}

#[test]
fn population_display_uses_thousands_grouping() {
    assert_eq!(format_population(0.0), "0");
    assert_eq!(format_population(999.0), "999");
    assert_eq!(format_population(1000.0), "1,000");
    assert_eq!(format_population(128_932_753.0), "128,932,753");
    assert_eq!(format_population(1_402_112_000.0), "1,402,112,000");
    assert_eq!(format_population(1234.6), "1,235");
}

#[test]
fn config_override_keeps_unspecified_defaults() {
    let json = r#"{
        "globe_radius": 6.0,
        "rotation": {"mode": "pointer_driven", "max_tilt": 1.0, "duration_sec": 0.5},
        "marker": {"base_opacity": 0.25}
    }"#;
    let cfg = GlobeConfig::from_json_str(json).unwrap();
    let defaults = GlobeConfig::default();
    assert_eq!(cfg.globe_radius, 6.0);
    assert_eq!(
        cfg.rotation,
        RotationMode::PointerDriven {
            max_tilt: 1.0,
            duration_sec: 0.5
        }
    );
    assert_eq!(cfg.marker.base_opacity, 0.25);
    assert_eq!(cfg.marker.highlight_opacity, defaults.marker.highlight_opacity);
    assert_eq!(cfg.pulse, defaults.pulse);
    assert_eq!(cfg.camera, defaults.camera);
}

#[test]
fn config_parse_errors_are_reported() {
    assert!(GlobeConfig::from_json_str("{\"globe_radius\": \"big\"}").is_err());
    assert!(GlobeConfig::from_json_str("{\"rotation\": {\"mode\": \"spin\"}}").is_err());
}

#[test]
fn bundled_country_data_is_valid() {
    let json = include_str!("../data/countries.json");
    let records = parse_feed(json).unwrap();
    assert!(records.len() >= 6);
    for (i, r) in records.iter().enumerate() {
        assert!(r.validate(i).is_ok(), "bundled record {i} ({}) rejected", r.name);
    }
}
