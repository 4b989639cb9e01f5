//! Property-based tests for ndjson_logger using proptest

use ndjson_logger::prelude::*;
use ndjson_logger::{fields, resolve};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn memory_logger() -> (Logger, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .sink(sink.clone())
        .caller_resolver(NoopResolver)
        .terminator(RecordingTerminator::new())
        .build()
        .unwrap();
    (logger, sink)
}

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn scalar_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<i64>().prop_map(FieldValue::Int),
        any::<bool>().prop_map(FieldValue::Bool),
        "[a-z0-9 ]{0,12}".prop_map(FieldValue::String),
        Just(FieldValue::Null),
    ]
}

fn field_map() -> impl Strategy<Value = Fields> {
    prop::collection::btree_map("[a-e]", scalar_value(), 0..5)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Names are total over every raw value
    #[test]
    fn test_level_name_is_total(raw in any::<i64>()) {
        let name = LogLevel::name_of(raw);
        if (0..=4).contains(&raw) {
            prop_assert_eq!(name, LogLevel::try_from(raw).unwrap().to_str());
        } else {
            prop_assert_eq!(name, "UNKNOWN");
        }
    }

    /// Display, to_str and parsing agree
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        prop_assert_eq!(format!("{}", level), level.to_str());
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(parsed, level);
    }

    /// Ordering follows the numeric value
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
        prop_assert_eq!(a == b, (a as u8) == (b as u8));
    }
}

// ============================================================================
// Message Round-trip Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any message is recoverable verbatim from the emitted line
    #[test]
    fn test_message_roundtrip(message in ".*", level in any_level()) {
        let (logger, sink) = memory_logger();
        logger.log(&LogContext::background(), level, message.clone());

        let lines = sink.lines();
        prop_assert_eq!(lines.len(), 1);
        let entry = LogEntry::from_json(&lines[0]).unwrap();
        prop_assert_eq!(entry.message, message);
        prop_assert_eq!(entry.level, level.to_str());
    }

    /// Arbitrary unicode, including control characters, stays on one line
    #[test]
    fn test_unicode_stays_on_one_line(message in "\\PC*[\n\r\u{2028}]\\PC*") {
        let (logger, sink) = memory_logger();
        logger.log_http(&LogContext::background(), LogLevel::Info, message.clone(), 200, 0.5);

        let contents = sink.contents();
        prop_assert_eq!(contents.matches('\n').count(), 1);
        prop_assert!(contents.ends_with('\n'));
        let entry = LogEntry::from_json(contents.trim_end_matches('\n')).unwrap();
        prop_assert_eq!(entry.message, message);
    }

    /// Code and duration appear exactly when non-zero
    #[test]
    fn test_http_omission(code in prop_oneof![Just(0u16), 100u16..600], millis in prop_oneof![Just(0u32), 1u32..100_000]) {
        let (logger, sink) = memory_logger();
        let duration = f64::from(millis) / 1000.0;
        logger.log_http(&LogContext::background(), LogLevel::Info, "req", code, duration);

        let line = &sink.json_lines().unwrap()[0];
        prop_assert_eq!(line.get("code").is_some(), code != 0);
        prop_assert_eq!(line.get("duration").is_some(), millis != 0);
        if code != 0 {
            prop_assert_eq!(line["code"].as_u64(), Some(u64::from(code)));
        }
        if millis != 0 {
            prop_assert_eq!(line["duration"].as_f64(), Some(duration));
        }
    }
}

// ============================================================================
// Attribute Resolution Tests
// ============================================================================

proptest! {
    /// Context values win; every key from either side survives
    #[test]
    fn test_context_wins(defaults in field_map(), context in field_map()) {
        let ctx = LogContext::background().with_fields(context.clone());
        let merged = resolve(&defaults, Some(&ctx));

        let mut expected: BTreeMap<_, _> = defaults.clone();
        expected.extend(context.clone());
        prop_assert_eq!(&merged, &expected);
        for (key, value) in &context {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    /// The emitted attributes match the merge
    #[test]
    fn test_emitted_attributes_match_merge(defaults in field_map(), context in field_map()) {
        let (root, sink) = memory_logger();
        let logger = root.with_fields(defaults.clone());
        let ctx = LogContext::background().with_fields(context.clone());

        logger.log(&ctx, LogLevel::Info, "attrs");

        let entry = LogEntry::from_json(&sink.lines()[0]).unwrap();
        prop_assert_eq!(entry.attributes, resolve(&defaults, Some(&ctx)));
    }

    /// Deriving never changes the parent's defaults
    #[test]
    fn test_with_fields_is_pure(base in field_map(), extra in field_map()) {
        let (root, _sink) = memory_logger();
        let parent = root.with_fields(base.clone());
        let child = parent.with_fields(extra.clone());

        prop_assert_eq!(parent.defaults(), &base);
        let mut expected = base.clone();
        expected.extend(extra);
        prop_assert_eq!(child.defaults(), &expected);
    }
}

#[test]
fn test_documented_precedence_example() {
    let ctx = LogContext::background().with_fields(fields! { "b" => 3, "c" => 4 });
    let merged = resolve(&fields! { "a" => 1, "b" => 2 }, Some(&ctx));
    assert_eq!(merged, fields! { "a" => 1, "b" => 3, "c" => 4 });
}
