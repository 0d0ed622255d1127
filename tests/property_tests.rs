//! Property-based tests for pine_logger using proptest

use chrono::{TimeZone, Utc};
use pine_logger::prelude::*;
use pine_logger::{ConsoleEncoder, Encoder, Entry, GelfEncoder};
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Disabled),
        Just(Level::Panic),
        Just(Level::Fatal),
        Just(Level::Error),
        Just(Level::Warn),
        Just(Level::Info),
        Just(Level::Debug),
        Just(Level::Trace),
    ]
}

fn entry(message: &str, fields: Vec<Field>) -> Entry {
    let time = Utc.with_ymd_and_hms(2022, 8, 10, 21, 29, 59).unwrap().fixed_offset();
    Entry::new(Level::Info, time, message).with_fields(fields)
}

fn console(encoder: &ConsoleEncoder, entry: &Entry) -> String {
    let mut buf = Vec::new();
    encoder.encode(entry, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Canonical names parse back to the same level
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        let parsed: Level = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Parsing ignores case
    #[test]
    fn test_level_case_insensitive(level in any_level(), upper in any::<bool>()) {
        let text = if upper {
            level.as_str().to_uppercase()
        } else {
            level.as_str().to_lowercase()
        };
        prop_assert_eq!(text.parse::<Level>().unwrap(), level);
    }

    /// A threshold accepts exactly the levels at or below it, never `Disabled`
    #[test]
    fn test_threshold_ordering(threshold in any_level(), level in any_level()) {
        let expected = level != Level::Disabled && (level as u8) <= (threshold as u8);
        prop_assert_eq!(threshold.enables(level), expected);
        prop_assert_eq!(LevelValue::new(threshold).is_enabled(level), expected);
    }

    /// Unknown names are rejected
    #[test]
    fn test_level_invalid_parse(text in "[a-z]{8,12}") {
        prop_assume!(Level::ALL.iter().all(|level| level.as_str() != text));
        prop_assert!(text.parse::<Level>().is_err());
    }
}

// ============================================================================
// Console Encoding Tests
// ============================================================================

proptest! {
    /// Values from the plain character class are never quoted
    #[test]
    fn test_plain_values_unquoted(value in "[A-Za-z0-9._/@^+-]{1,24}") {
        let encoder = ConsoleEncoder::new();
        prop_assert!(!encoder.needs_quoting(&value));
        let line = console(&encoder, &entry("m", vec![Field::string("k", value.clone())]));
        let expected = format!(" m k={}\n", value);
        prop_assert!(line.ends_with(&expected), "{:?}", line);
    }

    /// Any value with a character outside the class is quoted, and the quoted
    /// form is a JSON string that decodes back to the value
    #[test]
    fn test_other_values_quoted(prefix in "[a-z]{0,4}", special in "[ =\"\\n\\t:,{}]", suffix in ".{0,8}") {
        let value = format!("{}{}{}", prefix, special, suffix);
        let encoder = ConsoleEncoder::new();
        prop_assert!(encoder.needs_quoting(&value));

        let line = console(&encoder, &entry("m", vec![Field::string("k", value.clone())]));
        let quoted = line
            .strip_prefix("2022-08-10T21:29:59.000Z INF m k=")
            .and_then(|rest| rest.strip_suffix('\n'))
            .unwrap();
        let decoded: String = serde_json::from_str(quoted).unwrap();
        prop_assert_eq!(decoded, value);
    }

    /// Each encoded entry is exactly one line
    #[test]
    fn test_single_line_output(message in "[a-z ]{0,16}", value in ".*") {
        let line = console(&ConsoleEncoder::new(), &entry(&message, vec![Field::string("v", value)]));
        prop_assert!(line.ends_with('\n'));
        prop_assert_eq!(line.matches('\n').count(), 1);
    }

    /// Sorted output does not depend on the order fields were given in
    #[test]
    fn test_sorted_output_is_order_independent(
        keys in proptest::collection::btree_set("[a-z]{1,6}", 1..8),
        seed in any::<u64>(),
    ) {
        let fields: Vec<Field> = keys.iter().map(|k| Field::string(k.clone(), "v")).collect();
        let mut shuffled = fields.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);

        let encoder = ConsoleEncoder::new();
        prop_assert_eq!(
            console(&encoder, &entry("m", fields)),
            console(&encoder, &entry("m", shuffled))
        );
    }

    /// Encoding the same entry twice gives the same bytes
    #[test]
    fn test_console_encoding_is_deterministic(
        pairs in proptest::collection::vec(("[a-z]{1,4}", any::<i64>()), 0..8),
        colors in any::<bool>(),
    ) {
        let fields: Vec<Field> = pairs.into_iter().map(|(k, v)| Field::int(k, v)).collect();
        let entry = entry("m", fields);
        let encoder = ConsoleEncoder::new().with_colors(colors);
        prop_assert_eq!(console(&encoder, &entry), console(&encoder, &entry));
    }
}

// ============================================================================
// GELF Encoding Tests
// ============================================================================

proptest! {
    /// Every GELF frame is one JSON object followed by `\n\0`
    #[test]
    fn test_gelf_frame_is_valid_json(
        message in ".*",
        pairs in proptest::collection::vec(("[a-z]{1,6}", ".*"), 0..6),
    ) {
        let fields: Vec<Field> = pairs
            .into_iter()
            .map(|(k, v)| Field::string(k, v))
            .collect();
        let entry = entry(&message, fields);
        let mut buf = Vec::new();
        GelfEncoder::new(Vec::new())
            .with_hostname("h")
            .encode(&entry, &mut buf)
            .unwrap();

        prop_assert!(buf.ends_with(b"\n\0"));
        let json: serde_json::Value = serde_json::from_slice(&buf[..buf.len() - 2]).unwrap();
        prop_assert_eq!(json["version"].as_str(), Some("1.1"));
        prop_assert_eq!(json["short_message"].as_str(), Some(message.as_str()));
        prop_assert_eq!(json["level"].as_i64(), Some(6));
    }
}
