//! `{type, data}` records to descriptors.
//!
//! A record is `{"type": "face", "data": {"id": "1"}}`. `text` records take
//! `data.text` directly; every other type has its `data` map flattened into
//! the same attribute map the scanner would produce. A non-text record with
//! no `data` carries nothing to decode and stands for an empty segment.

use {
    serde_json::{Map, Value},
    std::collections::BTreeMap,
    thiserror::Error,
    tracing::debug,
};

use crate::descriptor::SegmentDescriptor;

/// A classified record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Text(String),
    Code(SegmentDescriptor),
    /// A non-text record without `data`.
    Empty,
}

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,
    #[error("record has no string `type`")]
    MissingType,
    #[error("text record has no `data.text`")]
    MissingText,
    #[error("`data` of a `{kind}` record is not an object")]
    DataNotAnObject { kind: String },
}

/// Classify one record.
pub fn parse_record(value: &Value) -> Result<Record, RecordError> {
    let record = value.as_object().ok_or(RecordError::NotAnObject)?;
    let kind = record
        .get("type")
        .and_then(Value::as_str)
        .ok_or(RecordError::MissingType)?;
    let data = record.get("data");

    if kind == "text" {
        return data
            .and_then(|data| data.get("text"))
            .and_then(scalar)
            .map(Record::Text)
            .ok_or(RecordError::MissingText);
    }

    match data {
        None | Some(Value::Null) => {
            debug!(kind, "record without data");
            Ok(Record::Empty)
        },
        Some(Value::Object(map)) => {
            let mut descriptor = SegmentDescriptor::new(kind);
            descriptor.attrs = attrs(kind, map);
            Ok(Record::Code(descriptor))
        },
        Some(_) => Err(RecordError::DataNotAnObject {
            kind: kind.to_owned(),
        }),
    }
}

/// Scalars as attribute text: strings as-is, numbers and booleans via
/// their JSON rendering.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn attrs(kind: &str, map: &Map<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(key, value)| match scalar(value) {
            Some(value) => Some((key.clone(), value)),
            None => {
                debug!(kind, key = key.as_str(), "non-scalar attribute skipped");
                None
            },
        })
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest, serde_json::json};

    #[test]
    fn text_fast_path() {
        assert_eq!(
            parse_record(&json!({"type": "text", "data": {"text": "[hi]"}})).unwrap(),
            Record::Text("[hi]".into())
        );
    }

    #[test]
    fn data_values_become_attributes() {
        let record = parse_record(&json!({
            "type": "image",
            "data": {"file": "a.png", "cache": 0, "flash": true, "extra": {"x": 1}, "none": null}
        }))
        .unwrap();
        assert_eq!(
            record,
            Record::Code(
                SegmentDescriptor::new("image")
                    .with("file", "a.png")
                    .with("cache", "0")
                    .with("flash", "true")
            )
        );
    }

    #[rstest]
    #[case(json!({"type": "shake"}))]
    #[case(json!({"type": "image", "data": null}))]
    fn missing_data_is_empty(#[case] value: Value) {
        assert_eq!(parse_record(&value).unwrap(), Record::Empty);
    }

    #[test]
    fn empty_data_object_is_attribute_free() {
        assert_eq!(
            parse_record(&json!({"type": "shake", "data": {}})).unwrap(),
            Record::Code(SegmentDescriptor::new("shake"))
        );
    }

    #[rstest]
    #[case(json!("text"), RecordError::NotAnObject)]
    #[case(json!({"data": {}}), RecordError::MissingType)]
    #[case(json!({"type": 3}), RecordError::MissingType)]
    #[case(json!({"type": "text", "data": {}}), RecordError::MissingText)]
    #[case(json!({"type": "text"}), RecordError::MissingText)]
    #[case(json!({"type": "face", "data": "1"}), RecordError::DataNotAnObject { kind: "face".into() })]
    fn malformed_records(#[case] value: Value, #[case] expected: RecordError) {
        assert_eq!(parse_record(&value).unwrap_err(), expected);
    }
}
