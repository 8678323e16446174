//! Attribute encoding of literal values.

use chrono::{NaiveDate, NaiveDateTime};

use crate::ast::Value;
use crate::codec::Element;
use crate::error::WeaveResult;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Attach `kind` and `value` attributes describing `value`.
pub(crate) fn encode(element: Element, value: &Value) -> Element {
    let element = element.with_attr("kind", value.kind());
    match value {
        Value::Null => element,
        Value::Bool(b) => element.with_attr("value", b.to_string()),
        Value::Int(n) => element.with_attr("value", n.to_string()),
        Value::Float(n) => element.with_attr("value", n.to_string()),
        Value::String(s) => element.with_attr("value", s.clone()),
        Value::Date(d) => element.with_attr("value", d.format(DATE_FORMAT).to_string()),
        Value::Timestamp(ts) => element.with_attr("value", ts.format(TIMESTAMP_FORMAT).to_string()),
        Value::Bytes(bytes) => element.with_attr("value", to_hex(bytes)),
    }
}

/// Read the value described by `kind`/`value` attributes.
pub(crate) fn decode(element: &Element) -> WeaveResult<Value> {
    let kind = element.require("kind")?;
    if kind == "null" {
        return Ok(Value::Null);
    }
    let raw = element.require("value")?;
    let bad = || element.malformed("value", raw);
    let value = match kind {
        "bool" => Value::Bool(raw.parse().map_err(|_| bad())?),
        "int" => Value::Int(raw.parse().map_err(|_| bad())?),
        "float" => Value::Float(raw.parse().map_err(|_| bad())?),
        "string" => Value::String(raw.to_string()),
        "date" => Value::Date(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| bad())?),
        "timestamp" => Value::Timestamp(
            NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| bad())?,
        ),
        "bytes" => Value::Bytes(from_hex(raw).ok_or_else(bad)?),
        other => return Err(element.malformed("kind", other)),
    };
    Ok(value)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| s.get(i..i + 2).and_then(|pair| u8::from_str_radix(pair, 16).ok()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(value: Value) -> Value {
        decode(&encode(Element::new("const"), &value)).unwrap()
    }

    #[test]
    fn test_values_survive() {
        let ts = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_micro_opt(13, 5, 9, 250)
            .unwrap();
        assert_eq!(round(Value::Timestamp(ts)), Value::Timestamp(ts));
        assert_eq!(round(Value::Float(0.1)), Value::Float(0.1));
        assert_eq!(round(Value::Bytes(vec![0, 255, 16])), Value::Bytes(vec![0, 255, 16]));
        assert_eq!(round(Value::Null), Value::Null);
    }

    #[test]
    fn test_malformed_value() {
        let el = Element::new("const")
            .with_attr("kind", "int")
            .with_attr("value", "twelve");
        assert_eq!(
            decode(&el).unwrap_err().to_string(),
            "Serialization error at <const>: malformed value 'twelve'"
        );
        let el = Element::new("const")
            .with_attr("kind", "bytes")
            .with_attr("value", "abc");
        assert!(decode(&el).is_err());
    }
}
