use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use protomap::proto::{Map, Value};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use thiserror::Error;

const BYTES_TAG: &str = "$bytes";
const TIMESTAMP_TAG: &str = "$timestamp";
const DURATION_TAG: &str = "$duration";

/// JSON input that has no generic value counterpart.
#[derive(Debug, Error)]
pub enum JsonError {
	/// Tagged object whose payload is not a string.
	#[error("{tag} payload must be a string")]
	TagPayload {
		/// Tag key.
		tag: &'static str,
	},
	/// `$bytes` payload is not standard base64.
	#[error("invalid base64 in $bytes: {source}")]
	InvalidBase64 {
		#[source]
		source: base64::DecodeError,
	},
	/// `$timestamp` payload is not RFC 3339.
	#[error("invalid RFC 3339 timestamp {text:?}: {source}")]
	InvalidTimestamp {
		text: String,
		#[source]
		source: chrono::ParseError,
	},
	/// `$duration` payload is not `<seconds>[.<fraction>]s`.
	#[error("invalid duration {text:?}")]
	InvalidDuration { text: String },
	/// Number that fits none of i64, u64, f64.
	#[error("unsupported JSON number {text}")]
	UnsupportedNumber { text: String },
}

/// Render a generic value as JSON.
pub(crate) fn to_json(value: &Value) -> JsonValue {
	match value {
		Value::Null => JsonValue::Null,
		Value::Bool(item) => JsonValue::Bool(*item),
		Value::I64(item) => JsonValue::from(*item),
		Value::U64(item) => JsonValue::from(*item),
		Value::F64(item) => match Number::from_f64(*item) {
			Some(number) => JsonValue::Number(number),
			None if item.is_nan() => JsonValue::from("NaN"),
			None if *item > 0.0 => JsonValue::from("inf"),
			None => JsonValue::from("-inf"),
		},
		Value::String(item) => JsonValue::from(item.as_str()),
		Value::Bytes(item) => tagged(BYTES_TAG, STANDARD.encode(item)),
		Value::List(items) => JsonValue::Array(items.iter().map(to_json).collect()),
		Value::Map(entries) => JsonValue::Object(entries.iter().map(|(key, item)| (key.clone(), to_json(item))).collect()),
		Value::Timestamp(instant) => tagged(TIMESTAMP_TAG, instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
		Value::Duration(span) => tagged(DURATION_TAG, render_duration(*span)),
	}
}

/// Read a generic value from JSON.
pub(crate) fn from_json(json: &JsonValue) -> Result<Value, JsonError> {
	let value = match json {
		JsonValue::Null => Value::Null,
		JsonValue::Bool(item) => Value::Bool(*item),
		JsonValue::Number(number) => {
			if let Some(item) = number.as_i64() {
				Value::I64(item)
			} else if let Some(item) = number.as_u64() {
				Value::U64(item)
			} else {
				let item = number.as_f64().ok_or_else(|| JsonError::UnsupportedNumber { text: number.to_string() })?;
				Value::F64(item)
			}
		}
		JsonValue::String(item) => Value::String(item.clone()),
		JsonValue::Array(items) => Value::List(items.iter().map(from_json).collect::<Result<_, _>>()?),
		JsonValue::Object(entries) => match from_tagged(entries)? {
			Some(value) => value,
			None => {
				let mut out = Map::new();
				for (key, item) in entries {
					out.insert(key.clone(), from_json(item)?);
				}
				Value::Map(out)
			}
		},
	};
	Ok(value)
}

fn tagged(tag: &str, payload: String) -> JsonValue {
	let mut out = JsonMap::new();
	out.insert(tag.to_owned(), JsonValue::String(payload));
	JsonValue::Object(out)
}

fn from_tagged(entries: &JsonMap<String, JsonValue>) -> Result<Option<Value>, JsonError> {
	let mut iter = entries.iter();
	let (Some((key, payload)), None) = (iter.next(), iter.next()) else {
		return Ok(None);
	};

	let tag = match key.as_str() {
		BYTES_TAG => BYTES_TAG,
		TIMESTAMP_TAG => TIMESTAMP_TAG,
		DURATION_TAG => DURATION_TAG,
		_ => return Ok(None),
	};
	let text = payload.as_str().ok_or(JsonError::TagPayload { tag })?;

	let value = match tag {
		BYTES_TAG => Value::Bytes(STANDARD.decode(text).map_err(|source| JsonError::InvalidBase64 { source })?),
		TIMESTAMP_TAG => {
			let instant = DateTime::parse_from_rfc3339(text).map_err(|source| JsonError::InvalidTimestamp {
				text: text.to_owned(),
				source,
			})?;
			Value::Timestamp(instant.with_timezone(&Utc))
		}
		_ => Value::Duration(parse_duration(text)?),
	};
	Ok(Some(value))
}

fn render_duration(span: TimeDelta) -> String {
	let sign = if span < TimeDelta::zero() { "-" } else { "" };
	let seconds = span.num_seconds().unsigned_abs();
	match span.subsec_nanos().unsigned_abs() {
		0 => format!("{sign}{seconds}s"),
		nanos => format!("{sign}{seconds}.{nanos:09}s"),
	}
}

fn parse_duration(text: &str) -> Result<TimeDelta, JsonError> {
	let invalid = || JsonError::InvalidDuration { text: text.to_owned() };

	let body = text.strip_suffix('s').ok_or_else(invalid)?;
	let (negative, body) = match body.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, body),
	};
	let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
	if whole.is_empty() || fraction.len() > 9 || !whole.bytes().chain(fraction.bytes()).all(|byte| byte.is_ascii_digit()) {
		return Err(invalid());
	}

	let seconds = whole.parse::<i64>().map_err(|_| invalid())?;
	let nanos = if fraction.is_empty() {
		0
	} else {
		format!("{fraction:0<9}").parse::<i64>().map_err(|_| invalid())?
	};
	let span = TimeDelta::try_seconds(seconds)
		.and_then(|whole| whole.checked_add(&TimeDelta::nanoseconds(nanos)))
		.ok_or_else(invalid)?;
	Ok(if negative { -span } else { span })
}
