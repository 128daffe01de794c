use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

/// String-keyed mapping used for messages and map fields.
pub type Map = BTreeMap<String, Value>;

/// Dynamically-typed value tree produced by decoding and consumed by encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absent value. Treated like a missing key on encode.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Signed integer scalar; 32-bit storage widens into this.
	I64(i64),
	/// Unsigned integer scalar; 32-bit storage widens into this.
	U64(u64),
	/// Floating point scalar; `float` storage widens into this.
	F64(f64),
	/// UTF-8 text, also used for enum names.
	String(String),
	/// Opaque byte payload.
	Bytes(Vec<u8>),
	/// Ordered sequence.
	List(Vec<Value>),
	/// String-keyed mapping.
	Map(Map),
	/// Native point in time, produced and consumed by interceptors only.
	Timestamp(DateTime<Utc>),
	/// Native signed time span, produced and consumed by interceptors only.
	Duration(TimeDelta),
}

impl Value {
	/// Short label for the variant, used in mismatch errors.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::I64(_) => "i64",
			Value::U64(_) => "u64",
			Value::F64(_) => "f64",
			Value::String(_) => "string",
			Value::Bytes(_) => "bytes",
			Value::List(_) => "list",
			Value::Map(_) => "map",
			Value::Timestamp(_) => "timestamp",
			Value::Duration(_) => "duration",
		}
	}

	/// True for [`Value::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Borrow the entries of a map value.
	pub fn as_map(&self) -> Option<&Map> {
		match self {
			Value::Map(map) => Some(map),
			_ => None,
		}
	}

	/// Borrow the items of a list value.
	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Value::List(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow the text of a string value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(text) => Some(text),
			_ => None,
		}
	}

	/// Look up `key` when this is a map value.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_map().and_then(|map| map.get(key))
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::I64(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::I64(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::U64(u64::from(value))
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::U64(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::F64(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Value::Bytes(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Value::List(value)
	}
}

impl From<Map> for Value {
	fn from(value: Map) -> Self {
		Value::Map(value)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(value: DateTime<Utc>) -> Self {
		Value::Timestamp(value)
	}
}

impl From<TimeDelta> for Value {
	fn from(value: TimeDelta) -> Self {
		Value::Duration(value)
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Value::Map(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}
