use prost::bytes::Bytes;
use prost_reflect::{EnumDescriptor, Kind, MapKey, Value as ReflectValue};

use crate::proto::shape::kind_name;
use crate::proto::{MapError, Narrowing, Result, Value};

/// Read a boolean. Only [`Value::Bool`] is accepted.
pub fn coerce_bool(value: &Value) -> Result<bool> {
	match value {
		Value::Bool(item) => Ok(*item),
		other => Err(mismatch("bool", other)),
	}
}

/// Read a signed integer from an integral number or base-10 text.
pub fn coerce_i64(value: &Value) -> Result<i64> {
	match value {
		Value::I64(item) => Ok(*item),
		Value::U64(item) => i64::try_from(*item).map_err(|_| out_of_range("int64", item)),
		Value::F64(item) => {
			let whole = integral(*item).ok_or_else(|| mismatch("integer", value))?;
			// 2^63 is the first f64 outside the i64 range.
			if whole < -(2_f64.powi(63)) || whole >= 2_f64.powi(63) {
				return Err(out_of_range("int64", item));
			}
			Ok(whole as i64)
		}
		Value::String(text) => parse_signed(text),
		other => Err(mismatch("integer", other)),
	}
}

/// Read an unsigned integer from a non-negative integral number or base-10 text.
pub fn coerce_u64(value: &Value) -> Result<u64> {
	match value {
		Value::U64(item) => Ok(*item),
		Value::I64(item) => u64::try_from(*item).map_err(|_| out_of_range("uint64", item)),
		Value::F64(item) => {
			let whole = integral(*item).ok_or_else(|| mismatch("unsigned integer", value))?;
			if whole < 0.0 || whole >= 2_f64.powi(64) {
				return Err(out_of_range("uint64", item));
			}
			Ok(whole as u64)
		}
		Value::String(text) => parse_unsigned(text),
		other => Err(mismatch("unsigned integer", other)),
	}
}

/// Read a float from any number or from float text (`NaN` and `inf` included).
pub fn coerce_f64(value: &Value) -> Result<f64> {
	match value {
		Value::F64(item) => Ok(*item),
		Value::I64(item) => Ok(*item as f64),
		Value::U64(item) => Ok(*item as f64),
		Value::String(text) => text.trim().parse::<f64>().map_err(|_| mismatch("float", value)),
		other => Err(mismatch("float", other)),
	}
}

/// Read text. Only [`Value::String`] is accepted.
pub fn coerce_str(value: &Value) -> Result<&str> {
	match value {
		Value::String(text) => Ok(text),
		other => Err(mismatch("string", other)),
	}
}

/// Read a byte payload. Only [`Value::Bytes`] is accepted.
pub fn coerce_bytes(value: &Value) -> Result<&[u8]> {
	match value {
		Value::Bytes(bytes) => Ok(bytes),
		other => Err(mismatch("bytes", other)),
	}
}

/// Convert a generic value into storage for a non-message `kind`.
pub(crate) fn to_stored(kind: &Kind, value: &Value, narrowing: Narrowing) -> Result<ReflectValue> {
	let stored = match kind {
		Kind::Bool => ReflectValue::Bool(coerce_bool(value)?),
		Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => ReflectValue::I32(narrow_i32(coerce_i64(value)?, kind, narrowing)?),
		Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => ReflectValue::I64(coerce_i64(value)?),
		Kind::Uint32 | Kind::Fixed32 => ReflectValue::U32(narrow_u32(coerce_u64(value)?, kind, narrowing)?),
		Kind::Uint64 | Kind::Fixed64 => ReflectValue::U64(coerce_u64(value)?),
		Kind::Float => ReflectValue::F32(coerce_f64(value)? as f32),
		Kind::Double => ReflectValue::F64(coerce_f64(value)?),
		Kind::String => ReflectValue::String(coerce_str(value)?.to_owned()),
		Kind::Bytes => ReflectValue::Bytes(Bytes::copy_from_slice(coerce_bytes(value)?)),
		Kind::Enum(descriptor) => ReflectValue::EnumNumber(enum_number(descriptor, value)?),
		Kind::Message(_) => {
			return Err(MapError::UnsupportedFieldKind {
				kind: "message",
				role: "scalar",
			});
		}
	};
	Ok(stored)
}

/// Convert storage of a non-message `kind` into a generic value.
pub(crate) fn from_stored(kind: &Kind, stored: &ReflectValue) -> Result<Value> {
	let value = match (kind, stored) {
		(Kind::Enum(descriptor), ReflectValue::EnumNumber(number)) => {
			let item = descriptor.get_value(*number).ok_or_else(|| MapError::UnknownEnumNumber {
				enum_name: descriptor.full_name().to_owned(),
				number: i64::from(*number),
			})?;
			Value::String(item.name().to_owned())
		}
		(Kind::Bool, ReflectValue::Bool(item)) => Value::Bool(*item),
		(Kind::Int32 | Kind::Sint32 | Kind::Sfixed32, ReflectValue::I32(item)) => Value::I64(i64::from(*item)),
		(Kind::Int64 | Kind::Sint64 | Kind::Sfixed64, ReflectValue::I64(item)) => Value::I64(*item),
		(Kind::Uint32 | Kind::Fixed32, ReflectValue::U32(item)) => Value::U64(u64::from(*item)),
		(Kind::Uint64 | Kind::Fixed64, ReflectValue::U64(item)) => Value::U64(*item),
		(Kind::Float, ReflectValue::F32(item)) => Value::F64(f64::from(*item)),
		(Kind::Double, ReflectValue::F64(item)) => Value::F64(*item),
		(Kind::String, ReflectValue::String(item)) => Value::String(item.clone()),
		(Kind::Bytes, ReflectValue::Bytes(item)) => Value::Bytes(item.to_vec()),
		(kind, stored) => {
			return Err(MapError::TypeMismatch {
				expected: kind_name(kind),
				got: stored_kind_name(stored),
			});
		}
	};
	Ok(value)
}

/// Parse map key text into a key of `kind`.
pub(crate) fn map_key(kind: &Kind, text: &str, narrowing: Narrowing) -> Result<MapKey> {
	let key = match kind {
		Kind::Bool => match text {
			"true" => MapKey::Bool(true),
			"false" => MapKey::Bool(false),
			_ => {
				return Err(MapError::TypeMismatch {
					expected: "bool",
					got: "string",
				});
			}
		},
		Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => MapKey::I32(narrow_i32(parse_signed(text)?, kind, narrowing)?),
		Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => MapKey::I64(parse_signed(text)?),
		Kind::Uint32 | Kind::Fixed32 => MapKey::U32(narrow_u32(parse_unsigned(text)?, kind, narrowing)?),
		Kind::Uint64 | Kind::Fixed64 => MapKey::U64(parse_unsigned(text)?),
		Kind::String => MapKey::String(text.to_owned()),
		other => {
			return Err(MapError::UnsupportedFieldKind {
				kind: kind_name(other),
				role: "map key",
			});
		}
	};
	Ok(key)
}

/// Canonical text form of a map key.
pub(crate) fn render_map_key(key: &MapKey) -> String {
	match key {
		MapKey::Bool(item) => item.to_string(),
		MapKey::I32(item) => item.to_string(),
		MapKey::I64(item) => item.to_string(),
		MapKey::U32(item) => item.to_string(),
		MapKey::U64(item) => item.to_string(),
		MapKey::String(item) => item.clone(),
	}
}

/// Short label for a storage value, used in mismatch errors.
pub(crate) fn stored_kind_name(stored: &ReflectValue) -> &'static str {
	match stored {
		ReflectValue::Bool(_) => "bool",
		ReflectValue::I32(_) => "i32",
		ReflectValue::I64(_) => "i64",
		ReflectValue::U32(_) => "u32",
		ReflectValue::U64(_) => "u64",
		ReflectValue::F32(_) => "f32",
		ReflectValue::F64(_) => "f64",
		ReflectValue::String(_) => "string",
		ReflectValue::Bytes(_) => "bytes",
		ReflectValue::EnumNumber(_) => "enum",
		ReflectValue::Message(_) => "message",
		ReflectValue::List(_) => "list",
		ReflectValue::Map(_) => "map",
	}
}

fn enum_number(descriptor: &EnumDescriptor, value: &Value) -> Result<i32> {
	if let Value::String(name) = value {
		return descriptor.get_value_by_name(name).map(|item| item.number()).ok_or_else(|| MapError::UnknownEnumName {
			enum_name: descriptor.full_name().to_owned(),
			name: name.clone(),
		});
	}

	let unknown = |number: i64| MapError::UnknownEnumNumber {
		enum_name: descriptor.full_name().to_owned(),
		number,
	};
	let number = match value {
		Value::I64(item) => *item,
		Value::U64(item) => i64::try_from(*item).map_err(|_| out_of_range("enum", item))?,
		Value::F64(_) => coerce_i64(value).map_err(|_| mismatch("enum", value))?,
		other => return Err(mismatch("enum", other)),
	};
	let number = i32::try_from(number).map_err(|_| unknown(number))?;
	match descriptor.get_value(number) {
		Some(_) => Ok(number),
		None => Err(unknown(i64::from(number))),
	}
}

fn parse_signed(text: &str) -> Result<i64> {
	text.trim().parse::<i64>().map_err(|_| MapError::TypeMismatch {
		expected: "integer",
		got: "string",
	})
}

fn parse_unsigned(text: &str) -> Result<u64> {
	text.trim().parse::<u64>().map_err(|_| MapError::TypeMismatch {
		expected: "unsigned integer",
		got: "string",
	})
}

fn narrow_i32(value: i64, kind: &Kind, narrowing: Narrowing) -> Result<i32> {
	match narrowing {
		Narrowing::Truncate => Ok(value as i32),
		Narrowing::Checked => i32::try_from(value).map_err(|_| out_of_range(kind_name(kind), &value)),
	}
}

fn narrow_u32(value: u64, kind: &Kind, narrowing: Narrowing) -> Result<u32> {
	match narrowing {
		Narrowing::Truncate => Ok(value as u32),
		Narrowing::Checked => u32::try_from(value).map_err(|_| out_of_range(kind_name(kind), &value)),
	}
}

fn integral(value: f64) -> Option<f64> {
	(value.is_finite() && value.fract() == 0.0).then_some(value)
}

fn mismatch(expected: &'static str, got: &Value) -> MapError {
	MapError::TypeMismatch {
		expected,
		got: got.kind_name(),
	}
}

fn out_of_range(kind: &'static str, value: &dyn std::fmt::Display) -> MapError {
	MapError::IntegerOutOfRange {
		kind,
		value: value.to_string(),
	}
}
