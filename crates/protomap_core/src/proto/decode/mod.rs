use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, ReflectMessage, Value as ReflectValue};

use crate::proto::coerce::{from_stored, render_map_key, stored_kind_name};
use crate::proto::intercept::run_decode_chain;
use crate::proto::{DecodeInterceptor, FieldShape, Map, MapError, Result, Value};

/// Decode `message` into a generic value.
///
/// `interceptors` are consulted in order before default handling, for this message and for every
/// nested message reached through singular, list, or map fields. The first one that applies wins.
///
/// Without an interceptor the result is a [`Value::Map`] keyed by field name. Every field appears
/// except oneof members that are not set; unset fields carry their kind's default. Enums decode to
/// their symbolic name.
pub fn decode_message(message: &DynamicMessage, interceptors: &[&dyn DecodeInterceptor]) -> Result<Value> {
	if let Some(value) = run_decode_chain(interceptors, message)? {
		return Ok(value);
	}

	let mut out = Map::new();
	for field in message.descriptor().fields() {
		if field.containing_oneof().is_some() && !message.has_field(&field) {
			continue;
		}

		let stored = message.get_field(&field);
		let value = match FieldShape::of(&field) {
			FieldShape::List(kind) => decode_list(&field, &kind, &stored, interceptors)?,
			FieldShape::Map { value, .. } => decode_map(&field, &value, &stored, interceptors)?,
			FieldShape::Scalar(_) | FieldShape::Message(_) => {
				decode_element(&field.kind(), &stored, interceptors).map_err(|err| err.in_field(field.name()))?
			}
		};
		out.insert(field.name().to_owned(), value);
	}

	Ok(Value::Map(out))
}

fn decode_list(field: &FieldDescriptor, kind: &Kind, stored: &ReflectValue, interceptors: &[&dyn DecodeInterceptor]) -> Result<Value> {
	let items = stored.as_list().ok_or_else(|| storage_mismatch("list", stored).in_field(field.name()))?;

	let mut out = Vec::with_capacity(items.len());
	for (index, item) in items.iter().enumerate() {
		out.push(decode_element(kind, item, interceptors).map_err(|err| err.at_index(field.name(), index))?);
	}
	Ok(Value::List(out))
}

fn decode_map(field: &FieldDescriptor, kind: &Kind, stored: &ReflectValue, interceptors: &[&dyn DecodeInterceptor]) -> Result<Value> {
	let entries = stored.as_map().ok_or_else(|| storage_mismatch("map", stored).in_field(field.name()))?;

	let mut out = Map::new();
	for (key, item) in entries {
		let key = render_map_key(key);
		let value = decode_element(kind, item, interceptors).map_err(|err| err.at_key(field.name(), &key))?;
		out.insert(key, value);
	}
	Ok(Value::Map(out))
}

fn decode_element(kind: &Kind, stored: &ReflectValue, interceptors: &[&dyn DecodeInterceptor]) -> Result<Value> {
	match kind {
		Kind::Message(_) => {
			let nested = stored.as_message().ok_or_else(|| storage_mismatch("message", stored))?;
			decode_message(nested, interceptors)
		}
		kind => from_stored(kind, stored),
	}
}

fn storage_mismatch(expected: &'static str, stored: &ReflectValue) -> MapError {
	MapError::TypeMismatch {
		expected,
		got: stored_kind_name(stored),
	}
}
