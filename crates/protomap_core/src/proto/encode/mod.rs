use std::collections::HashMap;

use prost_reflect::{Cardinality, DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, ReflectMessage, Value as ReflectValue};

use crate::proto::coerce::{map_key, to_stored};
use crate::proto::intercept::run_encode_chain;
use crate::proto::{EncodeInterceptor, FieldShape, Map, MapError, MapOptions, OneofPolicy, Result, Value};

/// Populate `message` from `input`.
///
/// `interceptors` are consulted in order before default handling, for this message and for every
/// nested message reached through singular, list, or map fields. Without an interceptor `input` must
/// be a [`Value::Map`] keyed by field name. Fields absent from the input (or `Null`) are left alone
/// when they are singular-optional; any other absent field is [`MapError::MissingRequiredField`].
/// Keys that name no field are ignored.
pub fn encode_message(input: &Value, message: &mut DynamicMessage, interceptors: &[&dyn EncodeInterceptor], options: &MapOptions) -> Result<()> {
	if run_encode_chain(interceptors, input, message)? {
		return Ok(());
	}

	let Value::Map(entries) = input else {
		return Err(MapError::ShapeMismatch {
			expected: "map",
			got: input.kind_name(),
		});
	};

	let descriptor = message.descriptor();
	if options.oneof == OneofPolicy::Reject {
		reject_oneof_conflicts(&descriptor, entries)?;
	}

	for field in descriptor.fields() {
		let Some(entry) = present(entries, &field) else {
			if field.cardinality() == Cardinality::Optional {
				continue;
			}
			return Err(MapError::MissingRequiredField {
				field: field.name().to_owned(),
			});
		};

		let stored = match FieldShape::of(&field) {
			FieldShape::List(kind) => encode_list(&field, &kind, entry, interceptors, options)?,
			FieldShape::Map { key, value } => encode_map(&field, (&key, &value), entry, interceptors, options)?,
			FieldShape::Scalar(_) | FieldShape::Message(_) => {
				encode_element(&field.kind(), entry, interceptors, options).map_err(|err| err.in_field(field.name()))?
			}
		};

		if let Some(oneof) = field.containing_oneof()
			&& let Some(previous) = oneof.fields().find(|member| *member != field && message.has_field(member))
		{
			tracing::trace!(oneof = oneof.name(), previous = previous.name(), field = field.name(), "oneof member replaced");
		}

		message.try_set_field(&field, stored).map_err(|source| MapError::SetField {
			field: field.name().to_owned(),
			source,
		})?;
	}

	Ok(())
}

fn present<'a>(entries: &'a Map, field: &FieldDescriptor) -> Option<&'a Value> {
	entries.get(field.name()).filter(|entry| !entry.is_null())
}

fn reject_oneof_conflicts(descriptor: &MessageDescriptor, entries: &Map) -> Result<()> {
	for oneof in descriptor.oneofs() {
		let mut members = oneof.fields().filter(|member| present(entries, member).is_some());
		if let (Some(first), Some(second)) = (members.next(), members.next()) {
			return Err(MapError::OneofConflict {
				oneof: oneof.name().to_owned(),
				first: first.name().to_owned(),
				second: second.name().to_owned(),
			});
		}
	}
	Ok(())
}

fn encode_list(
	field: &FieldDescriptor,
	kind: &Kind,
	input: &Value,
	interceptors: &[&dyn EncodeInterceptor],
	options: &MapOptions,
) -> Result<ReflectValue> {
	let items = input.as_list().ok_or_else(|| {
		MapError::ShapeMismatch {
			expected: "list",
			got: input.kind_name(),
		}
		.in_field(field.name())
	})?;

	let mut out = Vec::with_capacity(items.len());
	for (index, item) in items.iter().enumerate() {
		out.push(encode_element(kind, item, interceptors, options).map_err(|err| err.at_index(field.name(), index))?);
	}
	Ok(ReflectValue::List(out))
}

fn encode_map(
	field: &FieldDescriptor,
	(key_kind, value_kind): (&Kind, &Kind),
	input: &Value,
	interceptors: &[&dyn EncodeInterceptor],
	options: &MapOptions,
) -> Result<ReflectValue> {
	let entries = input.as_map().ok_or_else(|| {
		MapError::ShapeMismatch {
			expected: "map",
			got: input.kind_name(),
		}
		.in_field(field.name())
	})?;

	let mut out = HashMap::with_capacity(entries.len());
	for (key, item) in entries {
		let stored_key = map_key(key_kind, key, options.narrowing).map_err(|err| err.at_key(field.name(), key))?;
		let stored = encode_element(value_kind, item, interceptors, options).map_err(|err| err.at_key(field.name(), key))?;
		out.insert(stored_key, stored);
	}
	Ok(ReflectValue::Map(out))
}

fn encode_element(kind: &Kind, input: &Value, interceptors: &[&dyn EncodeInterceptor], options: &MapOptions) -> Result<ReflectValue> {
	match kind {
		Kind::Message(descriptor) => {
			let mut nested = DynamicMessage::new(descriptor.clone());
			encode_message(input, &mut nested, interceptors, options)?;
			Ok(ReflectValue::Message(nested))
		}
		kind => to_stored(kind, input, options.narrowing),
	}
}

#[cfg(test)]
mod tests;
