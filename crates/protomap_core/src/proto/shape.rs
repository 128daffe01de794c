use std::fmt;

use prost_reflect::{FieldDescriptor, Kind, MessageDescriptor};

/// Structural classification of a field, computed once before converting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
	/// Singular scalar or enum.
	Scalar(Kind),
	/// Singular message or group.
	Message(MessageDescriptor),
	/// Repeated field with the given element kind.
	List(Kind),
	/// Map field with key and value kinds.
	Map {
		/// Key kind.
		key: Kind,
		/// Value kind.
		value: Kind,
	},
}

impl FieldShape {
	/// Classify `field`.
	pub fn of(field: &FieldDescriptor) -> Self {
		if field.is_map()
			&& let Kind::Message(entry) = field.kind()
		{
			return FieldShape::Map {
				key: entry.map_entry_key_field().kind(),
				value: entry.map_entry_value_field().kind(),
			};
		}

		if field.is_list() {
			return FieldShape::List(field.kind());
		}

		match field.kind() {
			Kind::Message(message) => FieldShape::Message(message),
			kind => FieldShape::Scalar(kind),
		}
	}
}

impl fmt::Display for FieldShape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldShape::Scalar(kind) => write_kind(f, kind),
			FieldShape::Message(message) => write!(f, "message {}", message.full_name()),
			FieldShape::List(kind) => {
				f.write_str("list<")?;
				write_kind(f, kind)?;
				f.write_str(">")
			}
			FieldShape::Map { key, value } => {
				f.write_str("map<")?;
				write_kind(f, key)?;
				f.write_str(", ")?;
				write_kind(f, value)?;
				f.write_str(">")
			}
		}
	}
}

fn write_kind(f: &mut fmt::Formatter<'_>, kind: &Kind) -> fmt::Result {
	match kind {
		Kind::Message(message) => f.write_str(message.full_name()),
		Kind::Enum(item) => write!(f, "enum {}", item.full_name()),
		other => f.write_str(kind_name(other)),
	}
}

/// Schema-level name of `kind`, e.g. `sfixed32` or `message`.
pub fn kind_name(kind: &Kind) -> &'static str {
	match kind {
		Kind::Double => "double",
		Kind::Float => "float",
		Kind::Int32 => "int32",
		Kind::Int64 => "int64",
		Kind::Uint32 => "uint32",
		Kind::Uint64 => "uint64",
		Kind::Sint32 => "sint32",
		Kind::Sint64 => "sint64",
		Kind::Fixed32 => "fixed32",
		Kind::Fixed64 => "fixed64",
		Kind::Sfixed32 => "sfixed32",
		Kind::Sfixed64 => "sfixed64",
		Kind::Bool => "bool",
		Kind::String => "string",
		Kind::Bytes => "bytes",
		Kind::Message(_) => "message",
		Kind::Enum(_) => "enum",
	}
}

#[cfg(test)]
mod tests {
	use super::FieldShape;

	#[test]
	fn shapes_cover_scalar_list_map_and_message() {
		let pool = protomap_testkit::sample_pool();
		let message = pool.get_message_by_name("protomap.test.Test").expect("fixture message exists");
		let shape = |name: &str| FieldShape::of(&message.get_field_by_name(name).expect("field exists")).to_string();

		assert_eq!(shape("name"), "string");
		assert_eq!(shape("tags"), "list<string>");
		assert_eq!(shape("counts"), "map<string, int64>");
		assert_eq!(shape("id_map"), "map<int32, string>");
		assert_eq!(shape("inner"), "message protomap.test.Inner");
		assert_eq!(shape("inners"), "list<protomap.test.Inner>");
		assert_eq!(shape("color"), "enum protomap.test.Color");
		assert_eq!(shape("sint"), "sint64");
	}
}
