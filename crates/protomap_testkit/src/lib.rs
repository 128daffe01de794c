//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
	DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet, MessageOptions,
	OneofDescriptorProto,
};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Descriptor set with the well-known time types, `protomap.test`, and the proto2 `protomap.legacy` package.
///
/// `protomap.test.Test` exercises every scalar kind, lists, maps with string and integer keys, a oneof
/// named `choice`, nested messages, and timestamps/durations inside lists and maps.
/// `protomap.test.Event` is the small `{name, tags, counts, when}` message.
pub fn sample_descriptor_set() -> FileDescriptorSet {
	FileDescriptorSet {
		file: vec![
			seconds_nanos_file("google/protobuf/timestamp.proto", "Timestamp"),
			seconds_nanos_file("google/protobuf/duration.proto", "Duration"),
			test_file(),
			legacy_file(),
		],
	}
}

/// Descriptor pool built from [`sample_descriptor_set`].
pub fn sample_pool() -> DescriptorPool {
	DescriptorPool::from_file_descriptor_set(sample_descriptor_set()).expect("sample descriptor set links")
}

/// Write the serialized [`sample_descriptor_set`] under the target directory and return its path.
pub fn write_sample_descriptor_set(name: &str) -> PathBuf {
	let dir = target_dir().join("protomap-fixtures");
	std::fs::create_dir_all(&dir).expect("fixture dir is creatable");
	let path = dir.join(name);
	std::fs::write(&path, sample_descriptor_set().encode_to_vec()).expect("fixture is writable");
	path
}

fn seconds_nanos_file(path: &str, message: &str) -> FileDescriptorProto {
	FileDescriptorProto {
		name: Some(path.to_owned()),
		package: Some("google.protobuf".to_owned()),
		message_type: vec![DescriptorProto {
			name: Some(message.to_owned()),
			field: vec![scalar("seconds", 1, Type::Int64), scalar("nanos", 2, Type::Int32)],
			..Default::default()
		}],
		syntax: Some("proto3".to_owned()),
		..Default::default()
	}
}

fn test_file() -> FileDescriptorProto {
	let color = EnumDescriptorProto {
		name: Some("Color".to_owned()),
		value: ["COLOR_UNSPECIFIED", "RED", "GREEN"]
			.into_iter()
			.zip(0..)
			.map(|(name, number)| EnumValueDescriptorProto {
				name: Some(name.to_owned()),
				number: Some(number),
				..Default::default()
			})
			.collect(),
		..Default::default()
	};

	let inner = DescriptorProto {
		name: Some("Inner".to_owned()),
		field: vec![repeated(scalar("list", 1, Type::Int64)), scalar("label", 2, Type::String)],
		..Default::default()
	};

	let test = DescriptorProto {
		name: Some("Test".to_owned()),
		field: vec![
			scalar("name", 1, Type::String),
			repeated(scalar("tags", 2, Type::String)),
			map_field("counts", 3, ".protomap.test.Test.CountsEntry"),
			typed("when", 4, Type::Message, ".google.protobuf.Timestamp"),
			typed("span", 5, Type::Message, ".google.protobuf.Duration"),
			scalar("flag", 6, Type::Bool),
			scalar("small", 7, Type::Int32),
			scalar("big", 8, Type::Int64),
			scalar("usmall", 9, Type::Uint32),
			scalar("ubig", 10, Type::Uint64),
			scalar("ratio", 11, Type::Float),
			scalar("score", 12, Type::Double),
			scalar("blob", 13, Type::Bytes),
			typed("color", 14, Type::Enum, ".protomap.test.Color"),
			typed("inner", 15, Type::Message, ".protomap.test.Inner"),
			repeated(typed("inners", 16, Type::Message, ".protomap.test.Inner")),
			map_field("id_map", 17, ".protomap.test.Test.IdMapEntry"),
			in_oneof(scalar("text", 18, Type::String), 0),
			in_oneof(scalar("number", 19, Type::Int64), 0),
			in_oneof(typed("nested", 20, Type::Message, ".protomap.test.Inner"), 0),
			repeated(typed("colors", 21, Type::Enum, ".protomap.test.Color")),
			scalar("sint", 22, Type::Sint64),
			scalar("fixed", 23, Type::Fixed32),
			repeated(typed("timeline", 24, Type::Message, ".google.protobuf.Timestamp")),
			map_field("spans", 25, ".protomap.test.Test.SpansEntry"),
		],
		nested_type: vec![
			map_entry("CountsEntry", scalar("key", 1, Type::String), scalar("value", 2, Type::Int64)),
			map_entry("IdMapEntry", scalar("key", 1, Type::Int32), scalar("value", 2, Type::String)),
			map_entry("SpansEntry", scalar("key", 1, Type::String), typed("value", 2, Type::Message, ".google.protobuf.Duration")),
		],
		oneof_decl: vec![OneofDescriptorProto {
			name: Some("choice".to_owned()),
			..Default::default()
		}],
		..Default::default()
	};

	let event = DescriptorProto {
		name: Some("Event".to_owned()),
		field: vec![
			scalar("name", 1, Type::String),
			repeated(scalar("tags", 2, Type::String)),
			map_field("counts", 3, ".protomap.test.Event.CountsEntry"),
			typed("when", 4, Type::Message, ".google.protobuf.Timestamp"),
		],
		nested_type: vec![map_entry("CountsEntry", scalar("key", 1, Type::String), scalar("value", 2, Type::Int64))],
		..Default::default()
	};

	FileDescriptorProto {
		name: Some("protomap/test.proto".to_owned()),
		package: Some("protomap.test".to_owned()),
		dependency: vec!["google/protobuf/timestamp.proto".to_owned(), "google/protobuf/duration.proto".to_owned()],
		message_type: vec![inner, test, event],
		enum_type: vec![color],
		syntax: Some("proto3".to_owned()),
		..Default::default()
	}
}

fn legacy_file() -> FileDescriptorProto {
	let mut id = scalar("id", 1, Type::String);
	id.label = Some(Label::Required as i32);

	FileDescriptorProto {
		name: Some("protomap/legacy.proto".to_owned()),
		package: Some("protomap.legacy".to_owned()),
		message_type: vec![DescriptorProto {
			name: Some("Legacy".to_owned()),
			field: vec![id, scalar("count", 2, Type::Int32), repeated(scalar("notes", 3, Type::String))],
			..Default::default()
		}],
		syntax: Some("proto2".to_owned()),
		..Default::default()
	}
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
	FieldDescriptorProto {
		name: Some(name.to_owned()),
		number: Some(number),
		label: Some(Label::Optional as i32),
		r#type: Some(ty as i32),
		..Default::default()
	}
}

fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
	FieldDescriptorProto {
		type_name: Some(type_name.to_owned()),
		..scalar(name, number, ty)
	}
}

fn repeated(field: FieldDescriptorProto) -> FieldDescriptorProto {
	FieldDescriptorProto {
		label: Some(Label::Repeated as i32),
		..field
	}
}

fn in_oneof(field: FieldDescriptorProto, oneof_index: i32) -> FieldDescriptorProto {
	FieldDescriptorProto {
		oneof_index: Some(oneof_index),
		..field
	}
}

fn map_field(name: &str, number: i32, entry: &str) -> FieldDescriptorProto {
	repeated(typed(name, number, Type::Message, entry))
}

fn map_entry(name: &str, key: FieldDescriptorProto, value: FieldDescriptorProto) -> DescriptorProto {
	DescriptorProto {
		name: Some(name.to_owned()),
		field: vec![key, value],
		options: Some(MessageOptions {
			map_entry: Some(true),
			..Default::default()
		}),
		..Default::default()
	}
}
