use prost_reflect::{DynamicMessage, Value as ReflectValue};

use super::encode_message;
use crate::proto::{Map, MapError, MapOptions, Value};

fn message(name: &str) -> DynamicMessage {
	let pool = protomap_testkit::sample_pool();
	DynamicMessage::new(pool.get_message_by_name(name).expect("fixture message exists"))
}

/// Minimal valid `protomap.test.Test` input: every repeated and map field present and empty.
fn test_input() -> Map {
	let lists = ["tags", "inners", "colors", "timeline"].map(|name| (name.to_owned(), Value::List(Vec::new())));
	let maps = ["counts", "id_map", "spans"].map(|name| (name.to_owned(), Value::Map(Map::new())));
	lists.into_iter().chain(maps).collect()
}

fn encode(name: &str, input: Map, options: &MapOptions) -> Result<DynamicMessage, MapError> {
	let mut target = message(name);
	encode_message(&Value::Map(input), &mut target, &[], options)?;
	Ok(target)
}

#[test]
fn non_map_input_is_a_shape_mismatch() {
	let mut target = message("protomap.test.Inner");
	let err = encode_message(&Value::from(3_i64), &mut target, &[], &MapOptions::default()).expect_err("scalar input fails");
	assert!(matches!(err, MapError::ShapeMismatch { expected: "map", got: "i64" }));
}

#[test]
fn scalar_for_list_field_is_a_shape_mismatch() {
	let mut input = test_input();
	input.insert("tags".to_owned(), Value::from("solo"));

	let err = encode("protomap.test.Test", input, &MapOptions::default()).expect_err("scalar list fails");
	assert_eq!(err.path(), "tags");
	assert!(matches!(err.innermost(), MapError::ShapeMismatch { expected: "list", got: "string" }));
}

#[test]
fn optional_fields_may_be_absent_or_null() {
	let mut input = test_input();
	input.insert("name".to_owned(), Value::Null);

	let encoded = encode("protomap.test.Test", input, &MapOptions::default()).expect("encode succeeds");
	assert!(!encoded.has_field_by_name("name"));
	assert!(!encoded.has_field_by_name("inner"));
}

#[test]
fn repeated_and_required_fields_must_be_present() {
	let err = encode("protomap.test.Inner", Map::new(), &MapOptions::default()).expect_err("missing list fails");
	assert!(matches!(err, MapError::MissingRequiredField { ref field } if field == "list"));

	let mut input = Map::new();
	input.insert("notes".to_owned(), Value::List(Vec::new()));
	let err = encode("protomap.legacy.Legacy", input.clone(), &MapOptions::default()).expect_err("missing required fails");
	assert!(matches!(err, MapError::MissingRequiredField { ref field } if field == "id"));

	input.insert("id".to_owned(), Value::from("a-1"));
	let encoded = encode("protomap.legacy.Legacy", input, &MapOptions::default()).expect("encode succeeds");
	assert_eq!(encoded.get_field_by_name("id").as_deref(), Some(&ReflectValue::String("a-1".to_owned())));
	assert!(!encoded.has_field_by_name("count"));
}

#[test]
fn oneof_last_member_in_descriptor_order_wins() {
	let mut input = test_input();
	input.insert("text".to_owned(), Value::from("first"));
	input.insert("number".to_owned(), Value::I64(9));

	let encoded = encode("protomap.test.Test", input, &MapOptions::default()).expect("encode succeeds");
	assert!(!encoded.has_field_by_name("text"));
	assert_eq!(encoded.get_field_by_name("number").as_deref(), Some(&ReflectValue::I64(9)));
}

#[test]
fn oneof_reject_policy_names_both_members() {
	let mut input = test_input();
	input.insert("nested".to_owned(), Value::from_iter([("list", Value::List(Vec::new()))]));
	input.insert("text".to_owned(), Value::from("first"));

	let err = encode("protomap.test.Test", input, &MapOptions::strict()).expect_err("conflict fails");
	match err {
		MapError::OneofConflict { oneof, first, second } => {
			assert_eq!(oneof, "choice");
			assert_eq!(first, "text");
			assert_eq!(second, "nested");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn nested_failures_carry_the_full_path() {
	let good = Value::from_iter([("list", Value::List(vec![Value::I64(1)]))]);
	let bad = Value::from_iter([("list", Value::List(vec![Value::from("nope")]))]);

	let mut input = test_input();
	input.insert("inners".to_owned(), Value::List(vec![good, bad]));

	let err = encode("protomap.test.Test", input, &MapOptions::default()).expect_err("bad element fails");
	assert_eq!(err.path(), "inners.1.list.0");
	assert!(matches!(err.innermost(), MapError::TypeMismatch { expected: "integer", got: "string" }));
}

#[test]
fn map_keys_are_parsed_per_key_kind() {
	let mut input = test_input();
	input.insert("id_map".to_owned(), Value::from_iter([("12", "twelve")]));
	let encoded = encode("protomap.test.Test", input, &MapOptions::default()).expect("encode succeeds");
	let stored = encoded.get_field_by_name("id_map").expect("field exists");
	let entries = stored.as_map().expect("map storage");
	assert_eq!(entries.len(), 1);

	let mut input = test_input();
	input.insert("id_map".to_owned(), Value::from_iter([("twelve", "twelve")]));
	let err = encode("protomap.test.Test", input, &MapOptions::default()).expect_err("bad key fails");
	assert_eq!(err.path(), "id_map.twelve");
}

#[test]
fn checked_narrowing_rejects_wide_values() {
	let mut input = test_input();
	input.insert("small".to_owned(), Value::I64(i64::from(i32::MAX) + 1));

	let truncated = encode("protomap.test.Test", input.clone(), &MapOptions::default()).expect("truncation succeeds");
	assert_eq!(truncated.get_field_by_name("small").as_deref(), Some(&ReflectValue::I32(i32::MIN)));

	let err = encode("protomap.test.Test", input, &MapOptions::strict()).expect_err("checked fails");
	assert_eq!(err.path(), "small");
	assert!(matches!(err.innermost(), MapError::IntegerOutOfRange { kind: "int32", .. }));
}
