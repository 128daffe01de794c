#![allow(missing_docs)]

use std::cell::Cell;

use chrono::TimeDelta;
use prost_reflect::{DynamicMessage, ReflectMessage};
use protomap::proto::{
	DecodeInterceptor, DurationInterceptor, EncodeInterceptor, Intercept, Map, MapError, Mapper, Value, coerce_str, decode_message, encode_message,
	well_known_decoders, well_known_encoders,
};

fn mapper() -> Mapper {
	Mapper::new(protomap_testkit::sample_pool())
}

fn test_collections() -> Map {
	let lists = ["tags", "inners", "colors", "timeline"].map(|name| (name.to_owned(), Value::List(Vec::new())));
	let maps = ["counts", "id_map", "spans"].map(|name| (name.to_owned(), Value::Map(Map::new())));
	lists.into_iter().chain(maps).collect()
}

fn event_bytes(mapper: &Mapper) -> Vec<u8> {
	let input = Value::from_iter([
		("name", Value::from("a")),
		("tags", Value::List(Vec::new())),
		("counts", Value::from_iter([("k", 3_i64)])),
	]);
	mapper.encode(&input, "protomap.test.Event", &[]).expect("encode succeeds")
}

#[test]
fn first_applying_interceptor_short_circuits_the_rest() {
	let mapper = mapper();
	let later_calls = Cell::new(0);

	let summarize = |message: &DynamicMessage| Intercept::Applied(Value::from(message.descriptor().name()));
	let never = |_: &DynamicMessage| {
		later_calls.set(later_calls.get() + 1);
		Intercept::Declined
	};
	let chain: [&dyn DecodeInterceptor; 2] = [&summarize, &never];

	let decoded = mapper.decode(&event_bytes(&mapper), "protomap.test.Event", &chain).expect("decode succeeds");
	assert_eq!(decoded, Value::from("Event"));
	assert_eq!(later_calls.get(), 0);
}

#[test]
fn removing_the_first_interceptor_exposes_the_second() {
	let mapper = mapper();
	let first = |_: &DynamicMessage| Intercept::Applied(Value::from("first"));
	let second = |_: &DynamicMessage| Intercept::Applied(Value::from("second"));

	let both: [&dyn DecodeInterceptor; 2] = [&first, &second];
	let only_second: [&dyn DecodeInterceptor; 1] = [&second];
	let bytes = event_bytes(&mapper);

	assert_eq!(mapper.decode(&bytes, "protomap.test.Event", &both).expect("decode succeeds"), Value::from("first"));
	assert_eq!(mapper.decode(&bytes, "protomap.test.Event", &only_second).expect("decode succeeds"), Value::from("second"));
}

fn labelled(label: &'static str) -> impl Fn(&Value, &mut DynamicMessage) -> Intercept<()> {
	move |_: &Value, message: &mut DynamicMessage| {
		message.set_field_by_name("label", prost_reflect::Value::String(label.to_owned()));
		Intercept::Applied(())
	}
}

fn label_of(message: &DynamicMessage) -> Option<Value> {
	decode_message(message, &[]).expect("decode succeeds").get("label").cloned()
}

#[test]
fn first_applying_encoder_short_circuits_the_rest() {
	let mapper = mapper();
	let later_calls = Cell::new(0);

	let first = labelled("first");
	let second = |input: &Value, message: &mut DynamicMessage| {
		later_calls.set(later_calls.get() + 1);
		labelled("second")(input, message)
	};

	let both: [&dyn EncodeInterceptor; 2] = [&first, &second];
	let message = mapper.to_message(&Value::Null, "protomap.test.Inner", &both).expect("encode succeeds");
	assert_eq!(label_of(&message), Some(Value::from("first")));
	assert_eq!(later_calls.get(), 0);

	let only_second: [&dyn EncodeInterceptor; 1] = [&second];
	let message = mapper.to_message(&Value::Null, "protomap.test.Inner", &only_second).expect("encode succeeds");
	assert_eq!(label_of(&message), Some(Value::from("second")));
	assert_eq!(later_calls.get(), 1);
}

#[test]
fn failing_encoder_stops_the_chain() {
	let mapper = mapper();
	let later_calls = Cell::new(0);

	let refuse = |_: &Value, _: &mut DynamicMessage| Intercept::<()>::Failed("refused".into());
	let second = |input: &Value, message: &mut DynamicMessage| {
		later_calls.set(later_calls.get() + 1);
		labelled("second")(input, message)
	};
	let chain: [&dyn EncodeInterceptor; 2] = [&refuse, &second];

	let err = mapper.to_message(&Value::Null, "protomap.test.Inner", &chain).expect_err("interceptor failure propagates");
	assert!(matches!(err, MapError::Interceptor(_)));
	assert_eq!(err.to_string(), "refused");
	assert_eq!(later_calls.get(), 0);
}

#[test]
fn declining_interceptors_see_every_message_level() {
	let mapper = mapper();
	let seen = Cell::new(0);
	let count = |_: &DynamicMessage| {
		seen.set(seen.get() + 1);
		Intercept::Declined
	};
	let chain: [&dyn DecodeInterceptor; 1] = [&count];

	mapper.decode(&event_bytes(&mapper), "protomap.test.Event", &chain).expect("decode succeeds");
	// Event itself plus the default Timestamp in `when`.
	assert_eq!(seen.get(), 2);
}

#[test]
fn custom_encoder_populates_nested_messages() {
	let mapper = mapper();
	let from_label = |input: &Value, message: &mut DynamicMessage| {
		if message.descriptor().full_name() != "protomap.test.Inner" {
			return Intercept::Declined;
		}
		match coerce_str(input) {
			Ok(label) => {
				message.set_field_by_name("label", prost_reflect::Value::String(label.to_owned()));
				Intercept::Applied(())
			}
			Err(err) => Intercept::Failed(Box::new(err)),
		}
	};
	let chain: [&dyn EncodeInterceptor; 1] = [&from_label];

	let mut input = test_collections();
	input.insert("inner".to_owned(), Value::from("solo"));
	input.insert("inners".to_owned(), Value::List(vec![Value::from("a"), Value::from("b")]));

	let bytes = mapper.encode(&Value::Map(input), "protomap.test.Test", &chain).expect("encode succeeds");
	let decoded = mapper.decode(&bytes, "protomap.test.Test", &[]).expect("decode succeeds");

	let label = |item: &Value| item.get("label").cloned();
	assert_eq!(decoded.get("inner").and_then(label), Some(Value::from("solo")));
	let inners = decoded.get("inners").and_then(Value::as_list).expect("inners decode as list");
	assert_eq!(inners.iter().filter_map(label).collect::<Vec<_>>(), vec![Value::from("a"), Value::from("b")]);

	let err = mapper.to_message(&Value::from(5_i64), "protomap.test.Inner", &chain).expect_err("interceptor failure propagates");
	assert!(matches!(err, MapError::Interceptor(_)));
	assert_eq!(err.to_string(), "type mismatch: expected string, got i64");
}

#[test]
fn well_known_interceptors_round_trip_durations() {
	let mapper = mapper();
	let duration = mapper.message("google.protobuf.Duration").expect("fixture message exists");

	let mut message = DynamicMessage::new(duration);
	let span = TimeDelta::milliseconds(1500);
	let encoders: [&dyn EncodeInterceptor; 1] = [&DurationInterceptor::WELL_KNOWN];
	encode_message(&Value::Duration(span), &mut message, &encoders, &mapper.options()).expect("duration encodes");

	assert_eq!(decode_message(&message, &well_known_decoders()).expect("duration decodes"), Value::Duration(span));
	assert_eq!(
		decode_message(&message, &[]).expect("raw decode succeeds"),
		Value::from_iter([("seconds", 1_i64), ("nanos", 500_000_000_i64)])
	);
}

#[test]
fn interceptor_failures_inside_lists_carry_the_path() {
	let mapper = mapper();
	let mut input = test_collections();
	input.insert(
		"timeline".to_owned(),
		Value::List(vec![Value::from_iter([("seconds", i64::MAX), ("nanos", 0)])]),
	);

	let bytes = mapper.encode(&Value::Map(input), "protomap.test.Test", &well_known_encoders()).expect("raw seconds encode");
	let err = mapper.decode(&bytes, "protomap.test.Test", &well_known_decoders()).expect_err("out of range timestamp fails");

	assert_eq!(err.path(), "timeline.0");
	assert!(matches!(err.innermost(), MapError::Interceptor(_)));
	assert_eq!(err.innermost().to_string(), format!("timestamp {}s 0ns is out of range", i64::MAX));
}
