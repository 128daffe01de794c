use std::borrow::Cow;

use chrono::{DateTime, TimeDelta, Utc};
use prost_reflect::{DynamicMessage, ReflectMessage, SetFieldError, Value as ReflectValue};
use thiserror::Error;

use crate::proto::{DecodeInterceptor, EncodeInterceptor, Intercept, Value};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Failures raised by the time interceptors; surfaced through [`MapError::Interceptor`](crate::proto::MapError::Interceptor).
#[derive(Debug, Error)]
pub enum WellKnownError {
	/// Message lacks a `seconds`/`nanos` field of the expected kind.
	#[error("{message} has no usable {field} field")]
	MalformedMessage {
		/// Fully-qualified message name.
		message: String,
		/// Missing field.
		field: &'static str,
	},
	/// Seconds and nanos name an instant outside the supported calendar range.
	#[error("timestamp {seconds}s {nanos}ns is out of range")]
	TimestampOutOfRange {
		/// Stored seconds.
		seconds: i64,
		/// Stored nanos.
		nanos: i32,
	},
	/// Storage rejected a seconds/nanos value.
	#[error("set {message}.{field}: {source}")]
	SetField {
		/// Fully-qualified message name.
		message: String,
		/// Field being written.
		field: &'static str,
		/// Storage failure.
		#[source]
		source: SetFieldError,
	},
}

/// Maps a seconds/nanos timestamp message to [`Value::Timestamp`] and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampInterceptor {
	full_name: Cow<'static, str>,
}

impl TimestampInterceptor {
	/// Interceptor for `google.protobuf.Timestamp`.
	pub const WELL_KNOWN: Self = Self {
		full_name: Cow::Borrowed("google.protobuf.Timestamp"),
	};

	/// Interceptor for any message with the timestamp layout under another name.
	pub fn for_message(full_name: impl Into<Cow<'static, str>>) -> Self {
		Self { full_name: full_name.into() }
	}

	/// Fully-qualified message name this interceptor applies to.
	pub fn full_name(&self) -> &str {
		&self.full_name
	}
}

impl Default for TimestampInterceptor {
	fn default() -> Self {
		Self::WELL_KNOWN
	}
}

impl DecodeInterceptor for TimestampInterceptor {
	fn decode(&self, message: &DynamicMessage) -> Intercept<Value> {
		if message.descriptor().full_name() != self.full_name {
			return Intercept::Declined;
		}
		finish(read_parts(message).and_then(|(seconds, nanos)| timestamp_from_parts(seconds, nanos)).map(Value::Timestamp))
	}
}

impl EncodeInterceptor for TimestampInterceptor {
	fn encode(&self, input: &Value, message: &mut DynamicMessage) -> Intercept<()> {
		let Value::Timestamp(instant) = input else {
			return Intercept::Declined;
		};
		if message.descriptor().full_name() != self.full_name {
			return Intercept::Declined;
		}
		// Leap-second nanos stay below i32::MAX.
		finish(write_parts(message, instant.timestamp(), instant.timestamp_subsec_nanos() as i32))
	}
}

/// Maps a seconds/nanos duration message to [`Value::Duration`] and back.
///
/// Spans beyond [`TimeDelta::MAX`] or [`TimeDelta::MIN`] saturate toward the sign of `seconds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationInterceptor {
	full_name: Cow<'static, str>,
}

impl DurationInterceptor {
	/// Interceptor for `google.protobuf.Duration`.
	pub const WELL_KNOWN: Self = Self {
		full_name: Cow::Borrowed("google.protobuf.Duration"),
	};

	/// Interceptor for any message with the duration layout under another name.
	pub fn for_message(full_name: impl Into<Cow<'static, str>>) -> Self {
		Self { full_name: full_name.into() }
	}

	/// Fully-qualified message name this interceptor applies to.
	pub fn full_name(&self) -> &str {
		&self.full_name
	}
}

impl Default for DurationInterceptor {
	fn default() -> Self {
		Self::WELL_KNOWN
	}
}

impl DecodeInterceptor for DurationInterceptor {
	fn decode(&self, message: &DynamicMessage) -> Intercept<Value> {
		if message.descriptor().full_name() != self.full_name {
			return Intercept::Declined;
		}
		finish(read_parts(message).map(|(seconds, nanos)| Value::Duration(duration_from_parts(seconds, nanos))))
	}
}

impl EncodeInterceptor for DurationInterceptor {
	fn encode(&self, input: &Value, message: &mut DynamicMessage) -> Intercept<()> {
		let Value::Duration(span) = input else {
			return Intercept::Declined;
		};
		if message.descriptor().full_name() != self.full_name {
			return Intercept::Declined;
		}
		finish(write_parts(message, span.num_seconds(), span.subsec_nanos()))
	}
}

static TIMESTAMP: TimestampInterceptor = TimestampInterceptor::WELL_KNOWN;
static DURATION: DurationInterceptor = DurationInterceptor::WELL_KNOWN;

/// Decode chain for `google.protobuf.Timestamp` and `google.protobuf.Duration`.
pub fn well_known_decoders() -> [&'static dyn DecodeInterceptor; 2] {
	[&TIMESTAMP, &DURATION]
}

/// Encode chain for `google.protobuf.Timestamp` and `google.protobuf.Duration`.
pub fn well_known_encoders() -> [&'static dyn EncodeInterceptor; 2] {
	[&TIMESTAMP, &DURATION]
}

fn finish<T>(result: Result<T, WellKnownError>) -> Intercept<T> {
	match result {
		Ok(value) => Intercept::Applied(value),
		Err(err) => Intercept::Failed(Box::new(err)),
	}
}

fn read_parts(message: &DynamicMessage) -> Result<(i64, i32), WellKnownError> {
	let seconds = message
		.get_field_by_name("seconds")
		.and_then(|value| value.as_i64())
		.ok_or_else(|| malformed(message, "seconds"))?;
	let nanos = message
		.get_field_by_name("nanos")
		.and_then(|value| value.as_i32())
		.ok_or_else(|| malformed(message, "nanos"))?;
	Ok((seconds, nanos))
}

fn write_parts(message: &mut DynamicMessage, seconds: i64, nanos: i32) -> Result<(), WellKnownError> {
	for (field, value) in [("seconds", ReflectValue::I64(seconds)), ("nanos", ReflectValue::I32(nanos))] {
		let descriptor = message.descriptor().get_field_by_name(field).ok_or_else(|| malformed(message, field))?;
		message.try_set_field(&descriptor, value).map_err(|source| WellKnownError::SetField {
			message: message.descriptor().full_name().to_owned(),
			field,
			source,
		})?;
	}
	Ok(())
}

fn malformed(message: &DynamicMessage, field: &'static str) -> WellKnownError {
	WellKnownError::MalformedMessage {
		message: message.descriptor().full_name().to_owned(),
		field,
	}
}

fn timestamp_from_parts(seconds: i64, nanos: i32) -> Result<DateTime<Utc>, WellKnownError> {
	let nanos_wide = i64::from(nanos);
	seconds
		.checked_add(nanos_wide.div_euclid(NANOS_PER_SECOND))
		.and_then(|whole| DateTime::<Utc>::from_timestamp(whole, nanos_wide.rem_euclid(NANOS_PER_SECOND) as u32))
		.ok_or(WellKnownError::TimestampOutOfRange { seconds, nanos })
}

fn duration_from_parts(seconds: i64, nanos: i32) -> TimeDelta {
	let saturated = if seconds < 0 { TimeDelta::MIN } else { TimeDelta::MAX };
	TimeDelta::try_seconds(seconds)
		.and_then(|whole| whole.checked_add(&TimeDelta::nanoseconds(i64::from(nanos))))
		.unwrap_or(saturated)
}
