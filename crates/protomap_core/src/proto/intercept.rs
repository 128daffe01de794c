use prost_reflect::{DynamicMessage, ReflectMessage};

use crate::proto::{BoxError, MapError, Result, Value};

/// Outcome of consulting one interceptor.
#[derive(Debug)]
pub enum Intercept<T> {
	/// Not applicable; the next interceptor or default handling runs.
	Declined,
	/// Applied; the payload is final for this message.
	Applied(T),
	/// Applicable but failed; the whole call aborts with this error.
	Failed(BoxError),
}

/// Override for turning a message into a generic value.
pub trait DecodeInterceptor {
	/// Inspect `message` and either decline or produce its value.
	fn decode(&self, message: &DynamicMessage) -> Intercept<Value>;
}

/// Override for populating a message from a generic value.
pub trait EncodeInterceptor {
	/// Inspect `input` and the target `message` and either decline or fully populate it.
	fn encode(&self, input: &Value, message: &mut DynamicMessage) -> Intercept<()>;
}

impl<F> DecodeInterceptor for F
where
	F: Fn(&DynamicMessage) -> Intercept<Value>,
{
	fn decode(&self, message: &DynamicMessage) -> Intercept<Value> {
		self(message)
	}
}

impl<F> EncodeInterceptor for F
where
	F: Fn(&Value, &mut DynamicMessage) -> Intercept<()>,
{
	fn encode(&self, input: &Value, message: &mut DynamicMessage) -> Intercept<()> {
		self(input, message)
	}
}

/// Run the decode chain; `Some` when an interceptor applied.
pub(crate) fn run_decode_chain(chain: &[&dyn DecodeInterceptor], message: &DynamicMessage) -> Result<Option<Value>> {
	for (position, interceptor) in chain.iter().enumerate() {
		match interceptor.decode(message) {
			Intercept::Declined => continue,
			Intercept::Applied(value) => {
				tracing::trace!(message = message.descriptor().full_name(), position, "decode interceptor applied");
				return Ok(Some(value));
			}
			Intercept::Failed(err) => return Err(MapError::Interceptor(err)),
		}
	}
	Ok(None)
}

/// Run the encode chain; `true` when an interceptor populated the message.
pub(crate) fn run_encode_chain(chain: &[&dyn EncodeInterceptor], input: &Value, message: &mut DynamicMessage) -> Result<bool> {
	for (position, interceptor) in chain.iter().enumerate() {
		match interceptor.encode(input, message) {
			Intercept::Declined => continue,
			Intercept::Applied(()) => {
				tracing::trace!(message = message.descriptor().full_name(), position, "encode interceptor applied");
				return Ok(true);
			}
			Intercept::Failed(err) => return Err(MapError::Interceptor(err)),
		}
	}
	Ok(false)
}
