use std::path::Path;

use prost::Message;
use prost::bytes::BufMut;
use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor};

use crate::proto::{DecodeInterceptor, EncodeInterceptor, MapError, MapOptions, Result, Value, decode_message, encode_message};

/// Descriptor pool plus encode options; entry point for byte-level decode and encode.
#[derive(Debug, Clone)]
pub struct Mapper {
	pool: DescriptorPool,
	options: MapOptions,
}

impl Mapper {
	/// Wrap an existing pool with default options.
	pub fn new(pool: DescriptorPool) -> Self {
		Self {
			pool,
			options: MapOptions::default(),
		}
	}

	/// Replace the encode options.
	pub fn with_options(mut self, options: MapOptions) -> Self {
		self.options = options;
		self
	}

	/// Build a mapper from one serialized `FileDescriptorSet`.
	pub fn from_descriptor_set(bytes: &[u8]) -> Result<Self> {
		let pool = DescriptorPool::decode(bytes).map_err(|source| MapError::InvalidDescriptorSet {
			origin: "<bytes>".to_owned(),
			source,
		})?;
		Ok(Self::new(pool))
	}

	/// Build a mapper from serialized `FileDescriptorSet` files, merged in order.
	pub fn from_descriptor_set_files<I, P>(paths: I) -> Result<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		let mut pool = DescriptorPool::new();
		for path in paths {
			let path = path.as_ref();
			let bytes = std::fs::read(path).map_err(|err| match err.kind() {
				std::io::ErrorKind::NotFound => MapError::NoSuchFile { path: path.to_path_buf() },
				_ => MapError::Io(err),
			})?;
			pool.decode_file_descriptor_set(bytes.as_slice())
				.map_err(|source| MapError::InvalidDescriptorSet {
					origin: path.display().to_string(),
					source,
				})?;
			tracing::debug!(path = %path.display(), messages = pool.all_messages().count(), "loaded descriptor set");
		}
		Ok(Self::new(pool))
	}

	/// Descriptor pool backing this mapper.
	pub fn pool(&self) -> &DescriptorPool {
		&self.pool
	}

	/// Active encode options.
	pub fn options(&self) -> MapOptions {
		self.options
	}

	/// Resolve a fully-qualified message name.
	pub fn message(&self, name: &str) -> Result<MessageDescriptor> {
		self.pool.get_message_by_name(name).ok_or_else(|| MapError::NoSuchMessage { name: name.to_owned() })
	}

	/// Parse wire `bytes` as `message_name` and decode the result.
	pub fn decode(&self, bytes: &[u8], message_name: &str, interceptors: &[&dyn DecodeInterceptor]) -> Result<Value> {
		let descriptor = self.message(message_name)?;
		let message = DynamicMessage::decode(descriptor, bytes)?;
		tracing::debug!(message = message_name, bytes = bytes.len(), "decoding message");
		decode_message(&message, interceptors)
	}

	/// Build a fresh `message_name` populated from `value`.
	pub fn to_message(&self, value: &Value, message_name: &str, interceptors: &[&dyn EncodeInterceptor]) -> Result<DynamicMessage> {
		let mut message = DynamicMessage::new(self.message(message_name)?);
		encode_message(value, &mut message, interceptors, &self.options)?;
		Ok(message)
	}

	/// Encode `value` as `message_name` and serialize it.
	pub fn encode(&self, value: &Value, message_name: &str, interceptors: &[&dyn EncodeInterceptor]) -> Result<Vec<u8>> {
		let bytes = self.to_message(value, message_name, interceptors)?.encode_to_vec();
		tracing::debug!(message = message_name, bytes = bytes.len(), "encoded message");
		Ok(bytes)
	}

	/// Encode `value` as `message_name` and append the wire form to `buf`.
	pub fn encode_into<B: BufMut>(&self, value: &Value, message_name: &str, interceptors: &[&dyn EncodeInterceptor], buf: &mut B) -> Result<()> {
		self.to_message(value, message_name, interceptors)?.encode(buf)?;
		Ok(())
	}
}
