use std::path::PathBuf;

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, MapError>;

/// Opaque error raised by an interceptor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while loading descriptors and mapping messages.
#[derive(Debug, Error)]
pub enum MapError {
	/// Filesystem failure other than a missing file.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Descriptor-set file does not exist.
	#[error("no such file: {}", path.display())]
	NoSuchFile {
		/// Requested path.
		path: PathBuf,
	},
	/// Descriptor-set bytes could not be decoded or linked.
	#[error("invalid descriptor set {origin}: {source}")]
	InvalidDescriptorSet {
		/// File path or other label for the offending set.
		origin: String,
		/// Underlying descriptor failure.
		#[source]
		source: prost_reflect::DescriptorError,
	},
	/// Requested message name is not in the pool.
	#[error("no such message in descriptor pool: {name}")]
	NoSuchMessage {
		/// Fully-qualified message name.
		name: String,
	},
	/// Descriptor declares a kind that cannot be represented in this position.
	#[error("unsupported field kind {kind} as {role}")]
	UnsupportedFieldKind {
		/// Kind label.
		kind: &'static str,
		/// Position the kind appeared in, e.g. `map key`.
		role: &'static str,
	},
	/// Input value shape disagrees with the field cardinality.
	#[error("shape mismatch: expected {expected}, got {got}")]
	ShapeMismatch {
		/// Expected shape.
		expected: &'static str,
		/// Actual value kind.
		got: &'static str,
	},
	/// Scalar coercion failure.
	#[error("type mismatch: expected {expected}, got {got}")]
	TypeMismatch {
		/// Target kind.
		expected: &'static str,
		/// Actual value kind.
		got: &'static str,
	},
	/// Integer does not fit the target width under checked narrowing.
	#[error("integer {value} out of range for {kind}")]
	IntegerOutOfRange {
		/// Target kind.
		kind: &'static str,
		/// Offending value rendered as text.
		value: String,
	},
	/// Non-optional field has no input entry.
	#[error("{field} is not optional, but input has no such key")]
	MissingRequiredField {
		/// Field name.
		field: String,
	},
	/// Enum name is not declared by the enum.
	#[error("unknown name {name:?} for enum {enum_name}")]
	UnknownEnumName {
		/// Fully-qualified enum name.
		enum_name: String,
		/// Offending symbolic name.
		name: String,
	},
	/// Enum number is not declared by the enum.
	#[error("unknown number {number} for enum {enum_name}")]
	UnknownEnumNumber {
		/// Fully-qualified enum name.
		enum_name: String,
		/// Offending number.
		number: i64,
	},
	/// Input sets more than one member of a oneof under the reject policy.
	#[error("oneof {oneof} has more than one member set: {first}, {second}")]
	OneofConflict {
		/// Oneof name.
		oneof: String,
		/// First member present, in descriptor order.
		first: String,
		/// Second member present, in descriptor order.
		second: String,
	},
	/// Message storage rejected a converted value.
	#[error("set field {field}: {source}")]
	SetField {
		/// Field name.
		field: String,
		/// Storage failure.
		#[source]
		source: prost_reflect::SetFieldError,
	},
	/// Wire bytes could not be decoded into the message.
	#[error("wire decode: {0}")]
	WireDecode(#[from] prost::DecodeError),
	/// Message could not be written into the output buffer.
	#[error("wire encode: {0}")]
	WireEncode(#[from] prost::EncodeError),
	/// Failure raised by an interceptor, passed through verbatim.
	#[error(transparent)]
	Interceptor(BoxError),
	/// Failure inside a singular field.
	#[error("{field}: {source}")]
	Field {
		/// Field name.
		field: String,
		/// Underlying failure.
		#[source]
		source: Box<MapError>,
	},
	/// Failure at one element of a list field.
	#[error("{field}.{index}: {source}")]
	Index {
		/// Field name.
		field: String,
		/// Element index.
		index: usize,
		/// Underlying failure.
		#[source]
		source: Box<MapError>,
	},
	/// Failure at one entry of a map field.
	#[error("{field}.{key}: {source}")]
	Key {
		/// Field name.
		field: String,
		/// Map key text.
		key: String,
		/// Underlying failure.
		#[source]
		source: Box<MapError>,
	},
}

impl MapError {
	pub(crate) fn in_field(self, field: &str) -> Self {
		MapError::Field {
			field: field.to_owned(),
			source: Box::new(self),
		}
	}

	pub(crate) fn at_index(self, field: &str, index: usize) -> Self {
		MapError::Index {
			field: field.to_owned(),
			index,
			source: Box::new(self),
		}
	}

	pub(crate) fn at_key(self, field: &str, key: &str) -> Self {
		MapError::Key {
			field: field.to_owned(),
			key: key.to_owned(),
			source: Box::new(self),
		}
	}

	/// Strip positional context and return the underlying failure.
	pub fn innermost(&self) -> &MapError {
		let mut current = self;
		while let MapError::Field { source, .. } | MapError::Index { source, .. } | MapError::Key { source, .. } = current {
			current = source;
		}
		current
	}

	/// Dotted location of the failure, empty when it has no positional context.
	pub fn path(&self) -> String {
		let mut segments = Vec::new();
		let mut current = self;
		loop {
			match current {
				MapError::Field { field, source } => {
					segments.push(field.clone());
					current = source;
				}
				MapError::Index { field, index, source } => {
					segments.push(format!("{field}.{index}"));
					current = source;
				}
				MapError::Key { field, key, source } => {
					segments.push(format!("{field}.{key}"));
					current = source;
				}
				_ => break,
			}
		}
		segments.join(".")
	}
}
