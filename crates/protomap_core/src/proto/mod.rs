mod coerce;
mod decode;
mod encode;
mod error;
mod intercept;
mod mapper;
mod options;
mod shape;
mod value;
mod well_known;

/// Public scalar coercion rules shared with interceptor authors.
pub use coerce::{coerce_bool, coerce_bytes, coerce_f64, coerce_i64, coerce_str, coerce_u64};
/// Structural decoding entry point.
pub use decode::decode_message;
/// Structural encoding entry point.
pub use encode::encode_message;
/// Error and result aliases.
pub use error::{BoxError, MapError, Result};
/// Interceptor capability traits and their tagged result.
pub use intercept::{DecodeInterceptor, EncodeInterceptor, Intercept};
/// Descriptor-pool bound entry points.
pub use mapper::Mapper;
/// Caller-selected encode policies.
pub use options::{MapOptions, Narrowing, OneofPolicy};
/// Per-field shape classification.
pub use shape::{FieldShape, kind_name};
/// Dynamic value tree types.
pub use value::{Map, Value};
/// Timestamp and duration interceptors.
pub use well_known::{DurationInterceptor, TimestampInterceptor, WellKnownError, well_known_decoders, well_known_encoders};
