//! Public library API for mapping protobuf messages to and from dynamic value trees.

/// Descriptor-driven decoding, encoding, coercion, and interceptor chains.
pub mod proto;
