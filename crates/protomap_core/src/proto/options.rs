/// Handling of input that supplies several members of one oneof.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OneofPolicy {
	/// Write every member present in descriptor order; storage keeps the last one.
	#[default]
	LastWins,
	/// Fail with [`MapError::OneofConflict`](crate::proto::MapError::OneofConflict).
	Reject,
}

/// Handling of 64-bit input assigned to 32-bit fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Narrowing {
	/// Keep the low 32 bits.
	#[default]
	Truncate,
	/// Fail with [`MapError::IntegerOutOfRange`](crate::proto::MapError::IntegerOutOfRange).
	Checked,
}

/// Encode-side behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapOptions {
	/// Oneof handling.
	pub oneof: OneofPolicy,
	/// Integer narrowing handling.
	pub narrowing: Narrowing,
}

impl MapOptions {
	/// Preset that rejects ambiguous oneofs and out-of-range integers.
	pub fn strict() -> Self {
		Self {
			oneof: OneofPolicy::Reject,
			narrowing: Narrowing::Checked,
		}
	}
}
