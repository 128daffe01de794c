/// Wire bytes to JSON command.
pub mod decode;
/// Message field listing command.
pub mod describe;
/// JSON to wire bytes command.
pub mod encode;
/// JSON bridge for generic values.
pub(crate) mod json;
pub(crate) mod util;
