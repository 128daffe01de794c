use std::path::PathBuf;

use protomap::proto::{DecodeInterceptor, well_known_decoders};

use crate::cmd::json::to_json;
use crate::cmd::util::{SchemaArgs, emit_json, read_input};
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub schema: SchemaArgs,
	/// Wire bytes to read instead of stdin.
	#[arg(long)]
	pub input: Option<PathBuf>,
	/// Keep timestamps and durations as seconds/nanos objects.
	#[arg(long = "raw-well-known")]
	pub raw_well_known: bool,
	/// Pretty-print the JSON output.
	#[arg(long)]
	pub pretty: bool,
}

/// Decode one message from wire bytes and print it as JSON.
pub fn run(args: Args) -> Result<()> {
	let mapper = args.schema.mapper()?;
	let bytes = read_input(args.input.as_deref())?;

	let decoders = well_known_decoders();
	let chain: &[&dyn DecodeInterceptor] = if args.raw_well_known { &[] } else { &decoders };
	let value = mapper.decode(&bytes, &args.schema.message, chain)?;

	emit_json(&to_json(&value), args.pretty)
}

