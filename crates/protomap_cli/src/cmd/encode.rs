use std::path::PathBuf;

use protomap::proto::{EncodeInterceptor, MapOptions, Narrowing, OneofPolicy, well_known_encoders};

use crate::cmd::json::from_json;
use crate::cmd::util::{SchemaArgs, read_input, write_output};
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub schema: SchemaArgs,
	/// JSON document to read instead of stdin.
	#[arg(long)]
	pub input: Option<PathBuf>,
	/// Wire bytes destination instead of stdout.
	#[arg(long)]
	pub output: Option<PathBuf>,
	/// Expect timestamps and durations as seconds/nanos objects.
	#[arg(long = "raw-well-known")]
	pub raw_well_known: bool,
	/// Reject oneof conflicts and out-of-range integers.
	#[arg(long)]
	pub strict: bool,
	#[arg(long, value_enum)]
	pub oneof: Option<OneofArg>,
	#[arg(long, value_enum)]
	pub narrowing: Option<NarrowingArg>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OneofArg {
	LastWins,
	Reject,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum NarrowingArg {
	Truncate,
	Checked,
}

impl Args {
	/// Resolve flags into encode options; explicit policy flags override `--strict`.
	fn options(&self) -> MapOptions {
		let mut options = if self.strict { MapOptions::strict() } else { MapOptions::default() };
		if let Some(oneof) = self.oneof {
			options.oneof = match oneof {
				OneofArg::LastWins => OneofPolicy::LastWins,
				OneofArg::Reject => OneofPolicy::Reject,
			};
		}
		if let Some(narrowing) = self.narrowing {
			options.narrowing = match narrowing {
				NarrowingArg::Truncate => Narrowing::Truncate,
				NarrowingArg::Checked => Narrowing::Checked,
			};
		}
		options
	}
}

/// Encode one JSON document as wire bytes.
pub fn run(args: Args) -> Result<()> {
	let mapper = args.schema.mapper()?.with_options(args.options());
	let json: serde_json::Value = serde_json::from_slice(&read_input(args.input.as_deref())?)?;
	let value = from_json(&json)?;

	let encoders = well_known_encoders();
	let chain: &[&dyn EncodeInterceptor] = if args.raw_well_known { &[] } else { &encoders };
	let bytes = mapper.encode(&value, &args.schema.message, chain)?;
	tracing::debug!(message = %args.schema.message, bytes = bytes.len(), "writing wire bytes");

	write_output(args.output.as_deref(), &bytes)
}
