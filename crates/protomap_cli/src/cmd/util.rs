use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use protomap::proto::Mapper;

use crate::error::Result;

/// Descriptor sources and target message shared by every command.
#[derive(clap::Args)]
pub struct SchemaArgs {
	/// Serialized FileDescriptorSet; repeat to merge several.
	#[arg(long = "descriptor-set", required = true)]
	pub descriptor_sets: Vec<PathBuf>,
	/// Fully-qualified message name.
	#[arg(long)]
	pub message: String,
}

impl SchemaArgs {
	/// Load every descriptor set into one mapper.
	pub(crate) fn mapper(&self) -> Result<Mapper> {
		Ok(Mapper::from_descriptor_set_files(&self.descriptor_sets)?)
	}
}

/// Read a file, or stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
	match path {
		Some(path) => Ok(std::fs::read(path)?),
		None => {
			let mut bytes = Vec::new();
			std::io::stdin().lock().read_to_end(&mut bytes)?;
			Ok(bytes)
		}
	}
}

/// Write to a file, or stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
	match path {
		Some(path) => std::fs::write(path, bytes)?,
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout.write_all(bytes)?;
			stdout.flush()?;
		}
	}
	Ok(())
}

/// Print `payload` as one JSON document on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T, pretty: bool) -> Result<()> {
	let text = if pretty {
		serde_json::to_string_pretty(payload)?
	} else {
		serde_json::to_string(payload)?
	};
	println!("{text}");
	Ok(())
}
