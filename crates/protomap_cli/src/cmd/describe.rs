use prost_reflect::Cardinality;
use protomap::proto::FieldShape;

use crate::cmd::util::{SchemaArgs, emit_json};
use crate::error::Result;

#[derive(clap::Args)]
pub struct Args {
	#[command(flatten)]
	pub schema: SchemaArgs,
	/// Print fields as JSON instead of a table.
	#[arg(long)]
	pub json: bool,
}

/// Print number, shape, cardinality, and oneof of every field.
pub fn run(args: Args) -> Result<()> {
	let mapper = args.schema.mapper()?;
	let descriptor = mapper.message(&args.schema.message)?;

	let fields: Vec<FieldJson> = descriptor
		.fields()
		.map(|field| FieldJson {
			number: field.number(),
			name: field.name().to_owned(),
			shape: FieldShape::of(&field).to_string(),
			cardinality: cardinality_label(field.cardinality()),
			oneof: field.containing_oneof().map(|oneof| oneof.name().to_owned()),
		})
		.collect();

	if args.json {
		return emit_json(
			&DescribeJson {
				message: descriptor.full_name().to_owned(),
				fields,
			},
			true,
		);
	}

	println!("message: {}", descriptor.full_name());
	println!("fields: {}", fields.len());
	println!("number\tname\tshape\tcardinality\toneof");
	for field in &fields {
		println!(
			"{}\t{}\t{}\t{}\t{}",
			field.number,
			field.name,
			field.shape,
			field.cardinality,
			field.oneof.as_deref().unwrap_or("-")
		);
	}
	Ok(())
}

fn cardinality_label(cardinality: Cardinality) -> &'static str {
	match cardinality {
		Cardinality::Optional => "optional",
		Cardinality::Required => "required",
		Cardinality::Repeated => "repeated",
	}
}

#[derive(serde::Serialize)]
struct FieldJson {
	number: u32,
	name: String,
	shape: String,
	cardinality: &'static str,
	#[serde(skip_serializing_if = "Option::is_none")]
	oneof: Option<String>,
}

#[derive(serde::Serialize)]
struct DescribeJson {
	message: String,
	fields: Vec<FieldJson>,
}
