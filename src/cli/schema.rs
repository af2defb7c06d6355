use crate::cli::{SchemaArgs, SchemaTarget};
use parthought::analysis::{perspective_set_schema, synthesis_schema};
use parthought::config::Config;
use schemars::schema_for;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let json = match args.target {
        SchemaTarget::Config => serde_json::to_string_pretty(&schema_for!(Config))?,
        SchemaTarget::Perspectives => {
            serde_json::to_string_pretty(&perspective_set_schema().to_json_schema())?
        }
        SchemaTarget::Synthesis => {
            serde_json::to_string_pretty(&synthesis_schema().to_json_schema())?
        }
    };
    println!("{}", json);
    Ok(())
}
