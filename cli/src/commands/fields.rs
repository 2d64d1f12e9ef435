use anyhow::Result;

use crate::commands::{load_config, load_dataset};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::FieldsArgs) -> Result<()> {
    let config = load_config(cli, &args.input)?;
    let dataset = load_dataset(&args.input, &config)?;

    let default = dataset.default_field(&config.fields).ok();
    for name in dataset.selectable_fields(&config.fields) {
        let marker = if default.as_ref().is_some_and(|field| field.name() == name) { "*" } else { " " };
        println!("{marker} {name}");
    }

    Ok(())
}
