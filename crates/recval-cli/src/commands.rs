use anyhow::{Context, Result};
use comfy_table::Table;

use recval_model::{PipelineConfig, ValidatorKind};
use recval_validate::describe;

use recval_cli::config::{ConfigOverrides, load_config};
use recval_cli::pipeline::{RunOptions, RunReport, TracingSink, run_pipeline};

use crate::cli::RunArgs;
use crate::summary::apply_table_style;

/// Load the configuration named by `args` and apply the command-line
/// overrides.
pub fn load_run_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = load_config(&args.config)
        .with_context(|| format!("load configuration {}", args.config.display()))?;
    ConfigOverrides {
        input: args.input.clone(),
        output_dir: args.output_dir.clone(),
        fail_fast: args.fail_fast,
    }
    .apply(&mut config);
    Ok(config)
}

pub fn run(config: &PipelineConfig, args: &RunArgs) -> Result<RunReport> {
    let options = RunOptions {
        dry_run: args.dry_run,
    };
    run_pipeline(config, options, &mut TracingSink)
        .with_context(|| format!("process {}", config.files.input.display()))
}

pub fn run_validators() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Validator", "Default field", "Description"]);
    apply_table_style(&mut table);
    for kind in ValidatorKind::ALL {
        table.add_row(vec![kind.as_str(), kind.default_field(), describe(kind)]);
    }
    println!("{table}");
    Ok(())
}
