use anyhow::bail;
use crdform::validate_crd;

use crate::util::{print_json, read_input};

#[derive(clap::Args)]
pub struct Args {
    /// CRD YAML file (use - for stdin)
    pub file: String,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let raw = read_input(Some(&args.file))?;
    let report = validate_crd(&raw);
    print_json(&report, args.pretty)?;
    if !report.valid {
        bail!("validation failed with {} error(s)", report.errors.len());
    }
    Ok(())
}
