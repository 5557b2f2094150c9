use crdform::source::{HttpSchemaSource, fetch_schema};
use crdform::{ExtractConfig, extract_template_with_config};
use tracing::info;

use crate::util::{print_json, read_input};

#[derive(clap::Args)]
pub struct Args {
    /// CRD or resource YAML file (use - for stdin)
    #[arg(required_unless_present = "url", conflicts_with = "url")]
    pub file: Option<String>,
    /// Fetch the YAML from an http(s) URL; GitHub blob links are read raw
    #[arg(long)]
    pub url: Option<String>,
    /// Deepest schema level walked
    #[arg(long)]
    pub max_depth: Option<usize>,
    /// Most fields in the template
    #[arg(long)]
    pub limit: Option<usize>,
    /// Most default fields in the template
    #[arg(long)]
    pub max_defaults: Option<usize>,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

impl Args {
    fn config(&self) -> ExtractConfig {
        let mut config = ExtractConfig::default();
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(limit) = self.limit {
            config.candidate_limit = limit;
        }
        if let Some(max_defaults) = self.max_defaults {
            config.max_default_fields = max_defaults;
        }
        config
    }
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let raw = match &args.url {
        Some(url) => {
            let fetched = fetch_schema(&HttpSchemaSource::new()?, url)?;
            info!(source = %fetched.source_url, bytes = fetched.raw.len(), "fetched schema");
            fetched.raw
        }
        None => read_input(args.file.as_deref())?,
    };

    let template = extract_template_with_config(&raw, &args.config())?;
    print_json(&template, args.pretty)
}
