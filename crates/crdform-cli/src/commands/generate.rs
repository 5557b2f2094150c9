use anyhow::{Context, anyhow};
use crdform::GenerateRequest;
use crdform::store::{MemoryTemplateStore, TemplateStore};

use crate::util::read_input;

#[derive(clap::Args)]
pub struct Args {
    /// JSON request `{apiVersion, kind, fields}` (use - for stdin)
    #[arg(required_unless_present = "template", conflicts_with = "template")]
    pub request: Option<String>,
    /// Use the fields of a built-in template instead of a request
    #[arg(short, long)]
    pub template: Option<String>,
    /// With --template, also write the optional fields
    #[arg(long, requires = "template")]
    pub all: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let request = match &args.template {
        Some(id) => {
            let template = MemoryTemplateStore::with_builtin_templates()
                .get(id)
                .ok_or_else(|| anyhow!("unknown template '{id}'"))?;
            let fields = if args.all {
                template.fields().cloned().collect()
            } else {
                template.default_fields
            };
            GenerateRequest {
                api_version: template.api_version,
                kind: template.kind,
                fields,
            }
        }
        None => {
            let raw = read_input(args.request.as_deref())?;
            serde_json::from_str(&raw).context("invalid generate request")?
        }
    };

    let generated = request.generate()?;
    for skipped in &generated.skipped {
        eprintln!("skipped {}: {}", skipped.path, skipped.reason);
    }
    print!("{}", generated.to_yaml()?);
    Ok(())
}
