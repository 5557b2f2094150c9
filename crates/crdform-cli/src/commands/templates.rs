use crdform::store::{MemoryTemplateStore, TemplateStore};

use crate::util::print_json;

#[derive(clap::Args)]
pub struct Args {
    /// Print the full templates as JSON
    #[arg(long)]
    pub json: bool,
    /// Pretty print JSON output
    #[arg(short, long, requires = "json")]
    pub pretty: bool,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let templates = MemoryTemplateStore::with_builtin_templates().list();
    if args.json {
        return print_json(&templates, args.pretty);
    }
    for template in &templates {
        println!(
            "{:<16}{:<28}{}",
            template.id, template.api_version, template.kind
        );
    }
    Ok(())
}
