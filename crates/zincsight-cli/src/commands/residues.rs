use super::{GlobalOptions, load_records, palette};
use crate::cli::SourceArgs;
use crate::config::ConfigOverrides;
use crate::error::Result;
use crate::render::render_residues;
use tracing::info;
use zincsight::core::table::distinct_residue_types;

pub async fn run(args: SourceArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = ConfigOverrides {
        data_source: args.data,
        ..Default::default()
    };
    let config = globals.app_config(&overrides)?;
    let records = load_records(&config, &globals.progress()).await?;

    let signatures = distinct_residue_types(&records);
    info!(
        "Found {} distinct residue signature(s) in {} record(s).",
        signatures.len(),
        records.len()
    );
    print!("{}", render_residues(&signatures, &palette()));
    Ok(())
}
