use super::{GlobalOptions, load_records, palette};
use crate::cli::{OutputFormat, TableArgs};
use crate::config::ConfigOverrides;
use crate::error::Result;
use crate::render::{render_csv, render_json, render_text};
use tracing::{info, warn};
use zincsight::core::table::{PageRequest, TableQuery};

pub async fn run(args: TableArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = ConfigOverrides {
        data_source: args.source.data.clone(),
        page_size: args.page_size,
        ..Default::default()
    };
    let config = globals.app_config(&overrides)?;
    let query = build_query(&args, config.page_size)?;

    let records = load_records(&config, &globals.progress()).await?;
    let page = query.apply(&records);
    info!(
        "{} of {} record(s) match the filters; showing page {} of {}.",
        page.total,
        records.len(),
        page.page,
        page.page_count
    );
    if page.rows.is_empty() && page.total > 0 {
        warn!(
            "Page {} is past the last page ({}).",
            page.page, page.page_count
        );
    }

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&page, &palette())),
        OutputFormat::Json => println!("{}", render_json(&page)?),
        OutputFormat::Csv => print!("{}", render_csv(&page)?),
    }
    Ok(())
}

/// Translates command-line filters, sort and paging into a [`TableQuery`].
pub fn build_query(args: &TableArgs, page_size: usize) -> Result<TableQuery> {
    let mut query = TableQuery::new();
    if let Some(id) = &args.structure_id {
        query = query.with_structure_id(id.as_str());
    }
    for signature in &args.residue_types {
        query = query.with_residue_type(signature.as_str());
    }
    if let Some(threshold) = args.min_probability {
        query = query.with_min_probability(threshold);
    }
    for secondary in &args.secondary {
        query = query.with_secondary(secondary.is_catalytic());
    }
    if let Some(column) = &args.sort {
        query = query.sorted_by(column.parse()?, args.order.parse()?);
    }
    if !args.all {
        query = query.paged(PageRequest::new(args.page, page_size)?);
    }
    Ok(query)
}
