use super::{GlobalOptions, load_records, palette};
use crate::cli::ViewArgs;
use crate::config::ConfigOverrides;
use crate::data::HttpStructureSource;
use crate::error::{CliError, Result};
use crate::render::{Palette, render_focus};
use crate::utils::progress::CliProgressHandler;
use std::path::Path;
use tracing::info;
use zincsight::core::models::record::RecordSet;
use zincsight::engine::config::ViewerConfig;
use zincsight::engine::headless::HeadlessEngineFactory;
use zincsight::engine::progress::ProgressReporter;
use zincsight::engine::session::{ViewerSession, ViewerState};
use zincsight::engine::source::{DirectoryStructureSource, StructureSource};
use zincsight::workflows;

pub async fn run(args: ViewArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = ConfigOverrides {
        data_source: args.source.data.clone(),
        url_template: args.url_template.clone(),
        timeout_secs: args.timeout,
        ..Default::default()
    };
    let config = globals.app_config(&overrides)?;
    let progress = globals.progress();
    let records = load_records(&config, &progress).await?;
    let palette = palette();

    let request = ViewRequest {
        records: &records,
        key: &args.key,
        output: args.output.as_deref(),
        progress: &progress,
        palette: &palette,
    };
    let summary = match &args.structure_dir {
        Some(dir) => {
            info!("Reading structures from {:?}", dir);
            request
                .open(DirectoryStructureSource::new(dir), config.viewer.clone())
                .await?
        }
        None => {
            info!("Downloading structures from {}", config.viewer.url_template);
            let source = HttpStructureSource::new(&config.viewer)?;
            request.open(source, config.viewer.clone()).await?
        }
    };
    print!("{}", summary);
    Ok(())
}

/// One `view` invocation against an already loaded table.
struct ViewRequest<'a> {
    records: &'a RecordSet,
    key: &'a str,
    output: Option<&'a Path>,
    progress: &'a CliProgressHandler,
    palette: &'a Palette,
}

impl ViewRequest<'_> {
    /// Opens the record in a fresh viewer session and renders the resulting focus.
    ///
    /// The session is closed before returning, whatever the outcome.
    async fn open<S: StructureSource>(&self, source: S, config: ViewerConfig) -> Result<String> {
        let mut session = ViewerSession::new(HeadlessEngineFactory, source, config);
        let reporter = ProgressReporter::with_callback(self.progress.get_callback());

        let outcome = match workflows::view::run(&mut session, self.records, self.key, &reporter)
            .await?
        {
            ViewerState::Ready(focus) => {
                let mut summary = render_focus(focus, self.palette);
                if let Some(path) = self.output {
                    tokio::fs::write(path, &focus.annotated.text).await?;
                    info!("Wrote annotated structure to {:?}", path);
                    summary.push_str(&format!(
                        "✓ Annotated structure written to: {}\n",
                        path.display()
                    ));
                }
                Ok(summary)
            }
            ViewerState::Failed { key, error } => Err(CliError::Viewer {
                key: key.clone(),
                source: error.clone(),
            }),
            other => Err(CliError::Other(anyhow::anyhow!(
                "Viewer for '{}' did not settle",
                other.key().unwrap_or(self.key)
            ))),
        };
        self.progress.clear();
        session.close();
        outcome
    }
}
