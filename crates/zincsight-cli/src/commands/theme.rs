use super::preference_store;
use crate::cli::{ThemeArg, ThemeArgs, ThemeCommands};
use crate::error::Result;
use crate::preferences::system_prefers_dark;
use tracing::info;
use zincsight::core::theme::{PreferenceStore, Theme, ThemeSettings, ThemeSource};

pub fn run(args: ThemeArgs) -> Result<()> {
    let mut store = preference_store()?;
    info!("Using preference store {:?}", store.path());
    let message = run_with_store(args.command, &mut store, system_prefers_dark())?;
    println!("{}", message);
    Ok(())
}

/// Applies a theme subcommand to `store` and describes the outcome.
pub fn run_with_store(
    command: ThemeCommands,
    store: &mut impl PreferenceStore,
    system_dark: bool,
) -> Result<String> {
    let mut settings = ThemeSettings::load(&*store, system_dark);
    let message = match command {
        ThemeCommands::Get => describe(&settings),
        ThemeCommands::Set { theme } => {
            settings.set(theme_from_arg(theme), store)?;
            format!("✓ Theme set to {}", settings.theme)
        }
        ThemeCommands::Toggle => {
            let theme = settings.toggle(store)?;
            format!("✓ Theme switched to {}", theme)
        }
        ThemeCommands::Reset => {
            let settings = ThemeSettings::reset(store, system_dark)?;
            format!("✓ Theme preference cleared; {}", describe(&settings))
        }
    };
    Ok(message)
}

fn theme_from_arg(arg: ThemeArg) -> Theme {
    match arg {
        ThemeArg::Light => Theme::Light,
        ThemeArg::Dark => Theme::Dark,
    }
}

fn describe(settings: &ThemeSettings) -> String {
    match settings.source {
        ThemeSource::Stored => format!("{} (stored preference)", settings.theme),
        ThemeSource::System => format!("{} (following system)", settings.theme),
    }
}
