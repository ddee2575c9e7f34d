//! Settings command - inspect and edit the stored settings

use anyhow::Result;
use clap::Subcommand;

use super::output::format_output;
use crate::settings::{Settings, SettingsStore, ALL_KEYS};

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print all settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Restore the defaults
    Reset,
    /// Print the settings file location
    Path,
}

pub fn handle_settings(action: SettingsAction, store: &SettingsStore) -> Result<()> {
    match action {
        SettingsAction::Show { json } => {
            let settings = store.load();
            if json {
                println!("{}", format_output(&settings));
            } else {
                for key in ALL_KEYS {
                    println!("{:<20} {}", key, settings.get_value(key)?);
                }
            }
        }
        SettingsAction::Get { key } => {
            println!("{}", store.load().get_value(&key)?);
        }
        SettingsAction::Set { key, value } => {
            let mut settings = store.load();
            settings.set_value(&key, &value)?;
            store.save(&settings)?;
            println!("{} = {}", key, settings.get_value(&key)?);
        }
        SettingsAction::Reset => {
            store.save(&Settings::default())?;
            println!("Settings reset: {}", store.path().display());
        }
        SettingsAction::Path => {
            println!("{}", store.path().display());
        }
    }
    Ok(())
}
