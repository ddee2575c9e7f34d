//! Setup command - interactive first-time configuration

use anyhow::Result;
use clap::Args;
use dialoguer::{Confirm, Input, Select};

use crate::settings::{default_log_path, Channel, Settings, SettingsStore, KEY_INTERVAL_SECONDS};

#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Start from the defaults instead of the saved settings
    #[arg(long)]
    pub fresh: bool,
}

pub fn handle_setup(args: SetupArgs, store: &SettingsStore) -> Result<()> {
    println!("SC Kill Monitor setup\n");

    let mut settings = if args.fresh {
        Settings::default()
    } else {
        store.load()
    };

    settings.player_handle = Input::<String>::new()
        .with_prompt("Player handle")
        .with_initial_text(settings.player_handle.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Please enter a handle")
            } else {
                Ok(())
            }
        })
        .interact_text()?
        .trim()
        .to_string();

    let labels: Vec<&str> = Channel::ALL.iter().map(|c| c.label()).collect();
    let current = Channel::ALL
        .iter()
        .position(|c| *c == settings.selected_channel)
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("Game channel")
        .items(&labels)
        .default(current)
        .interact()?;
    let channel = Channel::ALL[selection];
    settings.selected_channel = channel;

    let suggested = match settings.path_for(channel) {
        "" => default_log_path(channel),
        path => path.to_string(),
    };
    let path: String = Input::new()
        .with_prompt(format!("{} log file", channel.label()))
        .with_initial_text(suggested)
        .allow_empty(true)
        .interact_text()?;
    *settings.path_for_mut(channel) = path.trim().to_string();

    let interval: String = Input::new()
        .with_prompt("Scan interval (seconds)")
        .with_initial_text(settings.interval_seconds.to_string())
        .validate_with(|input: &String| -> Result<(), &str> {
            match input.trim().parse::<u64>() {
                Ok(n) if n > 0 => Ok(()),
                _ => Err("Please enter a valid interval"),
            }
        })
        .interact_text()?;
    settings.set_value(KEY_INTERVAL_SECONDS, &interval)?;

    settings.killer_mode_active = Confirm::new()
        .with_prompt("Count your own kills (killer mode)?")
        .default(settings.killer_mode_active)
        .interact()?;
    settings.show_all = Confirm::new()
        .with_prompt("Show events involving NPCs?")
        .default(settings.show_all)
        .interact()?;
    settings.write_to_file = Confirm::new()
        .with_prompt("Write kill events to a log file?")
        .default(settings.write_to_file)
        .interact()?;

    store.save(&settings)?;
    println!("\nSaved to {}", store.path().display());
    println!("Run `sckm scan` to start monitoring.");
    Ok(())
}
