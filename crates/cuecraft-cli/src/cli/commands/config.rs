use std::io::Write;

use anyhow::{Context, Result};
use cuecraft_lib::core::settings::{AppSettings, SettingsManager};

/// Prints the effective settings (file plus command-line overrides).
pub fn show(settings: &AppSettings, out: &mut impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("serialize settings")?;
    writeln!(out, "{json}").context("write stdout")?;
    Ok(())
}

pub fn path(manager: &SettingsManager, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", manager.settings_path().display()).context("write stdout")?;
    Ok(())
}

pub fn reset(manager: &SettingsManager, out: &mut impl Write) -> Result<()> {
    manager.reset().context("reset settings")?;
    writeln!(out, "Settings reset: {}", manager.settings_path().display()).context("write stdout")?;
    Ok(())
}

pub fn init(manager: &SettingsManager, out: &mut impl Write) -> Result<()> {
    let path = manager.settings_path();
    if path.exists() {
        writeln!(out, "Settings already exist: {}", path.display()).context("write stdout")?;
        return Ok(());
    }

    manager
        .save(&AppSettings::default())
        .context("write default settings")?;
    writeln!(out, "Created {}", path.display()).context("write stdout")?;
    Ok(())
}
