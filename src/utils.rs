use crate::settings::SettingsError;
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "weather_ingest";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// `<system config dir>/weather_ingest/settings.json`, used when no path is given.
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .ok_or(SettingsError::ConfigDirResolution)
        .map(|p| p.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
}
