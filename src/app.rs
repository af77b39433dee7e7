use adw::Application;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use directories::{BaseDirs, ProjectDirs};

/// Application settings, stored as TOML in the user config directory.
/// A missing or unreadable file falls back to the built-in defaults, which
/// match the stock contact list and timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub contacts: Vec<String>,
    pub reply_delay_ms: u64,
    pub refresh_interval_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contacts: ["Алексей", "Мария", "Дмитрий", "Сергей", "TRIX Bot 🤖"]
                .map(String::from)
                .to_vec(),
            reply_delay_ms: 700,
            refresh_interval_ms: 500,
            history_dir: None,
        }
    }
}

impl Settings {
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("trix.toml"))
    }

    /// Load settings, writing the defaults on first run so there is a file
    /// to edit.
    pub fn load_or_init() -> Self {
        match Self::toml_path() {
            Some(path) if !path.exists() => {
                let settings = Self::default();
                if let Err(e) = settings.save() {
                    log::warn!("failed to write default settings: {e}");
                }
                settings
            }
            _ => Self::load(),
        }
    }

    pub fn load() -> Self {
        if let Some(path) = Self::toml_path() {
            match fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<Settings>(&text) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!("ignoring unparsable {}: {e}", path.display()),
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("failed to read {}: {e}", path.display()),
            }
        }
        Self::default()
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::toml_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let toml = toml::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            fs::write(path, toml)
        } else {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "No config dir"))
        }
    }

    /// Where transcript files live: the configured override, or the
    /// `history/` subdirectory of the platform data dir.
    pub fn history_dir(&self) -> PathBuf {
        if let Some(dir) = &self.history_dir {
            return dir.clone();
        }
        match ProjectDirs::from("com", "example", "TrixGtk") {
            Some(proj) => proj.data_dir().join("history"),
            None => PathBuf::from("history"),
        }
    }
}

pub fn build_ui(app: &Application) {
    let settings = Settings::load_or_init();
    crate::ui::main_window::show_main_window(app, settings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_configuration() {
        let settings = Settings::default();
        assert_eq!(settings.contacts.len(), 5);
        assert_eq!(settings.contacts[0], "Алексей");
        assert_eq!(settings.contacts[4], "TRIX Bot 🤖");
        assert_eq!(settings.reply_delay_ms, 700);
        assert_eq!(settings.refresh_interval_ms, 500);
        assert!(settings.history_dir.is_none());
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.history_dir = Some(PathBuf::from("/tmp/trix-history"));
        settings.reply_delay_ms = 1500;

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.contacts, settings.contacts);
        assert_eq!(back.reply_delay_ms, 1500);
        assert_eq!(back.history_dir, settings.history_dir);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings = toml::from_str("reply_delay_ms = 1000").unwrap();
        assert_eq!(settings.reply_delay_ms, 1000);
        assert_eq!(settings.refresh_interval_ms, 500);
        assert_eq!(settings.contacts.len(), 5);
    }
}
