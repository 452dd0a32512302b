//! Settings file (`userdesk.conf`) and config directory resolution.
//!
//! All config files share one format: `key = value` lines, `#` comments,
//! unknown keys ignored. A missing file is created with defaults.
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_BASE_URL;
use crate::error::{Context, Result};

pub const SETTINGS_FILE: &str = "userdesk.conf";
pub const DEFAULT_LOG_FILTER: &str = "userdesk=info";

/// Directory holding `userdesk.conf`, `theme.conf`, `keybinds.conf` and the log.
///
/// `$XDG_CONFIG_HOME/userdesk`, then `$HOME/.config/userdesk`, then `.`.
pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("userdesk");
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join("userdesk");
    }
    PathBuf::from(".")
}

/// Path of `name` inside [`config_dir`], creating the directory if needed.
pub fn config_file_path(name: &str) -> PathBuf {
    let dir = config_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(dir = %dir.display(), error = %e, "could not create config directory");
    }
    dir.join(name)
}

/// Split a config line into `(key, value)`; `None` for blanks and comments.
pub fn parse_line(raw: &str) -> Option<(&str, &str)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, val) = line.split_once('=')?;
    let (key, val) = (key.trim(), val.trim());
    if key.is_empty() || val.is_empty() {
        return None;
    }
    Some((key, val))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    pub fn parse(contents: &str) -> Self {
        let mut settings = Self::default();
        for (key, val) in contents.lines().filter_map(parse_line) {
            match key {
                "base_url" => settings.base_url = val.trim_end_matches('/').to_string(),
                "log_filter" => settings.log_filter = val.to_string(),
                _ => {}
            }
        }
        settings
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).with_ctx(|| format!("read {}", path.display()))?;
        Ok(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        let buf = format!(
            "# userdesk settings\n\
             # base_url: backend address, overridden by --base-url / USERDESK_BASE_URL\n\
             base_url = {}\n\
             # log_filter: tracing filter, overridden by RUST_LOG\n\
             log_filter = {}\n",
            self.base_url, self.log_filter
        );
        std::fs::write(path, buf).with_ctx(|| format!("write {}", path.display()))
    }

    /// Load `path`, writing defaults there first when it does not exist.
    /// A failed write still yields the defaults.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }
        let settings = Self::default();
        if let Err(e) = settings.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write settings");
        }
        Ok(settings)
    }

    /// CLI/env value wins over the file.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_known_keys() {
        let s = Settings::parse("# comment\nbase_url = http://10.0.0.2:5000/\nunknown = 1\n\nlog_filter=debug\n");
        assert_eq!(s.base_url, "http://10.0.0.2:5000");
        assert_eq!(s.log_filter, "debug");
    }

    #[test]
    fn override_beats_file() {
        let s = Settings::parse("base_url = http://a").with_base_url(Some("http://b/".into()));
        assert_eq!(s.base_url, "http://b");
        let s = Settings::parse("base_url = http://a").with_base_url(Some("  ".into()));
        assert_eq!(s.base_url, "http://a");
    }

    #[test]
    fn parse_line_skips_noise() {
        assert_eq!(parse_line("  # x = y"), None);
        assert_eq!(parse_line("key ="), None);
        assert_eq!(parse_line("a = b = c"), Some(("a", "b = c")));
    }

    #[test]
    fn unwritable_settings_fall_back_to_defaults() {
        let mut path = std::env::temp_dir();
        path.push(format!("userdesk_missing_{}", std::process::id()));
        path.push("nested");
        path.push(SETTINGS_FILE);
        let s = Settings::load_or_init(&path).expect("defaults despite failed write");
        assert_eq!(s, Settings::default());
        assert!(!path.exists());
    }
}
