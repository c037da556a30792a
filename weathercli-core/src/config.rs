use directories::BaseDirs;
use ini::{Ini, Properties, WriteOption};
use std::{
    fmt,
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    APP_NAME,
    error::{Result, WeatherError},
};

pub const CONFIG_FILENAME: &str = "config.ini";

/// Section holding the OpenWeather credential.
pub const OPENWEATHER_SECTION: &str = "openweather";
pub const API_KEY: &str = "api_key";

/// Parsed INI config file: named sections of key/value pairs.
///
/// Example file:
/// ```text
/// [openweather]
/// api_key = ...
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    ini: Ini,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self> {
        let ini = Ini::load_from_str(contents)?;
        Ok(Self { ini })
    }

    /// Look up the value stored under `[section] key`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get_from(Some(section), key)
    }

    /// Replace `section` wholesale. Keys previously stored there are dropped.
    pub fn replace_section<'a>(
        &mut self,
        section: &str,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        self.ini.delete(Some(section));
        for (key, value) in entries {
            self.ini.set_to(Some(section), key.to_string(), value.to_string());
        }
    }

    /// Named sections in file order; keys outside any section are skipped.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Properties)> {
        self.ini
            .iter()
            .filter_map(|(name, props)| name.map(|name| (name, props)))
    }

    pub fn to_file_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let opt = WriteOption { kv_separator: " = ", ..Default::default() };
        self.ini.write_to_opt(&mut buf, opt).map_err(WeatherError::ConfigFile)?;

        String::from_utf8(buf)
            .map_err(|e| WeatherError::ConfigFile(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

/// Lists every section as `[name]` followed by `key = value` lines and a blank line.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, entries) in self.sections() {
            writeln!(f, "[{name}]")?;
            for (key, value) in entries.iter() {
                writeln!(f, "{key} = {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Path to the config file inside the platform's per-user data directory.
///
/// - linux: `$XDG_DATA_HOME` or `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - windows: `C:\Users\<USER>\AppData\Roaming`
pub fn resolve_config_path() -> Result<PathBuf> {
    let dirs = BaseDirs::new().ok_or(WeatherError::DataDirUnavailable)?;
    Ok(dirs.data_dir().join(APP_NAME).join(CONFIG_FILENAME))
}

/// Reads and writes the config file at one fixed path. Nothing is cached;
/// every call goes to disk.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn from_platform() -> Result<Self> {
        Ok(Self::at(resolve_config_path()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the application directory and an empty config file if missing.
    /// Existing content is left untouched.
    pub fn initialize(&self) -> Result<&Path> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(WeatherError::ConfigDirectory)?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(WeatherError::ConfigFile)?;

        debug!(path = %self.path.display(), "config file initialized");
        Ok(&self.path)
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.is_file() {
            return Err(WeatherError::ConfigNotFound);
        }

        let contents = fs::read_to_string(&self.path).map_err(WeatherError::ConfigFile)?;
        Config::parse(&contents)
    }

    pub fn api_key(&self) -> Result<String> {
        let config = self.load()?;
        config
            .get(OPENWEATHER_SECTION, API_KEY)
            .map(str::to_owned)
            .ok_or(WeatherError::ApiKeyMissing)
    }

    /// Store `key` as the only entry of the `openweather` section.
    pub fn set_api_key(&self, key: &str) -> Result<&Path> {
        self.initialize()?;

        let mut config = self.load()?;
        config.replace_section(OPENWEATHER_SECTION, [(API_KEY, key)]);

        fs::write(&self.path, config.to_file_string()?).map_err(WeatherError::ConfigFile)?;

        debug!(path = %self.path.display(), "API key written");
        Ok(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, ConfigStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = ConfigStore::at(dir.path().join(APP_NAME).join(CONFIG_FILENAME));
        (dir, store)
    }

    #[test]
    fn resolved_path_ends_with_app_dir_and_file() {
        let path = resolve_config_path().expect("home directory should be known in tests");
        assert!(path.ends_with(Path::new(APP_NAME).join(CONFIG_FILENAME)));
    }

    #[test]
    fn initialize_is_idempotent_and_keeps_content() {
        let (_dir, store) = temp_store();

        store.initialize().expect("first init");
        fs::write(store.path(), "[openweather]\napi_key = KEEP\n").unwrap();
        store.initialize().expect("second init");

        assert_eq!(store.api_key().unwrap(), "KEEP");
    }

    #[test]
    fn load_without_file_is_config_not_found() {
        let (_dir, store) = temp_store();
        let err = store.load().unwrap_err();
        assert!(matches!(err, WeatherError::ConfigNotFound));
    }

    #[test]
    fn api_key_missing_in_existing_file() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();

        let err = store.api_key().unwrap_err();
        assert!(matches!(err, WeatherError::ApiKeyMissing));
    }

    #[test]
    fn set_then_get_returns_last_key() {
        let (_dir, store) = temp_store();

        for key in ["first", "second key", "üñí©ødé"] {
            store.set_api_key(key).expect("set api key");
            assert_eq!(store.api_key().unwrap(), key);
        }
    }

    #[test]
    fn set_api_key_replaces_whole_section_only() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        fs::write(
            store.path(),
            "[openweather]\napi_key = OLD\nunits = metric\n\n[other]\nx = 1\n",
        )
        .unwrap();

        store.set_api_key("NEW").unwrap();
        let cfg = store.load().unwrap();

        assert_eq!(cfg.get(OPENWEATHER_SECTION, API_KEY), Some("NEW"));
        assert_eq!(cfg.get(OPENWEATHER_SECTION, "units"), None);
        assert_eq!(cfg.get("other", "x"), Some("1"));
    }

    #[test]
    fn malformed_file_is_reported() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        fs::write(store.path(), "[openweather\napi_key = ").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, WeatherError::MalformedConfig(_)));
    }

    #[test]
    fn display_lists_sections_in_file_order() {
        let cfg = Config::parse("[zeta]\nb = 2\na = 1\n\n[alpha]\nkey = value\n").unwrap();
        assert_eq!(cfg.to_string(), "[zeta]\nb = 2\na = 1\n\n[alpha]\nkey = value\n\n");
    }

    #[test]
    fn configparser_style_file_is_read_and_rewritten() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        fs::write(store.path(), "[openweather]\napi_key = abc123\n\n").unwrap();

        assert_eq!(store.api_key().unwrap(), "abc123");

        store.set_api_key("NEW").unwrap();
        assert_eq!(store.api_key().unwrap(), "NEW");

        let written = fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("[openweather]"));
        assert!(written.contains("api_key = NEW"));
    }

    #[test]
    fn config_dir_error_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let store = ConfigStore::at(blocker.join(APP_NAME).join(CONFIG_FILENAME));
        let err = store.initialize().unwrap_err();
        assert!(matches!(err, WeatherError::ConfigDirectory(_)));
    }
}
