use chrono::{Locale, Weekday};
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::convert::TryFrom;
use std::env;
use std::fs;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "CALGRID_CONFIG_FILE";

const KNOWN_KEYS: &[&str] = &["footerHTML", "footer_html", "locale", "first_weekday", "today"];

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        locations.push(PathBuf::from_iter(
            [dir, "calgrid".to_string(), "config.toml".to_string()].iter(),
        ));
    } else if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("calgrid").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".calgrid.toml"));
    }

    locations
}

/// Loads the configuration from `path` if given, otherwise from the first
/// existing default location. Falls back to defaults if no file exists.
pub fn load_suitable_config(path: Option<&Path>) -> Result<WidgetConfig> {
    if let Some(path) = path {
        return WidgetConfig::from_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|candidate| candidate.is_file())
    {
        Some(found) => WidgetConfig::from_file(&found),
        None => {
            log::info!("No configuration file found, using defaults");
            Ok(WidgetConfig::default())
        }
    }
}

/// Whether the widget keeps the date captured at startup as "today" or
/// re-reads the local date before every render.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TodayPolicy {
    Fixed,
    Refresh,
}

impl Default for TodayPolicy {
    fn default() -> Self {
        TodayPolicy::Fixed
    }
}

#[derive(Clone, Copy, Debug, DeserializeFromStr, PartialEq)]
pub struct LocaleSpec(pub Locale);

impl Default for LocaleSpec {
    fn default() -> Self {
        LocaleSpec(Locale::en_US)
    }
}

impl FromStr for LocaleSpec {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Locale::try_from(s)
            .map(LocaleSpec)
            .map_err(|_| Error::new(ErrorKind::LocaleParse, s))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    #[serde(rename = "footerHTML", alias = "footer_html")]
    pub footer_html: Option<String>,
    pub locale: LocaleSpec,
    pub first_weekday: Weekday,
    pub today: TodayPolicy,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            footer_html: None,
            locale: LocaleSpec::default(),
            first_weekday: Weekday::Mon,
            today: TodayPolicy::default(),
        }
    }
}

impl WidgetConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        log::info!("Loading configuration from '{}'", path.display());
        Self::from_toml_str(&content).map_err(|e| {
            let msg = format!(
                "{} (in '{}')",
                e.message.as_deref().unwrap_or_default(),
                path.display()
            );
            e.with_msg(&msg)
        })
    }

    /// Parses a TOML document. Unrecognized keys are reported and dropped.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut table: toml::value::Table = toml::from_str(content)?;

        let unknown: Vec<String> = table
            .keys()
            .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();

        for key in unknown {
            log::warn!("Ignoring unrecognized configuration option '{}'", key);
            table.remove(&key);
        }

        Ok(toml::Value::Table(table).try_into()?)
    }

    pub fn footer_html(mut self, footer: &str) -> Self {
        self.footer_html = Some(footer.to_owned());
        self
    }

    pub fn first_weekday(mut self, weekday: Weekday) -> Self {
        self.first_weekday = weekday;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = LocaleSpec(locale);
        self
    }

    pub fn today_policy(mut self, policy: TodayPolicy) -> Self {
        self.today = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = WidgetConfig::from_toml_str("").unwrap();
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn footer_accepts_both_spellings() {
        let camel = WidgetConfig::from_toml_str(r#"footerHTML = "<p>hi</p>""#).unwrap();
        assert_eq!(camel.footer_html.as_deref(), Some("<p>hi</p>"));

        let snake = WidgetConfig::from_toml_str(r#"footer_html = "<p>hi</p>""#).unwrap();
        assert_eq!(snake.footer_html.as_deref(), Some("<p>hi</p>"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = WidgetConfig::from_toml_str(
            r#"
            colour = "red"
            first_weekday = "Sun"
            "#,
        )
        .unwrap();

        assert_eq!(config.first_weekday, Weekday::Sun);
        assert_eq!(config.footer_html, None);
    }

    #[test]
    fn locale_and_policy() {
        let config = WidgetConfig::from_toml_str(
            r#"
            locale = "de_DE"
            today = "refresh"
            "#,
        )
        .unwrap();

        assert_eq!(config.locale, LocaleSpec(Locale::de_DE));
        assert_eq!(config.today, TodayPolicy::Refresh);
    }

    #[test]
    fn load_from_explicit_path() {
        let path = env::temp_dir().join(format!("calgrid-config-{}.toml", std::process::id()));
        fs::write(&path, "footerHTML = \"x\"\nbogus = 1\n").unwrap();

        let config = load_suitable_config(Some(&path));
        fs::remove_file(&path).unwrap();

        assert_eq!(config.unwrap().footer_html.as_deref(), Some("x"));
    }

    #[test]
    fn env_var_location_comes_first() {
        let path = env::temp_dir().join("calgrid-env-config.toml");
        env::set_var(CONFIG_PATH_ENV_VAR, &path);
        let locations = find_configfile_locations();
        env::remove_var(CONFIG_PATH_ENV_VAR);

        assert_eq!(locations[0], path);
        assert!(!locations[1..].contains(&path));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = env::temp_dir().join("calgrid-config-does-not-exist.toml");
        let err = load_suitable_config(Some(&path)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }

    #[test]
    fn unknown_locale_is_an_error() {
        assert!(WidgetConfig::from_toml_str(r#"locale = "xx_NOPE""#).is_err());
        assert!("xx_NOPE".parse::<LocaleSpec>().is_err());
    }
}
