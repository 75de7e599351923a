//! Session configuration: target modules and strict mode.
//!
//! Read once at session start and passed down as an immutable value.

use serde::Deserialize;
use std::env::{self, VarError};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::ConfigurationError;
use crate::resolver::ModuleName;

/// Environment variable holding the comma-separated target modules.
pub const MODULE_FILTER: &str = "module_filter";
/// Environment variable holding the strict flag.
pub const MODULE_FILTER_STRICT: &str = "module_filter_strict";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleFilterConfig {
    target_modules: Vec<ModuleName>,
    strict: bool,
}

impl ModuleFilterConfig {
    pub fn new<I, M>(modules: I, strict: bool) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<ModuleName>,
    {
        let mut target_modules: Vec<ModuleName> = Vec::new();
        for module in modules {
            let module = module.into();
            if module.as_str().is_empty() || target_modules.contains(&module) {
                continue;
            }
            target_modules.push(module);
        }
        Self {
            target_modules,
            strict,
        }
    }

    /// Build from the raw comma-separated module list and strict flag.
    pub fn parse(
        module_filter: Option<&str>,
        strict: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let strict = match strict {
            Some(value) => parse_flag(MODULE_FILTER_STRICT, value)?,
            None => false,
        };
        Ok(Self::new(parse_module_list(module_filter.unwrap_or("")), strict))
    }

    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_settings(&FilterSettings::from_env()?)
    }

    pub fn from_settings(settings: &FilterSettings) -> Result<Self, ConfigurationError> {
        Self::parse(settings.module_filter.as_deref(), settings.strict.as_deref())
    }

    pub fn target_modules(&self) -> &[ModuleName] {
        &self.target_modules
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// No target modules means no filtering at all.
    pub fn is_empty(&self) -> bool {
        self.target_modules.is_empty()
    }

    pub fn contains(&self, module: &ModuleName) -> bool {
        self.target_modules.contains(module)
    }
}

fn parse_module_list(raw: &str) -> Vec<ModuleName> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ModuleName::from)
        .collect()
}

/// Parse a boolean-ish setting. Empty counts as false.
pub fn parse_flag(setting: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigurationError::invalid_strict_flag(setting, value)),
    }
}

/// Unparsed settings from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSettings {
    pub module_filter: Option<String>,
    pub strict: Option<String>,
}

impl FilterSettings {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let settings = Self {
            module_filter: env_setting(MODULE_FILTER, env::var(MODULE_FILTER))?,
            strict: env_setting(MODULE_FILTER_STRICT, env::var(MODULE_FILTER_STRICT))?,
        };
        trace!(?settings, "read module filter from environment");
        Ok(settings)
    }

    /// Fill unset values from a lower-precedence layer.
    pub fn or(self, fallback: FilterSettings) -> Self {
        Self {
            module_filter: self.module_filter.or(fallback.module_filter),
            strict: self.strict.or(fallback.strict),
        }
    }
}

/// Unset is `None`; a value that is not unicode is an error rather than unset.
fn env_setting(
    name: &str,
    value: Result<String, VarError>,
) -> Result<Option<String>, ConfigurationError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigurationError::not_unicode(name)),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ModuleList {
    Joined(String),
    Items(Vec<String>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// On-disk form of the session settings.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    module_filter: Option<ModuleList>,
    #[serde(default)]
    module_filter_strict: Option<FlagValue>,
}

impl ConfigFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config file");

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path, e.to_string()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match extension {
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigurationError::parse_error(path, e.to_string())),
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigurationError::parse_error(path, e.to_string())),
            _ => Err(ConfigurationError::unsupported_format(extension)),
        }
    }

    pub fn into_settings(self) -> FilterSettings {
        FilterSettings {
            module_filter: self.module_filter.map(|list| match list {
                ModuleList::Joined(joined) => joined,
                ModuleList::Items(items) => items.join(","),
            }),
            strict: self.module_filter_strict.map(|flag| match flag {
                FlagValue::Bool(b) => b.to_string(),
                FlagValue::Int(i) => i.to_string(),
                FlagValue::Text(text) => text,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(config: &ModuleFilterConfig) -> Vec<&str> {
        config.target_modules().iter().map(ModuleName::as_str).collect()
    }

    #[test]
    fn test_parse_unset_is_empty() {
        let config = ModuleFilterConfig::parse(None, None).unwrap();
        assert!(config.is_empty());
        assert!(!config.is_strict());
    }

    #[test]
    fn test_parse_trims_entries() {
        let config =
            ModuleFilterConfig::parse(Some(" Magento_Catalog , Magento_Sales"), None).unwrap();
        assert_eq!(names(&config), vec!["Magento_Catalog", "Magento_Sales"]);
    }

    #[test]
    fn test_parse_deduplicates_keeping_first() {
        let config = ModuleFilterConfig::parse(
            Some("Magento_Sales,Magento_Catalog,Magento_Sales"),
            None,
        )
        .unwrap();
        assert_eq!(names(&config), vec!["Magento_Sales", "Magento_Catalog"]);
    }

    #[test]
    fn test_parse_skips_blank_entries() {
        let config = ModuleFilterConfig::parse(Some(" , ,Magento_Cms,"), None).unwrap();
        assert_eq!(names(&config), vec!["Magento_Cms"]);

        let config = ModuleFilterConfig::parse(Some("  "), None).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_parse_flag_values() {
        for value in ["1", "true", "TRUE", "yes", "on", " On "] {
            assert!(parse_flag(MODULE_FILTER_STRICT, value).unwrap(), "{value}");
        }
        for value in ["", "0", "false", "No", "off"] {
            assert!(!parse_flag(MODULE_FILTER_STRICT, value).unwrap(), "{value}");
        }
    }

    #[test]
    fn test_parse_invalid_flag() {
        let result = ModuleFilterConfig::parse(Some("Magento_Cms"), Some("sometimes"));
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidStrictFlag { .. })
        ));
    }

    #[test]
    fn test_env_variable_names() {
        assert_eq!(MODULE_FILTER, "module_filter");
        assert_eq!(MODULE_FILTER_STRICT, "module_filter_strict");
    }

    #[test]
    fn test_env_setting_unset_and_set() {
        assert_eq!(
            env_setting(MODULE_FILTER, Err(VarError::NotPresent)).unwrap(),
            None
        );
        assert_eq!(
            env_setting(MODULE_FILTER, Ok("Magento_Cms".to_string())).unwrap(),
            Some("Magento_Cms".to_string())
        );
    }

    #[test]
    fn test_env_setting_not_unicode() {
        let value = Err(VarError::NotUnicode(std::ffi::OsString::from("Magento_Cms")));
        match env_setting(MODULE_FILTER, value) {
            Err(ConfigurationError::NotUnicode { name }) => assert_eq!(name, "module_filter"),
            other => panic!("expected NotUnicode, got {other:?}"),
        }
    }

    #[test]
    fn test_contains() {
        let config = ModuleFilterConfig::new(["Magento_Cms"], true);
        assert!(config.contains(&ModuleName::from("Magento_Cms")));
        assert!(!config.contains(&ModuleName::from("Magento_Sales")));
        assert!(config.is_strict());
    }

    #[test]
    fn test_config_file_yaml_list() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("testscope.yaml");
        fs::write(
            &path,
            "module_filter:\n  - Magento_Catalog\n  - Magento_Sales\nmodule_filter_strict: true\n",
        )
        .unwrap();

        let settings = ConfigFile::load(&path).unwrap().into_settings();
        let config = ModuleFilterConfig::from_settings(&settings).unwrap();
        assert_eq!(names(&config), vec!["Magento_Catalog", "Magento_Sales"]);
        assert!(config.is_strict());
    }

    #[test]
    fn test_config_file_json_strings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("testscope.json");
        fs::write(
            &path,
            r#"{"module_filter": "Magento_Cms", "module_filter_strict": "0"}"#,
        )
        .unwrap();

        let settings = ConfigFile::load(&path).unwrap().into_settings();
        assert_eq!(settings.module_filter.as_deref(), Some("Magento_Cms"));
        assert_eq!(settings.strict.as_deref(), Some("0"));
    }

    #[test]
    fn test_config_file_empty_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("testscope.json");
        fs::write(&path, "{}").unwrap();

        let settings = ConfigFile::load(&path).unwrap().into_settings();
        assert_eq!(settings, FilterSettings::default());
    }

    #[test]
    fn test_config_file_invalid_flag_surfaces_on_parse() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("testscope.yaml");
        fs::write(&path, "module_filter: Magento_Cms\nmodule_filter_strict: 7\n").unwrap();

        let settings = ConfigFile::load(&path).unwrap().into_settings();
        assert!(matches!(
            ModuleFilterConfig::from_settings(&settings),
            Err(ConfigurationError::InvalidStrictFlag { .. })
        ));
    }

    #[test]
    fn test_settings_precedence() {
        let cli = FilterSettings {
            module_filter: Some("Magento_Cms".to_string()),
            strict: None,
        };
        let file = FilterSettings {
            module_filter: Some("Magento_Sales".to_string()),
            strict: Some("yes".to_string()),
        };

        let merged = cli.or(file);
        assert_eq!(merged.module_filter.as_deref(), Some("Magento_Cms"));
        assert_eq!(merged.strict.as_deref(), Some("yes"));
    }

    #[test]
    fn test_config_file_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("testscope.toml");
        fs::write(&path, "module_filter = 'x'").unwrap();

        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigurationError::UnsupportedFormat { .. })
        ));
    }
}
