use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SearchError};
use crate::utils::validation::{validate_non_empty_string, validate_url, validate_url_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_API_KEY: &str = "your-api-key-here";
pub const DEFAULT_THERAPISTS_PATH: &str = "/therapists";

/// Static connection settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub therapists_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            therapists_path: DEFAULT_THERAPISTS_PATH.to_string(),
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn therapists_path(&self) -> &str {
        &self.therapists_path
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api_base_url)?;
        validate_non_empty_string("api.api_key", &self.api_key)?;
        validate_url_path("api.therapists_path", &self.therapists_path)?;
        Ok(())
    }
}

/// On-disk layout:
///
/// ```toml
/// [api]
/// base_url = "https://elis.example.org"
/// api_key = "${ELIS_API_KEY}"
/// therapists_path = "/therapists"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub therapists_path: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SearchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SearchError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ELIS_API_KEY})，找不到的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SearchError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Layers the file's values over `base`.
    pub fn apply_to(&self, mut base: AppConfig) -> AppConfig {
        if let Some(base_url) = &self.api.base_url {
            base.api_base_url = base_url.clone();
        }
        if let Some(api_key) = &self.api.api_key {
            base.api_key = api_key.clone();
        }
        if let Some(path) = &self.api.therapists_path {
            base.therapists_path = path.clone();
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.therapists_path, "/therapists");
    }

    #[test]
    fn test_invalid_config_values() {
        let mut config = AppConfig::default();
        config.api_base_url = "ftp://elis.example.org".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api_key = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.therapists_path = "therapists".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_and_apply() {
        let toml_content = r#"
[api]
base_url = "https://elis.example.org"
api_key = "secret-key"
"#;
        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        let config = file_config.apply_to(AppConfig::default());

        assert_eq!(config.api_base_url, "https://elis.example.org");
        assert_eq!(config.api_key, "secret-key");
        assert_eq!(config.therapists_path, DEFAULT_THERAPISTS_PATH);
    }

    #[test]
    fn test_empty_toml_keeps_defaults() {
        let file_config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(file_config.apply_to(AppConfig::default()), AppConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ELIS_SEARCH_TEST_KEY", "from-env");
        let toml_content = r#"
[api]
api_key = "${ELIS_SEARCH_TEST_KEY}"
therapists_path = "${ELIS_SEARCH_TEST_UNSET_VAR}"
"#;
        let file_config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(file_config.api.api_key.as_deref(), Some("from-env"));
        assert_eq!(
            file_config.api.therapists_path.as_deref(),
            Some("${ELIS_SEARCH_TEST_UNSET_VAR}")
        );
        std::env::remove_var("ELIS_SEARCH_TEST_KEY");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://localhost:9000\"").unwrap();

        let file_config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(
            file_config.api.base_url.as_deref(),
            Some("http://localhost:9000")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[api\nbase_url = 1");
        assert!(matches!(result, Err(SearchError::ConfigError { .. })));
    }
}
