use crate::core::widget::{WidgetOptions, DEFAULT_CURRENCY_SYMBOL, DEFAULT_RECOMMENDATION_LIMIT};
use crate::utils::error::{Result, WidgetError};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub widget: WidgetSection,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
            auth_token: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetSection {
    pub recommendation_limit: Option<usize>,
    pub currency_symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl WidgetConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WidgetError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| WidgetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHOP_AUTH_TOKEN})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WidgetError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.api.base_url
    }

    /// An unresolved `${VAR}` placeholder counts as no token.
    pub fn auth_token(&self) -> Option<String> {
        match self.api.auth_token.as_deref() {
            Some(token) if token.starts_with("${") => {
                tracing::warn!("auth_token placeholder {} was not substituted", token);
                None
            }
            Some(token) if !token.is_empty() => Some(token.to_string()),
            _ => None,
        }
    }

    pub fn recommendation_limit(&self) -> usize {
        self.widget
            .recommendation_limit
            .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
    }

    pub fn currency_symbol(&self) -> &str {
        self.widget
            .currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    pub fn log_format(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .unwrap_or("compact")
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn widget_options(&self) -> WidgetOptions {
        WidgetOptions {
            recommendation_limit: self.recommendation_limit(),
            currency_symbol: self.currency_symbol().to_string(),
        }
    }
}

impl Validate for WidgetConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, 300)?;
        }

        validate_positive_number("widget.recommendation_limit", self.recommendation_limit(), 1)?;
        validate_non_empty_string("widget.currency_symbol", self.currency_symbol())?;
        validate_one_of("logging.format", self.log_format(), &LOG_FORMATS)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
base_url = "https://shop.example.com"
timeout_seconds = 10
auth_token = "abc123"

[widget]
recommendation_limit = 3
currency_symbol = "$"

[logging]
level = "debug"
format = "json"
"#;

        let config = WidgetConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "https://shop.example.com");
        assert_eq!(config.auth_token().as_deref(), Some("abc123"));
        assert_eq!(config.recommendation_limit(), 3);
        assert_eq!(config.currency_symbol(), "$");
        assert_eq!(config.log_format(), "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_empty_file() {
        let config = WidgetConfig::from_toml_str("").unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.recommendation_limit(), 2);
        assert_eq!(config.currency_symbol(), "£");
        assert!(config.auth_token().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COMPANION_CART_TEST_TOKEN", "from-env");

        let toml_content = r#"
[api]
base_url = "https://shop.example.com"
auth_token = "${COMPANION_CART_TEST_TOKEN}"
"#;

        let config = WidgetConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.auth_token().as_deref(), Some("from-env"));

        std::env::remove_var("COMPANION_CART_TEST_TOKEN");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_token() {
        let toml_content = r#"
[api]
base_url = "https://shop.example.com"
auth_token = "${COMPANION_CART_SURELY_UNSET_VAR}"
"#;

        let config = WidgetConfig::from_toml_str(toml_content).unwrap();
        assert!(config.auth_token().is_none());
    }

    #[test]
    fn test_config_validation() {
        let bad_url = WidgetConfig::from_toml_str("[api]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_limit =
            WidgetConfig::from_toml_str("[widget]\nrecommendation_limit = 0\n").unwrap();
        assert!(bad_limit.validate().is_err());

        let bad_format = WidgetConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[api]\nbase_url = \"http://127.0.0.1:8080\"\n")
            .unwrap();

        let config = WidgetConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    }
}
