use serde::{Deserialize, Serialize};
use ssogate_core::PluginOptions;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub sso: SsoConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerSection {
    #[serde(default)]
    pub addr: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SsoConfig {
    /// Public URL of the host application, used to build the return URL.
    #[serde(default)]
    pub app_url: String,
    /// Base URL of the authenticated application API.
    #[serde(default)]
    pub api_base: String,
    /// Base URL of the SSO token endpoint. Falls back to `api_base`.
    #[serde(default)]
    pub sso_base: Option<String>,
    #[serde(default)]
    pub plugin: PluginOptions,
    #[serde(default)]
    pub cookie: CookieConfig,
}

impl SsoConfig {
    pub fn effective_sso_base(&self) -> &str {
        self.sso_base
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(self.api_base.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CookieConfig {
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub http_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sso_base_falls_back_to_api_base() {
        let mut config = SsoConfig {
            api_base: "https://api.example.com".to_string(),
            ..SsoConfig::default()
        };
        assert_eq!(config.effective_sso_base(), "https://api.example.com");
        config.sso_base = Some("  ".to_string());
        assert_eq!(config.effective_sso_base(), "https://api.example.com");
        config.sso_base = Some("https://sso.example.com".to_string());
        assert_eq!(config.effective_sso_base(), "https://sso.example.com");
    }

    #[test]
    fn yaml_config_parses() {
        let yaml = r#"
server:
  addr: 0.0.0.0:9000
sso:
  app_url: https://app.example.com
  api_base: https://api.example.com/v1
  plugin:
    debug: true
    endpoints:
      me: users/me
  cookie:
    secure: true
logging:
  format: json
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).expect("parse");
        assert_eq!(config.server.addr.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.sso.app_url, "https://app.example.com");
        assert!(config.sso.plugin.debug);
        assert_eq!(config.sso.plugin.endpoints.me, "users/me");
        assert!(config.sso.cookie.secure);
        assert!(!config.sso.cookie.http_only);
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
