//! Provider configuration resolution.
//!
//! The provider accepts three settings, `host`, `company` and `apikey`. Each
//! one can be set in the provider configuration or through an environment
//! variable; a non-null configuration value always wins.
//!
//! Resolution runs in two passes and each pass reports every failing setting:
//!
//! 1. any setting whose configuration value is still unknown is an error;
//! 2. after falling back to the environment, any empty setting is an error.

use std::fmt;

use serde_json::Value;

use crate::schema::Diagnostic;
use crate::types::is_unknown;

/// Environment variable consulted when `host` is not configured.
pub const ENV_HOST: &str = "BAMBOO_HOST";
/// Environment variable consulted when `company` is not configured.
pub const ENV_COMPANY: &str = "BAMBOO_COMPANY";
/// Environment variable consulted when `apikey` is not configured.
pub const ENV_APIKEY: &str = "BAMBOO_APIKEY";

/// Connection settings for [`BambooClient`](crate::client::BambooClient).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://api.bamboohr.com/api/gateway.php`.
    pub host: String,
    /// Company (tenant) path segment.
    pub company: String,
    /// API key, sent as the basic-auth username.
    pub api_key: String,
}

impl ClientConfig {
    /// Create a client configuration.
    pub fn new(
        host: impl Into<String>,
        company: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            company: company.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("company", &self.company)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// A single configuration value as sent by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Not set in configuration.
    Null,
    /// Set, but its value will only be known later.
    Unknown,
    /// Set to a concrete value.
    Known(String),
}

impl ConfigValue {
    /// Interpret an optional JSON value.
    ///
    /// Non-string values are kept as their JSON text; schema validation
    /// reports them before resolution runs.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Null,
            Some(v) if is_unknown(v) => Self::Unknown,
            Some(Value::String(s)) => Self::Known(s.clone()),
            Some(other) => Self::Known(other.to_string()),
        }
    }

    fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Static description of one provider setting.
struct Setting {
    attribute: &'static str,
    env_var: &'static str,
    /// Human name used in diagnostics, e.g. "Host" / "host".
    title: &'static str,
    noun: &'static str,
}

static HOST: Setting = Setting {
    attribute: "host",
    env_var: ENV_HOST,
    title: "Host",
    noun: "host",
};

static COMPANY: Setting = Setting {
    attribute: "company",
    env_var: ENV_COMPANY,
    title: "Company",
    noun: "company",
};

static APIKEY: Setting = Setting {
    attribute: "apikey",
    env_var: ENV_APIKEY,
    title: "Key",
    noun: "key",
};

impl Setting {
    fn unknown_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(format!("Unknown Bamboo API {}", self.title))
            .with_detail(format!(
                "The provider cannot create the Bamboo API client as there is an unknown \
                 configuration value for the Bamboo API {}. Either target apply the source \
                 of the value first, set the value statically in the configuration, or use \
                 the {} environment variable.",
                self.noun, self.env_var
            ))
            .with_attribute(self.attribute)
    }

    fn missing_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(format!("Missing Bamboo API {}", self.title))
            .with_detail(format!(
                "The provider cannot create the Bamboo API client as there is a missing or \
                 empty value for the Bamboo API {}. Set the {} value in the configuration or \
                 use the {} environment variable. If either is already set, ensure the value \
                 is not empty.",
                self.noun, self.attribute, self.env_var
            ))
            .with_attribute(self.attribute)
    }

    /// Explicit configuration first, then the environment.
    fn resolve<F>(&self, value: &ConfigValue, lookup: &F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        match value {
            ConfigValue::Known(v) => v.clone(),
            ConfigValue::Null | ConfigValue::Unknown => {
                lookup(self.env_var).unwrap_or_default()
            },
        }
    }
}

/// The provider configuration block as received from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// `host` attribute.
    pub host: ConfigValue,
    /// `company` attribute.
    pub company: ConfigValue,
    /// `apikey` attribute.
    pub apikey: ConfigValue,
}

impl ProviderConfig {
    /// Read the three settings out of the host's configuration object.
    pub fn from_json(config: &Value) -> Self {
        Self {
            host: ConfigValue::from_json(config.get(HOST.attribute)),
            company: ConfigValue::from_json(config.get(COMPANY.attribute)),
            apikey: ConfigValue::from_json(config.get(APIKEY.attribute)),
        }
    }

    fn settings(&self) -> [(&'static Setting, &ConfigValue); 3] {
        [
            (&HOST, &self.host),
            (&COMPANY, &self.company),
            (&APIKEY, &self.apikey),
        ]
    }

    /// Resolve against an arbitrary environment lookup.
    ///
    /// Returns one diagnostic per failing setting.
    pub fn resolve<F>(&self, lookup: F) -> Result<ClientConfig, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let unknown: Vec<Diagnostic> = self
            .settings()
            .iter()
            .filter(|(_, value)| value.is_unknown())
            .map(|(setting, _)| setting.unknown_diagnostic())
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }

        let [host, company, api_key] = self
            .settings()
            .map(|(setting, value)| (setting, setting.resolve(value, &lookup)));

        let missing: Vec<Diagnostic> = [&host, &company, &api_key]
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(setting, _)| setting.missing_diagnostic())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(ClientConfig {
            host: host.1,
            company: company.1,
            api_key: api_key.1,
        })
    }

    /// Resolve against the process environment.
    pub fn resolve_from_env(&self) -> Result<ClientConfig, Vec<Diagnostic>> {
        self.resolve(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::unknown;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn attributes(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect()
    }

    #[test]
    fn test_config_value_from_json() {
        assert_eq!(ConfigValue::from_json(None), ConfigValue::Null);
        assert_eq!(ConfigValue::from_json(Some(&Value::Null)), ConfigValue::Null);
        assert_eq!(ConfigValue::from_json(Some(&unknown())), ConfigValue::Unknown);
        assert_eq!(
            ConfigValue::from_json(Some(&json!("acme"))),
            ConfigValue::Known("acme".to_string())
        );
    }

    #[test]
    fn test_explicit_config_wins_over_env() {
        let config = ProviderConfig::from_json(&json!({
            "host": "A",
            "company": "acme",
            "apikey": "key",
        }));
        let resolved = config.resolve(env(&[(ENV_HOST, "B")])).unwrap();
        assert_eq!(resolved.host, "A");
    }

    #[test]
    fn test_env_used_when_config_absent() {
        let config = ProviderConfig::from_json(&json!({"company": "acme", "apikey": "key"}));
        let resolved = config.resolve(env(&[(ENV_HOST, "B")])).unwrap();
        assert_eq!(resolved.host, "B");
        assert_eq!(resolved.company, "acme");
    }

    #[test]
    fn test_null_config_falls_back_to_env() {
        let config = ProviderConfig::from_json(&json!({"host": null}));
        let resolved = config
            .resolve(env(&[
                (ENV_HOST, "http://localhost:8000"),
                (ENV_COMPANY, "testcompany"),
                (ENV_APIKEY, "APIKEY"),
            ]))
            .unwrap();
        assert_eq!(
            resolved,
            ClientConfig::new("http://localhost:8000", "testcompany", "APIKEY")
        );
    }

    #[test]
    fn test_missing_setting_names_attribute() {
        let config = ProviderConfig::from_json(&json!({"company": "acme", "apikey": "key"}));
        let diagnostics = config.resolve(env(&[])).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Missing Bamboo API Host");
        assert_eq!(attributes(&diagnostics), vec!["host"]);
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap()
            .contains(ENV_HOST));
    }

    #[test]
    fn test_all_missing_settings_reported() {
        let config = ProviderConfig::from_json(&json!({"host": "http://localhost"}));
        let diagnostics = config.resolve(env(&[])).unwrap_err();
        assert_eq!(attributes(&diagnostics), vec!["company", "apikey"]);
    }

    #[test]
    fn test_explicit_empty_string_is_missing() {
        let config = ProviderConfig::from_json(&json!({
            "host": "",
            "company": "acme",
            "apikey": "key",
        }));
        let diagnostics = config.resolve(env(&[(ENV_HOST, "B")])).unwrap_err();
        assert_eq!(attributes(&diagnostics), vec!["host"]);
    }

    #[test]
    fn test_unknown_values_reported_together() {
        let config = ProviderConfig::from_json(&json!({
            "host": unknown(),
            "company": "acme",
            "apikey": unknown(),
        }));
        let diagnostics = config
            .resolve(env(&[(ENV_HOST, "B"), (ENV_APIKEY, "key")]))
            .unwrap_err();
        assert_eq!(attributes(&diagnostics), vec!["host", "apikey"]);
        assert_eq!(diagnostics[0].summary, "Unknown Bamboo API Host");
        assert_eq!(diagnostics[1].summary, "Unknown Bamboo API Key");
    }

    #[test]
    fn test_resolve_from_env() {
        temp_env::with_vars(
            [
                (ENV_HOST, Some("http://env-host")),
                (ENV_COMPANY, Some("env-company")),
                (ENV_APIKEY, Some("env-key")),
            ],
            || {
                let config = ProviderConfig::from_json(&json!({"company": "explicit"}));
                let resolved = config.resolve_from_env().unwrap();
                assert_eq!(resolved.host, "http://env-host");
                assert_eq!(resolved.company, "explicit");
                assert_eq!(resolved.api_key, "env-key");
            },
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("http://localhost", "acme", "super-secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("acme"));
        assert!(!debug.contains("super-secret"));
    }
}
