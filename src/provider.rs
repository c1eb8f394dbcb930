//! The `bamboo` provider.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::client::BambooClient;
use crate::config::ProviderConfig;
use crate::data_source::{DataSource, DataSourceFactory, UsersDataSource};
use crate::error::ProviderError;
use crate::schema::{has_errors, Attribute, Diagnostic, ProviderSchema, Schema};
use crate::service::ProviderService;
use crate::types::{ProviderData, ProviderMetadata};
use crate::validation::validate;

/// Type name of the provider; data source type names are prefixed with it.
pub const PROVIDER_TYPE_NAME: &str = "bamboo";

/// Provider exposing BambooHR as read-only data sources.
pub struct BambooProvider {
    version: String,
    client: RwLock<Option<Arc<BambooClient>>>,
    data_sources: Vec<DataSourceFactory>,
}

impl BambooProvider {
    /// Create a provider.
    ///
    /// `version` is the release version, `dev` for local builds and `test`
    /// under tests.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            client: RwLock::new(None),
            data_sources: vec![UsersDataSource::boxed as DataSourceFactory],
        }
    }

    /// The provider version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The client built by the last successful configuration.
    pub async fn client(&self) -> Option<Arc<BambooClient>> {
        self.client.read().await.clone()
    }

    fn config_schema() -> Schema {
        Schema::v0()
            .with_attribute(
                "host",
                Attribute::optional_string()
                    .with_description("Base URL of the BambooHR API. May also be set with BAMBOO_HOST."),
            )
            .with_attribute(
                "company",
                Attribute::optional_string()
                    .with_description("Company subdomain. May also be set with BAMBOO_COMPANY."),
            )
            .with_attribute(
                "apikey",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("API key. May also be set with BAMBOO_APIKEY."),
            )
    }

    fn type_name(data_source: &dyn DataSource) -> String {
        format!("{}_{}", PROVIDER_TYPE_NAME, data_source.type_suffix())
    }

    /// Instantiate the data source registered under `data_source_type`.
    fn data_source(&self, data_source_type: &str) -> Result<Box<dyn DataSource>, ProviderError> {
        self.data_sources
            .iter()
            .map(|factory| factory())
            .find(|ds| Self::type_name(ds.as_ref()) == data_source_type)
            .ok_or_else(|| ProviderError::UnknownDataSource(data_source_type.to_string()))
    }

    /// Configure using `lookup` for the environment fallback.
    ///
    /// [`ProviderService::configure`] calls this with the process environment.
    /// A configuration that returns errors leaves the provider unconfigured.
    pub async fn configure_with<F>(&self, config: Value, lookup: F) -> Vec<Diagnostic>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Creating Bamboo client");

        match Self::build_client(&config, lookup) {
            Ok(client) => {
                *self.client.write().await = Some(Arc::new(client));
                info!("Bamboo client was created");
                Vec::new()
            },
            Err(diagnostics) => {
                if self.client.write().await.take().is_some() {
                    debug!("Dropped client from previous configuration");
                }
                diagnostics
            },
        }
    }

    fn build_client<F>(config: &Value, lookup: F) -> Result<BambooClient, Vec<Diagnostic>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let diagnostics = validate(&Self::config_schema(), config);
        if has_errors(&diagnostics) {
            return Err(diagnostics);
        }

        let resolved = ProviderConfig::from_json(config)
            .resolve(lookup)
            .map_err(|diagnostics| {
                warn!(
                    diagnostics = diagnostics.len(),
                    "Provider configuration incomplete"
                );
                diagnostics
            })?;
        debug!(host = %resolved.host, company = %resolved.company, "Resolved provider configuration");

        BambooClient::new(resolved).map_err(|e| {
            vec![Diagnostic::error("Unable to Create Bamboo API Client").with_detail(format!(
                "An unexpected error occurred when creating the Bamboo API client. \
                 If the error is not clear, please contact the provider developers.\n\n\
                 Bamboo Client Error: {}",
                e
            ))]
        })
    }
}

impl Default for BambooProvider {
    fn default() -> Self {
        Self::new("dev")
    }
}

#[async_trait::async_trait]
impl ProviderService for BambooProvider {
    fn schema(&self) -> ProviderSchema {
        self.data_sources.iter().map(|factory| factory()).fold(
            ProviderSchema::new().with_provider_config(Self::config_schema()),
            |schema, ds| schema.with_data_source(Self::type_name(ds.as_ref()), ds.schema()),
        )
    }

    fn metadata(&self) -> ProviderMetadata {
        let mut data_sources: Vec<String> = self
            .data_sources
            .iter()
            .map(|factory| Self::type_name(factory().as_ref()))
            .collect();
        data_sources.sort();

        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: self.version.clone(),
            data_sources,
        }
    }

    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(validate(&Self::config_schema(), &config))
    }

    #[instrument(skip(self, config), name = "provider.configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        Ok(self
            .configure_with(config, |name| std::env::var(name).ok())
            .await)
    }

    async fn stop(&self) -> Result<(), ProviderError> {
        self.client.write().await.take();
        info!("Provider stopped");
        Ok(())
    }

    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let data_source = self.data_source(data_source_type)?;
        Ok(validate(&data_source.schema(), &config))
    }

    #[instrument(skip(self, config), name = "provider.read_data_source")]
    async fn read_data_source(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Value, ProviderError> {
        let mut data_source = self.data_source(data_source_type)?;
        let provider_data = self.client().await.map(|client| client as ProviderData);
        data_source.configure(provider_data)?;
        data_source.read(config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_APIKEY, ENV_COMPANY, ENV_HOST};
    use crate::error::ClientError;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_schema_exposes_users_data_source() {
        let schema = BambooProvider::new("test").schema();
        assert!(schema.data_sources.contains_key("bamboo_users"));
        assert!(schema.provider.attribute("apikey").unwrap().flags.sensitive);
        assert!(schema.provider.attribute("host").unwrap().flags.optional);
    }

    #[test]
    fn test_metadata() {
        let metadata = BambooProvider::new("1.2.3").metadata();
        assert_eq!(metadata.type_name, "bamboo");
        assert_eq!(metadata.version, "1.2.3");
        assert_eq!(metadata.data_sources, vec!["bamboo_users"]);
        assert_eq!(BambooProvider::default().version(), "dev");
    }

    #[tokio::test]
    async fn test_validate_provider_config_type_errors() {
        let provider = BambooProvider::new("test");
        let diagnostics = provider
            .validate_provider_config(json!({"host": 42}))
            .await
            .unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("host"));
    }

    #[tokio::test]
    async fn test_configure_reports_all_missing_settings() {
        let provider = BambooProvider::new("test");
        let diagnostics = provider.configure_with(json!({}), no_env).await;

        let attrs: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert_eq!(attrs, vec!["host", "company", "apikey"]);
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn test_configure_uses_env_fallback() {
        let provider = BambooProvider::new("test");
        let diagnostics = provider
            .configure_with(json!({"host": "http://explicit"}), |name| match name {
                ENV_HOST => Some("http://env".to_string()),
                ENV_COMPANY => Some("acme".to_string()),
                ENV_APIKEY => Some("key".to_string()),
                _ => None,
            })
            .await;

        assert!(diagnostics.is_empty());
        let client = provider.client().await.unwrap();
        assert_eq!(client.host(), "http://explicit");
        assert_eq!(client.company(), "acme");
    }

    #[tokio::test]
    async fn test_configure_rejects_wrong_types_before_resolution() {
        let provider = BambooProvider::new("test");
        let diagnostics = provider
            .configure_with(json!({"host": 1, "company": "acme", "apikey": "k"}), no_env)
            .await;
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[tokio::test]
    async fn test_read_unknown_data_source() {
        let provider = BambooProvider::new("test");
        let err = provider
            .read_data_source("bamboo_groups", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownDataSource(_)));

        let err = provider
            .validate_data_source_config("bamboo_groups", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::UnknownDataSource(_)));
    }

    #[tokio::test]
    async fn test_read_before_configure() {
        let provider = BambooProvider::new("test");
        let err = provider
            .read_data_source("bamboo_users", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_configure_then_read() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/acme/v1/meta/users/"))
            .and(header("Authorization", "Basic c2VjcmV0LWtleTp4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "7": {"id": 7, "employeeId": 70, "firstName": "Ada", "lastName": "L",
                      "email": "ada@acme.test", "status": "enabled", "lastLogin": ""}
            })))
            .mount(&server)
            .await;

        let provider = BambooProvider::new("test");
        let diagnostics = provider
            .configure_with(
                json!({"host": server.uri(), "company": "acme", "apikey": "secret-key"}),
                no_env,
            )
            .await;
        assert!(diagnostics.is_empty());

        let state = provider
            .read_data_source("bamboo_users", json!({}))
            .await
            .unwrap();
        assert_eq!(state["users"][0]["employeeid"], 70);
        assert_eq!(state["users"][0]["firstname"], "Ada");
    }

    #[tokio::test]
    async fn test_read_error_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let provider = BambooProvider::new("test");
        provider
            .configure_with(
                json!({"host": server.uri(), "company": "acme", "apikey": "wrong"}),
                no_env,
            )
            .await;

        let err = provider
            .read_data_source("bamboo_users", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Client(ClientError::UnexpectedStatus(401))
        ));
    }

    #[tokio::test]
    async fn test_stop_clears_client() {
        let provider = BambooProvider::new("test");
        provider
            .configure_with(
                json!({"host": "http://localhost", "company": "acme", "apikey": "k"}),
                no_env,
            )
            .await;
        assert!(provider.client().await.is_some());

        provider.stop().await.unwrap();
        assert!(provider.client().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_reconfigure_drops_previous_client() {
        let provider = BambooProvider::new("test");
        provider
            .configure_with(
                json!({"host": "http://localhost", "company": "acme", "apikey": "k"}),
                no_env,
            )
            .await;
        assert!(provider.client().await.is_some());

        let diagnostics = provider
            .configure_with(json!({"host": "http://localhost", "company": ""}), no_env)
            .await;
        assert!(has_errors(&diagnostics));
        assert!(provider.client().await.is_none());

        let err = provider
            .read_data_source("bamboo_users", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
