//! Data sources exposed by the provider.
//!
//! A data source is created fresh for every request, handed the provider's
//! configured client through [`DataSource::configure`], and then read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{BambooClient, User};
use crate::error::ProviderError;
use crate::schema::{Attribute, AttributeType, Schema};
use crate::types::ProviderData;

/// A read-only data source.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Type name suffix; the full type name is `<provider>_<suffix>`.
    fn type_suffix(&self) -> &'static str;

    /// Schema of the data source state.
    fn schema(&self) -> Schema;

    /// Receive the provider data produced by provider configuration.
    ///
    /// `None` means the provider has not been configured yet.
    fn configure(&mut self, provider_data: Option<ProviderData>) -> Result<(), ProviderError>;

    /// Read the current state.
    async fn read(&self, config: Value) -> Result<Value, ProviderError>;
}

/// Factory the provider uses to instantiate a data source per request.
pub type DataSourceFactory = fn() -> Box<dyn DataSource>;

/// State shape of a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    /// Numeric user id.
    pub id: i64,
    /// Linked employee id.
    pub employeeid: i64,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Login email.
    pub email: String,
    /// Account status.
    pub status: String,
    /// Last login timestamp.
    pub lastlogin: String,
}

impl From<User> for UserModel {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            employeeid: user.employee_id,
            firstname: user.first_name,
            lastname: user.last_name,
            email: user.email,
            status: user.status,
            lastlogin: user.last_login,
        }
    }
}

/// State shape of the `users` data source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersDataSourceModel {
    /// Every user known to the API.
    pub users: Vec<UserModel>,
}

/// Lists every BambooHR user.
#[derive(Debug, Default)]
pub struct UsersDataSource {
    client: Option<Arc<BambooClient>>,
}

impl UsersDataSource {
    /// Create an unconfigured data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed constructor, usable as a [`DataSourceFactory`].
    pub fn boxed() -> Box<dyn DataSource> {
        Box::new(Self::new())
    }

    /// Element type of the `users` list.
    fn user_type() -> AttributeType {
        AttributeType::object([
            ("id", AttributeType::Int64),
            ("employeeid", AttributeType::Int64),
            ("firstname", AttributeType::String),
            ("lastname", AttributeType::String),
            ("email", AttributeType::String),
            ("status", AttributeType::String),
            ("lastlogin", AttributeType::String),
        ])
    }
}

#[async_trait::async_trait]
impl DataSource for UsersDataSource {
    fn type_suffix(&self) -> &'static str {
        "users"
    }

    fn schema(&self) -> Schema {
        Schema::v0()
            .with_description("Lists every user of the configured BambooHR company.")
            .with_attribute(
                "users",
                Attribute::computed_object_list(Self::user_type())
                    .with_description("Users returned by the API, ordered by id."),
            )
    }

    fn configure(&mut self, provider_data: Option<ProviderData>) -> Result<(), ProviderError> {
        let Some(data) = provider_data else {
            return Ok(());
        };

        let client = data.downcast::<BambooClient>().map_err(|_| {
            ProviderError::Configuration(
                "Unexpected Data Source Configure Type: expected a BambooClient. \
                 Please report this issue to the provider developers."
                    .to_string(),
            )
        })?;
        self.client = Some(client);
        Ok(())
    }

    #[instrument(skip(self, _config), name = "users.read")]
    async fn read(&self, _config: Value) -> Result<Value, ProviderError> {
        let client = self.client.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured(
                "the users data source was read before the provider was configured".to_string(),
            )
        })?;

        debug!("Reading users");
        let users = client.get_users().await?;

        let state = UsersDataSourceModel {
            users: users.into_iter().map(UserModel::from).collect(),
        };
        info!(count = state.users.len(), "Read users");

        Ok(serde_json::to_value(state)?)
    }
}
