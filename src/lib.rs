//! Bamboo Provider
//!
//! A provider that exposes the users of a BambooHR company as the read-only
//! data source `bamboo_users`.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - **API client**: [`BambooClient`], a basic-auth HTTP client for the users endpoint
//! - **Data sources**: [`UsersDataSource`], mapping API users into provider state
//! - **Provider**: [`BambooProvider`], the [`ProviderService`] the host runtime drives
//! - **Configuration**: settings resolved from provider config with environment fallback
//! - **Schema & validation**: schema types and JSON validation returning diagnostics
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use bamboo_provider::{BambooProvider, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     bamboo_provider::init_logging();
//!
//!     let provider = BambooProvider::new(env!("CARGO_PKG_VERSION"));
//!     let diagnostics = provider
//!         .configure(json!({"host": "https://api.bamboohr.com/api/gateway.php", "company": "acme"}))
//!         .await?;
//!     assert!(diagnostics.is_empty());
//!
//!     let state = provider.read_data_source("bamboo_users", json!({})).await?;
//!     println!("{}", state["users"]);
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! | Attribute | Environment variable | Notes     |
//! |-----------|----------------------|-----------|
//! | `host`    | `BAMBOO_HOST`        |           |
//! | `company` | `BAMBOO_COMPANY`     |           |
//! | `apikey`  | `BAMBOO_APIKEY`      | sensitive |
//!
//! An explicit, non-null configuration value always wins over the environment.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod data_source;
pub mod error;
pub mod logging;
pub mod provider;
pub mod schema;
pub mod service;
pub mod testing;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use client::{BambooClient, User};
pub use config::{ClientConfig, ConfigValue, ProviderConfig};
pub use data_source::{DataSource, UserModel, UsersDataSource, UsersDataSourceModel};
pub use error::{ClientError, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{BambooProvider, PROVIDER_TYPE_NAME};
pub use schema::{Diagnostic, ProviderSchema};
pub use service::ProviderService;
pub use types::{ProviderData, ProviderMetadata};
pub use validation::validate;

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
