//! SonarCloud provider
//!
//! This crate maps declarative resource management onto the SonarCloud Web
//! API: projects, long-lived branch patterns, quality gates, user groups,
//! permissions, webhooks and user tokens. Every resource follows the same
//! four-operation contract (create, read, update, delete), every data
//! source a single read, and each operation performs one or a handful of
//! blocking HTTP calls whose failures are surfaced as diagnostics.
//!
//! # Overview
//!
//! - [`SonarCloudProvider`]: resolves the organization and token, builds
//!   the API client once, and dispatches operations by resource type name.
//! - [`api::Client`]: the REST client wrapping the SonarCloud Web API, one
//!   module per endpoint group.
//! - [`schema`]: flat attribute schemas with the length/enum constraints
//!   the API enforces, plus the [`schema::Diagnostics`] list every
//!   operation reports through.
//! - [`validation`]: checks a configuration against its schema before any
//!   API call is attempted.
//!
//! # Quick Start
//!
//! ```no_run
//! use sonarcloud_provider::{Diagnostics, ProviderData, SonarCloudProvider};
//! use serde_json::json;
//!
//! # async fn run() {
//! let provider = SonarCloudProvider::new();
//!
//! // Resolves SONARCLOUD_ORGANIZATION / SONARCLOUD_TOKEN from the
//! // environment when the attributes are left null.
//! let diags = provider.configure(ProviderData::default());
//! assert!(!diags.has_errors());
//!
//! let mut diags = Diagnostics::new();
//! let state = provider
//!     .create(
//!         "sonarcloud_long_lived_branch",
//!         &mut diags,
//!         json!({"project_key": "my-project", "value": "release-.*"}),
//!     )
//!     .await;
//! # let _ = state;
//! # }
//! ```
//!
//! # Error handling
//!
//! Operations report through [`Diagnostics`]: an API failure is recorded
//! with a fixed summary and the raw error text, never retried. Dispatching
//! any operation before [`SonarCloudProvider::configure`] succeeds yields
//! the fixed "Provider not configured" diagnostic without touching the
//! network.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod datasource;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resource;
pub mod schema;
pub mod validation;
pub mod value;

// Re-export main types at crate root
pub use error::ProviderError;
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{ProviderConfig, ProviderData, SonarCloudProvider, ORGANIZATION_ENV, TOKEN_ENV};
pub use schema::{Diagnostic, DiagnosticSeverity, Diagnostics, ProviderSchema};
pub use validation::{is_valid, validate};
pub use value::AttrValue;

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
