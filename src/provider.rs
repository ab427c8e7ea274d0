//! The SonarCloud provider: configuration and operation dispatch.
//!
//! `configure` resolves the organization and token (explicit attributes
//! win over environment variables), builds the API client once, and
//! installs an immutable registry of resource handlers, each constructed
//! with a shared [`ProviderConfig`]. There is no mutable "configured" flag
//! consulted at call time: the presence of the registry is the configured
//! state, and dispatch before configuration yields a fixed diagnostic
//! without touching the network.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::api;
use crate::datasource::{self, DataSourceOps};
use crate::resource::{self, ResourceOps};
use crate::schema::{Attribute, Diagnostics, ProviderSchema, Schema};
use crate::validation;
use crate::value::AttrValue;

/// Environment variable consulted when the `organization` attribute is null.
pub const ORGANIZATION_ENV: &str = "SONARCLOUD_ORGANIZATION";

/// Environment variable consulted when the `token` attribute is null.
pub const TOKEN_ENV: &str = "SONARCLOUD_TOKEN";

const NOT_CONFIGURED_SUMMARY: &str = "Provider not configured";
const NOT_CONFIGURED_DETAIL: &str = "The provider has not been configured before apply, likely \
     because its configuration depends on an unknown value from another resource.";

/// The provider configuration attributes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderData {
    /// The SonarCloud organization to manage resources for. Falls back to
    /// `SONARCLOUD_ORGANIZATION` when left null.
    #[serde(default)]
    pub organization: AttrValue<String>,
    /// The token of a user with admin permissions in the organization.
    /// Falls back to `SONARCLOUD_TOKEN` when left null.
    #[serde(default)]
    pub token: AttrValue<String>,
}

/// Immutable configuration injected into every resource handler at
/// construction time.
#[derive(Debug)]
pub struct ProviderConfig {
    client: api::Client,
}

impl ProviderConfig {
    /// Wrap a configured API client.
    pub fn new(client: api::Client) -> Self {
        Self { client }
    }

    /// The API client handle.
    pub fn client(&self) -> &api::Client {
        &self.client
    }
}

struct Registry {
    resources: HashMap<&'static str, Box<dyn ResourceOps>>,
    data_sources: HashMap<&'static str, Box<dyn DataSourceOps>>,
}

impl Registry {
    fn new(cfg: Arc<ProviderConfig>) -> Self {
        let resources: Vec<Box<dyn ResourceOps>> = vec![
            Box::new(resource::project::ProjectResource::new(cfg.clone())),
            Box::new(resource::user_group::UserGroupResource::new(cfg.clone())),
            Box::new(resource::user_group_member::UserGroupMemberResource::new(
                cfg.clone(),
            )),
            Box::new(resource::long_lived_branch::LongLivedBranchResource::new(
                cfg.clone(),
            )),
            Box::new(resource::quality_gate::QualityGateResource::new(cfg.clone())),
            Box::new(
                resource::quality_gate_selection::QualityGateSelectionResource::new(cfg.clone()),
            ),
            Box::new(
                resource::user_group_permissions::UserGroupPermissionsResource::new(cfg.clone()),
            ),
            Box::new(resource::user_permissions::UserPermissionsResource::new(
                cfg.clone(),
            )),
            Box::new(resource::webhook::WebhookResource::new(cfg.clone())),
            Box::new(resource::user_token::UserTokenResource::new(cfg.clone())),
        ];

        let data_sources: Vec<Box<dyn DataSourceOps>> = vec![
            Box::new(datasource::projects::ProjectsDataSource::new(cfg.clone())),
            Box::new(datasource::user_groups::UserGroupsDataSource::new(
                cfg.clone(),
            )),
            Box::new(datasource::quality_gates::QualityGatesDataSource::new(
                cfg.clone(),
            )),
            Box::new(datasource::webhooks::WebhooksDataSource::new(cfg)),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }
}

/// The SonarCloud provider.
#[derive(Default)]
pub struct SonarCloudProvider {
    registry: OnceLock<Arc<Registry>>,
}

impl SonarCloudProvider {
    /// Create an unconfigured provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full schema of the provider: its configuration attributes plus
    /// every resource and data source it serves.
    pub fn schema(&self) -> ProviderSchema {
        let mut schema = ProviderSchema::new().with_provider_config(
            Schema::v0()
                .with_attribute(
                    "organization",
                    Attribute::optional_string().with_description(
                        "The SonarCloud organization to manage the resources for. This value \
                         must be set in the `SONARCLOUD_ORGANIZATION` environment variable if \
                         left empty.",
                    ),
                )
                .with_attribute(
                    "token",
                    Attribute::optional_string().sensitive().with_description(
                        "The token of a user with admin permissions in the organization. This \
                         value must be set in the `SONARCLOUD_TOKEN` environment variable if \
                         left empty.",
                    ),
                ),
        );

        for (name, resource_schema) in resource_schemas() {
            schema = schema.with_resource(name, resource_schema);
        }
        for (name, data_source_schema) in data_source_schemas() {
            schema = schema.with_data_source(name, data_source_schema);
        }
        schema
    }

    /// Configure the provider, resolving organization and token from the
    /// configuration attributes or their environment variable fallbacks.
    ///
    /// An unknown value produces a warning and leaves the provider
    /// unconfigured; subsequent operations then fail fast with the fixed
    /// not-configured diagnostic.
    pub fn configure(&self, config: ProviderData) -> Diagnostics {
        let mut diags = Diagnostics::new();

        if config.organization.is_unknown() {
            diags.add_warning(
                "Unable to create client",
                "Cannot use unknown value as organization",
            );
            return diags;
        }
        if config.token.is_unknown() {
            diags.add_warning("Unable to create client", "Cannot use unknown value as token");
            return diags;
        }

        let organization = config.organization.or_env(ORGANIZATION_ENV).unwrap_or_default();
        let token = config.token.or_env(TOKEN_ENV).unwrap_or_default();

        match api::Client::new(organization, token) {
            Ok(client) => {
                self.install(client);
            }
            Err(err) => {
                diags.add_error(
                    "Unable to create client",
                    format!("Building the API client returned an error: {}", err),
                );
            }
        }

        diags
    }

    /// Install a pre-built API client, e.g. one pointed at a mock server.
    pub fn configure_with_client(&self, client: api::Client) {
        self.install(client);
    }

    /// True once a configure call has installed the client and registry.
    pub fn is_configured(&self) -> bool {
        self.registry.get().is_some()
    }

    fn install(&self, client: api::Client) {
        info!(organization = client.organization(), "provider configured");
        let cfg = Arc::new(ProviderConfig::new(client));
        if self.registry.set(Arc::new(Registry::new(cfg))).is_err() {
            debug!("provider already configured, keeping existing client");
        }
    }

    /// Validate a resource configuration against its schema. Works before
    /// `configure`, since schemas are static.
    pub fn validate_resource_config(&self, resource_type: &str, config: &Value) -> Diagnostics {
        match resource_schemas()
            .into_iter()
            .find(|(name, _)| *name == resource_type)
        {
            Some((_, schema)) => validation::validate(&schema, config),
            None => {
                let mut diags = Diagnostics::new();
                diags.add_error(
                    "Unknown resource type",
                    format!("No resource type named '{}' is available", resource_type),
                );
                diags
            }
        }
    }

    /// Validate a data source configuration against its schema.
    pub fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: &Value,
    ) -> Diagnostics {
        match data_source_schemas()
            .into_iter()
            .find(|(name, _)| *name == data_source_type)
        {
            Some((_, schema)) => validation::validate(&schema, config),
            None => {
                let mut diags = Diagnostics::new();
                diags.add_error(
                    "Unknown data source type",
                    format!(
                        "No data source type named '{}' is available",
                        data_source_type
                    ),
                );
                diags
            }
        }
    }

    /// Create a resource from its planned attributes.
    pub async fn create(
        &self,
        resource_type: &str,
        diags: &mut Diagnostics,
        plan: Value,
    ) -> Option<Value> {
        let resource = self.resource(resource_type, diags)?;
        resource.create(diags, plan).await
    }

    /// Read the current attributes of a resource.
    pub async fn read(
        &self,
        resource_type: &str,
        diags: &mut Diagnostics,
        state: Value,
    ) -> Option<Value> {
        let resource = self.resource(resource_type, diags)?;
        resource.read(diags, state).await
    }

    /// Update a resource to its planned attributes.
    pub async fn update(
        &self,
        resource_type: &str,
        diags: &mut Diagnostics,
        state: Value,
        plan: Value,
    ) -> Option<Value> {
        let resource = self.resource(resource_type, diags)?;
        resource.update(diags, state, plan).await
    }

    /// Delete a resource. Returns `Some(())` only when the underlying call
    /// succeeded; the caller keeps the resource in state otherwise.
    pub async fn delete(
        &self,
        resource_type: &str,
        diags: &mut Diagnostics,
        state: Value,
    ) -> Option<()> {
        let resource = self.resource(resource_type, diags)?;
        resource.delete(diags, state).await
    }

    /// Read a data source.
    pub async fn read_data_source(
        &self,
        data_source_type: &str,
        diags: &mut Diagnostics,
        config: Value,
    ) -> Option<Value> {
        let Some(registry) = self.registry.get() else {
            diags.add_error(NOT_CONFIGURED_SUMMARY, NOT_CONFIGURED_DETAIL);
            return None;
        };

        match registry.data_sources.get(data_source_type) {
            Some(data_source) => data_source.read(diags, config).await,
            None => {
                diags.add_error(
                    "Unknown data source type",
                    format!(
                        "No data source type named '{}' is available",
                        data_source_type
                    ),
                );
                None
            }
        }
    }

    fn resource<'a>(
        &'a self,
        resource_type: &str,
        diags: &mut Diagnostics,
    ) -> Option<&'a dyn ResourceOps> {
        let Some(registry) = self.registry.get() else {
            diags.add_error(NOT_CONFIGURED_SUMMARY, NOT_CONFIGURED_DETAIL);
            return None;
        };

        match registry.resources.get(resource_type) {
            Some(resource) => Some(resource.as_ref()),
            None => {
                diags.add_error(
                    "Unknown resource type",
                    format!("No resource type named '{}' is available", resource_type),
                );
                None
            }
        }
    }
}

fn resource_schemas() -> Vec<(&'static str, Schema)> {
    use crate::resource::*;
    vec![
        (project::TYPE_NAME, project::schema()),
        (user_group::TYPE_NAME, user_group::schema()),
        (user_group_member::TYPE_NAME, user_group_member::schema()),
        (long_lived_branch::TYPE_NAME, long_lived_branch::schema()),
        (quality_gate::TYPE_NAME, quality_gate::schema()),
        (
            quality_gate_selection::TYPE_NAME,
            quality_gate_selection::schema(),
        ),
        (
            user_group_permissions::TYPE_NAME,
            user_group_permissions::schema(),
        ),
        (user_permissions::TYPE_NAME, user_permissions::schema()),
        (webhook::TYPE_NAME, webhook::schema()),
        (user_token::TYPE_NAME, user_token::schema()),
    ]
}

fn data_source_schemas() -> Vec<(&'static str, Schema)> {
    use crate::datasource::*;
    vec![
        (projects::TYPE_NAME, projects::schema()),
        (user_groups::TYPE_NAME, user_groups::schema()),
        (quality_gates::TYPE_NAME, quality_gates::schema()),
        (webhooks::TYPE_NAME, webhooks::schema()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_lists_all_types() {
        let provider = SonarCloudProvider::new();
        let schema = provider.schema();

        assert!(schema.provider.attributes.contains_key("organization"));
        assert!(schema.provider.attributes["token"].flags.sensitive);

        for name in [
            "sonarcloud_project",
            "sonarcloud_user_group",
            "sonarcloud_user_group_member",
            "sonarcloud_long_lived_branch",
            "sonarcloud_quality_gate",
            "sonarcloud_quality_gate_selection",
            "sonarcloud_user_group_permissions",
            "sonarcloud_user_permissions",
            "sonarcloud_webhook",
            "sonarcloud_user_token",
        ] {
            assert!(schema.resources.contains_key(name), "missing {}", name);
        }

        for name in [
            "sonarcloud_projects",
            "sonarcloud_user_groups",
            "sonarcloud_quality_gates",
            "sonarcloud_webhooks",
        ] {
            assert!(schema.data_sources.contains_key(name), "missing {}", name);
        }
    }

    #[tokio::test]
    async fn test_dispatch_before_configure_fails_fast() {
        let provider = SonarCloudProvider::new();
        let mut diags = Diagnostics::new();

        let state = provider
            .create(
                "sonarcloud_long_lived_branch",
                &mut diags,
                json!({"project_key": "proj1", "value": "release-.*"}),
            )
            .await;

        assert!(state.is_none());
        assert!(diags.has_errors());
        assert_eq!(diags.as_slice()[0].summary, "Provider not configured");
    }

    #[tokio::test]
    async fn test_unknown_resource_type() {
        let provider = SonarCloudProvider::new();
        provider.configure_with_client(api::Client::new("my-org", "token").unwrap());

        let mut diags = Diagnostics::new();
        let state = provider
            .read("sonarcloud_widget", &mut diags, json!({}))
            .await;

        assert!(state.is_none());
        assert!(diags.as_slice()[0].summary.contains("Unknown resource type"));
    }

    #[test]
    fn test_configure_unknown_organization_warns() {
        let provider = SonarCloudProvider::new();
        let diags = provider.configure(ProviderData {
            organization: AttrValue::Unknown,
            token: AttrValue::Known("token".to_string()),
        });

        assert!(!diags.has_errors());
        assert_eq!(diags.len(), 1);
        assert!(diags.as_slice()[0].summary.contains("Unable to create client"));
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_configure_unknown_token_warns() {
        let provider = SonarCloudProvider::new();
        let diags = provider.configure(ProviderData {
            organization: AttrValue::Known("my-org".to_string()),
            token: AttrValue::Unknown,
        });

        assert!(!diags.has_errors());
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_configure_from_environment() {
        temp_env::with_vars(
            [
                (ORGANIZATION_ENV, Some("env-org")),
                (TOKEN_ENV, Some("env-token")),
            ],
            || {
                let provider = SonarCloudProvider::new();
                let diags = provider.configure(ProviderData::default());

                assert!(diags.is_empty());
                assert!(provider.is_configured());
            },
        );
    }

    #[test]
    fn test_configure_prefers_explicit_attributes() {
        temp_env::with_var(ORGANIZATION_ENV, Some("env-org"), || {
            let provider = SonarCloudProvider::new();
            let diags = provider.configure(ProviderData {
                organization: AttrValue::Known("explicit-org".to_string()),
                token: AttrValue::Known("token".to_string()),
            });

            assert!(diags.is_empty());
            assert!(provider.is_configured());
        });
    }

    #[test]
    fn test_validate_resource_config_before_configure() {
        let provider = SonarCloudProvider::new();

        let diags = provider.validate_resource_config(
            "sonarcloud_long_lived_branch",
            &json!({"project_key": "k".repeat(401), "value": "release-.*"}),
        );
        assert!(diags.has_errors());

        let diags = provider.validate_resource_config(
            "sonarcloud_long_lived_branch",
            &json!({"project_key": "proj1", "value": "release-.*"}),
        );
        assert!(diags.is_empty());
    }
}
