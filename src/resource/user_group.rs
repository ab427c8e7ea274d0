//! A user group in the organization.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_user_group";

/// Schema of the `sonarcloud_user_group` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The name of the group, unique within the organization.")
                .with_length_between(1, 500),
        )
        .with_attribute(
            "description",
            Attribute::optional_string().with_description("The description of the group."),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserGroupState {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: Option<String>,
}

/// Manages a user group in the organization.
#[derive(Debug)]
pub struct UserGroupResource {
    cfg: Arc<ProviderConfig>,
}

impl UserGroupResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ResourceOps for UserGroupResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: UserGroupState = decode(diags, "user group", plan)?;

        let created = self
            .cfg
            .client()
            .create_user_group(&plan.name, plan.description.as_deref())
            .await;

        match created {
            Ok(group) => {
                let state = UserGroupState {
                    id: Some(group.id.to_string()),
                    name: group.name,
                    description: group.description.or(plan.description),
                };
                encode(diags, "user group", &state)
            }
            Err(err) => {
                diags.add_error(
                    "Could not create user group",
                    format!("The Create request returned an error: {}", err),
                );
                None
            }
        }
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: UserGroupState = decode(diags, "user group", state)?;

        match self.cfg.client().find_user_group(&state.name).await {
            Ok(Some(group)) => {
                let state = UserGroupState {
                    id: Some(group.id.to_string()),
                    name: group.name,
                    description: group.description,
                };
                encode(diags, "user group", &state)
            }
            Ok(None) => {
                diags.add_error(
                    "User group not found",
                    format!("No group named '{}' exists in the organization", state.name),
                );
                None
            }
            Err(err) => {
                diags.add_error(
                    "Could not read user group",
                    format!("The Search request returned an error: {}", err),
                );
                None
            }
        }
    }

    // Groups carry a server-side id, so name and description can change
    // in place.
    async fn update(&self, diags: &mut Diagnostics, state: Value, plan: Value) -> Option<Value> {
        let state: UserGroupState = decode(diags, "user group", state)?;
        let plan: UserGroupState = decode(diags, "user group", plan)?;

        let Some(id) = state.id.as_deref() else {
            diags.add_error(
                "Could not update user group",
                "The tracked state carries no group id",
            );
            return None;
        };

        if let Err(err) = self
            .cfg
            .client()
            .update_user_group(id, &plan.name, plan.description.as_deref())
            .await
        {
            diags.add_error(
                "Could not update user group",
                format!("The Update request returned an error: {}", err),
            );
            return None;
        }

        let state = UserGroupState {
            id: state.id,
            name: plan.name,
            description: plan.description,
        };
        encode(diags, "user group", &state)
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: UserGroupState = decode(diags, "user group", state)?;

        if let Err(err) = self.cfg.client().delete_user_group(&state.name).await {
            diags.add_error(
                "Could not delete user group",
                format!("The Delete request returned an error: {}", err),
            );
            return None;
        }

        Some(())
    }
}
