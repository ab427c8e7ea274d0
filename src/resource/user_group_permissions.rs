//! Permissions granted to a user group, globally or on a single project.
//!
//! The permission endpoints grant and revoke one permission at a time, so
//! create fans out into one call per permission and update fully re-sends:
//! every previously tracked permission is revoked, every planned one is
//! granted.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::api::permissions::{GLOBAL_PERMISSIONS, PROJECT_PERMISSIONS};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_user_group_permissions";

/// Schema of the `sonarcloud_user_group_permissions` resource.
pub fn schema() -> Schema {
    let mut all_permissions: Vec<&str> = GLOBAL_PERMISSIONS.to_vec();
    for permission in PROJECT_PERMISSIONS.iter().copied() {
        if !all_permissions.contains(&permission) {
            all_permissions.push(permission);
        }
    }

    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "project_key",
            Attribute::optional_string()
                .with_description(
                    "The key of the project to scope the permissions to. Leave empty for \
                     organization-wide permissions.",
                )
                .with_force_new(),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The name of the group.")
                .with_force_new(),
        )
        .with_attribute(
            "permissions",
            Attribute::required_string_list()
                .with_description("The permissions granted to the group.")
                .with_one_of(all_permissions),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroupPermissionsState {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    project_key: Option<String>,
    name: String,
    permissions: Vec<String>,
}

impl GroupPermissionsState {
    fn scope(&self) -> Option<&str> {
        self.project_key.as_deref().filter(|k| !k.is_empty())
    }

    fn with_id(self) -> Self {
        let id = match self.scope() {
            Some(project_key) => format!("{}/{}", project_key, self.name),
            None => self.name.clone(),
        };
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// Manages the permissions of a user group.
#[derive(Debug)]
pub struct UserGroupPermissionsResource {
    cfg: Arc<ProviderConfig>,
}

impl UserGroupPermissionsResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }

    async fn grant_all(
        &self,
        diags: &mut Diagnostics,
        state: &GroupPermissionsState,
    ) -> Option<()> {
        for permission in &state.permissions {
            if let Err(err) = self
                .cfg
                .client()
                .add_group_permission(&state.name, permission, state.scope())
                .await
            {
                diags.add_error(
                    "Could not grant group permission",
                    format!("The AddGroup request returned an error: {}", err),
                );
                return None;
            }
        }
        Some(())
    }

    async fn revoke_all(
        &self,
        diags: &mut Diagnostics,
        state: &GroupPermissionsState,
    ) -> Option<()> {
        for permission in &state.permissions {
            if let Err(err) = self
                .cfg
                .client()
                .remove_group_permission(&state.name, permission, state.scope())
                .await
            {
                diags.add_error(
                    "Could not revoke group permission",
                    format!("The RemoveGroup request returned an error: {}", err),
                );
                return None;
            }
        }
        Some(())
    }
}

#[async_trait]
impl ResourceOps for UserGroupPermissionsResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: GroupPermissionsState = decode(diags, "group permissions", plan)?;
        self.grant_all(diags, &plan).await?;
        encode(diags, "group permissions", &plan.with_id())
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: GroupPermissionsState = decode(diags, "group permissions", state)?;

        let found = match self
            .cfg
            .client()
            .find_group_permissions(&state.name, state.scope())
            .await
        {
            Ok(found) => found,
            Err(err) => {
                diags.add_error(
                    "Could not read group permissions",
                    format!("The Groups request returned an error: {}", err),
                );
                return None;
            }
        };

        let Some(found) = found else {
            diags.add_error(
                "Group permissions not found",
                format!("No permissions are granted to group '{}'", state.name),
            );
            return None;
        };

        let state = GroupPermissionsState {
            permissions: found.permissions,
            ..state
        };
        encode(diags, "group permissions", &state.with_id())
    }

    // Full re-send: revoke everything previously tracked, grant the plan.
    async fn update(&self, diags: &mut Diagnostics, state: Value, plan: Value) -> Option<Value> {
        let state: GroupPermissionsState = decode(diags, "group permissions", state)?;
        let plan: GroupPermissionsState = decode(diags, "group permissions", plan)?;

        self.revoke_all(diags, &state).await?;
        self.grant_all(diags, &plan).await?;
        encode(diags, "group permissions", &plan.with_id())
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: GroupPermissionsState = decode(diags, "group permissions", state)?;
        self.revoke_all(diags, &state).await
    }
}
