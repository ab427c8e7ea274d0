//! Permissions granted to a single user, globally or on a project.
//!
//! Mirrors the group permission resource with `login` as the grantee key.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::api::permissions::{GLOBAL_PERMISSIONS, PROJECT_PERMISSIONS};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_user_permissions";

/// Schema of the `sonarcloud_user_permissions` resource.
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
            "login",
            Attribute::required_string()
                .with_description("The login of the user.")
                .with_force_new(),
        )
        .with_attribute(
            "permissions",
            Attribute::required_string_list()
                .with_description("The permissions granted to the user.")
                .with_one_of(all_permissions),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserPermissionsState {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    project_key: Option<String>,
    login: String,
    permissions: Vec<String>,
}

impl UserPermissionsState {
    fn scope(&self) -> Option<&str> {
        self.project_key.as_deref().filter(|k| !k.is_empty())
    }

    fn with_id(self) -> Self {
        let id = match self.scope() {
            Some(project_key) => format!("{}/{}", project_key, self.login),
            None => self.login.clone(),
        };
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// Manages the permissions of a single user.
#[derive(Debug)]
pub struct UserPermissionsResource {
    cfg: Arc<ProviderConfig>,
}

impl UserPermissionsResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }

    async fn grant_all(&self, diags: &mut Diagnostics, state: &UserPermissionsState) -> Option<()> {
        for permission in &state.permissions {
            if let Err(err) = self
                .cfg
                .client()
                .add_user_permission(&state.login, permission, state.scope())
                .await
            {
                diags.add_error(
                    "Could not grant user permission",
                    format!("The AddUser request returned an error: {}", err),
                );
                return None;
            }
        }
        Some(())
    }

    async fn revoke_all(
        &self,
        diags: &mut Diagnostics,
        state: &UserPermissionsState,
    ) -> Option<()> {
        for permission in &state.permissions {
            if let Err(err) = self
                .cfg
                .client()
                .remove_user_permission(&state.login, permission, state.scope())
                .await
            {
                diags.add_error(
                    "Could not revoke user permission",
                    format!("The RemoveUser request returned an error: {}", err),
                );
                return None;
            }
        }
        Some(())
    }
}

#[async_trait]
impl ResourceOps for UserPermissionsResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: UserPermissionsState = decode(diags, "user permissions", plan)?;
        self.grant_all(diags, &plan).await?;
        encode(diags, "user permissions", &plan.with_id())
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: UserPermissionsState = decode(diags, "user permissions", state)?;

        let found = match self
            .cfg
            .client()
            .find_user_permissions(&state.login, state.scope())
            .await
        {
            Ok(found) => found,
            Err(err) => {
                diags.add_error(
                    "Could not read user permissions",
                    format!("The Users request returned an error: {}", err),
                );
                return None;
            }
        };

        let Some(found) = found else {
            diags.add_error(
                "User permissions not found",
                format!("No permissions are granted to user '{}'", state.login),
            );
            return None;
        };

        let state = UserPermissionsState {
            permissions: found.permissions,
            ..state
        };
        encode(diags, "user permissions", &state.with_id())
    }

    // Full re-send: revoke everything previously tracked, grant the plan.
    async fn update(&self, diags: &mut Diagnostics, state: Value, plan: Value) -> Option<Value> {
        let state: UserPermissionsState = decode(diags, "user permissions", state)?;
        let plan: UserPermissionsState = decode(diags, "user permissions", plan)?;

        self.revoke_all(diags, &state).await?;
        self.grant_all(diags, &plan).await?;
        encode(diags, "user permissions", &plan.with_id())
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: UserPermissionsState = decode(diags, "user permissions", state)?;
        self.revoke_all(diags, &state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        assert!(schema.attributes["login"].force_new);
        assert!(schema.attributes["permissions"].one_of.is_some());
    }

    #[test]
    fn test_global_id() {
        let state = UserPermissionsState {
            id: None,
            project_key: None,
            login: "alice".to_string(),
            permissions: vec!["scan".to_string()],
        };
        assert_eq!(state.with_id().id.as_deref(), Some("alice"));
    }
}
