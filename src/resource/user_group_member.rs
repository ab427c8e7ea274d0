//! Membership of a single user in a user group.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_user_group_member";

/// Schema of the `sonarcloud_user_group_member` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "group",
            Attribute::required_string()
                .with_description("The name of the group.")
                .with_force_new(),
        )
        .with_attribute(
            "login",
            Attribute::required_string()
                .with_description("The login of the user to add to the group.")
                .with_force_new(),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserGroupMember {
    #[serde(default)]
    id: Option<String>,
    group: String,
    login: String,
}

impl UserGroupMember {
    fn with_id(self) -> Self {
        let id = format!("{}/{}", self.group, self.login);
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// Manages a single group membership.
#[derive(Debug)]
pub struct UserGroupMemberResource {
    cfg: Arc<ProviderConfig>,
}

impl UserGroupMemberResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ResourceOps for UserGroupMemberResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: UserGroupMember = decode(diags, "group member", plan)?;

        if let Err(err) = self
            .cfg
            .client()
            .add_user_to_group(&plan.group, &plan.login)
            .await
        {
            diags.add_error(
                "Could not add user to group",
                format!("The AddUser request returned an error: {}", err),
            );
            return None;
        }

        encode(diags, "group member", &plan.with_id())
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: UserGroupMember = decode(diags, "group member", state)?;

        let members = match self.cfg.client().list_group_members(&state.group).await {
            Ok(members) => members,
            Err(err) => {
                diags.add_error(
                    "Could not read group membership",
                    format!("The Users request returned an error: {}", err),
                );
                return None;
            }
        };

        if !members.iter().any(|m| m.login == state.login) {
            diags.add_error(
                "Group membership not found",
                format!(
                    "User '{}' is not a member of group '{}'",
                    state.login, state.group
                ),
            );
            return None;
        }

        encode(diags, "group member", &state.with_id())
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: UserGroupMember = decode(diags, "group member", state)?;

        if let Err(err) = self
            .cfg
            .client()
            .remove_user_from_group(&state.group, &state.login)
            .await
        {
            diags.add_error(
                "Could not remove user from group",
                format!("The RemoveUser request returned an error: {}", err),
            );
            return None;
        }

        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        assert!(schema.attributes["group"].force_new);
        assert!(schema.attributes["login"].force_new);
    }

    #[test]
    fn test_id_composition() {
        let member = UserGroupMember {
            id: None,
            group: "devs".to_string(),
            login: "alice".to_string(),
        }
        .with_id();
        assert_eq!(member.id.as_deref(), Some("devs/alice"));
    }
}
