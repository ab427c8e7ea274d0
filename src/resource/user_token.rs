//! A token of a SonarCloud user.
//!
//! The token value is only returned on generation, so read keeps the
//! tracked value and merely confirms the token still exists. Tokens cannot
//! be changed in place; every attribute forces replacement and update is a
//! typed unsupported operation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_user_token";

/// Schema of the `sonarcloud_user_token` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "login",
            Attribute::required_string()
                .with_description("The login of the user the token belongs to.")
                .with_force_new(),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The name of the token, unique per user.")
                .with_length_between(1, 100)
                .with_force_new(),
        )
        .with_attribute(
            "token",
            Attribute::computed_string()
                .sensitive()
                .with_description("The generated token value. Shown exactly once by the API."),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserTokenState {
    #[serde(default)]
    id: Option<String>,
    login: String,
    name: String,
    #[serde(default)]
    token: Option<String>,
}

/// Manages a user token.
#[derive(Debug)]
pub struct UserTokenResource {
    cfg: Arc<ProviderConfig>,
}

impl UserTokenResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ResourceOps for UserTokenResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: UserTokenState = decode(diags, "user token", plan)?;

        let generated = self
            .cfg
            .client()
            .generate_user_token(&plan.login, &plan.name)
            .await;

        match generated {
            Ok(token) => {
                let state = UserTokenState {
                    id: Some(format!("{}/{}", token.login, token.name)),
                    login: token.login,
                    name: token.name,
                    token: Some(token.token),
                };
                encode(diags, "user token", &state)
            }
            Err(err) => {
                diags.add_error(
                    "Could not generate user token",
                    format!("The Generate request returned an error: {}", err),
                );
                None
            }
        }
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: UserTokenState = decode(diags, "user token", state)?;

        let found = match self
            .cfg
            .client()
            .find_user_token(&state.login, &state.name)
            .await
        {
            Ok(found) => found,
            Err(err) => {
                diags.add_error(
                    "Could not read user token",
                    format!("The Search request returned an error: {}", err),
                );
                return None;
            }
        };

        if found.is_none() {
            diags.add_error(
                "User token not found",
                format!("User '{}' has no token named '{}'", state.login, state.name),
            );
            return None;
        }

        // The API never re-exposes the token value; keep the tracked one.
        let state = UserTokenState {
            id: Some(format!("{}/{}", state.login, state.name)),
            ..state
        };
        encode(diags, "user token", &state)
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: UserTokenState = decode(diags, "user token", state)?;

        if let Err(err) = self
            .cfg
            .client()
            .revoke_user_token(&state.login, &state.name)
            .await
        {
            diags.add_error(
                "Could not revoke user token",
                format!("The Revoke request returned an error: {}", err),
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
        assert!(schema.attributes["login"].force_new);
        assert!(schema.attributes["name"].force_new);
        assert!(schema.attributes["token"].flags.computed);
        assert!(schema.attributes["token"].flags.sensitive);
    }

    #[tokio::test]
    async fn test_update_is_unsupported() {
        use crate::api::Client;

        let resource = UserTokenResource::new(Arc::new(ProviderConfig::new(
            Client::new("my-org", "token").unwrap(),
        )));

        let mut diags = Diagnostics::new();
        let state = resource
            .update(
                &mut diags,
                serde_json::json!({"login": "alice", "name": "ci"}),
                serde_json::json!({"login": "alice", "name": "ci2"}),
            )
            .await;

        assert!(state.is_none());
        assert!(diags.has_errors());
        assert!(diags.as_slice()[0].summary.contains("Unsupported operation"));
    }
}
