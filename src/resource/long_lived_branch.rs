//! The long-lived branch pattern of a project.
//!
//! Backed by the upsert-based settings endpoints: create and update both
//! re-send the full value, delete resets the setting to its default.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{decode, encode, ResourceOps};
use crate::api::settings::SetRequest;
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// Setting key holding the long-lived branch pattern.
pub const LONG_LIVED_BRANCHES_REGEX: &str = "sonar.branch.longLivedBranches.regex";

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_long_lived_branch";

/// Schema of the `sonarcloud_long_lived_branch` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "project_key",
            Attribute::required_string()
                .with_description("The key of the project.")
                .with_length_between(1, 400)
                .with_force_new(),
        )
        .with_attribute(
            "value",
            Attribute::required_string()
                .with_description("Regular expression matching long lived branch names.")
                .with_force_new(),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LongLivedBranch {
    #[serde(default)]
    id: Option<String>,
    project_key: String,
    value: String,
}

/// Manages the long-lived branch pattern setting of a project.
#[derive(Debug)]
pub struct LongLivedBranchResource {
    cfg: Arc<ProviderConfig>,
}

impl LongLivedBranchResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }

    async fn set_pattern(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: LongLivedBranch = decode(diags, "long lived branch", plan)?;

        let request = SetRequest {
            component: plan.project_key.clone(),
            key: LONG_LIVED_BRANCHES_REGEX.to_string(),
            value: plan.value.clone(),
        };

        if let Err(err) = self.cfg.client().set_setting(&request).await {
            diags.add_error(
                "Could not set long lived branch pattern",
                format!("The Set request returned an error: {}", err),
            );
        }

        let state = LongLivedBranch {
            id: Some(plan.project_key.clone()),
            project_key: plan.project_key,
            value: plan.value,
        };
        encode(diags, "long lived branch", &state)
    }
}

#[async_trait]
impl ResourceOps for LongLivedBranchResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        self.set_pattern(diags, plan).await
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: LongLivedBranch = decode(diags, "long lived branch", state)?;

        let settings = match self
            .cfg
            .client()
            .setting_values(&state.project_key, LONG_LIVED_BRANCHES_REGEX)
            .await
        {
            Ok(settings) => settings,
            Err(err) => {
                diags.add_error(
                    "Could not read long lived branch pattern",
                    format!("The Values request returned an error: {}", err),
                );
                return None;
            }
        };

        // An empty result set means the setting was never set or has been
        // reset; surface that as not-found instead of indexing blindly.
        let value = settings
            .iter()
            .find(|s| s.key == LONG_LIVED_BRANCHES_REGEX)
            .and_then(|s| s.value.clone());

        let Some(value) = value else {
            debug!(project_key = %state.project_key, "long lived branch pattern not set");
            diags.add_error(
                "Long lived branch pattern not found",
                format!(
                    "No value is set for '{}' on project '{}'",
                    LONG_LIVED_BRANCHES_REGEX, state.project_key
                ),
            );
            return None;
        };

        let state = LongLivedBranch {
            id: Some(state.project_key.clone()),
            project_key: state.project_key,
            value,
        };
        encode(diags, "long lived branch", &state)
    }

    // Settings are upsert semantics: an update re-sends the full value.
    async fn update(&self, diags: &mut Diagnostics, _state: Value, plan: Value) -> Option<Value> {
        self.set_pattern(diags, plan).await
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: LongLivedBranch = decode(diags, "long lived branch", state)?;

        if let Err(err) = self
            .cfg
            .client()
            .reset_setting(&state.project_key, LONG_LIVED_BRANCHES_REGEX)
            .await
        {
            diags.add_error(
                "Could not delete long lived branch pattern",
                format!("The Reset request returned an error: {}", err),
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
        assert!(schema.attributes["id"].flags.computed);

        let project_key = &schema.attributes["project_key"];
        assert!(project_key.flags.required);
        assert!(project_key.force_new);
        assert_eq!(project_key.min_length, Some(1));
        assert_eq!(project_key.max_length, Some(400));

        let value = &schema.attributes["value"];
        assert!(value.flags.required);
        assert!(value.force_new);
    }

    #[test]
    fn test_state_decoding_tolerates_missing_id() {
        let state: LongLivedBranch = serde_json::from_value(serde_json::json!({
            "project_key": "proj1",
            "value": "release-.*"
        }))
        .unwrap();
        assert_eq!(state.id, None);
        assert_eq!(state.value, "release-.*");
    }
}
