//! A quality gate in the organization.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_quality_gate";

/// Schema of the `sonarcloud_quality_gate` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The name of the quality gate.")
                .with_length_between(1, 100)
                .with_force_new(),
        )
        .with_attribute(
            "is_default",
            Attribute::computed_bool()
                .with_description("Whether this gate is the organization default."),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QualityGateState {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    is_default: Option<bool>,
}

/// Manages a quality gate.
#[derive(Debug)]
pub struct QualityGateResource {
    cfg: Arc<ProviderConfig>,
}

impl QualityGateResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ResourceOps for QualityGateResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: QualityGateState = decode(diags, "quality gate", plan)?;

        match self.cfg.client().create_quality_gate(&plan.name).await {
            Ok(gate) => {
                let state = QualityGateState {
                    id: Some(gate.id.to_string()),
                    name: gate.name,
                    is_default: Some(gate.is_default),
                };
                encode(diags, "quality gate", &state)
            }
            Err(err) => {
                diags.add_error(
                    "Could not create quality gate",
                    format!("The Create request returned an error: {}", err),
                );
                None
            }
        }
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: QualityGateState = decode(diags, "quality gate", state)?;

        let gates = match self.cfg.client().list_quality_gates().await {
            Ok(gates) => gates,
            Err(err) => {
                diags.add_error(
                    "Could not read quality gate",
                    format!("The List request returned an error: {}", err),
                );
                return None;
            }
        };

        let found = gates.into_iter().find(|g| g.name == state.name);
        let Some(gate) = found else {
            diags.add_error(
                "Quality gate not found",
                format!("No quality gate named '{}' exists", state.name),
            );
            return None;
        };

        let state = QualityGateState {
            id: Some(gate.id.to_string()),
            name: gate.name,
            is_default: Some(gate.is_default),
        };
        encode(diags, "quality gate", &state)
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: QualityGateState = decode(diags, "quality gate", state)?;

        let Some(id) = state.id.as_deref() else {
            diags.add_error(
                "Could not delete quality gate",
                "The tracked state carries no gate id",
            );
            return None;
        };

        if let Err(err) = self.cfg.client().destroy_quality_gate(id).await {
            diags.add_error(
                "Could not delete quality gate",
                format!("The Destroy request returned an error: {}", err),
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
        assert!(schema.attributes["name"].force_new);
        assert_eq!(schema.attributes["name"].max_length, Some(100));
        assert!(schema.attributes["is_default"].flags.computed);
    }
}
