//! The association between a project and a quality gate.
//!
//! Selection is upsert-based: selecting a gate for a project replaces any
//! previous selection, so update re-sends the full association.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_quality_gate_selection";

/// Schema of the `sonarcloud_quality_gate_selection` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "gate_id",
            Attribute::required_string()
                .with_description("The id of the quality gate to select."),
        )
        .with_attribute(
            "project_key",
            Attribute::required_string()
                .with_description("The key of the project the gate applies to.")
                .with_length_between(1, 400)
                .with_force_new(),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct QualityGateSelection {
    #[serde(default)]
    id: Option<String>,
    gate_id: String,
    project_key: String,
}

/// Manages the quality gate selected for a project.
#[derive(Debug)]
pub struct QualityGateSelectionResource {
    cfg: Arc<ProviderConfig>,
}

impl QualityGateSelectionResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }

    async fn select(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: QualityGateSelection = decode(diags, "quality gate selection", plan)?;

        if let Err(err) = self
            .cfg
            .client()
            .select_quality_gate(&plan.gate_id, &plan.project_key)
            .await
        {
            diags.add_error(
                "Could not select quality gate",
                format!("The Select request returned an error: {}", err),
            );
            return None;
        }

        let state = QualityGateSelection {
            id: Some(plan.project_key.clone()),
            ..plan
        };
        encode(diags, "quality gate selection", &state)
    }
}

#[async_trait]
impl ResourceOps for QualityGateSelectionResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        self.select(diags, plan).await
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: QualityGateSelection = decode(diags, "quality gate selection", state)?;

        let gate = match self
            .cfg
            .client()
            .quality_gate_by_project(&state.project_key)
            .await
        {
            Ok(gate) => gate,
            Err(err) if err.is_not_found() => {
                diags.add_error(
                    "Quality gate selection not found",
                    format!("Project '{}' has no selected quality gate", state.project_key),
                );
                return None;
            }
            Err(err) => {
                diags.add_error(
                    "Could not read quality gate selection",
                    format!("The GetByProject request returned an error: {}", err),
                );
                return None;
            }
        };

        let state = QualityGateSelection {
            id: Some(state.project_key.clone()),
            gate_id: gate.id.to_string(),
            project_key: state.project_key,
        };
        encode(diags, "quality gate selection", &state)
    }

    // Selecting is an upsert; a changed gate_id re-sends the association.
    async fn update(&self, diags: &mut Diagnostics, _state: Value, plan: Value) -> Option<Value> {
        self.select(diags, plan).await
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: QualityGateSelection = decode(diags, "quality gate selection", state)?;

        if let Err(err) = self
            .cfg
            .client()
            .deselect_quality_gate(&state.project_key)
            .await
        {
            diags.add_error(
                "Could not deselect quality gate",
                format!("The Deselect request returned an error: {}", err),
            );
            return None;
        }

        Some(())
    }
}
