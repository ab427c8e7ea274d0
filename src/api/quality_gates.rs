//! Quality gate endpoints (`api/qualitygates/*`).

use serde::Deserialize;

use super::Client;
use crate::error::ProviderError;

/// A quality gate as returned by the gate endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityGate {
    /// Gate identifier.
    pub id: serde_json::Number,
    /// Gate name, unique within the organization.
    pub name: String,
    /// True when this gate is the organization default.
    #[serde(default, rename = "isDefault")]
    pub is_default: bool,
    /// True when the gate is built in and cannot be edited.
    #[serde(default, rename = "isBuiltIn")]
    pub is_built_in: bool,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    qualitygates: Vec<QualityGate>,
}

#[derive(Debug, Deserialize)]
struct GateByProjectResponse {
    #[serde(rename = "qualityGate")]
    quality_gate: QualityGate,
}

impl Client {
    /// Create a quality gate.
    pub async fn create_quality_gate(&self, name: &str) -> Result<QualityGate, ProviderError> {
        self.post_json(
            "qualitygates/create",
            &[("organization", self.organization()), ("name", name)],
        )
        .await
    }

    /// Delete a quality gate by id.
    pub async fn destroy_quality_gate(&self, id: &str) -> Result<(), ProviderError> {
        self.post_form(
            "qualitygates/destroy",
            &[("organization", self.organization()), ("id", id)],
        )
        .await
    }

    /// Associate a project with a quality gate.
    pub async fn select_quality_gate(
        &self,
        gate_id: &str,
        project_key: &str,
    ) -> Result<(), ProviderError> {
        self.post_form(
            "qualitygates/select",
            &[
                ("organization", self.organization()),
                ("gateId", gate_id),
                ("projectKey", project_key),
            ],
        )
        .await
    }

    /// Detach a project from its selected quality gate.
    pub async fn deselect_quality_gate(&self, project_key: &str) -> Result<(), ProviderError> {
        self.post_form(
            "qualitygates/deselect",
            &[
                ("organization", self.organization()),
                ("projectKey", project_key),
            ],
        )
        .await
    }

    /// Fetch every quality gate of the organization.
    pub async fn list_quality_gates(&self) -> Result<Vec<QualityGate>, ProviderError> {
        let response: ListResponse = self
            .get_json(
                "qualitygates/list",
                &[("organization", self.organization())],
            )
            .await?;
        Ok(response.qualitygates)
    }

    /// Fetch the quality gate currently selected for a project.
    pub async fn quality_gate_by_project(
        &self,
        project_key: &str,
    ) -> Result<QualityGate, ProviderError> {
        let response: GateByProjectResponse = self
            .get_json(
                "qualitygates/get_by_project",
                &[
                    ("organization", self.organization()),
                    ("project", project_key),
                ],
            )
            .await?;
        Ok(response.quality_gate)
    }
}
