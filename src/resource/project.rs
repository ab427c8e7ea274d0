//! A SonarCloud project.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_project";

/// Schema of the `sonarcloud_project` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("id", Attribute::computed_string())
        .with_attribute(
            "project",
            Attribute::required_string()
                .with_description("The key of the project, unique within the organization.")
                .with_length_between(1, 400)
                .with_force_new(),
        )
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The display name of the project.")
                .with_force_new(),
        )
        .with_attribute(
            "visibility",
            Attribute::optional_string()
                .with_description("Whether the project is publicly visible.")
                .with_one_of(["public", "private"]),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectState {
    #[serde(default)]
    id: Option<String>,
    project: String,
    name: String,
    #[serde(default)]
    visibility: Option<String>,
}

/// Manages a project in the organization.
#[derive(Debug)]
pub struct ProjectResource {
    cfg: Arc<ProviderConfig>,
}

impl ProjectResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ResourceOps for ProjectResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: ProjectState = decode(diags, "project", plan)?;

        let created = self
            .cfg
            .client()
            .create_project(&plan.project, &plan.name, plan.visibility.as_deref())
            .await;

        match created {
            Ok(project) => {
                let state = ProjectState {
                    id: Some(project.key.clone()),
                    project: project.key,
                    name: project.name,
                    visibility: project.visibility.or(plan.visibility),
                };
                encode(diags, "project", &state)
            }
            Err(err) => {
                diags.add_error(
                    "Could not create project",
                    format!("The Create request returned an error: {}", err),
                );
                None
            }
        }
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: ProjectState = decode(diags, "project", state)?;

        match self.cfg.client().find_project(&state.project).await {
            Ok(Some(project)) => {
                let state = ProjectState {
                    id: Some(project.key.clone()),
                    project: project.key,
                    name: project.name,
                    visibility: project.visibility.or(state.visibility),
                };
                encode(diags, "project", &state)
            }
            Ok(None) => {
                diags.add_error(
                    "Project not found",
                    format!("No project with key '{}' exists", state.project),
                );
                None
            }
            Err(err) => {
                diags.add_error(
                    "Could not read project",
                    format!("The Search request returned an error: {}", err),
                );
                None
            }
        }
    }

    // Only visibility can change in place; key and name force replacement.
    async fn update(&self, diags: &mut Diagnostics, _state: Value, plan: Value) -> Option<Value> {
        let plan: ProjectState = decode(diags, "project", plan)?;

        if let Some(visibility) = plan.visibility.as_deref() {
            if let Err(err) = self
                .cfg
                .client()
                .update_project_visibility(&plan.project, visibility)
                .await
            {
                diags.add_error(
                    "Could not update project",
                    format!("The UpdateVisibility request returned an error: {}", err),
                );
                return None;
            }
        }

        let state = ProjectState {
            id: Some(plan.project.clone()),
            ..plan
        };
        encode(diags, "project", &state)
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: ProjectState = decode(diags, "project", state)?;

        if let Err(err) = self.cfg.client().delete_project(&state.project).await {
            diags.add_error(
                "Could not delete project",
                format!("The Delete request returned an error: {}", err),
            );
            return None;
        }

        Some(())
    }
}
