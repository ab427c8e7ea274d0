//! All projects of the organization.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::DataSourceOps;
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, AttributeType, Diagnostics, Schema};

/// The data source type name.
pub const TYPE_NAME: &str = "sonarcloud_projects";

/// Schema of the `sonarcloud_projects` data source.
pub fn schema() -> Schema {
    let element = HashMap::from([
        ("key".to_string(), AttributeType::String),
        ("name".to_string(), AttributeType::String),
        ("visibility".to_string(), AttributeType::String),
    ]);

    Schema::v0().with_attribute(
        "projects",
        Attribute::computed_object_list(element)
            .with_description("The projects of the organization."),
    )
}

/// Lists every project of the organization.
#[derive(Debug)]
pub struct ProjectsDataSource {
    cfg: Arc<ProviderConfig>,
}

impl ProjectsDataSource {
    /// Create the data source handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl DataSourceOps for ProjectsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, diags: &mut Diagnostics, _config: Value) -> Option<Value> {
        let projects = match self.cfg.client().list_projects().await {
            Ok(projects) => projects,
            Err(err) => {
                diags.add_error(
                    "Could not list projects",
                    format!("The Search request returned an error: {}", err),
                );
                return None;
            }
        };

        let projects: Vec<Value> = projects
            .into_iter()
            .map(|p| {
                json!({
                    "key": p.key,
                    "name": p.name,
                    "visibility": p.visibility,
                })
            })
            .collect();

        Some(json!({ "projects": projects }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        let attr = &schema.attributes["projects"];
        assert!(attr.flags.computed);
        assert!(matches!(attr.attr_type, AttributeType::List(_)));
    }
}
