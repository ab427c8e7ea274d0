//! The quality gates of the organization.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::DataSourceOps;
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, AttributeType, Diagnostics, Schema};

/// The data source type name.
pub const TYPE_NAME: &str = "sonarcloud_quality_gates";

/// Schema of the `sonarcloud_quality_gates` data source.
pub fn schema() -> Schema {
    let element = HashMap::from([
        ("id".to_string(), AttributeType::String),
        ("name".to_string(), AttributeType::String),
        ("is_default".to_string(), AttributeType::Bool),
        ("is_built_in".to_string(), AttributeType::Bool),
    ]);

    Schema::v0().with_attribute(
        "quality_gates",
        Attribute::computed_object_list(element)
            .with_description("The quality gates of the organization."),
    )
}

/// Lists every quality gate of the organization.
#[derive(Debug)]
pub struct QualityGatesDataSource {
    cfg: Arc<ProviderConfig>,
}

impl QualityGatesDataSource {
    /// Create the data source handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl DataSourceOps for QualityGatesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, diags: &mut Diagnostics, _config: Value) -> Option<Value> {
        let gates = match self.cfg.client().list_quality_gates().await {
            Ok(gates) => gates,
            Err(err) => {
                diags.add_error(
                    "Could not list quality gates",
                    format!("The List request returned an error: {}", err),
                );
                return None;
            }
        };

        let gates: Vec<Value> = gates
            .into_iter()
            .map(|g| {
                json!({
                    "id": g.id.to_string(),
                    "name": g.name,
                    "is_default": g.is_default,
                    "is_built_in": g.is_built_in,
                })
            })
            .collect();

        Some(json!({ "quality_gates": gates }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        assert!(schema.attributes["quality_gates"].flags.computed);
    }
}
