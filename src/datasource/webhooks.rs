//! The webhooks of the organization or of a project.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::DataSourceOps;
use crate::provider::ProviderConfig;
use crate::resource::decode;
use crate::schema::{Attribute, AttributeType, Diagnostics, Schema};

/// The data source type name.
pub const TYPE_NAME: &str = "sonarcloud_webhooks";

/// Schema of the `sonarcloud_webhooks` data source.
pub fn schema() -> Schema {
    let element = HashMap::from([
        ("key".to_string(), AttributeType::String),
        ("name".to_string(), AttributeType::String),
        ("url".to_string(), AttributeType::String),
    ]);

    Schema::v0()
        .with_attribute(
            "project_key",
            Attribute::optional_string().with_description(
                "The key of the project to list webhooks for. Leave empty for the \
                 organization-wide webhooks.",
            ),
        )
        .with_attribute(
            "webhooks",
            Attribute::computed_object_list(element)
                .with_description("The webhooks of the queried scope."),
        )
}

#[derive(Debug, Deserialize)]
struct WebhooksConfig {
    #[serde(default)]
    project_key: Option<String>,
}

/// Lists the webhooks of a scope.
#[derive(Debug)]
pub struct WebhooksDataSource {
    cfg: Arc<ProviderConfig>,
}

impl WebhooksDataSource {
    /// Create the data source handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl DataSourceOps for WebhooksDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, diags: &mut Diagnostics, config: Value) -> Option<Value> {
        let config: WebhooksConfig = decode(diags, "webhooks query", config)?;
        let scope = config.project_key.as_deref().filter(|k| !k.is_empty());

        let webhooks = match self.cfg.client().list_webhooks(scope).await {
            Ok(webhooks) => webhooks,
            Err(err) => {
                diags.add_error(
                    "Could not list webhooks",
                    format!("The List request returned an error: {}", err),
                );
                return None;
            }
        };

        let webhooks: Vec<Value> = webhooks
            .into_iter()
            .map(|w| {
                json!({
                    "key": w.key,
                    "name": w.name,
                    "url": w.url,
                })
            })
            .collect();

        Some(json!({ "project_key": config.project_key, "webhooks": webhooks }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_shape() {
        let schema = schema();
        assert!(schema.attributes["project_key"].flags.optional);
        assert!(schema.attributes["webhooks"].flags.computed);
    }
}
