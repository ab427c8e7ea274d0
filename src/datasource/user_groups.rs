//! The user groups of the organization.

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
pub const TYPE_NAME: &str = "sonarcloud_user_groups";

/// Schema of the `sonarcloud_user_groups` data source.
pub fn schema() -> Schema {
    let element = HashMap::from([
        ("id".to_string(), AttributeType::String),
        ("name".to_string(), AttributeType::String),
        ("description".to_string(), AttributeType::String),
        ("members_count".to_string(), AttributeType::Int64),
        ("default".to_string(), AttributeType::Bool),
    ]);

    Schema::v0()
        .with_attribute(
            "search",
            Attribute::optional_string()
                .with_description("Filter the groups by a search query."),
        )
        .with_attribute(
            "groups",
            Attribute::computed_object_list(element)
                .with_description("The user groups of the organization."),
        )
}

#[derive(Debug, Deserialize)]
struct UserGroupsConfig {
    #[serde(default)]
    search: Option<String>,
}

/// Lists the user groups of the organization.
#[derive(Debug)]
pub struct UserGroupsDataSource {
    cfg: Arc<ProviderConfig>,
}

impl UserGroupsDataSource {
    /// Create the data source handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl DataSourceOps for UserGroupsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn read(&self, diags: &mut Diagnostics, config: Value) -> Option<Value> {
        let config: UserGroupsConfig = decode(diags, "user groups query", config)?;

        let groups = match self
            .cfg
            .client()
            .list_user_groups(config.search.as_deref())
            .await
        {
            Ok(groups) => groups,
            Err(err) => {
                diags.add_error(
                    "Could not list user groups",
                    format!("The Search request returned an error: {}", err),
                );
                return None;
            }
        };

        let groups: Vec<Value> = groups
            .into_iter()
            .map(|g| {
                json!({
                    "id": g.id.to_string(),
                    "name": g.name,
                    "description": g.description,
                    "members_count": g.members_count,
                    "default": g.default,
                })
            })
            .collect();

        Some(json!({ "search": config.search, "groups": groups }))
    }
}
