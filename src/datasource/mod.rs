//! Data source implementations, one module per query surface.
//!
//! A data source is the read-only half of the resource contract: a single
//! operation that issues one lookup and maps the result into a list
//! attribute.

pub mod projects;
pub mod quality_gates;
pub mod user_groups;
pub mod webhooks;

use async_trait::async_trait;
use serde_json::Value;

use crate::schema::{Diagnostics, Schema};

/// The single-operation contract every data source implements.
#[async_trait]
pub trait DataSourceOps: Send + Sync {
    /// The data source type name, e.g. `sonarcloud_projects`.
    fn type_name(&self) -> &'static str;

    /// The schema of this data source.
    fn schema(&self) -> Schema;

    /// Read the data source with the given configuration. A `None` result
    /// means the lookup failed and recorded why in `diags`.
    async fn read(&self, diags: &mut Diagnostics, config: Value) -> Option<Value>;
}
