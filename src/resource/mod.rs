//! Resource implementations, one module per SonarCloud entity type.
//!
//! Every resource follows the same shape: a flat state record mirroring
//! its schema attributes, and four operations that each issue one or two
//! API calls and translate failures into diagnostics. An API error is
//! recorded with a fixed summary and the raw error text as detail; it is
//! never retried or classified further.

pub mod long_lived_branch;
pub mod project;
pub mod quality_gate;
pub mod quality_gate_selection;
pub mod user_group;
pub mod user_group_member;
pub mod user_group_permissions;
pub mod user_permissions;
pub mod user_token;
pub mod webhook;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::schema::{Diagnostics, Schema};

/// The four-operation contract every resource implements.
///
/// Operations receive and return attribute bags (`serde_json::Value`)
/// matching the resource schema. A `None` result means the operation
/// failed and recorded why in `diags`; `create` may also return a
/// best-effort state alongside an error diagnostic so that partially
/// applied work stays tracked.
#[async_trait]
pub trait ResourceOps: Send + Sync {
    /// The resource type name, e.g. `sonarcloud_project`.
    fn type_name(&self) -> &'static str;

    /// The schema of this resource.
    fn schema(&self) -> Schema;

    /// Create the resource from its planned attributes.
    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value>;

    /// Read the current attributes, keyed by the identifying attributes in
    /// `state`. A missing entity is a "not found" diagnostic, never a fault.
    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value>;

    /// Update the resource to its planned attributes. The default is a
    /// typed unsupported-operation diagnostic for resources whose
    /// attributes all force replacement; upsert-style resources override
    /// this with a full re-send.
    async fn update(&self, diags: &mut Diagnostics, state: Value, plan: Value) -> Option<Value> {
        let _ = (state, plan);
        diags.add_error(
            "Unsupported operation",
            format!(
                "{} cannot be updated in place; changed attributes force replacement",
                self.type_name()
            ),
        );
        None
    }

    /// Delete the resource. The caller drops it from tracked state only
    /// when this returns `Some(())`.
    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()>;
}

/// Decode an attribute bag into a typed state record, recording a
/// diagnostic on mismatch.
pub(crate) fn decode<T: DeserializeOwned>(
    diags: &mut Diagnostics,
    what: &str,
    value: Value,
) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            diags.add_error(
                format!("Invalid {} attributes", what),
                format!("Could not decode the attribute bag: {}", err),
            );
            None
        }
    }
}

/// Encode a typed state record back into an attribute bag.
pub(crate) fn encode<T: Serialize>(diags: &mut Diagnostics, what: &str, state: &T) -> Option<Value> {
    match serde_json::to_value(state) {
        Ok(encoded) => Some(encoded),
        Err(err) => {
            diags.add_error(
                format!("Invalid {} state", what),
                format!("Could not encode the state record: {}", err),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Record {
        project_key: String,
        #[serde(default)]
        id: Option<String>,
    }

    #[test]
    fn test_decode_valid() {
        let mut diags = Diagnostics::new();
        let record: Option<Record> = decode(
            &mut diags,
            "branch pattern",
            serde_json::json!({"project_key": "proj1"}),
        );
        assert_eq!(
            record,
            Some(Record {
                project_key: "proj1".to_string(),
                id: None
            })
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn test_decode_invalid_records_diagnostic() {
        let mut diags = Diagnostics::new();
        let record: Option<Record> = decode(
            &mut diags,
            "branch pattern",
            serde_json::json!({"project_key": 42}),
        );
        assert!(record.is_none());
        assert!(diags.has_errors());
        assert!(diags.as_slice()[0]
            .summary
            .contains("Invalid branch pattern attributes"));
    }

    #[test]
    fn test_encode_round_trip() {
        let mut diags = Diagnostics::new();
        let record = Record {
            project_key: "proj1".to_string(),
            id: Some("proj1".to_string()),
        };
        let value = encode(&mut diags, "branch pattern", &record).unwrap();
        assert_eq!(value["project_key"], "proj1");
        assert_eq!(value["id"], "proj1");
    }
}
