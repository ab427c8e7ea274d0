//! Key/value settings endpoints (`api/settings/*`).
//!
//! Settings are upsert-based: `set` overwrites any previous value for the
//! key, `reset` restores the default, and `values` returns the current
//! values for a set of keys scoped to a component.

use serde::Deserialize;

use super::Client;
use crate::error::ProviderError;

/// Parameters for `api/settings/set`.
#[derive(Debug, Clone)]
pub struct SetRequest {
    /// Key of the project or entity the setting is scoped to.
    pub component: String,
    /// Setting key, e.g. `sonar.branch.longLivedBranches.regex`.
    pub key: String,
    /// Setting value.
    pub value: String,
}

/// A single setting as returned by `api/settings/values`.
#[derive(Debug, Clone, Deserialize)]
pub struct Setting {
    /// Setting key.
    pub key: String,
    /// Current value, absent when the setting holds no single value.
    #[serde(default)]
    pub value: Option<String>,
    /// True when the value is inherited rather than set on the component.
    #[serde(default)]
    pub inherited: bool,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    settings: Vec<Setting>,
}

impl Client {
    /// Set a setting value on a component.
    pub async fn set_setting(&self, request: &SetRequest) -> Result<(), ProviderError> {
        self.post_form(
            "settings/set",
            &[
                ("component", &request.component),
                ("key", &request.key),
                ("value", &request.value),
            ],
        )
        .await
    }

    /// Reset a setting on a component back to its default.
    pub async fn reset_setting(&self, component: &str, keys: &str) -> Result<(), ProviderError> {
        self.post_form("settings/reset", &[("component", component), ("keys", keys)])
            .await
    }

    /// Fetch the current values of the given setting keys on a component.
    pub async fn setting_values(
        &self,
        component: &str,
        keys: &str,
    ) -> Result<Vec<Setting>, ProviderError> {
        let response: ValuesResponse = self
            .get_json(
                "settings/values",
                &[("component", component), ("keys", keys)],
            )
            .await?;
        Ok(response.settings)
    }
}
