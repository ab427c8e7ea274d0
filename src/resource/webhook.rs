//! A webhook called on analysis completion.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode, encode, ResourceOps};
use crate::provider::ProviderConfig;
use crate::schema::{Attribute, Diagnostics, Schema};

/// The resource type name.
pub const TYPE_NAME: &str = "sonarcloud_webhook";

/// Schema of the `sonarcloud_webhook` resource.
pub fn schema() -> Schema {
    Schema::v0()
        .with_attribute("key", Attribute::computed_string())
        .with_attribute(
            "name",
            Attribute::required_string()
                .with_description("The display name of the webhook.")
                .with_length_between(1, 100),
        )
        .with_attribute(
            "url",
            Attribute::required_string()
                .with_description("The URL called on analysis completion."),
        )
        .with_attribute(
            "project_key",
            Attribute::optional_string()
                .with_description(
                    "The key of the project the webhook belongs to. Leave empty for an \
                     organization-wide webhook.",
                )
                .with_force_new(),
        )
        .with_attribute(
            "secret",
            Attribute::optional_string()
                .sensitive()
                .with_description("Secret used to sign webhook payloads."),
        )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WebhookState {
    #[serde(default)]
    key: Option<String>,
    name: String,
    url: String,
    #[serde(default)]
    project_key: Option<String>,
    #[serde(default)]
    secret: Option<String>,
}

impl WebhookState {
    fn scope(&self) -> Option<&str> {
        self.project_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Manages a webhook at organization or project scope.
#[derive(Debug)]
pub struct WebhookResource {
    cfg: Arc<ProviderConfig>,
}

impl WebhookResource {
    /// Create the resource handler with its provider configuration.
    pub fn new(cfg: Arc<ProviderConfig>) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ResourceOps for WebhookResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(&self, diags: &mut Diagnostics, plan: Value) -> Option<Value> {
        let plan: WebhookState = decode(diags, "webhook", plan)?;

        let created = self
            .cfg
            .client()
            .create_webhook(&plan.name, &plan.url, plan.scope(), plan.secret.as_deref())
            .await;

        match created {
            Ok(webhook) => {
                let state = WebhookState {
                    key: Some(webhook.key),
                    name: webhook.name,
                    url: webhook.url,
                    ..plan
                };
                encode(diags, "webhook", &state)
            }
            Err(err) => {
                diags.add_error(
                    "Could not create webhook",
                    format!("The Create request returned an error: {}", err),
                );
                None
            }
        }
    }

    async fn read(&self, diags: &mut Diagnostics, state: Value) -> Option<Value> {
        let state: WebhookState = decode(diags, "webhook", state)?;

        let webhooks = match self.cfg.client().list_webhooks(state.scope()).await {
            Ok(webhooks) => webhooks,
            Err(err) => {
                diags.add_error(
                    "Could not read webhook",
                    format!("The List request returned an error: {}", err),
                );
                return None;
            }
        };

        let found = match state.key.as_deref() {
            Some(key) => webhooks.into_iter().find(|w| w.key == key),
            None => webhooks.into_iter().find(|w| w.name == state.name),
        };

        let Some(webhook) = found else {
            diags.add_error(
                "Webhook not found",
                format!("No webhook named '{}' exists in this scope", state.name),
            );
            return None;
        };

        let state = WebhookState {
            key: Some(webhook.key),
            name: webhook.name,
            url: webhook.url,
            ..state
        };
        encode(diags, "webhook", &state)
    }

    // Webhooks carry a server-side key, so name, URL and secret can change
    // in place.
    async fn update(&self, diags: &mut Diagnostics, state: Value, plan: Value) -> Option<Value> {
        let state: WebhookState = decode(diags, "webhook", state)?;
        let plan: WebhookState = decode(diags, "webhook", plan)?;

        let Some(key) = state.key.as_deref() else {
            diags.add_error(
                "Could not update webhook",
                "The tracked state carries no webhook key",
            );
            return None;
        };

        if let Err(err) = self
            .cfg
            .client()
            .update_webhook(key, &plan.name, &plan.url, plan.secret.as_deref())
            .await
        {
            diags.add_error(
                "Could not update webhook",
                format!("The Update request returned an error: {}", err),
            );
            return None;
        }

        let state = WebhookState {
            key: state.key,
            ..plan
        };
        encode(diags, "webhook", &state)
    }

    async fn delete(&self, diags: &mut Diagnostics, state: Value) -> Option<()> {
        let state: WebhookState = decode(diags, "webhook", state)?;

        let Some(key) = state.key.as_deref() else {
            diags.add_error(
                "Could not delete webhook",
                "The tracked state carries no webhook key",
            );
            return None;
        };

        if let Err(err) = self.cfg.client().delete_webhook(key).await {
            diags.add_error(
                "Could not delete webhook",
                format!("The Delete request returned an error: {}", err),
            );
            return None;
        }

        Some(())
    }
}
