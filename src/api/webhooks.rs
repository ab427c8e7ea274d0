//! Webhook endpoints (`api/webhooks/*`).

use serde::Deserialize;

use super::Client;
use crate::error::ProviderError;

/// A webhook as returned by the webhook endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    /// Webhook key, assigned by the server on creation.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Target URL called on analysis completion.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    webhook: Webhook,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    webhooks: Vec<Webhook>,
}

impl Client {
    /// Create a webhook at organization scope, or on a project.
    pub async fn create_webhook(
        &self,
        name: &str,
        url: &str,
        project_key: Option<&str>,
        secret: Option<&str>,
    ) -> Result<Webhook, ProviderError> {
        let mut params = vec![
            ("organization", self.organization()),
            ("name", name),
            ("url", url),
        ];
        if let Some(project_key) = project_key {
            params.push(("project", project_key));
        }
        if let Some(secret) = secret {
            params.push(("secret", secret));
        }

        let response: CreateResponse = self.post_json("webhooks/create", &params).await?;
        Ok(response.webhook)
    }

    /// Update a webhook's name, URL and secret.
    pub async fn update_webhook(
        &self,
        key: &str,
        name: &str,
        url: &str,
        secret: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut params = vec![("webhook", key), ("name", name), ("url", url)];
        if let Some(secret) = secret {
            params.push(("secret", secret));
        }

        self.post_form("webhooks/update", &params).await
    }

    /// Delete a webhook by key.
    pub async fn delete_webhook(&self, key: &str) -> Result<(), ProviderError> {
        self.post_form("webhooks/delete", &[("webhook", key)]).await
    }

    /// Fetch the webhooks of the organization, or of a project.
    pub async fn list_webhooks(
        &self,
        project_key: Option<&str>,
    ) -> Result<Vec<Webhook>, ProviderError> {
        let mut params = vec![("organization", self.organization())];
        if let Some(project_key) = project_key {
            params.push(("project", project_key));
        }

        let response: ListResponse = self.get_json("webhooks/list", &params).await?;
        Ok(response.webhooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_decoding() {
        let body = r#"{"webhooks":[{"key":"wh-1","name":"CI hook","url":"https://ci.example.com/hook"}]}"#;
        let response: ListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.webhooks.len(), 1);
        assert_eq!(response.webhooks[0].key, "wh-1");
    }
}
