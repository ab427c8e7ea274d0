//! User token endpoints (`api/user_tokens/*`).
//!
//! The token value is only returned by `generate`; subsequent reads can
//! observe a token's existence and creation date but never its value.

use serde::Deserialize;

use super::Client;
use crate::error::ProviderError;

/// The response of `api/user_tokens/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedToken {
    /// Login the token belongs to.
    pub login: String,
    /// Token name, unique per user.
    pub name: String,
    /// The token value. Shown exactly once.
    pub token: String,
}

/// A token as returned by `api/user_tokens/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserToken {
    /// Token name.
    pub name: String,
    /// Creation timestamp.
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, rename = "userTokens")]
    user_tokens: Vec<UserToken>,
}

impl Client {
    /// Generate a token for a user.
    pub async fn generate_user_token(
        &self,
        login: &str,
        name: &str,
    ) -> Result<GeneratedToken, ProviderError> {
        self.post_json("user_tokens/generate", &[("login", login), ("name", name)])
            .await
    }

    /// Revoke a user's token by name.
    pub async fn revoke_user_token(&self, login: &str, name: &str) -> Result<(), ProviderError> {
        self.post_form("user_tokens/revoke", &[("login", login), ("name", name)])
            .await
    }

    /// Look up a user's token by name.
    pub async fn find_user_token(
        &self,
        login: &str,
        name: &str,
    ) -> Result<Option<UserToken>, ProviderError> {
        let response: SearchResponse = self
            .get_json("user_tokens/search", &[("login", login)])
            .await?;
        Ok(response.user_tokens.into_iter().find(|t| t.name == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_decoding() {
        let body = r#"{"login":"alice","userTokens":[{"name":"ci-token","createdAt":"2023-04-01T12:00:00+0000"}]}"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.user_tokens.len(), 1);
        assert_eq!(response.user_tokens[0].name, "ci-token");
    }
}
