//! User group endpoints (`api/user_groups/*`).

use serde::Deserialize;

use super::Client;
use crate::error::ProviderError;

/// A user group as returned by the group endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct UserGroup {
    /// Group identifier.
    pub id: serde_json::Number,
    /// Group name, unique within the organization.
    pub name: String,
    /// Group description.
    #[serde(default)]
    pub description: Option<String>,
    /// Number of members.
    #[serde(default, rename = "membersCount")]
    pub members_count: u64,
    /// True when new organization members join this group automatically.
    #[serde(default)]
    pub default: bool,
}

/// A group member as returned by `api/user_groups/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMember {
    /// User login.
    pub login: String,
    /// User display name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    group: UserGroup,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    groups: Vec<UserGroup>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<GroupMember>,
}

impl Client {
    /// Create a user group.
    pub async fn create_user_group(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<UserGroup, ProviderError> {
        let mut params = vec![("organization", self.organization()), ("name", name)];
        if let Some(description) = description {
            params.push(("description", description));
        }

        let response: CreateResponse = self.post_json("user_groups/create", &params).await?;
        Ok(response.group)
    }

    /// Update a user group's name and description.
    pub async fn update_user_group(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut params = vec![("id", id), ("name", name)];
        if let Some(description) = description {
            params.push(("description", description));
        }

        self.post_form("user_groups/update", &params).await
    }

    /// Delete a user group by name.
    pub async fn delete_user_group(&self, name: &str) -> Result<(), ProviderError> {
        self.post_form(
            "user_groups/delete",
            &[("organization", self.organization()), ("name", name)],
        )
        .await
    }

    /// Look up a single user group by exact name.
    pub async fn find_user_group(&self, name: &str) -> Result<Option<UserGroup>, ProviderError> {
        let response: SearchResponse = self
            .get_json(
                "user_groups/search",
                &[("organization", self.organization()), ("q", name)],
            )
            .await?;
        Ok(response.groups.into_iter().find(|g| g.name == name))
    }

    /// Fetch the user groups of the organization, optionally filtered.
    pub async fn list_user_groups(&self, query: Option<&str>) -> Result<Vec<UserGroup>, ProviderError> {
        let mut params = vec![("organization", self.organization())];
        if let Some(query) = query {
            params.push(("q", query));
        }

        let response: SearchResponse = self.get_json("user_groups/search", &params).await?;
        Ok(response.groups)
    }

    /// Add a user to a group.
    pub async fn add_user_to_group(&self, group: &str, login: &str) -> Result<(), ProviderError> {
        self.post_form(
            "user_groups/add_user",
            &[
                ("organization", self.organization()),
                ("name", group),
                ("login", login),
            ],
        )
        .await
    }

    /// Remove a user from a group.
    pub async fn remove_user_from_group(
        &self,
        group: &str,
        login: &str,
    ) -> Result<(), ProviderError> {
        self.post_form(
            "user_groups/remove_user",
            &[
                ("organization", self.organization()),
                ("name", group),
                ("login", login),
            ],
        )
        .await
    }

    /// Fetch the members of a group.
    pub async fn list_group_members(&self, group: &str) -> Result<Vec<GroupMember>, ProviderError> {
        let response: UsersResponse = self
            .get_json(
                "user_groups/users",
                &[("organization", self.organization()), ("name", group)],
            )
            .await?;
        Ok(response.users)
    }
}
