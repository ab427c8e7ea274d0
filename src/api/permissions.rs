//! Permission endpoints (`api/permissions/*`).
//!
//! Permissions are granted and revoked one at a time, scoped either to the
//! organization (global) or to a single project via `projectKey`.

use serde::Deserialize;

use super::Client;
use crate::error::ProviderError;

/// Permissions grantable at organization scope.
pub const GLOBAL_PERMISSIONS: &[&str] =
    &["admin", "profileadmin", "gateadmin", "scan", "provisioning"];

/// Permissions grantable at project scope.
pub const PROJECT_PERMISSIONS: &[&str] = &[
    "admin",
    "codeviewer",
    "issueadmin",
    "securityhotspotadmin",
    "scan",
    "user",
];

/// A group together with its granted permissions.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupPermissions {
    /// Group name.
    pub name: String,
    /// Group description.
    #[serde(default)]
    pub description: Option<String>,
    /// Permissions granted in the queried scope.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// A user together with their granted permissions.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPermissions {
    /// User login.
    pub login: String,
    /// User display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Permissions granted in the queried scope.
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GroupsResponse {
    #[serde(default)]
    groups: Vec<GroupPermissions>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<UserPermissions>,
}

impl Client {
    /// Grant a permission to a group, globally or on a project.
    pub async fn add_group_permission(
        &self,
        group: &str,
        permission: &str,
        project_key: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut params = vec![
            ("organization", self.organization()),
            ("groupName", group),
            ("permission", permission),
        ];
        if let Some(project_key) = project_key {
            params.push(("projectKey", project_key));
        }

        self.post_form("permissions/add_group", &params).await
    }

    /// Revoke a permission from a group, globally or on a project.
    pub async fn remove_group_permission(
        &self,
        group: &str,
        permission: &str,
        project_key: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut params = vec![
            ("organization", self.organization()),
            ("groupName", group),
            ("permission", permission),
        ];
        if let Some(project_key) = project_key {
            params.push(("projectKey", project_key));
        }

        self.post_form("permissions/remove_group", &params).await
    }

    /// Grant a permission to a user, globally or on a project.
    pub async fn add_user_permission(
        &self,
        login: &str,
        permission: &str,
        project_key: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut params = vec![
            ("organization", self.organization()),
            ("login", login),
            ("permission", permission),
        ];
        if let Some(project_key) = project_key {
            params.push(("projectKey", project_key));
        }

        self.post_form("permissions/add_user", &params).await
    }

    /// Revoke a permission from a user, globally or on a project.
    pub async fn remove_user_permission(
        &self,
        login: &str,
        permission: &str,
        project_key: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut params = vec![
            ("organization", self.organization()),
            ("login", login),
            ("permission", permission),
        ];
        if let Some(project_key) = project_key {
            params.push(("projectKey", project_key));
        }

        self.post_form("permissions/remove_user", &params).await
    }

    /// Fetch the groups holding permissions in a scope, filtered by name.
    pub async fn find_group_permissions(
        &self,
        group: &str,
        project_key: Option<&str>,
    ) -> Result<Option<GroupPermissions>, ProviderError> {
        let mut params = vec![("organization", self.organization()), ("q", group)];
        if let Some(project_key) = project_key {
            params.push(("projectKey", project_key));
        }

        let response: GroupsResponse = self.get_json("permissions/groups", &params).await?;
        Ok(response.groups.into_iter().find(|g| g.name == group))
    }

    /// Fetch the users holding permissions in a scope, filtered by login.
    pub async fn find_user_permissions(
        &self,
        login: &str,
        project_key: Option<&str>,
    ) -> Result<Option<UserPermissions>, ProviderError> {
        let mut params = vec![("organization", self.organization()), ("q", login)];
        if let Some(project_key) = project_key {
            params.push(("projectKey", project_key));
        }

        let response: UsersResponse = self.get_json("permissions/users", &params).await?;
        Ok(response.users.into_iter().find(|u| u.login == login))
    }
}
