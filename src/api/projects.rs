//! Project endpoints (`api/projects/*`).

use serde::Deserialize;

use super::{Client, Paging};
use crate::error::ProviderError;

/// A project as returned by the projects endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project key, unique within the organization.
    pub key: String,
    /// Display name.
    pub name: String,
    /// `public` or `private`.
    #[serde(default)]
    pub visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    project: Project,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    paging: Paging,
    #[serde(default)]
    components: Vec<Project>,
}

impl Client {
    /// Create a project in the organization.
    pub async fn create_project(
        &self,
        key: &str,
        name: &str,
        visibility: Option<&str>,
    ) -> Result<Project, ProviderError> {
        let mut params = vec![
            ("organization", self.organization()),
            ("project", key),
            ("name", name),
        ];
        if let Some(visibility) = visibility {
            params.push(("visibility", visibility));
        }

        let response: CreateResponse = self.post_json("projects/create", &params).await?;
        Ok(response.project)
    }

    /// Delete a project by key.
    pub async fn delete_project(&self, key: &str) -> Result<(), ProviderError> {
        self.post_form("projects/delete", &[("project", key)]).await
    }

    /// Change a project's visibility.
    pub async fn update_project_visibility(
        &self,
        key: &str,
        visibility: &str,
    ) -> Result<(), ProviderError> {
        self.post_form(
            "projects/update_visibility",
            &[("project", key), ("visibility", visibility)],
        )
        .await
    }

    /// Look up a single project by key.
    pub async fn find_project(&self, key: &str) -> Result<Option<Project>, ProviderError> {
        let response: SearchResponse = self
            .get_json(
                "projects/search",
                &[("organization", self.organization()), ("projects", key)],
            )
            .await?;
        Ok(response.components.into_iter().find(|p| p.key == key))
    }

    /// Fetch every project in the organization, following pagination.
    pub async fn list_projects(&self) -> Result<Vec<Project>, ProviderError> {
        let mut projects = Vec::new();
        let mut page = 1u32;

        loop {
            let page_param = page.to_string();
            let response: SearchResponse = self
                .get_json(
                    "projects/search",
                    &[
                        ("organization", self.organization()),
                        ("p", &page_param),
                        ("ps", "100"),
                    ],
                )
                .await?;

            projects.extend(response.components);

            if !response.paging.has_more() {
                break;
            }
            page += 1;
        }

        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_decoding() {
        let body = r#"{
            "paging": {"pageIndex": 1, "pageSize": 100, "total": 1},
            "components": [{"key": "proj1", "name": "Project One", "visibility": "public"}]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.components.len(), 1);
        assert_eq!(response.components[0].key, "proj1");
        assert!(!response.paging.has_more());
    }
}
