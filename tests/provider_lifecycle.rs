use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sonarcloud_provider::api::Client;
use sonarcloud_provider::{Diagnostics, SonarCloudProvider};

const BRANCH_RESOURCE: &str = "sonarcloud_long_lived_branch";
const BRANCH_SETTING: &str = "sonar.branch.longLivedBranches.regex";

async fn configured_provider(server: &MockServer) -> SonarCloudProvider {
    let provider = SonarCloudProvider::new();
    let client = Client::with_base_url("my-org", "test-token", server.uri()).unwrap();
    provider.configure_with_client(client);
    provider
}

fn values_response(value: Option<&str>) -> ResponseTemplate {
    let settings = match value {
        Some(value) => json!([{ "key": BRANCH_SETTING, "value": value, "inherited": false }]),
        None => json!([]),
    };
    ResponseTemplate::new(200).set_body_json(json!({ "settings": settings }))
}

#[tokio::test]
async fn test_unconfigured_provider_performs_no_call() {
    let provider = SonarCloudProvider::new();

    let mut diags = Diagnostics::new();
    let state = provider
        .create(
            BRANCH_RESOURCE,
            &mut diags,
            json!({"project_key": "proj1", "value": "release-.*"}),
        )
        .await;

    assert!(state.is_none());
    assert!(diags.has_errors());
    assert_eq!(diags.as_slice()[0].summary, "Provider not configured");

    // Every operation fails the same way, data sources included.
    let mut diags = Diagnostics::new();
    assert!(provider
        .read(BRANCH_RESOURCE, &mut diags, json!({"project_key": "proj1", "value": "x"}))
        .await
        .is_none());
    assert_eq!(diags.as_slice()[0].summary, "Provider not configured");

    let mut diags = Diagnostics::new();
    assert!(provider
        .read_data_source("sonarcloud_projects", &mut diags, json!({}))
        .await
        .is_none());
    assert_eq!(diags.as_slice()[0].summary, "Provider not configured");
}

#[tokio::test]
async fn test_long_lived_branch_full_lifecycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/settings/set"))
        .and(header_exists("authorization"))
        .and(body_string_contains("component=proj1"))
        .and(body_string_contains("value=release-.*"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/settings/set"))
        .and(body_string_contains("component=proj1"))
        .and(body_string_contains("value=hotfix-.*"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Reads observe the pattern as set, then updated, then reset.
    Mock::given(method("GET"))
        .and(path("/settings/values"))
        .and(query_param("component", "proj1"))
        .and(query_param("keys", BRANCH_SETTING))
        .respond_with(values_response(Some("release-.*")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings/values"))
        .and(query_param("component", "proj1"))
        .respond_with(values_response(Some("hotfix-.*")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings/values"))
        .and(query_param("component", "proj1"))
        .respond_with(values_response(None))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/settings/reset"))
        .and(body_string_contains("component=proj1"))
        .and(body_string_contains("keys=sonar.branch.longLivedBranches.regex"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let provider = configured_provider(&server).await;

    // Create echoes the plan attributes.
    let mut diags = Diagnostics::new();
    let created = provider
        .create(
            BRANCH_RESOURCE,
            &mut diags,
            json!({"project_key": "proj1", "value": "release-.*"}),
        )
        .await
        .expect("create should return state");
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
    assert_eq!(created["project_key"], "proj1");
    assert_eq!(created["value"], "release-.*");

    // Read round-trips the created value.
    let mut diags = Diagnostics::new();
    let read = provider
        .read(BRANCH_RESOURCE, &mut diags, created.clone())
        .await
        .expect("read should return state");
    assert_eq!(read["value"], "release-.*");

    // Update overwrites the previous value (upsert semantics).
    let mut diags = Diagnostics::new();
    let updated = provider
        .update(
            BRANCH_RESOURCE,
            &mut diags,
            read.clone(),
            json!({"project_key": "proj1", "value": "hotfix-.*"}),
        )
        .await
        .expect("update should return state");
    assert_eq!(updated["value"], "hotfix-.*");

    let mut diags = Diagnostics::new();
    let read = provider
        .read(BRANCH_RESOURCE, &mut diags, updated.clone())
        .await
        .expect("read after update should return state");
    assert_eq!(read["value"], "hotfix-.*");

    // Delete resets the setting; a subsequent read is a not-found.
    let mut diags = Diagnostics::new();
    let deleted = provider.delete(BRANCH_RESOURCE, &mut diags, read).await;
    assert_eq!(deleted, Some(()));
    assert!(diags.is_empty());

    let mut diags = Diagnostics::new();
    let gone = provider
        .read(BRANCH_RESOURCE, &mut diags, updated)
        .await;
    assert!(gone.is_none());
    assert!(diags.has_errors());
    assert!(diags.as_slice()[0].summary.contains("not found"));
}

#[tokio::test]
async fn test_create_failure_records_diagnostic_with_raw_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/settings/set"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"errors": [{"msg": "Value is too long"}]})),
        )
        .mount(&server)
        .await;

    let provider = configured_provider(&server).await;

    let mut diags = Diagnostics::new();
    let state = provider
        .create(
            BRANCH_RESOURCE,
            &mut diags,
            json!({"project_key": "proj1", "value": "release-.*"}),
        )
        .await;

    // Best-effort state stays available alongside the error diagnostic.
    assert!(state.is_some());
    assert!(diags.has_errors());
    let diag = &diags.as_slice()[0];
    assert_eq!(diag.summary, "Could not set long lived branch pattern");
    assert!(diag.detail.as_deref().unwrap().contains("Value is too long"));
}

#[tokio::test]
async fn test_delete_failure_keeps_state() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/settings/reset"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"errors": [{"msg": "boom"}]})),
        )
        .mount(&server)
        .await;

    let provider = configured_provider(&server).await;

    let mut diags = Diagnostics::new();
    let deleted = provider
        .delete(
            BRANCH_RESOURCE,
            &mut diags,
            json!({"id": "proj1", "project_key": "proj1", "value": "release-.*"}),
        )
        .await;

    // None tells the caller to keep the resource in state.
    assert!(deleted.is_none());
    assert!(diags.has_errors());
    assert!(diags.as_slice()[0]
        .detail
        .as_deref()
        .unwrap()
        .contains("boom"));
}

#[tokio::test]
async fn test_project_key_length_rejected_before_any_call() {
    // No mock server: an over-long key must never reach the network.
    let provider = SonarCloudProvider::new();

    let diags = provider.validate_resource_config(
        BRANCH_RESOURCE,
        &json!({"project_key": "k".repeat(401), "value": "release-.*"}),
    );

    assert!(diags.has_errors());
    assert!(diags.as_slice()[0].summary.contains("Invalid length"));
}

#[tokio::test]
async fn test_webhook_create_and_update_in_place() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webhooks/create"))
        .and(body_string_contains("name=CI+hook"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "webhook": {"key": "wh-1", "name": "CI hook", "url": "https://ci.example.com/hook"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/webhooks/update"))
        .and(body_string_contains("webhook=wh-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let provider = configured_provider(&server).await;

    let mut diags = Diagnostics::new();
    let created = provider
        .create(
            "sonarcloud_webhook",
            &mut diags,
            json!({"name": "CI hook", "url": "https://ci.example.com/hook"}),
        )
        .await
        .expect("create should return state");
    assert!(diags.is_empty());
    assert_eq!(created["key"], "wh-1");

    let mut diags = Diagnostics::new();
    let updated = provider
        .update(
            "sonarcloud_webhook",
            &mut diags,
            created,
            json!({"name": "CI hook", "url": "https://ci.example.com/v2"}),
        )
        .await
        .expect("update should return state");
    assert!(diags.is_empty());
    assert_eq!(updated["key"], "wh-1");
    assert_eq!(updated["url"], "https://ci.example.com/v2");
}

#[tokio::test]
async fn test_user_groups_data_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user_groups/search"))
        .and(query_param("organization", "my-org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "groups": [
                {"id": 1, "name": "devs", "description": "Developers", "membersCount": 3, "default": false},
                {"id": 2, "name": "ops", "membersCount": 1, "default": true}
            ]
        })))
        .mount(&server)
        .await;

    let provider = configured_provider(&server).await;

    let mut diags = Diagnostics::new();
    let state = provider
        .read_data_source("sonarcloud_user_groups", &mut diags, json!({}))
        .await
        .expect("read should return state");

    assert!(diags.is_empty());
    let groups = state["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["name"], "devs");
    assert_eq!(groups[1]["default"], true);
}

#[tokio::test]
async fn test_group_permissions_update_fully_resends() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/permissions/remove_group"))
        .and(body_string_contains("groupName=devs"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/permissions/add_group"))
        .and(body_string_contains("groupName=devs"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;

    let provider = configured_provider(&server).await;

    let mut diags = Diagnostics::new();
    let updated = provider
        .update(
            "sonarcloud_user_group_permissions",
            &mut diags,
            json!({"name": "devs", "permissions": ["provisioning"]}),
            json!({"name": "devs", "permissions": ["provisioning", "scan"]}),
        )
        .await
        .expect("update should return state");

    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
    assert_eq!(
        updated["permissions"],
        json!(["provisioning", "scan"])
    );
}
