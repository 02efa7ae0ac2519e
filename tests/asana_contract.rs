//! Asana client and Sheets feed wire format, checked against a mock server.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskkeeper::asana::{
    AsanaClient, AsanaErrorKind, Membership, NewTask, TaskFilter, TaskStore, TaskUpdate,
};
use taskkeeper::recurrence::{RecurrenceFeed, RecurrenceRecord, SheetFeed};

#[tokio::test]
async fn test_find_workspaces_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"gid": "111", "name": "Home", "resource_type": "workspace"},
                {"gid": "222", "name": "Work", "resource_type": "workspace"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    let workspaces = client.find_workspaces().await.unwrap();

    assert_eq!(workspaces.len(), 2);
    assert_eq!(workspaces[0].id, "111");
    assert_eq!(workspaces[1].name, "Work");
}

#[tokio::test]
async fn test_find_tasks_filters_by_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("project", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"gid": "1", "name": "Fix gutter", "completed": false, "due_on": "2024-03-08"},
                {"gid": "2", "name": "Someday", "completed": false, "due_on": null},
                {"gid": "3", "name": "Done"}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    let tasks = client.find_tasks(&TaskFilter::project("p1")).await.unwrap();

    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].due_on.as_deref(), Some("2024-03-08"));
    assert_eq!(tasks[1].due_on, None);
    assert!(!tasks[2].completed);
}

#[tokio::test]
async fn test_create_task_wraps_body_in_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "data": {
                "name": "Feed cat",
                "workspace": "w1",
                "memberships": [{"project": "p1", "section": "s1"}],
                "due_on": "2024-03-19",
                "assignee": "u1"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"gid": "99", "name": "Feed cat", "completed": false, "due_on": "2024-03-19"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    let task = NewTask {
        name: "Feed cat".to_string(),
        workspace: "w1".to_string(),
        projects: Vec::new(),
        memberships: vec![Membership {
            project: "p1".to_string(),
            section: "s1".to_string(),
        }],
        due_on: Some("2024-03-19".to_string()),
        assignee: Some("u1".to_string()),
    };

    let created = client.create_task(&task).await.unwrap();

    assert_eq!(created.id, "99");
}

#[tokio::test]
async fn test_update_task_sends_only_changed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/tasks/42"))
        .and(body_json(json!({"data": {"due_on": "2024-03-19"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"gid": "42", "name": "Fix gutter", "due_on": "2024-03-19"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    let updated = client
        .update_task("42", &TaskUpdate::due_on("2024-03-19"))
        .await
        .unwrap();

    assert_eq!(updated.due_on.as_deref(), Some("2024-03-19"));
}

#[tokio::test]
async fn test_delete_task() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tasks/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    client.delete_task("42").await.unwrap();
}

#[tokio::test]
async fn test_error_body_is_mapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"message": "task: Unknown object: 404"}]
        })))
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    let err = client.get_task("404").await.unwrap_err();

    assert_eq!(err.kind, AsanaErrorKind::NotFound);
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "task: Unknown object: 404");
}

#[tokio::test]
async fn test_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Not Authorized"))
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("bad", &mock_server.uri());
    let err = client.find_workspaces().await.unwrap_err();

    assert_eq!(err.kind, AsanaErrorKind::Unauthorized);
    assert_eq!(err.message, "Not Authorized");
}

#[tokio::test]
async fn test_malformed_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/p1/sections"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = AsanaClient::with_base_url("secret", &mock_server.uri());
    let err = client.find_sections("p1").await.unwrap_err();

    assert_eq!(err.kind, AsanaErrorKind::Parse);
}

#[tokio::test]
async fn test_sheet_feed_reads_values_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/spreadsheets/sheet-1/values/Tasks%21A1%3AE"))
        .and(query_param("key", "api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Tasks!A1:E100",
            "majorDimension": "ROWS",
            "values": [
                ["Task", "Section", "Owner", "Frequency", "Day"],
                ["Feed cat", "Pets", "Sam", "DAILY"],
                ["Take out bins", "House", "Alex", "WEEKLY", "TUESDAY"]
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let feed = SheetFeed::new("sheet-1", "Tasks!A1:E", "api-key").with_base_url(mock_server.uri());
    let records = feed.records().await.unwrap();

    assert_eq!(
        records,
        vec![
            RecurrenceRecord::daily("Feed cat", "Pets", "Sam"),
            RecurrenceRecord::weekly("Take out bins", "House", "Alex", "TUESDAY"),
        ]
    );
}
