use picker_core::{KeyCode, KeyEvent, PickerConfig, PickerController, RemoteConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_picker(server: &MockServer, results_path: &str) -> PickerController {
    let remote = RemoteConfig::new(format!("{}/search/people", server.uri()))
        .search_key("Q")
        .results_path(results_path)
        .extra_param("limit", 3)
        .extra_param("type", "Client");
    let config = PickerConfig::builder()
        .model("profiles")
        .multiple(true)
        .remote(remote)
        .build();
    PickerController::new(config)
}

async fn search(picker: &mut PickerController, query: &str) {
    picker.set_query(query);
    let code = query.chars().last().map_or(KeyCode::Backspace, KeyCode::Char);
    let outcome = picker.handle_key(KeyEvent::release(code));
    picker.settle(outcome.task).await;
}

fn labels(picker: &PickerController) -> Vec<String> {
    picker
        .choices()
        .iter()
        .map(|item| picker.label(item))
        .collect()
}

#[tokio::test]
async fn test_remote_results_under_nested_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/people"))
        .and(query_param("Q", "bob"))
        .and(query_param("limit", "3"))
        .and(query_param("type", "Client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": {
                "matches": [
                    {"name": "Bob Gobbs", "id": 4444},
                    {"name": "Bob Flobbs", "id": 99994}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut picker = remote_picker(&server, "results.matches");
    search(&mut picker, "bob").await;

    assert!(picker.is_showing_results());
    assert_eq!(labels(&picker), ["Bob Gobbs", "Bob Flobbs"]);

    picker.handle_key(KeyEvent::press(KeyCode::Enter));
    assert_eq!(picker.selections(), ["4444"]);
}

#[tokio::test]
async fn test_remote_excludes_picked_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/people"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "Bob Gobbs", "id": 4444},
            {"name": "Bob Flobbs", "id": 99994}
        ])))
        .mount(&server)
        .await;

    let mut picker = remote_picker(&server, "");
    search(&mut picker, "bob").await;
    picker.handle_key(KeyEvent::press(KeyCode::Enter));

    search(&mut picker, "bob").await;
    assert_eq!(labels(&picker), ["Bob Flobbs"]);
}

#[tokio::test]
async fn test_server_error_keeps_previous_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("Q", "bob"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"name": "Bob Gobbs", "id": 4444}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("Q", "bobx"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut picker = remote_picker(&server, "");
    search(&mut picker, "bob").await;
    search(&mut picker, "bobx").await;

    assert!(!picker.is_busy());
    assert_eq!(labels(&picker), ["Bob Gobbs"]);
}

#[tokio::test]
async fn test_wrong_results_path_keeps_previous_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let mut picker = remote_picker(&server, "results.matches");
    search(&mut picker, "bob").await;

    assert!(!picker.is_busy());
    assert!(!picker.is_showing_results());
    assert!(picker.choices().is_empty());
}
