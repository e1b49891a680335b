//! Controller driven against the HTTP client and a mock endpoint.

mod common;

use common::{FormField, action, client_for};
use serde_json::json;
use tasklist::controller::{Controller, View};
use tasklist::runtime::drive;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn logged_in_alice(server: &MockServer) -> (Controller, tasklist::client::ScriptClient) {
    Mock::given(method("POST"))
        .and(action("login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "username": "alice",
            "userId": "42"
        })))
        .mount(server)
        .await;

    let client = client_for(server);
    let mut controller = Controller::new();
    controller.auth_form_mut().username = "alice".to_string();
    controller.auth_form_mut().password = "x".to_string().into();
    let effect = controller.submit_login();
    drive(&mut controller, &client, effect).await;
    (controller, client)
}

#[tokio::test]
async fn login_then_add_then_complete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(action("getTasks"))
        .and(FormField("userId", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": []
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, client) = logged_in_alice(&server).await;
    assert_eq!(controller.view(), View::Tasks);
    assert_eq!(controller.session().unwrap().username(), "alice");
    assert!(controller.tasks().is_empty());

    Mock::given(method("POST"))
        .and(action("addTask"))
        .and(FormField("userId", "42"))
        .and(FormField("task", "buy milk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "task": {"taskId": "7", "task": "buy milk", "completed": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    *controller.draft_mut() = "buy milk".to_string();
    let effect = controller.submit_new_task();
    drive(&mut controller, &client, effect).await;

    assert_eq!(controller.draft(), "");
    assert_eq!(controller.tasks().len(), 1);
    assert_eq!(controller.tasks().items()[0].toggle_label(), "Complete");

    Mock::given(method("POST"))
        .and(action("updateTask"))
        .and(FormField("taskId", "7"))
        .and(FormField("completed", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(action("getTasks"))
        .and(FormField("userId", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tasks": [{"taskId": "7", "task": "buy milk", "completed": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let effect = controller.toggle_task(&"7".into());
    drive(&mut controller, &client, effect).await;

    let item = controller.tasks().get(&"7".into()).unwrap();
    assert!(item.completed);
    assert_eq!(item.toggle_label(), "Uncomplete");
    assert!(controller.alert().is_none());
}

#[tokio::test]
async fn failed_login_stays_on_auth_view_without_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(action("login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "Invalid username or password."
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(action("getTasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "tasks": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut controller = Controller::new();
    controller.auth_form_mut().username = "alice".to_string();
    controller.auth_form_mut().password = "nope".to_string().into();
    let effect = controller.submit_login();
    drive(&mut controller, &client, effect).await;

    assert_eq!(controller.view(), View::Auth);
    assert!(controller.session().is_none());
    assert_eq!(
        controller.alert().unwrap().message,
        "Invalid username or password."
    );
}
