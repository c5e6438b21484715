// Copyright 2025 Felipe Torres González
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use crate::helpers::{CHAT, Call, TestApp, app, user_row};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use busbot::{
    buses::{Bus, BusCatalog},
    configuration::ApplicationSettings,
    endpoints::{WebServerState, app_router},
    errors::StoreError,
};
use chrono::{TimeDelta, Utc};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use rstest::rstest;
use secrecy::SecretString;
use serde_json::{Value, json};
use teloxide::types::{ChatAction, MessageId};
use tower::ServiceExt;

fn settings() -> ApplicationSettings {
    ApplicationSettings {
        api_token: SecretString::from("123:abc".to_owned()),
        http_server_host: "127.0.0.1".to_owned(),
        http_server_port: 0,
        webhook_path: "/webhook".to_owned(),
        tracking_path: "/tracking".to_owned(),
    }
}

fn router(app: &TestApp) -> Router {
    app_router(
        WebServerState {
            context: app.context.clone(),
            tracking_window: TimeDelta::minutes(60),
        },
        &settings(),
    )
}

async fn call(router: Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .expect("Failed to build the request"),
        )
        .await
        .expect("Request failed");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read the body")
        .to_bytes();

    (status, String::from_utf8_lossy(&body).into_owned())
}

/// Update of a button pressed by [CHAT]. `origin` holds either the message or the inline message ID.
fn callback_update(id: &str, data: &str, origin: Value) -> String {
    let mut query = json!({
        "id": id,
        "from": { "id": CHAT.0, "is_bot": false, "first_name": "Asha" },
        "chat_instance": "-1",
        "data": data,
    });
    if let (Some(query), Value::Object(origin)) = (query.as_object_mut(), origin) {
        query.extend(origin);
    }

    json!({ "update_id": 2, "callback_query": query }).to_string()
}

/// Catalog with a bus of "Sri Travels" that departs in half an hour and another one next week.
fn departing_catalog() -> BusCatalog {
    let bus = |id: &str, departure: chrono::DateTime<Utc>| Bus {
        bus_id: id.to_owned(),
        from: "Hyderabad".to_owned(),
        to: "Bangalore".to_owned(),
        date: departure.date_naive(),
        time: departure.time(),
        owner: "Sri Travels".to_owned(),
        price: 1200,
        bus_type: "AC Sleeper".to_owned(),
        rating: 4.5,
        available_seats: 30,
    };

    let now = Utc::now();
    BusCatalog::new(vec![
        bus("BUS101", now + TimeDelta::minutes(30)),
        bus("BUS102", now + TimeDelta::days(7)),
    ])
}

#[rstest]
#[case("garbage")]
#[case("")]
#[case(r#"{"update_id":1}"#)]
#[case(r#"{"update_id":1,"message":{"chat":{"id":"not a number"}}}"#)]
#[tokio::test]
async fn webhook_always_answers_ok(app: TestApp, #[case] body: &str) {
    let (status, text) = call(router(&app), Method::POST, "/webhook", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");
    assert!(app.messenger.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn webhook_dispatches_messages(app: TestApp) {
    let body = json!({
        "update_id": 1,
        "message": {
            "message_id": 3,
            "date": 1_700_000_000,
            "chat": { "id": CHAT.0, "type": "private", "first_name": "Asha" },
            "from": { "id": CHAT.0, "is_bot": false, "first_name": "Asha" },
            "text": "  HELP ",
        },
    })
    .to_string();

    let (status, text) = call(router(&app), Method::POST, "/webhook", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");
    let texts = app.messenger.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("BusBot help"));
}

#[rstest]
#[tokio::test]
async fn webhook_answers_ok_when_handlers_fail(app: TestApp) {
    app.store
        .fail_with(StoreError::Unexpected("boom".to_owned()));
    let body = callback_update(
        "cb-9",
        "cb_my_profile",
        json!({
            "message": {
                "message_id": 5,
                "date": 1_700_000_000,
                "chat": { "id": CHAT.0, "type": "private", "first_name": "Asha" },
                "text": "🧭 Main menu",
            },
        }),
    );

    let (status, _) = call(router(&app), Method::POST, "/webhook", &body).await;

    assert_eq!(status, StatusCode::OK);
    let calls = app.messenger.calls();
    assert_eq!(calls[0], Call::Answer("cb-9".to_owned()));
    assert_eq!(calls[1], Call::ClearMarkup(CHAT, MessageId(5)));
    assert!(app.messenger.texts()[0].contains("Something went wrong"));
}

#[rstest]
#[tokio::test]
async fn webhook_handles_inline_callbacks(app: TestApp) {
    let body = callback_update("cb-x", "cb_help", json!({ "inline_message_id": "AAA" }));

    let (status, text) = call(router(&app), Method::POST, "/webhook", &body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "OK");
    let calls = app.messenger.calls();
    assert_eq!(calls[0], Call::Answer("cb-x".to_owned()));
    assert!(!calls.iter().any(|c| matches!(c, Call::ClearMarkup(..))));
    assert!(calls.contains(&Call::Action(CHAT, ChatAction::Typing)));
    let messages = app.messenger.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].chat_id, CHAT);
    assert!(messages[0].text.contains("BusBot help"));
}

#[rstest]
#[case(Method::POST)]
#[case(Method::PUT)]
#[case(Method::DELETE)]
#[tokio::test]
async fn tracking_rejects_other_methods(app: TestApp, #[case] method: Method) {
    let (status, _) = call(router(&app), method, "/tracking", "").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[rstest]
#[case(Method::GET)]
#[case(Method::HEAD)]
#[tokio::test]
async fn tracking_without_departures(app: TestApp, #[case] method: Method) {
    let (status, _) = call(router(&app), method, "/tracking", "").await;

    assert_eq!(status, StatusCode::OK);
    assert!(app.messenger.calls().is_empty());
}

#[tokio::test]
async fn tracking_notifies_the_owners() {
    let app = TestApp::new(departing_catalog());
    app.store
        .push_row("Users", user_row("Sri Travels", "active", "owner"));
    // Same name, but not an owner.
    let mut passenger = user_row("Sri Travels", "active", "user");
    passenger[2] = "777".to_owned();
    app.store.push_row("Users", passenger);

    let (status, body) = call(router(&app), Method::GET, "/tracking", "").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON");
    assert_eq!(json["success"], true);
    assert_eq!(json["updates_sent"], 1);

    let messages = app.messenger.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].chat_id, CHAT);
    assert!(messages[0].text.contains("BUS101"));
}

#[tokio::test]
async fn tracking_failures() {
    let app = TestApp::new(departing_catalog());
    app.store
        .fail_with(StoreError::Unexpected("quota exceeded".to_owned()));

    let (status, body) = call(router(&app), Method::GET, "/tracking", "").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON");
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Tracking job failed");
    assert!(json["error"].as_str().is_some_and(|e| e.contains("quota exceeded")));
}
