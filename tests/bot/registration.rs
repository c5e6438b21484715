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

use crate::helpers::{CHAT, TestApp, app, callback, registered_app, row, text, user_row};
use busbot::{
    store::{CellUpdate, USERS, find_row_by_key},
    users::UserColumn,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use teloxide::types::ChatId;

#[rstest]
#[tokio::test]
async fn start_shows_the_roles(app: TestApp) {
    app.context
        .dispatch(text("/start"))
        .await
        .expect("Dispatch failed");

    let messages = app.messenger.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.contains("Who are you?"));
    assert!(messages[0].keyboard.is_some());
    assert_eq!(app.store.writes(), 0);
}

#[rstest]
#[tokio::test]
async fn choosing_a_role_registers_the_user(app: TestApp) {
    app.context
        .dispatch(callback("cb_register_role_owner"))
        .await
        .expect("Dispatch failed");

    let appends = app.store.appends();
    assert_eq!(appends.len(), 1);

    let (range, values) = &appends[0];
    assert_eq!(range, "Users!A:I");
    assert!(values[UserColumn::UserId.index()].starts_with("USER"));
    assert_eq!(values[UserColumn::Name.index()], "Asha Rao");
    assert_eq!(values[UserColumn::ChatId.index()], CHAT.0.to_string());
    assert_eq!(values[UserColumn::Status.index()], "pending_details");
    assert_eq!(values[UserColumn::Role.index()], "owner");
    assert_eq!(values[UserColumn::Lang.index()], "en");
    assert!(!values[UserColumn::JoinDate.index()].is_empty());

    let texts = app.messenger.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("registered as owner"));
}

#[rstest]
#[tokio::test]
async fn roles_are_chosen_once(
    app: TestApp,
    #[values("pending_details", "active", "suspended")] status: &str,
) {
    app.store.push_row("Users", user_row("Asha", status, "user"));

    app.context
        .dispatch(callback("cb_register_role_owner"))
        .await
        .expect("Dispatch failed");

    assert!(app.store.appends().is_empty());
    let texts = app.messenger.texts();
    assert!(texts[0].contains("Welcome back"));
    assert!(!texts.iter().any(|t| t.contains("registered as")));
}

#[rstest]
#[tokio::test]
async fn start_never_duplicates_a_user(
    registered_app: TestApp,
    #[values("/start", " /START ")] command: &str,
) {
    for _ in 0..2 {
        registered_app
            .context
            .dispatch(text(command))
            .await
            .expect("Dispatch failed");
    }
    registered_app
        .context
        .dispatch(callback("cb_register_role_user"))
        .await
        .expect("Dispatch failed");

    assert_eq!(registered_app.store.writes(), 0);
    assert_eq!(registered_app.store.table("Users").len(), 2);

    let texts = registered_app.messenger.texts();
    assert!(texts.iter().all(|t| !t.contains("Who are you?")));
    assert!(texts[0].contains("Welcome back"));
}

#[rstest]
#[tokio::test]
async fn profile_details_write_three_cells(registered_app: TestApp) {
    registered_app
        .context
        .dispatch(text("my profile details Asha Rao / 1234 5678 9012"))
        .await
        .expect("Dispatch failed");

    assert_eq!(registered_app.store.appends().len(), 0);
    assert_eq!(
        registered_app.store.updates(),
        vec![
            CellUpdate::new("Users!B2".to_owned(), "Asha Rao"),
            CellUpdate::new("Users!E2".to_owned(), "1234 5678 9012"),
            CellUpdate::new("Users!F2".to_owned(), "active"),
        ]
    );

    let texts = registered_app.messenger.texts();
    assert_eq!(texts.len(), 2);
    assert!(texts[1].contains("Aadhar: 1234 5678 9012"));
    assert!(texts[1].contains("Status: active"));
    assert!(!texts[1].contains("incomplete"));
}

#[rstest]
#[case("my profile details OnlyName")]
#[case("my profile details / 1234")]
#[case("my profile details Asha /   ")]
#[case("my profile details")]
#[tokio::test]
async fn malformed_details_write_nothing(registered_app: TestApp, #[case] message: &str) {
    registered_app
        .context
        .dispatch(text(message))
        .await
        .expect("Dispatch failed");

    assert_eq!(registered_app.store.writes(), 0);

    let texts = registered_app.messenger.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Wrong format"));
}

#[rstest]
#[tokio::test]
async fn details_need_a_registered_user(app: TestApp) {
    app.context
        .dispatch(text("my profile details Asha Rao / 1234"))
        .await
        .expect("Dispatch failed");

    assert_eq!(app.store.writes(), 0);
    assert!(app.messenger.texts()[0].contains("/start"));
}

#[rstest]
#[tokio::test]
async fn pending_profile_view(registered_app: TestApp) {
    registered_app
        .context
        .dispatch(text("My Profile"))
        .await
        .expect("Dispatch failed");

    let texts = registered_app.messenger.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("Name: Asha"));
    assert!(texts[0].contains("Phone: Not set"));
    assert!(texts[0].contains("Aadhar: Not set"));
    assert!(texts[0].contains("my profile details Full Name / Aadhar Number"));
}

#[rstest]
#[tokio::test]
async fn lookups_return_the_first_match(app: TestApp) {
    app.store.push_row("Users", user_row("First", "active", "user"));
    app.store.push_row("Users", user_row("Second", "active", "user"));

    let handle = find_row_by_key(
        app.store.as_ref(),
        &USERS,
        UserColumn::ChatId.index(),
        &CHAT.0.to_string(),
    )
    .await
    .expect("Lookup failed")
    .expect("Row not found");

    assert_eq!(handle.position, 2);
    assert_eq!(handle.values[UserColumn::Name.index()], "First");
    assert_eq!(app.store.writes(), 0);
}

#[rstest]
#[tokio::test]
async fn lookups_skip_the_header(app: TestApp) {
    let handle = find_row_by_key(app.store.as_ref(), &USERS, UserColumn::ChatId.index(), "ChatID")
        .await
        .expect("Lookup failed");

    assert_eq!(handle, None);
}

#[rstest]
#[tokio::test]
async fn lookups_compare_exact_strings(app: TestApp) {
    app.store.push_row(
        "Users",
        row(&["USER9", "Ravi", "42424", "", "", "active", "user", "en", ""]),
    );

    let context = &app.context;
    let user = context
        .users
        .find_user(ChatId(4242))
        .await
        .expect("Lookup failed");

    assert_eq!(user, None);
}

#[rstest]
#[tokio::test]
async fn language_selection(registered_app: TestApp) {
    registered_app
        .context
        .dispatch(callback("lang_te"))
        .await
        .expect("Dispatch failed");

    assert_eq!(
        registered_app.store.updates(),
        vec![CellUpdate::new("Users!H2".to_owned(), "te")]
    );
    assert!(
        registered_app
            .messenger
            .texts()
            .iter()
            .any(|t| t.contains("తెలుగు"))
    );
}

#[rstest]
#[tokio::test]
async fn unsupported_languages_show_the_menu(registered_app: TestApp) {
    registered_app
        .context
        .dispatch(callback("lang_fr"))
        .await
        .expect("Dispatch failed");

    assert_eq!(registered_app.store.writes(), 0);

    let messages = registered_app.messenger.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].text.contains("Choose your language"));
    assert!(messages[0].keyboard.is_some());
}
