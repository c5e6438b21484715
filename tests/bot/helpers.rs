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

//! Doubles of the external services used by the bot.

use busbot::{
    BotContext,
    buses::BusCatalog,
    errors::{MessengerError, StoreError},
    messenger::{Messenger, OutboundMessage},
    router::{InboundEvent, Sender},
    store::{CellUpdate, TabularStore},
    telemetry::parse_level,
};
use once_cell::sync::Lazy;
use rstest::fixture;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use teloxide::types::{ChatAction, ChatId, MessageId};
use tracing_subscriber::{Layer, filter::Targets, fmt, prelude::*};

pub static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let level = std::env::var("TEST_LOG").expect("Failed to read the content of TEST_LOG var");

        let (tracing_level, tracing_levelfilter) = parse_level(&level);

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(tracing_levelfilter),
            )
            .with(Targets::new().with_target("busbot", tracing_level))
            .init();
    }
});

pub const USERS_HEADER: [&str; 9] = [
    "UserID", "Name", "ChatID", "Phone", "Aadhar", "Status", "Role", "Lang", "JoinDate",
];
pub const SEATS_HEADER: [&str; 6] = ["BusID", "SeatNo", "Deck", "Type", "Price", "Status"];

pub const CHAT: ChatId = ChatId(4242);

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Row of the users table for [CHAT].
pub fn user_row(name: &str, status: &str, role: &str) -> Vec<String> {
    row(&[
        "USER1",
        name,
        &CHAT.0.to_string(),
        "",
        "",
        status,
        role,
        "en",
        "2025-01-01T00:00:00+00:00",
    ])
}

pub const CALLBACK_MESSAGE: MessageId = MessageId(77);

pub fn sender() -> Sender {
    Sender {
        user_id: CHAT.0 as u64,
        first_name: "Asha".to_owned(),
        last_name: Some("Rao".to_owned()),
        language_code: Some("en".to_owned()),
    }
}

/// Text message sent from [CHAT].
pub fn text(body: &str) -> InboundEvent {
    InboundEvent::Text {
        chat_id: CHAT,
        body: body.to_owned(),
        sender: sender(),
    }
}

/// Button press in a message of [CHAT].
pub fn callback(data: &str) -> InboundEvent {
    InboundEvent::Callback {
        callback_id: "cb-1".to_owned(),
        data: data.to_owned(),
        chat_id: CHAT,
        message_id: Some(CALLBACK_MESSAGE),
        sender: sender(),
    }
}

pub fn seat_row(bus: &str, seat: &str, status: &str) -> Vec<String> {
    row(&[bus, seat, "lower", "seater", "500", status])
}

/// In-memory tabular store.
///
/// # Description
///
/// Ranges are addressed in A1 notation, only full tables (`Users!A:I`) and single cells (`Users!B2`) are
/// supported. All the writes are recorded, so tests can check exactly what was written.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Vec<String>>>>,
    appends: Mutex<Vec<(String, Vec<String>)>>,
    updates: Mutex<Vec<CellUpdate>>,
    failure: Mutex<Option<StoreError>>,
}

impl MemoryStore {
    /// Store with the headers of the tables of the bot.
    pub fn with_headers() -> Self {
        let store = MemoryStore::default();
        store.set_table("Users", vec![row(&USERS_HEADER)]);
        store.set_table("Seats", vec![row(&SEATS_HEADER)]);
        store
    }

    pub fn set_table(&self, name: &str, rows: Vec<Vec<String>>) {
        self.tables
            .lock()
            .expect("Poisoned lock")
            .insert(name.to_owned(), rows);
    }

    pub fn push_row(&self, name: &str, values: Vec<String>) {
        self.tables
            .lock()
            .expect("Poisoned lock")
            .entry(name.to_owned())
            .or_default()
            .push(values);
    }

    pub fn table(&self, name: &str) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .expect("Poisoned lock")
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every following operation fail with `error`.
    pub fn fail_with(&self, error: StoreError) {
        *self.failure.lock().expect("Poisoned lock") = Some(error);
    }

    pub fn appends(&self) -> Vec<(String, Vec<String>)> {
        self.appends.lock().expect("Poisoned lock").clone()
    }

    pub fn updates(&self) -> Vec<CellUpdate> {
        self.updates.lock().expect("Poisoned lock").clone()
    }

    /// Number of write operations, whatever their kind.
    pub fn writes(&self) -> usize {
        self.appends().len() + self.updates().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.lock().expect("Poisoned lock").clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn table_name(range: &str) -> &str {
    range.split('!').next().unwrap_or(range)
}

/// Split `Users!B7` into the table, the 0-based column and the 0-based row.
fn parse_cell(range: &str) -> (String, usize, usize) {
    let (table, cell) = range.split_once('!').expect("Range without a sheet");
    let letters = cell
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>();
    let row = cell[letters.len()..]
        .parse::<usize>()
        .expect("Range without a row");
    let column = letters
        .chars()
        .fold(0, |acc, c| acc * 26 + (c as usize - 'A' as usize + 1));

    (table.to_owned(), column - 1, row - 1)
}

impl TabularStore for MemoryStore {
    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.check()?;
        Ok(self.table(table_name(range)))
    }

    async fn append_row(&self, range: &str, values: Vec<String>) -> Result<(), StoreError> {
        self.check()?;
        self.push_row(table_name(range), values.clone());
        self.appends
            .lock()
            .expect("Poisoned lock")
            .push((range.to_owned(), values));
        Ok(())
    }

    async fn batch_update(&self, updates: Vec<CellUpdate>) -> Result<(), StoreError> {
        self.check()?;
        {
            let mut tables = self.tables.lock().expect("Poisoned lock");
            for update in &updates {
                let (table, column, row) = parse_cell(&update.range);
                let rows = tables.entry(table).or_default();
                if rows.len() <= row {
                    rows.resize(row + 1, Vec::new());
                }
                if rows[row].len() <= column {
                    rows[row].resize(column + 1, String::new());
                }
                rows[row][column] = update.value.clone();
            }
        }
        self.updates.lock().expect("Poisoned lock").extend(updates);
        Ok(())
    }
}

/// Calls received by the [RecordingMessenger], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Answer(String),
    ClearMarkup(ChatId, MessageId),
    Action(ChatId, ChatAction),
    Message(OutboundMessage),
}

/// Messenger that records every call.
#[derive(Default)]
pub struct RecordingMessenger {
    calls: Mutex<Vec<Call>>,
    clear_markup_error: Mutex<Option<MessengerError>>,
    fail_actions: Mutex<bool>,
}

impl RecordingMessenger {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("Poisoned lock").clone()
    }

    /// Texts of the messages sent so far.
    pub fn texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Message(m) => Some(m.text),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn fail_clear_markup(&self, error: MessengerError) {
        *self.clear_markup_error.lock().expect("Poisoned lock") = Some(error);
    }

    pub fn fail_actions(&self) {
        *self.fail_actions.lock().expect("Poisoned lock") = true;
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("Poisoned lock").push(call);
    }
}

impl Messenger for RecordingMessenger {
    async fn send_message(&self, message: OutboundMessage) -> Result<(), MessengerError> {
        self.record(Call::Message(message));
        Ok(())
    }

    async fn send_chat_action(
        &self,
        chat_id: ChatId,
        action: ChatAction,
    ) -> Result<(), MessengerError> {
        self.record(Call::Action(chat_id, action));
        if *self.fail_actions.lock().expect("Poisoned lock") {
            return Err(MessengerError::Api("Too Many Requests".to_owned()));
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_id: String) -> Result<(), MessengerError> {
        self.record(Call::Answer(callback_id));
        Ok(())
    }

    async fn clear_reply_markup(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<(), MessengerError> {
        self.record(Call::ClearMarkup(chat_id, message_id));
        match self.clear_markup_error.lock().expect("Poisoned lock").clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

pub type TestContext = BotContext<MemoryStore, RecordingMessenger>;

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub messenger: Arc<RecordingMessenger>,
    pub context: Arc<TestContext>,
}

impl TestApp {
    pub fn new(catalog: BusCatalog) -> Self {
        Lazy::force(&TRACING);

        let store = Arc::new(MemoryStore::with_headers());
        let messenger = Arc::new(RecordingMessenger::default());
        let context = Arc::new(BotContext::new(store.clone(), messenger.clone(), catalog));

        TestApp {
            store,
            messenger,
            context,
        }
    }
}

#[fixture]
pub fn app() -> TestApp {
    TestApp::new(BusCatalog::sample())
}

/// Same as [app], with [CHAT] registered but without the details of the profile.
#[fixture]
pub fn registered_app() -> TestApp {
    let app = TestApp::new(BusCatalog::sample());
    app.store
        .push_row("Users", user_row("Asha", "pending_details", "user"));
    app
}
