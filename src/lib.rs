//! Library of the BusBot crate.

use buses::BusCatalog;
use std::sync::Arc;
use teloxide::utils::command::BotCommands;
use users::UserHandler;

pub mod buses;
pub mod configuration;
pub mod errors;
pub mod keyboards;
pub mod messenger;
pub mod router;
pub mod seats;
pub mod store;
pub mod telemetry;
pub mod users;

// Bring all the endpoints to the main context.
pub mod endpoints {
    mod booking;
    mod default;
    mod help;
    mod language;
    mod profile;
    mod seats;
    mod start;
    mod status;
    mod tracking;
    mod webhook;

    pub use booking::{book_seat, bus_search, cancel_booking, my_booking};
    pub use default::{default, greet};
    pub use help::help;
    pub use language::{language_menu, set_language};
    pub use profile::{show_profile, update_profile};
    pub use seats::seat_map;
    pub use start::{register_role, start};
    pub use status::status;
    pub use tracking::{TrackingReport, live_tracking, run_tracking};
    pub use webhook::{
        TrackingResponse, WebServerState, app_router, tracking_handler, webhook_handler,
    };
}

pub type HandlerResult = Result<(), errors::BotError>;

/// Collaborators shared by all the handlers.
///
/// # Description
///
/// There is no per-chat state in here: everything a handler needs to remember lives in the tabular store.
pub struct BotContext<S, M> {
    /// Tabular store client.
    pub store: Arc<S>,
    /// Records of the users, backed by [BotContext::store].
    pub users: UserHandler<S>,
    /// Messaging platform client.
    pub messenger: Arc<M>,
    /// Read-only list of buses.
    pub catalog: BusCatalog,
}

impl<S: store::TabularStore, M: messenger::Messenger> BotContext<S, M> {
    pub fn new(store: Arc<S>, messenger: Arc<M>, catalog: BusCatalog) -> Self {
        BotContext {
            users: UserHandler::new(store.clone()),
            store,
            messenger,
            catalog,
        }
    }
}

/// Application commands in English language
///
/// # Description
///
/// Only used to populate the command menu of the Telegram clients. Most of the commands of the bot are plain
/// text (e.g. _show seats BUS101_), see [router::classify_text].
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum CommandEng {
    /// Register or go back to the main menu
    Start,
    /// Show the help message
    Help,
    /// Search buses
    Book,
    /// Show your profile
    Profile,
    /// Choose your language
    Language,
    /// Status of the service
    Status,
}
