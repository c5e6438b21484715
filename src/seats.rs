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

//! Seat map module.
//!
//! # Description
//!
//! Buses share a fixed layout of 10 rows of 4 seats (A to D), with the aisle between B and C. The seats of
//! every bus are stored in the `Seats` table, one row per seat. This module reads those rows for a given bus
//! and renders a grid that shows the status of each seat.

use crate::{
    errors::BotError,
    store::{SEATS, TabularStore},
};
use regex::Regex;
use std::{collections::HashMap, sync::LazyLock};
use tracing::debug;

/// Number of rows of the layout.
const SEAT_ROWS: usize = 10;
/// Labels of the columns of the layout.
const SEAT_COLUMNS: [char; 4] = ['A', 'B', 'C', 'D'];

const BUS_ID_COLUMN: usize = 0;
const SEAT_NO_COLUMN: usize = 1;
const STATUS_COLUMN: usize = 5;

const AVAILABLE_MARKER: &str = "🟢";
const OCCUPIED_MARKER: &str = "🔴";
const UNKNOWN_MARKER: &str = "⬜";
const AISLE: &str = "┃";

static BUS_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)BUS\d+").expect("Invalid bus ID regex"));

/// Status of a seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatStatus {
    Available,
    Booked,
    Locked,
    /// No record for the seat, or a status that the bot doesn't know.
    Unknown,
}

impl From<&str> for SeatStatus {
    fn from(value: &str) -> Self {
        match value {
            "available" => SeatStatus::Available,
            "booked" => SeatStatus::Booked,
            "locked" => SeatStatus::Locked,
            _ => SeatStatus::Unknown,
        }
    }
}

impl SeatStatus {
    fn marker(&self) -> &'static str {
        match self {
            SeatStatus::Available => AVAILABLE_MARKER,
            SeatStatus::Booked | SeatStatus::Locked => OCCUPIED_MARKER,
            SeatStatus::Unknown => UNKNOWN_MARKER,
        }
    }
}

/// Extract the first bus ID of a text, uppercased.
pub fn extract_bus_id(text: &str) -> Option<String> {
    BUS_ID.find(text).map(|m| m.as_str().to_uppercase())
}

/// Seats of a bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    pub bus_id: String,
    seats: HashMap<String, SeatStatus>,
    /// Number of rows of the table that belong to the bus.
    matched: usize,
    /// Number of those rows whose status is exactly `available`.
    available: usize,
}

impl SeatMap {
    /// Build the map of `bus_id` from the rows of the `Seats` table.
    ///
    /// # Description
    ///
    /// The first row is the header of the table. Rows whose bus ID differs from `bus_id` are ignored.
    pub fn from_rows(bus_id: &str, rows: &[Vec<String>]) -> Result<Self, BotError> {
        if rows.is_empty() {
            return Err(BotError::SeatDataUnavailable);
        }

        let mut seats = HashMap::new();
        let mut matched = 0;
        let mut available = 0;

        for row in rows
            .iter()
            .skip(1)
            .filter(|row| row.get(BUS_ID_COLUMN).is_some_and(|id| id == bus_id))
        {
            matched += 1;

            let status = row.get(STATUS_COLUMN).map(String::as_str).unwrap_or_default();
            if status == "available" {
                available += 1;
            }

            if let Some(seat_no) = row.get(SEAT_NO_COLUMN) {
                seats.insert(seat_no.trim().to_uppercase(), SeatStatus::from(status));
            }
        }

        if matched == 0 {
            return Err(BotError::NoSeatsFound(bus_id.to_owned()));
        }

        Ok(SeatMap {
            bus_id: bus_id.to_owned(),
            seats,
            matched,
            available,
        })
    }

    pub fn status(&self, seat: &str) -> SeatStatus {
        self.seats.get(seat).cloned().unwrap_or(SeatStatus::Unknown)
    }

    /// Count of seats available out of the rows found for the bus.
    pub fn availability(&self) -> (usize, usize) {
        (self.available, self.matched)
    }

    /// Render the grid as an HTML message.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("🚌 <b>Seat map of {}</b>", self.bus_id),
            String::new(),
        ];

        let mut grid = Vec::with_capacity(SEAT_ROWS);
        for row in 1..=SEAT_ROWS {
            let cell = |col: &char| {
                let label = format!("{row}{col}");
                format!("{}{label:<3}", self.status(&label).marker())
            };
            let left: Vec<String> = SEAT_COLUMNS[..2].iter().map(cell).collect();
            let right: Vec<String> = SEAT_COLUMNS[2..].iter().map(cell).collect();

            grid.push(format!("{} {AISLE} {}", left.join(" "), right.join(" ")));
        }
        lines.push(format!("<pre>{}</pre>", grid.join("\n")));

        lines.push(format!(
            "{AVAILABLE_MARKER} available  {OCCUPIED_MARKER} booked  {UNKNOWN_MARKER} unknown"
        ));
        lines.push(format!(
            "Available seats: <b>{}/{}</b>",
            self.available, self.matched
        ));

        lines.join("\n")
    }
}

/// Load the seat map of the bus mentioned in `text`.
pub async fn load_seat_map<S: TabularStore>(store: &S, text: &str) -> Result<SeatMap, BotError> {
    let bus_id = extract_bus_id(text).ok_or(BotError::MissingBusId)?;
    debug!("Seat map requested for {bus_id}");

    let rows = store.read_range(&SEATS.full_range()).await?;

    SeatMap::from_rows(&bus_id, &rows)
}
