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

//! Catalog of buses.
//!
//! # Description
//!
//! The buses are not stored in the spreadsheet yet. The catalog is a read-only list that is loaded when the
//! application starts.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};

/// A bus trip of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    pub bus_id: String,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub owner: String,
    pub price: u32,
    pub bus_type: String,
    pub rating: f32,
    pub available_seats: u32,
}

impl Bus {
    /// Departure time, the catalog uses UTC.
    pub fn departure(&self) -> DateTime<Utc> {
        NaiveDateTime::new(self.date, self.time).and_utc()
    }

    /// Short description used in the search results.
    pub fn summary(&self) -> String {
        format!(
            "🚌 <b>{}</b>: {} ➡️ {}\n📅 {} {} · {} · ₹{} · ⭐ {:.1} · 💺 {}",
            self.bus_id,
            self.from,
            self.to,
            self.date.format("%d/%m/%Y"),
            self.time.format("%H:%M"),
            self.bus_type,
            self.price,
            self.rating,
            self.available_seats,
        )
    }
}

/// Read-only list of buses.
#[derive(Debug, Clone, Default)]
pub struct BusCatalog {
    buses: Vec<Bus>,
}

impl BusCatalog {
    pub fn new(buses: Vec<Bus>) -> Self {
        BusCatalog { buses }
    }

    /// Catalog shipped with the application.
    pub fn sample() -> Self {
        let date = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap_or_default();
        let bus = |id: &str,
                   from: &str,
                   to: &str,
                   hour: u32,
                   owner: &str,
                   price: u32,
                   bus_type: &str| Bus {
            bus_id: id.to_owned(),
            from: from.to_owned(),
            to: to.to_owned(),
            date,
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default(),
            owner: owner.to_owned(),
            price,
            bus_type: bus_type.to_owned(),
            rating: 4.2,
            available_seats: 40,
        };

        BusCatalog::new(vec![
            bus("BUS101", "Hyderabad", "Bangalore", 21, "Sri Travels", 1200, "AC Sleeper"),
            bus("BUS102", "Hyderabad", "Chennai", 22, "Sri Travels", 1100, "AC Seater"),
            bus("BUS201", "Vijayawada", "Hyderabad", 6, "Orange Tours", 650, "Non-AC Seater"),
            bus("BUS202", "Bangalore", "Mysore", 9, "Orange Tours", 450, "AC Seater"),
        ])
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Buses that depart within `window` after `now`.
    pub fn departing_within(&self, now: DateTime<Utc>, window: TimeDelta) -> Vec<&Bus> {
        self.buses
            .iter()
            .filter(|b| {
                let departure = b.departure();
                departure >= now && departure - now <= window
            })
            .collect()
    }
}
