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

//! Tabular store module.
//!
//! # Description
//!
//! The records of the bot live in a spreadsheet that is used as a makeshift database. Each table is a sheet
//! whose first row is a header, and whose columns have a fixed order. This module defines the operations the
//! bot needs from such a store ([TabularStore]), and the helpers that build on them, such as the lookup of a
//! row by the value of a key column ([find_row_by_key]).
//!
//! There is no locking: a lookup followed by a write might hit a row that was moved by a concurrent writer.
//! That's the reason behind [RowHandle] not being cacheable.

use crate::errors::StoreError;
use std::future::Future;
use tracing::{debug, trace};

mod credentials;
mod sheets;

pub use credentials::ServiceAccountKey;
pub use sheets::SheetsClient;

/// Operations supported by the external tabular store.
///
/// # Description
///
/// Ranges use the A1 notation including the sheet name, i.e. `Users!A:I` or `Users!B7`.
pub trait TabularStore: Send + Sync {
    /// Read all the rows within `range`. Trailing empty cells might be missing from each row.
    fn read_range(
        &self,
        range: &str,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, StoreError>> + Send;

    /// Append a row after the last row of the table addressed by `range`.
    fn append_row(
        &self,
        range: &str,
        values: Vec<String>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Write several cells within a single request.
    ///
    /// # Description
    ///
    /// Each target is addressed independently. The store doesn't guarantee that all the writes are applied
    /// when the request fails, so a failure must be considered as a partial update.
    fn batch_update(
        &self,
        updates: Vec<CellUpdate>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Description of a table of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    /// Name of the sheet.
    pub name: &'static str,
    /// First and last column of the table.
    pub columns: (char, char),
}

/// The users of the bot: UserID, Name, ChatID, Phone, Aadhar, Status, Role, Lang, JoinDate.
pub const USERS: Table = Table {
    name: "Users",
    columns: ('A', 'I'),
};

/// The seats of the buses: BusID, SeatNo, 3 unspecified columns, Status.
pub const SEATS: Table = Table {
    name: "Seats",
    columns: ('A', 'F'),
};

impl Table {
    /// Range that covers all the columns of the table.
    pub fn full_range(&self) -> String {
        format!("{}!{}:{}", self.name, self.columns.0, self.columns.1)
    }

    /// Address of a single cell, `column` is 0-based and `row` 1-based.
    pub fn cell(&self, column: usize, row: usize) -> String {
        format!("{}!{}{}", self.name, column_letter(column), row)
    }
}

/// Translate a 0-based column index into its letter(s).
pub fn column_letter(column: usize) -> String {
    let mut letters = Vec::new();
    let mut n = column + 1;

    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }

    letters.iter().rev().collect()
}

/// A single cell write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub range: String,
    pub value: String,
}

impl CellUpdate {
    pub fn new(range: String, value: impl Into<String>) -> Self {
        CellUpdate {
            range,
            value: value.into(),
        }
    }
}

/// Result of a lookup by key.
///
/// # Description
///
/// The position is only valid during the operation that resolved it: rows can be inserted or moved by other
/// clients of the store at any moment. Don't keep instances of this `struct` around, perform a new lookup
/// before each write instead.
#[derive(Debug, PartialEq, Eq)]
pub struct RowHandle {
    /// Content of the row.
    pub values: Vec<String>,
    /// 1-based position of the row within the sheet.
    pub position: usize,
}

impl RowHandle {
    /// Address of a cell of this row.
    pub fn cell(&self, table: &Table, column: usize) -> String {
        table.cell(column, self.position)
    }
}

/// Find the first row of `table` whose `key_column` equals `key`.
///
/// # Description
///
/// The whole table is read and scanned in store order. The first row is the header of the table, so it is
/// skipped. The comparison is an exact string comparison.
pub async fn find_row_by_key<S: TabularStore>(
    store: &S,
    table: &Table,
    key_column: usize,
    key: &str,
) -> Result<Option<RowHandle>, StoreError> {
    let rows = store.read_range(&table.full_range()).await?;
    trace!("Read {} rows from {}", rows.len(), table.name);

    let handle = rows
        .into_iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.get(key_column).is_some_and(|cell| cell == key))
        .map(|(index, values)| RowHandle {
            values,
            position: index + 1,
        });

    debug!(
        "Lookup of {key} in {}: {:?}",
        table.name,
        handle.as_ref().map(|h| h.position)
    );

    Ok(handle)
}
