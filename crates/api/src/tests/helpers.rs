// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use diesel::sql_types::BigInt;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use prtrack_domain::{MilestoneCatalog, OwnerRef};
use prtrack_persistence::SqlitePersistence;
use std::path::PathBuf;
use time::Date;
use time::macros::date;

use crate::{EntrySource, RecordMilestoneRequest, WriteEntryResponse, record_milestone};

pub fn create_test_owner() -> OwnerRef {
    OwnerRef::new("device-api-test").unwrap()
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

pub const fn test_today() -> Date {
    date!(2025 - 07 - 01)
}

pub fn record_request(entry_type: &str, entry_date: &str) -> RecordMilestoneRequest {
    RecordMilestoneRequest {
        entry_type: String::from(entry_type),
        entry_date: String::from(entry_date),
        notes: None,
    }
}

/// A file-backed database holding one `aor` entry whose stored date has
/// been overwritten with text that cannot be parsed.
///
/// The database files are removed on drop.
pub struct UnreadableEntryFixture {
    pub persistence: SqlitePersistence,
    pub entry_id: i64,
    path: PathBuf,
}

impl UnreadableEntryFixture {
    pub fn new(tag: &str) -> Self {
        let path: PathBuf = std::env::temp_dir().join(format!(
            "prtrack-api-{tag}-{}.db",
            std::process::id()
        ));
        remove_database_files(&path);

        let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
        let written: WriteEntryResponse = record_milestone(
            &mut persistence,
            EntrySource::Database,
            &create_test_owner(),
            MilestoneCatalog::canonical(),
            record_request("aor", "2025-02-10"),
            test_today(),
        )
        .unwrap();

        let mut raw = SqliteConnection::establish(path.to_str().unwrap()).unwrap();
        diesel::sql_query("UPDATE timeline_entries SET entry_date = 'garbage' WHERE entry_id = ?")
            .bind::<BigInt, _>(written.entry_id)
            .execute(&mut raw)
            .unwrap();

        Self {
            persistence,
            entry_id: written.entry_id,
            path,
        }
    }
}

impl Drop for UnreadableEntryFixture {
    fn drop(&mut self) {
        remove_database_files(&self.path);
    }
}

fn remove_database_files(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}
