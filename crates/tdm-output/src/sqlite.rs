//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `diagnostics.db` file in the configured output directory
//! with the tables `participants`, `unsatisfied_candidates`, and
//! `failed_trips`.  The `trips` table (with its optional logsum column) and
//! destination sample tables are created on first write.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::{check_table_name, DiagnosticsWriter};
use crate::{FailedTripRow, OutputResult, ParticipantRow, SampleRow, TripRow, UnsatisfiedRow};

/// Writes diagnostic tables to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `diagnostics.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("diagnostics.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS participants (
                 participant_id  INTEGER PRIMARY KEY,
                 tour_id         INTEGER NOT NULL,
                 household_id    INTEGER NOT NULL,
                 person_id       INTEGER NOT NULL,
                 participant_num INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS unsatisfied_candidates (
                 iteration      INTEGER NOT NULL,
                 participant_id INTEGER NOT NULL,
                 tour_id        INTEGER NOT NULL,
                 household_id   INTEGER NOT NULL,
                 composition    TEXT    NOT NULL,
                 adult          INTEGER NOT NULL,
                 alternative    TEXT    NOT NULL,
                 prob           REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS failed_trips (
                 trip_id     INTEGER PRIMARY KEY,
                 tour_id     INTEGER NOT NULL,
                 person_id   INTEGER NOT NULL,
                 trip_num    INTEGER NOT NULL,
                 outbound    INTEGER NOT NULL,
                 purpose_id  INTEGER NOT NULL,
                 origin      INTEGER NOT NULL,
                 destination INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

/// SQLite integers are signed 64-bit; ids above `i64::MAX` wrap.
#[inline]
fn int(id: u64) -> i64 {
    id as i64
}

impl DiagnosticsWriter for SqliteWriter {
    fn write_participants(&mut self, rows: &[ParticipantRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO participants \
                 (participant_id, tour_id, household_id, person_id, participant_num) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    int(row.participant_id),
                    int(row.tour_id),
                    int(row.household_id),
                    int(row.person_id),
                    row.participant_num,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_unsatisfied(&mut self, rows: &[UnsatisfiedRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO unsatisfied_candidates \
                 (iteration, participant_id, tour_id, household_id, composition, adult, alternative, prob) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.iteration,
                    int(row.participant_id),
                    int(row.tour_id),
                    int(row.household_id),
                    row.composition,
                    row.is_adult as i64,
                    row.alternative,
                    row.prob,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_failed_trips(&mut self, rows: &[FailedTripRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO failed_trips \
                 (trip_id, tour_id, person_id, trip_num, outbound, purpose_id, origin, destination) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    int(row.trip_id),
                    int(row.tour_id),
                    int(row.person_id),
                    row.trip_num,
                    row.outbound as i64,
                    row.purpose_id,
                    row.origin,
                    row.destination,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_sample(&mut self, table_name: &str, rows: &[SampleRow]) -> OutputResult<()> {
        check_table_name(table_name)?;
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table_name}\" (
                 trip_id    INTEGER NOT NULL,
                 zone_id    INTEGER NOT NULL,
                 prob       REAL    NOT NULL,
                 pick_count INTEGER NOT NULL,
                 od_logsum  REAL    NOT NULL,
                 dp_logsum  REAL    NOT NULL
             );"
        ))?;
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO \"{table_name}\" \
                 (trip_id, zone_id, prob, pick_count, od_logsum, dp_logsum) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
            ))?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    int(row.trip_id),
                    row.zone_id,
                    row.prob,
                    row.pick_count,
                    row.od_logsum,
                    row.dp_logsum,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_trips(&mut self, logsum_column: Option<&str>, rows: &[TripRow]) -> OutputResult<()> {
        let logsum = match logsum_column {
            Some(name) => {
                check_table_name(name)?;
                format!(",\n                 \"{name}\" REAL")
            }
            None => String::new(),
        };
        self.conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS trips (
                 trip_id     INTEGER PRIMARY KEY,
                 tour_id     INTEGER NOT NULL,
                 person_id   INTEGER NOT NULL,
                 trip_num    INTEGER NOT NULL,
                 outbound    INTEGER NOT NULL,
                 purpose_id  INTEGER NOT NULL,
                 origin      INTEGER NOT NULL,
                 destination INTEGER NOT NULL,
                 failed      INTEGER NOT NULL{logsum}
             );"
        ))?;
        if rows.is_empty() {
            return Ok(());
        }
        let insert = match logsum_column {
            Some(name) => format!(
                "INSERT INTO trips \
                 (trip_id, tour_id, person_id, trip_num, outbound, purpose_id, origin, destination, failed, \"{name}\") \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            None => "INSERT INTO trips \
                     (trip_id, tour_id, person_id, trip_num, outbound, purpose_id, origin, destination, failed) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                .to_owned(),
        };
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(&insert)?;
            for row in rows {
                let (trip, tour, person) = (int(row.trip_id), int(row.tour_id), int(row.person_id));
                let (outbound, failed) = (row.outbound as i64, row.failed as i64);
                if logsum_column.is_some() {
                    stmt.execute(rusqlite::params![
                        trip, tour, person, row.trip_num, outbound, row.purpose_id, row.origin,
                        row.destination, failed, row.logsum,
                    ])?;
                } else {
                    stmt.execute(rusqlite::params![
                        trip, tour, person, row.trip_num, outbound, row.purpose_id, row.origin,
                        row.destination, failed,
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
