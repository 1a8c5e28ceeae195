//! `CustomsDb` — the SQLite connection and every query the simulator needs.

use std::path::Path;
use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use customs_core::{Lane, PassengerId, PassengerRng, TimeGrid, Triangular};

use crate::{OutcomeRow, StoreError, StoreResult};

/// Tables the simulator requires; their absence is fatal at startup.
const REQUIRED_TABLES: [&str; 4] = ["arrivals", "airports", "planes", "passengers"];

// ── Row types ─────────────────────────────────────────────────────────────────

/// One roster flight, as selected by the international-arrivals query.
#[derive(Debug, Clone)]
pub(crate) struct FlightRow {
    pub id:           u32,
    pub flight_num:   String,
    pub origin:       String,
    pub arrival_time: String,
}

/// Wait aggregates for one (arrival hour, lane) cell, over processed
/// passengers.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitStats {
    pub hour:            u32,
    pub lane:            Lane,
    pub count:           u64,
    pub mean_wait_ticks: f64,
    pub max_wait_ticks:  u32,
}

// ── CustomsDb ─────────────────────────────────────────────────────────────────

/// Handle to the customs database.
#[derive(Debug)]
pub struct CustomsDb {
    pub(crate) conn: Connection,
}

impl CustomsDb {
    /// Open an existing database and verify the required tables exist.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )?;
        let db = Self { conn };
        db.validate_schema()?;
        Ok(db)
    }

    /// A fresh in-memory database with the schema applied.  Test and
    /// fixture entry point.
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Self { conn: Connection::open_in_memory()? };
        db.create_schema()?;
        Ok(db)
    }

    /// Create (or open) a database file and apply the schema.
    pub fn create(path: &Path) -> StoreResult<Self> {
        let db = Self { conn: Connection::open(path)? };
        db.create_schema()?;
        Ok(db)
    }

    /// Raw access to the underlying connection, for fixture seeding and
    /// ad-hoc queries outside the simulator's surface.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the four tables (idempotent).  Used for fixtures and fresh
    /// database files; scraped databases arrive with the schema in place.
    pub fn create_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS arrivals (
                 id           INTEGER PRIMARY KEY,
                 origin       TEXT NOT NULL,
                 airport_code TEXT NOT NULL,
                 arrival_time TEXT NOT NULL,
                 airline      TEXT,
                 flight_num   TEXT NOT NULL,
                 terminal     TEXT,
                 code_share   TEXT NOT NULL DEFAULT ''
             );
             CREATE TABLE IF NOT EXISTS airports (
                 code         TEXT PRIMARY KEY,
                 name         TEXT,
                 city         TEXT,
                 country      TEXT NOT NULL,
                 preclearance TEXT NOT NULL DEFAULT 'false'
             );
             CREATE TABLE IF NOT EXISTS planes (
                 flight_num  TEXT PRIMARY KEY,
                 carrier     TEXT,
                 aircraft    TEXT,
                 total_seats INTEGER
             );
             CREATE TABLE IF NOT EXISTS passengers (
                 id                INTEGER PRIMARY KEY,
                 flight_num        TEXT NOT NULL,
                 first_name        TEXT,
                 last_name         TEXT,
                 birthdate         TEXT,
                 nationality       TEXT NOT NULL,
                 service_time      INTEGER,
                 enque_time        INTEGER,
                 departure_time    INTEGER,
                 connecting_flight INTEGER NOT NULL DEFAULT 0,
                 processed         INTEGER NOT NULL DEFAULT 0
             );
             CREATE INDEX IF NOT EXISTS idx_passengers_flight
                 ON passengers (flight_num);",
        )?;
        Ok(())
    }

    fn validate_schema(&self) -> StoreResult<()> {
        for table in REQUIRED_TABLES {
            let found: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .optional()?;
            if found.is_none() {
                return Err(StoreError::MissingTable(table));
            }
        }
        Ok(())
    }

    // ── Roster selection ──────────────────────────────────────────────────

    /// International arrivals into terminal 4: no code share, non-US origin
    /// airport, no preclearance.
    pub(crate) fn roster_flights(&self) -> StoreResult<Vec<FlightRow>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT arrivals.id, arrivals.flight_num, arrivals.origin, arrivals.arrival_time
             FROM arrivals
             JOIN airports ON arrivals.airport_code = airports.code
             WHERE arrivals.code_share = ''
               AND arrivals.terminal = '4'
               AND airports.country != 'United States'
               AND airports.preclearance != 'true'
             ORDER BY arrivals.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(FlightRow {
                    id:           row.get(0)?,
                    flight_num:   row.get(1)?,
                    origin:       row.get(2)?,
                    arrival_time: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// `(id, nationality, service_time)` for one flight's manifest.
    pub(crate) fn manifest(
        &self,
        flight_num: &str,
    ) -> StoreResult<Vec<(u32, String, Option<u32>)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, nationality, service_time
             FROM passengers
             WHERE flight_num = ?1
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([flight_num], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Roster preparation ────────────────────────────────────────────────

    /// The once-per-roster sampling pass: stamp every roster passenger with
    /// its feeder-entry tick and a triangular service-time draw.
    ///
    /// Draws are keyed to the passenger id (not iteration order), so the
    /// same seed reproduces the same roster exactly.  Returns the number
    /// of passengers prepared.
    pub fn assign_service_times(
        &self,
        grid:     &TimeGrid,
        domestic: &Triangular,
        foreign:  &Triangular,
        seed:     u64,
    ) -> StoreResult<u64> {
        // A passenger pointing at no known arrival is a corrupt roster.
        let orphan: Option<(u32, String)> = self
            .conn
            .query_row(
                "SELECT id, flight_num FROM passengers
                 WHERE flight_num NOT IN (SELECT flight_num FROM arrivals)
                 LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        if let Some((id, flight)) = orphan {
            return Err(StoreError::RosterInconsistency(format!(
                "passenger {id} references unknown flight {flight:?}"
            )));
        }

        let flights = self.roster_flights()?;
        let mut prepared = 0u64;

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut update = tx.prepare_cached(
                "UPDATE passengers SET service_time = ?2, enque_time = ?3 WHERE id = ?1",
            )?;
            for flight in &flights {
                let enqueue = grid.to_tick(&flight.arrival_time).map_err(|e| {
                    StoreError::RosterInconsistency(format!(
                        "flight {}: {e}",
                        flight.flight_num
                    ))
                })?;
                for (id, nationality, _) in self.manifest(&flight.flight_num)? {
                    let lane = Lane::from_str(&nationality).map_err(|e| {
                        StoreError::RosterInconsistency(format!("passenger {id}: {e}"))
                    })?;
                    let dist = match lane {
                        Lane::Domestic => domestic,
                        Lane::Foreign  => foreign,
                    };
                    let mut rng = PassengerRng::new(seed, PassengerId(id));
                    update.execute(params![id, dist.sample(&mut rng), enqueue.0])?;
                    prepared += 1;
                }
            }
        }
        tx.commit()?;

        tracing::debug!(passengers = prepared, flights = flights.len(), "roster prepared");
        Ok(prepared)
    }

    // ── Outcomes ──────────────────────────────────────────────────────────

    /// Write one batch of completion outcomes in a single transaction.
    pub fn write_outcomes(&self, rows: &[OutcomeRow]) -> StoreResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "UPDATE passengers SET departure_time = ?2, processed = 1 WHERE id = ?1",
            )?;
            for row in rows {
                stmt.execute(params![row.id.0, row.departure_time.0])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Zero every per-passenger outcome, readying the store for another
    /// simulation pass over the same roster.
    pub fn reset_outcomes(&self) -> StoreResult<()> {
        self.conn.execute(
            "UPDATE passengers SET departure_time = NULL, processed = 0
             WHERE processed != 0 OR departure_time IS NOT NULL",
            [],
        )?;
        Ok(())
    }

    // ── Aggregation ───────────────────────────────────────────────────────

    /// Wait aggregates per (arrival hour, lane) over processed passengers.
    pub fn wait_stats(&self, ticks_per_hour: u32) -> StoreResult<Vec<WaitStats>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT enque_time / ?1 AS hour,
                    nationality,
                    COUNT(*),
                    AVG(departure_time - enque_time),
                    MAX(departure_time - enque_time)
             FROM passengers
             WHERE processed = 1
             GROUP BY hour, nationality
             ORDER BY hour, nationality",
        )?;
        let rows = stmt
            .query_map([ticks_per_hour], |row| {
                Ok((
                    row.get::<_, u32>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, u32>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(hour, nationality, count, mean, max)| {
                let lane = Lane::from_str(&nationality).map_err(|e| {
                    StoreError::RosterInconsistency(e.to_string())
                })?;
                Ok(WaitStats {
                    hour,
                    lane,
                    count,
                    mean_wait_ticks: mean,
                    max_wait_ticks: max,
                })
            })
            .collect()
    }

    /// Arrival headcount per (hour, lane), independent of processing state.
    /// The optimizer uses this to tell an empty hour from a starved one.
    pub fn arrival_counts(&self, ticks_per_hour: u32) -> StoreResult<Vec<(u32, Lane, u64)>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT enque_time / ?1 AS hour, nationality, COUNT(*)
             FROM passengers
             WHERE enque_time IS NOT NULL
             GROUP BY hour, nationality
             ORDER BY hour, nationality",
        )?;
        let rows = stmt
            .query_map([ticks_per_hour], |row| {
                Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, u64>(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(hour, nationality, count)| {
                let lane = Lane::from_str(&nationality).map_err(|e| {
                    StoreError::RosterInconsistency(e.to_string())
                })?;
                Ok((hour, lane, count))
            })
            .collect()
    }
}
