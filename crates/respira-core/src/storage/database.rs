//! SQLite-backed history store.
//!
//! Persists completed breathing sessions and custom patterns. Timestamps are
//! stored as RFC 3339 UTC strings; day truncation takes the UTC date via
//! `substr(completed_at, 1, 10)`, the same convention the analyzer applies
//! on its side.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::data_dir;
use crate::error::{CoreError, HistoryError};
use crate::pattern::{PatternDefinition, SoundProfile};
use crate::session::SessionSummary;

/// A completed session as stored. Never mutated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub user_id: String,
    /// Absent when the pattern was deleted after the session was recorded.
    pub pattern_id: Option<String>,
    pub pattern_name: String,
    pub duration_seconds: u32,
    pub cycles_completed: u32,
    pub completed_at: DateTime<Utc>,
}

/// SQLite database holding session history and custom patterns.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/respira/respira.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("respira.db");
        let conn = Connection::open(&path)
            .map_err(|source| HistoryError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(HistoryError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), HistoryError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sessions (
                    id               TEXT PRIMARY KEY,
                    user_id          TEXT NOT NULL,
                    pattern_id       TEXT,
                    pattern_name     TEXT NOT NULL,
                    duration_seconds INTEGER NOT NULL,
                    cycles_completed INTEGER NOT NULL,
                    completed_at     TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS patterns (
                    id              TEXT PRIMARY KEY,
                    name            TEXT NOT NULL,
                    inhale_ds       INTEGER NOT NULL,
                    inhale_hold_ds  INTEGER NOT NULL,
                    exhale_ds       INTEGER NOT NULL,
                    exhale_hold_ds  INTEGER NOT NULL,
                    cycles          INTEGER NOT NULL,
                    sound_profile   TEXT NOT NULL,
                    theme           TEXT NOT NULL,
                    created_at      TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_user_completed_at
                    ON sessions(user_id, completed_at);",
            )
            .map_err(|e| HistoryError::MigrationFailed(e.to_string()))
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// Persist a completed-session summary for a user.
    pub fn record_session(
        &self,
        user_id: &str,
        summary: &SessionSummary,
    ) -> Result<SessionRecord, HistoryError> {
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            pattern_id: summary.pattern_id.clone(),
            pattern_name: summary.pattern_name.clone(),
            duration_seconds: summary.duration_seconds,
            cycles_completed: summary.cycles_completed,
            completed_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO sessions (id, user_id, pattern_id, pattern_name,
                                   duration_seconds, cycles_completed, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.user_id,
                record.pattern_id,
                record.pattern_name,
                record.duration_seconds,
                record.cycles_completed,
                record.completed_at.to_rfc3339(),
            ],
        )?;
        Ok(record)
    }

    /// Newest-first page of a user's history plus the total count.
    pub fn history(
        &self,
        user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<(Vec<SessionRecord>, u64), HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, pattern_id, pattern_name,
                    duration_seconds, cycles_completed, completed_at
             FROM sessions
             WHERE user_id = ?1
             ORDER BY completed_at DESC
             LIMIT ?2 OFFSET ?3",
        )?;
        let sessions = stmt
            .query_map(params![user_id, limit, offset], session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let total: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok((sessions, total))
    }

    /// All of a user's records, oldest first, optionally bounded below.
    pub fn list_sessions(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SessionRecord>, HistoryError> {
        let sql = "SELECT id, user_id, pattern_id, pattern_name,
                          duration_seconds, cycles_completed, completed_at
                   FROM sessions
                   WHERE user_id = ?1 AND completed_at >= ?2
                   ORDER BY completed_at ASC";
        let floor = since.map_or_else(String::new, |t| t.to_rfc3339());
        let mut stmt = self.conn.prepare(sql)?;
        let sessions = stmt
            .query_map(params![user_id, floor], session_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    /// Distinct UTC calendar dates with at least one session, ascending.
    pub fn session_dates(&self, user_id: &str) -> Result<Vec<NaiveDate>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(completed_at, 1, 10) AS day
             FROM sessions
             WHERE user_id = ?1
             ORDER BY day ASC",
        )?;
        let days = stmt
            .query_map(params![user_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        days.iter()
            .map(|day| {
                NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map_err(|e| HistoryError::QueryFailed(format!("bad date '{day}': {e}")))
            })
            .collect()
    }

    /// Number of sessions at or after `since`.
    pub fn count_sessions_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, HistoryError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM sessions WHERE user_id = ?1 AND completed_at >= ?2",
            params![user_id, since.to_rfc3339()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Patterns ─────────────────────────────────────────────────────

    /// Insert or update a custom pattern.
    pub fn save_pattern(&self, pattern: &PatternDefinition) -> Result<(), HistoryError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO patterns
                (id, name, inhale_ds, inhale_hold_ds, exhale_ds, exhale_hold_ds,
                 cycles, sound_profile, theme, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                pattern.id,
                pattern.name,
                pattern.inhale_ds,
                pattern.inhale_hold_ds,
                pattern.exhale_ds,
                pattern.exhale_hold_ds,
                pattern.cycles,
                pattern.sound_profile.as_str(),
                pattern.theme,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Look up a custom pattern by id or exact name.
    pub fn get_pattern(&self, selector: &str) -> Result<Option<PatternDefinition>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, inhale_ds, inhale_hold_ds, exhale_ds, exhale_hold_ds,
                    cycles, sound_profile, theme
             FROM patterns
             WHERE id = ?1 OR name = ?1",
        )?;
        let pattern = stmt
            .query_row(params![selector], pattern_from_row)
            .optional()?;
        Ok(pattern)
    }

    /// All custom patterns, by name.
    pub fn list_patterns(&self) -> Result<Vec<PatternDefinition>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, inhale_ds, inhale_hold_ds, exhale_ds, exhale_hold_ds,
                    cycles, sound_profile, theme
             FROM patterns
             ORDER BY name ASC",
        )?;
        let patterns = stmt
            .query_map([], pattern_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(patterns)
    }

    /// Delete a custom pattern. Session records keep their name snapshot.
    pub fn delete_pattern(&self, id: &str) -> Result<bool, HistoryError> {
        let deleted = self
            .conn
            .execute("DELETE FROM patterns WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<SessionRecord> {
    let completed_at: String = row.get(6)?;
    let completed_at = DateTime::parse_from_rfc3339(&completed_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(SessionRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        pattern_id: row.get(2)?,
        pattern_name: row.get(3)?,
        duration_seconds: row.get(4)?,
        cycles_completed: row.get(5)?,
        completed_at,
    })
}

fn pattern_from_row(row: &Row<'_>) -> rusqlite::Result<PatternDefinition> {
    let sound_profile: String = row.get(7)?;
    let sound_profile = sound_profile
        .parse::<SoundProfile>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    Ok(PatternDefinition {
        id: row.get(0)?,
        name: row.get(1)?,
        inhale_ds: row.get(2)?,
        inhale_hold_ds: row.get(3)?,
        exhale_ds: row.get(4)?,
        exhale_hold_ds: row.get(5)?,
        cycles: row.get(6)?,
        sound_profile,
        theme: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str, duration_seconds: u32) -> SessionSummary {
        SessionSummary {
            pattern_id: Some("coherence-5-5".into()),
            pattern_name: name.into(),
            duration_seconds,
            cycles_completed: 6,
        }
    }

    #[test]
    fn record_and_list_round_trip() {
        let db = Database::open_memory().unwrap();
        let record = db.record_session("local", &summary("Coherence 5-5", 61)).unwrap();
        assert_eq!(record.user_id, "local");
        assert_eq!(record.duration_seconds, 61);

        let sessions = db.list_sessions("local", None).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, record.id);
        assert_eq!(sessions[0].pattern_name, "Coherence 5-5");
        assert_eq!(sessions[0].completed_at, record.completed_at);
    }

    #[test]
    fn history_pages_newest_first() {
        let db = Database::open_memory().unwrap();
        for i in 0..5 {
            db.record_session("local", &summary(&format!("p{i}"), 60)).unwrap();
        }
        let (page, total) = db.history("local", 2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(total, 5);
        let (rest, _) = db.history("local", 10, 2).unwrap();
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn queries_are_scoped_to_the_user() {
        let db = Database::open_memory().unwrap();
        db.record_session("a", &summary("x", 60)).unwrap();
        db.record_session("b", &summary("y", 60)).unwrap();

        assert_eq!(db.list_sessions("a", None).unwrap().len(), 1);
        assert_eq!(db.session_dates("a").unwrap().len(), 1);
        let (_, total) = db.history("b", 10, 0).unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn session_dates_are_distinct() {
        let db = Database::open_memory().unwrap();
        db.record_session("local", &summary("x", 60)).unwrap();
        db.record_session("local", &summary("y", 60)).unwrap();
        // Both records land on today's UTC date.
        let dates = db.session_dates("local").unwrap();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0], Utc::now().date_naive());
    }

    #[test]
    fn count_since_filters_on_timestamp() {
        let db = Database::open_memory().unwrap();
        db.record_session("local", &summary("x", 60)).unwrap();
        let past = Utc::now() - chrono::Duration::days(1);
        let future = Utc::now() + chrono::Duration::days(1);
        assert_eq!(db.count_sessions_since("local", past).unwrap(), 1);
        assert_eq!(db.count_sessions_since("local", future).unwrap(), 0);
    }

    #[test]
    fn pattern_crud_round_trip() {
        let db = Database::open_memory().unwrap();
        let pattern = PatternDefinition::custom(
            "Evening Wind-Down",
            60,
            20,
            80,
            0,
            5,
            SoundProfile::Chime,
            "night",
        );
        db.save_pattern(&pattern).unwrap();

        let by_id = db.get_pattern(&pattern.id).unwrap().unwrap();
        assert_eq!(by_id, pattern);
        let by_name = db.get_pattern("Evening Wind-Down").unwrap().unwrap();
        assert_eq!(by_name.id, pattern.id);

        assert_eq!(db.list_patterns().unwrap().len(), 1);
        assert!(db.delete_pattern(&pattern.id).unwrap());
        assert!(!db.delete_pattern(&pattern.id).unwrap());
        assert!(db.get_pattern(&pattern.id).unwrap().is_none());
    }

    #[test]
    fn deleting_a_pattern_keeps_session_records() {
        let db = Database::open_memory().unwrap();
        let pattern = PatternDefinition::custom(
            "Short Custom",
            10,
            0,
            10,
            0,
            1,
            SoundProfile::None,
            "dawn",
        );
        db.save_pattern(&pattern).unwrap();
        db.record_session(
            "local",
            &SessionSummary {
                pattern_id: Some(pattern.id.clone()),
                pattern_name: pattern.name.clone(),
                duration_seconds: 2,
                cycles_completed: 1,
            },
        )
        .unwrap();

        db.delete_pattern(&pattern.id).unwrap();
        let sessions = db.list_sessions("local", None).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].pattern_name, "Short Custom");
    }
}
