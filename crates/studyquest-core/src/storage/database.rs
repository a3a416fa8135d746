//! SQLite-based session archive and state store.
//!
//! Provides persistent storage for:
//! - Closed study sessions (full archive; the tracker keeps only the latest ten)
//! - Study statistics (daily and all-time)
//! - Key-value store for engine snapshots

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::session::StudySession;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_focus_min: u64,
    pub total_xp_earned: u64,
    pub lessons_completed: u64,
    pub quizzes_completed: u64,
    pub today_sessions: u64,
    pub today_focus_min: u64,
}

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/studyquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("studyquest.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS study_sessions (
                id                 TEXT PRIMARY KEY,
                subject_id         TEXT NOT NULL,
                started_at         TEXT NOT NULL,
                ended_at           TEXT NOT NULL,
                focus_min          INTEGER NOT NULL,
                xp_earned          INTEGER NOT NULL DEFAULT 0,
                lessons_completed  INTEGER NOT NULL DEFAULT 0,
                quizzes_completed  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_study_sessions_ended_at ON study_sessions(ended_at);
            CREATE INDEX IF NOT EXISTS idx_study_sessions_subject ON study_sessions(subject_id);",
        )?;
        Ok(())
    }

    /// Archive a closed session. Re-recording the same id overwrites it.
    ///
    /// # Errors
    /// Returns an error if the session is still open or the insert fails.
    pub fn record_session(&self, session: &StudySession) -> Result<(), DatabaseError> {
        let ended_at = session
            .end_time
            .ok_or_else(|| DatabaseError::QueryFailed(format!("session {} is still open", session.id)))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO study_sessions
                (id, subject_id, started_at, ended_at, focus_min, xp_earned, lessons_completed, quizzes_completed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                session.id,
                session.subject_id,
                session.start_time.to_rfc3339(),
                ended_at.to_rfc3339(),
                session.total_focus_minutes,
                session.xp_earned,
                session.lessons_completed,
                session.quizzes_completed,
            ],
        )?;
        Ok(())
    }

    /// Most recently closed sessions, newest first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<StudySession>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, started_at, ended_at, focus_min, xp_earned, lessons_completed, quizzes_completed
             FROM study_sessions
             ORDER BY ended_at DESC
             LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, u64>(4)?,
                row.get::<_, u32>(5)?,
                row.get::<_, u32>(6)?,
                row.get::<_, u32>(7)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, subject_id, started_at, ended_at, focus_min, xp, lessons, quizzes) = row?;
            sessions.push(StudySession {
                id,
                subject_id,
                start_time: parse_timestamp(&started_at)?,
                end_time: Some(parse_timestamp(&ended_at)?),
                xp_earned: xp,
                lessons_completed: lessons,
                quizzes_completed: quizzes,
                total_focus_minutes: focus_min,
            });
        }
        Ok(sessions)
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let mut stats = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(focus_min), 0), COALESCE(SUM(xp_earned), 0),
                    COALESCE(SUM(lessons_completed), 0), COALESCE(SUM(quizzes_completed), 0)
             FROM study_sessions",
            [],
            |row| {
                Ok(Stats {
                    total_sessions: row.get(0)?,
                    total_focus_min: row.get(1)?,
                    total_xp_earned: row.get(2)?,
                    lessons_completed: row.get(3)?,
                    quizzes_completed: row.get(4)?,
                    ..Stats::default()
                })
            },
        )?;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let (count, minutes) = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(focus_min), 0)
             FROM study_sessions
             WHERE ended_at >= ?1",
            params![format!("{today}T00:00:00+00:00")],
            |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
        )?;
        stats.today_sessions = count;
        stats.today_focus_min = minutes;

        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::QueryFailed(format!("bad timestamp '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn closed(id: &str, minutes: i64, xp: u32) -> StudySession {
        let end = Utc::now();
        StudySession {
            id: id.into(),
            subject_id: "math".into(),
            start_time: end - Duration::minutes(minutes),
            end_time: Some(end),
            xp_earned: xp,
            lessons_completed: 1,
            quizzes_completed: 0,
            total_focus_minutes: minutes as u64,
        }
    }

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        db.record_session(&closed("a", 25, 40)).unwrap();
        db.record_session(&closed("b", 50, 60)).unwrap();
        let stats = db.stats_all().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_focus_min, 75);
        assert_eq!(stats.total_xp_earned, 100);
        assert_eq!(stats.lessons_completed, 2);
        assert_eq!(stats.today_sessions, 2);
    }

    #[test]
    fn rerecording_overwrites() {
        let db = Database::open_memory().unwrap();
        let mut s = closed("a", 25, 0);
        db.record_session(&s).unwrap();
        s.xp_earned = 55;
        db.record_session(&s).unwrap();
        let recent = db.recent_sessions(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].xp_earned, 55);
    }

    #[test]
    fn open_session_is_rejected() {
        let db = Database::open_memory().unwrap();
        let mut s = closed("a", 25, 0);
        s.end_time = None;
        assert!(db.record_session(&s).is_err());
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
    }

    #[test]
    fn open_at_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studyquest.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.kv_set("k", "v").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("v"));
    }
}
