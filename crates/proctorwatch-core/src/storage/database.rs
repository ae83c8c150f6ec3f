//! SQLite-based report history.
//!
//! Stores finished session reports, never frames or landmarks. The full
//! report is kept as JSON in `body`; the other columns exist for queries.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::error::{DatabaseError, Result, SessionError};
use crate::report::Report;

/// Aggregate view over every stored report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub sessions: u64,
    pub passed: u64,
    pub flagged_for_review: u64,
    pub mean_percentage: f64,
}

/// SQLite database for finished reports.
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open the database at `~/.config/proctorwatch/proctorwatch.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_path(&data_dir()?.join("proctorwatch.db"))
    }

    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Store a report. Saving the same session again replaces it.
    pub fn save_report(&self, report: &Report) -> Result<()> {
        let body = serde_json::to_string(report)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO reports
                (session_id, subject, started_at, finished_at, total_frames, percentage, verdict, body)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                report.session_id.to_string(),
                report.subject,
                report.started_at.to_rfc3339(),
                report.finished_at.to_rfc3339(),
                report.assessment.total_frames,
                report.assessment.percentage,
                report.verdict().to_string(),
                body,
            ],
        )?;
        Ok(())
    }

    /// # Errors
    /// Returns `SessionError::NotFound` if no report has this id.
    pub fn get_report(&self, session_id: Uuid) -> Result<Report> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM reports WHERE session_id = ?1",
                params![session_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let body = body.ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        decode(&body)
    }

    /// Most recent reports first, optionally only for one subject.
    pub fn list_reports(&self, limit: usize, subject: Option<&str>) -> Result<Vec<Report>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM reports
             WHERE ?1 IS NULL OR subject = ?1
             ORDER BY finished_at DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![subject, limit], |row| row.get::<_, String>(0))?;

        let mut reports = Vec::new();
        for body in rows {
            reports.push(decode(&body?)?);
        }
        Ok(reports)
    }

    pub fn summary(&self) -> Result<HistorySummary> {
        let mut stmt = self.conn.prepare(
            "SELECT verdict, COUNT(*), COALESCE(SUM(percentage), 0)
             FROM reports
             GROUP BY verdict",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        let mut summary = HistorySummary::default();
        let mut percentage_sum = 0.0;
        for row in rows {
            let (verdict, count, sum) = row?;
            summary.sessions += count;
            percentage_sum += sum;
            match verdict.as_str() {
                "PASS" => summary.passed += count,
                "REVIEW" => summary.flagged_for_review += count,
                other => {
                    return Err(DatabaseError::Corrupt(format!("unknown verdict '{other}'")).into())
                }
            }
        }
        if summary.sessions > 0 {
            summary.mean_percentage =
                (percentage_sum / summary.sessions as f64 * 100.0).round() / 100.0;
        }
        Ok(summary)
    }

    pub fn delete_report(&self, session_id: Uuid) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM reports WHERE session_id = ?1",
            params![session_id.to_string()],
        )?;
        Ok(removed > 0)
    }
}

fn decode(body: &str) -> Result<Report> {
    serde_json::from_str(body).map_err(|e| DatabaseError::Corrupt(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionStats;
    use chrono::{Duration, Utc};

    fn report(subject: &str, total: u64, distracted: u64, minutes_ago: i64) -> Report {
        let stats = SessionStats {
            total_frames: total,
            no_face_frames: distracted,
            ..SessionStats::default()
        };
        let finished = Utc::now() - Duration::minutes(minutes_ago);
        Report::new(
            Uuid::new_v4(),
            subject,
            finished - Duration::minutes(30),
            finished,
            &stats,
        )
    }

    #[test]
    fn save_and_get() {
        let store = ReportStore::open_memory().unwrap();
        let r = report("alice", 100, 10, 0);
        store.save_report(&r).unwrap();
        assert_eq!(store.get_report(r.session_id).unwrap(), r);
    }

    #[test]
    fn missing_report_is_not_found() {
        let store = ReportStore::open_memory().unwrap();
        let err = store.get_report(Uuid::new_v4()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Session(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn list_is_newest_first_and_limited() {
        let store = ReportStore::open_memory().unwrap();
        let old = report("alice", 10, 0, 120);
        let mid = report("bob", 10, 0, 60);
        let new = report("alice", 10, 0, 1);
        for r in [&mid, &old, &new] {
            store.save_report(r).unwrap();
        }

        let all = store.list_reports(10, None).unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.session_id).collect();
        assert_eq!(ids, vec![new.session_id, mid.session_id, old.session_id]);

        assert_eq!(store.list_reports(1, None).unwrap()[0].session_id, new.session_id);

        let alice = store.list_reports(10, Some("alice")).unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.subject == "alice"));
    }

    #[test]
    fn summary_counts_verdicts() {
        let store = ReportStore::open_memory().unwrap();
        store.save_report(&report("a", 100, 10, 3)).unwrap();
        store.save_report(&report("b", 100, 20, 2)).unwrap();
        store.save_report(&report("c", 100, 60, 1)).unwrap();

        let summary = store.summary().unwrap();
        assert_eq!(summary.sessions, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.flagged_for_review, 1);
        assert_eq!(summary.mean_percentage, 30.0);
    }

    #[test]
    fn empty_summary() {
        let store = ReportStore::open_memory().unwrap();
        assert_eq!(store.summary().unwrap(), HistorySummary::default());
    }

    #[test]
    fn resave_replaces_and_delete_removes() {
        let store = ReportStore::open_memory().unwrap();
        let mut r = report("a", 10, 0, 0);
        store.save_report(&r).unwrap();
        r.subject = "renamed".into();
        store.save_report(&r).unwrap();
        assert_eq!(store.list_reports(10, None).unwrap().len(), 1);
        assert_eq!(store.get_report(r.session_id).unwrap().subject, "renamed");

        assert!(store.delete_report(r.session_id).unwrap());
        assert!(!store.delete_report(r.session_id).unwrap());
    }

    #[test]
    fn file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.db");
        let r = report("a", 10, 5, 0);
        ReportStore::open_path(&path).unwrap().save_report(&r).unwrap();
        let reopened = ReportStore::open_path(&path).unwrap();
        assert_eq!(reopened.get_report(r.session_id).unwrap(), r);
    }
}
