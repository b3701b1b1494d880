use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::params;
use serde_json::to_string;
use uuid::Uuid;

use crate::{db::connection::Database, models::CandidateRecord};

impl Database {
    /// Insert a new record. Every call creates a new row; nothing is merged.
    pub async fn insert_candidate_record(&self, record: &CandidateRecord) -> Result<String> {
        let record = record.clone();
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        self.execute(move |conn| {
            let biometrics =
                to_string(&record.biometrics).context("failed to serialize biometrics")?;
            let gaze_patterns = record
                .gaze_patterns
                .as_ref()
                .map(to_string)
                .transpose()
                .context("failed to serialize gaze patterns")?;

            conn.execute(
                "INSERT INTO candidate_records (
                    id,
                    candidate_id,
                    average_stress,
                    stress_status,
                    biometrics,
                    gaze_patterns,
                    focus_index,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    record.candidate_id,
                    record.average_stress,
                    record.stress_status.as_str(),
                    biometrics,
                    gaze_patterns,
                    record.focus_index,
                    created_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert candidate record")?;
            Ok(id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::helpers::{parse_datetime, parse_stress_label},
        models::{assemble, ClassificationResult, GazePoint, GazeSummary, Sample},
    };
    use chrono::{DateTime, NaiveDate};
    use pretty_assertions::assert_eq;
    use rusqlite::Row;
    use serde_json::from_str;

    /// A candidate record as read back from storage.
    #[derive(Debug, Clone)]
    struct StoredRecord {
        id: String,
        created_at: DateTime<Utc>,
        record: CandidateRecord,
    }

    fn row_to_record(row: &Row) -> Result<StoredRecord> {
        let stress_status: String = row.get("stress_status")?;
        let biometrics: String = row.get("biometrics")?;
        let gaze_patterns: Option<String> = row.get("gaze_patterns")?;
        let created_at: String = row.get("created_at")?;

        Ok(StoredRecord {
            id: row.get("id")?,
            created_at: parse_datetime(&created_at, "created_at")?,
            record: CandidateRecord {
                candidate_id: row.get("candidate_id")?,
                average_stress: row.get("average_stress")?,
                stress_status: parse_stress_label(&stress_status)?,
                biometrics: from_str(&biometrics).context("failed to parse biometrics")?,
                gaze_patterns: gaze_patterns
                    .map(|raw| from_str(&raw))
                    .transpose()
                    .context("failed to parse gaze_patterns")?,
                focus_index: row.get("focus_index")?,
            },
        })
    }

    impl Database {
        async fn list_records_for_candidate(&self, candidate_id: &str) -> Result<Vec<StoredRecord>> {
            let candidate_id = candidate_id.to_string();
            self.execute(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, candidate_id, average_stress, stress_status, biometrics, gaze_patterns, focus_index, created_at
                     FROM candidate_records
                     WHERE candidate_id = ?1
                     ORDER BY rowid ASC",
                )?;

                let mut rows = stmt.query(params![candidate_id])?;
                let mut records = Vec::new();
                while let Some(row) = rows.next()? {
                    records.push(row_to_record(row)?);
                }

                Ok(records)
            })
            .await
        }
    }

    fn sample() -> Sample {
        let at = NaiveDate::from_ymd_opt(2024, 2, 2)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Sample::new(80.0, 32.0, at)
    }

    #[tokio::test]
    async fn stores_and_reads_back_records() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("records.sqlite3")).unwrap();

        let gaze = GazeSummary {
            gaze_patterns: vec![GazePoint {
                x: 0.5,
                y: 0.5,
                on_target: true,
                captured_at: Utc::now(),
            }],
            focus_index: 100.0,
        };
        let record = assemble(
            "C1",
            &ClassificationResult::from_score(0.5),
            &[sample()],
            Some(&gaze),
        );

        let id = db.insert_candidate_record(&record).await.unwrap();
        let stored = db.list_records_for_candidate("C1").await.unwrap();

        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert!(stored[0].created_at <= Utc::now());
        assert_eq!(stored[0].record, record);
    }

    #[tokio::test]
    async fn repeated_inserts_never_merge() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("records.sqlite3")).unwrap();

        let first = assemble("C9", &ClassificationResult::from_score(0.1), &[sample()], None);
        let second = assemble("C9", &ClassificationResult::from_score(0.9), &[], None);
        db.insert_candidate_record(&first).await.unwrap();
        db.insert_candidate_record(&second).await.unwrap();

        let stored = db.list_records_for_candidate("C9").await.unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].record.average_stress, "10.00%");
        assert_eq!(stored[1].record.average_stress, "90.00%");
        assert!(stored[1].record.gaze_patterns.is_none());
        assert!(stored[1].record.focus_index.is_none());
        assert!(db.list_records_for_candidate("other").await.unwrap().is_empty());
    }
}
