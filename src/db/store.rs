use anyhow::Result;
use async_trait::async_trait;

use crate::models::CandidateRecord;

use super::Database;

/// Insert-only sink for finished candidate records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_record(&self, record: &CandidateRecord) -> Result<()>;
}

#[async_trait]
impl RecordStore for Database {
    async fn insert_record(&self, record: &CandidateRecord) -> Result<()> {
        self.insert_candidate_record(record).await.map(|_| ())
    }
}
