//! The best score ever achieved, shared by every session.
//!
//! There is exactly one write path, [`RecordStore::try_set`], and it performs
//! the comparison and the store under a single write lock. Two winners that
//! finish at the same moment therefore cannot both believe they set the
//! record, and a worse score can never overwrite a better one.

use log::info;
use tokio::sync::RwLock;

/// A score (lower is better) and the name of whoever achieved it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub score: u32,
    pub holder: String,
}

impl Record {
    /// Returns true if `score` would replace this record.
    pub fn is_beaten_by(&self, score: u32) -> bool {
        score < self.score
    }
}

/// Result of a compare-and-set on the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    /// The candidate was better and is now stored.
    Set(Record),
    /// Somebody else holds an equal or better score; it is returned unchanged.
    Kept(Record),
}

impl RecordUpdate {
    /// The record as stored after the update attempt.
    pub fn record(&self) -> &Record {
        match self {
            RecordUpdate::Set(record) | RecordUpdate::Kept(record) => record,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, RecordUpdate::Set(_))
    }
}

/// Process-wide holder of the current record.
#[derive(Debug, Default)]
pub struct RecordStore {
    current: RwLock<Option<Record>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Record> {
        self.current.read().await.clone()
    }

    /// Returns true if `score` would become the record if committed now.
    ///
    /// This is only a hint for whether to ask the player for a name; the
    /// outcome is decided by [`RecordStore::try_set`].
    pub async fn qualifies(&self, score: u32) -> bool {
        match self.current.read().await.as_ref() {
            Some(record) => record.is_beaten_by(score),
            None => true,
        }
    }

    /// Stores `{score, holder}` if it beats the current record.
    pub async fn try_set(&self, score: u32, holder: &str) -> RecordUpdate {
        let mut current = self.current.write().await;

        if let Some(existing) = current.as_ref() {
            if !existing.is_beaten_by(score) {
                return RecordUpdate::Kept(existing.clone());
            }
        }

        let record = Record {
            score,
            holder: holder.to_string(),
        };
        info!("New record of {} set by {}", record.score, record.holder);
        *current = Some(record.clone());
        RecordUpdate::Set(record)
    }
}
