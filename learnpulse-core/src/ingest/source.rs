//! Record source abstraction
//!
//! Every place attendance can come from implements [`RecordSource`]. A source
//! returns the complete record list in one call, together with the server's
//! own current-streak figure when it has one.

use std::path::PathBuf;

use serde::Deserialize;

use crate::client::LmsClient;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::RawAttendanceRecord;

/// A complete, unvalidated fetch of one learner's attendance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    pub records: Vec<RawAttendanceRecord>,
    /// Current streak as computed by the server, if reported
    pub server_streak: Option<u32>,
}

/// Trait implemented by all record sources.
pub trait RecordSource {
    /// Human-readable description for logging and reports
    fn name(&self) -> String;

    /// Fetch a complete snapshot.
    ///
    /// Implementations must not return partial data; a failed fetch is an
    /// error, never a shorter list.
    fn fetch(&self) -> Result<RecordSnapshot>;
}

/// On-disk snapshot layout: either a bare record array or an object that
/// also carries the server streak.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Bare(Vec<RawAttendanceRecord>),
    Wrapped {
        records: Vec<RawAttendanceRecord>,
        #[serde(default)]
        streak: Option<u32>,
    },
}

/// Reads records from a JSON file.
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for FileRecordSource {
    fn name(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn fetch(&self) -> Result<RecordSnapshot> {
        let content = std::fs::read_to_string(&self.path)?;
        let parsed: SnapshotFile = serde_json::from_str(&content)?;

        let snapshot = match parsed {
            SnapshotFile::Bare(records) => RecordSnapshot {
                records,
                server_streak: None,
            },
            SnapshotFile::Wrapped { records, streak } => RecordSnapshot {
                records,
                server_streak: streak,
            },
        };

        tracing::info!(
            path = %self.path.display(),
            records = snapshot.records.len(),
            "Loaded attendance snapshot"
        );
        Ok(snapshot)
    }
}

/// Fetches records and the server streak from the LMS API.
///
/// Blocks on a private current-thread runtime so callers stay synchronous.
pub struct ApiRecordSource {
    client: LmsClient,
    user_id: String,
    runtime: tokio::runtime::Runtime,
}

impl ApiRecordSource {
    pub fn new(config: ApiConfig, user_id: impl Into<String>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Config(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            client: LmsClient::new(config)?,
            user_id: user_id.into(),
            runtime,
        })
    }
}

impl RecordSource for ApiRecordSource {
    fn name(&self) -> String {
        format!("{} (user {})", self.client.base_url(), self.user_id)
    }

    fn fetch(&self) -> Result<RecordSnapshot> {
        self.runtime.block_on(async {
            let records = self.client.fetch_attendance_with_retry(&self.user_id).await?;
            let streak = self.client.fetch_streak_with_retry(&self.user_id).await?;

            tracing::info!(
                user_id = %self.user_id,
                records = records.len(),
                server_streak = streak,
                "Fetched attendance from API"
            );

            Ok::<_, Error>(RecordSnapshot {
                records,
                server_streak: Some(streak),
            })
        })
    }
}
