use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rkyv::rancor::Error as RkyvError;
use rkyv::util::AlignedVec;
use tracing::{debug, warn};

use crate::ranking::RankingResult;

use super::error::StoreError;
use super::{ResultStore, StoreResult};

const RKYV_EXTENSION: &str = "rkyv";

const TEMP_EXTENSION: &str = "rkyv.tmp";

#[derive(Debug, Clone)]
/// One rkyv file per result under a single directory.
///
/// File names are `{timestamp:020}-{sequence:010}-{id}`, so lexical order is chronological
/// and results written in the same millisecond keep their append order.
pub struct FileResultStore {
    storage_path: PathBuf,
    next_sequence: Arc<AtomicU64>,
}

impl FileResultStore {
    /// Opens a store rooted at `storage_path`, creating the directory if needed.
    pub fn open(storage_path: impl Into<PathBuf>) -> StoreResult<Self> {
        let store = Self {
            storage_path: storage_path.into(),
            next_sequence: Arc::new(AtomicU64::new(0)),
        };
        store.ensure_storage_path()?;

        let resume_at = store
            .list_entries()?
            .iter()
            .filter_map(|path| Self::sequence_of(path))
            .max()
            .map_or(0, |last| last + 1);
        store.next_sequence.store(resume_at, Ordering::SeqCst);
        Ok(store)
    }

    /// Returns the root storage directory.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn ensure_storage_path(&self) -> StoreResult<()> {
        if !self.storage_path.exists() {
            fs::create_dir_all(&self.storage_path).map_err(|_| StoreError::StorageUnavailable {
                path: self.storage_path.clone(),
            })?;
        }
        Ok(())
    }

    fn file_stem(result: &RankingResult, sequence: u64) -> String {
        format!(
            "{:020}-{:010}-{}",
            result.timestamp_millis.max(0),
            sequence,
            result.id
        )
    }

    /// Sequence number encoded in a result file name, if it has one.
    fn sequence_of(path: &Path) -> Option<u64> {
        let name = path.file_name()?.to_str()?;
        name.splitn(3, '-').nth(1)?.parse().ok()
    }

    /// Lists result files, oldest first.
    fn list_entries(&self) -> StoreResult<Vec<PathBuf>> {
        if !self.storage_path.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();

        for entry in fs::read_dir(&self.storage_path)? {
            let path = entry?.path();

            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && name.ends_with(RKYV_EXTENSION)
                && !name.ends_with(TEMP_EXTENSION)
            {
                entries.push(path);
            }
        }

        entries.sort();
        Ok(entries)
    }

    fn read_entry(path: &Path) -> StoreResult<RankingResult> {
        let bytes = fs::read(path)?;
        let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
        aligned.extend_from_slice(&bytes);

        rkyv::from_bytes::<RankingResult, RkyvError>(&aligned)
            .map_err(|e| StoreError::Serialization(format!("{:?}", e)))
    }
}

impl ResultStore for FileResultStore {
    fn append(&self, result: &RankingResult) -> StoreResult<()> {
        self.ensure_storage_path()?;

        let bytes = rkyv::to_bytes::<RkyvError>(result)
            .map_err(|e| StoreError::Serialization(format!("{:?}", e)))?;

        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let stem = Self::file_stem(result, sequence);
        let temp_path = self
            .storage_path
            .join(format!("{}.{}", stem, TEMP_EXTENSION));
        let final_path = self
            .storage_path
            .join(format!("{}.{}", stem, RKYV_EXTENSION));

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &final_path)?;

        debug!(result_id = %result.id, path = %final_path.display(), "Stored ranking result");
        Ok(())
    }

    fn recent(&self, limit: usize) -> StoreResult<Vec<RankingResult>> {
        let entries = self.list_entries()?;
        let mut results = Vec::with_capacity(limit.min(entries.len()));

        for path in entries.iter().rev() {
            if results.len() >= limit {
                break;
            }
            match Self::read_entry(path) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable result file");
                }
            }
        }

        Ok(results)
    }
}
