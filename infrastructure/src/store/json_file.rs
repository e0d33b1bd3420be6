//! JSON snapshot [`VoteStore`] adapter.
//!
//! Keeps the whole store in memory and rewrites a JSON snapshot after every
//! mutation. The snapshot is written to a sibling temp file and renamed
//! into place, so a crash never leaves a truncated file behind.
//!
//! Several processes may share one snapshot. Every mutation holds an
//! exclusive lock on `<snapshot>.lock` and re-reads the file under it, so
//! version checks run against what is on disk rather than against the
//! copy this handle loaded earlier.

use super::state::StoreState;
use async_trait::async_trait;
use fs2::FileExt;
use montage_application::{StoreError, VoteStore};
use montage_domain::{Entry, JurorId, Rating, Round, RoundId, Vote, VoteChangeset, VoteId};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// File-backed vote store
#[derive(Debug)]
pub struct JsonFileVoteStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

/// Exclusive hold on the snapshot's sidecar lock file
///
/// The lock is released when the guard is dropped.
struct SnapshotLock(File);

impl Drop for SnapshotLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

impl JsonFileVoteStore {
    /// Open the snapshot at `path`, starting empty if it does not exist
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = read_snapshot(&path).await?;
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn create_round(&self, name: &str) -> Result<Round, StoreError> {
        self.mutate(|state| Ok(state.create_round(name))).await
    }

    /// Add entries to a round; fails once the round has votes
    pub async fn add_entries<I, N>(&self, round: RoundId, names: I) -> Result<Vec<Entry>, StoreError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.mutate(|state| state.add_entries(round, names)).await
    }

    pub async fn rounds(&self) -> Vec<Round> {
        self.state
            .read()
            .await
            .rounds
            .iter()
            .map(|r| r.round.clone())
            .collect()
    }

    /// Run `f` on the current on-disk state, persist it, then publish it
    ///
    /// The file lock is held from the re-read until the rename. If `f` or
    /// the write fails, the in-memory state still advances to what was read
    /// from disk, so a retry after a conflict starts from fresh data.
    async fn mutate<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut StoreState) -> Result<T, StoreError>,
    {
        let mut state = self.state.write().await;
        let _lock = self.lock().await?;

        let mut next = read_snapshot(&self.path).await?;
        *state = next.clone();
        let out = f(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(out)
    }

    async fn lock(&self) -> Result<SnapshotLock, StoreError> {
        self.ensure_parent().await?;
        let lock_path = self.sibling(".lock");
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok(file)
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(SnapshotLock(file))
    }

    async fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.ensure_parent().await?;
        let tmp = self.sibling(&format!(".{}.tmp", std::process::id()));
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Wrote store snapshot to {}", self.path.display());
        Ok(())
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// `<snapshot file name><suffix>` in the snapshot's directory
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("store"));
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

async fn read_snapshot(path: &Path) -> Result<StoreState, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text)
            .map_err(|e| StoreError::Serialization(format!("{}: {}", path.display(), e))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No store at {}; starting empty", path.display());
            Ok(StoreState::default())
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl VoteStore for JsonFileVoteStore {
    async fn load_round(&self, round: RoundId) -> Result<Round, StoreError> {
        Ok(self.state.read().await.record(round)?.round.clone())
    }

    async fn load_entries(&self, round: RoundId) -> Result<Vec<Entry>, StoreError> {
        let state = self.state.read().await;
        let mut entries = state.record(round)?.entries.clone();
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }

    async fn load_votes(&self, round: RoundId) -> Result<Vec<Vote>, StoreError> {
        Ok(self.state.read().await.record(round)?.votes.clone())
    }

    async fn apply_changeset(&self, changeset: &VoteChangeset) -> Result<Round, StoreError> {
        self.mutate(|state| state.apply(changeset)).await
    }

    async fn submit_rating(
        &self,
        round: RoundId,
        vote: VoteId,
        juror: &JurorId,
        rating: Rating,
    ) -> Result<Vote, StoreError> {
        self.mutate(|state| state.rate(round, vote, juror, rating))
            .await
    }
}
