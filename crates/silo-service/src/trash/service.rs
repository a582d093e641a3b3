//! The trash lifecycle manager.
//!
//! Owns the state transitions of folders and files between active, trashed,
//! and purged: `ACTIVE → TRASHED → ACTIVE` (restore) or `TRASHED → PURGED`
//! (terminal). There is no direct transition from active to purged.
//!
//! The relational store is the single consistency boundary; blob deletions
//! are not covered by its transactions. Purge therefore always attempts the
//! blob delete first and removes the row only afterwards, so a surviving
//! row is the durable marker that a purge still needs to be retried.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use silo_core::error::AppError;
use silo_core::result::AppResult;
use silo_core::traits::blob::BlobStore;
use silo_database::repositories::trash::TrashStore;
use silo_entity::file::File;
use silo_entity::folder::Folder;

/// Top-level contents of an organization's recycle bin.
///
/// Nested trashed items are implied by their trashed ancestor and not
/// listed separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashListing {
    /// Trashed folders at the organization root.
    pub folders: Vec<Folder>,
    /// Trashed files at the organization root.
    pub files: Vec<File>,
}

/// Outcome of one expired-trash sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// File rows purged (blob and row both removed).
    pub files_purged: u64,
    /// File rows skipped because their blob delete failed; retried next run.
    pub files_skipped: u64,
    /// Folder rows purged.
    pub folders_purged: u64,
}

/// Manages the trash lifecycle for folders and files.
///
/// Store handles are injected at construction; the service holds no other
/// mutable state, so one instance is shared freely across tasks.
#[derive(Debug, Clone)]
pub struct TrashService {
    /// Relational lifecycle store.
    store: Arc<dyn TrashStore>,
    /// Blob store holding file bytes.
    blobs: Arc<dyn BlobStore>,
    /// Retention window added to the trash time to form `deleted_at`.
    retention: Duration,
}

impl TrashService {
    /// Create a new trash service with the given retention window in days.
    pub fn new(store: Arc<dyn TrashStore>, blobs: Arc<dyn BlobStore>, retention_days: i64) -> Self {
        Self {
            store,
            blobs,
            retention: Duration::days(retention_days),
        }
    }

    /// The purge eligibility time for an entity trashed at `now`.
    fn purge_eligible_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.retention
    }

    /// Move a file to the trash.
    ///
    /// Idempotent: trashing a file that is already trashed (or absent)
    /// matches zero rows and succeeds without touching `deleted_at`.
    pub async fn trash_file(&self, file_id: Uuid) -> AppResult<()> {
        let deleted_at = self.purge_eligible_at(Utc::now());
        let moved = self.store.trash_file(file_id, deleted_at).await?;
        info!(%file_id, moved, "Moved file to trash");
        Ok(())
    }

    /// Move a folder, its descendant folders, and all contained files to
    /// the trash in one transaction, sharing a single `deleted_at`.
    ///
    /// Lenient-match policy: succeeds even when nothing matched (folder
    /// absent or already trashed). Callers needing existence confirmation
    /// must pre-check with a read.
    pub async fn trash_folder(&self, folder_id: Uuid) -> AppResult<()> {
        let deleted_at = self.purge_eligible_at(Utc::now());
        let moved = self.store.trash_folder_cascade(folder_id, deleted_at).await?;
        info!(%folder_id, moved, "Moved folder cascade to trash");
        Ok(())
    }

    /// Restore a trashed file. `deleted_at` is left in place; it is
    /// irrelevant once `deleted` is false.
    pub async fn restore_file(&self, file_id: Uuid) -> AppResult<()> {
        let restored = self.store.restore_file(file_id).await?;
        info!(%file_id, restored, "Restored file from trash");
        Ok(())
    }

    /// Restore a trashed folder cascade in one transaction.
    pub async fn restore_folder(&self, folder_id: Uuid) -> AppResult<()> {
        let restored = self.store.restore_folder_cascade(folder_id).await?;
        info!(%folder_id, restored, "Restored folder cascade from trash");
        Ok(())
    }

    /// Permanently delete a single file ("delete forever").
    ///
    /// The blob is deleted first; if that fails the row is left untouched
    /// (still trashed) and the operation is safe to retry. The row delete
    /// is constrained to `deleted = true`, so an active file is never
    /// purged.
    pub async fn purge_file(&self, file_id: Uuid) -> AppResult<()> {
        let key = self
            .store
            .file_blob_key(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        self.blobs.delete(&key).await?;

        let removed = self.store.purge_file_row(file_id).await?;
        info!(%file_id, removed, "Purged file");
        Ok(())
    }

    /// Permanently delete a trashed folder cascade.
    ///
    /// Every contained trashed file's blob is deleted before any row is
    /// removed; a blob failure aborts the whole purge with all rows
    /// retained. Blobs already deleted by the aborted attempt are a
    /// tolerated recoverable inconsistency resolved by retrying.
    pub async fn purge_folder(&self, folder_id: Uuid) -> AppResult<()> {
        let keys = self.store.trashed_blob_keys_under(folder_id).await?;
        for key in &keys {
            self.blobs.delete(key).await?;
        }

        let removed = self.store.purge_folder_cascade(folder_id).await?;
        info!(%folder_id, blobs = keys.len(), removed, "Purged folder cascade");
        Ok(())
    }

    /// List the top level of an organization's recycle bin: trashed root
    /// folders and trashed root files.
    pub async fn list_trash(&self, organization_id: Uuid) -> AppResult<TrashListing> {
        let folders = self.store.trashed_root_folders(organization_id).await?;
        let files = self.store.trashed_root_files(organization_id).await?;
        Ok(TrashListing { folders, files })
    }

    /// Empty an organization's recycle bin regardless of expiry.
    ///
    /// Files are purged one at a time, blob first; a blob failure skips
    /// that row (it stays trashed for a later attempt) instead of aborting
    /// the rest of the bin.
    pub async fn empty_trash(&self, organization_id: Uuid) -> AppResult<SweepOutcome> {
        let mut outcome = SweepOutcome::default();

        for file in self.store.trashed_files(organization_id).await? {
            match self.blobs.delete(&file.file_path).await {
                Ok(()) => {
                    outcome.files_purged += self.store.purge_file_row(file.id).await?;
                }
                Err(e) => {
                    warn!(file_id = %file.id, error = %e, "Blob delete failed; file row retained");
                    outcome.files_skipped += 1;
                }
            }
        }

        outcome.folders_purged = self.store.purge_trashed_folders(organization_id).await?;
        info!(%organization_id, ?outcome, "Emptied trash");
        Ok(outcome)
    }

    /// Scheduled sweep: purge everything past its retention window, across
    /// all organizations.
    ///
    /// Fire-and-forget: failures are logged and never raised to the
    /// scheduler. A row whose blob delete fails keeps satisfying the
    /// expiry predicate and is retried on the next run.
    pub async fn purge_expired(&self) -> SweepOutcome {
        let now = Utc::now();
        let mut outcome = SweepOutcome::default();

        let expired = match self.store.expired_files(now).await {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "Expired-trash sweep failed to scan files");
                return outcome;
            }
        };

        for file in expired {
            match self.blobs.delete(&file.file_path).await {
                Ok(()) => match self.store.purge_file_row(file.id).await {
                    Ok(removed) => outcome.files_purged += removed,
                    Err(e) => {
                        error!(file_id = %file.id, error = %e, "Failed to purge expired file row");
                        outcome.files_skipped += 1;
                    }
                },
                Err(e) => {
                    warn!(file_id = %file.id, error = %e, "Blob delete failed; file row retained");
                    outcome.files_skipped += 1;
                }
            }
        }

        match self.store.purge_expired_folders(now).await {
            Ok(removed) => outcome.folders_purged = removed,
            Err(e) => error!(error = %e, "Failed to purge expired folders"),
        }

        info!(?outcome, "Expired-trash sweep finished");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use silo_storage::MemoryBlobStore;

    use super::*;

    /// In-memory [`TrashStore`] mirroring the Postgres cascade semantics.
    #[derive(Debug, Default)]
    struct MemoryTrashStore {
        state: Mutex<State>,
        /// Fail the file phase of the trash cascade before anything commits.
        fail_cascade_file_phase: bool,
    }

    #[derive(Debug, Default, Clone)]
    struct State {
        folders: HashMap<Uuid, Folder>,
        files: HashMap<Uuid, File>,
    }

    impl State {
        /// The target folder and all its descendants. Empty when the target
        /// row is absent, matching the recursive CTE anchor. Tracks visited
        /// ids so a parent cycle in the data cannot loop the walk.
        fn subtree(&self, root: Uuid) -> Vec<Uuid> {
            if !self.folders.contains_key(&root) {
                return Vec::new();
            }
            let mut ids = vec![root];
            let mut seen: HashSet<Uuid> = ids.iter().copied().collect();
            let mut frontier = vec![root];
            while let Some(parent) = frontier.pop() {
                for f in self.folders.values() {
                    if f.parent_folder_id == Some(parent) && seen.insert(f.id) {
                        ids.push(f.id);
                        frontier.push(f.id);
                    }
                }
            }
            ids
        }
    }

    impl MemoryTrashStore {
        fn insert_folder(&self, folder: Folder) {
            self.state.lock().unwrap().folders.insert(folder.id, folder);
        }

        fn insert_file(&self, file: File) {
            self.state.lock().unwrap().files.insert(file.id, file);
        }

        fn folder(&self, id: Uuid) -> Option<Folder> {
            self.state.lock().unwrap().folders.get(&id).cloned()
        }

        fn file(&self, id: Uuid) -> Option<File> {
            self.state.lock().unwrap().files.get(&id).cloned()
        }
    }

    #[async_trait]
    impl TrashStore for MemoryTrashStore {
        async fn trash_file(&self, file_id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            match state.files.get_mut(&file_id) {
                Some(f) if !f.deleted => {
                    f.deleted = true;
                    f.deleted_at = Some(deleted_at);
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn restore_file(&self, file_id: Uuid) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            match state.files.get_mut(&file_id) {
                Some(f) if f.deleted => {
                    f.deleted = false;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn file_blob_key(&self, file_id: Uuid) -> AppResult<Option<String>> {
            let state = self.state.lock().unwrap();
            Ok(state.files.get(&file_id).map(|f| f.file_path.clone()))
        }

        async fn purge_file_row(&self, file_id: Uuid) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            match state.files.get(&file_id) {
                Some(f) if f.deleted => {
                    state.files.remove(&file_id);
                    Ok(1)
                }
                _ => Ok(0),
            }
        }

        async fn trash_folder_cascade(
            &self,
            folder_id: Uuid,
            deleted_at: DateTime<Utc>,
        ) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            // Stage on a copy and swap at the end, so a failure between the
            // folder and file phases leaves nothing behind, like the real
            // transaction.
            let mut staged = state.clone();
            let subtree = staged.subtree(folder_id);
            let mut moved = 0;
            for id in &subtree {
                if let Some(f) = staged.folders.get_mut(id) {
                    if !f.deleted {
                        f.deleted = true;
                        f.deleted_at = Some(deleted_at);
                        moved += 1;
                    }
                }
            }
            if self.fail_cascade_file_phase {
                return Err(AppError::database("simulated failure before file phase"));
            }
            for f in staged.files.values_mut() {
                if f.folder_id.is_some_and(|fid| subtree.contains(&fid)) && !f.deleted {
                    f.deleted = true;
                    f.deleted_at = Some(deleted_at);
                    moved += 1;
                }
            }
            *state = staged;
            Ok(moved)
        }

        async fn restore_folder_cascade(&self, folder_id: Uuid) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            let subtree = state.subtree(folder_id);
            let mut restored = 0;
            for id in &subtree {
                if let Some(f) = state.folders.get_mut(id) {
                    if f.deleted {
                        f.deleted = false;
                        restored += 1;
                    }
                }
            }
            for f in state.files.values_mut() {
                if f.folder_id.is_some_and(|fid| subtree.contains(&fid)) && f.deleted {
                    f.deleted = false;
                    restored += 1;
                }
            }
            Ok(restored)
        }

        async fn trashed_blob_keys_under(&self, folder_id: Uuid) -> AppResult<Vec<String>> {
            let state = self.state.lock().unwrap();
            let subtree = state.subtree(folder_id);
            Ok(state
                .files
                .values()
                .filter(|f| f.deleted && f.folder_id.is_some_and(|fid| subtree.contains(&fid)))
                .map(|f| f.file_path.clone())
                .collect())
        }

        async fn purge_folder_cascade(&self, folder_id: Uuid) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            let subtree = state.subtree(folder_id);
            let files_before = state.files.len();
            state.files.retain(|_, f| {
                !(f.deleted && f.folder_id.is_some_and(|fid| subtree.contains(&fid)))
            });
            let folders_before = state.folders.len();
            state
                .folders
                .retain(|id, f| !(f.deleted && subtree.contains(id)));
            Ok((files_before - state.files.len()) as u64
                + (folders_before - state.folders.len()) as u64)
        }

        async fn trashed_root_folders(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .folders
                .values()
                .filter(|f| {
                    f.organization_id == organization_id
                        && f.deleted
                        && f.parent_folder_id.is_none()
                })
                .cloned()
                .collect())
        }

        async fn trashed_root_files(&self, organization_id: Uuid) -> AppResult<Vec<File>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .files
                .values()
                .filter(|f| {
                    f.organization_id == organization_id && f.deleted && f.folder_id.is_none()
                })
                .cloned()
                .collect())
        }

        async fn trashed_files(&self, organization_id: Uuid) -> AppResult<Vec<File>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .files
                .values()
                .filter(|f| f.organization_id == organization_id && f.deleted)
                .cloned()
                .collect())
        }

        async fn purge_trashed_folders(&self, organization_id: Uuid) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            let before = state.folders.len();
            state
                .folders
                .retain(|_, f| !(f.organization_id == organization_id && f.deleted));
            Ok((before - state.folders.len()) as u64)
        }

        async fn expired_files(&self, now: DateTime<Utc>) -> AppResult<Vec<File>> {
            let state = self.state.lock().unwrap();
            Ok(state
                .files
                .values()
                .filter(|f| f.deleted && f.deleted_at.is_some_and(|at| at < now))
                .cloned()
                .collect())
        }

        async fn purge_expired_folders(&self, now: DateTime<Utc>) -> AppResult<u64> {
            let mut state = self.state.lock().unwrap();
            let before = state.folders.len();
            state
                .folders
                .retain(|_, f| !(f.deleted && f.deleted_at.is_some_and(|at| at < now)));
            Ok((before - state.folders.len()) as u64)
        }
    }

    /// Blob store whose deletes always fail, for purge abort paths.
    #[derive(Debug, Default)]
    struct FailingBlobStore;

    #[async_trait]
    impl BlobStore for FailingBlobStore {
        fn provider_type(&self) -> &str {
            "failing"
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }

        async fn delete(&self, key: &str) -> AppResult<()> {
            Err(AppError::storage(format!("simulated delete failure for '{key}'")))
        }
    }

    fn folder(org: Uuid, parent: Option<Uuid>, name: &str) -> Folder {
        Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            organization_id: org,
            parent_folder_id: parent,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted: false,
            deleted_at: None,
        }
    }

    fn file(org: Uuid, folder_id: Option<Uuid>, name: &str) -> File {
        File {
            id: Uuid::new_v4(),
            name: name.to_string(),
            folder_id,
            file_path: format!("{org}/{name}"),
            file_size: 42,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            organization_id: org,
            deleted: false,
            deleted_at: None,
        }
    }

    fn service(
        store: Arc<MemoryTrashStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> TrashService {
        TrashService::new(store, blobs, 30)
    }

    #[tokio::test]
    async fn test_folder_trash_cascade_shares_deleted_at() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let a = folder(org, None, "a");
        let b = folder(org, Some(a.id), "b");
        let c = folder(org, Some(b.id), "c");
        let x = file(org, Some(b.id), "x.txt");
        let y = file(org, None, "y.txt");
        store.insert_folder(a.clone());
        store.insert_folder(b.clone());
        store.insert_folder(c.clone());
        store.insert_file(x.clone());
        store.insert_file(y.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        svc.trash_folder(a.id).await.unwrap();

        let a2 = store.folder(a.id).unwrap();
        let b2 = store.folder(b.id).unwrap();
        let c2 = store.folder(c.id).unwrap();
        let x2 = store.file(x.id).unwrap();
        assert!(a2.deleted && b2.deleted && c2.deleted && x2.deleted);
        assert_eq!(a2.deleted_at, b2.deleted_at);
        assert_eq!(a2.deleted_at, c2.deleted_at);
        assert_eq!(a2.deleted_at, x2.deleted_at);
        assert!(a2.deleted_at.unwrap() > Utc::now() + Duration::days(29));

        // Root file outside the cascade is untouched.
        assert!(!store.file(y.id).unwrap().deleted);
    }

    #[tokio::test]
    async fn test_trash_cascade_failure_leaves_no_partial_state() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore {
            fail_cascade_file_phase: true,
            ..Default::default()
        });
        let a = folder(org, None, "a");
        let x = file(org, Some(a.id), "x.txt");
        store.insert_folder(a.clone());
        store.insert_file(x.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        let err = svc.trash_folder(a.id).await.unwrap_err();
        assert_eq!(err.kind, silo_core::error::ErrorKind::Database);

        // The folder phase ran before the failure but never committed.
        assert!(!store.folder(a.id).unwrap().deleted);
        assert!(!store.file(x.id).unwrap().deleted);
    }

    #[tokio::test]
    async fn test_trash_cascade_terminates_on_cyclic_parents() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let mut a = folder(org, None, "a");
        let b = folder(org, Some(a.id), "b");
        // Corrupt the tree into a two-folder parent cycle.
        a.parent_folder_id = Some(b.id);
        store.insert_folder(a.clone());
        store.insert_folder(b.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        svc.trash_folder(a.id).await.unwrap();

        assert!(store.folder(a.id).unwrap().deleted);
        assert!(store.folder(b.id).unwrap().deleted);
    }

    #[tokio::test]
    async fn test_restore_inverts_trash_and_is_idempotent() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let a = folder(org, None, "a");
        let b = folder(org, Some(a.id), "b");
        let x = file(org, Some(b.id), "x.txt");
        store.insert_folder(a.clone());
        store.insert_folder(b.clone());
        store.insert_file(x.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        svc.trash_folder(a.id).await.unwrap();
        svc.restore_folder(a.id).await.unwrap();

        for deleted in [
            store.folder(a.id).unwrap().deleted,
            store.folder(b.id).unwrap().deleted,
            store.file(x.id).unwrap().deleted,
        ] {
            assert!(!deleted);
        }
        // deleted_at survives restore; it is irrelevant while deleted=false.
        assert!(store.file(x.id).unwrap().deleted_at.is_some());

        // Second restore matches zero rows and succeeds.
        svc.restore_folder(a.id).await.unwrap();
        assert!(!store.folder(a.id).unwrap().deleted);
    }

    #[tokio::test]
    async fn test_trash_file_idempotent() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let x = file(org, None, "x.txt");
        store.insert_file(x.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        svc.trash_file(x.id).await.unwrap();
        let first = store.file(x.id).unwrap().deleted_at;

        svc.trash_file(x.id).await.unwrap();
        assert_eq!(store.file(x.id).unwrap().deleted_at, first);
    }

    #[tokio::test]
    async fn test_purge_file_blob_failure_retains_row() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let x = file(org, None, "x.txt");
        store.insert_file(x.clone());

        let svc = service(Arc::clone(&store), Arc::new(FailingBlobStore));
        svc.trash_file(x.id).await.unwrap();

        let err = svc.purge_file(x.id).await.unwrap_err();
        assert_eq!(err.kind, silo_core::error::ErrorKind::Storage);

        let row = store.file(x.id).unwrap();
        assert!(row.deleted, "row must remain trashed after blob failure");
    }

    #[tokio::test]
    async fn test_purge_file_missing_is_not_found() {
        let store = Arc::new(MemoryTrashStore::default());
        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        let err = svc.purge_file(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, silo_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_purge_folder_deletes_blobs_then_rows() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let blobs = Arc::new(MemoryBlobStore::new());

        let a = folder(org, None, "a");
        let b = folder(org, Some(a.id), "b");
        let x = file(org, Some(b.id), "x.txt");
        let y = file(org, None, "y.txt");
        store.insert_folder(a.clone());
        store.insert_folder(b.clone());
        store.insert_file(x.clone());
        store.insert_file(y.clone());
        blobs.put(&x.file_path, vec![1]).await;
        blobs.put(&y.file_path, vec![2]).await;

        let svc = service(Arc::clone(&store), blobs.clone());
        svc.trash_folder(a.id).await.unwrap();
        svc.purge_folder(a.id).await.unwrap();

        assert!(store.folder(a.id).is_none());
        assert!(store.folder(b.id).is_none());
        assert!(store.file(x.id).is_none());
        assert!(!blobs.contains(&x.file_path).await);

        // Unrelated root file and its blob survive.
        assert!(store.file(y.id).is_some());
        assert!(blobs.contains(&y.file_path).await);
    }

    #[tokio::test]
    async fn test_purge_folder_is_never_applied_to_active_rows() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let a = folder(org, None, "a");
        let x = file(org, Some(a.id), "x.txt");
        store.insert_folder(a.clone());
        store.insert_file(x.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        // No trash first: nothing is eligible, rows stay put.
        svc.purge_folder(a.id).await.unwrap();
        assert!(store.folder(a.id).is_some());
        assert!(store.file(x.id).is_some());
    }

    #[tokio::test]
    async fn test_purge_expired_removes_exact_set() {
        let org1 = Uuid::new_v4();
        let org2 = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let blobs = Arc::new(MemoryBlobStore::new());

        let now = Utc::now();
        let mut expired_file = file(org1, None, "old.txt");
        expired_file.deleted = true;
        expired_file.deleted_at = Some(now - Duration::days(1));
        let mut pending_file = file(org2, None, "recent.txt");
        pending_file.deleted = true;
        pending_file.deleted_at = Some(now + Duration::days(10));
        let active_file = file(org1, None, "live.txt");

        let mut expired_folder = folder(org2, None, "old");
        expired_folder.deleted = true;
        expired_folder.deleted_at = Some(now - Duration::hours(1));
        let mut pending_folder = folder(org1, None, "recent");
        pending_folder.deleted = true;
        pending_folder.deleted_at = Some(now + Duration::days(29));

        store.insert_file(expired_file.clone());
        store.insert_file(pending_file.clone());
        store.insert_file(active_file.clone());
        store.insert_folder(expired_folder.clone());
        store.insert_folder(pending_folder.clone());
        blobs.put(&expired_file.file_path, vec![1]).await;
        blobs.put(&pending_file.file_path, vec![2]).await;
        blobs.put(&active_file.file_path, vec![3]).await;

        let svc = service(Arc::clone(&store), blobs.clone());
        let outcome = svc.purge_expired().await;

        assert_eq!(outcome.files_purged, 1);
        assert_eq!(outcome.files_skipped, 0);
        assert_eq!(outcome.folders_purged, 1);

        assert!(store.file(expired_file.id).is_none());
        assert!(!blobs.contains(&expired_file.file_path).await);
        assert!(store.folder(expired_folder.id).is_none());

        assert!(store.file(pending_file.id).is_some());
        assert!(blobs.contains(&pending_file.file_path).await);
        assert!(store.file(active_file.id).is_some());
        assert!(store.folder(pending_folder.id).is_some());
    }

    #[tokio::test]
    async fn test_purge_expired_blob_failure_retains_row() {
        let org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let mut expired = file(org, None, "old.txt");
        expired.deleted = true;
        expired.deleted_at = Some(Utc::now() - Duration::days(2));
        store.insert_file(expired.clone());

        let svc = service(Arc::clone(&store), Arc::new(FailingBlobStore));
        let outcome = svc.purge_expired().await;

        assert_eq!(outcome.files_purged, 0);
        assert_eq!(outcome.files_skipped, 1);
        // Row keeps satisfying the expiry predicate for the next run.
        assert!(store.file(expired.id).is_some());
    }

    #[tokio::test]
    async fn test_list_trash_top_level_only() {
        let org = Uuid::new_v4();
        let other_org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());

        let a = folder(org, None, "a");
        let b = folder(org, Some(a.id), "b");
        let x = file(org, Some(a.id), "x.txt");
        let y = file(org, None, "y.txt");
        let z = file(other_org, None, "z.txt");
        store.insert_folder(a.clone());
        store.insert_folder(b.clone());
        store.insert_file(x.clone());
        store.insert_file(y.clone());
        store.insert_file(z.clone());

        let svc = service(Arc::clone(&store), Arc::new(MemoryBlobStore::new()));
        svc.trash_folder(a.id).await.unwrap();
        svc.trash_file(y.id).await.unwrap();
        svc.trash_file(z.id).await.unwrap();

        let listing = svc.list_trash(org).await.unwrap();
        // Only the trashed root folder and root file; nested items implied.
        assert_eq!(listing.folders.len(), 1);
        assert_eq!(listing.folders[0].id, a.id);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].id, y.id);
    }

    #[tokio::test]
    async fn test_empty_trash_is_organization_scoped() {
        let org = Uuid::new_v4();
        let other_org = Uuid::new_v4();
        let store = Arc::new(MemoryTrashStore::default());
        let blobs = Arc::new(MemoryBlobStore::new());

        let a = folder(org, None, "a");
        let x = file(org, Some(a.id), "x.txt");
        let z = file(other_org, None, "z.txt");
        store.insert_folder(a.clone());
        store.insert_file(x.clone());
        store.insert_file(z.clone());
        blobs.put(&x.file_path, vec![1]).await;
        blobs.put(&z.file_path, vec![2]).await;

        let svc = service(Arc::clone(&store), blobs.clone());
        svc.trash_folder(a.id).await.unwrap();
        svc.trash_file(z.id).await.unwrap();

        let outcome = svc.empty_trash(org).await.unwrap();
        assert_eq!(outcome.files_purged, 1);
        assert_eq!(outcome.folders_purged, 1);

        assert!(store.folder(a.id).is_none());
        assert!(store.file(x.id).is_none());
        assert!(!blobs.contains(&x.file_path).await);

        // The other organization's trash is untouched.
        assert!(store.file(z.id).is_some());
        assert!(blobs.contains(&z.file_path).await);
    }
}
