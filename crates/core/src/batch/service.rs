//! Sequential batch processing with per-unit failure isolation.

use bytes::Bytes;
use tracing::{error, info};

use super::error::UnitError;
use super::types::{BatchResult, UnitFailure, UnitOutcome, UploadUnit};
use crate::source::{ExternalFileReference, FileSource, SourceResolver};
use crate::storage::{AzureBlobStore, ObjectStore, StorageRouter};

/// Runs every unit of a request through validation, optional resolution and
/// the storage router. One unit's failure never affects another.
pub struct UploadBatch<R = AzureBlobStore> {
    router: StorageRouter<R>,
    max_file_size: u64,
}

impl<R: ObjectStore> UploadBatch<R> {
    /// Create a batch processor.
    #[must_use]
    pub fn new(router: StorageRouter<R>, max_file_size: u64) -> Self {
        Self {
            router,
            max_file_size,
        }
    }

    /// Store directly uploaded files, in order.
    pub async fn store_units(&self, units: Vec<UploadUnit>) -> BatchResult {
        let mut results = Vec::with_capacity(units.len());
        for unit in units {
            results.push(self.store_unit(unit).await);
        }

        let batch = BatchResult { results };
        info!(
            total = batch.len(),
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            "Direct upload batch completed"
        );
        batch
    }

    /// Resolve each reference through `resolver` and store it, in order.
    pub async fn store_references<S: FileSource>(
        &self,
        resolver: &SourceResolver<S>,
        references: &[ExternalFileReference],
    ) -> BatchResult {
        let mut results = Vec::with_capacity(references.len());
        for reference in references {
            results.push(self.resolve_and_store(resolver, reference).await);
        }

        let batch = BatchResult { results };
        info!(
            total = batch.len(),
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            "SharePoint upload batch completed"
        );
        batch
    }

    async fn store_unit(&self, unit: UploadUnit) -> UnitOutcome {
        let file_name = unit.file_name.trim();
        if file_name.is_empty() {
            return failure("unknown", &UnitError::MissingFileName);
        }
        if let Err(e) = self.check_content(&unit.content) {
            return failure(file_name, &e);
        }

        UnitOutcome::Stored(self.router.store(unit.content, file_name).await)
    }

    async fn resolve_and_store<S: FileSource>(
        &self,
        resolver: &SourceResolver<S>,
        reference: &ExternalFileReference,
    ) -> UnitOutcome {
        let Some(valid) = reference.validate() else {
            return failure(
                &reference.label(),
                &UnitError::MissingFields(reference.missing_fields()),
            );
        };

        let content = match resolver
            .fetch(valid.site_id, valid.drive_id, valid.item_id)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                error!(
                    file_name = %valid.file_name,
                    item_id = %valid.item_id,
                    error = %e,
                    "SharePoint fetch failed"
                );
                return failure(valid.file_name, &UnitError::from(e));
            }
        };

        if let Err(e) = self.check_content(&content) {
            return failure(valid.file_name, &e);
        }

        UnitOutcome::Stored(self.router.store(content, valid.file_name).await)
    }

    fn check_content(&self, content: &Bytes) -> Result<(), UnitError> {
        if content.is_empty() {
            return Err(UnitError::EmptyFile);
        }

        let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
        if size > self.max_file_size {
            return Err(UnitError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }
}

fn failure(file_name: &str, err: &UnitError) -> UnitOutcome {
    UnitOutcome::Failed(UnitFailure::new(file_name, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FakeSource;
    use crate::storage::{FakeStore, LocalStore, StorageKind};

    fn batch_in(dir: &std::path::Path, store: Option<FakeStore>) -> UploadBatch<FakeStore> {
        UploadBatch::new(StorageRouter::new(store, LocalStore::new(dir)), 1024)
    }

    fn stored(outcome: &UnitOutcome) -> &crate::storage::StorageResult {
        match outcome {
            UnitOutcome::Stored(result) => result,
            other => panic!("expected stored outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_direct_batch_preserves_order_around_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = batch_in(dir.path(), None);

        let result = batch
            .store_units(vec![
                UploadUnit::new("a.txt", b"alpha".to_vec()),
                UploadUnit::new("b.txt", Vec::<u8>::new()),
                UploadUnit::new("c.txt", b"gamma".to_vec()),
            ])
            .await;

        assert_eq!(result.len(), 3);
        assert!(result.results[0].is_success());
        assert_eq!(result.results[0].file_name(), "a.txt");
        assert_eq!(
            result.results[1],
            UnitOutcome::Failed(UnitFailure::new("b.txt", "file is empty"))
        );
        assert!(result.results[2].is_success());
        assert_eq!(result.results[2].file_name(), "c.txt");
    }

    #[tokio::test]
    async fn test_oversized_unit_never_reaches_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FakeStore::default();
        let batch = batch_in(dir.path(), Some(store.clone()));

        let result = batch
            .store_units(vec![UploadUnit::new("big.bin", vec![0u8; 2048])])
            .await;

        assert!(!result.results[0].is_success());
        assert_eq!(store.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_file_name_is_unit_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = batch_in(dir.path(), None);

        let result = batch
            .store_units(vec![UploadUnit::new("  ", b"x".to_vec())])
            .await;

        assert_eq!(
            result.results[0],
            UnitOutcome::Failed(UnitFailure::new("unknown", "file name is required"))
        );
    }

    #[tokio::test]
    async fn test_reference_batch_isolates_fetch_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FakeStore::default();
        let batch = batch_in(dir.path(), Some(store.clone()));
        let source = FakeSource {
            missing: vec!["item-b".to_string()],
            ..FakeSource::default()
        };
        let resolver = SourceResolver::new(Some(source.clone()));

        let refs = vec![
            ExternalFileReference::new("s", "d", "item-a", "a.docx"),
            ExternalFileReference::new("s", "d", "item-b", "b.docx"),
            ExternalFileReference::new("s", "d", "item-c", "c.docx"),
        ];
        let result = batch.store_references(&resolver, &refs).await;

        assert_eq!(result.len(), 3);
        assert_eq!(stored(&result.results[0]).storage, StorageKind::Blob);
        assert_eq!(result.results[1].file_name(), "b.docx");
        assert!(!result.results[1].is_success());
        assert_eq!(stored(&result.results[2]).file_name, "c.docx");
        assert_eq!(source.call_count(), 3);
        // ensure_container + put for a and c only
        assert_eq!(store.call_count(), 4);
    }

    #[tokio::test]
    async fn test_missing_item_id_skips_fetch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = batch_in(dir.path(), None);
        let source = FakeSource::default();
        let resolver = SourceResolver::new(Some(source.clone()));

        let incomplete = ExternalFileReference {
            item_id: None,
            ..ExternalFileReference::new("s", "d", "unused", "a.docx")
        };
        let result = batch.store_references(&resolver, &[incomplete]).await;

        assert_eq!(
            result.results[0],
            UnitOutcome::Failed(UnitFailure::new(
                "a.docx",
                "missing required fields: itemId"
            ))
        );
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_resolver_fails_each_unit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = batch_in(dir.path(), None);
        let resolver = SourceResolver::<FakeSource>::new(None);

        let refs = vec![
            ExternalFileReference::new("s", "d", "i1", "a.docx"),
            ExternalFileReference::new("s", "d", "i2", "b.docx"),
        ];
        let result = batch.store_references(&resolver, &refs).await;

        assert_eq!(result.failed(), 2);
        assert!(matches!(
            &result.results[0],
            UnitOutcome::Failed(f) if f.error == "SharePoint credentials are not configured"
        ));
    }

    #[tokio::test]
    async fn test_fetched_bytes_land_in_local_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let batch = batch_in(dir.path(), Some(FakeStore::failing()));
        let resolver = SourceResolver::new(Some(FakeSource::default()));

        let refs = [ExternalFileReference::new("s", "d", "item-x", "x.txt")];
        let result = batch.store_references(&resolver, &refs).await;

        let outcome = stored(&result.results[0]);
        assert_eq!(outcome.storage, StorageKind::Local);
        assert!(outcome.success);
        let written = std::fs::read(&outcome.location).expect("fallback file exists");
        assert_eq!(written, b"content of item-x");
    }
}
