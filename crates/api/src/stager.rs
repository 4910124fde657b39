//! Asset staging: durable file writes ahead of the relational commit.
//!
//! The stager is a side-effecting leaf with no knowledge of the relational
//! schema. It owns the physical file lifetime, but whether a staged file
//! becomes a referenced asset row or gets discarded is the coordinator's
//! commit decision.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use propstack_core::error::CoreError;
use propstack_core::naming::generate_storage_name;
use propstack_db::models::listing_asset::AssetRole;

use crate::config::UploadConfig;

/// One uploaded file as parsed from a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-declared filename; only its extension is trusted.
    pub declared_name: String,
    pub bytes: Vec<u8>,
}

/// All files supplied by one request: the gallery array plus at most one
/// file per named slot.
#[derive(Debug, Clone, Default)]
pub struct UploadSet {
    pub gallery: Vec<Upload>,
    pub slots: Vec<(AssetRole, Upload)>,
}

impl UploadSet {
    pub fn is_empty(&self) -> bool {
        self.gallery.is_empty() && self.slots.is_empty()
    }
}

/// A staged file: written to the store, not yet referenced by any row.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Absolute location on disk, used for compensating cleanup.
    pub disk_path: PathBuf,
    /// The value persisted in `listing_assets.path`, resolvable under the
    /// public URL prefix.
    pub public_path: String,
}

/// The staged counterpart of an [`UploadSet`].
#[derive(Debug, Clone, Default)]
pub struct StagedUploads {
    pub gallery: Vec<StagedFile>,
    pub slots: Vec<(AssetRole, StagedFile)>,
}

impl StagedUploads {
    /// All staged files regardless of role, for compensating cleanup.
    pub fn all_files(&self) -> impl Iterator<Item = &StagedFile> {
        self.gallery
            .iter()
            .chain(self.slots.iter().map(|(_, file)| file))
    }

    /// Gallery rows ready for bulk insert.
    pub fn gallery_rows(&self) -> Vec<(AssetRole, String)> {
        self.gallery
            .iter()
            .map(|file| (AssetRole::Gallery, file.public_path.clone()))
            .collect()
    }
}

/// Writes uploaded payloads into the asset store under collision-resistant
/// names.
#[derive(Debug)]
pub struct AssetStager {
    root_dir: PathBuf,
    public_prefix: String,
    max_file_bytes: usize,
    max_gallery_files: usize,
}

impl AssetStager {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            root_dir: config.root_dir.clone(),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
            max_file_bytes: config.max_file_bytes,
            max_gallery_files: config.max_gallery_files,
        }
    }

    /// Create the store root if it does not exist. Called once at startup.
    pub async fn ensure_root(&self) -> Result<(), CoreError> {
        tokio::fs::create_dir_all(&self.root_dir)
            .await
            .map_err(|e| {
                CoreError::StorageUnavailable(format!(
                    "Cannot create upload root {}: {e}",
                    self.root_dir.display()
                ))
            })
    }

    /// Stage a single payload: size check, unique name, durable write.
    ///
    /// The payload is rejected before any write when it exceeds the size
    /// limit. The write is flushed to disk before returning so a staged
    /// handle always points at durable bytes.
    pub async fn stage(&self, payload: &[u8], declared_name: &str) -> Result<StagedFile, CoreError> {
        if payload.len() > self.max_file_bytes {
            return Err(CoreError::Validation(format!(
                "File '{declared_name}' exceeds the {} byte upload limit",
                self.max_file_bytes
            )));
        }

        let storage_name = generate_storage_name(declared_name);
        let disk_path = self.root_dir.join(&storage_name);

        let mut file = tokio::fs::File::create(&disk_path)
            .await
            .map_err(|e| CoreError::StorageUnavailable(e.to_string()))?;
        file.write_all(payload)
            .await
            .map_err(|e| CoreError::StorageUnavailable(e.to_string()))?;
        file.sync_all()
            .await
            .map_err(|e| CoreError::StorageUnavailable(e.to_string()))?;

        Ok(StagedFile {
            disk_path,
            public_path: format!("{}/{storage_name}", self.public_prefix),
        })
    }

    /// Stage every file in the set, enforcing per-request limits before
    /// anything touches disk.
    ///
    /// On a mid-set failure the files already staged are handed back inside
    /// the error so the caller can discard them; no transaction has been
    /// opened at this point.
    pub async fn stage_all(&self, uploads: &UploadSet) -> Result<StagedUploads, StageError> {
        if uploads.gallery.len() > self.max_gallery_files {
            return Err(StageError {
                error: CoreError::Validation(format!(
                    "At most {} gallery images per request, got {}",
                    self.max_gallery_files,
                    uploads.gallery.len()
                )),
                staged: StagedUploads::default(),
            });
        }
        for (idx, (role, _)) in uploads.slots.iter().enumerate() {
            if uploads.slots[..idx].iter().any(|(r, _)| r == role) {
                return Err(StageError {
                    error: CoreError::Validation(format!(
                        "Slot '{}' supplied more than once",
                        role.as_str()
                    )),
                    staged: StagedUploads::default(),
                });
            }
        }

        let mut staged = StagedUploads::default();
        for upload in &uploads.gallery {
            match self.stage(&upload.bytes, &upload.declared_name).await {
                Ok(file) => staged.gallery.push(file),
                Err(error) => return Err(StageError { error, staged }),
            }
        }
        for (role, upload) in &uploads.slots {
            match self.stage(&upload.bytes, &upload.declared_name).await {
                Ok(file) => staged.slots.push((*role, file)),
                Err(error) => return Err(StageError { error, staged }),
            }
        }
        Ok(staged)
    }

    /// Best-effort compensating delete of staged files.
    ///
    /// The filesystem has no transactional rollback, so this is a separate,
    /// non-atomic cleanup. A failure here is logged and otherwise ignored;
    /// the leaked file is tolerated.
    pub async fn discard<'a>(&self, files: impl Iterator<Item = &'a StagedFile>) {
        for file in files {
            if let Err(e) = tokio::fs::remove_file(&file.disk_path).await {
                tracing::warn!(
                    path = %file.disk_path.display(),
                    error = %e,
                    "Failed to remove staged file; leaking it"
                );
            }
        }
    }

    /// Best-effort removal of a committed asset's file, given its stored
    /// public path. Used after a listing delete commits.
    pub async fn remove_by_public_path(&self, public_path: &str) {
        let Some(name) = public_path.strip_prefix(&format!("{}/", self.public_prefix)) else {
            tracing::warn!(path = %public_path, "Stored path outside the upload prefix; skipping");
            return;
        };
        // Stored names never contain separators, but never follow one out
        // of the root if a corrupted path shows up.
        if name.contains('/') || name.contains("..") {
            tracing::warn!(path = %public_path, "Suspicious stored path; skipping");
            return;
        }
        let disk_path = self.root_dir.join(name);
        if let Err(e) = tokio::fs::remove_file(&disk_path).await {
            tracing::warn!(path = %disk_path.display(), error = %e, "Failed to remove asset file");
        }
    }
}

/// Staging failure plus whatever was written before it, for cleanup.
#[derive(Debug)]
pub struct StageError {
    pub error: CoreError,
    pub staged: StagedUploads,
}
