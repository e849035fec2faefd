//! Voucher file storage
//!
//! Uploaded allocation, return and repair vouchers are written beneath the
//! configured upload directory. PDFs go to `pdfs/`, everything else to
//! `vouchers/`. The returned key is relative to the upload directory and is
//! what gets stored on the record; files are served under `/uploads/<key>`.
//! Keys carry a random suffix and files are never overwritten.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// File received in a multipart form
#[derive(Debug, Clone)]
pub struct VoucherUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct VoucherStore {
    root: PathBuf,
}

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`, with no directory
/// components and no leading dots.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw);
    let mut cleaned = String::with_capacity(base.len());
    let mut pending_separator = false;

    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            if pending_separator && !cleaned.is_empty() {
                cleaned.push('_');
            }
            pending_separator = false;
            cleaned.push(ch);
        } else if ch.is_whitespace() {
            pending_separator = true;
        }
    }

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');
    if trimmed.is_empty() {
        "voucher".to_string()
    } else {
        trimmed.to_string()
    }
}

fn subdirectory_for(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".pdf") {
        "pdfs"
    } else {
        "vouchers"
    }
}

impl VoucherStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh relative key for a file name.
    fn key_for(file_name: &str) -> String {
        let name = sanitize_file_name(file_name);
        let token = Uuid::new_v4().simple().to_string();
        format!(
            "{}/{}_{}_{}",
            subdirectory_for(&name),
            Utc::now().format("%Y%m%d_%H%M%S"),
            &token[..8],
            name
        )
    }

    /// Write an upload and return its relative key
    pub async fn save(&self, upload: &VoucherUpload) -> AppResult<String> {
        if upload.bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded voucher is empty".to_string()));
        }

        let key = Self::key_for(&upload.file_name);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        file.write_all(&upload.bytes).await?;
        file.sync_all().await?;

        tracing::debug!(key = %key, size = upload.bytes.len(), "Stored voucher");
        Ok(key)
    }

    /// Store an optional upload
    pub async fn save_optional(&self, upload: Option<&VoucherUpload>) -> AppResult<Option<String>> {
        match upload {
            Some(upload) => self.save(upload).await.map(Some),
            None => Ok(None),
        }
    }

    /// Remove a file written for a mutation that did not commit
    pub async fn discard(&self, key: Option<&str>) {
        let Some(key) = key else { return };
        if let Err(e) = fs::remove_file(self.root.join(key)).await {
            tracing::warn!(key = %key, error = %e, "Could not remove orphaned voucher");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_directories_and_unsafe_characters() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\voucher.pdf"), "voucher.pdf");
        assert_eq!(sanitize_file_name("my allocation form (1).pdf"), "my_allocation_form_1.pdf");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name("???"), "voucher");
    }

    #[test]
    fn pdfs_and_other_files_go_to_separate_folders() {
        assert!(VoucherStore::key_for("Form.PDF").starts_with("pdfs/"));
        assert!(VoucherStore::key_for("scan.jpg").starts_with("vouchers/"));
        assert!(VoucherStore::key_for("scan.jpg").ends_with("_scan.jpg"));
    }

    #[tokio::test]
    async fn saves_and_discards_files() {
        let root = std::env::temp_dir().join(format!("itam-vouchers-{}", std::process::id()));
        let store = VoucherStore::new(&root);

        let key = store
            .save(&VoucherUpload {
                file_name: "return voucher.pdf".to_string(),
                bytes: b"%PDF-1.4".to_vec(),
            })
            .await
            .unwrap();

        assert!(key.starts_with("pdfs/"));
        assert!(key.ends_with("_return_voucher.pdf"));
        assert_eq!(tokio::fs::read(root.join(&key)).await.unwrap(), b"%PDF-1.4");

        store.discard(Some(&key)).await;
        assert!(!root.join(&key).exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[test]
    fn keys_for_the_same_name_differ() {
        assert_ne!(VoucherStore::key_for("scan.jpg"), VoucherStore::key_for("scan.jpg"));
    }

    #[tokio::test]
    async fn same_name_uploads_keep_both_files() {
        let root = std::env::temp_dir().join(format!("itam-vouchers-dup-{}", std::process::id()));
        let store = VoucherStore::new(&root);
        let upload = |bytes: &[u8]| VoucherUpload {
            file_name: "allocation.pdf".to_string(),
            bytes: bytes.to_vec(),
        };

        let first = store.save(&upload(b"first")).await.unwrap();
        let second = store.save(&upload(b"second")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(root.join(&first)).await.unwrap(), b"first");
        assert_eq!(tokio::fs::read(root.join(&second)).await.unwrap(), b"second");

        store.discard(Some(&second)).await;
        assert!(root.join(&first).exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let store = VoucherStore::new(std::env::temp_dir());
        let result = store
            .save(&VoucherUpload {
                file_name: "empty.pdf".to_string(),
                bytes: Vec::new(),
            })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
