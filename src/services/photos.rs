use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

use crate::config::UploadConfig;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("file exceeds maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("file write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// File-storage collaborator for bootcamp photos. Validates type and size,
/// writes to the upload directory, returns the stored filename.
pub struct PhotoStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl PhotoStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            max_bytes: config.max_file_size_bytes,
        }
    }

    pub async fn save(
        &self,
        bootcamp_id: Uuid,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, PhotoError> {
        let ext = extension_for(content_type)
            .ok_or_else(|| PhotoError::UnsupportedType(content_type.to_string()))?;
        if bytes.len() > self.max_bytes {
            return Err(PhotoError::TooLarge {
                max: self.max_bytes,
            });
        }

        let filename = format!("photo_{}.{}", bootcamp_id, ext);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&filename), bytes).await?;
        Ok(filename)
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_image_types_are_accepted() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for("text/html"), None);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_write() {
        let store = PhotoStore {
            dir: PathBuf::from("/nonexistent"),
            max_bytes: 4,
        };
        let err = store
            .save(Uuid::new_v4(), "image/png", &[0u8; 8])
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::TooLarge { .. }));
    }
}
