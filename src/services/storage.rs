//! Object storage collaborator
//!
//! Writes uploaded blobs under the configured media root and hands back the
//! public URL they will be served from. Filenames are generated, never taken
//! from the client.

use std::path::PathBuf;

use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct StorageService {
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// Store a book image blob; returns its public URL
    pub async fn store_book_image(&self, data: &[u8], ext: &str) -> AppResult<String> {
        self.store(data, "uploads/book", ext).await
    }

    async fn store(&self, data: &[u8], prefix: &str, ext: &str) -> AppResult<String> {
        let filename = format!("{}.{}", Uuid::new_v4(), ext);

        let mut dir = PathBuf::from(&self.config.media_root);
        dir.push(prefix);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create media dir: {}", e)))?;

        let path = dir.join(&filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write blob: {}", e)))?;

        Ok(format!(
            "{}/{}/{}",
            self.config.public_url.trim_end_matches('/'),
            prefix,
            filename
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_shape() {
        let service = StorageService::new(StorageConfig {
            media_root: std::env::temp_dir().display().to_string(),
            public_url: "http://localhost:8080/media/".to_string(),
        });

        let url = tokio_test::block_on(service.store_book_image(b"payload", "png")).unwrap();
        assert!(url.starts_with("http://localhost:8080/media/uploads/book/"));
        assert!(url.ends_with(".png"));
    }
}
