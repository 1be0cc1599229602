//! Image uploads (profile avatars, custom entity images).

use reqwest::multipart::{Form, Part};
use std::path::Path;

use crate::api::{ApiClient, ApiError};
use crate::models::UploadResponse;

/// Name of the multipart field the backend reads the file from
const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct UploadService {
    api: ApiClient,
}

impl UploadService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload an image file and return the URL the backend stored it under.
    pub async fn image(&self, path: &Path) -> Result<String, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ApiError::validation(format!("Could not read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(ApiError::validation(format!(
                "{} is not an image ({}).",
                file_name, mime
            )));
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(mime.essence_str())
            .map_err(|_| ApiError::Unexpected)?;
        let form = Form::new().part(FILE_FIELD, part);

        let response: UploadResponse = self.api.upload("/upload", form).await?;
        tracing::info!(file = %file_name, url = %response.url, "Image uploaded");
        Ok(response.url)
    }
}
