use async_trait::async_trait;
use kernel::media::ImageStore;
use serde::Deserialize;
use shared::{
    config::CloudinaryConfig,
    error::{AppError, AppResult},
};

/// Unsigned upload against the Cloudinary REST endpoint. The caller stores the
/// returned `secure_url` instead of the client-supplied reference.
pub struct CloudinaryImageStore {
    client: reqwest::Client,
    endpoint: String,
    upload_preset: String,
}

impl CloudinaryImageStore {
    pub fn new(config: &CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                config.cloud_name
            ),
            upload_preset: config.upload_preset.clone(),
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, source: &str) -> AppResult<String> {
        let params = [
            ("file", source),
            ("upload_preset", self.upload_preset.as_str()),
            ("folder", "events"),
        ];
        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(AppError::ImageUploadError)?
            .error_for_status()
            .map_err(AppError::ImageUploadError)?;
        let body: UploadResponse = response.json().await.map_err(AppError::ImageUploadError)?;
        Ok(body.secure_url)
    }
}
