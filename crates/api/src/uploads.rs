//! Listing image storage.
//!
//! [`ImageStore`] is the seam between handlers and wherever images end up:
//! [`LocalDiskStore`] writes into `UPLOAD_DIR` (served at `/uploads`) and
//! [`CloudinaryStore`] performs a signed upload to the Cloudinary CDN.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use wanderlust_db::models::listing::ImageRef;

use crate::config::{CloudinaryConfig, ServerConfig};

/// URL prefix locally stored images are served under.
pub const LOCAL_URL_PREFIX: &str = "/uploads";

/// Cloudinary folder all listing images are placed in.
pub const CLOUDINARY_FOLDER: &str = "wanderlust";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Not an image: {0}")]
    NotAnImage(String),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image host rejected upload: {0}")]
    Rejected(String),
}

/// Image types accepted for upload, with the extension stored files get.
const ACCEPTED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Extension for the declared content type, which must be one of
    /// [`ACCEPTED_IMAGE_TYPES`]. The client's file name is never consulted.
    fn image_extension(&self) -> Result<&'static str, UploadError> {
        let declared = self.content_type.as_deref().unwrap_or("unknown");
        let essence = declared.split(';').next().unwrap_or_default().trim();
        ACCEPTED_IMAGE_TYPES
            .iter()
            .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
            .map(|(_, ext)| *ext)
            .ok_or_else(|| UploadError::NotAnImage(declared.to_string()))
    }
}

/// Persists uploaded listing images and reports where they can be fetched.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, upload: ImageUpload) -> Result<ImageRef, UploadError>;

    /// Short name for logs.
    fn kind(&self) -> &'static str;
}

/// Pick the store the configuration asks for.
pub fn store_from_config(config: &ServerConfig) -> Arc<dyn ImageStore> {
    match &config.cloudinary {
        Some(cloudinary) => Arc::new(CloudinaryStore::new(cloudinary.clone())),
        None => Arc::new(LocalDiskStore::new(config.upload_dir.clone())),
    }
}

/* --------------------------------------------------------------------------
Local disk
-------------------------------------------------------------------------- */

/// Writes images under a directory using random file names.
pub struct LocalDiskStore {
    dir: PathBuf,
}

impl LocalDiskStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl ImageStore for LocalDiskStore {
    async fn store(&self, upload: ImageUpload) -> Result<ImageRef, UploadError> {
        let ext = upload.image_extension()?;
        let filename = format!("{}.{ext}", uuid::Uuid::new_v4());

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&filename), &upload.bytes).await?;
        tracing::debug!(%filename, bytes = upload.bytes.len(), "Stored image on disk");

        Ok(ImageRef {
            url: format!("{LOCAL_URL_PREFIX}/{filename}"),
            filename,
        })
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}

/* --------------------------------------------------------------------------
Cloudinary
-------------------------------------------------------------------------- */

/// Signed uploads to the Cloudinary image API.
pub struct CloudinaryStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
    public_id: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// Cloudinary request signature: the parameters sorted by name, joined as
/// `k=v&k=v`, with the API secret appended, hashed with SHA-256.
pub fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{joined}{secret}").as_bytes()))
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    async fn store(&self, upload: ImageUpload) -> Result<ImageRef, UploadError> {
        upload.image_extension()?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", CLOUDINARY_FOLDER), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let mut file = reqwest::multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone().unwrap_or_else(|| "upload".to_string()));
        if let Some(ref ct) = upload.content_type {
            file = file.mime_str(ct)?;
        }

        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", CLOUDINARY_FOLDER)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self.client.post(self.upload_url()).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected(format!("{status}: {body}")));
        }

        let uploaded: CloudinaryUploadResponse = response.json().await?;
        tracing::debug!(public_id = %uploaded.public_id, "Stored image on Cloudinary");

        Ok(ImageRef {
            url: uploaded.secure_url,
            filename: uploaded.public_id,
        })
    }

    fn kind(&self) -> &'static str {
        "cloudinary"
    }
}
