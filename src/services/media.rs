// src/services/media.rs
// DOCUMENTATION: Image hosting collaborator
// PURPOSE: MediaStore trait, Cloudinary signed uploads and data-URI checks

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::time::Duration;

use crate::config::Config;
use crate::errors::HorooError;

/// Incoming transformation applied to every listing image
pub const LISTING_TRANSFORMATION: &str = "c_fill,h_600,q_auto:good,w_800";

/// Largest accepted decoded image
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Parameters never included in the upload signature
const UNSIGNED_PARAMS: [&str; 5] = ["file", "api_key", "resource_type", "cloud_name", "signature"];

/// Uploads images and returns their hosted URLs
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a base64 data URI into `folder`
    async fn upload(&self, data_uri: &str, folder: &str) -> Result<String, HorooError>;
}

/// Cloudinary upload API client
pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    error: UploadErrorMessage,
}

#[derive(Debug, Deserialize)]
struct UploadErrorMessage {
    message: String,
}

impl CloudinaryClient {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        CloudinaryClient {
            client,
            cloud_name,
            api_key,
            api_secret,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.cloudinary_cloud_name.clone(),
            config.cloudinary_api_key.clone(),
            config.cloudinary_api_secret.clone(),
        )
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(&self, data_uri: &str, folder: &str) -> Result<String, HorooError> {
        if self.cloud_name.is_empty() || self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(HorooError::ExternalApiError(
                "Media storage is not configured".to_string(),
            ));
        }

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = vec![
            ("folder", folder.to_string()),
            ("timestamp", timestamp),
            ("transformation", LISTING_TRANSFORMATION.to_string()),
        ];
        let signature = sign_params(&signed, &self.api_secret);

        let mut form: Vec<(&str, String)> = signed;
        form.push(("file", data_uri.to_string()));
        form.push(("api_key", self.api_key.clone()));
        form.push(("signature", signature));

        let response = self
            .client
            .post(self.upload_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                log::error!("Cloudinary request failed: {}", e);
                HorooError::ExternalApiError(format!("Upload request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<UploadErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.to_string());
            log::error!("Cloudinary rejected upload to {}: {}", folder, message);
            return Err(HorooError::ExternalApiError(message));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            log::error!("Unreadable Cloudinary response: {}", e);
            HorooError::ExternalApiError("Invalid upload response".to_string())
        })?;

        let url = body.secure_url.or(body.url).ok_or_else(|| {
            HorooError::ExternalApiError("Upload response has no URL".to_string())
        })?;

        log::info!("Uploaded image to {}", folder);
        Ok(url)
    }
}

/// Cloudinary signature: SHA-1 hex of the sorted `key=value` pairs joined by
/// `&`, followed by the API secret
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, String)> = params
        .iter()
        .filter(|(key, value)| !UNSIGNED_PARAMS.contains(key) && !value.is_empty())
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn is_hosted_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

/// Accept `data:image/{jpg,jpeg,png,webp};base64,<payload>` up to 5 MB decoded
pub fn validate_image_data_uri(value: &str) -> Result<(), HorooError> {
    let invalid = || {
        HorooError::InvalidInput(
            "Images must be base64 data URIs of type jpg, jpeg, png or webp".to_string(),
        )
    };

    let rest = value.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (mime, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;
    if !ALLOWED_IMAGE_TYPES.contains(&mime.to_ascii_lowercase().as_str()) {
        return Err(invalid());
    }
    if payload.is_empty() {
        return Err(invalid());
    }

    if decoded_len(payload) > MAX_IMAGE_BYTES {
        return Err(HorooError::InvalidInput(
            "Image exceeds the 5 MB limit".to_string(),
        ));
    }

    Ok(())
}

fn decoded_len(payload: &str) -> usize {
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    (payload.len() / 4 * 3).saturating_sub(padding)
}

/// Resolve an optional main image: hosted URLs pass through, data URIs are
/// uploaded to `<folder>/<horooId>`
pub async fn resolve_main_image(
    store: &dyn MediaStore,
    input: Option<&str>,
    folder: &str,
    horoo_id: &str,
) -> Result<Option<String>, HorooError> {
    let input = match input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(i) => i,
        None => return Ok(None),
    };
    if is_hosted_url(input) {
        return Ok(Some(input.to_string()));
    }

    validate_image_data_uri(input)?;
    let target = format!("{}/{}", folder, horoo_id);
    store.upload(input, &target).await.map(Some).map_err(|e| {
        log::error!("Main image upload for {} failed: {}", horoo_id, e);
        HorooError::ExternalApiError("Failed to upload main image".to_string())
    })
}

/// Resolve gallery images concurrently into `<folder>/<horooId>/gallery`
pub async fn resolve_gallery(
    store: &dyn MediaStore,
    inputs: &[String],
    folder: &str,
    horoo_id: &str,
) -> Result<Vec<String>, HorooError> {
    let inputs: Vec<&str> = inputs
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    for input in inputs.iter().filter(|s| !is_hosted_url(s)) {
        validate_image_data_uri(input)?;
    }

    let target = format!("{}/{}/gallery", folder, horoo_id);
    let uploads = inputs.into_iter().map(|input| {
        let target = target.as_str();
        async move {
            if is_hosted_url(input) {
                Ok(input.to_string())
            } else {
                store.upload(input, target).await
            }
        }
    });

    try_join_all(uploads).await.map_err(|e| {
        log::error!("Gallery upload for {} failed: {}", horoo_id, e);
        HorooError::ExternalApiError("Failed to upload other images".to_string())
    })
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// In-memory store recording upload targets
    #[derive(Default)]
    pub struct RecordingStore {
        pub uploads: Mutex<Vec<String>>,
        pub fail: bool,
    }

    #[async_trait]
    impl MediaStore for RecordingStore {
        async fn upload(&self, _data_uri: &str, folder: &str) -> Result<String, HorooError> {
            if self.fail {
                return Err(HorooError::ExternalApiError("boom".to_string()));
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(folder.to_string());
            Ok(format!("https://cdn.test/{}/{}.jpg", folder, uploads.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingStore;
    use super::*;

    const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

    #[test]
    fn test_signature_matches_documented_example() {
        let params = vec![
            ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop".to_string()),
            ("public_id", "sample_image".to_string()),
            ("timestamp", "1315060510".to_string()),
        ];
        assert_eq!(
            sign_params(&params, "abcd"),
            "bfd09f95f331f558cbd1320e67aa8d488770583e"
        );
    }

    #[test]
    fn test_signature_ignores_unsigned_params_and_order() {
        let a = vec![
            ("timestamp", "1".to_string()),
            ("folder", "x".to_string()),
        ];
        let b = vec![
            ("folder", "x".to_string()),
            ("api_key", "123".to_string()),
            ("file", PNG.to_string()),
            ("timestamp", "1".to_string()),
        ];
        assert_eq!(sign_params(&a, "s"), sign_params(&b, "s"));
    }

    #[test]
    fn test_data_uri_validation() {
        assert!(validate_image_data_uri(PNG).is_ok());
        assert!(validate_image_data_uri("data:image/jpeg;base64,/9j/4AAQ").is_ok());
        assert!(validate_image_data_uri("data:image/gif;base64,R0lGOD").is_err());
        assert!(validate_image_data_uri("data:text/plain;base64,aGk=").is_err());
        assert!(validate_image_data_uri("data:image/png;base64,").is_err());
        assert!(validate_image_data_uri("iVBORw0KGgo=").is_err());
    }

    #[test]
    fn test_data_uri_size_limit() {
        let big = format!("data:image/png;base64,{}", "A".repeat(MAX_IMAGE_BYTES / 3 * 4 + 8));
        assert!(validate_image_data_uri(&big).is_err());
        let ok = format!("data:image/png;base64,{}", "A".repeat(1024));
        assert!(validate_image_data_uri(&ok).is_ok());
    }

    #[tokio::test]
    async fn test_main_image_targets_horoo_folder() {
        let store = RecordingStore::default();
        let url = resolve_main_image(&store, Some(PNG), "horoo-properties/rooms", "HRM0007")
            .await
            .unwrap();
        assert!(url.unwrap().starts_with("https://cdn.test/"));
        assert_eq!(
            store.uploads.lock().unwrap().as_slice(),
            ["horoo-properties/rooms/HRM0007"]
        );
    }

    #[tokio::test]
    async fn test_hosted_urls_pass_through() {
        let store = RecordingStore::default();
        let url = resolve_main_image(&store, Some("https://res.cloudinary.com/a.jpg"), "f", "H")
            .await
            .unwrap();
        assert_eq!(url.as_deref(), Some("https://res.cloudinary.com/a.jpg"));
        assert!(resolve_main_image(&store, None, "f", "H").await.unwrap().is_none());
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gallery_upload() {
        let store = RecordingStore::default();
        let inputs = vec![
            PNG.to_string(),
            "https://cdn.test/existing.jpg".to_string(),
            PNG.to_string(),
        ];
        let urls = resolve_gallery(&store, &inputs, "horoo-properties/flats", "HFT0002")
            .await
            .unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[1], "https://cdn.test/existing.jpg");
        let uploads = store.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 2);
        assert!(uploads.iter().all(|f| f == "horoo-properties/flats/HFT0002/gallery"));
    }

    #[tokio::test]
    async fn test_upload_failure_maps_to_bad_gateway_message() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let err = resolve_main_image(&store, Some(PNG), "f", "H").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload main image");

        let err = resolve_gallery(&store, &[PNG.to_string()], "f", "H")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload other images");
    }

    #[tokio::test]
    async fn test_invalid_data_uri_is_bad_request() {
        let store = RecordingStore::default();
        let err = resolve_main_image(&store, Some("data:image/gif;base64,AAAA"), "f", "H")
            .await
            .unwrap_err();
        assert!(matches!(err, HorooError::InvalidInput(_)));
    }
}
