use super::client::MultipartForm;
use super::{ApiClient, ApiError, ApiResult, path_segment};
use crate::models::{CitizenReport, ReviewType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const MAX_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_REVIEW_TEXT: usize = 10;
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageUpload {
    pub filename: String,
    pub file_path: String,
    pub file_size: u64,
    pub upload_timestamp: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ApiError::InvalidInput(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { file_name, bytes })
    }

    /// MIME type from the content, falling back to the file extension.
    fn mime(&self) -> &'static str {
        image::guess_format(&self.bytes)
            .or_else(|_| image::ImageFormat::from_path(&self.file_name))
            .map(|format| format.to_mime_type())
            .unwrap_or("application/octet-stream")
    }

    fn validate(&self) -> ApiResult<()> {
        let extension = Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(ApiError::InvalidInput(format!(
                "Invalid file type for {}. Allowed types: {}",
                self.file_name,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::InvalidInput(format!(
                "{} is too large. Maximum size: {}MB",
                self.file_name,
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

/// Everything a citizen enters on the review form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub reporter_name: Option<String>,
    pub reporter_contact: Option<String>,
    pub review_type: ReviewType,
    pub review_text: String,
    pub work_completed: bool,
    pub quality_rating: Option<u8>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub images: Vec<ImageFile>,
}

impl ReviewDraft {
    pub fn new(review_type: ReviewType, review_text: impl Into<String>, work_completed: bool) -> Self {
        Self {
            reporter_name: None,
            reporter_contact: None,
            review_type,
            review_text: review_text.into(),
            work_completed,
            quality_rating: None,
            latitude: None,
            longitude: None,
            images: Vec::new(),
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.review_text.trim().chars().count() < MIN_REVIEW_TEXT {
            return Err(ApiError::InvalidInput(format!(
                "Review text must be at least {} characters",
                MIN_REVIEW_TEXT
            )));
        }
        if let Some(rating) = self.quality_rating {
            if !(1..=5).contains(&rating) {
                return Err(ApiError::InvalidInput(
                    "Quality rating must be between 1 and 5".to_string(),
                ));
            }
        }
        validate_images(&self.images)
    }

    fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .optional_text("reporter_name", self.reporter_name)
            .optional_text("reporter_contact", self.reporter_contact)
            .text("review_type", self.review_type.as_str())
            .text("review_text", self.review_text)
            .text("work_completed", self.work_completed.to_string())
            .optional_text("quality_rating", self.quality_rating.map(|r| r.to_string()));

        // The backend only records a location when both coordinates are set.
        if let (Some(lat), Some(lng)) = (self.latitude, self.longitude) {
            form = form
                .text("latitude", lat.to_string())
                .text("longitude", lng.to_string());
        }

        for image in self.images {
            let mime = image.mime();
            form = form.file("images", &image.file_name, mime, image.bytes);
        }
        form
    }
}

fn validate_images(images: &[ImageFile]) -> ApiResult<()> {
    if images.len() > MAX_IMAGES {
        return Err(ApiError::InvalidInput(format!(
            "Maximum {} images allowed per submission",
            MAX_IMAGES
        )));
    }
    images.iter().try_for_each(ImageFile::validate)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewSubmission {
    pub review_id: String,
    pub project_id: String,
    pub message: String,
    pub review: CitizenReport,
    #[serde(default)]
    pub uploaded_images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectReviews {
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub total_reviews: usize,
    #[serde(default)]
    pub reviews: Vec<CitizenReport>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewSummary {
    pub project_id: String,
    #[serde(default)]
    pub project_name: Option<String>,
    pub total_reviews: usize,
    #[serde(default)]
    pub work_completed_percentage: Option<f64>,
    #[serde(default)]
    pub average_quality_rating: Option<f64>,
    #[serde(default)]
    pub review_type_breakdown: BTreeMap<String, usize>,
    #[serde(default)]
    pub reviews_with_images: usize,
    #[serde(default)]
    pub verified_reviews: usize,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteImageResponse {
    pub message: String,
}

/// Reviews sub-API. None of these endpoints have offline data; every error
/// reaches the caller.
#[derive(Clone)]
pub struct ReviewsApi {
    client: ApiClient,
}

impl ReviewsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn upload_image(&self, image: ImageFile) -> ApiResult<ImageUpload> {
        image.validate()?;
        let mime = image.mime();
        let form = MultipartForm::new().file("file", &image.file_name, mime, image.bytes);
        self.client
            .post_multipart("/api/reviews/upload-image", form)
            .await
    }

    pub async fn upload_images(&self, images: Vec<ImageFile>) -> ApiResult<Vec<ImageUpload>> {
        if images.is_empty() {
            return Ok(Vec::new());
        }
        validate_images(&images)?;
        let mut form = MultipartForm::new();
        for image in images {
            let mime = image.mime();
            form = form.file("files", &image.file_name, mime, image.bytes);
        }
        self.client
            .post_multipart("/api/reviews/upload-images", form)
            .await
    }

    pub async fn submit_review_with_images(
        &self,
        project_id: &str,
        draft: ReviewDraft,
    ) -> ApiResult<ReviewSubmission> {
        let project_id = path_segment("project id", project_id)?;
        draft.validate()?;
        let endpoint = format!("/api/reviews/{}/submit", project_id);
        self.client
            .post_multipart(&endpoint, draft.into_form())
            .await
    }

    pub async fn get_review(&self, project_id: &str, review_id: &str) -> ApiResult<CitizenReport> {
        let endpoint = format!(
            "/api/reviews/{}/review/{}",
            path_segment("project id", project_id)?,
            path_segment("review id", review_id)?
        );
        self.client.get(&endpoint).await
    }

    pub async fn get_all_reviews(&self, project_id: &str) -> ApiResult<ProjectReviews> {
        let endpoint = format!("/api/reviews/{}/all", path_segment("project id", project_id)?);
        self.client.get(&endpoint).await
    }

    pub async fn get_review_summary(&self, project_id: &str) -> ApiResult<ReviewSummary> {
        let endpoint = format!(
            "/api/reviews/{}/summary",
            path_segment("project id", project_id)?
        );
        self.client.get(&endpoint).await
    }

    pub async fn delete_image(&self, filename: &str) -> ApiResult<DeleteImageResponse> {
        let endpoint = format!("/api/reviews/image/{}", path_segment("image name", filename)?);
        self.client.delete(&endpoint).await
    }

    /// Path of an uploaded image, relative to the API base URL.
    pub fn image_path(filename: &str) -> String {
        let name = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| filename.to_string());
        format!("/api/reviews/image/{}", name)
    }
}
