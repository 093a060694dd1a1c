use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use super::model::Difficulty;

/// Immediate acknowledgement returned before the pipeline runs.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadAccepted {
    pub success: bool,
    #[serde(rename = "uploadId")]
    pub upload_id: String,
}

impl UploadAccepted {
    pub fn new(upload_id: String) -> Self {
        Self {
            success: true,
            upload_id,
        }
    }
}

/// Synchronous rejection: validation failed before a job was created.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadRejected {
    pub success: bool,
    pub error: String,
}

impl UploadRejected {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadStatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

/// User-supplied metadata collected from the multipart form.
#[derive(Debug, Clone, Validate)]
pub struct UploadMeta {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 2, message = "language is required"))]
    pub language: String,
    pub difficulty: Option<Difficulty>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(title: &str, language: &str) -> UploadMeta {
        UploadMeta {
            title: title.to_string(),
            description: None,
            language: language.to_string(),
            difficulty: None,
        }
    }

    #[test]
    fn title_and_language_are_required() {
        assert!(meta("Test", "en").validate().is_ok());
        assert!(meta("", "en").validate().is_err());
        assert!(meta("Test", "").validate().is_err());
    }

    #[test]
    fn accepted_response_uses_camel_case_upload_id() {
        let encoded =
            serde_json::to_value(UploadAccepted::new("upload-abc".to_string())).unwrap();
        assert_eq!(encoded["success"], true);
        assert_eq!(encoded["uploadId"], "upload-abc");
    }

    #[test]
    fn status_response_omits_empty_details() {
        let encoded = serde_json::to_value(UploadStatusResponse {
            status: "starting".to_string(),
            details: None,
        })
        .unwrap();
        assert!(encoded.get("details").is_none());
    }
}
