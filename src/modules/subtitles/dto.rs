use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Regenerate subtitles for an already-published video.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateSubtitlesRequest {
    pub video_id: Uuid,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: String,
    #[validate(length(min = 2, message = "language is required"))]
    pub language: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str, language: &str) -> GenerateSubtitlesRequest {
        GenerateSubtitlesRequest {
            video_id: Uuid::new_v4(),
            video_url: url.to_string(),
            language: language.to_string(),
            description: None,
        }
    }

    #[test]
    fn validates_url_and_language() {
        assert!(request("https://cdn.example.com/v.mp4", "en").validate().is_ok());
        assert!(request("not a url", "en").validate().is_err());
        assert!(request("https://cdn.example.com/v.mp4", "").validate().is_err());
    }
}
