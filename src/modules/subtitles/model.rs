use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One utterance span of a transcription: `start`/`end` in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubtitleSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleStatus {
    Processing,
    Completed,
    Error,
}

impl SubtitleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleStatus::Processing => "processing",
            SubtitleStatus::Completed => "completed",
            SubtitleStatus::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        for status in [
            SubtitleStatus::Processing,
            SubtitleStatus::Completed,
            SubtitleStatus::Error,
        ] {
            let encoded = serde_json::to_value(status).unwrap();
            assert_eq!(encoded, serde_json::json!(status.as_str()));
        }
    }

    #[test]
    fn segment_deserializes_from_verbose_json_shape() {
        // The speech service response carries extra per-segment fields.
        let raw = r#"{"id": 3, "start": 1.5, "end": 4.0, "text": "hola", "temperature": 0.0}"#;
        let segment: SubtitleSegment = serde_json::from_str(raw).unwrap();
        assert_eq!(segment.start, 1.5);
        assert_eq!(segment.end, 4.0);
        assert_eq!(segment.text, "hola");
    }
}
