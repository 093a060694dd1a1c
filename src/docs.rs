use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::videos::handler::upload_video,
        crate::modules::videos::handler::upload_status,
        crate::modules::videos::handler::get_video,
        crate::modules::subtitles::handler::generate_subtitles,
    ),
    components(
        schemas(
            crate::modules::videos::dto::UploadAccepted,
            crate::modules::videos::dto::UploadRejected,
            crate::modules::videos::dto::UploadStatusResponse,
            crate::modules::videos::model::Video,
            crate::modules::videos::model::Difficulty,
            crate::modules::subtitles::dto::GenerateSubtitlesRequest,
            crate::modules::subtitles::model::SubtitleSegment,
        )
    ),
    tags(
        (name = "Videos", description = "Video upload and ingestion pipeline"),
        (name = "Subtitles", description = "Subtitle generation")
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
