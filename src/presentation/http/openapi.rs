// src/presentation/http/openapi.rs
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::authorize::authorize,
        crate::presentation::http::controllers::callback::callback,
        crate::presentation::http::controllers::token::token,
        crate::presentation::http::controllers::introspect::introspect,
        crate::presentation::http::controllers::introspect::revoke,
        crate::presentation::http::controllers::discovery::authorization_server_metadata,
        crate::presentation::http::controllers::discovery::protected_resource_metadata,
        super::routes::health
    ),
    components(schemas(
        StatusResponse,
        crate::presentation::http::error::ErrorResponse,
        crate::application::dto::TokenResponseDto,
        crate::application::dto::IntrospectionDto,
        crate::presentation::http::controllers::token::TokenRequest,
        crate::presentation::http::controllers::introspect::TokenParam,
        crate::presentation::http::controllers::discovery::AuthorizationServerMetadata,
        crate::presentation::http::controllers::discovery::ProtectedResourceMetadata,
    )),
    tags(
        (name = "OAuth", description = "Authorization code proxy endpoints"),
        (name = "Discovery", description = "Well-known metadata documents"),
        (name = "System", description = "Service plumbing")
    )
)]
pub struct ApiDoc;

/// Serves the generated OpenAPI document. The gateway's surface is consumed
/// by machines, so no interactive docs UI is mounted.
pub fn docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
