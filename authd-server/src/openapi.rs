use utoipa::OpenApi;

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const TOKEN_TAG: &str = "Token API";
pub(crate) const USERS_TAG: &str = "User API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = TOKEN_TAG, description = "Bearer token issuance"),
        (name = USERS_TAG, description = "Demo user service endpoints"),
    ),
    info(
        title = "authd API",
        description = "Bearer-token authorization service",
        version = "0.1.0"
    )
)]
pub(crate) struct ApiDoc;
