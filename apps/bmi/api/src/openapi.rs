use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::ErrorCode)
    ),
    info(
        title = "BMI API",
        version = "0.1.0",
        description = "Calculate, store, classify and search body-mass index measurements"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/bmi", api = domain_bmi::ApiDoc)
    )
)]
pub struct ApiDoc;
