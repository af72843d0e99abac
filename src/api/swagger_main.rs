use crate::dto;
use utoipa::OpenApi;
use utoipa::openapi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(info(
    title = "Todo API",
    description = "Create, list, read, and update todos stored in Postgres"
))]
struct TodoRestApi;

/// The full OpenAPI document, merged from the [dto] package and submodules of [api][crate::api]
pub fn api_docs() -> openapi::OpenApi {
    let mut api_docs = TodoRestApi::openapi();
    api_docs.merge(dto::OpenApiSchemas::openapi());
    api_docs.merge(super::todo::TodoApi::openapi());

    api_docs
}

/// Constructs the route on the API that renders the swagger UI and returns the OpenAPI schema
pub fn build_documentation() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_docs())
}
