use utoipa::OpenApi;

mod todo;

pub use todo::*;

/// OpenAPI schemas for every DTO the API sends or receives
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            TodoItem,
            TodoStatus,
            NewTodo,
            UpdateTodo,
            crate::routing_utils::ExtraInfo,
            crate::routing_utils::ValidationErrorSchema,
        ),
        responses(crate::routing_utils::BasicErrorResponse),
    )
)]
pub struct OpenApiSchemas;
