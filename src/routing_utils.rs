use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;
use axum_macros::FromRequestParts;
use tracing::info;

use serde::Serialize;
use utoipa::openapi::{RefOr, Schema};
use utoipa::{openapi, ToResponse, ToSchema};

use validator::ValidationErrors;

use crate::domain;

/// Contains diagnostic information about an API failure
#[derive(Serialize, Debug, ToResponse)]
#[response(examples(
    ("Not Found" = (
        summary = "Todo could not be found (404)",
        value = json!({
            "error_code": "not_found",
            "error_description": "The requested entity could not be found.",
            "extra_info": null
        })
    )),

    ("Internal Failure" = (
        summary = "Something unexpected went wrong inside the server (500)",
        value = json!({
            "error_code": "internal_error",
            "error_description": "Could not access data to complete your request",
            "extra_info": null
        })
    )),

    ("Invalid Input" = (
        summary = "Invalid request data was passed (400)",
        value = json!({
            "error_code": "invalid_input",
            "error_description": "Submitted data was invalid.",
            "extra_info": {
                "status": [
                    {
                        "code": "todo_status",
                        "message": "\"done\" is not a recognized todo status",
                        "params": {
                            "value": "done"
                        }
                    }
                ]
            }
        })
    )),

    ("Malformed JSON" = (
        summary = "Invalid JSON passed to server (400)",
        value = json!({
            "error_code": "invalid_json",
            "error_description": "The passed request body contained malformed or unreadable JSON.",
            "extra_info": "Failed to parse the request body as JSON: EOF while parsing an object at line 4 column 0"
        })
    ))
))]
pub struct BasicErrorResponse {
    error_code: String,
    error_description: String,
    extra_info: Option<ExtraInfo>,
}

impl BasicErrorResponse {
    fn new(error_code: &str, error_description: &str, extra_info: Option<ExtraInfo>) -> Self {
        BasicErrorResponse {
            error_code: error_code.into(),
            error_description: error_description.into(),
            extra_info,
        }
    }

    fn into_response_with(self, status: StatusCode) -> Response {
        (status, axum::Json(self)).into_response()
    }
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(untagged)]
pub enum ExtraInfo {
    ValidationIssues(ValidationErrorSchema),
    Message(String),
}

/// Stand-in OpenAPI schema for [ValidationErrors] which just provides an empty object
#[derive(Serialize, Debug)]
#[serde(transparent)]
pub struct ValidationErrorSchema(ValidationErrors);

impl<'schem> ToSchema<'schem> for ValidationErrorSchema {
    fn schema() -> (&'schem str, RefOr<Schema>) {
        (
            "ValidationErrorSchema",
            openapi::ObjectBuilder::new().into(),
        )
    }
}

fn not_found() -> Response {
    BasicErrorResponse::new(
        "not_found",
        "The requested entity could not be found.",
        None,
    )
    .into_response_with(StatusCode::NOT_FOUND)
}

fn internal_error() -> Response {
    BasicErrorResponse::new(
        "internal_error",
        "Could not access data to complete your request",
        None,
    )
    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Response type that turns domain errors into [BasicErrorResponse]s. Failure details
/// stay out of the body, handlers are expected to log them.
pub struct DomainErrorResponse(pub domain::Error);

impl IntoResponse for DomainErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            domain::Error::Invalid(errors) => ValidationErrorResponse(errors).into_response(),
            domain::Error::DoesNotExist => not_found(),
            domain::Error::RetrieveFailure { .. } => internal_error(),
        }
    }
}

impl From<domain::Error> for DomainErrorResponse {
    fn from(value: domain::Error) -> Self {
        Self(value)
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse(ValidationErrors);

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::new(
            "invalid_input",
            "Submitted data was invalid.",
            Some(ExtraInfo::ValidationIssues(ValidationErrorSchema(self.0))),
        )
        .into_response_with(StatusCode::BAD_REQUEST)
    }
}

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        let parse_problem = value.body_text();
        info!(error_code = "invalid_json", "Rejected request body: {parse_problem}");

        JsonErrorResponse { parse_problem }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::new(
            "invalid_json",
            "The passed request body contained malformed or unreadable JSON.",
            Some(ExtraInfo::Message(self.parse_problem)),
        )
        .into_response_with(StatusCode::BAD_REQUEST)
    }
}

/// Wrapper for [axum::extract::Path] which reports unparseable path segments (such as
/// an ID that isn't a UUID) with our data structure for API errors
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(PathErrorResponse))]
pub struct Path<T>(pub T);

/// Response type representing path parameters that couldn't be parsed
pub struct PathErrorResponse {
    parse_problem: String,
}

impl From<PathRejection> for PathErrorResponse {
    fn from(value: PathRejection) -> Self {
        let parse_problem = value.body_text();
        info!(error_code = "invalid_input", "Rejected request path: {parse_problem}");

        PathErrorResponse { parse_problem }
    }
}

impl IntoResponse for PathErrorResponse {
    fn into_response(self) -> Response {
        BasicErrorResponse::new(
            "invalid_input",
            "The request path contained an invalid identifier.",
            Some(ExtraInfo::Message(self.parse_problem)),
        )
        .into_response_with(StatusCode::BAD_REQUEST)
    }
}
