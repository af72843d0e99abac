use crate::domain::todo::driving_ports::TodoPort;
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BasicErrorResponse, DomainErrorResponse, Json, Path, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::response::ErrorResponse;
use axum::routing::get;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use uuid::Uuid;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(list_todos, get_todo, create_todo, update_todo))]
/// Defines the OpenAPI documentation for the todo API
pub struct TodoApi;
/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Adds the routes under "/todos" to the application router
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/todos",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let todo_service = domain::todo::TodoService;

                list_todos(&mut ext_cxn, &todo_service).await
            })
            .post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    create_todo(new_todo, &mut ext_cxn, &todo_service).await
                },
            ),
        )
        .route(
            "/todos/:id",
            get(
                |State(app_state): AppState, Path(todo_id): Path<Uuid>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    get_todo(todo_id, &mut ext_cxn, &todo_service).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(todo_id): Path<Uuid>,
                 Json(update): Json<dto::UpdateTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let todo_service = domain::todo::TodoService;

                    update_todo(todo_id, update, &mut ext_cxn, &todo_service).await
                },
            ),
        )
}

/// Logs a failed todo operation. Client mistakes are routine, anything else means
/// the database misbehaved.
fn log_failure(operation: &str, todo_id: Option<Uuid>, err: &domain::Error) {
    match err {
        domain::Error::Invalid(_) | domain::Error::DoesNotExist => {
            info!(operation, todo_id = ?todo_id, "Rejected todo request: {err}")
        }
        domain::Error::RetrieveFailure { .. } => {
            error!(operation, todo_id = ?todo_id, "Todo operation failed: {err:?}")
        }
    }
}

#[utoipa::path(
    get,
    path = "/todos",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "Every todo, oldest first", body = [dto::TodoItem]),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists every todo
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Vec<dto::TodoItem>>, ErrorResponse> {
    info!("Listing todos");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

    let todos = todo_service
        .list_todos(&mut *ext_cxn, &todo_reader)
        .await
        .map_err(|err| {
            log_failure("list todos", None, &err);
            DomainErrorResponse::from(err)
        })?;

    Ok(Json(todos.into_iter().map(dto::TodoItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "ID of the todo"),
    ),
    responses(
        (status = 200, description = "The requested todo", body = dto::TodoItem),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a single todo
async fn get_todo(
    todo_id: Uuid,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Getting todo {todo_id}");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

    let todo = todo_service
        .todo_by_id(todo_id, &mut *ext_cxn, &todo_reader)
        .await
        .map_err(|err| {
            log_failure("get todo", Some(todo_id), &err);
            DomainErrorResponse::from(err)
        })?;

    Ok(Json(dto::TodoItem::from(todo)))
}

#[utoipa::path(
    post,
    path = "/todos",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 200, description = "The created todo, always pending", body = dto::TodoItem),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Creates a pending todo
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Creating todo: {:?}", new_todo.todo);
    new_todo.validate().map_err(|validation_errors| {
        info!(operation = "create todo", "Rejected todo request: {validation_errors}");
        ValidationErrorResponse::from(validation_errors)
    })?;

    let domain_todo = domain::todo::NewTodo::from(new_todo);
    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

    let created = todo_service
        .create_todo(&domain_todo, &mut *ext_cxn, &todo_writer)
        .await
        .map_err(|err| {
            log_failure("create todo", None, &err);
            DomainErrorResponse::from(err)
        })?;

    Ok(Json(dto::TodoItem::from(created)))
}

#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = Uuid, Path, description = "ID of the todo"),
    ),
    request_body = dto::UpdateTodo,
    responses(
        (status = 200, description = "The todo as stored after the update", body = dto::TodoItem),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Overwrites the text and status of a todo
async fn update_todo(
    todo_id: Uuid,
    update: dto::UpdateTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<dto::TodoItem>, ErrorResponse> {
    info!("Updating todo {todo_id}");
    let domain_update = domain::todo::UpdateTodo::try_from(update).map_err(|validation_errors| {
        info!(operation = "update todo", todo_id = %todo_id, "Rejected todo request: {validation_errors}");
        ValidationErrorResponse::from(validation_errors)
    })?;

    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;
    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

    let updated = todo_service
        .update_todo(
            todo_id,
            &domain_update,
            &mut *ext_cxn,
            &todo_reader,
            &todo_writer,
        )
        .await
        .map_err(|err| {
            log_failure("update todo", Some(todo_id), &err);
            DomainErrorResponse::from(err)
        })?;

    Ok(Json(dto::TodoItem::from(updated)))
}
