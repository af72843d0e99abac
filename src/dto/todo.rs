use crate::domain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// Whether a todo has been done yet
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Pending,
    Completed,
}

impl From<domain::todo::TodoStatus> for TodoStatus {
    fn from(value: domain::todo::TodoStatus) -> Self {
        match value {
            domain::todo::TodoStatus::Pending => TodoStatus::Pending,
            domain::todo::TodoStatus::Completed => TodoStatus::Completed,
        }
    }
}

/// DTO for a todo returned from the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, Debug, PartialEq, Eq))]
pub struct TodoItem {
    #[schema(example = "5f0c3a52-4a8f-4c0e-9a57-0d1e9b8f2c11")]
    pub id: Uuid,
    #[schema(example = "buy milk")]
    pub todo: String,
    pub status: TodoStatus,
    pub date_created: DateTime<Utc>,
}

impl From<domain::todo::TodoItem> for TodoItem {
    fn from(value: domain::todo::TodoItem) -> Self {
        TodoItem {
            id: value.id,
            todo: value.text,
            status: value.status.into(),
            date_created: value.date_created,
        }
    }
}

/// DTO for creating a new todo via the API
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct NewTodo {
    #[validate(length(min = 1))]
    #[schema(example = "buy milk")]
    pub todo: String,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo { text: value.todo }
    }
}

/// DTO for overwriting a todo's text and status via the API
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[cfg_attr(test, derive(Serialize))]
pub struct UpdateTodo {
    #[validate(length(min = 1))]
    #[schema(example = "buy oat milk")]
    pub todo: String,
    /// Either "pending" or "completed"
    #[schema(example = "completed")]
    pub status: String,
}

impl TryFrom<UpdateTodo> for domain::todo::UpdateTodo {
    type Error = ValidationErrors;

    /// Validates the update and narrows the status down to a known value
    fn try_from(value: UpdateTodo) -> Result<Self, Self::Error> {
        let validation = value.validate();
        let status = value.status.parse::<domain::todo::TodoStatus>();

        match (validation, status) {
            (Ok(()), Ok(status)) => Ok(domain::todo::UpdateTodo {
                text: value.todo,
                status,
            }),
            (validation, status) => {
                let mut errors = validation.err().unwrap_or_else(ValidationErrors::new);
                if let Err(unknown) = status {
                    let mut status_error = ValidationError::new("todo_status");
                    status_error.message = Some(Cow::from(unknown.to_string()));
                    status_error.add_param(Cow::from("value"), &unknown.0);
                    errors.add("status", status_error);
                }

                Err(errors)
            }
        }
    }
}
