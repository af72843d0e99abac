use crate::domain;
use crate::domain::todo::driven_ports::{TodoReader, TodoWriter};
use crate::external_connections::ExternalConnectivity;
use chrono::{DateTime, Utc};
use derive_more::Display;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Progress of a todo. Stored as lowercase text.
#[derive(Debug, Display, Default, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    #[default]
    #[display("pending")]
    Pending,
    #[display("completed")]
    Completed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0:?} is not a recognized todo status")]
pub struct UnknownStatus(pub String);

impl FromStr for TodoStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct TodoItem {
    pub id: Uuid,
    pub text: String,
    pub status: TodoStatus,
    pub date_created: DateTime<Utc>,
}

#[derive(Debug, Clone, Validate)]
pub struct NewTodo {
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateTodo {
    #[validate(length(min = 1))]
    pub text: String,
    pub status: TodoStatus,
}

pub mod driven_ports {
    use super::*;

    pub trait TodoReader {
        /// Every todo, oldest first
        async fn all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<TodoItem>, anyhow::Error>;
        async fn by_id(
            &self,
            id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<TodoItem>, anyhow::Error>;
    }

    pub trait TodoWriter {
        /// Stores a new pending todo and returns it with its server-assigned fields
        async fn create(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<TodoItem, anyhow::Error>;

        /// Overwrites text and status. Updating a missing todo is not an error here.
        async fn update(
            &self,
            id: Uuid,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait TodoPort {
        async fn list_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
        ) -> Result<Vec<TodoItem>, domain::Error>;
        async fn todo_by_id(
            &self,
            id: Uuid,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
        ) -> Result<TodoItem, domain::Error>;
        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl TodoWriter,
        ) -> Result<TodoItem, domain::Error>;
        async fn update_todo(
            &self,
            id: Uuid,
            update: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl TodoReader,
            todo_write: &impl TodoWriter,
        ) -> Result<TodoItem, domain::Error>;
    }
}

pub struct TodoService;

impl driving_ports::TodoPort for TodoService {
    async fn list_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<Vec<TodoItem>, domain::Error> {
        todo_read
            .all(&mut *ext_cxn)
            .await
            .map_err(domain::Error::port_failure("list todos"))
    }

    async fn todo_by_id(
        &self,
        id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
    ) -> Result<TodoItem, domain::Error> {
        todo_read
            .by_id(id, &mut *ext_cxn)
            .await
            .map_err(domain::Error::port_failure("fetch a todo"))?
            .ok_or(domain::Error::DoesNotExist)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoItem, domain::Error> {
        new_todo.validate()?;

        todo_write
            .create(new_todo, &mut *ext_cxn)
            .await
            .map_err(domain::Error::port_failure("create a todo"))
    }

    async fn update_todo(
        &self,
        id: Uuid,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl TodoReader,
        todo_write: &impl TodoWriter,
    ) -> Result<TodoItem, domain::Error> {
        update.validate()?;

        todo_write
            .update(id, update, &mut *ext_cxn)
            .await
            .map_err(domain::Error::port_failure("update a todo"))?;

        // Re-read so the caller sees the stored state, including server-assigned fields
        todo_read
            .by_id(id, &mut *ext_cxn)
            .await
            .map_err(domain::Error::port_failure("fetch an updated todo"))?
            .ok_or(domain::Error::DoesNotExist)
    }
}
