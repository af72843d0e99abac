use crate::domain;
use crate::domain::todo::{NewTodo, TodoItem, TodoStatus, UpdateTodo};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, query, query_as};
use uuid::Uuid;

pub struct DbTodoReader;

#[derive(FromRow)]
struct TodoRow {
    id: Uuid,
    todo: String,
    status: String,
    date_created: DateTime<Utc>,
}

impl TryFrom<TodoRow> for TodoItem {
    type Error = domain::todo::UnknownStatus;

    fn try_from(value: TodoRow) -> Result<Self, Self::Error> {
        Ok(TodoItem {
            id: value.id,
            text: value.todo,
            status: value.status.parse::<TodoStatus>()?,
            date_created: value.date_created,
        })
    }
}

/// Converts a fetched row, treating an unrecognized stored status as a read failure
fn todo_from_row(row: TodoRow) -> Result<TodoItem, Error> {
    let id = row.id;
    TodoItem::try_from(row).with_context(|| format!("decoding stored todo {id}"))
}

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todos = query_as::<_, TodoRow>(
            "SELECT id, todo, status, date_created FROM todo ORDER BY date_created, id",
        )
        .fetch_all(cxn.borrow_connection())
        .await
        .context("trying to fetch all todos")?
        .into_iter()
        .map(todo_from_row)
        .collect::<Result<Vec<TodoItem>, Error>>()?;

        Ok(todos)
    }

    async fn by_id(
        &self,
        id: Uuid,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<TodoItem>, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        let todo = query_as::<_, TodoRow>(
            "SELECT id, todo, status, date_created FROM todo WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to fetch a todo by ID")?
        .map(todo_from_row)
        .transpose()?;

        Ok(todo)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<TodoItem, Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        // status and date_created come from the column defaults
        let inserted = query_as::<_, TodoRow>(
            "INSERT INTO todo (todo) VALUES ($1) RETURNING id, todo, status, date_created",
        )
        .bind(&new_todo.text)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        todo_from_row(inserted)
    }

    async fn update(
        &self,
        id: Uuid,
        update: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), Error> {
        let mut cxn = ext_cxn.database_cxn().await?;

        query("UPDATE todo SET todo = $1, status = $2 WHERE id = $3")
            .bind(&update.text)
            .bind(update.status.to_string())
            .bind(id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to update a todo in the database")?;

        Ok(())
    }
}
