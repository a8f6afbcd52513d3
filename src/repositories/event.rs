use deadpool_postgres::Client;
use tokio_postgres::Row;

use crate::{
    error::{AppError, Result},
    models::event::{Event, NewEvent},
};

fn row_to_event(row: &Row) -> Result<Event> {
    Ok(Event {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        owner_id: row.try_get("owner_id").map_err(|_| AppError::MissingData("owner_id".to_string()))?,
        owner: row.try_get("owner").map_err(|_| AppError::MissingData("owner".to_string()))?,
        text: row.try_get("text").map_err(|_| AppError::MissingData("text".to_string()))?,
        occurred_at: row.try_get("occurred_at").map_err(|_| AppError::MissingData("occurred_at".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Inserts an event and returns it joined with its owner's username.
pub async fn create_event(client: &Client, event: &NewEvent) -> Result<Event> {
    let statement = client
        .prepare_cached(
            r#"
            WITH inserted AS (
                INSERT INTO events (id, owner_id, text, occurred_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, owner_id, text, occurred_at, created_at
            )
            SELECT inserted.id, inserted.owner_id, users.username AS owner,
                   inserted.text, inserted.occurred_at, inserted.created_at
            FROM inserted
            JOIN users ON users.id = inserted.owner_id
            "#,
        )
        .await?;
    let row = client
        .query_one(
            &statement,
            &[&event.id, &event.owner_id, &event.text, &event.occurred_at],
        )
        .await?;
    row_to_event(&row)
}

/// Lists every event in insertion order.
pub async fn list_events(client: &Client) -> Result<Vec<Event>> {
    let statement = client
        .prepare_cached(
            r#"
            SELECT events.id, events.owner_id, users.username AS owner,
                   events.text, events.occurred_at, events.created_at
            FROM events
            JOIN users ON users.id = events.owner_id
            ORDER BY events.seq
            "#,
        )
        .await?;
    let rows = client.query(&statement, &[]).await?;
    rows.iter().map(row_to_event).collect()
}
