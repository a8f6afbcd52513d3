use deadpool_postgres::Client;
use tokio_postgres::{Row, error::SqlState};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::user::{NewUser, User},
    storage::username_taken,
};

const USER_COLUMNS: &str = "id, username, password_hash, full_name, email, created_at";

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::MissingData("id".to_string()))?,
        username: row.try_get("username").map_err(|_| AppError::MissingData("username".to_string()))?,
        password_hash: row.try_get("password_hash").map_err(|_| AppError::MissingData("password_hash".to_string()))?,
        full_name: row.try_get("full_name").map_err(|_| AppError::MissingData("full_name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::MissingData("email".to_string()))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::MissingData("created_at".to_string()))?,
    })
}

/// Creates a new user in the database.
///
/// The `users.username` unique constraint decides between concurrent
/// registrations; its violation surfaces as `AppError::Conflict`.
pub async fn create_user(client: &Client, user: &NewUser) -> Result<User> {
    let query = format!(
        r#"
        INSERT INTO users (id, username, password_hash, full_name, email)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {USER_COLUMNS}
        "#
    );
    let statement = client.prepare_cached(&query).await?;
    let row = client
        .query_one(
            &statement,
            &[
                &user.id,
                &user.username,
                &user.password_hash,
                &user.full_name,
                &user.email,
            ],
        )
        .await
        .map_err(|e| {
            if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                username_taken()
            } else {
                AppError::Database(e)
            }
        })?;
    row_to_user(&row)
}

/// Finds a user by their username.
pub async fn find_by_username(client: &Client, username: &str) -> Result<Option<User>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
    let statement = client.prepare_cached(&query).await?;
    let row = client.query_opt(&statement, &[&username]).await?;
    row.map(|r| row_to_user(&r)).transpose()
}

/// Finds a user by their ID.
pub async fn find_by_id(client: &Client, user_id: &Uuid) -> Result<Option<User>> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let statement = client.prepare_cached(&query).await?;
    let row = client.query_opt(&statement, &[user_id]).await?;
    row.map(|r| row_to_user(&r)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{bootstrap_schema, create_pool};

    async fn client() -> Client {
        let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL");
        let pool = create_pool(&url, 2).unwrap();
        bootstrap_schema(&pool).await.unwrap();
        pool.get().await.unwrap()
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            full_name: None,
            email: None,
        }
    }

    #[tokio::test]
    #[ignore = "needs PostgreSQL; set TEST_DATABASE_URL to point at it"]
    async fn duplicate_username_is_a_conflict() {
        let client = client().await;
        let username = format!("dup_{}", Uuid::new_v4().simple());
        let first = create_user(&client, &new_user(&username)).await.unwrap();

        let second = create_user(&client, &new_user(&username)).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
        let stored = find_by_username(&client, &username).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        let by_id = find_by_id(&client, &first.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, username);
    }
}
