use sqlx::PgPool;

pub use crate::users::repo_types::User;

use crate::error::{AppError, FieldErrors, Result};

const USER_COLUMNS: &str = "id, name, email, password_hash, access_token, created_at";

impl User {
    /// Find a user by (normalized) email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by access token. Used by the route guard; a miss means
    /// the caller is logged out, a query error is a distinct internal fault.
    pub async fn find_by_access_token(db: &PgPool, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE access_token = $1"
        ))
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert a new user. A single atomic insert; concurrent duplicates are
    /// rejected by the unique constraints and reported per field.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        access_token: &str,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, access_token)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(access_token)
        .fetch_one(db)
        .await
        .map_err(unique_violation_to_constraint)?;
        Ok(user)
    }
}

/// Map a violated unique constraint to the (field, message) pair reported
/// back to the caller.
fn field_for_constraint(constraint: Option<&str>) -> (&'static str, &'static str) {
    match constraint {
        Some("users_name_key") => ("name", "Name is already taken"),
        Some("users_email_key") => ("email", "Email is already registered"),
        _ => ("user", "Duplicate value"),
    }
}

fn unique_violation_to_constraint(e: sqlx::Error) -> AppError {
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            let (field, message) = field_for_constraint(db_err.constraint());
            let mut errors = FieldErrors::default();
            errors.push(field, message);
            AppError::Constraint(errors)
        }
        _ => AppError::Database(e),
    }
}
