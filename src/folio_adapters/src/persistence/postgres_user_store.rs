use chrono::{DateTime, Utc};
use folio_core::{
    Email, NewUser, Password, Pending, ResetToken, User, UserStore, UserStoreError, Username,
    VerificationCode,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{Pool, Postgres, Row, postgres::PgRow};

use super::password_hash::{compute_password_hash, verify_password_hash};

pub struct PostgresUserStore {
    pool: sqlx::PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresUserStore { pool }
    }

    async fn fetch_row(&self, email: &Email) -> Result<PgRow, UserStoreError> {
        let row = sqlx::query(
            r#"
                SELECT email, username, password_hash, is_email_verified,
                       verification_code, verification_code_expires_at,
                       reset_token, reset_token_expires_at
                FROM users
                WHERE email = $1
            "#,
        )
        .bind(email.as_ref().expose_secret())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.ok_or(UserStoreError::UserNotFound)
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(new_user.password.clone())
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        sqlx::query(
            r#"
                INSERT INTO users (email, username, password_hash, is_email_verified)
                VALUES ($1, $2, $3, FALSE)
            "#,
        )
        .bind(new_user.email.as_ref().expose_secret())
        .bind(new_user.username.as_str())
        .bind(password_hash.expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                match db_err.constraint() {
                    Some("users_pkey") => return UserStoreError::UserAlreadyExists,
                    Some("users_username_key") => return UserStoreError::UsernameTaken,
                    _ => {}
                }
            }
            UserStoreError::UnexpectedError(e.to_string())
        })?;

        Ok(User::new(new_user.email, new_user.username))
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = self.fetch_row(email).await?;
        user_from_row(&row)
    }

    #[tracing::instrument(name = "Saving credential state to PostgreSQL", skip_all)]
    async fn save_credential_state(&self, user: &User) -> Result<(), UserStoreError> {
        let verification_code = user
            .pending_verification()
            .map(|p| p.secret().as_str().to_string());
        let verification_expires_at = user.pending_verification().map(|p| p.expires_at());
        let reset_token = user.pending_reset().map(|p| p.secret().as_str().to_string());
        let reset_expires_at = user.pending_reset().map(|p| p.expires_at());

        let result = sqlx::query(
            r#"
                UPDATE users
                SET is_email_verified = $1,
                    verification_code = $2,
                    verification_code_expires_at = $3,
                    reset_token = $4,
                    reset_token_expires_at = $5
                WHERE email = $6
            "#,
        )
        .bind(user.is_email_verified())
        .bind(verification_code)
        .bind(verification_expires_at)
        .bind(reset_token)
        .bind(reset_expires_at)
        .bind(user.email().as_ref().expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Set new password", skip_all)]
    async fn set_new_password(
        &self,
        email: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let result = sqlx::query(
            r#"
                UPDATE users
                SET password_hash = $1
                WHERE email = $2
            "#,
        )
        .bind(password_hash.expose_secret())
        .bind(email.as_ref().expose_secret())
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Validating user credentials in PostgreSQL", skip_all)]
    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let row = self.fetch_row(email).await?;

        let password_hash: String = row
            .try_get("password_hash")
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        verify_password_hash(Secret::from(password_hash), password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        user_from_row(&row)
    }

    #[tracing::instrument(name = "Checking username in PostgreSQL", skip_all)]
    async fn username_taken(&self, username: &Username) -> Result<bool, UserStoreError> {
        let row = sqlx::query(
            r#"
                SELECT EXISTS(SELECT 1 FROM users WHERE username = $1) AS taken
            "#,
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.try_get("taken")
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
    }
}

fn user_from_row(row: &PgRow) -> Result<User, UserStoreError> {
    let email: String = try_get(row, "email")?;
    let username: String = try_get(row, "username")?;
    let is_email_verified: bool = try_get(row, "is_email_verified")?;

    let email = Email::try_from(Secret::from(email))
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;
    let username =
        Username::parse(username).map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

    let verification_code: Option<String> = try_get(row, "verification_code")?;
    let verification_expires_at: Option<DateTime<Utc>> =
        try_get(row, "verification_code_expires_at")?;
    let reset_token: Option<String> = try_get(row, "reset_token")?;
    let reset_expires_at: Option<DateTime<Utc>> = try_get(row, "reset_token_expires_at")?;

    // Secret and expiry columns are written together; a row with only one of
    // the pair is treated as having no pending secret.
    let pending_verification = match (verification_code, verification_expires_at) {
        (Some(code), Some(expires_at)) => {
            let code = VerificationCode::parse(code)
                .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;
            Some(Pending::new(code, expires_at))
        }
        _ => None,
    };

    let pending_reset = match (reset_token, reset_expires_at) {
        (Some(token), Some(expires_at)) => {
            let token = ResetToken::parse(token)
                .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;
            Some(Pending::new(token, expires_at))
        }
        _ => None,
    };

    Ok(User::from_parts(
        email,
        username,
        is_email_verified,
        pending_verification,
        pending_reset,
    ))
}

fn try_get<'r, T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>>(
    row: &'r PgRow,
    column: &str,
) -> Result<T, UserStoreError> {
    row.try_get(column)
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
}
