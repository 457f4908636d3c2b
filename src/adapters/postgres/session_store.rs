//! PostgreSQL implementation of SessionStore.
//!
//! One row per session. Participants and the offer history are stored as
//! JSONB documents so a session is always read and written as a whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::domain::negotiation::{NegotiationSession, Offer};
use crate::ports::SessionStore;

/// PostgreSQL implementation of SessionStore.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a new PostgresSessionStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM negotiation_sessions WHERE session_id = $1")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to check session existence", e))?;

        Ok(count > 0)
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<NegotiationSession>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, participants, offers, status, created_at, updated_at, version
            FROM negotiation_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch session", e))?;

        row.map(row_to_session).transpose()
    }

    async fn create(&self, session: &NegotiationSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO negotiation_sessions (
                session_id, participants, offers, status, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(session.id().as_str())
        .bind(Json(session.participants()))
        .bind(Json(session.offers()))
        .bind(session.status().as_str())
        .bind(session.created_at().as_datetime())
        .bind(session.updated_at().as_datetime())
        .bind(session.version())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SessionAlreadyExists,
                format!("Session already exists: {}", session.id()),
            ));
        }

        Ok(())
    }

    async fn update(&self, session: &NegotiationSession) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE negotiation_sessions SET
                participants = $2,
                offers = $3,
                status = $4,
                updated_at = $5,
                version = version + 1
            WHERE session_id = $1 AND version = $6
            "#,
        )
        .bind(session.id().as_str())
        .bind(Json(session.participants()))
        .bind(Json(session.offers()))
        .bind(session.status().as_str())
        .bind(session.updated_at().as_datetime())
        .bind(session.version())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update session", e))?;

        if result.rows_affected() == 0 {
            if self.exists(session.id()).await? {
                return Err(DomainError::new(
                    ErrorCode::ConcurrencyConflict,
                    format!("Session {} was modified concurrently", session.id()),
                )
                .with_detail("expected_version", session.version().to_string()));
            }
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            ));
        }

        Ok(())
    }
}

fn row_to_session(row: sqlx::postgres::PgRow) -> Result<NegotiationSession, DomainError> {
    let decode = |e: sqlx::Error| DomainError::database("Failed to decode session row", e);

    let id: String = row.try_get("session_id").map_err(decode)?;
    let Json(participants): Json<Vec<UserId>> = row.try_get("participants").map_err(decode)?;
    let Json(offers): Json<Vec<Offer>> = row.try_get("offers").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(decode)?;
    let version: i64 = row.try_get("version").map_err(decode)?;

    let id = SessionId::new(id).map_err(|e| DomainError::database("Invalid stored session id", e))?;
    let status = status
        .parse::<SessionStatus>()
        .map_err(|e| DomainError::database("Invalid stored session status", e))?;

    Ok(NegotiationSession::reconstitute(
        id,
        participants,
        offers,
        status,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
        version,
    ))
}
